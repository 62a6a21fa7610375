//! Recipe book operations
//!
//! Each operation loads the full document, changes one entity, saves the full
//! document and returns only what was affected.

use http::StatusCode;
use thiserror::Error;

use crate::models::{FieldError, Shooter, ShooterInput, ShooterPatch};
use crate::storage::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Shooter non trouvé: {0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldError> for ApiError {
    fn from(e: FieldError) -> Self {
        ApiError::InvalidInput(e.to_string())
    }
}

/// Message sent back when an ingredient cannot be added.
pub const INVALID_INGREDIENT: &str = "Ingrédient invalide ou existant";

#[derive(Debug, Clone)]
pub struct RecipeService {
    store: RecordStore,
}

impl RecipeService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// All shooters in stored order.
    pub async fn list_shooters(&self) -> Result<Vec<Shooter>, ApiError> {
        Ok(self.store.read(|doc| doc.shooters.clone()).await?)
    }

    pub async fn get_shooter(&self, id: &str) -> Result<Shooter, ApiError> {
        self.store
            .read(|doc| doc.shooter(id).cloned())
            .await?
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// Store a new shooter with a server-assigned id and creation time.
    ///
    /// Values are stored as received; checking them is the form's job.
    pub async fn create_shooter(&self, input: ShooterInput) -> Result<Shooter, ApiError> {
        let shooter = self
            .store
            .update(|doc| {
                let mut shooter = Shooter::create(input);
                while doc.shooter(&shooter.id).is_some() {
                    shooter.id = uuid::Uuid::new_v4().to_string();
                }
                doc.shooters.push(shooter.clone());
                Ok::<_, ApiError>(shooter)
            })
            .await?;
        tracing::info!("Created shooter {} ({})", shooter.id, shooter.nom);
        Ok(shooter)
    }

    /// Merge `patch` into the shooter with `id` and return the merged record.
    ///
    /// An unknown id is `NotFound` whatever the patch holds.
    pub async fn update_shooter(&self, id: &str, patch: ShooterPatch) -> Result<Shooter, ApiError> {
        let shooter = self
            .store
            .update(|doc| -> Result<Shooter, ApiError> {
                let shooter = doc
                    .shooter_mut(id)
                    .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
                patch.validate()?;
                patch.apply_to(shooter);
                Ok(shooter.clone())
            })
            .await?;
        tracing::info!("Updated shooter {}", id);
        Ok(shooter)
    }

    /// Remove the shooter with `id`. Deleting an unknown id is not an error.
    pub async fn delete_shooter(&self, id: &str) -> Result<(), ApiError> {
        let removed = self
            .store
            .update(|doc| Ok::<_, ApiError>(doc.remove_shooter(id)))
            .await?;
        if removed {
            tracing::info!("Deleted shooter {}", id);
        } else {
            tracing::debug!("Delete of unknown shooter {} ignored", id);
        }
        Ok(())
    }

    pub async fn list_ingredients(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.store.read(|doc| doc.ingredients.clone()).await?)
    }

    /// Append `name` to the vocabulary; empty or already present names are rejected.
    pub async fn add_ingredient(&self, name: String) -> Result<String, ApiError> {
        if name.is_empty() {
            return Err(ApiError::InvalidInput(INVALID_INGREDIENT.to_string()));
        }
        let name = self
            .store
            .update(move |doc| {
                if doc.has_ingredient(&name) {
                    return Err(ApiError::InvalidInput(INVALID_INGREDIENT.to_string()));
                }
                doc.ingredients.push(name.clone());
                Ok(name)
            })
            .await?;
        tracing::info!("Added ingredient {:?}", name);
        Ok(name)
    }

    /// Remove `name` from the vocabulary.
    ///
    /// Shooters that use the ingredient keep their reference to it.
    pub async fn delete_ingredient(&self, name: &str) -> Result<(), ApiError> {
        let removed = self
            .store
            .update(|doc| Ok::<_, ApiError>(doc.remove_ingredient(name)))
            .await?;
        if removed {
            tracing::info!("Deleted ingredient {:?}", name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientLine;
    use std::collections::HashSet;
    use tempfile::{tempdir, TempDir};

    fn service() -> (TempDir, RecipeService) {
        let dir = tempdir().expect("temp dir");
        let store = RecordStore::open(dir.path().join("data.json"));
        (dir, RecipeService::new(store))
    }

    fn input(nom: &str) -> ShooterInput {
        ShooterInput {
            nom: nom.to_string(),
            nombre: 2,
            ingredients: vec![IngredientLine::new("Get27", 20)],
            note: None,
            couleur: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_echoes_fields() {
        let (_dir, api) = service();
        let before = chrono::Utc::now() - chrono::Duration::seconds(1);

        let created = api.create_shooter(input("Tequila Sunrise")).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.nom, "Tequila Sunrise");
        assert_eq!(created.nombre, 2);
        assert_eq!(created.ingredients, vec![IngredientLine::new("Get27", 20)]);
        assert!(created.date_creation >= before);
        assert_eq!(api.list_shooters().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let (_dir, api) = service();
        let mut ids = HashSet::new();
        for i in 0..10 {
            let s = api.create_shooter(input(&format!("s{i}"))).await.unwrap();
            assert!(ids.insert(s.id));
        }
    }

    #[tokio::test]
    async fn update_merges_and_keeps_creation_date() {
        let (_dir, api) = service();
        let created = api.create_shooter(input("Kamikaze")).await.unwrap();

        let patch = ShooterPatch {
            note: Some(Some(8)),
            ..Default::default()
        };
        let updated = api.update_shooter(&created.id, patch).await.unwrap();

        assert_eq!(updated.note, Some(8));
        assert_eq!(updated.nom, created.nom);
        assert_eq!(updated.ingredients, created.ingredients);
        assert_eq!(updated.date_creation, created.date_creation);
        assert_eq!(api.get_shooter(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_changes_nothing() {
        let (_dir, api) = service();
        api.create_shooter(input("Kamikaze")).await.unwrap();
        let before = api.list_shooters().await.unwrap();

        let err = api
            .update_shooter("unknown", ShooterPatch::default())
            .await
            .expect_err("must fail");

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.list_shooters().await.unwrap(), before);
    }

    #[tokio::test]
    async fn create_stores_values_as_received() {
        let (_dir, api) = service();
        let solo = ShooterInput {
            nom: "Solo".into(),
            nombre: 0,
            ingredients: Vec::new(),
            note: Some(11),
            couleur: Some("Fuchsia".into()),
        };

        let created = api.create_shooter(solo).await.unwrap();

        assert_eq!(created.nombre, 0);
        assert!(created.ingredients.is_empty());
        assert_eq!(created.note, Some(11));
        assert_eq!(api.get_shooter(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unknown_id_wins_over_invalid_patch() {
        let (_dir, api) = service();
        let patch = ShooterPatch {
            note: Some(Some(0)),
            ..Default::default()
        };

        let err = api.update_shooter("unknown", patch).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected_before_merge() {
        let (_dir, api) = service();
        let created = api.create_shooter(input("Kamikaze")).await.unwrap();

        let patch = ShooterPatch {
            ingredients: Some(Vec::new()),
            ..Default::default()
        };
        let err = api.update_shooter(&created.id, patch).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.get_shooter(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, api) = service();
        let keep = api.create_shooter(input("Keep")).await.unwrap();
        let gone = api.create_shooter(input("Drop")).await.unwrap();

        api.delete_shooter(&gone.id).await.unwrap();
        api.delete_shooter(&gone.id).await.unwrap();
        api.delete_shooter("never-existed").await.unwrap();

        assert_eq!(api.list_shooters().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn serialized_operations_keep_survivors_in_order() {
        let (_dir, api) = service();
        let a = api.create_shooter(input("a")).await.unwrap();
        let b = api.create_shooter(input("b")).await.unwrap();
        let c = api.create_shooter(input("c")).await.unwrap();
        api.delete_shooter(&b.id).await.unwrap();
        let c = api
            .update_shooter(
                &c.id,
                ShooterPatch {
                    nom: Some("c2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let d = api.create_shooter(input("d")).await.unwrap();

        assert_eq!(api.list_shooters().await.unwrap(), vec![a, c, d]);
    }

    #[tokio::test]
    async fn add_ingredient_rejects_empty_and_duplicates() {
        let (_dir, api) = service();

        let err = api.add_ingredient(String::new()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = api.add_ingredient("Baileys".into()).await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_INGREDIENT);
        assert_eq!(api.list_ingredients().await.unwrap().len(), 3);

        let added = api.add_ingredient("baileys".into()).await.unwrap();
        assert_eq!(added, "baileys");
        assert_eq!(
            api.list_ingredients().await.unwrap(),
            vec!["Baileys", "Get27", "Jus d'orange", "baileys"]
        );
    }

    #[tokio::test]
    async fn deleting_ingredient_leaves_recipes_alone() {
        let (_dir, api) = service();
        let created = api.create_shooter(input("Orphan")).await.unwrap();

        api.delete_ingredient("Get27").await.unwrap();
        api.delete_ingredient("Get27").await.unwrap();

        assert_eq!(
            api.list_ingredients().await.unwrap(),
            vec!["Baileys", "Jus d'orange"]
        );
        let stored = api.get_shooter(&created.id).await.unwrap();
        assert_eq!(stored.ingredients[0].nom, "Get27");
    }
}
