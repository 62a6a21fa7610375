//! Client-side state for the recipe book
//!
//! The controller mirrors the server's shooters and ingredients. Local state
//! only changes after the server has acknowledged a request, so a failed call
//! leaves everything as it was.

use super::{ClientError, RecipeBackend};
use crate::api::INVALID_INGREDIENT;
use crate::models::{Shooter, ShooterInput, ShooterPatch};

pub struct ShooterController<B> {
    backend: B,
    shooters: Vec<Shooter>,
    ingredients: Vec<String>,
    /// Id of the shooter the form is editing, if any
    editing: Option<String>,
}

impl<B: RecipeBackend> ShooterController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            shooters: Vec::new(),
            ingredients: Vec::new(),
            editing: None,
        }
    }

    /// Fetch both collections from the server, replacing local state.
    pub async fn init(&mut self) -> Result<(), ClientError> {
        let shooters = self.backend.list_shooters().await?;
        let ingredients = self.backend.list_ingredients().await?;
        tracing::debug!(
            "Loaded {} shooters and {} ingredients",
            shooters.len(),
            ingredients.len()
        );
        self.shooters = shooters;
        self.ingredients = ingredients;
        Ok(())
    }

    pub fn shooters(&self) -> &[Shooter] {
        &self.shooters
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn editing(&self) -> Option<&Shooter> {
        let id = self.editing.as_deref()?;
        self.shooters.iter().find(|s| s.id == id)
    }

    /// Make the shooter with `id` the target of the next submit.
    pub fn begin_edit(&mut self, id: &str) -> Result<&Shooter, ClientError> {
        let shooter = self
            .shooters
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Shooter non trouvé: {id}")))?;
        self.editing = Some(id.to_string());
        Ok(shooter)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Update the edit target, or create a new shooter when there is none.
    pub async fn submit_shooter(&mut self, values: ShooterInput) -> Result<&Shooter, ClientError> {
        match self.editing.clone() {
            Some(id) => {
                let updated = self
                    .backend
                    .update_shooter(&id, &ShooterPatch::from(values))
                    .await?;
                self.editing = None;
                let index = match self.shooters.iter().position(|s| s.id == updated.id) {
                    Some(index) => {
                        self.shooters[index] = updated;
                        index
                    }
                    None => {
                        self.shooters.push(updated);
                        self.shooters.len() - 1
                    }
                };
                Ok(&self.shooters[index])
            }
            None => {
                let created = self.backend.create_shooter(&values).await?;
                self.shooters.push(created);
                let index = self.shooters.len() - 1;
                Ok(&self.shooters[index])
            }
        }
    }

    pub async fn remove_shooter(&mut self, id: &str) -> Result<(), ClientError> {
        self.backend.delete_shooter(id).await?;
        self.shooters.retain(|s| s.id != id);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(())
    }

    /// Add `name` to the vocabulary unless it is empty or already known locally.
    pub async fn submit_ingredient(&mut self, name: &str) -> Result<&str, ClientError> {
        if name.is_empty() || self.ingredients.iter().any(|i| i == name) {
            return Err(ClientError::Validation(INVALID_INGREDIENT.to_string()));
        }
        let added = self.backend.add_ingredient(name).await?;
        self.ingredients.push(added);
        let index = self.ingredients.len() - 1;
        Ok(&self.ingredients[index])
    }

    pub async fn remove_ingredient(&mut self, name: &str) -> Result<(), ClientError> {
        self.backend.delete_ingredient(name).await?;
        self.ingredients.retain(|i| i != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecipeService;
    use crate::models::IngredientLine;
    use crate::storage::RecordStore;
    use tempfile::{tempdir, TempDir};

    async fn controller() -> (TempDir, ShooterController<RecipeService>) {
        let dir = tempdir().expect("temp dir");
        let service = RecipeService::new(RecordStore::open(dir.path().join("data.json")));
        let mut controller = ShooterController::new(service);
        controller.init().await.expect("init");
        (dir, controller)
    }

    fn input(nom: &str) -> ShooterInput {
        ShooterInput {
            nom: nom.to_string(),
            nombre: 1,
            ingredients: vec![IngredientLine::new("Baileys", 10)],
            note: Some(5),
            couleur: None,
        }
    }

    #[tokio::test]
    async fn init_loads_seed_vocabulary() {
        let (_dir, controller) = controller().await;
        assert!(controller.shooters().is_empty());
        assert_eq!(controller.ingredients(), ["Baileys", "Get27", "Jus d'orange"]);
        assert!(controller.editing().is_none());
    }

    #[tokio::test]
    async fn submit_creates_then_updates_edit_target() {
        let (_dir, mut controller) = controller().await;
        let created = controller.submit_shooter(input("B52")).await.unwrap().clone();
        assert_eq!(controller.shooters().len(), 1);

        controller.begin_edit(&created.id).unwrap();
        let mut values = input("B52 royal");
        values.note = None;
        let updated = controller.submit_shooter(values).await.unwrap().clone();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.date_creation, created.date_creation);
        assert_eq!(updated.nom, "B52 royal");
        assert_eq!(updated.note, None);
        assert_eq!(controller.shooters(), [updated.clone()]);
        assert!(controller.editing().is_none());

        // Server agrees with the local mirror.
        let stored = controller.backend().list_shooters().await.unwrap();
        assert_eq!(stored, vec![updated]);
    }

    #[tokio::test]
    async fn begin_edit_unknown_id_is_not_found() {
        let (_dir, mut controller) = controller().await;
        assert!(matches!(
            controller.begin_edit("missing"),
            Err(ClientError::NotFound(_))
        ));
        assert!(controller.editing().is_none());
    }

    #[tokio::test]
    async fn failed_update_keeps_local_state() {
        let (_dir, mut controller) = controller().await;
        let created = controller.submit_shooter(input("B52")).await.unwrap().clone();
        controller.begin_edit(&created.id).unwrap();

        // Removed behind the controller's back.
        RecipeService::delete_shooter(controller.backend(), &created.id)
            .await
            .unwrap();

        let result = controller.submit_shooter(input("Ghost")).await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
        assert_eq!(controller.shooters(), [created.clone()]);
        assert_eq!(controller.editing().map(|s| s.id.as_str()), Some(created.id.as_str()));

        controller.cancel_edit();
        assert!(controller.editing().is_none());
    }

    #[tokio::test]
    async fn server_stores_unchecked_submit() {
        let (_dir, mut controller) = controller().await;
        let mut values = input("Empty");
        values.nombre = 0;
        values.ingredients.clear();

        let created = controller.submit_shooter(values).await.unwrap().clone();

        assert_eq!(created.nombre, 0);
        assert!(created.ingredients.is_empty());
        assert_eq!(controller.shooters(), [created.clone()]);
        assert_eq!(
            controller.backend().list_shooters().await.unwrap(),
            vec![created]
        );
    }

    #[tokio::test]
    async fn remove_shooter_drops_local_copy() {
        let (_dir, mut controller) = controller().await;
        let keep = controller.submit_shooter(input("Keep")).await.unwrap().clone();
        let gone = controller.submit_shooter(input("Gone")).await.unwrap().clone();
        controller.begin_edit(&gone.id).unwrap();

        controller.remove_shooter(&gone.id).await.unwrap();

        assert_eq!(controller.shooters(), [keep]);
        assert!(controller.editing().is_none());
        // Unknown ids are acknowledged too.
        controller.remove_shooter("missing").await.unwrap();
        assert_eq!(controller.shooters().len(), 1);
    }

    #[tokio::test]
    async fn ingredient_guard_runs_before_request() {
        let (_dir, mut controller) = controller().await;

        assert!(matches!(
            controller.submit_ingredient("").await,
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            controller.submit_ingredient("Baileys").await,
            Err(ClientError::Validation(_))
        ));

        assert_eq!(controller.submit_ingredient("Vodka").await.unwrap(), "Vodka");
        assert_eq!(controller.ingredients().len(), 4);
        assert_eq!(
            controller.backend().list_ingredients().await.unwrap().len(),
            4
        );

        controller.remove_ingredient("Get27").await.unwrap();
        assert_eq!(controller.ingredients(), ["Baileys", "Jus d'orange", "Vodka"]);
    }
}
