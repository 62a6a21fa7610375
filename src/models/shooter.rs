//! Shooter recipe model
//!
//! A shooter is one cocktail recipe: a name, how many glasses it makes, the
//! ingredient lines with their dosages, and an optional rating and colour.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Colours offered by the form when composing a shooter.
pub const COLOR_PALETTE: [&str; 20] = [
    "Rouge",
    "Vert",
    "Bleu",
    "Jaune",
    "Orange",
    "Violet",
    "Rose",
    "Marron",
    "Gris",
    "Noir",
    "Blanc",
    "Turquoise",
    "Cyan",
    "Magenta",
    "Indigo",
    "Lavande",
    "Saumon",
    "Beige",
    "Or",
    "Argent",
];

/// Lowest and highest accepted rating.
pub const NOTE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// One ingredient of a recipe and its dosage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Ingredient name, expected to come from the vocabulary
    pub nom: String,
    /// Dosage in millilitres
    pub dosage: u32,
}

impl IngredientLine {
    pub fn new(nom: impl Into<String>, dosage: u32) -> Self {
        Self {
            nom: nom.into(),
            dosage,
        }
    }
}

/// A stored shooter recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shooter {
    /// Unique identifier, assigned by the server
    pub id: String,
    /// Display name
    pub nom: String,
    /// Number of shooters the recipe makes
    pub nombre: u32,
    /// Ordered ingredient lines
    pub ingredients: Vec<IngredientLine>,
    /// Rating from 1 to 10
    pub note: Option<u8>,
    /// Colour picked from [`COLOR_PALETTE`]
    pub couleur: Option<String>,
    /// Creation time, never touched by updates
    pub date_creation: DateTime<Utc>,
}

impl Shooter {
    /// Build a new record from `input`, with a fresh id and creation time.
    pub fn create(input: ShooterInput) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            nom: input.nom,
            nombre: input.nombre,
            ingredients: input.ingredients,
            note: input.note,
            couleur: input.couleur,
            date_creation: Utc::now().trunc_subsecs(3),
        }
    }

    /// Rating used for ordering; a missing note counts as 0.
    pub fn sort_note(&self) -> u8 {
        self.note.unwrap_or(0)
    }
}

/// Reasons a shooter payload is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("nom must not be empty")]
    EmptyName,
    #[error("nombre must be a positive integer")]
    ZeroCount,
    #[error("at least one ingredient is required")]
    NoIngredients,
    #[error("ingredient name must not be empty")]
    EmptyIngredientName,
    #[error("note {0} is outside 1-10")]
    NoteOutOfRange(u8),
}

fn check_nom(nom: &str) -> Result<(), FieldError> {
    if nom.trim().is_empty() {
        return Err(FieldError::EmptyName);
    }
    Ok(())
}

fn check_nombre(nombre: u32) -> Result<(), FieldError> {
    if nombre == 0 {
        return Err(FieldError::ZeroCount);
    }
    Ok(())
}

fn check_ingredients(lines: &[IngredientLine]) -> Result<(), FieldError> {
    if lines.is_empty() {
        return Err(FieldError::NoIngredients);
    }
    if lines.iter().any(|line| line.nom.trim().is_empty()) {
        return Err(FieldError::EmptyIngredientName);
    }
    Ok(())
}

fn check_note(note: Option<u8>) -> Result<(), FieldError> {
    match note {
        Some(n) if !NOTE_RANGE.contains(&n) => Err(FieldError::NoteOutOfRange(n)),
        _ => Ok(()),
    }
}

/// Fields accepted when creating a shooter.
///
/// Every field must be present, but values are not range-checked. Any `id`
/// or `dateCreation` sent by a client is ignored; the server assigns both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShooterInput {
    pub nom: String,
    pub nombre: u32,
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub note: Option<u8>,
    #[serde(default)]
    pub couleur: Option<String>,
}

/// Partial update of a shooter.
///
/// Only the fields listed here can change. An absent field is preserved; for
/// the optional fields an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShooterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientLine>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<u8>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub couleur: Option<Option<String>>,
}

/// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ShooterPatch {
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(nom) = &self.nom {
            check_nom(nom)?;
        }
        if let Some(nombre) = self.nombre {
            check_nombre(nombre)?;
        }
        if let Some(lines) = &self.ingredients {
            check_ingredients(lines)?;
        }
        if let Some(note) = self.note {
            check_note(note)?;
        }
        Ok(())
    }

    /// Merge the present fields into `shooter`. `id` and `date_creation` are never touched.
    pub fn apply_to(self, shooter: &mut Shooter) {
        if let Some(nom) = self.nom {
            shooter.nom = nom;
        }
        if let Some(nombre) = self.nombre {
            shooter.nombre = nombre;
        }
        if let Some(lines) = self.ingredients {
            shooter.ingredients = lines;
        }
        if let Some(note) = self.note {
            shooter.note = note;
        }
        if let Some(couleur) = self.couleur {
            shooter.couleur = couleur;
        }
    }
}

impl From<ShooterInput> for ShooterPatch {
    /// Full replacement of every mutable field, as sent by the edit form.
    fn from(input: ShooterInput) -> Self {
        Self {
            nom: Some(input.nom),
            nombre: Some(input.nombre),
            ingredients: Some(input.ingredients),
            note: Some(input.note),
            couleur: Some(input.couleur),
        }
    }
}
