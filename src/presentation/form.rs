use thiserror::Error;

use crate::models::{IngredientLine, Shooter, ShooterInput, COLOR_PALETTE, NOTE_RANGE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Champs obligatoires manquants: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("note {0} is outside 1-10")]
    NoteOutOfRange(u8),
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("unknown colour {0:?}")]
    UnknownColor(String),
    #[error("no ingredient line at position {0}")]
    NoSuchLine(usize),
}

/// Values being composed for a new or edited shooter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShooterForm {
    pub nom: String,
    /// `None` while the count field is blank
    pub nombre: Option<u32>,
    pub lines: Vec<IngredientLine>,
    pub note: Option<u8>,
    pub couleur: Option<String>,
}

impl Default for ShooterForm {
    fn default() -> Self {
        Self {
            nom: String::new(),
            nombre: Some(1),
            lines: Vec::new(),
            note: None,
            couleur: None,
        }
    }
}

impl ShooterForm {
    /// Pre-fill from a stored shooter for editing.
    pub fn load(shooter: &Shooter) -> Self {
        Self {
            nom: shooter.nom.clone(),
            nombre: Some(shooter.nombre),
            lines: shooter.ingredients.clone(),
            note: shooter.note,
            couleur: shooter.couleur.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add a line for `name` with a zero dosage. Returns false if already listed.
    pub fn add_line(&mut self, name: &str) -> bool {
        if name.is_empty() || self.lines.iter().any(|line| line.nom == name) {
            return false;
        }
        self.lines.push(IngredientLine::new(name, 0));
        true
    }

    /// Set the dosage of line `index` from raw text.
    ///
    /// Dosages are unsigned millilitres: negative or unparsable text counts as 0.
    pub fn set_dosage(&mut self, index: usize, text: &str) -> Result<u32, FormError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(FormError::NoSuchLine(index))?;
        line.dosage = text.trim().parse().unwrap_or(0);
        Ok(line.dosage)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<IngredientLine, FormError> {
        if index >= self.lines.len() {
            return Err(FormError::NoSuchLine(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Set the count from raw text; blank or invalid text leaves it unset.
    pub fn set_nombre(&mut self, text: &str) {
        self.nombre = text.trim().parse().ok();
    }

    /// Set the rating from raw text; blank text clears it.
    pub fn set_note(&mut self, text: &str) -> Result<(), FormError> {
        let text = text.trim();
        if text.is_empty() {
            self.note = None;
            return Ok(());
        }
        let note: u8 = text.parse().map_err(|_| FormError::NotANumber(text.to_string()))?;
        if !NOTE_RANGE.contains(&note) {
            return Err(FormError::NoteOutOfRange(note));
        }
        self.note = Some(note);
        Ok(())
    }

    /// Pick a palette colour, or clear it with `None`.
    pub fn select_color(&mut self, color: Option<&str>) -> Result<(), FormError> {
        match color {
            None => self.couleur = None,
            Some(c) => {
                let known = COLOR_PALETTE
                    .iter()
                    .find(|p| p.eq_ignore_ascii_case(c))
                    .ok_or_else(|| FormError::UnknownColor(c.to_string()))?;
                self.couleur = Some(known.to_string());
            }
        }
        Ok(())
    }

    /// Check the required fields and build the payload sent to the server.
    pub fn validate(&self) -> Result<ShooterInput, FormError> {
        let mut missing = Vec::new();
        if self.nom.trim().is_empty() {
            missing.push("nom");
        }
        let nombre = self.nombre.filter(|n| *n > 0);
        if nombre.is_none() {
            missing.push("nombre");
        }
        if self.lines.is_empty() {
            missing.push("ingrédients");
        }
        if !missing.is_empty() {
            return Err(FormError::Missing(missing));
        }
        if let Some(note) = self.note.filter(|n| !NOTE_RANGE.contains(n)) {
            return Err(FormError::NoteOutOfRange(note));
        }
        Ok(ShooterInput {
            nom: self.nom.trim().to_string(),
            nombre: nombre.unwrap_or(1),
            ingredients: self.lines.clone(),
            note: self.note,
            couleur: self.couleur.clone(),
        })
    }
}
