//! The persisted document: every shooter plus the ingredient vocabulary.

use serde::{Deserialize, Serialize};

use super::Shooter;

/// Vocabulary used when no document has been written yet.
pub const SEED_INGREDIENTS: [&str; 3] = ["Baileys", "Get27", "Jus d'orange"];

/// Top-level persisted unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Shooters in insertion order
    pub shooters: Vec<Shooter>,
    /// Ingredient names in insertion order, without duplicates
    pub ingredients: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            shooters: Vec::new(),
            ingredients: SEED_INGREDIENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Document {
    pub fn shooter(&self, id: &str) -> Option<&Shooter> {
        self.shooters.iter().find(|s| s.id == id)
    }

    pub fn shooter_mut(&mut self, id: &str) -> Option<&mut Shooter> {
        self.shooters.iter_mut().find(|s| s.id == id)
    }

    /// Remove the shooter with `id`; returns whether anything was removed.
    pub fn remove_shooter(&mut self, id: &str) -> bool {
        let before = self.shooters.len();
        self.shooters.retain(|s| s.id != id);
        self.shooters.len() != before
    }

    /// Exact, case-sensitive lookup.
    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients.iter().any(|i| i == name)
    }

    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i != name);
        self.ingredients.len() != before
    }
}
