use std::fmt::Write as _;
use std::str::FromStr;

use chrono::Local;

use crate::models::Shooter;

/// Shown instead of the list when there is nothing to show.
pub const EMPTY_LIST: &str = "Aucune recette pour l'instant...";

/// Display order of the shooter list. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
    NoteAsc,
    NoteDesc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-asc" | "dateAsc" => Ok(SortOrder::DateAsc),
            "date-desc" | "dateDesc" => Ok(SortOrder::DateDesc),
            "note-asc" | "noteAsc" => Ok(SortOrder::NoteAsc),
            "note-desc" | "noteDesc" => Ok(SortOrder::NoteDesc),
            other => Err(format!(
                "unknown sort order {other:?} (date-desc, date-asc, note-desc, note-asc)"
            )),
        }
    }
}

impl SortOrder {
    /// The shooters in this order. Ties keep their stored order.
    pub fn sorted<'a>(&self, shooters: &'a [Shooter]) -> Vec<&'a Shooter> {
        let mut sorted: Vec<&Shooter> = shooters.iter().collect();
        match self {
            SortOrder::DateAsc => sorted.sort_by_key(|s| s.date_creation),
            SortOrder::DateDesc => sorted.sort_by(|a, b| b.date_creation.cmp(&a.date_creation)),
            SortOrder::NoteAsc => sorted.sort_by_key(|s| s.sort_note()),
            SortOrder::NoteDesc => sorted.sort_by(|a, b| b.sort_note().cmp(&a.sort_note())),
        }
        sorted
    }
}

/// One shooter as a block of text.
pub fn render_shooter(shooter: &Shooter) -> String {
    let mut out = String::new();
    let note = shooter
        .note
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "{} (x{})  [{}]", shooter.nom, shooter.nombre, shooter.id);
    let _ = writeln!(
        out,
        "  Note: {}/10  Couleur: {}",
        note,
        shooter.couleur.as_deref().unwrap_or("-")
    );
    for line in &shooter.ingredients {
        let _ = writeln!(out, "  - {} - {}ml", line.nom, line.dosage);
    }
    let _ = writeln!(
        out,
        "  Créé le {}",
        shooter
            .date_creation
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
    );
    out
}

pub fn render_list(shooters: &[Shooter], order: SortOrder) -> String {
    if shooters.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }
    order
        .sorted(shooters)
        .into_iter()
        .map(render_shooter)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_ingredients(ingredients: &[String]) -> String {
    let mut out = String::new();
    for name in ingredients {
        let _ = writeln!(out, "- {name}");
    }
    out
}
