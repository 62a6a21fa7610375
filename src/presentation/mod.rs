//! Text front end: the shooter form and the sorted recipe list.

mod form;
mod list;

pub use form::{FormError, ShooterForm};
pub use list::{render_ingredients, render_list, render_shooter, SortOrder, EMPTY_LIST};
