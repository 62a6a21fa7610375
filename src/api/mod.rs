//! Recipe book API
//!
//! Entity operations shared by the HTTP server and the in-process client backend.

pub mod recipe_api;

pub use recipe_api::{ApiError, RecipeService, INVALID_INGREDIENT};
