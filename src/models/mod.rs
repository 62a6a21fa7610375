//! Data models for the recipe book
//!
//! These models are shared between the server, the persisted JSON file and the client.

pub mod document;
pub mod shooter;

pub use document::*;
pub use shooter::*;
