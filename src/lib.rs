//! # Shooter Recipes
//!
//! A small recipe book for shooters (cocktail shots), kept in a single JSON
//! document and served over HTTP.
//!
//! ## Features
//!
//! - Create, edit, delete and sort shooter recipes
//! - Shared ingredient vocabulary
//! - JSON REST API with permissive CORS
//! - Command-line client with form validation and list rendering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              shooters CLI (presentation)                │
//! ├─────────────────────────────────────────────────────────┤
//! │        ShooterController ── HttpBackend (reqwest)       │
//! ├─────────────────────────────────────────────────────────┤
//! │                 shooters-server (hyper)                 │
//! │  ┌──────────┐   ┌───────────────┐   ┌───────────────┐   │
//! │  │  Routes  │───│ RecipeService │───│  RecordStore  │   │
//! │  │  + CORS  │   │               │   │  (data.json)  │   │
//! │  └──────────┘   └───────────────┘   └───────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod logging;
pub mod models;
pub mod presentation;
pub mod server;
pub mod storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
