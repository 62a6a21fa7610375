//! Client side of the recipe book
//!
//! [`ShooterController`] keeps the local mirror of the server state. It talks
//! to the server through a [`RecipeBackend`]: [`HttpBackend`] over the network,
//! or a [`RecipeService`] directly when running in-process.

mod controller;
mod http_backend;

pub use controller::ShooterController;
pub use http_backend::{HttpBackend, DEFAULT_API_URL};

use thiserror::Error;

use crate::api::{ApiError, RecipeService};
use crate::models::{Shooter, ShooterInput, ShooterPatch};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("server answered {status}: {message}")]
    Http { status: u16, message: String },
    #[error("invalid API url {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(_) => ClientError::NotFound(e.to_string()),
            other => ClientError::Http {
                status: other.status().as_u16(),
                message: other.to_string(),
            },
        }
    }
}

/// The operations the controller needs from the server.
#[allow(async_fn_in_trait)]
pub trait RecipeBackend {
    async fn list_shooters(&self) -> Result<Vec<Shooter>, ClientError>;
    async fn create_shooter(&self, input: &ShooterInput) -> Result<Shooter, ClientError>;
    async fn update_shooter(&self, id: &str, patch: &ShooterPatch) -> Result<Shooter, ClientError>;
    async fn delete_shooter(&self, id: &str) -> Result<(), ClientError>;
    async fn list_ingredients(&self) -> Result<Vec<String>, ClientError>;
    async fn add_ingredient(&self, name: &str) -> Result<String, ClientError>;
    async fn delete_ingredient(&self, name: &str) -> Result<(), ClientError>;
}

impl RecipeBackend for RecipeService {
    async fn list_shooters(&self) -> Result<Vec<Shooter>, ClientError> {
        Ok(RecipeService::list_shooters(self).await?)
    }

    async fn create_shooter(&self, input: &ShooterInput) -> Result<Shooter, ClientError> {
        Ok(RecipeService::create_shooter(self, input.clone()).await?)
    }

    async fn update_shooter(&self, id: &str, patch: &ShooterPatch) -> Result<Shooter, ClientError> {
        Ok(RecipeService::update_shooter(self, id, patch.clone()).await?)
    }

    async fn delete_shooter(&self, id: &str) -> Result<(), ClientError> {
        Ok(RecipeService::delete_shooter(self, id).await?)
    }

    async fn list_ingredients(&self) -> Result<Vec<String>, ClientError> {
        Ok(RecipeService::list_ingredients(self).await?)
    }

    async fn add_ingredient(&self, name: &str) -> Result<String, ClientError> {
        Ok(RecipeService::add_ingredient(self, name.to_string()).await?)
    }

    async fn delete_ingredient(&self, name: &str) -> Result<(), ClientError> {
        Ok(RecipeService::delete_ingredient(self, name).await?)
    }
}
