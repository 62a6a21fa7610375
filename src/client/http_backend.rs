use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;

use super::{ClientError, RecipeBackend};
use crate::models::{Shooter, ShooterInput, ShooterPatch};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// JSON-over-HTTP backend talking to `shooters-server`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

#[derive(Serialize)]
struct NewIngredient<'a> {
    nom: &'a str,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Local server; ignore any system proxy.
        let client = Client::builder().no_proxy().build()?;
        Ok(Self { client, base })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::debug!("Request failed with {}: {}", status, message);
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }
        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

impl RecipeBackend for HttpBackend {
    async fn list_shooters(&self) -> Result<Vec<Shooter>, ClientError> {
        let response = self.client.get(self.url(&["shooters"])?).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_shooter(&self, input: &ShooterInput) -> Result<Shooter, ClientError> {
        let response = self
            .client
            .post(self.url(&["shooters"])?)
            .json(input)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_shooter(&self, id: &str, patch: &ShooterPatch) -> Result<Shooter, ClientError> {
        let response = self
            .client
            .put(self.url(&["shooters", id])?)
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_shooter(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&["shooters", id])?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_ingredients(&self) -> Result<Vec<String>, ClientError> {
        let response = self.client.get(self.url(&["ingredients"])?).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn add_ingredient(&self, name: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(&["ingredients"])?)
            .json(&NewIngredient { nom: name })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_ingredient(&self, name: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&["ingredients", name])?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
