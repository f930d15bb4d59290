use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::client::{ClientError, ClientResult};
use crate::config::ClientConfig;
use crate::models::{CreateEnvironment, Environment, EnvironmentStatus};

/// Access to the environments REST API.
/// The state cache only talks to this trait, so tests can swap in a fake.
#[async_trait]
pub trait EnvironmentApi: Send + Sync {
    /// Fetch every environment
    async fn list(&self) -> ClientResult<Vec<Environment>>;

    /// Fetch a single environment
    async fn get(&self, id: &str) -> ClientResult<Environment>;

    /// Create an environment; the server assigns id and timestamp
    async fn create(&self, input: &CreateEnvironment) -> ClientResult<Environment>;

    /// Replace an environment's editable fields
    async fn update(&self, id: &str, body: &UpdateEnvironmentBody) -> ClientResult<Environment>;

    /// Delete an environment
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

/// Update body sent by the edit form. Every field is always present;
/// `None` serializes as `null`, which clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateEnvironmentBody {
    pub name: Option<String>,
    pub url: String,
    pub version: Option<String>,
    pub status: EnvironmentStatus,
    pub notes: Option<String>,
}

impl From<&Environment> for UpdateEnvironmentBody {
    fn from(env: &Environment) -> Self {
        Self {
            name: env.name.clone(),
            url: env.url.clone(),
            version: env.version.clone(),
            status: env.status,
            notes: env.notes.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed implementation of [`EnvironmentApi`]
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/environments", config.api_url.trim_end_matches('/')),
        })
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Turn non-2xx responses into `ClientError::Api`, keeping the server's message
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl EnvironmentApi for HttpApi {
    async fn list(&self) -> ClientResult<Vec<Environment>> {
        let response = self.client.get(&self.base_url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get(&self, id: &str) -> ClientResult<Environment> {
        let response = self.client.get(self.item_url(id)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create(&self, input: &CreateEnvironment) -> ClientResult<Environment> {
        let response = self.client.post(&self.base_url).json(input).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update(&self, id: &str, body: &UpdateEnvironmentBody) -> ClientResult<Environment> {
        let response = self.client.put(self.item_url(id)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
