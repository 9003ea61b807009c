use std::{env, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{config::Config, error::SecretError};

pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const GOOGLE_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;

    async fn set_secret(&self, name: &str, value: &str) -> Result<(), SecretError>;
}

/// Picks the remote store when `SECRETS_URL` is configured, env otherwise.
pub fn secret_store(config: &Config) -> Arc<dyn SecretStore> {
    match &config.secrets_url {
        Some(url) => Arc::new(RemoteSecretStore::new(url.clone(), config.secrets_key.clone())),
        None => Arc::new(EnvSecretStore),
    }
}

/// Secrets from process environment variables (and the loaded `.env` file).
/// Read-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }

    async fn set_secret(&self, name: &str, _value: &str) -> Result<(), SecretError> {
        Err(SecretError::ReadOnly(name.to_string()))
    }
}

#[derive(Deserialize)]
struct SecretResponse {
    secret: Option<String>,
}

/// Secrets behind `get-secret` / `set-secret` HTTP functions.
pub struct RemoteSecretStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteSecretStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn invoke(&self, function: &str, body: serde_json::Value) -> Result<reqwest::Response, SecretError> {
        let mut request = self
            .client
            .post(format!("{}/{}", self.base_url, function))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SecretError::Remote(format!("{} returned {}: {}", function, status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl SecretStore for RemoteSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        let response = self.invoke("get-secret", json!({ "secretName": name })).await?;
        let body = response
            .json::<SecretResponse>()
            .await
            .map_err(|e| SecretError::Remote(e.to_string()))?;

        body.secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<(), SecretError> {
        self.invoke(
            "set-secret",
            json!({ "secretName": name, "secretValue": value }),
        )
        .await?;
        Ok(())
    }
}
