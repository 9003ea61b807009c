//! Shared fixtures for the integration tests: an in-memory secret store and a
//! scripted YouTube catalog that records every call it receives.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use playconv::{
    convert::PlaylistAssembler,
    error::{ApiError, SecretError},
    management::{
        AuthManager, MemoryStorage, SecretStore,
        secrets::{GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET},
        storage::{CREDENTIAL_KEY, store_json},
    },
    types::{DestinationCredential, TrackDescriptor},
    youtube::{DestinationCatalog, SearchAuth, auth::OAuthClient},
};

pub const AUTH_URL: &str = "https://accounts.example.test/o/oauth2/auth";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/playlist-tracks";
pub const SCOPE: &str = "https://www.googleapis.com/auth/youtube";
/// Token endpoint for tests that must never reach it.
pub const UNREACHABLE_TOKEN_URL: &str = "http://127.0.0.1:9/token";

pub fn track(title: &str, artist: &str, position: usize) -> TrackDescriptor {
    TrackDescriptor::new(title, artist, position)
}

#[derive(Default)]
pub struct MemorySecretStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn with(pairs: &[(&str, &str)]) -> Arc<Self> {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(Self {
            values: Mutex::new(values),
        })
    }

    /// Google client credentials, no API key.
    pub fn google() -> Arc<Self> {
        Self::with(&[
            (GOOGLE_CLIENT_ID, "google-client"),
            (GOOGLE_CLIENT_SECRET, "google-secret"),
        ])
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.values.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        self.value(name)
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<(), SecretError> {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Scripted destination catalog.
///
/// Queries without a configured result find nothing. Every call is recorded
/// in the order it arrives.
#[derive(Default)]
pub struct FakeCatalog {
    results: HashMap<String, Vec<String>>,
    failing_searches: HashSet<String>,
    failing_inserts: HashSet<String>,
    unauthorized_search: bool,
    unauthorized_insert: bool,
    create_status: Option<u16>,
    create_gate: Option<Arc<Notify>>,
    pub create_entered: Arc<Notify>,
    pub creates: Mutex<Vec<(String, String, String)>>,
    pub searches: Mutex<Vec<(String, SearchAuth)>>,
    pub inserts: Mutex<Vec<(String, String)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, query: &str, video_ids: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            video_ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn with_failing_insert(mut self, video_id: &str) -> Self {
        self.failing_inserts.insert(video_id.to_string());
        self
    }

    pub fn with_unauthorized_search(mut self) -> Self {
        self.unauthorized_search = true;
        self
    }

    pub fn with_unauthorized_insert(mut self) -> Self {
        self.unauthorized_insert = true;
        self
    }

    pub fn with_create_status(mut self, status: u16) -> Self {
        self.create_status = Some(status);
        self
    }

    /// Makes `create_playlist` wait until the returned gate is notified.
    pub fn with_create_gate(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.create_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    pub fn inserted_videos(&self) -> Vec<String> {
        self.inserts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, video_id)| video_id.clone())
            .collect()
    }
}

#[async_trait]
impl DestinationCatalog for FakeCatalog {
    async fn create_playlist(
        &self,
        access_token: &str,
        title: &str,
        description: &str,
    ) -> Result<String, ApiError> {
        self.create_entered.notify_one();
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }

        self.creates.lock().unwrap().push((
            access_token.to_string(),
            title.to_string(),
            description.to_string(),
        ));

        match self.create_status {
            Some(401) => Err(ApiError::Unauthorized),
            Some(status) => Err(ApiError::Status {
                status,
                body: "create failed".to_string(),
            }),
            None => Ok("PL-created".to_string()),
        }
    }

    async fn search_videos(&self, query: &str, auth: &SearchAuth) -> Result<Vec<String>, ApiError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), auth.clone()));

        if self.unauthorized_search {
            return Err(ApiError::Unauthorized);
        }
        if self.failing_searches.contains(query) {
            return Err(ApiError::Status {
                status: 500,
                body: "backend error".to_string(),
            });
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    async fn insert_playlist_item(
        &self,
        _access_token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError> {
        self.inserts
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), video_id.to_string()));

        if self.unauthorized_insert {
            return Err(ApiError::Unauthorized);
        }
        if self.failing_inserts.contains(video_id) {
            return Err(ApiError::Status {
                status: 409,
                body: "video unavailable".to_string(),
            });
        }
        Ok(())
    }
}

pub fn oauth_client(token_url: &str) -> OAuthClient {
    OAuthClient::new(AUTH_URL, token_url, REDIRECT_URI, SCOPE)
}

pub fn auth_manager(
    token_url: &str,
    secrets: Arc<MemorySecretStore>,
    storage: Arc<MemoryStorage>,
) -> AuthManager {
    AuthManager::new(
        oauth_client(token_url),
        secrets,
        storage,
        Duration::from_secs(900),
    )
}

pub fn assembler(
    token_url: &str,
    catalog: Arc<FakeCatalog>,
    secrets: Arc<MemorySecretStore>,
    storage: Arc<MemoryStorage>,
) -> PlaylistAssembler {
    let auth = auth_manager(token_url, Arc::clone(&secrets), storage);
    PlaylistAssembler::new(auth, catalog, secrets)
}

pub fn credential(access_token: &str, refresh_token: Option<&str>, expires_in_secs: i64) -> DestinationCredential {
    DestinationCredential {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expiry: Some(Utc::now() + chrono::Duration::seconds(expires_in_secs)),
    }
}

/// Stores a credential that is valid for another hour.
pub async fn seed_credential(storage: &MemoryStorage, access_token: &str) {
    store_json(storage, CREDENTIAL_KEY, &credential(access_token, None, 3600))
        .await
        .unwrap();
}

/// Value of a query parameter of a URL.
pub fn query_value(url: &str, name: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
