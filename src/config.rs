//! Configuration management for the playlist converter.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Credentials (client ids, client secrets, API keys)
//! are not part of [`Config`]; they are read through the secret store, see
//! [`crate::management::SecretStore`].
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::ConfigError;

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_CALLBACK_PATH: &str = "/playlist-tracks";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_YOUTUBE_SCOPE: &str =
    "https://www.googleapis.com/auth/youtube https://www.googleapis.com/auth/youtube.force-ssl";
const DEFAULT_REQUEST_INTERVAL_MS: u64 = 100;
const DEFAULT_SESSION_TTL_SECS: u64 = 900;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist and loads `playconv/.env` from the
/// platform-specific local data directory:
/// - Linux: `~/.local/share/playconv/.env`
/// - macOS: `~/Library/Application Support/playconv/.env`
/// - Windows: `%LOCALAPPDATA%/playconv/.env`
///
/// A missing `.env` file is not an error, plain environment variables work on
/// their own. A file that exists but cannot be parsed is.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playconv/.env");
    path
}

/// Runtime settings of the converter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the local OAuth callback server binds to.
    pub server_addr: SocketAddr,
    /// Redirect URI registered with Google; must point at the callback server.
    pub redirect_uri: String,
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub youtube_api_url: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    /// Space separated OAuth scopes requested on the consent screen.
    pub youtube_scope: String,
    /// Base URL of the remote secret store; env secrets are used when absent.
    pub secrets_url: Option<String>,
    pub secrets_key: Option<String>,
    /// Pause between consecutive per-track YouTube calls.
    pub request_interval: Duration,
    /// How long a pending authorization session stays valid.
    pub session_ttl: Duration,
}

impl Config {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let var_or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let server_addr: SocketAddr = var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let redirect_uri = var("REDIRECT_URI")
            .unwrap_or_else(|| format!("http://{}{}", server_addr, DEFAULT_CALLBACK_PATH));
        Url::parse(&redirect_uri).map_err(|e| ConfigError::Invalid {
            name: "REDIRECT_URI",
            reason: e.to_string(),
        })?;

        let google_auth_url = var_or("GOOGLE_AUTH_URL", DEFAULT_GOOGLE_AUTH_URL);
        Url::parse(&google_auth_url).map_err(|e| ConfigError::Invalid {
            name: "GOOGLE_AUTH_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            server_addr,
            redirect_uri,
            spotify_api_url: trim_url(var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
            spotify_token_url: var_or("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            youtube_api_url: trim_url(var_or("YOUTUBE_API_URL", DEFAULT_YOUTUBE_API_URL)),
            google_auth_url,
            google_token_url: var_or("GOOGLE_TOKEN_URL", DEFAULT_GOOGLE_TOKEN_URL),
            youtube_scope: var_or("YOUTUBE_SCOPE", DEFAULT_YOUTUBE_SCOPE),
            secrets_url: var("SECRETS_URL").map(trim_url),
            secrets_key: var("SECRETS_KEY"),
            request_interval: Duration::from_millis(parse_u64(
                var("REQUEST_INTERVAL_MS"),
                "REQUEST_INTERVAL_MS",
                DEFAULT_REQUEST_INTERVAL_MS,
            )?),
            session_ttl: Duration::from_secs(parse_u64(
                var("SESSION_TTL_SECS"),
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
        })
    }

    /// Path component of the redirect URI, used as the callback route.
    pub fn callback_path(&self) -> String {
        match Url::parse(&self.redirect_uri) {
            Ok(url) if url.path() != "/" => url.path().to_string(),
            _ => DEFAULT_CALLBACK_PATH.to_string(),
        }
    }
}

fn parse_u64(value: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
