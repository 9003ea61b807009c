//! Error taxonomy.
//!
//! Every component translates transport and protocol failures into one of the
//! enums below before handing them to its caller, so no raw `reqwest` error
//! crosses a component boundary.

use thiserror::Error;

/// Failures of the source catalog (Spotify) side.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("'{0}' is not a Spotify playlist link")]
    InvalidReference(String),

    #[error("could not authenticate against Spotify: {0}")]
    UpstreamAuth(String),

    #[error("could not fetch playlist {playlist_id}: {reason}. Make sure the playlist is public")]
    UpstreamFetch { playlist_id: String, reason: String },
}

/// Failures of the destination authorization flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization state does not match any pending session, restart the conversion")]
    StateMismatch,

    #[error("YouTube rejected the authorization code: {0}")]
    TokenExchange(String),

    #[error("YouTube consent was denied: {0}")]
    ConsentDenied(String),

    #[error("authorization is misconfigured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

/// Failures of a single destination catalog API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("YouTube rejected the credential")]
    Unauthorized,

    #[error("YouTube returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to YouTube failed: {0}")]
    Transport(String),

    #[error("unexpected response from YouTube: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Failures of the playlist conversion as a whole.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("a conversion is already running")]
    AlreadyRunning,

    #[error("a conversion is already waiting for YouTube authorization; finish it or run `playconv auth reset`")]
    AuthorizationPending,

    #[error("failed to create YouTube playlist: {0}")]
    PlaylistCreate(String),

    #[error("YouTube rejected the cached credential, run the conversion again to re-authorize")]
    CredentialRejected,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session value is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret {0} is not set")]
    Missing(String),

    #[error("secret store is read-only, cannot write {0}")]
    ReadOnly(String),

    #[error("secret store request failed: {0}")]
    Remote(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
