//! # YouTube Integration Module
//!
//! Destination catalog access: playlist creation, video search, playlist item
//! insertion ([`YouTubeClient`]) and the Google OAuth 2.0 endpoints
//! ([`auth::OAuthClient`]).
//!
//! The catalog operations sit behind the [`DestinationCatalog`] trait so that
//! the resolver and assembler can be exercised without the network.
//!
//! ## Credentials
//!
//! Mutating calls (create, insert) always use the OAuth bearer credential.
//! The read-only search call uses the API key when one is configured and falls
//! back to the bearer credential otherwise.
//!
//! A 401 from any call is reported as [`ApiError::Unauthorized`] so the caller
//! can drop the cached credential instead of retrying with it.

pub mod auth;
mod client;

use async_trait::async_trait;

use crate::error::ApiError;

pub use client::YouTubeClient;

/// How the search request authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAuth {
    ApiKey(String),
    Bearer(String),
}

#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Creates an empty playlist and returns its id.
    async fn create_playlist(
        &self,
        access_token: &str,
        title: &str,
        description: &str,
    ) -> Result<String, ApiError>;

    /// Searches videos and returns candidate ids in relevance order.
    async fn search_videos(&self, query: &str, auth: &SearchAuth) -> Result<Vec<String>, ApiError>;

    /// Appends a video to a playlist.
    async fn insert_playlist_item(
        &self,
        access_token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError>;
}
