use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::spotify::playlist::extract_playlist_id;

/// Seconds before the reported expiry at which a credential is considered stale.
const EXPIRY_MARGIN_SECS: i64 = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistReference {
    source_playlist_id: String,
}

impl PlaylistReference {
    /// Parses a user supplied playlist link. Anything that is not a playlist
    /// link yields `None`, never a partial id.
    pub fn parse(url: &str) -> Option<Self> {
        extract_playlist_id(url).map(|source_playlist_id| Self { source_playlist_id })
    }

    pub fn id(&self) -> &str {
        &self.source_playlist_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    pub primary_artist: String,
    pub ordinal_position: usize,
}

impl TrackDescriptor {
    pub fn new(title: impl Into<String>, primary_artist: impl Into<String>, ordinal_position: usize) -> Self {
        Self {
            title: title.into(),
            primary_artist: primary_artist.into(),
            ordinal_position,
        }
    }
}

/// The only state that survives the OAuth redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub anti_forgery_state: String,
    pub code_verifier: String,
    pub pending_playlist_title: String,
    pub pending_tracks: Vec<TrackDescriptor>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationCredential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

impl DestinationCredential {
    /// An `expires_in` that does not fit a timestamp leaves the expiry unset.
    pub fn from_token_response(token: TokenResponse, previous_refresh: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token.or(previous_refresh),
            expiry: token
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry
                .checked_sub_signed(Duration::seconds(EXPIRY_MARGIN_SECS))
                .is_none_or(|deadline| now >= deadline),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub track: TrackDescriptor,
    pub matched_item_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistCreationOutcome {
    pub destination_playlist_id: String,
    pub resolved_count: usize,
    pub unresolved_tracks: Vec<TrackDescriptor>,
}

#[derive(Debug, Clone)]
pub struct SourcePlaylist {
    pub name: String,
    pub tracks: Vec<TrackDescriptor>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artist: String,
}

impl From<&TrackDescriptor> for TrackTableRow {
    fn from(track: &TrackDescriptor) -> Self {
        Self {
            position: track.ordinal_position + 1,
            title: track.title.clone(),
            artist: track.primary_artist.clone(),
        }
    }
}

// Spotify wire types

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentialsToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistDetails {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<SourceTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceTrack {
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SourceArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceArtist {
    pub name: Option<String>,
}

// YouTube / Google wire types

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSnippet {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPlaylistItemRequest {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub playlist_id: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    pub video_id: String,
}
