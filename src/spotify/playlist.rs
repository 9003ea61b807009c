use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::SourceError,
    spotify::auth,
    types::{PlaylistDetails, PlaylistItem, PlaylistTracksPage, SourcePlaylist, TrackDescriptor},
    utils,
};

const PAGE_LIMIT: u32 = 100;

static PLAYLIST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)playlist/([A-Za-z0-9]+)").expect("playlist id pattern is valid")
});

/// Extracts the playlist id from a Spotify playlist link.
///
/// Matches `playlist/<alphanumeric-id>` anywhere in the input, so both
/// `https://open.spotify.com/playlist/<id>?si=...` and bare `playlist/<id>`
/// work. Returns `None` for empty input, malformed links and links to other
/// resource types (albums, tracks, artists).
///
/// # Example
///
/// ```
/// let id = extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1?si=x");
/// assert_eq!(id.as_deref(), Some("37i9dQZF1"));
/// ```
pub fn extract_playlist_id(url: &str) -> Option<String> {
    PLAYLIST_ID
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read access to public Spotify playlists.
pub struct SourceCatalogClient {
    client: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl SourceCatalogClient {
    pub fn new(
        api_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    async fn app_token(&self) -> Result<String, SourceError> {
        auth::client_credentials_token(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
        )
        .await
    }

    /// Fetches name and tracks of a playlist with a single app token.
    pub async fn fetch_playlist(&self, playlist_id: &str) -> Result<SourcePlaylist, SourceError> {
        let token = self.app_token().await?;
        let name = self.fetch_name_with(&token, playlist_id).await?;
        let tracks = self.fetch_tracks_with(&token, playlist_id).await?;
        Ok(SourcePlaylist { name, tracks })
    }

    pub async fn fetch_playlist_name(&self, playlist_id: &str) -> Result<String, SourceError> {
        let token = self.app_token().await?;
        self.fetch_name_with(&token, playlist_id).await
    }

    /// Fetches the ordered track list of a playlist.
    ///
    /// Follows the `next` links of the paged listing; ordinal positions keep
    /// counting across pages and start at 0.
    pub async fn fetch_tracks(&self, playlist_id: &str) -> Result<Vec<TrackDescriptor>, SourceError> {
        let token = self.app_token().await?;
        self.fetch_tracks_with(&token, playlist_id).await
    }

    async fn fetch_name_with(&self, token: &str, playlist_id: &str) -> Result<String, SourceError> {
        let url = format!(
            "{api}/playlists/{id}?fields=name",
            api = self.api_url,
            id = playlist_id
        );
        let details: PlaylistDetails = self.get_json(token, &url, playlist_id).await?;
        Ok(details.name.unwrap_or_default())
    }

    async fn fetch_tracks_with(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<TrackDescriptor>, SourceError> {
        let mut tracks: Vec<TrackDescriptor> = Vec::new();
        let mut next = Some(format!(
            "{api}/playlists/{id}/tracks?offset=0&limit={limit}",
            api = self.api_url,
            id = playlist_id,
            limit = PAGE_LIMIT
        ));

        while let Some(url) = next {
            let page: PlaylistTracksPage = self.get_json(token, &url, playlist_id).await?;
            debug!(playlist_id, items = page.items.len(), "fetched track page");

            let offset = tracks.len();
            tracks.extend(
                page.items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| to_descriptor(item, offset + i)),
            );
            next = page.next;
        }

        Ok(tracks)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
        playlist_id: &str,
    ) -> Result<T, SourceError> {
        let fetch_error = |reason: String| SourceError::UpstreamFetch {
            playlist_id: playlist_id.to_string(),
            reason,
        };

        let request = self.client.get(url).bearer_auth(token);
        let response = utils::send_with_backoff(request)
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("Spotify returned {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| fetch_error(e.to_string()))
    }
}

fn to_descriptor(item: PlaylistItem, ordinal_position: usize) -> TrackDescriptor {
    let Some(track) = item.track else {
        return TrackDescriptor::new("", "", ordinal_position);
    };

    let primary_artist = track
        .artists
        .into_iter()
        .next()
        .and_then(|artist| artist.name)
        .unwrap_or_default();

    TrackDescriptor::new(
        track.name.unwrap_or_default().trim(),
        primary_artist.trim(),
        ordinal_position,
    )
}
