use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    error::ApiError,
    types::{
        AddPlaylistItemRequest, CreatePlaylistRequest, CreatePlaylistResponse, PlaylistItemSnippet,
        PlaylistSnippet, ResourceId, SearchResponse,
    },
    utils,
    youtube::{DestinationCatalog, SearchAuth},
};

const VIDEO_KIND: &str = "youtube#video";

/// YouTube Data API v3 client.
pub struct YouTubeClient {
    client: Client,
    api_url: String,
}

impl YouTubeClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl DestinationCatalog for YouTubeClient {
    async fn create_playlist(
        &self,
        access_token: &str,
        title: &str,
        description: &str,
    ) -> Result<String, ApiError> {
        let body = CreatePlaylistRequest {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: description.to_string(),
            },
        };

        let request = self
            .client
            .post(format!("{}/playlists", self.api_url))
            .query(&[("part", "snippet")])
            .bearer_auth(access_token)
            .json(&body);

        let response = check_status(utils::send_with_backoff(request).await?).await?;
        let playlist = response.json::<CreatePlaylistResponse>().await?;
        Ok(playlist.id)
    }

    async fn search_videos(&self, query: &str, auth: &SearchAuth) -> Result<Vec<String>, ApiError> {
        let mut request = self
            .client
            .get(format!("{}/search", self.api_url))
            .query(&[("part", "snippet"), ("q", query), ("type", "video")]);

        request = match auth {
            SearchAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            SearchAuth::Bearer(token) => request.bearer_auth(token),
        };

        let response = check_status(utils::send_with_backoff(request).await?).await?;
        let result = response.json::<SearchResponse>().await?;

        Ok(result
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn insert_playlist_item(
        &self,
        access_token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError> {
        let body = AddPlaylistItemRequest {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: VIDEO_KIND.to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        let request = self
            .client
            .post(format!("{}/playlistItems", self.api_url))
            .query(&[("part", "snippet")])
            .bearer_auth(access_token)
            .json(&body);

        check_status(utils::send_with_backoff(request).await?).await?;
        Ok(())
    }
}
