use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    error::ApiError,
    types::{ResolutionResult, TrackDescriptor},
    utils,
    youtube::{DestinationCatalog, SearchAuth},
};

/// Maps a source track to a YouTube video.
///
/// Takes the first candidate of the search, in YouTube's own relevance order.
/// There is no scoring on top of that.
pub struct TrackResolver {
    catalog: Arc<dyn DestinationCatalog>,
}

impl TrackResolver {
    pub fn new(catalog: Arc<dyn DestinationCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolves a track. Search failures are logged and count as no match,
    /// except a rejected bearer credential: that one is handed to the caller,
    /// since every following search would fail the same way.
    pub async fn resolve(
        &self,
        track: &TrackDescriptor,
        auth: &SearchAuth,
    ) -> Result<ResolutionResult, ApiError> {
        let matched_item_id = match self.try_resolve(track, auth).await {
            Ok(matched) => matched,
            Err(ApiError::Unauthorized) if matches!(auth, SearchAuth::Bearer(_)) => {
                return Err(ApiError::Unauthorized);
            }
            Err(e) => {
                warn!(
                    position = track.ordinal_position,
                    title = %track.title,
                    error = %e,
                    "search failed"
                );
                None
            }
        };

        Ok(ResolutionResult {
            track: track.clone(),
            matched_item_id,
        })
    }

    /// Like [`resolve`](Self::resolve) but hands every search failure to the caller.
    /// A search without candidates is `Ok(None)`.
    pub async fn try_resolve(
        &self,
        track: &TrackDescriptor,
        auth: &SearchAuth,
    ) -> Result<Option<String>, ApiError> {
        let query = utils::search_query(track);
        if query.is_empty() {
            debug!(position = track.ordinal_position, "track has neither title nor artist");
            return Ok(None);
        }

        let candidates = self.catalog.search_videos(&query, auth).await?;
        let matched = candidates.into_iter().next();
        if matched.is_none() {
            debug!(position = track.ordinal_position, %query, "no search results");
        }
        Ok(matched)
    }
}
