mod common;

use std::sync::Arc;

use common::{FakeCatalog, track};
use playconv::{convert::TrackResolver, error::ApiError, youtube::SearchAuth};

fn api_key() -> SearchAuth {
    SearchAuth::ApiKey("api-key".to_string())
}

#[tokio::test]
async fn test_first_candidate_wins() {
    let catalog = Arc::new(FakeCatalog::new().with_result("Song A Artist X", &["best", "second"]));
    let resolver = TrackResolver::new(catalog.clone());

    let result = resolver.resolve(&track("Song A", "Artist X", 3), &api_key()).await.unwrap();

    assert_eq!(result.track, track("Song A", "Artist X", 3));
    assert_eq!(result.matched_item_id.as_deref(), Some("best"));
    assert_eq!(catalog.search_queries(), vec!["Song A Artist X"]);
}

#[tokio::test]
async fn test_no_candidates_is_no_match() {
    let resolver = TrackResolver::new(Arc::new(FakeCatalog::new()));

    let result = resolver.resolve(&track("Obscure", "Nobody", 0), &api_key()).await.unwrap();

    assert!(result.matched_item_id.is_none());
}

#[tokio::test]
async fn test_search_failure_is_no_match() {
    let resolver = TrackResolver::new(Arc::new(FakeCatalog::new().with_failing_search("Song Artist")));

    let result = resolver.resolve(&track("Song", "Artist", 0), &api_key()).await.unwrap();
    assert!(result.matched_item_id.is_none());

    let raw = resolver.try_resolve(&track("Song", "Artist", 0), &api_key()).await;
    assert!(raw.is_err());
}

#[tokio::test]
async fn test_missing_artist_still_searches_title() {
    let catalog = Arc::new(FakeCatalog::new().with_result("Instrumental", &["vid"]));
    let resolver = TrackResolver::new(catalog.clone());

    let result = resolver.resolve(&track("Instrumental", "", 0), &api_key()).await.unwrap();

    assert_eq!(result.matched_item_id.as_deref(), Some("vid"));
}

#[tokio::test]
async fn test_blank_track_is_not_searched() {
    let catalog = Arc::new(FakeCatalog::new());
    let resolver = TrackResolver::new(catalog.clone());

    let result = resolver.resolve(&track(" ", "", 0), &api_key()).await.unwrap();

    assert!(result.matched_item_id.is_none());
    assert!(catalog.search_queries().is_empty());
}

#[tokio::test]
async fn test_rejected_bearer_is_handed_to_caller() {
    let resolver = TrackResolver::new(Arc::new(FakeCatalog::new().with_unauthorized_search()));

    let result = resolver
        .resolve(&track("Song", "Artist", 0), &SearchAuth::Bearer("ya29.expired".to_string()))
        .await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_rejected_api_key_is_no_match() {
    let resolver = TrackResolver::new(Arc::new(FakeCatalog::new().with_unauthorized_search()));

    let result = resolver.resolve(&track("Song", "Artist", 0), &api_key()).await.unwrap();

    assert!(result.matched_item_id.is_none());
}
