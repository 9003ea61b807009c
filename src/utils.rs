use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::{RequestBuilder, Response, StatusCode};
use sha2::{Digest, Sha256};
use tokio::time::sleep;
use tracing::warn;

use crate::types::TrackDescriptor;

const STATE_TOKEN_LEN: usize = 32;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const MAX_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(2);

pub const IMPORTED_SUFFIX: &str = " - Imported";
pub const FALLBACK_PLAYLIST_TITLE: &str = "Imported from Spotify";

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random anti-forgery token round-tripped through the OAuth redirect.
pub fn generate_state_token() -> String {
    random_alphanumeric(STATE_TOKEN_LEN)
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Compares two state tokens through their digests so the comparison time does
/// not depend on the length of a common prefix.
pub fn states_match(expected: &str, received: &str) -> bool {
    Sha256::digest(expected.as_bytes()) == Sha256::digest(received.as_bytes())
}

/// Search query for a track: `"<title> <primary artist>"`, blanks skipped.
pub fn search_query(track: &TrackDescriptor) -> String {
    [track.title.trim(), track.primary_artist.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn imported_title(source_title: &str) -> String {
    let source_title = source_title.trim();
    if source_title.is_empty() {
        format!("{}{}", FALLBACK_PLAYLIST_TITLE, IMPORTED_SUFFIX)
    } else {
        format!("{}{}", source_title, IMPORTED_SUFFIX)
    }
}

pub fn youtube_playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

/// Sends a request, waiting out rate limits.
///
/// 429 responses are retried after their `Retry-After` delay when it is at most
/// two minutes; 502 responses are retried after a short pause. The last
/// response is returned as is once the attempts are used up, so callers still
/// see the failing status.
pub async fn send_with_backoff(request: RequestBuilder) -> Result<Response, reqwest::Error> {
    let mut attempt = 1;
    loop {
        let Some(builder) = request.try_clone() else {
            return request.send().await;
        };
        let response = builder.send().await?;

        if attempt >= MAX_ATTEMPTS {
            return Ok(response);
        }

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after > MAX_RETRY_AFTER_SECS {
                    warn!(retry_after, "rate limit delay too long, giving up");
                    return Ok(response);
                }
                sleep(Duration::from_secs(retry_after)).await;
            }
            StatusCode::BAD_GATEWAY => sleep(BAD_GATEWAY_DELAY).await,
            _ => return Ok(response),
        }
        attempt += 1;
    }
}
