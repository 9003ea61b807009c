use axum::{Extension, extract::Query, response::Html};
use serde::Deserialize;

use crate::{api::CallbackState, utils, warning};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// OAuth redirect target. `code` and `state` resume the parked conversion,
/// `error` means the user denied consent.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared): Extension<CallbackState>,
) -> Html<String> {
    if let Some(reason) = params.error {
        let err = shared.assembler.deny(&reason).await;
        warning!("{}", err);
        *shared.outcome.lock().await = Some(Err(err.to_string()));
        return Html("<h4>Authorization was denied.</h4><p>Close this window.</p>".to_string());
    }

    let (Some(code), Some(state)) = (params.code, params.state) else {
        return Html("<h4>Missing authorization code.</h4>".to_string());
    };

    match shared.assembler.resume(&code, &state).await {
        Ok(outcome) => {
            let page = format!(
                "<h2>Playlist created.</h2><p>{} tracks added, {} not found.</p><p><a href=\"{}\">Open on YouTube</a></p><p>Close this window.</p>",
                outcome.resolved_count,
                outcome.unresolved_tracks.len(),
                utils::youtube_playlist_url(&outcome.destination_playlist_id)
            );
            *shared.outcome.lock().await = Some(Ok(outcome));
            Html(page)
        }
        Err(e) => {
            warning!("Conversion failed: {}", e);
            *shared.outcome.lock().await = Some(Err(e.to_string()));
            Html("<h4>Conversion failed.</h4><p>Check the terminal and try again.</p>".to_string())
        }
    }
}
