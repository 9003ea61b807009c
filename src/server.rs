use std::net::SocketAddr;

use axum::{Extension, Router, routing::get};
use tracing::info;

use crate::{Res, api};

/// Routes of the local server: `/health` plus the OAuth redirect target at
/// `callback_path`.
pub fn router(callback_path: &str, state: api::CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::callback))
        .layer(Extension(state))
}

pub async fn start_api_server(
    addr: SocketAddr,
    callback_path: &str,
    state: api::CallbackState,
) -> Res<()> {
    let app = router(callback_path, state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, callback_path, "callback server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
