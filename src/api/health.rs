use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::CallbackState;

/// Liveness check of the callback server, including where the authorization
/// stands and whether the resumed conversion has finished.
pub async fn health(Extension(shared): Extension<CallbackState>) -> Json<Value> {
    let auth_state = shared.assembler.auth_state().await;
    let finished = shared.outcome.lock().await.is_some();

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "auth_state": format!("{:?}", auth_state),
        "conversion_finished": finished
    }))
}
