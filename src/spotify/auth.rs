use reqwest::Client;
use tracing::debug;

use crate::{error::SourceError, types::ClientCredentialsToken, utils};

/// Obtains an app-level bearer token through the client-credentials grant.
///
/// The client id and secret are sent as a Basic authorization header, the
/// grant type as a form body. Any failure, including a non-success status,
/// is reported as [`SourceError::UpstreamAuth`].
pub async fn client_credentials_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, SourceError> {
    let request = client
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")]);

    let response = utils::send_with_backoff(request)
        .await
        .map_err(|e| SourceError::UpstreamAuth(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, %body, "client credentials grant rejected");
        return Err(SourceError::UpstreamAuth(format!(
            "token endpoint returned {}",
            status
        )));
    }

    let token = response
        .json::<ClientCredentialsToken>()
        .await
        .map_err(|e| SourceError::UpstreamAuth(e.to_string()))?;

    Ok(token.access_token)
}
