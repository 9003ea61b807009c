use reqwest::{Client, Url};
use tracing::debug;

use crate::{error::AuthError, types::TokenResponse, utils};

/// Google OAuth 2.0 endpoints used by the authorization-code flow.
pub struct OAuthClient {
    client: Client,
    auth_url: String,
    token_url: String,
    redirect_uri: String,
    scope: String,
}

impl OAuthClient {
    pub fn new(
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            auth_url: auth_url.into(),
            token_url: token_url.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Builds the consent screen URL.
    ///
    /// Requests offline access with a forced consent prompt so Google hands out
    /// a refresh token, and carries the anti-forgery state plus the PKCE
    /// challenge derived from `code_verifier`.
    pub fn consent_url(&self, client_id: &str, state: &str, code_verifier: &str) -> Result<String, AuthError> {
        let code_challenge = utils::generate_code_challenge(code_verifier);
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", client_id),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", self.scope.as_str()),
                ("access_type", "offline"),
                ("state", state),
                ("prompt", "consent"),
                ("code_challenge", code_challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("invalid authorization url: {}", e)))?;

        Ok(url.to_string())
    }

    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let request = self.client.post(&self.token_url).form(form);
        let response = utils::send_with_backoff(request)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, %body, "token endpoint rejected request");
            return Err(AuthError::TokenExchange(format!(
                "token endpoint returned {}",
                status
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))
    }
}
