use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::{
    error::{AuthError, StorageError},
    management::{
        secrets::{GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET, GOOGLE_REFRESH_TOKEN, SecretStore},
        storage::{
            AUTH_SESSION_KEY, CREDENTIAL_KEY, CREDENTIAL_REJECTED_KEY, SessionStorage, load_json, store_json,
            take_json,
        },
    },
    types::{AuthSession, DestinationCredential, TrackDescriptor},
    utils,
    youtube::auth::OAuthClient,
};

/// Where the destination authorization currently stands.
///
/// `Authenticated` lasts until an API call rejects the credential, then the
/// manager goes back to `Idle`. `Failed` is left by starting a new
/// authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingConsent,
    ExchangingCode,
    Authenticated,
    Failed,
}

/// Where to send the user to grant consent.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub consent_url: String,
    pub state: String,
}

/// Result of a successful callback: the credential plus the conversion that
/// was waiting for it.
#[derive(Debug, Clone)]
pub struct CompletedAuthorization {
    pub credential: DestinationCredential,
    pub pending_title: String,
    pub pending_tracks: Vec<TrackDescriptor>,
}

/// Owns the YouTube authorization-code flow and the resulting credential.
///
/// Only [`AuthSession`] and the cached credential live in the injected
/// [`SessionStorage`]; everything else is rebuilt when a new process picks up
/// the callback.
pub struct AuthManager {
    oauth: OAuthClient,
    secrets: Arc<dyn SecretStore>,
    storage: Arc<dyn SessionStorage>,
    session_ttl: Duration,
    state: AuthState,
    credential: Option<DestinationCredential>,
}

impl AuthManager {
    pub fn new(
        oauth: OAuthClient,
        secrets: Arc<dyn SecretStore>,
        storage: Arc<dyn SessionStorage>,
        session_ttl: StdDuration,
    ) -> Self {
        Self {
            oauth,
            secrets,
            storage,
            session_ttl: Duration::from_std(session_ttl).unwrap_or(Duration::MAX),
            state: AuthState::Idle,
            credential: None,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn credential(&self) -> Option<&DestinationCredential> {
        self.credential.as_ref()
    }

    /// Returns a usable credential, or `None` when the user has to go through
    /// the consent screen.
    ///
    /// Looks at the in-memory credential, then the cached one in session
    /// storage, then a refresh token kept in the secret store. Expired
    /// credentials are refreshed when they carry a refresh token.
    pub async fn valid_credential(&mut self) -> Result<Option<DestinationCredential>, AuthError> {
        if self.credential.is_none() {
            self.credential = load_json(&*self.storage, CREDENTIAL_KEY).await?;
        }

        if self.credential.is_none() && !self.credential_rejected().await? {
            if let Some(credential) = self.credential_from_stored_refresh_token().await {
                store_json(&*self.storage, CREDENTIAL_KEY, &credential).await?;
                self.credential = Some(credential);
            }
        }

        let Some(credential) = self.credential.clone() else {
            if self.state == AuthState::Authenticated {
                self.state = AuthState::Idle;
            }
            return Ok(None);
        };

        if !credential.is_expired(Utc::now()) {
            self.state = AuthState::Authenticated;
            return Ok(Some(credential));
        }

        let Some(refresh_token) = credential.refresh_token.as_deref() else {
            debug!("cached credential expired without refresh token");
            self.invalidate().await?;
            return Ok(None);
        };

        match self.refresh(refresh_token).await {
            Ok(fresh) => {
                store_json(&*self.storage, CREDENTIAL_KEY, &fresh).await?;
                self.credential = Some(fresh.clone());
                self.state = AuthState::Authenticated;
                Ok(Some(fresh))
            }
            Err(e) => {
                warn!(error = %e, "credential refresh failed");
                self.invalidate().await?;
                Ok(None)
            }
        }
    }

    /// Starts the authorization-code flow for a conversion.
    ///
    /// Persists an [`AuthSession`] holding a fresh anti-forgery state, the
    /// PKCE verifier and the pending conversion, then returns the consent URL.
    /// The caller navigates there; the flow continues in
    /// [`complete_authorization`](Self::complete_authorization), possibly in
    /// another process.
    pub async fn begin_authorization(
        &mut self,
        pending_title: &str,
        pending_tracks: &[TrackDescriptor],
    ) -> Result<AuthorizationRedirect, AuthError> {
        let result = self.try_begin(pending_title, pending_tracks).await;
        self.state = match result {
            Ok(_) => AuthState::AwaitingConsent,
            Err(_) => AuthState::Failed,
        };
        result
    }

    async fn try_begin(
        &self,
        pending_title: &str,
        pending_tracks: &[TrackDescriptor],
    ) -> Result<AuthorizationRedirect, AuthError> {
        let client_id = self.secrets.get_secret(GOOGLE_CLIENT_ID).await?;
        let state = utils::generate_state_token();
        let code_verifier = utils::generate_code_verifier();
        let consent_url = self.oauth.consent_url(&client_id, &state, &code_verifier)?;

        let session = AuthSession {
            anti_forgery_state: state.clone(),
            code_verifier,
            pending_playlist_title: pending_title.to_string(),
            pending_tracks: pending_tracks.to_vec(),
            created_at: Utc::now(),
        };
        store_json(&*self.storage, AUTH_SESSION_KEY, &session).await?;
        debug!(tracks = pending_tracks.len(), "authorization session stored");

        Ok(AuthorizationRedirect { consent_url, state })
    }

    /// The pending session, if one exists and has not outlived its TTL.
    /// Stale or unreadable sessions are dropped.
    pub async fn pending_session(&self) -> Result<Option<AuthSession>, AuthError> {
        let session: Option<AuthSession> = match load_json(&*self.storage, AUTH_SESSION_KEY).await {
            Ok(session) => session,
            Err(StorageError::Serde(e)) => {
                warn!(error = %e, "dropping unreadable authorization session");
                self.storage.remove(AUTH_SESSION_KEY).await?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        match session {
            Some(session) if session.is_stale(Utc::now(), self.session_ttl) => {
                debug!("dropping stale authorization session");
                self.storage.remove(AUTH_SESSION_KEY).await?;
                Ok(None)
            }
            session => Ok(session),
        }
    }

    /// Handles the OAuth callback.
    ///
    /// The received `state` must equal the stored anti-forgery state, otherwise
    /// the token endpoint is never contacted. A matching session is consumed
    /// before the exchange, so replaying the same callback fails with
    /// [`AuthError::StateMismatch`].
    pub async fn complete_authorization(
        &mut self,
        code: &str,
        state: &str,
    ) -> Result<CompletedAuthorization, AuthError> {
        let matches = self
            .pending_session()
            .await?
            .is_some_and(|session| utils::states_match(&session.anti_forgery_state, state));
        if !matches {
            warn!("authorization callback does not match a pending session");
            self.state = AuthState::Failed;
            return Err(AuthError::StateMismatch);
        }

        let session: Option<AuthSession> = take_json(&*self.storage, AUTH_SESSION_KEY).await?;
        let Some(session) =
            session.filter(|session| utils::states_match(&session.anti_forgery_state, state))
        else {
            self.state = AuthState::Failed;
            return Err(AuthError::StateMismatch);
        };

        self.state = AuthState::ExchangingCode;
        let credential = match self.exchange(code, &session.code_verifier).await {
            Ok(credential) => credential,
            Err(e) => {
                self.state = AuthState::Failed;
                return Err(e);
            }
        };

        store_json(&*self.storage, CREDENTIAL_KEY, &credential).await?;
        self.storage.remove(CREDENTIAL_REJECTED_KEY).await?;
        if let Some(refresh_token) = &credential.refresh_token {
            if let Err(e) = self.secrets.set_secret(GOOGLE_REFRESH_TOKEN, refresh_token).await {
                warn!(error = %e, "refresh token kept in session storage only");
            }
        }

        self.credential = Some(credential.clone());
        self.state = AuthState::Authenticated;

        Ok(CompletedAuthorization {
            credential,
            pending_title: session.pending_playlist_title,
            pending_tracks: session.pending_tracks,
        })
    }

    /// Marks the flow as failed after the user denied consent and drops the
    /// pending session.
    pub async fn deny(&mut self, reason: &str) -> AuthError {
        if let Err(e) = self.storage.remove(AUTH_SESSION_KEY).await {
            warn!(error = %e, "could not drop denied authorization session");
        }
        self.state = AuthState::Failed;
        AuthError::ConsentDenied(reason.to_string())
    }

    /// Drops the credential after the destination rejected it. The rejection
    /// is persisted, so the next process asks for consent as well.
    pub async fn invalidate(&mut self) -> Result<(), AuthError> {
        self.credential = None;
        self.storage
            .set(CREDENTIAL_REJECTED_KEY, &Utc::now().to_rfc3339())
            .await?;
        self.storage.remove(CREDENTIAL_KEY).await?;
        self.state = AuthState::Idle;
        Ok(())
    }

    /// Forgets the pending session and the cached credential.
    pub async fn reset(&mut self) -> Result<(), AuthError> {
        self.storage.remove(AUTH_SESSION_KEY).await?;
        self.invalidate().await
    }

    async fn exchange(&self, code: &str, code_verifier: &str) -> Result<DestinationCredential, AuthError> {
        let client_id = self.secrets.get_secret(GOOGLE_CLIENT_ID).await?;
        let client_secret = self.secrets.get_secret(GOOGLE_CLIENT_SECRET).await?;
        let token = self
            .oauth
            .exchange_code(&client_id, &client_secret, code, code_verifier)
            .await?;
        Ok(DestinationCredential::from_token_response(token, None, Utc::now()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<DestinationCredential, AuthError> {
        let client_id = self.secrets.get_secret(GOOGLE_CLIENT_ID).await?;
        let client_secret = self.secrets.get_secret(GOOGLE_CLIENT_SECRET).await?;
        let token = self
            .oauth
            .refresh(&client_id, &client_secret, refresh_token)
            .await?;
        Ok(DestinationCredential::from_token_response(
            token,
            Some(refresh_token.to_string()),
            Utc::now(),
        ))
    }

    async fn credential_rejected(&self) -> Result<bool, AuthError> {
        Ok(self.storage.get(CREDENTIAL_REJECTED_KEY).await?.is_some())
    }

    async fn credential_from_stored_refresh_token(&self) -> Option<DestinationCredential> {
        let refresh_token = self.secrets.get_secret(GOOGLE_REFRESH_TOKEN).await.ok()?;
        match self.refresh(&refresh_token).await {
            Ok(credential) => Some(credential),
            Err(e) => {
                debug!(error = %e, "stored refresh token not usable");
                None
            }
        }
    }
}
