use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    convert::TrackResolver,
    error::{ApiError, ConvertError},
    management::{AuthManager, AuthState, AuthorizationRedirect, SecretStore, secrets::YOUTUBE_API_KEY},
    types::{DestinationCredential, PlaylistCreationOutcome, ResolutionResult, TrackDescriptor},
    utils,
    youtube::{DestinationCatalog, SearchAuth},
};

pub const PLAYLIST_DESCRIPTION: &str = "Playlist imported from Spotify using Playlist Converter";

/// What a conversion attempt ended in.
#[derive(Debug)]
pub enum Conversion {
    Completed(PlaylistCreationOutcome),
    /// The user has to grant consent first. The tracks are parked in the
    /// authorization session and the conversion resumes from the callback.
    AuthorizationRequired(AuthorizationRedirect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Resolving { done: usize, total: usize },
    Attaching { done: usize, total: usize },
}

type ProgressFn = Box<dyn Fn(Progress) + Send + Sync>;

/// Clears the in-flight flag when a conversion ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ConvertError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConvertError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Creates the YouTube playlist and fills it track by track.
pub struct PlaylistAssembler {
    auth: Mutex<AuthManager>,
    catalog: Arc<dyn DestinationCatalog>,
    resolver: TrackResolver,
    secrets: Arc<dyn SecretStore>,
    request_interval: Duration,
    in_flight: AtomicBool,
    on_progress: Option<ProgressFn>,
}

impl PlaylistAssembler {
    pub fn new(
        auth: AuthManager,
        catalog: Arc<dyn DestinationCatalog>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            auth: Mutex::new(auth),
            resolver: TrackResolver::new(Arc::clone(&catalog)),
            catalog,
            secrets,
            request_interval: Duration::ZERO,
            in_flight: AtomicBool::new(false),
            on_progress: None,
        }
    }

    /// Pause between consecutive YouTube calls of the per-track loop.
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    pub fn with_progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    pub async fn auth_state(&self) -> AuthState {
        self.auth.lock().await.state()
    }

    /// Converts a track list into a YouTube playlist titled
    /// `"<source_title> - Imported"`.
    ///
    /// Without a usable credential this starts the authorization flow and
    /// returns [`Conversion::AuthorizationRequired`]; the work then continues in
    /// [`resume`](Self::resume). A second call while a conversion is running,
    /// or while one waits for consent, is refused.
    pub async fn convert(
        &self,
        tracks: Vec<TrackDescriptor>,
        source_title: &str,
    ) -> Result<Conversion, ConvertError> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let mut auth = self.auth.lock().await;

        if auth.pending_session().await?.is_some() {
            return Err(ConvertError::AuthorizationPending);
        }

        let Some(credential) = auth.valid_credential().await? else {
            info!(tracks = tracks.len(), "YouTube authorization required");
            let redirect = auth.begin_authorization(source_title, &tracks).await?;
            return Ok(Conversion::AuthorizationRequired(redirect));
        };

        let outcome = self
            .assemble(&mut auth, &credential, tracks, source_title)
            .await?;
        Ok(Conversion::Completed(outcome))
    }

    /// Completes the authorization from the OAuth callback and finishes the
    /// conversion that was parked in the session.
    pub async fn resume(&self, code: &str, state: &str) -> Result<PlaylistCreationOutcome, ConvertError> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let mut auth = self.auth.lock().await;

        let completed = auth.complete_authorization(code, state).await?;
        self.assemble(
            &mut auth,
            &completed.credential,
            completed.pending_tracks,
            &completed.pending_title,
        )
        .await
    }

    /// Abandons the pending conversion after the user denied consent.
    pub async fn deny(&self, reason: &str) -> ConvertError {
        let mut auth = self.auth.lock().await;
        ConvertError::Auth(auth.deny(reason).await)
    }

    /// Drops the pending session and the cached credential.
    pub async fn reset(&self) -> Result<(), ConvertError> {
        let mut auth = self.auth.lock().await;
        auth.reset().await?;
        Ok(())
    }

    async fn assemble(
        &self,
        auth: &mut AuthManager,
        credential: &DestinationCredential,
        mut tracks: Vec<TrackDescriptor>,
        source_title: &str,
    ) -> Result<PlaylistCreationOutcome, ConvertError> {
        tracks.sort_by_key(|track| track.ordinal_position);
        let title = utils::imported_title(source_title);

        let playlist_id = match self
            .catalog
            .create_playlist(&credential.access_token, &title, PLAYLIST_DESCRIPTION)
            .await
        {
            Ok(id) => id,
            Err(ApiError::Unauthorized) => {
                auth.invalidate().await?;
                return Err(ConvertError::CredentialRejected);
            }
            Err(e) => return Err(ConvertError::PlaylistCreate(e.to_string())),
        };
        info!(%playlist_id, %title, "created playlist");

        let search_auth = self.search_auth(credential).await;
        let mut rejected = false;
        let mut requests = 0usize;

        let total = tracks.len();
        let mut results: Vec<ResolutionResult> = Vec::with_capacity(total);
        for (done, track) in tracks.into_iter().enumerate() {
            let result = if rejected {
                ResolutionResult {
                    track,
                    matched_item_id: None,
                }
            } else {
                self.pace(requests).await;
                requests += 1;
                match self.resolver.resolve(&track, &search_auth).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("search rejected the credential, skipping remaining searches");
                        rejected = true;
                        ResolutionResult {
                            track,
                            matched_item_id: None,
                        }
                    }
                }
            };
            results.push(result);
            self.report(Progress::Resolving {
                done: done + 1,
                total,
            });
        }

        let matched_total = results
            .iter()
            .filter(|result| result.matched_item_id.is_some())
            .count();
        let mut attached = 0usize;
        let mut resolved_count = 0usize;
        let mut unresolved_tracks: Vec<TrackDescriptor> = Vec::new();

        for result in results {
            let Some(video_id) = result.matched_item_id else {
                unresolved_tracks.push(result.track);
                continue;
            };

            if rejected {
                unresolved_tracks.push(result.track);
            } else {
                self.pace(requests).await;
                requests += 1;
                match self
                    .catalog
                    .insert_playlist_item(&credential.access_token, &playlist_id, &video_id)
                    .await
                {
                    Ok(()) => resolved_count += 1,
                    Err(ApiError::Unauthorized) => {
                        warn!("insert rejected the credential, skipping remaining inserts");
                        rejected = true;
                        unresolved_tracks.push(result.track);
                    }
                    Err(e) => {
                        warn!(position = result.track.ordinal_position, %video_id, error = %e, "insert failed");
                        unresolved_tracks.push(result.track);
                    }
                }
            }

            attached += 1;
            self.report(Progress::Attaching {
                done: attached,
                total: matched_total,
            });
        }

        if rejected {
            if let Err(e) = auth.invalidate().await {
                warn!(error = %e, "could not drop rejected credential");
            }
        }

        debug!(resolved_count, unresolved = unresolved_tracks.len(), "conversion finished");
        Ok(PlaylistCreationOutcome {
            destination_playlist_id: playlist_id,
            resolved_count,
            unresolved_tracks,
        })
    }

    async fn search_auth(&self, credential: &DestinationCredential) -> SearchAuth {
        match self.secrets.get_secret(YOUTUBE_API_KEY).await {
            Ok(key) => SearchAuth::ApiKey(key),
            Err(_) => SearchAuth::Bearer(credential.access_token.clone()),
        }
    }

    async fn pace(&self, requests_so_far: usize) {
        if requests_so_far > 0 && !self.request_interval.is_zero() {
            sleep(self.request_interval).await;
        }
    }

    fn report(&self, progress: Progress) {
        if let Some(on_progress) = &self.on_progress {
            on_progress(progress);
        }
    }
}
