use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    convert::{PlaylistAssembler, Progress},
    error,
    error::SourceError,
    management::{
        AuthManager, FileStorage, SecretStore, SessionStorage,
        secrets::{SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET},
    },
    spotify::SourceCatalogClient,
    success,
    types::{PlaylistCreationOutcome, PlaylistReference, SourcePlaylist, TrackDescriptor, TrackTableRow},
    utils, warning,
    youtube::{YouTubeClient, auth::OAuthClient},
};

pub fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

fn track_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

pub async fn fetch_source(config: &Config, secrets: &dyn SecretStore, url: &str) -> SourcePlaylist {
    let reference = match PlaylistReference::parse(url)
        .ok_or_else(|| SourceError::InvalidReference(url.to_string()))
    {
        Ok(reference) => reference,
        Err(e) => error!("{}. Copy the link from Spotify's Share menu.", e),
    };

    let (client_id, client_secret) = match (
        secrets.get_secret(SPOTIFY_CLIENT_ID).await,
        secrets.get_secret(SPOTIFY_CLIENT_SECRET).await,
    ) {
        (Ok(id), Ok(secret)) => (id, secret),
        (Err(e), _) | (_, Err(e)) => error!("Spotify credentials unavailable: {}", e),
    };

    let client = SourceCatalogClient::new(
        config.spotify_api_url.as_str(),
        config.spotify_token_url.as_str(),
        client_id,
        client_secret,
    );

    let pb = spinner("Fetching Spotify playlist...");
    let playlist = client.fetch_playlist(reference.id()).await;
    pb.finish_and_clear();

    match playlist {
        Ok(playlist) => playlist,
        Err(e) => error!("{}", e),
    }
}

pub fn build_auth_manager(
    config: &Config,
    secrets: Arc<dyn SecretStore>,
    storage: Arc<dyn SessionStorage>,
) -> AuthManager {
    let oauth = OAuthClient::new(
        config.google_auth_url.as_str(),
        config.google_token_url.as_str(),
        config.redirect_uri.as_str(),
        config.youtube_scope.as_str(),
    );
    AuthManager::new(oauth, secrets, storage, config.session_ttl)
}

/// Assembler over file-backed session storage, reporting per-track progress
/// on the returned bar.
pub fn build_assembler(config: &Config, secrets: Arc<dyn SecretStore>) -> (PlaylistAssembler, ProgressBar) {
    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::in_data_dir());
    let auth = build_auth_manager(config, Arc::clone(&secrets), storage);
    let catalog = Arc::new(YouTubeClient::new(config.youtube_api_url.as_str()));

    let pb = track_progress_bar();
    let progress = pb.clone();
    let assembler = PlaylistAssembler::new(auth, catalog, secrets)
        .with_request_interval(config.request_interval)
        .with_progress(move |event| {
            let (message, done, total) = match event {
                Progress::Resolving { done, total } => ("Searching YouTube", done, total),
                Progress::Attaching { done, total } => ("Adding to playlist", done, total),
            };
            progress.set_message(message);
            progress.set_length(total as u64);
            progress.set_position(done as u64);
        });

    (assembler, pb)
}

pub fn print_tracks(tracks: &[TrackDescriptor]) {
    let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
}

pub fn report_outcome(outcome: &PlaylistCreationOutcome) {
    success!(
        "YouTube playlist created: {}",
        utils::youtube_playlist_url(&outcome.destination_playlist_id)
    );
    success!("{} tracks added.", outcome.resolved_count);

    if !outcome.unresolved_tracks.is_empty() {
        warning!(
            "{} tracks could not be found or added:",
            outcome.unresolved_tracks.len()
        );
        print_tracks(&outcome.unresolved_tracks);
    }
}
