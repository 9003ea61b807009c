use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use indicatif::ProgressBar;

use crate::{
    api::{CallbackOutcome, CallbackState},
    cli::shared,
    config::Config,
    convert::{Conversion, PlaylistAssembler},
    error,
    error::ConvertError,
    info,
    management::{AuthorizationRedirect, secrets},
    server::start_api_server,
    warning,
};

const MAX_CALLBACK_WAIT: Duration = Duration::from_secs(300);

/// Converts the Spotify playlist behind `url` into a YouTube playlist.
///
/// When no YouTube credential is available the consent screen is opened in the
/// browser and the conversion finishes once the redirect hits the local
/// callback server. `title` overrides the Spotify playlist name used for the
/// new playlist.
pub async fn convert(url: String, title: Option<String>) {
    let config = shared::load_config();
    let secrets = secrets::secret_store(&config);

    let playlist = shared::fetch_source(&config, &*secrets, &url).await;
    if playlist.tracks.is_empty() {
        warning!("Playlist '{}' has no tracks. Nothing to convert.", playlist.name);
        return;
    }

    info!("Converting '{}' ({} tracks)", playlist.name, playlist.tracks.len());
    shared::print_tracks(&playlist.tracks);
    let source_title = title.unwrap_or(playlist.name);

    let (assembler, pb) = shared::build_assembler(&config, secrets);
    let assembler = Arc::new(assembler);

    match assembler.convert(playlist.tracks, &source_title).await {
        Ok(Conversion::Completed(outcome)) => {
            pb.finish_and_clear();
            shared::report_outcome(&outcome);
        }
        Ok(Conversion::AuthorizationRequired(redirect)) => {
            await_authorization(&config, assembler, redirect, pb).await
        }
        Err(e) => {
            pb.finish_and_clear();
            fail(e);
        }
    }
}

/// Finishes a parked conversion with the `code` and `state` of the OAuth
/// redirect, for when the callback server was not running.
pub async fn resume(code: String, state: String) {
    let config = shared::load_config();
    let secrets = secrets::secret_store(&config);
    let (assembler, pb) = shared::build_assembler(&config, secrets);

    match assembler.resume(&code, &state).await {
        Ok(outcome) => {
            pb.finish_and_clear();
            shared::report_outcome(&outcome);
        }
        Err(e) => {
            pb.finish_and_clear();
            fail(e);
        }
    }
}

async fn await_authorization(
    config: &Config,
    assembler: Arc<PlaylistAssembler>,
    redirect: AuthorizationRedirect,
    pb: ProgressBar,
) {
    let callback_state = CallbackState::new(assembler);

    let server_state = callback_state.clone();
    let addr = config.server_addr;
    let callback_path = config.callback_path();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(addr, &callback_path, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    info!("Authorize YouTube access in your browser to continue.");
    if webbrowser::open(&redirect.consent_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            redirect.consent_url
        )
    }

    let outcome = wait_for_outcome(&callback_state).await;
    pb.finish_and_clear();

    match outcome {
        Some(Ok(outcome)) => shared::report_outcome(&outcome),
        Some(Err(e)) => error!("{}", e),
        None => error!(
            "Authorization timed out. Finish it with `playconv resume --code <code> --state <state>` or start over after `playconv auth reset`."
        ),
    }
}

async fn wait_for_outcome(callback_state: &CallbackState) -> Option<CallbackOutcome> {
    let start = Instant::now();

    while start.elapsed() < MAX_CALLBACK_WAIT {
        if let Some(outcome) = callback_state.outcome.lock().await.take() {
            return Some(outcome);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

fn fail(e: ConvertError) -> ! {
    match e {
        ConvertError::AuthorizationPending => error!(
            "{}. Complete it in the browser, or run `playconv auth reset` to discard it.",
            e
        ),
        ConvertError::CredentialRejected => {
            error!("{}. Run the conversion again to re-authorize.", e)
        }
        e => error!("{}", e),
    }
}
