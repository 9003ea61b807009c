use std::sync::Arc;

use chrono::Utc;

use crate::{
    cli::shared,
    error, info,
    management::{
        FileStorage, SessionStorage, secrets,
        storage::{CREDENTIAL_KEY, CREDENTIAL_REJECTED_KEY, load_json},
    },
    success,
    types::DestinationCredential,
    warning,
};

/// Shows whether a YouTube credential is cached and whether a conversion is
/// waiting for consent.
pub async fn auth_status() {
    let config = shared::load_config();
    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::in_data_dir());
    let manager = shared::build_auth_manager(&config, secrets::secret_store(&config), Arc::clone(&storage));

    match load_json::<DestinationCredential>(&*storage, CREDENTIAL_KEY).await {
        Ok(Some(credential)) => match credential.expiry {
            Some(expiry) if credential.is_expired(Utc::now()) && credential.refresh_token.is_some() => {
                info!("YouTube credential expired at {}, it will be refreshed on next use.", expiry)
            }
            Some(expiry) if credential.is_expired(Utc::now()) => {
                warning!("YouTube credential expired at {}. The next conversion asks for consent again.", expiry)
            }
            Some(expiry) => success!("YouTube credential valid until {}", expiry),
            None => success!("YouTube credential cached"),
        },
        Ok(None) => info!("No YouTube credential cached."),
        Err(e) => error!("Cannot read cached credential: {}", e),
    }

    if let Ok(Some(rejected_at)) = storage.get(CREDENTIAL_REJECTED_KEY).await {
        warning!(
            "YouTube rejected the last credential at {}. The next conversion asks for consent again.",
            rejected_at
        );
    }

    match manager.pending_session().await {
        Ok(Some(session)) => warning!(
            "Conversion of '{}' ({} tracks) is waiting for consent since {}.",
            session.pending_playlist_title,
            session.pending_tracks.len(),
            session.created_at
        ),
        Ok(None) => info!("No conversion waiting for consent."),
        Err(e) => error!("Cannot read authorization session: {}", e),
    }
}

/// Drops the pending authorization session and the cached credential.
pub async fn auth_reset() {
    let config = shared::load_config();
    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::in_data_dir());
    let mut manager = shared::build_auth_manager(&config, secrets::secret_store(&config), storage);

    match manager.reset().await {
        Ok(()) => success!("Authorization state cleared."),
        Err(e) => error!("Cannot clear authorization state: {}", e),
    }
}
