use crate::{cli::shared, info, management::secrets};

/// Lists the tracks of a Spotify playlist in playlist order.
pub async fn tracks(url: String) {
    let config = shared::load_config();
    let secrets = secrets::secret_store(&config);

    let playlist = shared::fetch_source(&config, &*secrets, &url).await;
    info!("{} ({} tracks)", playlist.name, playlist.tracks.len());
    shared::print_tracks(&playlist.tracks);
}
