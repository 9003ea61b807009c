//! # Spotify Integration Module
//!
//! Read-only access to the source catalog. Everything here runs with app-level
//! credentials obtained through the client-credentials grant; no user login is
//! involved, which is why only public playlists can be converted.
//!
//! ## Architecture
//!
//! ```text
//! CLI / Assembler
//!          ↓
//! SourceCatalogClient (playlist)
//!     ├── extract_playlist_id   (URL parsing, never fails loudly)
//!     ├── fetch_playlist_name   (GET /playlists/{id}?fields=name)
//!     └── fetch_tracks          (GET /playlists/{id}/tracks, paged)
//!          ↓
//! auth::client_credentials_token (POST /api/token, Basic auth)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! Transport and status failures are translated into [`crate::error::SourceError`]:
//! - token acquisition failures become `UpstreamAuth`
//! - any non-success status on the listing becomes `UpstreamFetch`; Spotify
//!   reports private playlists as a client error, so the message asks the user
//!   to make the playlist public
//!
//! Rate limited responses (429) are waited out through
//! [`crate::utils::send_with_backoff`].
//!
//! ## Track Mapping
//!
//! Playlist items whose underlying media was removed come back with a `null`
//! track. They are kept, with empty title and artist, so ordinal positions stay
//! contiguous and the track later shows up as unresolved instead of vanishing.

pub mod auth;
pub mod playlist;

pub use playlist::SourceCatalogClient;
