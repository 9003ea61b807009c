//! # CLI Module
//!
//! User-facing commands of playconv. Each command loads the configuration,
//! wires the library components together and turns their typed errors into
//! a single message with a hint on how to retry.
//!
//! ## Commands
//!
//! - [`convert`] - Converts a Spotify playlist into a YouTube playlist
//! - [`resume`] - Finishes a conversion from a callback `code` and `state`
//!   copied by hand, for when the local callback server was not reachable
//! - [`tracks`] - Lists the tracks of a Spotify playlist
//! - [`auth_status`] / [`auth_reset`] - Inspects or clears the stored
//!   authorization state
//!
//! ## Data Flow
//!
//! ```text
//! playlist link
//!     ↓
//! SourceCatalogClient (Spotify, app credentials)
//!     ↓
//! PlaylistAssembler ── no credential ──→ consent URL → browser
//!     ↓                                        ↓
//!     ↓                         callback server / `playconv resume`
//!     ↓                                        ↓
//! TrackResolver + playlist inserts ←───────────┘
//!     ↓
//! outcome report
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! playconv tracks https://open.spotify.com/playlist/37i9dQZF1
//! playconv convert https://open.spotify.com/playlist/37i9dQZF1
//! playconv convert https://open.spotify.com/playlist/37i9dQZF1 --title "Road trip"
//! playconv auth status
//! playconv auth reset
//! ```

mod auth;
mod convert;
mod shared;
mod tracks;

pub use auth::auth_reset;
pub use auth::auth_status;
pub use convert::convert;
pub use convert::resume;
pub use tracks::tracks;
