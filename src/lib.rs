//! Spotify to YouTube Playlist Converter Library
//!
//! This library reads a public playlist from Spotify, authorizes against YouTube
//! with an OAuth 2.0 authorization-code flow, searches YouTube for the closest
//! video per track and assembles a new YouTube playlist from the results.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `convert` - Track resolution and playlist assembly
//! - `error` - Error taxonomy shared by all components
//! - `management` - Authorization state machine, transient storage and secrets
//! - `server` - Local HTTP server the OAuth redirect lands on
//! - `spotify` - Spotify Web API client (source catalog)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube Data API client (destination catalog)
//!
//! # Example
//!
//! ```
//! use playconv::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> playconv::Res<()> {
//!     config::load_env().await?;
//!     cli::tracks("https://open.spotify.com/playlist/37i9dQZF1".to_string()).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for the command-line edge of the application.
///
/// Library components return their own typed errors (see [`error`]); this
/// boxed alias is what the CLI and server glue collapse them into.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching playlist {}", playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this macro. Library code returns typed errors and
/// leaves the decision to terminate to its caller.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("{} tracks could not be matched", count);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
