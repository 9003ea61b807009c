use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use playconv::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert a Spotify playlist into a YouTube playlist
    Convert(ConvertOptions),

    /// List the tracks of a Spotify playlist
    Tracks(TracksOptions),

    /// Finish a conversion with the code and state of the OAuth redirect
    Resume(ResumeOptions),

    /// Inspect or clear the YouTube authorization
    Auth(AuthOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertOptions {
    /// Spotify playlist link, e.g. https://open.spotify.com/playlist/<id>
    pub url: String,

    /// Use this name instead of the Spotify playlist name
    #[clap(long)]
    pub title: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Spotify playlist link
    pub url: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ResumeOptions {
    /// `code` query parameter of the redirect
    #[clap(long)]
    pub code: String,

    /// `state` query parameter of the redirect
    #[clap(long)]
    pub state: String,
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthSubcommand {
    /// Show the cached credential and any conversion waiting for consent
    Status,

    /// Forget the cached credential and any pending authorization
    Reset,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("playconv=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Convert(opt) => cli::convert(opt.url, opt.title).await,
        Command::Tracks(opt) => cli::tracks(opt.url).await,
        Command::Resume(opt) => cli::resume(opt.code, opt.state).await,
        Command::Auth(opt) => match opt.command {
            AuthSubcommand::Status => cli::auth_status().await,
            AuthSubcommand::Reset => cli::auth_reset().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
