use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use playloop_core::{QualityPolicy, pipeline::DEFAULT_MAX_PAGES, youtube::DEFAULT_BASE_URL};

mod build;
mod now;
mod ui;

/// CLI wrapper for QualityPolicy (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliQuality {
    #[default]
    AcceptAll,
    Hd,
}

impl From<CliQuality> for QualityPolicy {
    fn from(cli: CliQuality) -> Self {
        match cli {
            CliQuality::AcceptAll => QualityPolicy::AcceptAll,
            CliQuality::Hd => QualityPolicy::RequireHd,
        }
    }
}

#[derive(Parser)]
#[command(name = "playloop")]
#[command(about = "Merge YouTube playlists into one scheduled playlist that loops like a channel")]
struct Cli {
    /// Log pipeline progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch playlists, resolve videos and write the scheduled playlist
    Build(BuildArgs),
    /// Show what is playing right now in a saved playlist
    Now(NowArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Playlist ids, comma separated or repeated. Defaults to $YT_PLAYLISTS.
    #[arg(short, long = "playlist")]
    playlists: Vec<String>,

    /// YouTube Data API key. Defaults to $YT_API_KEY.
    #[arg(long)]
    api_key: Option<String>,

    /// Where to write the playlist document
    #[arg(short, long, default_value = "docs/playlist.json")]
    output: PathBuf,

    /// Spread start times across a window of this many seconds (e.g. 86400)
    #[arg(short, long, conflicts_with = "slot")]
    window: Option<u64>,

    /// Give every video a fixed slot of this many seconds
    #[arg(long)]
    slot: Option<u64>,

    /// Write only the video ids
    #[arg(long)]
    ids_only: bool,

    /// Print the scheduled playlist after building it
    #[arg(short, long)]
    list: bool,

    /// Quality requirement on top of embeddability
    #[arg(short, long, value_enum, default_value = "accept-all")]
    quality: CliQuality,

    /// Maximum number of concurrent video lookups
    #[arg(short = 'j', long, default_value_t = 6)]
    concurrency: usize,

    /// Stop issuing lookups after this many seconds and schedule what resolved
    #[arg(long)]
    deadline: Option<u64>,

    /// Maximum pages followed per playlist
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// API endpoint, e.g. for a caching proxy
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(Args)]
struct NowArgs {
    /// Playlist document written by `build`
    #[arg(short, long, default_value = "docs/playlist.json")]
    playlist: PathBuf,

    /// Instant the loop started, RFC 3339 (default 2024-01-01T00:00:00Z)
    #[arg(long)]
    epoch: Option<DateTime<Utc>>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build(args) => build::run(args).await,
        Command::Now(args) => now::run(args).await,
    }
}
