use anyhow::{Context, Result};
use chrono::Utc;
use console::style;

use playloop_core::{
    format_timestamp, load_playlist, locate,
    playback::{default_epoch, seconds_since, watch_url},
};

use crate::{NowArgs, ui::rule};

pub async fn run(args: NowArgs) -> Result<()> {
    let playlist = load_playlist(&args.playlist)
        .await
        .with_context(|| format!("Failed to load {}", args.playlist.display()))?;

    let epoch = args.epoch.unwrap_or_else(default_epoch);
    let elapsed = seconds_since(epoch, Utc::now());

    let Some(position) = locate(&playlist, elapsed) else {
        println!(
            "{} {}",
            style("!").yellow().bold(),
            style("Playlist is empty, nothing is playing").yellow()
        );
        return Ok(());
    };

    println!(
        "\n{} {} of {}",
        style("Now playing").cyan().bold(),
        style(position.index + 1).bold(),
        playlist.len()
    );
    rule();
    println!("{:<10} {}", style("Video").dim(), position.video.id);
    println!(
        "{:<10} {} / {}",
        style("Position").dim(),
        format_timestamp(position.offset_seconds),
        format_timestamp(position.video.duration_seconds)
    );
    println!(
        "{:<10} {}",
        style("Next in").dim(),
        format_timestamp(position.remaining_seconds)
    );
    println!("{:<10} {}", style("Watch").dim(), style(watch_url(&position)).cyan());
    println!(
        "{:<10} {}\n",
        style("Loop").dim(),
        format_timestamp(playlist.loop_length())
    );

    Ok(())
}
