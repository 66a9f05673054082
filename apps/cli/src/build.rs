use std::{sync::Arc, time::Duration, time::Instant};

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;

use playloop_core::{
    InclusionFilter, OutputShape, PipelineOptions, PipelineOutcome, PlaylistPipeline, PoolConfig,
    QualityPolicy, ScheduleMode, SkipCause, YoutubeClient,
    config::{resolve_api_key, resolve_sources},
    format_playlist, format_timestamp, save_playlist,
};

use crate::{
    BuildArgs,
    ui::{banner, check, create_spinner, format_duration, rule},
};

fn schedule_mode(args: &BuildArgs) -> ScheduleMode {
    match (args.window, args.slot) {
        (Some(target_seconds), _) => ScheduleMode::NormalizedWindow { target_seconds },
        (None, Some(slot_seconds)) => ScheduleMode::FixedSlot { slot_seconds },
        (None, None) => ScheduleMode::Cumulative,
    }
}

/// True when Ctrl-C or the deadline left something unresolved.
fn was_cut_short(outcome: &PipelineOutcome) -> bool {
    outcome
        .skipped
        .iter()
        .any(|reason| reason.cause == SkipCause::Cancelled)
}

pub async fn run(args: BuildArgs) -> Result<()> {
    // Validate configuration early
    let (api_key, sources) = match resolve_api_key(args.api_key.clone())
        .and_then(|key| Ok((key, resolve_sources(&args.playlists)?)))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let mode = schedule_mode(&args);
    let policy = mode.policy();
    tracing::debug!(?mode, sources = ?sources, output = %args.output.display(), "build configured");
    let shape = if args.ids_only {
        OutputShape::IdsOnly
    } else {
        OutputShape::Full
    };

    let client = Arc::new(YoutubeClient::new(api_key)?.with_base_url(&args.base_url));
    let options = PipelineOptions {
        pool: PoolConfig {
            concurrency: args.concurrency,
            ..PoolConfig::default()
        },
        deadline: args.deadline.map(Duration::from_secs),
        max_pages: args.max_pages,
    };
    let pipeline = PlaylistPipeline::new(client.clone(), client, Arc::clone(&policy))
        .with_filter(InclusionFilter::new(QualityPolicy::from(args.quality).predicate()))
        .with_options(options);

    banner("Playlist Builder");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let total_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Collecting {} playlist(s), scheduling {}...",
        sources.len(),
        policy.name()
    ));

    let outcome = match pipeline.run_until(&sources, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    spinner.finish_with_message(format!(
        "{} Scheduled {} videos, loop length {} {}",
        check(),
        style(outcome.playlist.len()).cyan(),
        style(format_timestamp(outcome.playlist.loop_length())).yellow(),
        style(format!("[{}]", format_duration(total_start.elapsed()))).dim()
    ));

    if was_cut_short(&outcome) {
        println!(
            "{} {}",
            style("!").yellow().bold(),
            style("Run was cut short; the playlist is partial").yellow()
        );
    }

    if !outcome.skipped.is_empty() {
        println!(
            "\n{} {} skipped:",
            style("!").yellow().bold(),
            outcome.skipped.len()
        );
        for reason in &outcome.skipped {
            println!("  {} {}", style("•").dim(), reason);
        }
    }

    if args.list && !outcome.playlist.is_empty() {
        println!("\n{}", format_playlist(&outcome.playlist));
    }

    save_playlist(&outcome.playlist, shape, &args.output).await?;

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(args.output.display()).cyan()
    );
    rule();

    Ok(())
}
