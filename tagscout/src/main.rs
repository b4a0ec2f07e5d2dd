//! tagscout - hashtag sound discovery CLI
//!
//! Runs the full pipeline for one hashtag: scrape, normalize, keep recent
//! videos, sort by views, split licensed music from original sounds, enrich
//! the music side with catalog labels, and export the unsigned tracks as
//! CSV. Fetch errors are reported as a message plus an empty result; the
//! tool never aborts on them.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tagscout::pipeline::{stages, PipelineContext};
use tagscout::services::{ApifyClient, SpotifyClient};
use tagscout::{export, RecordSet};
use tagscout_common::config::Settings;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tagscout", version, about = "Hashtag sound discovery pipeline")]
struct Args {
    /// Hashtag to scrape (leading '#' optional)
    hashtag: String,

    /// Maximum number of videos to request
    #[arg(long, default_value_t = 20)]
    max_results: u32,

    /// Trailing recency window in weeks (overrides settings)
    #[arg(long)]
    weeks: Option<i64>,

    /// Output CSV for unsigned tracks
    #[arg(long, default_value = "unsigned_tracks.csv")]
    output: PathBuf,

    /// Also export the original-sound rows to this CSV
    #[arg(long)]
    originals_output: Option<PathBuf>,

    /// Skip catalog enrichment (unsigned filter then sees no labels)
    #[arg(long)]
    skip_enrich: bool,

    /// Settings file path (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let settings = Settings::resolve(args.config.as_deref())?;
    let window_weeks = args.weeks.unwrap_or(settings.recency_window_weeks);

    info!("Starting tagscout {}", env!("CARGO_PKG_VERSION"));
    info!(
        hashtag = %args.hashtag,
        max_results = args.max_results,
        window_weeks = window_weeks,
        "Pipeline parameters"
    );

    let mut ctx = PipelineContext::new();

    // Stage 1: scrape and normalize. Errors become a message + empty set.
    let fetched = fetch_rows(&settings, &args).await;

    // Stage 2: recency filter + popularity sort
    let now = tagscout_common::time::now();
    let recent = stages::filter_recent(fetched, window_weeks, now);
    ctx.scraped = Some(stages::sort_by_play_count(recent));
    info!(
        videos = ctx.scraped.as_ref().map(Vec::len).unwrap_or(0),
        "Recent videos, sorted by views"
    );

    // Stage 3: split licensed music from original sounds
    let (music, original) =
        stages::split_music_and_original(ctx.scraped.clone().unwrap_or_default());
    info!(music = music.len(), original = original.len(), "Split by sound type");
    ctx.music = Some(music);
    ctx.original = Some(original);

    // Stage 4: catalog enrichment of the music side
    ctx.enriched = Some(if args.skip_enrich {
        info!("Enrichment skipped");
        ctx.music.clone().unwrap_or_default()
    } else {
        let spotify = SpotifyClient::new(settings.spotify_api_token.clone())?;
        let enriched = spotify.enrich(ctx.music.clone().unwrap_or_default()).await;
        info!(
            labelled = enriched.iter().filter(|r| r.label.is_some()).count(),
            "Catalog enrichment complete"
        );
        enriched
    });

    // Stage 5: unsigned-label filter + export
    let unsigned = stages::filter_unsigned(ctx.enriched.clone().unwrap_or_default());
    info!(unsigned = unsigned.len(), "Unsigned or unknown-label tracks");
    export::write_csv_file(&args.output, &unsigned)?;
    info!(path = %args.output.display(), "Wrote unsigned tracks CSV");
    ctx.unsigned = Some(unsigned);

    if let Some(path) = &args.originals_output {
        let originals = ctx.original.clone().unwrap_or_default();
        export::write_csv_file(path, &originals)?;
        info!(path = %path.display(), rows = originals.len(), "Wrote original sounds CSV");
    }

    Ok(())
}

/// Run the fetcher, mapping every failure to an empty record set so no
/// fetch error crosses this boundary.
async fn fetch_rows(settings: &Settings, args: &Args) -> RecordSet {
    let client = match ApifyClient::new(
        settings.apify_api_token.clone(),
        Duration::from_secs(settings.poll_interval_secs),
        Duration::from_secs(settings.poll_budget_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Could not build scrape client");
            return Vec::new();
        }
    };

    match client.fetch_hashtag(&args.hashtag, args.max_results).await {
        Ok(rows) => {
            info!(records = rows.len(), "Scrape complete");
            rows
        }
        Err(e) => {
            error!(error = %e, "Hashtag scrape failed");
            Vec::new()
        }
    }
}
