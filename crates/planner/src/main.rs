//! `lyricscene-planner` -- plans the scenes of a lyric video.
//!
//! Reads an SRT transcript (and optionally a style description), groups
//! its lines into scenes, compiles the crossfaded frame timeline and
//! writes a JSON project manifest with the image generation queue.
//!
//! ```text
//! lyricscene-planner <input.srt> <output.json> [style.txt]
//! ```
//!
//! Tuning variables are listed on [`PlannerConfig::from_env`]; logging
//! follows `RUST_LOG`.

use clap::Parser;
use lyricscene_planner::config::PlannerConfig;
use lyricscene_planner::run::{run, PlanRequest};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyricscene_planner=info,lyricscene_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let request = PlanRequest::parse();

    let config = PlannerConfig::from_env();

    tracing::info!(
        input = %request.input.display(),
        fps = config.fps,
        crossfade_secs = config.crossfade_secs,
        "Starting lyricscene-planner",
    );

    if let Err(e) = run(&request, &config) {
        tracing::error!(error = %format!("{e:#}"), "Planning failed");
        std::process::exit(1);
    }
}
