//! One planning run: subtitle file in, project manifest out.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use lyricscene_core::manifest::{ManifestSource, ProjectManifest};
use lyricscene_core::prompt::PromptBuilder;
use lyricscene_core::srt::parse_srt;
use lyricscene_core::{compile, group_with_prompts, ingest};

use crate::config::PlannerConfig;

/// Files named on the command line.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "lyricscene-planner", version, about, long_about = None)]
pub struct PlanRequest {
    /// SRT transcript to plan
    pub input: PathBuf,
    /// Where to write the JSON project manifest
    pub output: PathBuf,
    /// Optional free-text description of the song's style
    pub style: Option<PathBuf>,
}

/// Read, group, compile and write the manifest. Returns what was written.
pub fn run(request: &PlanRequest, config: &PlannerConfig) -> anyhow::Result<ProjectManifest> {
    config.validate().context("invalid planner configuration")?;

    let content = std::fs::read_to_string(&request.input)
        .with_context(|| format!("failed to read transcript {}", request.input.display()))?;
    let cues = parse_srt(&content)
        .with_context(|| format!("could not parse transcript {}", request.input.display()))?;
    if cues.is_empty() {
        bail!(
            "could not parse transcript {}: no subtitle cues found",
            request.input.display()
        );
    }
    let segments = ingest(cues).context("transcript contains invalid cue timings")?;

    let style_text = request.style.as_deref().map(read_style).transpose()?.flatten();
    let prompts = PromptBuilder::from_style_text(
        config.base_style.clone(),
        style_text.as_deref().unwrap_or_default(),
    );

    let result = group_with_prompts(segments, &config.grouping, &prompts)
        .context("failed to group transcript")?;
    let placements = compile(&result.scene_groups, config.fps, config.crossfade_secs)
        .context("failed to compile timeline")?;

    tracing::info!(
        lines = result.stats.original_count,
        groups = result.stats.group_count,
        unique_images = result.stats.unique_image_count,
        reused = result.stats.reused_count,
        savings_percent = %format!("{:.1}", result.stats.savings_percent),
        "Transcript grouped",
    );
    for warning in result.duration_warnings(&config.grouping) {
        tracing::info!(
            group_id = warning.group_id,
            duration = warning.duration,
            class = ?warning.class,
            "Scene duration outside recommended range",
        );
    }

    let source = ManifestSource {
        source_file: request.input.display().to_string(),
        style_file: request.style.as_ref().map(|p| p.display().to_string()),
        style_elements: prompts.style.clone(),
        style_text,
        base_style: prompts.base_style.clone(),
        fps: config.fps,
        crossfade_secs: config.crossfade_secs,
        generated_at: chrono::Utc::now(),
    };
    let manifest = ProjectManifest::build(result, placements, source);

    let json = manifest.to_json().context("failed to serialize manifest")?;
    std::fs::write(&request.output, json)
        .with_context(|| format!("failed to write manifest {}", request.output.display()))?;

    tracing::info!(
        output = %request.output.display(),
        images = manifest.generation_queue.len(),
        total_frames = manifest.metadata.total_frames,
        "Manifest written",
    );

    Ok(manifest)
}

/// Style description, `None` if the file is blank.
fn read_style(path: &Path) -> anyhow::Result<Option<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read style file {}", path.display()))?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
