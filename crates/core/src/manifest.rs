//! Project manifest and image generation queue.
//!
//! The manifest is the hand-off document between planning and rendering:
//! it carries the grouped transcript, the compiled timeline and the list of
//! images still to be generated, one per group that owns its visual.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grouping::GroupingResult;
use crate::prompt::StyleElements;
use crate::scene::SceneGroup;
use crate::segment::TimelineSegment;
use crate::stats::GroupingStats;
use crate::timeline::{total_frames, Placement};
use crate::types::{GroupId, Timestamp};

/// Stable image file name for the `index`-th (1-based) generated visual.
pub fn image_file_name(index: usize) -> String {
    format!("scene_{index:03}.jpg")
}

// ---------------------------------------------------------------------------
// Generation queue
// ---------------------------------------------------------------------------

/// One visual that must be generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub group_id: GroupId,
    pub file_name: String,
    pub prompt: String,
    pub start: f64,
    pub duration: f64,
}

/// One request per non-reused group, in the order the groups are given.
pub fn generation_queue(groups: &[SceneGroup]) -> Vec<ImageRequest> {
    groups
        .iter()
        .filter(|g| g.needs_visual())
        .enumerate()
        .map(|(i, g)| ImageRequest {
            group_id: g.id,
            file_name: image_file_name(i + 1),
            prompt: g.prompt.clone(),
            start: g.start,
            duration: g.duration,
        })
        .collect()
}

/// Image file shown for every group. Reused groups resolve to their
/// canonical group's file; a reused group whose canonical is missing is
/// left out.
pub fn resolve_image_files(groups: &[SceneGroup]) -> BTreeMap<GroupId, String> {
    let mut files: BTreeMap<GroupId, String> = generation_queue(groups)
        .into_iter()
        .map(|request| (request.group_id, request.file_name))
        .collect();

    for group in groups.iter().filter(|g| g.is_reused) {
        let file = group
            .canonical_group_id
            .and_then(|canonical| files.get(&canonical).cloned());
        match file {
            Some(file) => {
                files.insert(group.id, file);
            }
            None => tracing::warn!(
                group_id = group.id,
                canonical_group_id = ?group.canonical_group_id,
                "Reused group points at a group with no image",
            ),
        }
    }

    files
}

// ---------------------------------------------------------------------------
// ProjectManifest
// ---------------------------------------------------------------------------

/// Inputs describing where a plan came from and how it was compiled.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    pub source_file: String,
    pub style_file: Option<String>,
    pub style_text: Option<String>,
    pub style_elements: StyleElements,
    pub base_style: String,
    pub fps: f64,
    pub crossfade_secs: f64,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub source_file: String,
    pub style_file: Option<String>,
    pub style_text: Option<String>,
    pub style_elements: StyleElements,
    pub base_style: String,
    pub total_segments: usize,
    /// End of the last scene group, in seconds.
    pub total_duration: f64,
    pub fps: f64,
    pub crossfade_secs: f64,
    pub total_frames: i64,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub metadata: ManifestMetadata,
    pub lyric_lines: Vec<TimelineSegment>,
    pub scene_groups: Vec<SceneGroup>,
    pub stats: GroupingStats,
    pub placements: Vec<Placement>,
    pub image_files: BTreeMap<GroupId, String>,
    pub generation_queue: Vec<ImageRequest>,
}

impl ProjectManifest {
    pub fn build(result: GroupingResult, placements: Vec<Placement>, source: ManifestSource) -> Self {
        let total_duration = result
            .scene_groups
            .iter()
            .map(|g| g.end)
            .fold(0.0, f64::max);

        let metadata = ManifestMetadata {
            source_file: source.source_file,
            style_file: source.style_file,
            style_text: source.style_text,
            style_elements: source.style_elements,
            base_style: source.base_style,
            total_segments: result.lyric_lines.len(),
            total_duration,
            fps: source.fps,
            crossfade_secs: source.crossfade_secs,
            total_frames: total_frames(&placements),
            generated_at: source.generated_at,
        };

        Self {
            metadata,
            image_files: resolve_image_files(&result.scene_groups),
            generation_queue: generation_queue(&result.scene_groups),
            lyric_lines: result.lyric_lines,
            scene_groups: result.scene_groups,
            stats: result.stats,
            placements,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupingConfig;
    use crate::grouping::group;
    use crate::timeline::compile;
    use chrono::TimeZone;

    fn group_with(id: GroupId, start: f64, prompt: &str) -> SceneGroup {
        let seg = TimelineSegment::new(id, id, start, start + 3.0, "line");
        SceneGroup::from_members(id, &[&seg], prompt.to_string())
    }

    fn source() -> ManifestSource {
        ManifestSource {
            source_file: "song.srt".to_string(),
            style_file: None,
            style_text: None,
            style_elements: StyleElements::default(),
            base_style: "photorealistic, cinematic".to_string(),
            fps: 30.0,
            crossfade_secs: 0.5,
            generated_at: chrono::Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    // -- generation_queue ----------------------------------------------------

    #[test]
    fn queue_skips_reused_groups() {
        let mut groups = vec![
            group_with(1, 0.0, "first"),
            group_with(2, 3.0, "second"),
            group_with(3, 6.0, "third"),
        ];
        groups[1].mark_reused(1);

        let queue = generation_queue(&groups);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].group_id, 1);
        assert_eq!(queue[0].file_name, "scene_001.jpg");
        assert_eq!(queue[1].group_id, 3);
        assert_eq!(queue[1].file_name, "scene_002.jpg");
        assert_eq!(queue[1].prompt, "third");
    }

    // -- resolve_image_files -------------------------------------------------

    #[test]
    fn reused_groups_resolve_to_canonical_file() {
        let mut groups = vec![group_with(1, 0.0, "a"), group_with(2, 3.0, "b")];
        groups[1].mark_reused(1);

        let files = resolve_image_files(&groups);
        assert_eq!(files[&1], "scene_001.jpg");
        assert_eq!(files[&2], "scene_001.jpg");
    }

    #[test]
    fn dangling_canonical_is_left_out() {
        let mut groups = vec![group_with(1, 0.0, "a")];
        groups[0].mark_reused(42);
        assert!(resolve_image_files(&groups).is_empty());
    }

    // -- ProjectManifest -----------------------------------------------------

    #[test]
    fn build_and_round_trip_json() {
        let segments = vec![
            TimelineSegment::new(1, 1, 0.0, 3.0, "opening words here"),
            TimelineSegment::new(2, 2, 3.0, 6.0, "the second line"),
        ];
        let result = group(segments, &GroupingConfig::default()).unwrap();
        let placements = compile(&result.scene_groups, 30.0, 0.5).unwrap();
        let manifest = ProjectManifest::build(result, placements, source());

        assert_eq!(manifest.metadata.total_segments, 2);
        assert_eq!(manifest.metadata.total_duration, 6.0);
        assert_eq!(manifest.metadata.total_frames, 180);
        assert_eq!(manifest.generation_queue.len(), 2);
        assert_eq!(manifest.image_files.len(), 2);

        let json = manifest.to_json().unwrap();
        assert!(json.contains("\"generated_at\": \"2026-01-02T03:04:05Z\""));
        assert_eq!(ProjectManifest::from_json(&json).unwrap(), manifest);
    }
}
