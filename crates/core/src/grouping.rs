//! Grouping & optimization engine.
//!
//! Clusters consecutive transcript lines into scene groups in one
//! left-to-right scan, then links repeated lyrics to shared visuals and
//! fills silent stretches with synthetic groups.
//!
//! Each scan position takes exactly one branch:
//!
//! 1. **Instrumental run**: consecutive instrumental markers become one
//!    group, or up to [`MAX_INSTRUMENTAL_SLICES`] evenly sliced groups when
//!    the run is longer than [`INSTRUMENTAL_SPLIT_THRESHOLD_SECS`].
//! 2. **Structural label**: skipped; it anchors no group.
//! 3. **Lyric run**: ordinary lines are absorbed greedily until the run
//!    spans `min_duration`, the next line is a marker, or input ends. A
//!    short trailing group is kept as is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GroupingConfig;
use crate::error::CoreError;
use crate::gaps::fill_gaps;
use crate::markers::{classify_marker, marker_label, MarkerKind};
use crate::prompt::PromptBuilder;
use crate::repetition::link_repetitions;
use crate::scene::{DurationClass, SceneGroup};
use crate::segment::TimelineSegment;
use crate::stats::{compute_stats, GroupingStats};
use crate::types::{GroupId, SegmentId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Instrumental runs up to this long stay a single group.
pub const INSTRUMENTAL_SPLIT_THRESHOLD_SECS: f64 = 8.0;

/// Longer runs are split into `ceil(duration / INSTRUMENTAL_SLICE_SECS)`
/// groups, at most [`MAX_INSTRUMENTAL_SLICES`].
pub const INSTRUMENTAL_SLICE_SECS: f64 = 5.0;

pub const MAX_INSTRUMENTAL_SLICES: usize = 3;

/// Tolerance for comparing accumulated durations against thresholds.
const TIME_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Advisory note for a group whose duration falls outside the bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationWarning {
    pub group_id: GroupId,
    pub duration: f64,
    pub class: DurationClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingResult {
    /// Input segments annotated with `assigned_group_id`.
    pub lyric_lines: Vec<TimelineSegment>,
    /// Groups ordered by `start`.
    pub scene_groups: Vec<SceneGroup>,
    pub stats: GroupingStats,
}

impl GroupingResult {
    pub fn group(&self, id: GroupId) -> Option<&SceneGroup> {
        self.scene_groups.iter().find(|g| g.id == id)
    }

    /// The group a transcript line was assigned to, if any. An assignment
    /// the group no longer lists as a member is treated as stale.
    pub fn group_for_segment(&self, segment_id: SegmentId) -> Option<&SceneGroup> {
        let segment = self.lyric_lines.iter().find(|s| s.id == segment_id)?;
        self.group(segment.assigned_group_id?)
            .filter(|g| g.contains_segment(segment_id))
    }

    /// Groups rated too short or too long. Gap fillers are excluded since
    /// their width follows the gap, not the lyrics.
    pub fn duration_warnings(&self, config: &GroupingConfig) -> Vec<DurationWarning> {
        self.scene_groups
            .iter()
            .filter(|g| !g.is_gap_filler)
            .filter_map(|g| {
                let class = g.duration_class(config.min_duration, config.max_duration);
                (class != DurationClass::WithinRange).then_some(DurationWarning {
                    group_id: g.id,
                    duration: g.duration,
                    class,
                })
            })
            .collect()
    }

    /// Recompute statistics after the caller edits `scene_groups`.
    pub fn refresh_stats(&mut self, cost_per_image: f64) {
        self.stats = compute_stats(self.lyric_lines.len(), &self.scene_groups, cost_per_image);
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Group a transcript with the default prompt builder.
///
/// Segments must be sorted by `start`; unsorted input is reported as
/// [`CoreError::UnsortedSegments`], never re-sorted.
pub fn group(
    segments: Vec<TimelineSegment>,
    config: &GroupingConfig,
) -> Result<GroupingResult, CoreError> {
    group_with_prompts(segments, config, &PromptBuilder::default())
}

/// Group a transcript, building prompts with `prompts`.
pub fn group_with_prompts(
    segments: Vec<TimelineSegment>,
    config: &GroupingConfig,
    prompts: &PromptBuilder,
) -> Result<GroupingResult, CoreError> {
    config.validate()?;
    if segments.is_empty() {
        return Err(CoreError::EmptyTranscript);
    }
    check_sorted(&segments)?;

    let mut groups = segment_into_groups(&segments, config, prompts);
    let segmented = groups.len();

    let reused = link_repetitions(&segments, &mut groups);
    let fillers = fill_gaps(&segments, &mut groups, config, prompts);
    groups.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut lyric_lines = segments;
    assign_groups(&mut lyric_lines, &groups);

    let stats = compute_stats(lyric_lines.len(), &groups, config.cost_per_image);
    let result = GroupingResult {
        lyric_lines,
        scene_groups: groups,
        stats,
    };

    for warning in result.duration_warnings(config) {
        tracing::debug!(
            group_id = warning.group_id,
            duration = warning.duration,
            class = ?warning.class,
            "Scene group duration outside advisory bounds",
        );
    }
    tracing::debug!(
        lines = result.stats.original_count,
        segmented,
        reused,
        fillers,
        unique_images = result.stats.unique_image_count,
        "Grouped transcript",
    );

    Ok(result)
}

/// Ensure segments are in non-decreasing `start` order.
pub fn check_sorted(segments: &[TimelineSegment]) -> Result<(), CoreError> {
    for (index, pair) in segments.windows(2).enumerate() {
        if pair[1].start < pair[0].start {
            return Err(CoreError::UnsortedSegments {
                index: index + 1,
                start: pair[1].start,
                previous_start: pair[0].start,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Segmentation scan
// ---------------------------------------------------------------------------

fn segment_into_groups(
    segments: &[TimelineSegment],
    config: &GroupingConfig,
    prompts: &PromptBuilder,
) -> Vec<SceneGroup> {
    let kinds: Vec<MarkerKind> = segments
        .iter()
        .map(|s| classify_marker(&s.text_cleaned))
        .collect();

    let mut groups = Vec::new();
    let mut next_id: GroupId = 1;
    let mut i = 0;

    while i < segments.len() {
        match kinds[i] {
            MarkerKind::Instrumental => {
                let run_end = kinds[i..]
                    .iter()
                    .position(|k| *k != MarkerKind::Instrumental)
                    .map_or(segments.len(), |offset| i + offset);
                groups.extend(instrumental_groups(
                    &segments[i..run_end],
                    &mut next_id,
                    prompts,
                ));
                i = run_end;
            }
            MarkerKind::Structural => {
                i += 1;
            }
            MarkerKind::Lyric => {
                let first = &segments[i];
                let mut j = i + 1;
                while j < segments.len()
                    && kinds[j] == MarkerKind::Lyric
                    && segments[j - 1].end - first.start + TIME_EPSILON < config.min_duration
                {
                    j += 1;
                }
                let members: Vec<&TimelineSegment> = segments[i..j].iter().collect();
                let combined: Vec<&str> = members.iter().map(|s| s.text.as_str()).collect();
                let prompt = prompts.lyric_prompt(&combined.join(" "));
                groups.push(SceneGroup::from_members(next_id, &members, prompt));
                next_id += 1;
                i = j;
            }
        }
    }

    groups
}

/// One group for a short run, or evenly time-sliced groups for a long one.
///
/// Each segment joins the slice containing its midpoint. A slice left empty
/// borrows the segment whose midpoint is nearest its centre, so that
/// segment may appear in two instrumental groups.
fn instrumental_groups(
    run: &[TimelineSegment],
    next_id: &mut GroupId,
    prompts: &PromptBuilder,
) -> Vec<SceneGroup> {
    let Some(first) = run.first() else {
        return Vec::new();
    };
    let run_start = first.start;
    let run_end = run.iter().map(|s| s.end).fold(run_start, f64::max);
    let duration = run_end - run_start;
    let prompt = prompts.instrumental_prompt(marker_label(&first.text_cleaned));

    if duration <= INSTRUMENTAL_SPLIT_THRESHOLD_SECS + TIME_EPSILON {
        let members: Vec<&TimelineSegment> = run.iter().collect();
        let group = instrumental_group(*next_id, &members, run_start, run_end, prompt);
        *next_id += 1;
        return vec![group];
    }

    let count = ((duration / INSTRUMENTAL_SLICE_SECS).ceil() as usize).clamp(1, MAX_INSTRUMENTAL_SLICES);
    let width = duration / count as f64;

    let mut slices: Vec<Vec<&TimelineSegment>> = vec![Vec::new(); count];
    for segment in run {
        let k = ((segment.midpoint() - run_start) / width).floor() as usize;
        slices[k.min(count - 1)].push(segment);
    }

    let mut groups = Vec::with_capacity(count);
    for (k, members) in slices.iter_mut().enumerate() {
        let slice_start = run_start + width * k as f64;
        let slice_end = if k + 1 == count {
            run_end
        } else {
            run_start + width * (k + 1) as f64
        };

        if members.is_empty() {
            let centre = (slice_start + slice_end) / 2.0;
            let nearest = run.iter().min_by(|a, b| {
                (a.midpoint() - centre)
                    .abs()
                    .total_cmp(&(b.midpoint() - centre).abs())
            });
            if let Some(nearest) = nearest {
                tracing::debug!(
                    segment_id = nearest.id,
                    slice = k,
                    "Instrumental slice had no members, reusing nearest segment",
                );
                members.push(nearest);
            }
        }

        groups.push(instrumental_group(
            *next_id,
            members,
            slice_start,
            slice_end,
            prompt.clone(),
        ));
        *next_id += 1;
    }

    groups
}

fn instrumental_group(
    id: GroupId,
    members: &[&TimelineSegment],
    start: f64,
    end: f64,
    prompt: String,
) -> SceneGroup {
    let mut group = SceneGroup::from_members(id, members, prompt);
    group.start = start;
    group.end = end;
    group.duration = end - start;
    group.is_instrumental = true;
    group
}

/// Set each segment's `assigned_group_id` to the earliest group listing it.
fn assign_groups(segments: &mut [TimelineSegment], groups: &[SceneGroup]) {
    let index: HashMap<SegmentId, usize> = segments
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.id, idx))
        .collect();

    for group in groups {
        for segment_id in &group.member_segment_ids {
            if let Some(&idx) = index.get(segment_id) {
                let segment = &mut segments[idx];
                if segment.assigned_group_id.is_none() {
                    segment.assigned_group_id = Some(group.id);
                }
            }
        }
    }
}
