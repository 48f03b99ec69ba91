//! Silent-stretch detection and synthetic filler groups.
//!
//! Covered time is the union of every transcript segment and every real
//! scene group. Any void between covered intervals that is at least
//! `min_gap_duration` long is cut into equal-width filler groups.

use serde::Serialize;

use crate::config::GroupingConfig;
use crate::prompt::PromptBuilder;
use crate::scene::SceneGroup;
use crate::segment::TimelineSegment;
use crate::types::GroupId;

/// An uncovered `[start, end)` stretch of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gap {
    pub start: f64,
    pub end: f64,
}

impl Gap {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Number of filler slices for this gap: `round(duration / target)`,
    /// at least one.
    pub fn slice_count(&self, target_slice_duration: f64) -> usize {
        let count = (self.duration() / target_slice_duration).round();
        if count.is_finite() && count >= 1.0 {
            count as usize
        } else {
            1
        }
    }

    /// Equal-width `[start, end)` slices; the last one ends exactly at `end`.
    pub fn slices(&self, target_slice_duration: f64) -> Vec<(f64, f64)> {
        let count = self.slice_count(target_slice_duration);
        let width = self.duration() / count as f64;
        (0..count)
            .map(|k| {
                let start = self.start + width * k as f64;
                let end = if k + 1 == count {
                    self.end
                } else {
                    self.start + width * (k + 1) as f64
                };
                (start, end)
            })
            .collect()
    }
}

/// Merge covered intervals and return the voids between them.
pub fn find_gaps(
    segments: &[TimelineSegment],
    groups: &[SceneGroup],
    config: &GroupingConfig,
) -> Vec<Gap> {
    let mut intervals: Vec<(f64, f64)> = segments
        .iter()
        .map(|s| (s.start, s.end))
        .chain(
            groups
                .iter()
                .filter(|g| !g.is_gap_filler)
                .map(|g| (g.start, g.end)),
        )
        .collect();
    if intervals.is_empty() {
        return Vec::new();
    }
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut gaps = Vec::new();
    if config.fill_leading_gap && intervals[0].0 >= config.min_gap_duration {
        gaps.push(Gap {
            start: 0.0,
            end: intervals[0].0,
        });
    }

    let mut covered_end = intervals[0].1;
    for &(start, end) in &intervals[1..] {
        if start - covered_end >= config.min_gap_duration {
            gaps.push(Gap {
                start: covered_end,
                end: start,
            });
        }
        covered_end = covered_end.max(end);
    }

    gaps
}

/// Append filler groups for every gap, taking ids after the largest
/// existing group id. Existing groups are not modified.
///
/// Returns the number of fillers added.
pub fn fill_gaps(
    segments: &[TimelineSegment],
    groups: &mut Vec<SceneGroup>,
    config: &GroupingConfig,
    prompts: &PromptBuilder,
) -> usize {
    let gaps = find_gaps(segments, groups, config);
    let mut next_id: GroupId = groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
    let mut added = 0;

    for gap in gaps {
        let slices = gap.slices(config.target_gap_slice_duration);
        tracing::debug!(
            start = gap.start,
            end = gap.end,
            slices = slices.len(),
            "Filling timeline gap",
        );
        for (start, end) in slices {
            groups.push(SceneGroup::gap_filler(
                next_id,
                start,
                end,
                prompts.gap_filler_prompt(),
            ));
            next_id += 1;
            added += 1;
        }
    }

    added
}
