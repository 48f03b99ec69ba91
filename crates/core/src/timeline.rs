//! Timeline compiler: scene groups to frame-accurate placements.
//!
//! Each group's content window starts at its start frame and ends at
//! `round((start + duration) * fps)`, so a duration overridden after
//! grouping moves the hand-over to the next scene. The window end is
//! clamped to the next group's start frame: a scene never runs into its
//! successor's lyrics, and a scene that ends early hands over to its
//! successor early, so the compiled timeline has no holes. Each placement
//! after the first is then pulled earlier by up to
//! `round(crossfade_secs * fps)` frames so that it fades in over the tail of
//! its predecessor.
//!
//! With `s_i = round(start_i * fps)`, `e_i = round((start_i + duration_i) * fps)`
//! and `cf` the crossfade in frames:
//!
//! | field | value |
//! |-------|-------|
//! | `boundary_i` | `clamp(e_i, s_i, s_{i+1})`; last group: `max(e_i, from_i)` |
//! | `from_i` | `s_0` for the first group, else `boundary_{i-1}` |
//! | `lead_in_i` | `0` for the first group, else `min(cf, from_i - from_{i-1})` |
//! | `start_frame` | `from_i - lead_in_i` |
//! | `duration_frames` | `boundary_i - from_i + lead_in_i` |
//! | `fade_in_frames` | `lead_in_i` |
//! | `fade_out_frames` | `lead_in_{i+1}`, `0` for the last group |
//!
//! Consecutive placements therefore overlap by exactly `cf` frames unless
//! the earlier window is itself shorter than the crossfade.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scene::SceneGroup;
use crate::types::GroupId;

/// Default crossfade between consecutive scenes.
pub const DEFAULT_CROSSFADE_SECS: f64 = 0.5;

/// Default output frame rate.
pub const DEFAULT_FPS: f64 = 30.0;

/// One group's position on the frame timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub group_id: GroupId,
    pub start_frame: i64,
    pub duration_frames: i64,
    pub fade_in_frames: i64,
    pub fade_out_frames: i64,
}

impl Placement {
    /// First frame after this placement.
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration_frames
    }
}

/// Convert seconds to the nearest whole frame.
pub fn seconds_to_frames(secs: f64, fps: f64) -> i64 {
    (secs * fps).round() as i64
}

/// Compile sorted scene groups into placements.
///
/// Empty input yields an empty timeline. Non-positive `fps`, negative
/// `crossfade_secs`, unsorted groups and bad group timings fail with
/// [`CoreError::InvalidTimeline`] before anything is computed.
pub fn compile(
    groups: &[SceneGroup],
    fps: f64,
    crossfade_secs: f64,
) -> Result<Vec<Placement>, CoreError> {
    validate_inputs(groups, fps, crossfade_secs)?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    let crossfade = seconds_to_frames(crossfade_secs, fps);
    let nominal: Vec<i64> = groups
        .iter()
        .map(|g| seconds_to_frames(g.start, fps))
        .collect();

    // Content windows `[from_i, boundary_i)`, back to back.
    let mut from = Vec::with_capacity(groups.len());
    let mut boundary = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let window_start = if i == 0 { nominal[0] } else { boundary[i - 1] };
        let content_end = seconds_to_frames(group.start + group.duration, fps);
        let window_end = match nominal.get(i + 1) {
            Some(&next_start) => content_end.clamp(nominal[i], next_start),
            None => content_end.max(window_start),
        };
        from.push(window_start);
        boundary.push(window_end);
    }

    let lead_in: Vec<i64> = from
        .iter()
        .enumerate()
        .map(|(i, &f)| match i {
            0 => 0,
            _ => crossfade.min(f - from[i - 1]),
        })
        .collect();

    let placements: Vec<Placement> = groups
        .iter()
        .enumerate()
        .map(|(i, group)| Placement {
            group_id: group.id,
            start_frame: from[i] - lead_in[i],
            duration_frames: boundary[i] - from[i] + lead_in[i],
            fade_in_frames: lead_in[i],
            fade_out_frames: lead_in.get(i + 1).copied().unwrap_or(0),
        })
        .collect();

    tracing::debug!(
        placements = placements.len(),
        total_frames = total_frames(&placements),
        crossfade_frames = crossfade,
        "Compiled timeline",
    );

    Ok(placements)
}

/// Length of the compiled timeline in frames.
pub fn total_frames(placements: &[Placement]) -> i64 {
    placements.iter().map(Placement::end_frame).max().unwrap_or(0)
}

fn validate_inputs(groups: &[SceneGroup], fps: f64, crossfade_secs: f64) -> Result<(), CoreError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(CoreError::InvalidTimeline(format!(
            "fps must be a finite number > 0, got {fps}"
        )));
    }
    if !crossfade_secs.is_finite() || crossfade_secs < 0.0 {
        return Err(CoreError::InvalidTimeline(format!(
            "crossfade must be a finite number >= 0, got {crossfade_secs}"
        )));
    }

    for group in groups {
        if !group.start.is_finite() || group.start < 0.0 {
            return Err(CoreError::InvalidTimeline(format!(
                "group {} has invalid start {}",
                group.id, group.start
            )));
        }
        if !group.duration.is_finite() || group.duration < 0.0 {
            return Err(CoreError::InvalidTimeline(format!(
                "group {} has invalid duration {}",
                group.id, group.duration
            )));
        }
    }

    for pair in groups.windows(2) {
        if pair[1].start < pair[0].start {
            return Err(CoreError::InvalidTimeline(format!(
                "groups are not sorted by start: group {} at {}s follows group {} at {}s",
                pair[1].id, pair[1].start, pair[0].id, pair[0].start
            )));
        }
    }

    Ok(())
}
