//! Scene groups: the units that each receive exactly one generated visual.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::segment::TimelineSegment;
use crate::types::{GroupId, SegmentId};

/// Separator used when joining member lines into `combined_text`.
pub const COMBINED_TEXT_SEPARATOR: &str = " / ";

// ---------------------------------------------------------------------------
// SceneGroup
// ---------------------------------------------------------------------------

/// A contiguous (or synthetic) span of the song shown with one visual.
///
/// `canonical_group_id` is set iff `is_reused`; it names the group that owns
/// the visual this one borrows. Gap fillers have no members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGroup {
    pub id: GroupId,
    pub member_segment_ids: Vec<SegmentId>,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub combined_text: String,
    pub prompt: String,
    pub is_reused: bool,
    pub canonical_group_id: Option<GroupId>,
    pub is_instrumental: bool,
    pub is_gap_filler: bool,
}

impl SceneGroup {
    /// Group spanning `members`, from the first member's start to the last
    /// member's end.
    ///
    /// `members` must be non-empty.
    pub fn from_members(id: GroupId, members: &[&TimelineSegment], prompt: String) -> Self {
        let start = members.first().map_or(0.0, |s| s.start);
        let end = members.last().map_or(start, |s| s.end).max(start);
        let combined_text = members
            .iter()
            .map(|s| s.text_cleaned.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(COMBINED_TEXT_SEPARATOR);

        Self {
            id,
            member_segment_ids: members.iter().map(|s| s.id).collect(),
            start,
            end,
            duration: end - start,
            combined_text,
            prompt,
            is_reused: false,
            canonical_group_id: None,
            is_instrumental: false,
            is_gap_filler: false,
        }
    }

    /// Synthetic filler covering `[start, end)` with no transcript lines.
    pub fn gap_filler(id: GroupId, start: f64, end: f64, prompt: String) -> Self {
        Self {
            id,
            member_segment_ids: Vec::new(),
            start,
            end,
            duration: end - start,
            combined_text: String::new(),
            prompt,
            is_reused: false,
            canonical_group_id: None,
            is_instrumental: true,
            is_gap_filler: true,
        }
    }

    pub fn contains_segment(&self, segment_id: SegmentId) -> bool {
        self.member_segment_ids.contains(&segment_id)
    }

    /// Whether this group needs its own generated visual.
    pub fn needs_visual(&self) -> bool {
        !self.is_reused
    }

    pub fn mark_reused(&mut self, canonical: GroupId) {
        self.is_reused = true;
        self.canonical_group_id = Some(canonical);
    }

    /// Override the on-screen duration after grouping. `start` is kept and
    /// `end` moves.
    pub fn override_duration(&mut self, secs: f64) -> Result<(), CoreError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CoreError::Validation(format!(
                "group {} duration must be a finite number >= 0, got {secs}",
                self.id
            )));
        }
        self.duration = secs;
        self.end = self.start + secs;
        Ok(())
    }

    /// Advisory classification against the configured bounds.
    pub fn duration_class(&self, min_duration: f64, max_duration: f64) -> DurationClass {
        classify_duration(self.duration, min_duration, max_duration)
    }
}

// ---------------------------------------------------------------------------
// DurationClass
// ---------------------------------------------------------------------------

/// Advisory on-screen duration rating. Never a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationClass {
    TooShort,
    WithinRange,
    TooLong,
}

pub fn classify_duration(duration: f64, min_duration: f64, max_duration: f64) -> DurationClass {
    if duration < min_duration {
        DurationClass::TooShort
    } else if duration > max_duration {
        DurationClass::TooLong
    } else {
        DurationClass::WithinRange
    }
}
