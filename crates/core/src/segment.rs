//! Transcript segments: the timed lyric lines the grouping engine consumes.
//!
//! Provides the raw cue type produced by subtitle readers, background-vocal
//! cleaning, and ingestion into immutable [`TimelineSegment`]s with stable
//! ids.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{GroupId, SegmentId};

/// Parenthetical asides, e.g. background vocals: `"We are (stardust)"`.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One timed line as read from a subtitle source, before ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl RawCue {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// One transcript line with its timing, in seconds.
///
/// Read-only after ingestion except for `assigned_group_id`, which the
/// grouping engine fills in as a back-reference to the owning group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub id: SegmentId,
    /// 1-based position in the source transcript.
    pub sequence: u32,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub text: String,
    /// `text` with parenthetical asides removed.
    pub text_cleaned: String,
    pub assigned_group_id: Option<GroupId>,
}

impl TimelineSegment {
    pub fn new(id: SegmentId, sequence: u32, start: f64, end: f64, text: &str) -> Self {
        Self {
            id,
            sequence,
            start,
            end,
            duration: end - start,
            text: text.to_string(),
            text_cleaned: clean_lyric_text(text),
            assigned_group_id: None,
        }
    }

    /// Midpoint of the segment's interval.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Remove parenthetical asides and collapse whitespace.
///
/// `"We are stardust (stardust, stardust)"` becomes `"We are stardust"`.
pub fn clean_lyric_text(text: &str) -> String {
    let stripped = PARENTHETICAL_RE.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Turn raw cues into timeline segments, assigning `id = sequence = index + 1`.
///
/// Cues are kept in the order given; sorting is the caller's concern and is
/// checked by the grouping engine.
pub fn ingest(cues: Vec<RawCue>) -> Result<Vec<TimelineSegment>, CoreError> {
    cues.into_iter()
        .enumerate()
        .map(|(index, cue)| {
            let id = (index + 1) as SegmentId;
            validate_cue_times(id, cue.start, cue.end)?;
            Ok(TimelineSegment::new(id, id, cue.start, cue.end, &cue.text))
        })
        .collect()
}

fn validate_cue_times(id: SegmentId, start: f64, end: f64) -> Result<(), CoreError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(CoreError::InvalidSegment {
            id,
            message: "start and end must be finite".to_string(),
        });
    }
    if start < 0.0 {
        return Err(CoreError::InvalidSegment {
            id,
            message: format!("start must be >= 0, got {start}"),
        });
    }
    if end < start {
        return Err(CoreError::InvalidSegment {
            id,
            message: format!("end ({end}) is before start ({start})"),
        });
    }
    Ok(())
}
