use crate::types::SegmentId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Transcript is empty: no segments to group")]
    EmptyTranscript,

    #[error(
        "Segments must be sorted by start: segment at index {index} starts at {start}s, \
         before the previous segment at {previous_start}s"
    )]
    UnsortedSegments {
        index: usize,
        start: f64,
        previous_start: f64,
    },

    #[error("Segment {id} has an invalid time range: {message}")]
    InvalidSegment { id: SegmentId, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to parse subtitle block {block}: {message}")]
    Parse { block: usize, message: String },

    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),
}
