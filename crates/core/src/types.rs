/// Transcript segment ids are assigned sequentially from 1 on ingestion.
pub type SegmentId = u32;

/// Scene group ids are assigned sequentially from 1 as groups are created.
pub type GroupId = u32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
