//! Lyric scene planning domain library.
//!
//! Turns a timed lyric transcript into the smallest set of scene visuals
//! that still follows the song, and compiles those scenes into a
//! frame-accurate, crossfaded timeline:
//!
//! - [`srt`] / [`segment`]: subtitle reading and transcript ingestion.
//! - [`grouping`]: the grouping & optimization engine, built from
//!   [`markers`], [`repetition`], [`gaps`] and [`stats`].
//! - [`timeline`]: seconds to frames with crossfade overlap.
//! - [`outro`]: closing thumbnail grid and its reveal stagger.
//! - [`prompt`] / [`manifest`]: generation prompts and the export document.
//!
//! No I/O, no async, no global state.

pub mod config;
pub mod error;
pub mod gaps;
pub mod grouping;
pub mod manifest;
pub mod markers;
pub mod outro;
pub mod prompt;
pub mod repetition;
pub mod scene;
pub mod segment;
pub mod srt;
pub mod stats;
pub mod timeline;
pub mod types;

pub use config::GroupingConfig;
pub use error::CoreError;
pub use grouping::{group, group_with_prompts, GroupingResult};
pub use manifest::{ManifestSource, ProjectManifest};
pub use outro::{layout_grid, reveal_order, GridLayout};
pub use prompt::PromptBuilder;
pub use scene::SceneGroup;
pub use segment::{ingest, RawCue, TimelineSegment};
pub use timeline::{compile, Placement};
