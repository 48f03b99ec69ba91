//! SubRip (`.srt`) transcript reader.
//!
//! Produces [`RawCue`]s for [`crate::segment::ingest`]. Blocks are separated
//! by blank lines; the first line containing `-->` is the timing line and
//! every line after it is lyric text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::segment::RawCue;

/// `HH:MM:SS,mmm` (a `.` millisecond separator is accepted too).
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})$").expect("valid regex")
});

static TIMING_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\d:,.]+)\s*-->\s*([\d:,.]+)").expect("valid regex")
});

const TIMING_ARROW: &str = "-->";

/// Parse an SRT timestamp into seconds.
///
/// Returns `None` if the string is not `HH:MM:SS,mmm`.
pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
    let caps = TIMESTAMP_RE.captures(timestamp.trim())?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    // "5" after a comma means 500ms, not 5ms.
    let millis_str = &caps[4];
    let millis: f64 = millis_str.parse().ok()?;
    let millis = millis * 10f64.powi(3 - millis_str.len() as i32);
    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Parse the full contents of an SRT file into cues, in file order.
///
/// Blocks without a timing line or without any text are skipped. A timing
/// line whose timestamps cannot be read is an error.
pub fn parse_srt(content: &str) -> Result<Vec<RawCue>, CoreError> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cues = Vec::new();

    for (block_idx, block) in split_blocks(&normalized).into_iter().enumerate() {
        let block_no = block_idx + 1;
        let lines: Vec<&str> = block.iter().map(|l| l.trim()).collect();

        let Some(timing_pos) = lines.iter().position(|l| l.contains(TIMING_ARROW)) else {
            tracing::debug!(block = block_no, "Skipping subtitle block without timing line");
            continue;
        };

        let text = lines[timing_pos + 1..]
            .iter()
            .filter(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            tracing::debug!(block = block_no, "Skipping subtitle block without text");
            continue;
        }

        let (start, end) = parse_timing_line(lines[timing_pos]).ok_or_else(|| {
            CoreError::Parse {
                block: block_no,
                message: format!("unreadable timing line '{}'", lines[timing_pos]),
            }
        })?;

        cues.push(RawCue::new(start, end, text));
    }

    Ok(cues)
}

fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let caps = TIMING_LINE_RE.captures(line)?;
    let start = parse_timestamp(&caps[1])?;
    let end = parse_timestamp(&caps[2])?;
    Some((start, end))
}

/// Split on runs of blank (or whitespace-only) lines.
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
