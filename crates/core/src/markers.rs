//! Bracketed section markers in lyric transcripts.
//!
//! A line whose cleaned text is exactly `[...]` is a marker. Instrumental
//! markers (`[Intro]`, `[Guitar Solo]`) get their own abstract visuals;
//! structural labels (`[Chorus]`, `[Verse 2]`) carry no content and are
//! skipped. Anything else, including unbalanced brackets and mood tags such
//! as `[Emotional]`, is treated as ordinary lyric text.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

/// Words that mark a section without vocals.
pub const INSTRUMENTAL_KEYWORDS: &[&str] = &[
    "instrumental",
    "intro",
    "outro",
    "solo",
    "break",
    "interlude",
    "fade",
    "drop",
];

/// Words that label a sung section.
pub const STRUCTURAL_KEYWORDS: &[&str] = &[
    "chorus",
    "verse",
    "pre-chorus",
    "post-chorus",
    "bridge",
    "hook",
    "refrain",
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Instrumental,
    Structural,
    Lyric,
}

impl MarkerKind {
    pub fn is_marker(self) -> bool {
        !matches!(self, Self::Lyric)
    }
}

/// The text between the brackets if `text` is a single `[...]` marker.
///
/// Returns `None` for unbalanced or nested brackets and for lines with
/// anything outside the brackets.
pub fn marker_label(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.contains('[') || inner.contains(']') {
        return None;
    }
    let inner = inner.trim();
    if inner.is_empty() {
        return None;
    }
    Some(inner)
}

/// Classify a line of (cleaned) lyric text.
///
/// Instrumental keywords win over structural ones, so `[Outro Chorus]` is
/// instrumental.
pub fn classify_marker(text: &str) -> MarkerKind {
    let Some(label) = marker_label(text) else {
        return MarkerKind::Lyric;
    };
    let lower = label.to_lowercase();
    if INSTRUMENTAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        MarkerKind::Instrumental
    } else if STRUCTURAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        MarkerKind::Structural
    } else {
        MarkerKind::Lyric
    }
}

pub fn is_instrumental_marker(text: &str) -> bool {
    classify_marker(text) == MarkerKind::Instrumental
}

pub fn is_structural_label(text: &str) -> bool {
    classify_marker(text) == MarkerKind::Structural
}
