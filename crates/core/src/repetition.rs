//! Repeated-lyric detection and visual reuse linking.
//!
//! Lines whose normalized text occurs more than once link the groups that
//! contain them: the group holding the first occurrence stays canonical and
//! every later group is marked reused, borrowing the canonical visual.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::markers::{classify_marker, MarkerKind};
use crate::scene::SceneGroup;
use crate::segment::TimelineSegment;
use crate::types::{GroupId, SegmentId};

/// Normalized lines must be longer than this to count as a repeat.
pub const MIN_REPEAT_TEXT_LEN: usize = 5;

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize_lyric(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized texts shared by two or more ordinary lyric segments, in
/// transcript order of first occurrence, each with its segment ids in
/// transcript order.
pub fn find_repeated_lines(segments: &[TimelineSegment]) -> IndexMap<String, Vec<SegmentId>> {
    let mut occurrences: IndexMap<String, Vec<SegmentId>> = IndexMap::new();
    for segment in segments {
        if classify_marker(&segment.text_cleaned) != MarkerKind::Lyric {
            continue;
        }
        let key = normalize_lyric(&segment.text_cleaned);
        if key.chars().count() <= MIN_REPEAT_TEXT_LEN {
            continue;
        }
        occurrences.entry(key).or_default().push(segment.id);
    }
    occurrences.retain(|_, ids| ids.len() >= 2);
    occurrences
}

/// Mark groups containing repeated lines as reused.
///
/// Only non-instrumental, non-filler groups take part. A group already
/// reused is not reprocessed, and a group that is canonical for an earlier
/// repeat is never demoted. Returns the number of groups newly marked.
pub fn link_repetitions(segments: &[TimelineSegment], groups: &mut [SceneGroup]) -> usize {
    let repeated = find_repeated_lines(segments);
    if repeated.is_empty() {
        return 0;
    }

    let mut group_of_segment: HashMap<SegmentId, usize> = HashMap::new();
    for (idx, group) in groups.iter().enumerate() {
        if group.is_instrumental || group.is_gap_filler {
            continue;
        }
        for &segment_id in &group.member_segment_ids {
            group_of_segment.entry(segment_id).or_insert(idx);
        }
    }

    let mut canonical_ids: HashSet<GroupId> = HashSet::new();
    let mut linked = 0;

    for (key, segment_ids) in &repeated {
        let mut candidates: Vec<usize> = Vec::new();
        for segment_id in segment_ids {
            if let Some(&idx) = group_of_segment.get(segment_id) {
                if !candidates.contains(&idx) {
                    candidates.push(idx);
                }
            }
        }
        candidates.retain(|&idx| !groups[idx].is_reused);
        if candidates.len() < 2 {
            continue;
        }

        let canonical_idx = candidates[0];
        let canonical_id = groups[canonical_idx].id;
        for &idx in &candidates[1..] {
            if canonical_ids.contains(&groups[idx].id) {
                continue;
            }
            groups[idx].mark_reused(canonical_id);
            linked += 1;
            tracing::debug!(
                group_id = groups[idx].id,
                canonical_group_id = canonical_id,
                text = %key,
                "Linked repeated lyric group to canonical visual",
            );
        }
        canonical_ids.insert(canonical_id);
    }

    linked
}
