//! End-to-end tests: subtitle text through grouping and timeline compilation.
//!
//! Covers the reference scenarios and the structural properties every
//! grouping result and compiled timeline must satisfy.

use std::collections::{HashMap, HashSet};

use lyricscene_core::markers::{classify_marker, MarkerKind};
use lyricscene_core::srt::parse_srt;
use lyricscene_core::{compile, group, ingest, GroupingConfig, GroupingResult, RawCue, SceneGroup};

/// Build SRT text from `(start, end, text)` triples.
fn srt(cues: &[(f64, f64, &str)]) -> String {
    fn stamp(secs: f64) -> String {
        let millis = (secs * 1000.0).round() as u64;
        format!(
            "{:02}:{:02}:{:02},{:03}",
            millis / 3_600_000,
            millis / 60_000 % 60,
            millis / 1000 % 60,
            millis % 1000
        )
    }
    cues.iter()
        .enumerate()
        .map(|(i, (start, end, text))| {
            format!("{}\n{} --> {}\n{}\n", i + 1, stamp(*start), stamp(*end), text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn plan(cues: &[(f64, f64, &str)]) -> GroupingResult {
    let raw = parse_srt(&srt(cues)).expect("SRT should parse");
    let segments = ingest(raw).expect("cues should ingest");
    group(segments, &GroupingConfig::default()).expect("grouping should succeed")
}

fn overlaps(a: &SceneGroup, b: &SceneGroup) -> bool {
    a.start < b.end && b.start < a.end
}

/// A small song exercising every branch: intro, labels, repeats, a gap.
fn song() -> Vec<(f64, f64, &'static str)> {
    vec![
        (0.0, 4.0, "[Intro]"),
        (4.0, 5.0, "[Verse 1]"),
        (5.0, 6.5, "City lights are calling"),
        (6.5, 8.0, "Out across the water (water)"),
        (8.0, 11.0, "We keep on running"),
        (11.0, 12.0, "[Chorus]"),
        (12.0, 15.0, "Hold on to tonight"),
        (15.0, 18.0, "Never let it go"),
        (25.0, 27.0, "[Guitar Solo]"),
        (27.0, 36.0, "[Instrumental]"),
        (36.0, 37.0, "[Chorus]"),
        (37.0, 40.0, "Hold on to tonight!"),
        (40.0, 43.0, "Never let it go"),
        (43.0, 47.0, "[Outro]"),
    ]
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn short_lines_group_greedily_with_short_tail() {
    let result = plan(&[
        (0.0, 1.5, "first line"),
        (1.5, 3.0, "second line"),
        (3.0, 4.5, "third line"),
        (4.5, 6.0, "fourth line"),
        (6.0, 7.5, "fifth line"),
    ]);

    let sizes: Vec<usize> = result
        .scene_groups
        .iter()
        .map(|g| g.member_segment_ids.len())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let durations: Vec<f64> = result.scene_groups.iter().map(|g| g.duration).collect();
    for (actual, expected) in durations.iter().zip([3.0, 3.0, 1.5]) {
        assert!((actual - expected).abs() < 1e-9, "{durations:?}");
    }
}

#[test]
fn repeated_line_links_to_first_occurrence() {
    let mut cues: Vec<(f64, f64, String)> = (0..10)
        .map(|i| {
            let start = i as f64 * 3.0;
            (start, start + 3.0, format!("unique line number {i}"))
        })
        .collect();
    cues[1].2 = "hello world".to_string();
    cues[8].2 = "Hello world".to_string();
    let borrowed: Vec<(f64, f64, &str)> =
        cues.iter().map(|(s, e, t)| (*s, *e, t.as_str())).collect();

    let result = plan(&borrowed);

    let canonical = result.group_for_segment(2).expect("segment 2 is grouped");
    let reused = result.group_for_segment(9).expect("segment 9 is grouped");
    assert!(!canonical.is_reused);
    assert!(reused.is_reused);
    assert_eq!(reused.canonical_group_id, Some(canonical.id));
    assert_eq!(result.stats.reused_count, 1);
}

#[test]
fn six_second_void_gets_two_fillers() {
    let result = plan(&[(17.0, 20.0, "before the silence"), (26.0, 29.0, "after the silence")]);

    let fillers: Vec<&SceneGroup> = result
        .scene_groups
        .iter()
        .filter(|g| g.is_gap_filler)
        .collect();
    assert_eq!(fillers.len(), 2);
    assert!((fillers[0].start - 20.0).abs() < 1e-9);
    assert!((fillers[0].end - 23.0).abs() < 1e-9);
    assert!((fillers[1].start - 23.0).abs() < 1e-9);
    assert!((fillers[1].end - 26.0).abs() < 1e-9);
}

#[test]
fn two_five_second_groups_compile_with_fifteen_frame_overlap() {
    let result = plan(&[(0.0, 5.0, "first long line"), (5.0, 10.0, "second long line")]);
    let placements = compile(&result.scene_groups, 30.0, 0.5).expect("timeline compiles");

    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].start_frame, 0);
    assert_eq!(placements[1].start_frame, 135);
    assert_eq!(placements[0].end_frame() - placements[1].start_frame, 15);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn every_ordinary_line_belongs_to_exactly_one_group() {
    let result = plan(&song());

    let mut owners: HashMap<u32, u32> = HashMap::new();
    for g in result
        .scene_groups
        .iter()
        .filter(|g| !g.is_instrumental && !g.is_gap_filler)
    {
        for id in &g.member_segment_ids {
            assert!(owners.insert(*id, g.id).is_none(), "segment {id} grouped twice");
        }
    }

    for segment in &result.lyric_lines {
        let is_lyric = classify_marker(&segment.text_cleaned) == MarkerKind::Lyric;
        assert_eq!(owners.contains_key(&segment.id), is_lyric, "segment {}", segment.id);
        if is_lyric {
            assert_eq!(segment.assigned_group_id, owners.get(&segment.id).copied());
        }
    }
}

#[test]
fn reuse_links_are_well_formed() {
    let result = plan(&song());
    let by_id: HashMap<u32, &SceneGroup> =
        result.scene_groups.iter().map(|g| (g.id, g)).collect();

    assert!(result.stats.reused_count >= 1);
    for g in &result.scene_groups {
        assert_eq!(g.is_reused, g.canonical_group_id.is_some());
        if let Some(canonical) = g.canonical_group_id {
            let target = by_id[&canonical];
            assert_ne!(target.id, g.id);
            assert!(!target.is_reused);
            assert!(target.start < g.start);
        }
    }
}

#[test]
fn fillers_do_not_overlap_anything() {
    let result = plan(&song());
    let fillers: Vec<&SceneGroup> = result
        .scene_groups
        .iter()
        .filter(|g| g.is_gap_filler)
        .collect();
    assert!(!fillers.is_empty());

    for filler in &fillers {
        for other in result.scene_groups.iter().filter(|g| g.id != filler.id) {
            assert!(!overlaps(filler, other), "{} overlaps {}", filler.id, other.id);
        }
        for segment in &result.lyric_lines {
            assert!(!(filler.start < segment.end && segment.start < filler.end));
        }
    }
}

#[test]
fn long_instrumental_stretch_is_sliced() {
    let result = plan(&song());
    let instrumental: Vec<&SceneGroup> = result
        .scene_groups
        .iter()
        .filter(|g| g.is_instrumental && !g.is_gap_filler)
        .collect();

    // Intro (4s, one group), solo + instrumental (11s, three slices), outro.
    assert_eq!(instrumental.len(), 5);
    assert_eq!(instrumental[0].member_segment_ids, vec![1]);
    assert!(instrumental[1..4].iter().all(|g| (g.duration - 11.0 / 3.0).abs() < 1e-9));
}

#[test]
fn compiled_song_has_constant_overlap_and_is_stable() {
    let result = plan(&song());
    let first = compile(&result.scene_groups, 30.0, 0.5).expect("timeline compiles");
    let second = compile(&result.scene_groups, 30.0, 0.5).expect("timeline compiles");
    assert_eq!(first, second);

    for pair in first.windows(2) {
        assert_eq!(pair[0].end_frame() - pair[1].start_frame, 15);
        assert_eq!(pair[0].fade_out_frames, pair[1].fade_in_frames);
    }
}

#[test]
fn savings_count_unique_images() {
    let result = plan(&song());
    let unique: HashSet<u32> = result
        .scene_groups
        .iter()
        .filter(|g| !g.is_reused)
        .map(|g| g.id)
        .collect();
    assert_eq!(result.stats.unique_image_count, unique.len());
    assert_eq!(result.stats.original_count, song().len());
}

#[test]
fn malformed_cue_times_are_rejected() {
    let err = ingest(vec![RawCue::new(5.0, 4.0, "backwards")]).unwrap_err();
    assert!(err.to_string().contains("Segment 1"));
}
