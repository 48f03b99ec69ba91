//! Savings accounting for a grouped transcript.
//!
//! Statistics are derived values: recompute them whenever the group list
//! changes, never cache them.

use serde::{Deserialize, Serialize};

use crate::scene::SceneGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingStats {
    /// Transcript lines fed to the engine.
    pub original_count: usize,
    pub group_count: usize,
    /// Groups that need their own generated visual.
    pub unique_image_count: usize,
    pub reused_count: usize,
    /// Visuals avoided relative to one visual per line, in percent.
    pub savings_percent: f64,
    /// Visuals avoided times the per-image price.
    pub estimated_cost_savings: f64,
}

pub fn compute_stats(
    original_count: usize,
    groups: &[SceneGroup],
    cost_per_image: f64,
) -> GroupingStats {
    let group_count = groups.len();
    let reused_count = groups.iter().filter(|g| g.is_reused).count();
    let unique_image_count = group_count - reused_count;

    let avoided = original_count.saturating_sub(unique_image_count);
    let savings_percent = if original_count == 0 {
        0.0
    } else {
        avoided as f64 / original_count as f64 * 100.0
    };

    GroupingStats {
        original_count,
        group_count,
        unique_image_count,
        reused_count,
        savings_percent,
        estimated_cost_savings: avoided as f64 * cost_per_image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::TimelineSegment;

    fn groups(count: u32, reused: &[u32]) -> Vec<SceneGroup> {
        (1..=count)
            .map(|id| {
                let seg = TimelineSegment::new(id, id, id as f64, id as f64 + 1.0, "x");
                let mut group = SceneGroup::from_members(id, &[&seg], String::new());
                if reused.contains(&id) {
                    group.mark_reused(1);
                }
                group
            })
            .collect()
    }

    #[test]
    fn counts_unique_and_reused() {
        let stats = compute_stats(10, &groups(5, &[4, 5]), 0.12);
        assert_eq!(stats.original_count, 10);
        assert_eq!(stats.group_count, 5);
        assert_eq!(stats.unique_image_count, 3);
        assert_eq!(stats.reused_count, 2);
        assert!((stats.savings_percent - 70.0).abs() < 1e-9);
        assert!((stats.estimated_cost_savings - 0.84).abs() < 1e-9);
    }

    #[test]
    fn savings_never_negative() {
        // Gap fillers can push the group count above the line count.
        let stats = compute_stats(2, &groups(4, &[]), 0.12);
        assert_eq!(stats.savings_percent, 0.0);
        assert_eq!(stats.estimated_cost_savings, 0.0);
    }

    #[test]
    fn empty_input_has_zero_savings() {
        let stats = compute_stats(0, &[], 0.12);
        assert_eq!(stats.group_count, 0);
        assert_eq!(stats.savings_percent, 0.0);
    }
}
