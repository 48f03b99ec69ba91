//! Planner settings read from `LYRICSCENE_*` environment variables.

use std::str::FromStr;

use lyricscene_core::config::{
    GroupingConfig, DEFAULT_COST_PER_IMAGE, DEFAULT_GAP_SLICE_SECS, DEFAULT_MAX_DURATION_SECS,
    DEFAULT_MIN_DURATION_SECS, DEFAULT_MIN_GAP_SECS,
};
use lyricscene_core::prompt::DEFAULT_BASE_STYLE;
use lyricscene_core::timeline::{DEFAULT_CROSSFADE_SECS, DEFAULT_FPS};
use lyricscene_core::CoreError;

/// Planner configuration loaded from environment variables.
///
/// Every variable is optional. A value that does not parse is logged and
/// replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Output frame rate (default: `30`).
    pub fps: f64,
    /// Crossfade between consecutive scenes in seconds (default: `0.5`).
    pub crossfade_secs: f64,
    /// Style prefix for every generation prompt.
    pub base_style: String,
    pub grouping: GroupingConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            base_style: DEFAULT_BASE_STYLE.to_string(),
            grouping: GroupingConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `LYRICSCENE_FPS`              | `30`                        |
    /// | `LYRICSCENE_CROSSFADE_SECS`   | `0.5`                       |
    /// | `LYRICSCENE_MIN_SCENE_SECS`   | `3`                         |
    /// | `LYRICSCENE_MAX_SCENE_SECS`   | `12`                        |
    /// | `LYRICSCENE_GAP_SLICE_SECS`   | `4`                         |
    /// | `LYRICSCENE_MIN_GAP_SECS`     | `2`                         |
    /// | `LYRICSCENE_FILL_LEADING_GAP` | `false`                     |
    /// | `LYRICSCENE_COST_PER_IMAGE`   | `0.12`                      |
    /// | `LYRICSCENE_BASE_STYLE`       | `photorealistic, cinematic` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_style = lookup("LYRICSCENE_BASE_STYLE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_STYLE.to_string());

        let grouping = GroupingConfig {
            min_duration: parse_or(&lookup, "LYRICSCENE_MIN_SCENE_SECS", DEFAULT_MIN_DURATION_SECS),
            max_duration: parse_or(&lookup, "LYRICSCENE_MAX_SCENE_SECS", DEFAULT_MAX_DURATION_SECS),
            target_gap_slice_duration: parse_or(
                &lookup,
                "LYRICSCENE_GAP_SLICE_SECS",
                DEFAULT_GAP_SLICE_SECS,
            ),
            min_gap_duration: parse_or(&lookup, "LYRICSCENE_MIN_GAP_SECS", DEFAULT_MIN_GAP_SECS),
            fill_leading_gap: parse_flag(&lookup, "LYRICSCENE_FILL_LEADING_GAP", false),
            cost_per_image: parse_or(&lookup, "LYRICSCENE_COST_PER_IMAGE", DEFAULT_COST_PER_IMAGE),
        };

        Self {
            fps: parse_or(&lookup, "LYRICSCENE_FPS", DEFAULT_FPS),
            crossfade_secs: parse_or(&lookup, "LYRICSCENE_CROSSFADE_SECS", DEFAULT_CROSSFADE_SECS),
            base_style,
            grouping,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.grouping.validate()?;
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(CoreError::Validation(format!(
                "fps must be a finite number > 0, got {}",
                self.fps
            )));
        }
        if !self.crossfade_secs.is_finite() || self.crossfade_secs < 0.0 {
            return Err(CoreError::Validation(format!(
                "crossfade_secs must be a finite number >= 0, got {}",
                self.crossfade_secs
            )));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "Ignoring unparseable config value, using default");
        default
    })
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config flag, using default");
            default
        }
    }
}
