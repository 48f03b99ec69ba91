//! Grouping engine configuration, defaults and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// A lyric run keeps absorbing lines until it spans at least this long.
pub const DEFAULT_MIN_DURATION_SECS: f64 = 3.0;

/// Advisory upper bound; groups above it are reported, never split.
pub const DEFAULT_MAX_DURATION_SECS: f64 = 12.0;

/// Target width of each synthetic gap-filler group.
pub const DEFAULT_GAP_SLICE_SECS: f64 = 4.0;

/// Uncovered stretches shorter than this are not filled.
pub const DEFAULT_MIN_GAP_SECS: f64 = 2.0;

/// Estimated price of one generated image, in USD.
pub const DEFAULT_COST_PER_IMAGE: f64 = 0.12;

// ---------------------------------------------------------------------------
// GroupingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub min_duration: f64,
    pub max_duration: f64,
    pub target_gap_slice_duration: f64,
    pub min_gap_duration: f64,
    /// Also fill the stretch between `0.0` and the first line.
    pub fill_leading_gap: bool,
    pub cost_per_image: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_duration: DEFAULT_MIN_DURATION_SECS,
            max_duration: DEFAULT_MAX_DURATION_SECS,
            target_gap_slice_duration: DEFAULT_GAP_SLICE_SECS,
            min_gap_duration: DEFAULT_MIN_GAP_SECS,
            fill_leading_gap: false,
            cost_per_image: DEFAULT_COST_PER_IMAGE,
        }
    }
}

impl GroupingConfig {
    /// Check every field is finite and in range.
    ///
    /// `max_duration` must not be below `min_duration`; slice and gap
    /// widths must be positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_non_negative(self.min_duration, "min_duration")?;
        validate_non_negative(self.max_duration, "max_duration")?;
        validate_positive(self.target_gap_slice_duration, "target_gap_slice_duration")?;
        validate_positive(self.min_gap_duration, "min_gap_duration")?;
        validate_non_negative(self.cost_per_image, "cost_per_image")?;
        if self.max_duration < self.min_duration {
            return Err(CoreError::Validation(format!(
                "max_duration ({}) must be >= min_duration ({})",
                self.max_duration, self.min_duration
            )));
        }
        Ok(())
    }
}

fn validate_non_negative(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number >= 0, got {value}"
        )));
    }
    Ok(())
}

fn validate_positive(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number > 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GroupingConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_max_below_min() {
        let config = GroupingConfig {
            min_duration: 5.0,
            max_duration: 4.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_slice_width() {
        let config = GroupingConfig {
            target_gap_slice_duration: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_fields() {
        let config = GroupingConfig {
            min_duration: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_min_duration_is_allowed() {
        let config = GroupingConfig {
            min_duration: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
