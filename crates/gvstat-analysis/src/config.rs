//! Parameters of the age statistics
//!
//! [`AggregationConfig`] bounds the age buckets and the survival-rate display.
//! The defaults reproduce the dashboard's charts; every field can be overridden
//! per run and is part of the cache fingerprint.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Exclusive upper bound on bucketed ages.
pub const DEFAULT_MAX_AGE: u32 = 110;
/// Exclusive upper bound on the ages shown in survival-rate curves.
pub const DEFAULT_SURVIVAL_MAX_DISPLAY_AGE: u32 = 85;
/// Half-width of the survival smoothing window (1 gives a 3-age window).
pub const DEFAULT_SURVIVAL_WINDOW_RADIUS: u32 = 1;
/// Largest accepted `max_age`, bounding the size of the per-age buckets.
pub const MAX_SUPPORTED_AGE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub max_age: u32,
    pub survival_max_display_age: u32,
    pub survival_window_radius: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            survival_max_display_age: DEFAULT_SURVIVAL_MAX_DISPLAY_AGE,
            survival_window_radius: DEFAULT_SURVIVAL_WINDOW_RADIUS,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("max_age must be positive")]
    ZeroMaxAge,
    #[display("max_age {max_age} exceeds the supported limit {limit}")]
    MaxAgeTooLarge { max_age: u32, limit: u32 },
    #[display(
        "survival window radius {radius} exceeds the survival display bound {display_max}"
    )]
    RadiusTooLarge { radius: u32, display_max: u32 },
    #[display(
        "survival windows up to age {display_max} + {radius} do not fit below max_age {max_age}"
    )]
    WindowOutOfRange {
        display_max: u32,
        radius: u32,
        max_age: u32,
    },
}

impl AggregationConfig {
    /// Checks that the age buckets have a supported size and that every
    /// survival window lies inside them.
    ///
    /// # Examples
    ///
    /// ```
    /// use gvstat_analysis::config::AggregationConfig;
    ///
    /// assert!(AggregationConfig::default().validate().is_ok());
    ///
    /// let config = AggregationConfig {
    ///     max_age: 85,
    ///     ..AggregationConfig::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            max_age,
            survival_max_display_age: display_max,
            survival_window_radius: radius,
        } = *self;
        if max_age == 0 {
            return Err(ConfigError::ZeroMaxAge);
        }
        if max_age > MAX_SUPPORTED_AGE {
            return Err(ConfigError::MaxAgeTooLarge {
                max_age,
                limit: MAX_SUPPORTED_AGE,
            });
        }
        if radius > display_max {
            return Err(ConfigError::RadiusTooLarge {
                radius,
                display_max,
            });
        }
        // The last displayed age is display_max - 1, whose window ends at display_max - 1 + radius.
        if display_max.saturating_add(radius) > max_age {
            return Err(ConfigError::WindowOutOfRange {
                display_max,
                radius,
                max_age,
            });
        }
        Ok(())
    }

    /// Number of age buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        usize::try_from(self.max_age).unwrap_or(usize::MAX)
    }

    /// Ages at which survival rates are reported.
    ///
    /// With the defaults this is `1..85`.
    #[must_use]
    pub fn survival_display_ages(&self) -> Range<u32> {
        self.survival_window_radius..self.survival_max_display_age
    }
}
