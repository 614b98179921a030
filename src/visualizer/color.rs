//! Amplitude → color classification.
//!
//! | Tag       | Condition on `abs(sample)` | Rendered as   |
//! |-----------|----------------------------|---------------|
//! | `Intense` | `> high`, or non-finite    | bright red    |
//! | `Strong`  | `> medium`                 | yellow        |
//! | `Mild`    | `> low`                    | green         |
//! | `Faint`   | otherwise                  | dim white     |
//!
//! NaN and ±Infinity are classified `Intense`: a corrupt sample is worth
//! noticing, and the rule stays total and deterministic.
//!
//! ```rust
//! use mic_visualizer::visualizer::{ColorTag, ColorThresholds};
//!
//! let t = ColorThresholds::default();
//! assert_eq!(t.classify(0.05), ColorTag::Faint);
//! assert_eq!(t.classify(-0.7), ColorTag::Intense);
//! assert_eq!(t.classify(f32::NAN), ColorTag::Intense);
//! ```

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// ColorTag
// ---------------------------------------------------------------------------

/// Amplitude severity of a sample, ordered from coolest to hottest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorTag {
    Faint,
    Mild,
    Strong,
    Intense,
}

impl ColorTag {
    /// Legend label.
    pub fn label(&self) -> &'static str {
        match self {
            ColorTag::Faint => "Faint",
            ColorTag::Mild => "Low",
            ColorTag::Strong => "Medium",
            ColorTag::Intense => "High",
        }
    }
}

// ---------------------------------------------------------------------------
// ColorThresholds
// ---------------------------------------------------------------------------

/// Immutable cutoffs, `low < medium < high`, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorThresholds {
    pub low: f32,
    pub medium: f32,
    pub high: f32,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            low: 0.1,
            medium: 0.3,
            high: 0.6,
        }
    }
}

impl ColorThresholds {
    /// Classify one sample by magnitude.  Pure and total over all `f32`.
    pub fn classify(&self, sample: f32) -> ColorTag {
        let magnitude = sample.abs();
        if !magnitude.is_finite() || magnitude > self.high {
            ColorTag::Intense
        } else if magnitude > self.medium {
            ColorTag::Strong
        } else if magnitude > self.low {
            ColorTag::Mild
        } else {
            ColorTag::Faint
        }
    }

    /// Each cutoff must be finite, in `(0, 1]`, and strictly above the
    /// previous one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("low", self.low), ("medium", self.medium), ("high", self.high)] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if !(self.low < self.medium && self.medium < self.high) {
            return Err(ConfigError::ThresholdOrder {
                low: self.low,
                medium: self.medium,
                high: self.high,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mixed_block_classification() {
        let t = ColorThresholds::default();
        let tags: Vec<ColorTag> = [0.05_f32, -0.2, 0.4, -0.7]
            .iter()
            .map(|&s| t.classify(s))
            .collect();
        assert_eq!(
            tags,
            vec![ColorTag::Faint, ColorTag::Mild, ColorTag::Strong, ColorTag::Intense]
        );
    }

    #[test]
    fn cutoffs_are_exclusive() {
        let t = ColorThresholds::default();
        assert_eq!(t.classify(0.1), ColorTag::Faint);
        assert_eq!(t.classify(0.3), ColorTag::Mild);
        assert_eq!(t.classify(0.6), ColorTag::Strong);
        assert_eq!(t.classify(0.0), ColorTag::Faint);
    }

    #[test]
    fn non_finite_samples_are_intense() {
        let t = ColorThresholds::default();
        assert_eq!(t.classify(f32::NAN), ColorTag::Intense);
        assert_eq!(t.classify(f32::INFINITY), ColorTag::Intense);
        assert_eq!(t.classify(f32::NEG_INFINITY), ColorTag::Intense);
    }

    #[test]
    fn default_thresholds_are_valid() {
        assert!(ColorThresholds::default().validate().is_ok());
    }

    #[test]
    fn unordered_thresholds_rejected() {
        let t = ColorThresholds {
            low: 0.3,
            medium: 0.3,
            high: 0.6,
        };
        assert!(matches!(t.validate(), Err(ConfigError::ThresholdOrder { .. })));
    }

    #[test]
    fn out_of_range_thresholds_rejected() {
        let t = ColorThresholds {
            low: 0.0,
            ..ColorThresholds::default()
        };
        assert_eq!(
            t.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "low",
                value: 0.0
            })
        );

        let t = ColorThresholds {
            high: f32::NAN,
            ..ColorThresholds::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::ThresholdOutOfRange { name: "high", .. })
        ));

        let t = ColorThresholds {
            high: 1.5,
            ..ColorThresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn tags_are_ordered_by_heat() {
        assert!(ColorTag::Faint < ColorTag::Mild);
        assert!(ColorTag::Mild < ColorTag::Strong);
        assert!(ColorTag::Strong < ColorTag::Intense);
    }

    proptest! {
        #[test]
        fn depends_only_on_magnitude(v in any::<f32>()) {
            let t = ColorThresholds::default();
            prop_assert_eq!(t.classify(v), t.classify(-v));
            prop_assert_eq!(t.classify(v), t.classify(v.abs()));
        }

        #[test]
        fn larger_magnitude_is_never_cooler(a in -2.0_f32..2.0, b in -2.0_f32..2.0) {
            let t = ColorThresholds::default();
            let (small, large) = if a.abs() <= b.abs() { (a, b) } else { (b, a) };
            prop_assert!(t.classify(small) <= t.classify(large));
        }
    }
}
