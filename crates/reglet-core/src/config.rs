//! Ruler configuration.
//!
//! A [`RulerConfig`] is owned by the engine and replaced wholesale on every
//! reconfiguration call; it is never partially mutated. Each replacement
//! triggers a full rebuild of the segment table and the snap cache.

use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::number::{scale, ScaledValue};

/// Tolerance used when checking gap-rule contiguity and coverage.
pub const RULE_TOLERANCE: f32 = 1e-4;

/// A value segment with its own pixel density.
///
/// `px_per_unit` is pixels per 1.0 of value, so the segment spans
/// `(end_value - start_value) * px_per_unit` pixels and a single tick spans
/// `px_per_unit * unit` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRule {
    pub start_value: f32,
    pub end_value: f32,
    pub px_per_unit: f32,
}

impl GapRule {
    pub fn new(start_value: f32, end_value: f32, px_per_unit: f32) -> Self {
        Self {
            start_value,
            end_value,
            px_per_unit,
        }
    }
}

/// A value forced to behave as a major tick regardless of the
/// ticks-per-major cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialTick {
    pub value: f32,
    pub show_label: bool,
}

/// Full numeric configuration of the ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerConfig {
    /// Smallest addressable value.
    pub min_value: f32,
    /// Largest addressable value.
    pub max_value: f32,
    /// Smallest addressable increment.
    pub unit: f32,
    /// Ticks between two consecutive major (labeled) ticks.
    pub ticks_per_major: u32,
    /// Per-segment densities. Empty means uniform density.
    pub gap_rules: SmallVec<[GapRule; 4]>,
    /// Values forced to render and snap as major ticks.
    pub special_ticks: Vec<SpecialTick>,
    /// Uniform pixels per tick, used when `gap_rules` is empty.
    pub uniform_px_per_tick: f32,
    /// Suffix appended to formatted labels.
    pub label_suffix: String,
}

impl RulerConfig {
    /// Default pixels per tick before any viewport-derived density is known.
    pub const DEFAULT_PX_PER_TICK: f32 = 10.0;

    pub fn new(min_value: f32, max_value: f32, unit: f32, ticks_per_major: u32) -> Self {
        Self {
            min_value,
            max_value,
            unit,
            ticks_per_major,
            gap_rules: SmallVec::new(),
            special_ticks: Vec::new(),
            uniform_px_per_tick: Self::DEFAULT_PX_PER_TICK,
            label_suffix: String::new(),
        }
    }

    /// True when tick math cannot work: snapping and conversion are then
    /// disabled rather than dividing by zero.
    pub fn is_degenerate(&self) -> bool {
        !(self.min_value < self.max_value) || self.unit <= 0.0
    }

    pub fn scaled_min(&self) -> ScaledValue {
        scale(self.min_value)
    }

    pub fn scaled_max(&self) -> ScaledValue {
        scale(self.max_value)
    }

    /// The scaled value of one tick step. Zero for degenerate configs.
    pub fn scaled_unit(&self) -> ScaledValue {
        if self.unit <= 0.0 {
            0
        } else {
            scale(self.unit).max(1)
        }
    }

    /// The scaled span between two major ticks.
    pub fn major_interval(&self) -> ScaledValue {
        self.scaled_unit() * self.ticks_per_major.max(1) as ScaledValue
    }

    /// Total number of tick steps across the range.
    pub fn tick_count(&self) -> i32 {
        let unit = self.scaled_unit();
        if unit == 0 {
            return 0;
        }
        ((self.scaled_max() - self.scaled_min()) as f32 / unit as f32).round() as i32
    }

    /// Validates a gap-rule list: non-empty, each rule forward and with
    /// positive density, and each rule beginning where the previous ended
    /// (within [`RULE_TOLERANCE`]).
    pub fn validate_gap_rules(rules: &[GapRule]) -> Result<(), ConfigError> {
        let first = match rules.first() {
            Some(rule) => rule,
            None => return Err(ConfigError::Empty),
        };
        let mut expected_start = first.start_value;
        for rule in rules {
            if rule.start_value >= rule.end_value {
                return Err(ConfigError::ReversedRule {
                    start: rule.start_value,
                    end: rule.end_value,
                });
            }
            if rule.px_per_unit <= 0.0 {
                return Err(ConfigError::NonPositiveDensity {
                    px_per_unit: rule.px_per_unit,
                });
            }
            if (rule.start_value - expected_start).abs() > RULE_TOLERANCE {
                return Err(ConfigError::NotContiguous {
                    expected_start,
                    found_start: rule.start_value,
                });
            }
            expected_start = rule.end_value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_rules_validate() {
        let rules = [GapRule::new(0.0, 2.0, 100.0), GapRule::new(2.0, 10.0, 20.0)];
        assert!(RulerConfig::validate_gap_rules(&rules).is_ok());
    }

    #[test]
    fn gap_between_rules_is_rejected() {
        let rules = [GapRule::new(0.0, 2.0, 100.0), GapRule::new(2.5, 10.0, 20.0)];
        assert!(matches!(
            RulerConfig::validate_gap_rules(&rules),
            Err(ConfigError::NotContiguous { .. })
        ));
    }

    #[test]
    fn overlapping_rules_are_rejected() {
        let rules = [GapRule::new(0.0, 3.0, 100.0), GapRule::new(2.0, 10.0, 20.0)];
        assert!(matches!(
            RulerConfig::validate_gap_rules(&rules),
            Err(ConfigError::NotContiguous { .. })
        ));
    }

    #[test]
    fn reversed_rule_is_rejected() {
        let rules = [GapRule::new(2.0, 0.0, 100.0)];
        assert!(matches!(
            RulerConfig::validate_gap_rules(&rules),
            Err(ConfigError::ReversedRule { .. })
        ));
    }

    #[test]
    fn empty_rule_list_is_rejected() {
        assert_eq!(
            RulerConfig::validate_gap_rules(&[]),
            Err(ConfigError::Empty)
        );
    }

    #[test]
    fn contiguity_tolerates_float_noise() {
        let rules = [
            GapRule::new(0.0, 2.00001, 100.0),
            GapRule::new(2.0, 10.0, 20.0),
        ];
        assert!(RulerConfig::validate_gap_rules(&rules).is_ok());
    }

    #[test]
    fn degenerate_configs_are_flagged() {
        assert!(RulerConfig::new(5.0, 5.0, 0.1, 10).is_degenerate());
        assert!(RulerConfig::new(0.0, 10.0, 0.0, 10).is_degenerate());
        assert!(!RulerConfig::new(0.0, 10.0, 0.1, 10).is_degenerate());
    }

    #[test]
    fn tick_count_spans_the_range() {
        let config = RulerConfig::new(0.0, 10.0, 0.1, 10);
        assert_eq!(config.tick_count(), 100);
        assert_eq!(config.major_interval(), 10);
    }
}
