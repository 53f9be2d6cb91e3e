//! Piecewise distance↔value conversion.
//!
//! The canonical position of the ruler is `current_distance`: the pixel
//! offset of the min-value tick from the viewport origin. A [`ScaleMap`] is
//! built once per configuration and converts between that distance and the
//! integer-scaled value, walking the configured segments in order. Both
//! directions are monotonic non-decreasing, and floor rounding never
//! overshoots the input distance.

use smallvec::SmallVec;

use crate::config::RulerConfig;
use crate::number::ScaledValue;

/// Rounding applied when a distance falls between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// Round to the nearest tick.
    Nearest,
    /// Truncate toward the segment start.
    Floor,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    /// Scaled value at the segment start.
    start: ScaledValue,
    /// Scaled value at the segment end.
    end: ScaledValue,
    /// Number of tick steps inside the segment.
    ticks: i32,
    /// Pixels spanned by one tick step.
    px_per_tick: f32,
    /// Total pixel length of the segment.
    px_len: f32,
}

/// Precomputed conversion table between pixel distance and scaled value.
#[derive(Debug, Clone)]
pub struct ScaleMap {
    segments: SmallVec<[Segment; 4]>,
    scaled_unit: ScaledValue,
    min: ScaledValue,
    max: ScaledValue,
    total_px: f32,
}

impl ScaleMap {
    /// Builds the table from a configuration.
    ///
    /// With no gap rules a single synthetic uniform segment covers the whole
    /// range at `uniform_px_per_tick`. A degenerate configuration produces
    /// an empty table that pins every conversion to the minimum.
    pub fn from_config(config: &RulerConfig) -> Self {
        let min = config.scaled_min();
        let max = config.scaled_max();
        let unit = config.scaled_unit();

        if config.is_degenerate() {
            return Self {
                segments: SmallVec::new(),
                scaled_unit: unit.max(1),
                min,
                max: min,
                total_px: 0.0,
            };
        }

        let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
        if config.gap_rules.is_empty() {
            let ticks = config.tick_count();
            segments.push(Segment {
                start: min,
                end: max,
                ticks,
                px_per_tick: config.uniform_px_per_tick,
                px_len: ticks as f32 * config.uniform_px_per_tick,
            });
        } else {
            for rule in &config.gap_rules {
                let start = crate::number::scale(rule.start_value);
                let end = crate::number::scale(rule.end_value);
                let ticks = ((end - start) as f32 / unit as f32).round() as i32;
                if ticks <= 0 {
                    continue;
                }
                let px_per_tick = rule.px_per_unit * config.unit;
                segments.push(Segment {
                    start,
                    end,
                    ticks,
                    px_per_tick,
                    px_len: ticks as f32 * px_per_tick,
                });
            }
        }

        let total_px = segments.iter().map(|s| s.px_len).sum();
        Self {
            segments,
            scaled_unit: unit,
            min,
            max,
            total_px,
        }
    }

    /// True when the configuration could not produce any segment.
    pub fn is_degenerate(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pixel distance between the min and max ticks.
    pub fn total_range_distance(&self) -> f32 {
        self.total_px
    }

    pub fn scaled_min(&self) -> ScaledValue {
        self.min
    }

    pub fn scaled_max(&self) -> ScaledValue {
        self.max
    }

    pub fn scaled_unit(&self) -> ScaledValue {
        self.scaled_unit
    }

    /// Converts a pixel distance to the scaled value of a tick.
    ///
    /// Out-of-range distances clamp to the domain min/max. Rounding is
    /// clamped to the containing segment, so it never spills into a
    /// neighboring segment with a different density.
    pub fn value_from_distance(&self, distance: f32, mode: RoundMode) -> ScaledValue {
        if self.is_degenerate() || distance <= 0.0 {
            return self.min;
        }
        if distance >= self.total_px {
            return self.max;
        }

        let last = self.segments.len() - 1;
        let mut acc = 0.0f32;
        for (i, seg) in self.segments.iter().enumerate() {
            if distance <= acc + seg.px_len || i == last {
                let exact = (distance - acc) / seg.px_per_tick;
                let ticks = match mode {
                    RoundMode::Nearest => exact.round(),
                    RoundMode::Floor => exact.floor(),
                } as i32;
                let ticks = ticks.clamp(0, seg.ticks);
                return (seg.start + ticks * self.scaled_unit).clamp(self.min, self.max);
            }
            acc += seg.px_len;
        }
        self.max
    }

    /// Converts a scaled value to its exact pixel distance.
    ///
    /// Values are clamped into `[min, max]` first. A value on a segment
    /// boundary maps to the exact cumulative length of the segments before
    /// it.
    pub fn distance_from_value(&self, value: ScaledValue) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        let value = value.clamp(self.min, self.max);

        let last = self.segments.len() - 1;
        let mut acc = 0.0f32;
        for (i, seg) in self.segments.iter().enumerate() {
            if value <= seg.end || i == last {
                let ticks = (value - seg.start) as f32 / self.scaled_unit as f32;
                return acc + ticks.clamp(0.0, seg.ticks as f32) * seg.px_per_tick;
            }
            acc += seg.px_len;
        }
        self.total_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GapRule;

    fn uniform_config() -> RulerConfig {
        // 0..10 by 0.1, 2 px per tick: 200 px total.
        let mut config = RulerConfig::new(0.0, 10.0, 0.1, 10);
        config.uniform_px_per_tick = 2.0;
        config
    }

    fn two_rule_config() -> RulerConfig {
        let mut config = RulerConfig::new(0.0, 10.0, 0.1, 10);
        config.gap_rules.push(GapRule::new(0.0, 2.0, 100.0));
        config.gap_rules.push(GapRule::new(2.0, 10.0, 20.0));
        config
    }

    #[test]
    fn uniform_distance_clamps_at_range_end() {
        // 20 px per value unit over [0, 10]: distance 200 resolves to the
        // max, as does anything past it.
        let map = ScaleMap::from_config(&uniform_config());
        assert_eq!(map.total_range_distance(), 200.0);
        assert_eq!(map.value_from_distance(200.0, RoundMode::Nearest), 100);
        assert_eq!(map.value_from_distance(1000.0, RoundMode::Nearest), 100);
    }

    #[test]
    fn negative_distance_clamps_to_min() {
        let map = ScaleMap::from_config(&uniform_config());
        assert_eq!(map.value_from_distance(-5.0, RoundMode::Nearest), 0);
    }

    #[test]
    fn conversion_is_monotonic() {
        let map = ScaleMap::from_config(&two_rule_config());
        let mut prev = map.value_from_distance(0.0, RoundMode::Nearest);
        let total = map.total_range_distance();
        let mut d = 0.0;
        while d <= total {
            let v = map.value_from_distance(d, RoundMode::Nearest);
            assert!(v >= prev, "value regressed at distance {d}");
            prev = v;
            d += 0.7;
        }
    }

    #[test]
    fn floor_round_trip_never_overshoots() {
        let map = ScaleMap::from_config(&two_rule_config());
        let total = map.total_range_distance();
        let mut d = 0.0;
        while d <= total {
            let v = map.value_from_distance(d, RoundMode::Floor);
            assert!(
                map.distance_from_value(v) <= d + 1e-3,
                "floor conversion overshot at distance {d}"
            );
            d += 1.3;
        }
    }

    #[test]
    fn segment_boundary_maps_to_cumulative_length() {
        // First rule: 2.0 value units at 100 px/unit, exactly 200 px.
        let map = ScaleMap::from_config(&two_rule_config());
        assert_eq!(map.distance_from_value(20), 200.0);
        // Inside the first rule the first density applies: 1.5 -> 150 px.
        assert_eq!(map.distance_from_value(15), 150.0);
        // Inside the second rule: 3.0 -> 200 + 1.0 * 20 px.
        assert_eq!(map.distance_from_value(30), 220.0);
        assert_eq!(map.total_range_distance(), 200.0 + 8.0 * 20.0);
    }

    #[test]
    fn rounding_stays_inside_the_segment() {
        let map = ScaleMap::from_config(&two_rule_config());
        // Just short of the first segment end still resolves within it.
        let v = map.value_from_distance(199.9, RoundMode::Nearest);
        assert_eq!(v, 20);
        // Just past the boundary resolves in the second segment.
        let v = map.value_from_distance(200.5, RoundMode::Floor);
        assert_eq!(v, 20);
    }

    #[test]
    fn degenerate_config_pins_to_min() {
        let config = RulerConfig::new(5.0, 5.0, 0.1, 10);
        let map = ScaleMap::from_config(&config);
        assert!(map.is_degenerate());
        assert_eq!(map.value_from_distance(50.0, RoundMode::Nearest), 50);
        assert_eq!(map.distance_from_value(120), 0.0);
        assert_eq!(map.total_range_distance(), 0.0);
    }
}
