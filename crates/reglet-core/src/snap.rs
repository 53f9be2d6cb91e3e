//! Magnetic snapping: candidate cache and hysteresis state machine.
//!
//! While dragging, the displayed position locks exactly onto a nearby major
//! tick and stays there until the stroke either reverses direction or drifts
//! past a wider escape band. The asymmetric trigger/escape thresholds and a
//! short re-snap cooldown keep the position from chattering at a tick
//! boundary.

use std::collections::BTreeSet;

use crate::config::RulerConfig;
use crate::convert::{RoundMode, ScaleMap};
use crate::number::ScaledValue;

/// The set of tick values eligible for snapping.
///
/// Rebuilt whenever the configuration changes: every multiple of the major
/// interval inside `[min, max]`, plus every special tick. An empty cache
/// (degenerate configuration) permanently disables snapping.
#[derive(Debug, Clone, Default)]
pub struct SnapCache {
    points: BTreeSet<ScaledValue>,
}

impl SnapCache {
    pub fn rebuild(config: &RulerConfig) -> Self {
        let mut points = BTreeSet::new();
        if !config.is_degenerate() {
            let min = config.scaled_min();
            let max = config.scaled_max();
            let interval = config.major_interval();
            if interval > 0 {
                // First multiple of the interval at or above min.
                let mut v = min.div_euclid(interval) * interval;
                if v < min {
                    v += interval;
                }
                while v <= max {
                    points.insert(v);
                    v += interval;
                }
            }
            for tick in &config.special_ticks {
                let v = crate::number::scale(tick.value);
                if (min..=max).contains(&v) {
                    points.insert(v);
                }
            }
        }
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, value: ScaledValue) -> bool {
        self.points.contains(&value)
    }

    /// Nearest cached tick to `value` within `window` scaled units,
    /// skipping `exclude`. Ties resolve to the lower tick.
    pub fn nearest_within(
        &self,
        value: ScaledValue,
        window: ScaledValue,
        exclude: Option<ScaledValue>,
    ) -> Option<ScaledValue> {
        self.points
            .range(value - window..=value + window)
            .filter(|&&p| Some(p) != exclude)
            .min_by_key(|&&p| ((p - value).abs(), p))
            .copied()
    }
}

/// Direction of a drag step, derived from its delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Neutral,
    Left,
    Right,
}

impl Direction {
    /// Classifies a step delta, treating anything below `min_delta` as
    /// noise.
    pub fn from_delta(delta: f32, min_delta: f32) -> Self {
        if delta.abs() < min_delta {
            Direction::Neutral
        } else if delta > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Snap machine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapState {
    NotSnapped,
    Snapped {
        /// The tick the display is locked onto.
        tick: ScaledValue,
        /// Drag direction at the moment the snap triggered.
        enter_direction: Direction,
        /// Cumulative displacement since the snap triggered.
        drift: f32,
    },
}

/// Tunable thresholds for the snap machine.
#[derive(Debug, Clone, Copy)]
pub struct SnapParams {
    /// Pixel distance below which a candidate tick captures the position.
    pub trigger_distance: f32,
    /// Cumulative drift beyond which a snapped position releases. Wider
    /// than the trigger distance so the boundary cannot oscillate.
    pub escape_distance: f32,
    /// Window during which a just-released tick cannot re-trigger.
    pub cooldown_ms: i64,
    /// Minimum step delta that counts as a direction.
    pub min_direction_delta: f32,
}

#[derive(Debug, Clone, Copy)]
struct SnapRelease {
    tick: ScaledValue,
    time_ms: i64,
}

/// Direction-aware hysteresis state machine for tick snapping.
#[derive(Debug, Clone)]
pub struct SnapMachine {
    params: SnapParams,
    state: SnapState,
    last_release: Option<SnapRelease>,
}

impl SnapMachine {
    pub fn new(params: SnapParams) -> Self {
        Self {
            params,
            state: SnapState::NotSnapped,
            last_release: None,
        }
    }

    pub fn state(&self) -> SnapState {
        self.state
    }

    /// Resets the machine at the start of a gesture. The release cooldown
    /// memory survives; it spans gestures by design.
    pub fn begin_gesture(&mut self) {
        self.state = SnapState::NotSnapped;
    }

    /// Evaluates one accepted drag step and returns the distance to commit.
    ///
    /// `proposed` is the free position the step would reach without
    /// snapping; `delta` is the step's signed displacement. When snapped the
    /// returned distance stays pinned to the tick's exact pixel coordinate
    /// until an escape condition fires.
    pub fn step(
        &mut self,
        proposed: f32,
        delta: f32,
        now_ms: i64,
        map: &ScaleMap,
        cache: &SnapCache,
        major_interval: ScaledValue,
    ) -> f32 {
        if cache.is_empty() || map.is_degenerate() {
            return proposed;
        }

        let direction = Direction::from_delta(delta, self.params.min_direction_delta);
        match self.state {
            SnapState::Snapped {
                tick,
                enter_direction,
                drift,
            } => {
                let drift = drift + delta;
                // A reversed stroke signals deliberate intent to leave,
                // before any distance threshold is crossed.
                if direction != Direction::Neutral && direction != enter_direction {
                    self.release(tick, now_ms);
                    return proposed;
                }
                if drift.abs() > self.params.escape_distance {
                    self.release(tick, now_ms);
                    return proposed;
                }
                self.state = SnapState::Snapped {
                    tick,
                    enter_direction,
                    drift,
                };
                map.distance_from_value(tick)
            }
            SnapState::NotSnapped => {
                if direction == Direction::Neutral {
                    return proposed;
                }
                let value = map.value_from_distance(proposed, RoundMode::Nearest);
                let exclude = self.last_release.and_then(|release| {
                    (now_ms - release.time_ms < self.params.cooldown_ms).then_some(release.tick)
                });
                let candidate = match cache.nearest_within(value, major_interval, exclude) {
                    Some(candidate) => candidate,
                    None => return proposed,
                };
                let tick_px = map.distance_from_value(candidate);
                if (tick_px - proposed).abs() < self.params.trigger_distance {
                    self.state = SnapState::Snapped {
                        tick: candidate,
                        enter_direction: direction,
                        drift: 0.0,
                    };
                    tick_px
                } else {
                    proposed
                }
            }
        }
    }

    fn release(&mut self, tick: ScaledValue, now_ms: i64) {
        self.state = SnapState::NotSnapped;
        self.last_release = Some(SnapRelease { tick, time_ms: now_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulerConfig;

    fn params() -> SnapParams {
        SnapParams {
            trigger_distance: 6.0,
            escape_distance: 18.0,
            cooldown_ms: 300,
            min_direction_delta: 0.5,
        }
    }

    fn fixture() -> (ScaleMap, SnapCache, RulerConfig) {
        // 0..10 by 0.1, majors every 1.0, 10 px per tick: majors 100 px apart.
        let mut config = RulerConfig::new(0.0, 10.0, 0.1, 10);
        config.uniform_px_per_tick = 10.0;
        let map = ScaleMap::from_config(&config);
        let cache = SnapCache::rebuild(&config);
        (map, cache, config)
    }

    #[test]
    fn cache_holds_majors_and_specials() {
        let (_, cache, mut config) = fixture();
        assert!(cache.contains(0));
        assert!(cache.contains(50));
        assert!(cache.contains(100));
        assert!(!cache.contains(55));

        config.special_ticks.push(crate::config::SpecialTick {
            value: 5.5,
            show_label: true,
        });
        let cache = SnapCache::rebuild(&config);
        assert!(cache.contains(55));
    }

    #[test]
    fn special_ticks_outside_range_are_ignored() {
        let (_, _, mut config) = fixture();
        config.special_ticks.push(crate::config::SpecialTick {
            value: 42.0,
            show_label: false,
        });
        let cache = SnapCache::rebuild(&config);
        assert!(!cache.contains(420));
    }

    #[test]
    fn degenerate_config_produces_empty_cache() {
        let config = RulerConfig::new(3.0, 3.0, 0.1, 10);
        assert!(SnapCache::rebuild(&config).is_empty());
    }

    #[test]
    fn nearest_candidate_respects_window_and_exclusion() {
        let (_, cache, _) = fixture();
        assert_eq!(cache.nearest_within(47, 10, None), Some(50));
        assert_eq!(cache.nearest_within(47, 10, Some(50)), Some(40));
        assert_eq!(cache.nearest_within(55, 4, None), None);
    }

    #[test]
    fn snap_triggers_within_trigger_distance() {
        let (map, cache, config) = fixture();
        let mut machine = SnapMachine::new(params());
        // Major tick 5.0 sits at 500 px; approach to 496 px from the left.
        let committed = machine.step(496.0, 2.0, 0, &map, &cache, config.major_interval());
        assert_eq!(committed, 500.0);
        assert!(matches!(
            machine.state(),
            SnapState::Snapped {
                tick: 50,
                enter_direction: Direction::Right,
                ..
            }
        ));
    }

    #[test]
    fn direction_reversal_escapes_immediately() {
        let (map, cache, config) = fixture();
        let interval = config.major_interval();
        let mut machine = SnapMachine::new(params());
        machine.step(496.0, 2.0, 0, &map, &cache, interval);
        // A single 1 px step the other way releases at once.
        let committed = machine.step(499.0, -1.0, 10, &map, &cache, interval);
        assert_eq!(committed, 499.0);
        assert_eq!(machine.state(), SnapState::NotSnapped);
    }

    #[test]
    fn same_direction_holds_until_escape_distance() {
        let (map, cache, config) = fixture();
        let interval = config.major_interval();
        let mut machine = SnapMachine::new(params());
        machine.step(496.0, 2.0, 0, &map, &cache, interval);
        // Drift in the entry direction below the escape band stays pinned.
        let committed = machine.step(510.0, 10.0, 10, &map, &cache, interval);
        assert_eq!(committed, 500.0);
        // Crossing the band releases.
        let committed = machine.step(520.0, 10.0, 20, &map, &cache, interval);
        assert_eq!(committed, 520.0);
        assert_eq!(machine.state(), SnapState::NotSnapped);
    }

    #[test]
    fn released_tick_is_suppressed_during_cooldown() {
        let (map, cache, config) = fixture();
        let interval = config.major_interval();
        let mut machine = SnapMachine::new(params());
        machine.step(496.0, 2.0, 0, &map, &cache, interval);
        machine.step(499.0, -1.0, 10, &map, &cache, interval);
        // Geometrically eligible again, but inside the cooldown window.
        let committed = machine.step(497.0, -2.0, 100, &map, &cache, interval);
        assert_eq!(committed, 497.0);
        // After the window expires the tick can capture again.
        let committed = machine.step(497.0, -2.0, 500, &map, &cache, interval);
        assert_eq!(committed, 500.0);
    }

    #[test]
    fn neutral_steps_never_trigger() {
        let (map, cache, config) = fixture();
        let mut machine = SnapMachine::new(params());
        let committed = machine.step(499.0, 0.1, 0, &map, &cache, config.major_interval());
        assert_eq!(committed, 499.0);
        assert_eq!(machine.state(), SnapState::NotSnapped);
    }
}
