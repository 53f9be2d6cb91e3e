//! Tick enumeration for renderers.
//!
//! The engine does not draw anything; it hands the renderer the ticks that
//! fall inside the viewport, each with its pixel offset from the center
//! indicator, whether it is a major tick, and a preformatted label where one
//! applies.

use crate::config::RulerConfig;
use crate::convert::{RoundMode, ScaleMap};
use crate::number::{format_label, ScaledValue};

/// One renderable tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Scaled tick value.
    pub value: ScaledValue,
    /// Horizontal pixel offset from the center indicator.
    pub offset_px: f32,
    /// Major ticks are drawn long; minors short.
    pub major: bool,
    /// Label for majors and labeled special ticks.
    pub label: Option<String>,
}

/// Enumerates the ticks visible in a viewport of `viewport_width` pixels
/// centered on `current_distance`, in ascending value order.
///
/// One extra tick is included past each edge so a renderer never pops a
/// tick in or out at the boundary mid-scroll.
pub fn visible_ticks(
    map: &ScaleMap,
    config: &RulerConfig,
    current_distance: f32,
    viewport_width: f32,
) -> Vec<Tick> {
    if map.is_degenerate() {
        return Vec::new();
    }

    let unit = map.scaled_unit();
    let half = viewport_width / 2.0;
    let first = map.value_from_distance(current_distance - half, RoundMode::Floor) - unit;
    let last = map.value_from_distance(current_distance + half, RoundMode::Nearest) + unit;
    let first = first.max(map.scaled_min());
    let last = last.min(map.scaled_max());
    let interval = config.major_interval();

    let mut ticks = Vec::new();
    let mut value = first;
    while value <= last {
        let special = config
            .special_ticks
            .iter()
            .find(|t| crate::number::scale(t.value) == value);
        let major = (interval > 0 && value.rem_euclid(interval) == 0) || special.is_some();
        let labeled = match special {
            Some(special) => special.show_label,
            None => major,
        };
        ticks.push(Tick {
            value,
            offset_px: map.distance_from_value(value) - current_distance,
            major,
            label: labeled.then(|| format_label(value, &config.label_suffix)),
        });
        value += unit;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecialTick;

    fn config() -> RulerConfig {
        let mut config = RulerConfig::new(0.0, 10.0, 0.1, 10);
        config.uniform_px_per_tick = 10.0;
        config.label_suffix = "x".to_owned();
        config
    }

    #[test]
    fn window_is_centered_and_clamped() {
        let config = config();
        let map = ScaleMap::from_config(&config);
        // Centered on 5.0 (500 px) with a 100 px viewport: 4.4..=5.6 plus
        // one tick of overscan each side.
        let ticks = visible_ticks(&map, &config, 500.0, 100.0);
        assert_eq!(ticks.first().map(|t| t.value), Some(44));
        assert_eq!(ticks.last().map(|t| t.value), Some(56));

        // At the range start nothing below min appears.
        let ticks = visible_ticks(&map, &config, 0.0, 100.0);
        assert_eq!(ticks.first().map(|t| t.value), Some(0));
    }

    #[test]
    fn majors_carry_labels() {
        let config = config();
        let map = ScaleMap::from_config(&config);
        let ticks = visible_ticks(&map, &config, 500.0, 100.0);
        let five = ticks.iter().find(|t| t.value == 50).expect("5.0 visible");
        assert!(five.major);
        assert_eq!(five.label.as_deref(), Some("5x"));
        assert_eq!(five.offset_px, 0.0);
        let minor = ticks.iter().find(|t| t.value == 51).expect("5.1 visible");
        assert!(!minor.major);
        assert_eq!(minor.label, None);
    }

    #[test]
    fn special_ticks_promote_to_major() {
        let mut config = config();
        config.special_ticks.push(SpecialTick {
            value: 5.5,
            show_label: false,
        });
        let map = ScaleMap::from_config(&config);
        let ticks = visible_ticks(&map, &config, 500.0, 100.0);
        let special = ticks.iter().find(|t| t.value == 55).expect("5.5 visible");
        assert!(special.major);
        assert_eq!(special.label, None);
    }
}
