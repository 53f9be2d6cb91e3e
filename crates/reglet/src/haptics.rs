//! Haptic pulse gating.
//!
//! The engine never vibrates anything itself; it raises a pending-pulse flag
//! the embedding layer polls once per frame. A pulse is requested only when
//! the position crosses a snap-eligible tick during a slow, deliberate drag,
//! and never twice for ticks closer than a major interval.

use reglet_core::{ScaledValue, SnapCache};

/// Decides when a tick crossing deserves a haptic pulse.
#[derive(Debug, Clone, Default)]
pub struct HapticFilter {
    last_pulse: Option<ScaledValue>,
    pending: bool,
}

impl HapticFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the crossing memory at the start of a gesture. A pending
    /// unpolled pulse survives.
    pub fn begin_gesture(&mut self) {
        self.last_pulse = None;
    }

    /// Considers the tick under the indicator after a drag step.
    ///
    /// `speed` is the current pointer speed in px/s; fast strokes are
    /// filtered out so a fling-length drag does not buzz continuously.
    pub fn observe(
        &mut self,
        tick: ScaledValue,
        speed: f32,
        slow_speed: f32,
        cache: &SnapCache,
        major_interval: ScaledValue,
    ) {
        if speed.abs() >= slow_speed || !cache.contains(tick) {
            return;
        }
        if let Some(last) = self.last_pulse {
            if tick == last || (tick - last).abs() < major_interval {
                return;
            }
        }
        self.last_pulse = Some(tick);
        self.pending = true;
    }

    /// Returns and clears the pending pulse flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
