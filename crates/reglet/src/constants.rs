//! Gesture and animation tuning constants.

/// Horizontal travel before a press becomes a drag, in px.
pub const TOUCH_SLOP: f32 = 8.0;

/// Release velocities below this settle instead of flinging, in px/s.
pub const MIN_FLING_VELOCITY: f32 = 50.0;

/// Release velocities are capped here, in px/s.
pub const MAX_FLING_VELOCITY: f32 = 8000.0;

/// Snap capture band around a major tick, in px.
pub const SNAP_TRIGGER_DISTANCE: f32 = 6.0;

/// Cumulative drift that breaks an active snap, in px. Wider than the
/// trigger band so the boundary cannot chatter.
pub const SNAP_ESCAPE_DISTANCE: f32 = 18.0;

/// Window during which a just-escaped tick cannot recapture.
pub const SNAP_COOLDOWN_MS: i64 = 300;

/// Smallest step delta that counts as a drag direction, in px.
pub const MIN_DIRECTION_DELTA: f32 = 0.5;

/// A press released within this window and without latching a drag is a tap.
pub const MAX_TAP_MS: i64 = 500;

/// Settle animation duration bounds and slope.
pub const MIN_SETTLE_MS: i64 = 100;
pub const MAX_SETTLE_MS: i64 = 300;
pub const SETTLE_MS_PER_PX: f32 = 1.2;

/// Programmatic value changes animate at 2000 ms per full range, capped.
pub const MAX_PROGRAMMATIC_MS: i64 = 2000;

/// Drag speeds below this are deliberate enough to pulse haptics, in px/s.
pub const SLOW_DRAG_SPEED: f32 = 400.0;

/// Tap resolution widens the snap band by this factor.
pub const CLICK_MAGNETISM_FACTOR: f32 = 2.0;

/// Default fling friction and display density.
pub const DEFAULT_FLING_FRICTION: f32 = 0.015;
pub const DEFAULT_DENSITY: f32 = 1.0;
