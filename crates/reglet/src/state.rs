//! Engine phase tracking.

use reglet_core::ScaledValue;

/// Where the current pointer interaction stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    /// Finger down, horizontal travel still under the touch slop.
    Pressed {
        down_x: f32,
        down_y: f32,
        down_time_ms: i64,
        last_x: f32,
    },
    /// The slop latched; every subsequent move scrolls.
    Dragging { last_x: f32 },
}

impl GesturePhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, GesturePhase::Idle)
    }
}

/// Which animation, if any, is driving the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationPhase {
    Idle,
    /// Inertial fling after a fast release.
    Decelerating,
    /// Short tween onto the nearest tick.
    Settling { target: ScaledValue },
    /// Tween toward a programmatically set value; the value itself was
    /// already committed when the animation started.
    Programmatic { target: ScaledValue },
}

impl AnimationPhase {
    pub fn is_animating(&self) -> bool {
        !matches!(self, AnimationPhase::Idle)
    }
}
