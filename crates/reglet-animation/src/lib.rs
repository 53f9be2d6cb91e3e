//! Animation primitives for the reglet ruler engine.
//!
//! Provides the deceleration physics for inertial flings (the classic
//! Android scroller spline), easing curves for tween animations, and a
//! synchronous [`Scroller`] the engine steps from its external clock.

pub mod easing;
pub mod fling;
pub mod scroller;

pub use easing::Easing;
pub use fling::{FlingCalculator, FlingTrajectory};
pub use scroller::Scroller;
