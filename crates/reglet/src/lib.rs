//! Interactive ruler control engine.
//!
//! A horizontally scrollable ruler: the caller feeds pointer samples and a
//! frame clock in, and reads back the current value, the visible ticks, and
//! pending haptic pulses. Dragging snaps magnetically onto major ticks with
//! hysteresis, a fast release flings with inertial deceleration, and every
//! stop settles exactly onto a tick.
//!
//! The engine is synchronous and clock-free: all times arrive as caller
//! milliseconds, so it embeds the same way under any UI loop or in tests.
//!
//! ```
//! use reglet::{PointerSample, RulerConfig, RulerEngine};
//!
//! let mut config = RulerConfig::new(0.0, 10.0, 0.1, 10);
//! config.uniform_px_per_tick = 10.0;
//! let mut engine = RulerEngine::new(config, 5.0, 400.0).unwrap();
//!
//! engine.pointer_down(PointerSample::new(200.0, 50.0, 0));
//! engine.pointer_move(PointerSample::new(150.0, 50.0, 16));
//! engine.pointer_up(PointerSample::new(150.0, 50.0, 32));
//! let mut now = 32;
//! while engine.is_animating() {
//!     now += 16;
//!     engine.tick(now);
//! }
//! assert!(engine.current_value() > 5.0, "drag to the left scrolls forward");
//! ```

pub mod constants;
pub mod engine;
pub mod haptics;
pub mod input;
pub mod observer;
pub mod state;
pub mod velocity;

pub use engine::RulerEngine;
pub use haptics::HapticFilter;
pub use input::PointerSample;
pub use observer::{ScrollObserver, ValueObserver};
pub use state::{AnimationPhase, GesturePhase};
pub use velocity::VelocityTracker;

pub use reglet_core::{
    format_label, ConfigError, GapRule, InvalidArgument, RulerConfig, RulerError, SpecialTick,
    Tick,
};
