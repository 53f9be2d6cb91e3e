//! Numeric core for the reglet ruler engine.
//!
//! Everything in this crate is pure state and math: integer-scaled values,
//! the piecewise distance↔value converter, the snap cache with its
//! hysteresis state machine, and tick enumeration for renderers. No clocks,
//! no pointers, no callbacks; the `reglet` crate wires these pieces to
//! gesture input and animation.

pub mod config;
pub mod convert;
pub mod error;
pub mod number;
pub mod snap;
pub mod ticks;

pub use config::{GapRule, RulerConfig, SpecialTick};
pub use convert::{RoundMode, ScaleMap};
pub use error::{ConfigError, InvalidArgument, RulerError};
pub use number::{format_label, scale, unscale, ScaledValue};
pub use snap::{Direction, SnapCache, SnapMachine, SnapParams, SnapState};
pub use ticks::{visible_ticks, Tick};
