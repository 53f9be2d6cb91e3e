//! Error types for configuration and value operations.
//!
//! All operations are synchronous and local; they either succeed or fail
//! immediately with one of these. A failed configuration call leaves the
//! previous valid configuration untouched.

use std::fmt;

/// A value (or threshold parameter) outside the configured `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidArgument {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} is out of range [{}, {}]",
            self.value, self.min, self.max
        )
    }
}

impl std::error::Error for InvalidArgument {}

/// A structurally invalid gap-rule list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// No rules were supplied where at least one is required.
    Empty,
    /// A rule's start is not below its end.
    ReversedRule { start: f32, end: f32 },
    /// A rule's pixel density is zero or negative.
    NonPositiveDensity { px_per_unit: f32 },
    /// A rule does not begin where the previous one ended.
    NotContiguous { expected_start: f32, found_start: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Empty => write!(f, "gap-rule list is empty"),
            ConfigError::ReversedRule { start, end } => {
                write!(f, "gap rule is reversed: start {start} is not below end {end}")
            }
            ConfigError::NonPositiveDensity { px_per_unit } => {
                write!(f, "gap rule has non-positive density {px_per_unit} px/unit")
            }
            ConfigError::NotContiguous {
                expected_start,
                found_start,
            } => write!(
                f,
                "gap rules are not contiguous: expected start {expected_start}, found {found_start}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Umbrella error for operations that can fail either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RulerError {
    InvalidArgument(InvalidArgument),
    Config(ConfigError),
}

impl fmt::Display for RulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulerError::InvalidArgument(e) => e.fmt(f),
            RulerError::Config(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for RulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RulerError::InvalidArgument(e) => Some(e),
            RulerError::Config(e) => Some(e),
        }
    }
}

impl From<InvalidArgument> for RulerError {
    fn from(e: InvalidArgument) -> Self {
        RulerError::InvalidArgument(e)
    }
}

impl From<ConfigError> for RulerError {
    fn from(e: ConfigError) -> Self {
        RulerError::Config(e)
    }
}
