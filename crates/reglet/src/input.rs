//! Pointer input samples.

/// One pointer event sample in viewport coordinates.
///
/// `time_ms` comes from the caller's clock; the engine only compares
/// timestamps, it never reads a clock of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub time_ms: i64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, time_ms: i64) -> Self {
        Self { x, y, time_ms }
    }
}
