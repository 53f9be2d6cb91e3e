//! Engine callbacks.
//!
//! Observers are plain `FnMut` closures behind small traits so a caller can
//! also implement them on a struct that owns its own state.

/// Receives every committed value change, deduplicated: consecutive
/// identical values are reported once.
pub trait ValueObserver {
    fn on_value_changed(&mut self, value: f32);
}

impl<F: FnMut(f32)> ValueObserver for F {
    fn on_value_changed(&mut self, value: f32) {
        self(value)
    }
}

/// Notified when all motion has come to rest on a tick. `label` is the
/// tick's formatted label, ready to display.
pub trait ScrollObserver {
    fn on_scroll_stop(&mut self, value: f32, label: &str);
}

impl<F: FnMut(f32, &str)> ScrollObserver for F {
    fn on_scroll_stop(&mut self, value: f32, label: &str) {
        self(value, label)
    }
}
