//! Integer-scaled value representation.
//!
//! Ruler values are carried internally as `i32` tenths: `2.5` becomes `25`.
//! Repeated float increments across a long drag accumulate binary error;
//! keeping the canonical value integral makes tick arithmetic exact and
//! comparisons trivial. Conversion back to `f32` happens only at the API
//! boundary (callbacks, queries, labels).

/// A ruler value multiplied by [`SCALE`] and rounded to an integer.
pub type ScaledValue = i32;

/// Magnification applied to user-facing values (one decimal of precision).
pub const SCALE: f32 = 10.0;

/// Converts a user-facing value to its scaled integer form.
///
/// Rounds rather than truncates: `2.9_f32 * 10.0` is `28.999…`, and a
/// truncating cast would land on the wrong tick.
pub fn scale(value: f32) -> ScaledValue {
    (value * SCALE).round() as ScaledValue
}

/// Converts a scaled integer back to the user-facing value.
pub fn unscale(number: ScaledValue) -> f32 {
    number as f32 / SCALE
}

/// Formats a scaled value as a tick label.
///
/// One decimal place, with a trailing `.0` stripped, then the unit suffix:
/// `50` becomes `"5x"`, `55` becomes `"5.5x"` (for suffix `"x"`).
pub fn format_label(number: ScaledValue, suffix: &str) -> String {
    let whole = number / 10;
    let tenth = (number % 10).abs();
    if tenth == 0 {
        format!("{whole}{suffix}")
    } else if number < 0 && whole == 0 {
        // -0.5 scales to -5; the integer part loses the sign.
        format!("-0.{tenth}{suffix}")
    } else {
        format!("{whole}.{tenth}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_instead_of_truncating() {
        assert_eq!(scale(2.9), 29);
        assert_eq!(scale(0.1), 1);
        assert_eq!(scale(-1.3), -13);
    }

    #[test]
    fn unscale_round_trips_tick_values() {
        for n in -100..=100 {
            assert_eq!(scale(unscale(n)), n);
        }
    }

    #[test]
    fn labels_strip_trailing_zero_decimal() {
        assert_eq!(format_label(50, "x"), "5x");
        assert_eq!(format_label(55, "x"), "5.5x");
        assert_eq!(format_label(0, "x"), "0x");
        assert_eq!(format_label(100, ""), "10");
    }

    #[test]
    fn labels_keep_sign_for_small_negatives() {
        assert_eq!(format_label(-5, "x"), "-0.5x");
        assert_eq!(format_label(-13, "x"), "-1.3x");
    }
}
