//! Inertial deceleration physics.
//!
//! The friction model is the spline used by the classic Android scroller: a
//! bezier tension curve sampled into a lookup table, with total distance and
//! duration derived from the initial velocity through a logarithmic
//! deceleration term. Velocities are px/s, times are milliseconds.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const SAMPLES: usize = 100;

/// Deceleration rate constant: `abs(ln(0.78) / ln(0.9))`.
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Standard gravity times inches-per-meter times the 160 dpi baseline,
/// the physical part of the scroller's deceleration coefficient.
const PHYSICAL_BASE: f32 = 9.80665 * 39.37 * 160.0;

/// Position lookup table for the deceleration curve, built once by
/// bisecting the bezier for each sample point.
static POSITIONS: LazyLock<[f32; SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; SAMPLES + 1];
    let mut x_min = 0.0f32;
    for (i, slot) in positions.iter_mut().enumerate().take(SAMPLES) {
        let alpha = i as f32 / SAMPLES as f32;
        let mut x_max = 1.0f32;
        loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < 1e-5 {
                *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
                break;
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        }
    }
    positions[SAMPLES] = 1.0;
    positions
});

/// Samples the deceleration curve at `time` in `[0, 1]`.
///
/// Returns the fraction of total distance traveled and the instantaneous
/// velocity coefficient at that point.
fn sample_spline(time: f32) -> (f32, f32) {
    let t = time.clamp(0.0, 1.0);
    let index = (SAMPLES as f32 * t) as usize;
    if index >= SAMPLES {
        return (1.0, 0.0);
    }
    let t_lo = index as f32 / SAMPLES as f32;
    let t_hi = (index + 1) as f32 / SAMPLES as f32;
    let d_lo = POSITIONS[index];
    let d_hi = POSITIONS[index + 1];
    let velocity = (d_hi - d_lo) / (t_hi - t_lo);
    (d_lo + (t - t_lo) * velocity, velocity)
}

/// The precomputed course of one fling.
#[derive(Debug, Clone, Copy)]
pub struct FlingTrajectory {
    /// Signed initial velocity in px/s.
    pub initial_velocity: f32,
    /// Unsigned total distance in pixels.
    pub distance: f32,
    /// Total duration in milliseconds.
    pub duration_ms: i64,
}

impl FlingTrajectory {
    /// Signed displacement from the start position at `elapsed_ms`.
    pub fn position_at(&self, elapsed_ms: i64) -> f32 {
        let (distance_coef, _) = sample_spline(self.progress(elapsed_ms));
        self.distance * self.initial_velocity.signum() * distance_coef
    }

    /// Signed instantaneous velocity in px/s at `elapsed_ms`.
    pub fn velocity_at(&self, elapsed_ms: i64) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let (_, velocity_coef) = sample_spline(self.progress(elapsed_ms));
        velocity_coef * self.initial_velocity.signum() * self.distance
            / self.duration_ms as f32
            * 1000.0
    }

    pub fn is_finished(&self, elapsed_ms: i64) -> bool {
        elapsed_ms >= self.duration_ms
    }

    fn progress(&self, elapsed_ms: i64) -> f32 {
        if self.duration_ms == 0 {
            1.0
        } else {
            elapsed_ms as f32 / self.duration_ms as f32
        }
    }
}

/// Computes fling distance and duration from a release velocity.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// Default scroll friction, matching the platform default.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// `friction` is the scroll friction coefficient (higher decelerates
    /// faster); `density` the logical pixel density of the display.
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: PHYSICAL_BASE * density * 0.84,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn deceleration(&self, velocity: f32) -> f64 {
        let friction = (self.friction * self.physical_coefficient) as f64;
        (INFLECTION as f64 * velocity.abs() as f64 / friction).ln()
    }

    /// Duration of the fling in milliseconds.
    pub fn duration_ms(&self, velocity: f32) -> i64 {
        let l = self.deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()) as i64
    }

    /// Unsigned total distance the fling travels.
    pub fn distance(&self, velocity: f32) -> f32 {
        let l = self.deceleration(velocity);
        let exp = (DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l).exp() as f32;
        self.friction * self.physical_coefficient * exp
    }

    /// The full trajectory for a release velocity.
    pub fn trajectory(&self, velocity: f32) -> FlingTrajectory {
        FlingTrajectory {
            initial_velocity: velocity,
            distance: self.distance(velocity),
            duration_ms: self.duration_ms(velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_spans_zero_to_one() {
        let (start, _) = sample_spline(0.0);
        assert!(start.abs() < 0.01);
        let (end, end_velocity) = sample_spline(1.0);
        assert_eq!(end, 1.0);
        assert_eq!(end_velocity, 0.0);
    }

    #[test]
    fn spline_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let (d, _) = sample_spline(i as f32 / 100.0);
            assert!(d >= prev, "distance regressed at sample {i}");
            prev = d;
        }
    }

    #[test]
    fn faster_flings_travel_further_and_longer() {
        let calc = FlingCalculator::with_density(2.0);
        let duration = calc.duration_ms(5000.0);
        let distance = calc.distance(5000.0);
        assert!(duration > 0);
        assert!(distance > 0.0);
        assert!(calc.duration_ms(10_000.0) > duration);
        assert!(calc.distance(10_000.0) > distance);
    }

    #[test]
    fn trajectory_ends_at_signed_distance() {
        let calc = FlingCalculator::with_density(1.0);
        let traj = calc.trajectory(-4000.0);
        let end = traj.position_at(traj.duration_ms);
        assert!(end < 0.0, "negative velocity must move backwards");
        assert!((end.abs() - traj.distance).abs() < traj.distance * 0.05);
        assert!(traj.is_finished(traj.duration_ms));
        assert!(!traj.is_finished(traj.duration_ms / 2));
    }

    #[test]
    fn higher_friction_shortens_the_fling() {
        let low = FlingCalculator::new(0.015, 1.0);
        let high = FlingCalculator::new(0.06, 1.0);
        assert!(high.distance(5000.0) < low.distance(5000.0));
    }
}
