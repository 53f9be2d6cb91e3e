//! Synchronous scroll animator.
//!
//! [`Scroller`] holds the state of one running animation, either an eased
//! tween toward a known target or an inertial fling. It never owns a clock;
//! the caller steps it with [`Scroller::compute`] once per frame and reads
//! back the current position. All times are absolute milliseconds from the
//! caller's clock.

use crate::easing::Easing;
use crate::fling::{FlingCalculator, FlingTrajectory};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Tween {
        delta: f32,
        duration_ms: i64,
        easing: Easing,
    },
    Fling {
        trajectory: FlingTrajectory,
        /// Elapsed time at which the clamped final position is reached,
        /// shorter than the trajectory when a bound cuts the fling off.
        duration_ms: i64,
    },
}

/// Animates a scalar scroll position over time.
#[derive(Debug, Clone, Copy)]
pub struct Scroller {
    start: f32,
    current: f32,
    final_position: f32,
    start_time_ms: i64,
    mode: Mode,
    finished: bool,
    hit_bound: bool,
}

impl Scroller {
    /// An already-finished scroller resting at `position`.
    pub fn idle(position: f32) -> Self {
        Self {
            start: position,
            current: position,
            final_position: position,
            start_time_ms: 0,
            mode: Mode::Tween {
                delta: 0.0,
                duration_ms: 0,
                easing: Easing::Linear,
            },
            finished: true,
            hit_bound: false,
        }
    }

    /// Starts an eased tween from `start` over `delta` pixels.
    ///
    /// A zero or negative duration completes on the first `compute`.
    pub fn start_scroll(
        start: f32,
        delta: f32,
        duration_ms: i64,
        easing: Easing,
        now_ms: i64,
    ) -> Self {
        Self {
            start,
            current: start,
            final_position: start + delta,
            start_time_ms: now_ms,
            mode: Mode::Tween {
                delta,
                duration_ms: duration_ms.max(0),
                easing,
            },
            finished: duration_ms <= 0,
            hit_bound: false,
        }
    }

    /// Starts a fling from `start` at `velocity` px/s, clamped to
    /// `[min, max]`.
    ///
    /// When the natural fling distance would overshoot a bound the final
    /// position is pinned to that bound and the animation ends early there.
    pub fn fling(
        start: f32,
        velocity: f32,
        min: f32,
        max: f32,
        calculator: &FlingCalculator,
        now_ms: i64,
    ) -> Self {
        if velocity == 0.0 {
            return Self::idle(start.clamp(min, max));
        }
        let trajectory = calculator.trajectory(velocity);
        let natural_end = start + trajectory.distance * velocity.signum();
        let clamped_end = natural_end.clamp(min, max);
        let hit_bound = clamped_end != natural_end;
        let duration_ms = if hit_bound {
            bound_crossing_ms(&trajectory, clamped_end - start)
        } else {
            trajectory.duration_ms
        };
        Self {
            start,
            current: start,
            final_position: clamped_end,
            start_time_ms: now_ms,
            mode: Mode::Fling {
                trajectory,
                duration_ms,
            },
            finished: duration_ms <= 0,
            hit_bound,
        }
    }

    /// Advances the animation to `now_ms`. Returns `true` while still
    /// running; once it returns `false` the position rests at the final
    /// value and stays there.
    pub fn compute(&mut self, now_ms: i64) -> bool {
        if self.finished {
            return false;
        }
        let elapsed = (now_ms - self.start_time_ms).max(0);
        match self.mode {
            Mode::Tween {
                delta,
                duration_ms,
                easing,
            } => {
                if elapsed >= duration_ms {
                    self.current = self.final_position;
                    self.finished = true;
                } else {
                    let fraction = elapsed as f32 / duration_ms as f32;
                    self.current = self.start + delta * easing.transform(fraction);
                }
            }
            Mode::Fling {
                trajectory,
                duration_ms,
            } => {
                if elapsed >= duration_ms {
                    self.current = self.final_position;
                    self.finished = true;
                } else {
                    self.current = self.start + trajectory.position_at(elapsed);
                }
            }
        }
        !self.finished
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn final_position(&self) -> f32 {
        self.final_position
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a fling was cut short by a range bound.
    pub fn hit_bound(&self) -> bool {
        self.hit_bound
    }

    /// Instantaneous velocity in px/s at `now_ms`. Zero once finished and
    /// for tweens, which have no meaningful release velocity.
    pub fn current_velocity(&self, now_ms: i64) -> f32 {
        if self.finished {
            return 0.0;
        }
        match self.mode {
            Mode::Tween { .. } => 0.0,
            Mode::Fling { trajectory, .. } => {
                trajectory.velocity_at((now_ms - self.start_time_ms).max(0))
            }
        }
    }

    /// Stops the animation where it currently is.
    pub fn force_finish(&mut self) {
        self.finished = true;
        self.final_position = self.current;
    }
}

/// Elapsed time at which the trajectory's signed displacement first reaches
/// `target_delta`, found by bisection over the monotonic position curve.
fn bound_crossing_ms(trajectory: &FlingTrajectory, target_delta: f32) -> i64 {
    if target_delta == 0.0 {
        return 0;
    }
    let target = target_delta.abs();
    let (mut lo, mut hi) = (0i64, trajectory.duration_ms);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if trajectory.position_at(mid).abs() < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_reaches_target_and_stops() {
        let mut scroller = Scroller::start_scroll(100.0, 50.0, 200, Easing::Linear, 1000);
        assert!(scroller.compute(1100));
        assert!((scroller.current() - 125.0).abs() < 0.01);
        assert!(!scroller.compute(1200));
        assert_eq!(scroller.current(), 150.0);
        assert!(scroller.is_finished());
        // Stays at rest on further computes.
        assert!(!scroller.compute(1300));
        assert_eq!(scroller.current(), 150.0);
    }

    #[test]
    fn zero_duration_tween_is_immediately_done() {
        let mut scroller = Scroller::start_scroll(0.0, 30.0, 0, Easing::Linear, 0);
        assert!(!scroller.compute(0));
        assert_eq!(scroller.final_position(), 30.0);
    }

    #[test]
    fn fling_moves_toward_final_position() {
        let calc = FlingCalculator::with_density(1.0);
        let mut scroller = Scroller::fling(0.0, 3000.0, 0.0, 1.0e9, &calc, 0);
        let end = scroller.final_position();
        assert!(end > 0.0);
        assert!(!scroller.hit_bound());
        assert!(scroller.compute(16));
        let early = scroller.current();
        assert!(early > 0.0 && early < end);
        // Run past the duration.
        while scroller.compute(scroller.start_time_ms + 100_000) {}
        assert_eq!(scroller.current(), end);
    }

    #[test]
    fn fling_clamps_to_bounds_and_ends_early() {
        let calc = FlingCalculator::with_density(1.0);
        let mut free = Scroller::fling(0.0, 5000.0, 0.0, 1.0e9, &calc, 0);
        let mut clamped = Scroller::fling(0.0, 5000.0, 0.0, 100.0, &calc, 0);
        assert_eq!(clamped.final_position(), 100.0);
        assert!(clamped.hit_bound());
        let mut t_clamped = 0;
        while clamped.compute(t_clamped) {
            t_clamped += 16;
        }
        assert_eq!(clamped.current(), 100.0);
        let mut t_free = 0;
        while free.compute(t_free) {
            t_free += 16;
        }
        assert!(t_clamped < t_free, "bounded fling must stop early");
    }

    #[test]
    fn negative_fling_respects_lower_bound() {
        let calc = FlingCalculator::with_density(1.0);
        let scroller = Scroller::fling(50.0, -8000.0, 0.0, 1000.0, &calc, 0);
        assert_eq!(scroller.final_position(), 0.0);
        assert!(scroller.hit_bound());
    }

    #[test]
    fn force_finish_freezes_position() {
        let mut scroller = Scroller::start_scroll(0.0, 100.0, 400, Easing::Linear, 0);
        scroller.compute(100);
        let mid = scroller.current();
        scroller.force_finish();
        assert!(scroller.is_finished());
        assert_eq!(scroller.final_position(), mid);
        assert!(!scroller.compute(400));
        assert_eq!(scroller.current(), mid);
    }

    #[test]
    fn fling_velocity_decays() {
        let calc = FlingCalculator::with_density(1.0);
        let scroller = Scroller::fling(0.0, 4000.0, 0.0, 1.0e9, &calc, 0);
        let v_early = scroller.current_velocity(10);
        let v_late = scroller.current_velocity(scroller.start_time_ms + 500);
        assert!(v_early > v_late);
        assert!(v_late >= 0.0);
    }
}
