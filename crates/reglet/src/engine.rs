//! The ruler engine: gestures, snapping, animation, and callbacks.
//!
//! [`RulerEngine`] owns one ruler's complete interactive state. The
//! canonical position is `current_distance`, the pixel offset of the
//! min-value tick from the viewport origin; the committed value is always
//! the tick nearest that distance. Pointer samples and frame ticks drive
//! everything; the engine never reads a clock or spawns anything.

use reglet_core::convert::RoundMode;
use reglet_core::{
    scale, unscale, GapRule, InvalidArgument, RulerConfig, RulerError, ScaleMap, ScaledValue,
    SnapCache, SnapMachine, SnapParams, SpecialTick, Tick,
};

use reglet_animation::{Easing, FlingCalculator, Scroller};

use crate::constants::{
    CLICK_MAGNETISM_FACTOR, DEFAULT_DENSITY, DEFAULT_FLING_FRICTION, MAX_FLING_VELOCITY,
    MAX_PROGRAMMATIC_MS, MAX_SETTLE_MS, MAX_TAP_MS, MIN_DIRECTION_DELTA, MIN_FLING_VELOCITY,
    MIN_SETTLE_MS, SETTLE_MS_PER_PX, SLOW_DRAG_SPEED, SNAP_COOLDOWN_MS, SNAP_ESCAPE_DISTANCE,
    SNAP_TRIGGER_DISTANCE, TOUCH_SLOP,
};
use crate::haptics::HapticFilter;
use crate::input::PointerSample;
use crate::observer::{ScrollObserver, ValueObserver};
use crate::state::{AnimationPhase, GesturePhase};
use crate::velocity::VelocityTracker;

/// Interactive ruler control engine.
pub struct RulerEngine {
    config: RulerConfig,
    map: ScaleMap,
    cache: SnapCache,
    snap: SnapMachine,
    haptics: HapticFilter,
    tracker: VelocityTracker,
    fling: FlingCalculator,
    scroller: Scroller,
    gesture: GesturePhase,
    animation: AnimationPhase,
    /// Pixel offset of the min tick from the viewport origin, clamped to
    /// `[0, total_range_distance]`.
    current_distance: f32,
    /// The last value reported through the observer, scaled.
    committed_tick: ScaledValue,
    viewport_width: f32,
    /// When set, the uniform tick density is re-derived from the viewport
    /// width so the whole range exactly fills it.
    auto_gap: bool,
    on_value_changed: Option<Box<dyn ValueObserver>>,
    on_scroll_stop: Option<Box<dyn ScrollObserver>>,
    released: bool,
}

impl RulerEngine {
    /// Builds an engine from a configuration.
    ///
    /// When gap rules are present they are validated and the range is
    /// derived from their endpoints, overriding `min_value`/`max_value`.
    /// `initial_value` and every special tick must lie inside the resulting
    /// range. A collapsed
    /// range (`min == max`) or non-positive unit is accepted and produces a
    /// pinned, non-interactive ruler rather than an error.
    pub fn new(
        mut config: RulerConfig,
        initial_value: f32,
        viewport_width: f32,
    ) -> Result<Self, RulerError> {
        if !config.gap_rules.is_empty() {
            RulerConfig::validate_gap_rules(&config.gap_rules)?;
            if let (Some(first), Some(last)) = (config.gap_rules.first(), config.gap_rules.last())
            {
                config.min_value = first.start_value;
                config.max_value = last.end_value;
            }
        }
        if config.min_value > config.max_value {
            return Err(InvalidArgument {
                value: config.max_value,
                min: config.min_value,
                max: f32::INFINITY,
            }
            .into());
        }
        if initial_value < config.min_value || initial_value > config.max_value {
            return Err(InvalidArgument {
                value: initial_value,
                min: config.min_value,
                max: config.max_value,
            }
            .into());
        }
        for tick in &config.special_ticks {
            if tick.value < config.min_value || tick.value > config.max_value {
                return Err(InvalidArgument {
                    value: tick.value,
                    min: config.min_value,
                    max: config.max_value,
                }
                .into());
            }
        }

        let map = ScaleMap::from_config(&config);
        let cache = SnapCache::rebuild(&config);
        let committed_tick = scale(initial_value);
        let current_distance = map.distance_from_value(committed_tick);
        Ok(Self {
            config,
            map,
            cache,
            snap: SnapMachine::new(snap_params()),
            haptics: HapticFilter::new(),
            tracker: VelocityTracker::new(),
            fling: FlingCalculator::new(DEFAULT_FLING_FRICTION, DEFAULT_DENSITY),
            scroller: Scroller::idle(current_distance),
            gesture: GesturePhase::Idle,
            animation: AnimationPhase::Idle,
            current_distance,
            committed_tick,
            viewport_width: viewport_width.max(0.0),
            auto_gap: false,
            on_value_changed: None,
            on_scroll_stop: None,
            released: false,
        })
    }

    pub fn set_value_observer(&mut self, observer: impl ValueObserver + 'static) {
        self.on_value_changed = Some(Box::new(observer));
    }

    pub fn set_scroll_observer(&mut self, observer: impl ScrollObserver + 'static) {
        self.on_scroll_stop = Some(Box::new(observer));
    }

    /// Overrides the fling deceleration for the display's density.
    pub fn set_fling_calculator(&mut self, fling: FlingCalculator) {
        self.fling = fling;
    }

    // ----- pointer input -----

    /// A finger touched down. Any running animation freezes where it is;
    /// the press decides what happens next.
    pub fn pointer_down(&mut self, sample: PointerSample) {
        if self.released {
            return;
        }
        if !self.scroller.is_finished() {
            self.scroller.force_finish();
        }
        self.animation = AnimationPhase::Idle;
        self.tracker.reset();
        self.tracker.add_sample(sample.time_ms, sample.x);
        self.snap.begin_gesture();
        self.haptics.begin_gesture();
        self.gesture = GesturePhase::Pressed {
            down_x: sample.x,
            down_y: sample.y,
            down_time_ms: sample.time_ms,
            last_x: sample.x,
        };
    }

    /// A pointer move. Presses stay presses until the horizontal travel
    /// exceeds the touch slop and dominates the vertical travel; the
    /// latching move itself scrolls nothing, so the content never jumps by
    /// the slop width.
    pub fn pointer_move(&mut self, sample: PointerSample) {
        if self.released {
            return;
        }
        self.tracker.add_sample(sample.time_ms, sample.x);
        match self.gesture {
            GesturePhase::Idle => {}
            GesturePhase::Pressed {
                down_x,
                down_y,
                down_time_ms,
                ..
            } => {
                let dx = sample.x - down_x;
                let dy = sample.y - down_y;
                if dx.abs() < TOUCH_SLOP || dx.abs() < dy.abs() {
                    self.gesture = GesturePhase::Pressed {
                        down_x,
                        down_y,
                        down_time_ms,
                        last_x: sample.x,
                    };
                } else {
                    self.gesture = GesturePhase::Dragging { last_x: sample.x };
                }
            }
            GesturePhase::Dragging { last_x } => {
                // Content scrolls opposite the finger.
                let delta = last_x - sample.x;
                self.gesture = GesturePhase::Dragging { last_x: sample.x };
                self.drag_by(delta, sample.time_ms);
            }
        }
    }

    /// The finger lifted. A short, unlatched press is a tap; a latched drag
    /// either flings or settles depending on the release velocity.
    pub fn pointer_up(&mut self, sample: PointerSample) {
        if self.released {
            return;
        }
        self.tracker.add_sample(sample.time_ms, sample.x);
        let gesture = std::mem::replace(&mut self.gesture, GesturePhase::Idle);
        match gesture {
            GesturePhase::Idle => {}
            GesturePhase::Pressed { down_time_ms, .. } => {
                if sample.time_ms - down_time_ms <= MAX_TAP_MS {
                    self.resolve_tap(sample.x, sample.time_ms);
                } else {
                    self.begin_settle(sample.time_ms);
                }
            }
            GesturePhase::Dragging { .. } => {
                let velocity = self.tracker.velocity_capped(MAX_FLING_VELOCITY);
                if velocity.abs() >= MIN_FLING_VELOCITY {
                    self.scroller = Scroller::fling(
                        self.current_distance,
                        -velocity,
                        0.0,
                        self.map.total_range_distance(),
                        &self.fling,
                        sample.time_ms,
                    );
                    if self.scroller.is_finished() {
                        self.begin_settle(sample.time_ms);
                    } else {
                        self.animation = AnimationPhase::Decelerating;
                    }
                } else {
                    self.begin_settle(sample.time_ms);
                }
            }
        }
    }

    /// The gesture was taken away (system cancel). The position settles
    /// onto the nearest tick as if the finger had lifted gently.
    pub fn pointer_cancel(&mut self, now_ms: i64) {
        if self.released {
            return;
        }
        if self.gesture.is_active() {
            self.gesture = GesturePhase::Idle;
            self.begin_settle(now_ms);
        }
    }

    // ----- frame clock -----

    /// Advances any running animation to `now_ms`. Call once per frame
    /// while [`RulerEngine::is_animating`] returns true.
    pub fn tick(&mut self, now_ms: i64) {
        if self.released {
            return;
        }
        match self.animation {
            AnimationPhase::Idle => {}
            AnimationPhase::Decelerating => {
                let running = self.scroller.compute(now_ms);
                self.commit_distance(self.scroller.current(), None, true);
                if !running {
                    self.begin_settle(now_ms);
                }
            }
            AnimationPhase::Settling { target } => {
                let running = self.scroller.compute(now_ms);
                self.commit_distance(self.scroller.current(), None, true);
                if !running {
                    self.current_distance = self.map.distance_from_value(target);
                    self.finish_on_tick(target);
                }
            }
            AnimationPhase::Programmatic { target } => {
                // The value was committed when the animation started;
                // ticks passed in transit stay silent.
                let running = self.scroller.compute(now_ms);
                self.current_distance = self
                    .scroller
                    .current()
                    .clamp(0.0, self.map.total_range_distance());
                if !running {
                    self.current_distance = self.map.distance_from_value(target);
                    self.animation = AnimationPhase::Idle;
                }
            }
        }
    }

    // ----- programmatic control -----

    /// Sets the value directly, animating the ruler to it.
    ///
    /// The value change and the stop are reported synchronously before this
    /// returns; the animation that follows is presentation only. Values
    /// outside the configured range are rejected.
    pub fn set_current_value(&mut self, value: f32, now_ms: i64) -> Result<(), RulerError> {
        if self.released {
            return Ok(());
        }
        if value < self.config.min_value || value > self.config.max_value {
            return Err(InvalidArgument {
                value,
                min: self.config.min_value,
                max: self.config.max_value,
            }
            .into());
        }
        self.program_to(scale(value), now_ms);
        Ok(())
    }

    /// Replaces the range with a uniform-density one and moves to
    /// `current_value`. Existing gap rules are discarded. A collapsed range
    /// or non-positive unit is accepted and pins the ruler.
    pub fn set_range(
        &mut self,
        min_value: f32,
        max_value: f32,
        current_value: f32,
        unit: f32,
        ticks_per_major: u32,
    ) -> Result<(), RulerError> {
        if self.released {
            return Ok(());
        }
        if min_value > max_value {
            return Err(InvalidArgument {
                value: max_value,
                min: min_value,
                max: f32::INFINITY,
            }
            .into());
        }
        if current_value < min_value || current_value > max_value {
            return Err(InvalidArgument {
                value: current_value,
                min: min_value,
                max: max_value,
            }
            .into());
        }
        let mut config = self.config.clone();
        config.min_value = min_value;
        config.max_value = max_value;
        config.unit = unit;
        config.ticks_per_major = ticks_per_major;
        config.gap_rules.clear();
        self.apply_config(config, scale(current_value));
        if self.auto_gap {
            self.recompute_uniform_density();
        }
        Ok(())
    }

    /// Replaces the segment densities. The range is derived from the rule
    /// endpoints; `initial_value` moves there when given (and must be in the
    /// derived range), otherwise the current value is clamped into it. A
    /// rejected rule list leaves the previous configuration untouched.
    pub fn set_gap_rules(
        &mut self,
        rules: &[GapRule],
        initial_value: Option<f32>,
    ) -> Result<(), RulerError> {
        if self.released {
            return Ok(());
        }
        RulerConfig::validate_gap_rules(rules)?;
        let (first, last) = match (rules.first(), rules.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(reglet_core::ConfigError::Empty.into()),
        };
        let current = match initial_value {
            Some(value) => {
                if value < first.start_value || value > last.end_value {
                    return Err(InvalidArgument {
                        value,
                        min: first.start_value,
                        max: last.end_value,
                    }
                    .into());
                }
                scale(value)
            }
            None => self.committed_tick,
        };
        let mut config = self.config.clone();
        config.min_value = first.start_value;
        config.max_value = last.end_value;
        config.gap_rules = rules.iter().copied().collect();
        self.apply_config(config, current);
        Ok(())
    }

    /// Replaces the special ticks. Only the snap cache and rendering are
    /// affected; the position does not move. Every value must lie inside
    /// the configured range.
    pub fn set_special_ticks(&mut self, ticks: Vec<SpecialTick>) -> Result<(), RulerError> {
        if self.released {
            return Ok(());
        }
        for tick in &ticks {
            if tick.value < self.config.min_value || tick.value > self.config.max_value {
                return Err(InvalidArgument {
                    value: tick.value,
                    min: self.config.min_value,
                    max: self.config.max_value,
                }
                .into());
            }
        }
        self.config.special_ticks = ticks;
        self.cache = SnapCache::rebuild(&self.config);
        Ok(())
    }

    /// Updates the host measurement. With auto-gap enabled the uniform tick
    /// density is re-derived so the range spans exactly one viewport width.
    pub fn set_viewport_width(&mut self, viewport_width: f32) {
        if self.released {
            return;
        }
        self.viewport_width = viewport_width.max(0.0);
        if self.auto_gap {
            self.recompute_uniform_density();
        }
    }

    /// Ties the uniform tick density to the viewport width. Ignored while
    /// gap rules are in effect.
    pub fn set_auto_gap(&mut self, enabled: bool) {
        if self.released {
            return;
        }
        self.auto_gap = enabled;
        if enabled {
            self.recompute_uniform_density();
        }
    }

    /// Detaches the engine: observers are dropped and every subsequent
    /// call becomes a no-op. Terminal.
    pub fn release(&mut self) {
        self.released = true;
        self.scroller.force_finish();
        self.animation = AnimationPhase::Idle;
        self.gesture = GesturePhase::Idle;
        self.on_value_changed = None;
        self.on_scroll_stop = None;
    }

    // ----- queries -----

    /// The committed value, always on a tick.
    pub fn current_value(&self) -> f32 {
        unscale(self.committed_tick)
    }

    /// The committed value formatted as its tick label.
    pub fn current_label(&self) -> String {
        reglet_core::format_label(self.committed_tick, &self.config.label_suffix)
    }

    pub fn min_value(&self) -> f32 {
        self.config.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.config.max_value
    }

    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    /// Pixel offset of the min tick from the viewport origin.
    pub fn current_distance(&self) -> f32 {
        self.current_distance
    }

    pub fn total_range_distance(&self) -> f32 {
        self.map.total_range_distance()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GesturePhase::Dragging { .. })
    }

    /// Ticks currently inside the viewport, ready to draw.
    pub fn visible_ticks(&self) -> Vec<Tick> {
        reglet_core::visible_ticks(
            &self.map,
            &self.config,
            self.current_distance,
            self.viewport_width,
        )
    }

    /// Returns and clears the pending haptic pulse flag. Poll once per
    /// frame.
    pub fn take_haptic_pulse(&mut self) -> bool {
        self.haptics.take()
    }

    // ----- internals -----

    fn drag_by(&mut self, delta: f32, now_ms: i64) {
        let total = self.map.total_range_distance();
        let proposed = (self.current_distance + delta).clamp(0.0, total);
        let committed = self.snap.step(
            proposed,
            delta,
            now_ms,
            &self.map,
            &self.cache,
            self.config.major_interval(),
        );
        let speed = self.tracker.velocity();
        self.commit_distance(committed, Some(speed), true);
    }

    /// Moves the canonical position and reports the tick under it.
    ///
    /// `drag_speed` is present only for finger-driven motion; it gates the
    /// haptic filter, which stays out of animated motion entirely.
    fn commit_distance(&mut self, distance: f32, drag_speed: Option<f32>, emit: bool) {
        self.current_distance = distance.clamp(0.0, self.map.total_range_distance());
        let tick = self
            .map
            .value_from_distance(self.current_distance, RoundMode::Nearest);
        if tick == self.committed_tick {
            return;
        }
        self.committed_tick = tick;
        if emit {
            self.emit_value();
        }
        if let Some(speed) = drag_speed {
            self.haptics.observe(
                tick,
                speed,
                SLOW_DRAG_SPEED,
                &self.cache,
                self.config.major_interval(),
            );
        }
    }

    /// Resolves a tap: the tick under the tapped point wins, unless a
    /// snap-eligible tick sits within a widened capture band around it.
    fn resolve_tap(&mut self, x: f32, now_ms: i64) {
        let total = self.map.total_range_distance();
        let target_px =
            (self.current_distance + (x - self.viewport_width / 2.0)).clamp(0.0, total);
        let mut target = self.map.value_from_distance(target_px, RoundMode::Nearest);
        if let Some(candidate) =
            self.cache
                .nearest_within(target, self.config.major_interval(), None)
        {
            let candidate_px = self.map.distance_from_value(candidate);
            if (candidate_px - target_px).abs() < SNAP_TRIGGER_DISTANCE * CLICK_MAGNETISM_FACTOR {
                target = candidate;
            }
        }
        self.program_to(target, now_ms);
    }

    /// Commits `target` immediately and starts the presentation tween
    /// toward it. Used by the programmatic setter and by tap resolution.
    fn program_to(&mut self, target: ScaledValue, now_ms: i64) {
        self.interrupt_motion();
        let target_px = self.map.distance_from_value(target);
        if target != self.committed_tick {
            self.committed_tick = target;
            self.emit_value();
        }
        self.emit_stop();

        let delta = target_px - self.current_distance;
        let total = self.map.total_range_distance();
        if delta.abs() < 0.5 || total <= 0.0 {
            self.current_distance = target_px;
            return;
        }
        // Duration scales with the fraction of the range traveled.
        let duration = ((delta.abs() * MAX_PROGRAMMATIC_MS as f32 / total) as i64)
            .clamp(1, MAX_PROGRAMMATIC_MS);
        self.scroller = Scroller::start_scroll(
            self.current_distance,
            delta,
            duration,
            Easing::FastOutSlowIn,
            now_ms,
        );
        self.animation = AnimationPhase::Programmatic { target };
    }

    /// Re-derives the uniform density so `tick_count` steps span the
    /// viewport. Only meaningful without gap rules.
    fn recompute_uniform_density(&mut self) {
        if !self.config.gap_rules.is_empty() {
            return;
        }
        let ticks = self.config.tick_count();
        if ticks < 1 || self.viewport_width <= 0.0 {
            return;
        }
        // A relayout stops animations but leaves an active gesture alone;
        // the drag continues against the new density.
        if !self.scroller.is_finished() {
            self.scroller.force_finish();
        }
        self.animation = AnimationPhase::Idle;
        self.config.uniform_px_per_tick = self.viewport_width / ticks as f32;
        self.map = ScaleMap::from_config(&self.config);
        self.current_distance = self.map.distance_from_value(self.committed_tick);
        self.scroller = Scroller::idle(self.current_distance);
    }

    /// Starts the short settle tween onto the nearest tick.
    fn begin_settle(&mut self, now_ms: i64) {
        let target = self
            .map
            .value_from_distance(self.current_distance, RoundMode::Nearest);
        self.animate_to_tick(target, now_ms);
    }

    fn animate_to_tick(&mut self, target: ScaledValue, now_ms: i64) {
        let target_px = self.map.distance_from_value(target);
        let delta = target_px - self.current_distance;
        if delta.abs() < 0.5 {
            self.current_distance = target_px;
            self.finish_on_tick(target);
            return;
        }
        let duration =
            ((delta.abs() * SETTLE_MS_PER_PX) as i64).clamp(MIN_SETTLE_MS, MAX_SETTLE_MS);
        self.scroller = Scroller::start_scroll(
            self.current_distance,
            delta,
            duration,
            Easing::LinearOutSlowIn,
            now_ms,
        );
        self.animation = AnimationPhase::Settling { target };
    }

    /// All motion has stopped exactly on `target`.
    fn finish_on_tick(&mut self, target: ScaledValue) {
        self.animation = AnimationPhase::Idle;
        if target != self.committed_tick {
            self.committed_tick = target;
            self.emit_value();
        }
        self.emit_stop();
    }

    fn interrupt_motion(&mut self) {
        if !self.scroller.is_finished() {
            self.scroller.force_finish();
        }
        self.animation = AnimationPhase::Idle;
        self.gesture = GesturePhase::Idle;
    }

    /// Swaps in a new configuration and rebuilds everything derived from
    /// it. `current` is clamped into the new range.
    fn apply_config(&mut self, config: RulerConfig, current: ScaledValue) {
        self.interrupt_motion();
        if config.is_degenerate() {
            log::debug!(
                "degenerate ruler config (min {}, max {}, unit {}); interaction disabled",
                config.min_value,
                config.max_value,
                config.unit
            );
        }
        self.config = config;
        self.map = ScaleMap::from_config(&self.config);
        self.cache = SnapCache::rebuild(&self.config);
        self.snap = SnapMachine::new(snap_params());
        let current = current.clamp(self.map.scaled_min(), self.map.scaled_max());
        self.current_distance = self.map.distance_from_value(current);
        self.scroller = Scroller::idle(self.current_distance);
        self.committed_tick = current;
        // Reconfiguration always reports the current value, changed or not.
        self.emit_value();
    }

    fn emit_value(&mut self) {
        let value = unscale(self.committed_tick);
        if let Some(observer) = self.on_value_changed.as_mut() {
            observer.on_value_changed(value);
        }
    }

    fn emit_stop(&mut self) {
        let value = unscale(self.committed_tick);
        let label = reglet_core::format_label(self.committed_tick, &self.config.label_suffix);
        if let Some(observer) = self.on_scroll_stop.as_mut() {
            observer.on_scroll_stop(value, &label);
        }
    }
}

fn snap_params() -> SnapParams {
    SnapParams {
        trigger_distance: SNAP_TRIGGER_DISTANCE,
        escape_distance: SNAP_ESCAPE_DISTANCE,
        cooldown_ms: SNAP_COOLDOWN_MS,
        min_direction_delta: MIN_DIRECTION_DELTA,
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
