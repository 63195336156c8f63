//! Fixed-step simulation clock.
//!
//! Frame time is scaled, clamped and accumulated; the accumulator is then
//! drained in fixed steps so orbits and ships advance identically regardless
//! of render framerate.

/// Fixed simulation step (seconds).
pub const FIXED_STEP: f64 = 1.0 / 60.0;
/// Largest frame delta accepted before scaling.
pub const MAX_FRAME_DT: f64 = 0.25;
/// Largest amount of scaled time carried into one frame's drain.
pub const MAX_ACCUMULATED: f64 = 0.5;
/// Upper bound on the time-scale multiplier.
pub const MAX_TIME_SCALE: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Simulation time in seconds since the system epoch.
    time: f64,
    /// Multiplier applied to frame time.
    time_scale: f64,
    paused: bool,
    step: f64,
    accumulator: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::with_step(FIXED_STEP)
    }

    /// Clock with a custom step. Non-positive steps fall back to 1/60.
    pub fn with_step(step: f64) -> Self {
        let step = if step.is_finite() && step > 1e-6 { step } else { FIXED_STEP };
        Self {
            time: 0.0,
            time_scale: 1.0,
            paused: false,
            step,
            accumulator: 0.0,
        }
    }

    /// Feed one frame of wall time. Runs `on_step(sim_time, step)` once per
    /// drained fixed step and returns how many steps ran.
    pub fn advance<F: FnMut(f64, f64)>(&mut self, frame_dt: f64, mut on_step: F) -> u32 {
        if self.paused {
            return 0;
        }
        let dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator = (self.accumulator + dt * self.time_scale).min(MAX_ACCUMULATED);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.time += self.step;
            steps += 1;
            on_step(self.time, self.step);
        }
        steps
    }

    /// Fraction of a step left in the accumulator (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Jump to an absolute simulation time. Clears the accumulator.
    pub fn set_time(&mut self, time: f64) {
        self.time = if time.is_finite() { time } else { 0.0 };
        self.accumulator = 0.0;
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.clamp(0.0, MAX_TIME_SCALE) } else { 1.0 };
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.accumulator = 0.0;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = SimulationClock::new();
        let steps = clock.advance(FIXED_STEP + 1e-9, |_, _| {});
        assert_eq!(steps, 1);
        assert!((clock.time() - FIXED_STEP).abs() < 1e-12);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(0.008, |_, _| {}), 0);
        assert_eq!(clock.advance(0.010, |_, _| {}), 1);
    }

    #[test]
    fn large_hitch_is_bounded() {
        let mut clock = SimulationClock::new();
        let mut calls = 0;
        let steps = clock.advance(1.0, |_, _| calls += 1);
        assert_eq!(steps, calls);
        // dt clamps to 0.25s at scale 1.
        assert!(clock.time() <= MAX_FRAME_DT + 1e-9);
        assert!((14..=15).contains(&steps), "steps = {steps}");
    }

    #[test]
    fn accumulator_caps_at_half_second() {
        let mut clock = SimulationClock::new();
        clock.set_time_scale(50.0);
        let steps = clock.advance(1.0, |_, _| {});
        assert!(clock.time() <= MAX_ACCUMULATED + 1e-9, "time = {}", clock.time());
        assert!((29..=30).contains(&steps), "steps = {steps}");
    }

    #[test]
    fn paused_does_not_advance() {
        let mut clock = SimulationClock::new();
        clock.set_paused(true);
        let steps = clock.advance(0.1, |_, _| panic!("no steps while paused"));
        assert_eq!(steps, 0);
        assert_eq!(clock.time(), 0.0);
        clock.toggle_pause();
        assert!(clock.advance(0.1, |_, _| {}) > 0);
    }

    #[test]
    fn step_callback_sees_increasing_time() {
        let mut clock = SimulationClock::new();
        let mut last = 0.0;
        clock.advance(0.2, |t, step| {
            assert!(t > last);
            assert_eq!(step, FIXED_STEP);
            last = t;
        });
        assert_eq!(last, clock.time());
    }

    #[test]
    fn bad_inputs_are_sanitized() {
        let mut clock = SimulationClock::new();
        clock.set_time_scale(f64::NAN);
        assert_eq!(clock.time_scale(), 1.0);
        clock.set_time_scale(-3.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.advance(f64::INFINITY, |_, _| {}), 0);
        let c = SimulationClock::with_step(0.0);
        assert_eq!(c.step(), FIXED_STEP);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut clock = SimulationClock::new();
        clock.advance(0.008, |_, _| {});
        let a = clock.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {a}");
    }
}
