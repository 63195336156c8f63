//! Keplerian two-body orbits. Pure math, no engine dependencies.
//!
//! f64 throughout; positions are only narrowed to f32 at the screen step.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Eccentricity is clamped strictly below this before solving.
pub const MAX_ECCENTRICITY: f64 = 0.95;
/// Newton-Raphson iteration cap.
pub const KEPLER_MAX_ITERATIONS: u32 = 8;
const KEPLER_STEP_EPS: f64 = 1e-10;
const KEPLER_DERIVATIVE_EPS: f64 = 1e-9;
const MIN_SEMI_MAJOR_AXIS: f64 = 1e-6;
const MIN_PERIOD: f64 = 1e-3;

/// How orbital elements are turned into positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrbitModel {
    /// Full ellipse via Kepler's equation.
    #[default]
    Kepler,
    /// Circle of radius `a` at angle `M + omega`, ignoring eccentricity.
    Circular,
}

/// Result of solving `E - e·sin(E) = M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// Wrap an angle to (-π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Clamp eccentricity into [0, 0.95).
pub fn clamp_eccentricity(e: f64) -> f64 {
    if !e.is_finite() {
        return 0.0;
    }
    e.clamp(0.0, MAX_ECCENTRICITY - 1e-9)
}

/// Solve Kepler's equation with Newton-Raphson.
/// `mean_anomaly` is any real; it is normalized first.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let e = clamp_eccentricity(eccentricity);
    let m = normalize_angle(mean_anomaly);
    // High eccentricity converges badly from M near periapsis; start at π.
    let mut ea = if e >= 0.8 { PI } else { m };
    let mut iterations = 0;
    let mut converged = false;

    while iterations < KEPLER_MAX_ITERATIONS {
        let f = ea - e * ea.sin() - m;
        let derivative = 1.0 - e * ea.cos();
        if derivative.abs() < KEPLER_DERIVATIVE_EPS {
            break;
        }
        let step = f / derivative;
        ea -= step;
        iterations += 1;
        if step.abs() < KEPLER_STEP_EPS {
            converged = true;
            break;
        }
    }

    KeplerSolution {
        eccentric_anomaly: ea,
        iterations,
        converged,
    }
}

/// True anomaly from eccentric anomaly.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let e = clamp_eccentricity(eccentricity);
    let (s, c) = eccentric_anomaly.sin_cos();
    ((1.0 - e * e).sqrt() * s).atan2(c - e)
}

/// Plane position of a body on its ellipse, focus at the origin,
/// rotated by the argument of periapsis.
pub fn orbit_position(a: f64, e: f64, omega: f64, mean_anomaly: f64) -> DVec2 {
    let a = a.max(MIN_SEMI_MAJOR_AXIS);
    let e = clamp_eccentricity(e);
    let ea = solve_kepler(mean_anomaly, e).eccentric_anomaly;
    let nu = true_anomaly(ea, e);
    let r = a * (1.0 - e * ea.cos());
    let angle = nu + omega;
    DVec2::new(r * angle.cos(), r * angle.sin())
}

/// Static orbital elements of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis in world units.
    pub a: f64,
    /// Eccentricity [0, 0.95).
    pub e: f64,
    /// Argument of periapsis (radians).
    pub omega: f64,
    /// Orbital period in simulation seconds.
    pub period: f64,
    /// Mean anomaly at t = 0.
    pub m0: f64,
}

impl OrbitalElements {
    pub fn new(a: f64, e: f64, omega: f64, period: f64, m0: f64) -> Self {
        Self {
            a: a.max(MIN_SEMI_MAJOR_AXIS),
            e: clamp_eccentricity(e),
            omega,
            period: period.max(MIN_PERIOD),
            m0,
        }
    }

    pub fn mean_anomaly_at(&self, time: f64) -> f64 {
        self.m0 + TAU * time / self.period.max(MIN_PERIOD)
    }

    pub fn position_at(&self, time: f64, model: OrbitModel) -> DVec2 {
        let m = self.mean_anomaly_at(time);
        match model {
            OrbitModel::Kepler => orbit_position(self.a, self.e, self.omega, m),
            OrbitModel::Circular => {
                let angle = m + self.omega;
                DVec2::new(self.a * angle.cos(), self.a * angle.sin())
            }
        }
    }

    /// Speed at periapsis, the fastest point on the ellipse.
    pub fn max_orbital_speed(&self) -> f64 {
        let e = clamp_eccentricity(self.e);
        let mean_speed = TAU * self.a / self.period.max(MIN_PERIOD);
        mean_speed * ((1.0 + e) / (1.0 - e)).sqrt()
    }

    /// Evenly spaced (in eccentric anomaly) points around the ellipse.
    pub fn sample_path(&self, samples: usize, model: OrbitModel) -> Vec<DVec2> {
        let n = samples.max(3);
        let e = clamp_eccentricity(self.e);
        (0..n)
            .map(|i| {
                let ea = TAU * i as f64 / n as f64;
                match model {
                    OrbitModel::Kepler => {
                        let nu = true_anomaly(ea, e);
                        let r = self.a * (1.0 - e * ea.cos());
                        let angle = nu + self.omega;
                        DVec2::new(r * angle.cos(), r * angle.sin())
                    }
                    OrbitModel::Circular => DVec2::new(self.a * ea.cos(), self.a * ea.sin()),
                }
            })
            .collect()
    }
}

/// Kepler's third law in world units: period grows as a^1.5.
pub fn period_for(a: f64, scale: f64) -> f64 {
    (scale * a.max(MIN_SEMI_MAJOR_AXIS).powf(1.5)).max(MIN_PERIOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kepler_circular_orbit() {
        let sol = solve_kepler(1.0, 0.0);
        assert!((sol.eccentric_anomaly - 1.0).abs() < 1e-10);
    }

    #[test]
    fn kepler_reference_case_converges() {
        let (a, e, omega, m) = (10.0, 0.3, 0.0, 1.0);
        let sol = solve_kepler(m, e);
        let ea = sol.eccentric_anomaly;
        let residual = ea - e * ea.sin() - m;
        assert!(residual.abs() < 1e-8, "residual = {residual}");
        assert!(sol.iterations <= KEPLER_MAX_ITERATIONS);
        assert!(sol.converged);

        let p = orbit_position(a, e, omega, m);
        let r = p.length();
        assert!(r >= a * (1.0 - e) - 1e-9 && r <= a * (1.0 + e) + 1e-9);
    }

    #[test]
    fn kepler_high_eccentricity_terminates() {
        for i in -50..50 {
            let m = i as f64 * 0.37;
            let sol = solve_kepler(m, 0.94);
            assert!(sol.iterations <= KEPLER_MAX_ITERATIONS);
            assert!(sol.eccentric_anomaly.is_finite());
        }
    }

    #[test]
    fn eccentricity_is_clamped() {
        let p = orbit_position(5.0, 3.0, 0.0, 0.0);
        assert!(p.x.is_finite() && p.y.is_finite());
        // Periapsis of the clamped orbit.
        assert!((p.length() - 5.0 * (1.0 - (MAX_ECCENTRICITY - 1e-9))).abs() < 1e-6);
        assert_eq!(clamp_eccentricity(-1.0), 0.0);
        assert_eq!(clamp_eccentricity(f64::NAN), 0.0);
    }

    #[test]
    fn normalize_angle_range() {
        for i in -40..40 {
            let a = normalize_angle(i as f64 * 1.3);
            assert!(a > -PI - 1e-12 && a <= PI + 1e-12, "{a}");
        }
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn periapsis_and_apoapsis() {
        let peri = orbit_position(10.0, 0.5, 0.0, 0.0);
        assert!((peri.x - 5.0).abs() < 1e-9 && peri.y.abs() < 1e-9);
        let apo = orbit_position(10.0, 0.5, 0.0, PI);
        assert!((apo.x + 15.0).abs() < 1e-6, "apo = {apo:?}");
    }

    #[test]
    fn omega_rotates_periapsis() {
        let p = orbit_position(10.0, 0.2, PI / 2.0, 0.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn orbit_is_continuous() {
        let el = OrbitalElements::new(12.0, 0.6, 0.7, 40.0, 0.3);
        let v_max = el.max_orbital_speed();
        let eps = 1e-3;
        for i in 0..4000 {
            let t = i as f64 * 0.01;
            let p0 = el.position_at(t, OrbitModel::Kepler);
            let p1 = el.position_at(t + eps, OrbitModel::Kepler);
            let d = (p1 - p0).length();
            assert!(d <= v_max * eps * 1.01 + 1e-9, "jump {d} at t={t}");
        }
    }

    #[test]
    fn full_period_returns_to_start() {
        let el = OrbitalElements::new(8.0, 0.1, 0.0, 25.0, 0.0);
        let p0 = el.position_at(0.0, OrbitModel::Kepler);
        let p1 = el.position_at(25.0, OrbitModel::Kepler);
        assert!((p1 - p0).length() < 1e-6);
    }

    #[test]
    fn circular_model_keeps_radius() {
        let el = OrbitalElements::new(7.0, 0.5, 1.0, 10.0, 0.0);
        for i in 0..20 {
            let p = el.position_at(i as f64, OrbitModel::Circular);
            assert!((p.length() - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sample_path_has_requested_points() {
        let el = OrbitalElements::new(7.0, 0.3, 0.0, 10.0, 0.0);
        let path = el.sample_path(64, OrbitModel::Kepler);
        assert_eq!(path.len(), 64);
        assert_eq!(el.sample_path(1, OrbitModel::Kepler).len(), 3);
    }

    #[test]
    fn degenerate_elements_are_floored() {
        let el = OrbitalElements::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let p = el.position_at(5.0, OrbitModel::Kepler);
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}
