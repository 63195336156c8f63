//! Planetary ring parameters and ring-plane geometry.
//!
//! Everything is expressed in planet-radius units in view space:
//! x to the right, y up the screen, z toward the viewer.

use glam::Vec3;

use super::color::Color;
use crate::core::hash::derive_seed;
use crate::core::rng::Rng;
use crate::extensions::easing::smoothstep;

/// A gap band inside the ring: density dips within `half_width` of `center`
/// (both expressed as fractions of the band width).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGap {
    pub center: f32,
    pub half_width: f32,
    /// Remaining density at the gap center, in [0, 1].
    pub floor: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingParams {
    pub seed: u32,
    /// Inner edge as a multiple of the planet radius.
    pub inner_mul: f32,
    /// Outer edge as a multiple of the planet radius.
    pub outer_mul: f32,
    /// Rotation of the ring's major axis in the screen plane.
    pub plane_angle: f32,
    /// Opening angle: 0 is face-on, π/2 is edge-on.
    pub tilt: f32,
    /// Rotation of the density pattern within the ring plane.
    pub pattern_angle: f32,
    pub gaps: [RingGap; 3],
    /// Width of the smoothstep falloff at both edges (band fraction).
    pub edge_softness: f32,
    pub tint: Color,
    pub opacity: f32,
}

/// A screen point lifted onto the ring plane.
#[derive(Debug, Clone, Copy)]
pub struct RingPoint {
    /// 3D point in view space (planet radii).
    pub pos: Vec3,
    /// Radial distance from the planet center within the ring plane.
    pub rho: f32,
    /// In-plane angle, including the pattern rotation.
    pub theta: f32,
}

const MIN_COS_TILT: f32 = 0.12;

impl RingParams {
    /// Derive ring parameters from a planet seed. Accepts any u32.
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Rng::new(derive_seed(seed, 0x7269_6e67));
        let inner_mul = rng.range_f32(1.25, 1.6);
        let outer_mul = inner_mul + rng.range_f32(0.6, 1.3);
        let plane_angle = rng.range_f32(-0.45, 0.45);
        let tilt = rng.range_f32(0.95, 1.32);
        let pattern_angle = rng.range_f32(0.0, std::f32::consts::TAU);

        let mut gaps = [RingGap { center: 0.5, half_width: 0.03, floor: 0.2 }; 3];
        for gap in &mut gaps {
            *gap = RingGap {
                center: rng.range_f32(0.12, 0.88),
                half_width: rng.range_f32(0.015, 0.06),
                floor: rng.range_f32(0.05, 0.45),
            };
        }

        let warm = rng.next_f32();
        let tint = Color::new(0.78 + 0.18 * warm, 0.72 + 0.1 * warm, 0.62 - 0.12 * warm);

        Self {
            seed,
            inner_mul,
            outer_mul,
            plane_angle,
            tilt,
            pattern_angle,
            gaps,
            edge_softness: rng.range_f32(0.04, 0.1),
            tint,
            opacity: rng.range_f32(0.6, 0.9),
        }
    }

    /// Orthonormal ring basis `(u, v, normal)`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let (sp, cp) = self.plane_angle.sin_cos();
        let (st, ct) = self.effective_tilt().sin_cos();
        let u = Vec3::new(cp, sp, 0.0);
        let v = Vec3::new(-sp * ct, cp * ct, st);
        let n = Vec3::new(sp * st, -cp * st, ct);
        (u, v, n)
    }

    /// Tilt clamped so the ring never becomes a degenerate line.
    pub fn effective_tilt(&self) -> f32 {
        let max_tilt = MIN_COS_TILT.acos();
        self.tilt.clamp(0.0, max_tilt)
    }

    /// Lift a screen offset (planet radii, y up) onto the ring plane by
    /// orthographic back-projection.
    pub fn lift(&self, x: f32, y: f32) -> RingPoint {
        let (u, v, _) = self.basis();
        let det = (u.x * v.y - v.x * u.y).max(MIN_COS_TILT);
        let a = (x * v.y - y * v.x) / det;
        let b = (u.x * y - u.y * x) / det;
        let pos = u * a + v * b;
        RingPoint {
            pos,
            rho: (a * a + b * b).sqrt(),
            theta: b.atan2(a) + self.pattern_angle,
        }
    }

    /// Band fraction of a radial distance: 0 at the inner edge, 1 at the outer.
    pub fn band_fraction(&self, rho: f32) -> f32 {
        (rho - self.inner_mul) / (self.outer_mul - self.inner_mul).max(1e-4)
    }

    pub fn contains(&self, rho: f32) -> bool {
        rho >= self.inner_mul && rho <= self.outer_mul
    }

    /// Geometric coverage at radius `rho`: soft edges and gaps, no material
    /// texture. Reaches 1.0 in the clear middle of the band.
    pub fn band_coverage(&self, rho: f32) -> f32 {
        if !self.contains(rho) {
            return 0.0;
        }
        let frac = self.band_fraction(rho);
        let soft = self.edge_softness.max(1e-3);
        let edge = smoothstep(0.0, soft, frac) * (1.0 - smoothstep(1.0 - soft, 1.0, frac));
        edge * self.gap_factor(frac)
    }

    /// Multiplicative density from the three gap bands.
    pub fn gap_factor(&self, frac: f32) -> f32 {
        let mut k = 1.0;
        for gap in &self.gaps {
            let d = (frac - gap.center).abs();
            if d < gap.half_width {
                let t = d / gap.half_width.max(1e-4);
                k *= gap.floor + (1.0 - gap.floor) * t * t;
            }
        }
        k
    }
}
