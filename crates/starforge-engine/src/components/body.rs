use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::ring::RingParams;
use crate::core::orbit::{OrbitModel, OrbitalElements};

/// Surface texture families. Each maps to a procedural equirectangular
/// generator in `renderer::texture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureKind {
    Barren,
    Rocky,
    Desert,
    Ocean,
    Terran,
    Lava,
    Ice,
    Toxic,
    GasBands,
    GasStorm,
    IceGiant,
}

impl TextureKind {
    pub const ALL: [TextureKind; 11] = [
        Self::Barren, Self::Rocky, Self::Desert, Self::Ocean, Self::Terran, Self::Lava,
        Self::Ice, Self::Toxic, Self::GasBands, Self::GasStorm, Self::IceGiant,
    ];

    /// Whether the texture carries a night-side emissive layer.
    pub fn has_emissive(self) -> bool {
        matches!(self, Self::Terran | Self::Lava)
    }

    pub fn is_gaseous(self) -> bool {
        matches!(self, Self::GasBands | Self::GasStorm | Self::IceGiant)
    }

    /// Strength of the emissive blend on the night side.
    pub fn emissive_strength(self) -> f32 {
        match self {
            Self::Terran => 0.9,
            Self::Lava => 1.0,
            _ => 0.0,
        }
    }
}

/// A planet on a Kepler orbit around the system origin.
#[derive(Debug, Clone)]
pub struct Planet {
    pub seed: u32,
    pub name: String,
    pub orbit: OrbitalElements,
    /// Physical radius in world units.
    pub radius: f64,
    /// Surface rotation rate (radians per simulation second).
    pub spin_speed: f64,
    /// Spin axis tilt in the screen plane (radians).
    pub axis_tilt: f64,
    pub ring: Option<RingParams>,
    pub texture: TextureKind,
    pub is_gas: bool,
    pub cold_zone: bool,
    pub moons: Vec<Moon>,
    /// Derived world position; recomputed every tick.
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl Planet {
    pub fn has_rings(&self) -> bool {
        self.ring.is_some()
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.wx, self.wy)
    }

    /// Recompute the world position (and all moons) for `time`.
    pub fn update_position(&mut self, time: f64, model: OrbitModel) {
        let p = self.orbit.position_at(time, model);
        self.wx = p.x;
        self.wy = p.y;
        self.wz = depth_of(p.y);
        let parent = p;
        for moon in &mut self.moons {
            moon.update_position(parent, time);
        }
    }
}

/// A moon on a circular local orbit around its parent planet.
#[derive(Debug, Clone)]
pub struct Moon {
    pub seed: u32,
    pub local_radius: f64,
    /// Local orbital period in simulation seconds. Negative means retrograde.
    pub local_period: f64,
    pub phase: f64,
    pub radius: f64,
    pub spin_speed: f64,
    pub axis_tilt: f64,
    pub texture: TextureKind,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl Moon {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.wx, self.wy)
    }

    pub fn update_position(&mut self, parent: DVec2, time: f64) {
        let p = parent + local_offset(self.local_radius, self.local_period, self.phase, time);
        self.wx = p.x;
        self.wy = p.y;
        self.wz = depth_of(p.y);
    }
}

/// An orbital station anchored to one planet.
#[derive(Debug, Clone)]
pub struct Station {
    pub name: String,
    /// Index of the anchor planet in the owning system.
    pub planet: usize,
    pub local_radius: f64,
    pub local_period: f64,
    pub phase: f64,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl Station {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.wx, self.wy)
    }

    pub fn update_position(&mut self, anchor: DVec2, time: f64) {
        let p = anchor + local_offset(self.local_radius, self.local_period, self.phase, time);
        self.wx = p.x;
        self.wy = p.y;
        self.wz = depth_of(p.y);
    }
}

/// A decorative rock. Placed in polar coordinates about the system origin;
/// debris rings carry a non-zero angular speed.
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub orbit_radius: f64,
    pub angle0: f64,
    pub angular_speed: f64,
    /// Vertical flattening of the placement ring (1.0 = circle).
    pub flatten: f64,
    pub radius: f64,
    /// Brightness multiplier for the rock's base color.
    pub shade: f32,
    pub color: Color,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl Asteroid {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.wx, self.wy)
    }

    pub fn update_position(&mut self, time: f64) {
        let angle = self.angle0 + self.angular_speed * time;
        self.wx = self.orbit_radius * angle.cos();
        self.wy = self.orbit_radius * angle.sin() * self.flatten;
        self.wz = depth_of(self.wy);
    }
}

/// A static fog cloud.
#[derive(Debug, Clone)]
pub struct NebulaCloud {
    pub wx: f64,
    pub wy: f64,
    pub radius: f64,
    /// Peak opacity in [0, 1].
    pub density: f32,
    pub color: Color,
    pub noise_seed: u32,
    /// Dark clouds absorb light instead of glowing.
    pub dark: bool,
}

impl NebulaCloud {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.wx, self.wy)
    }
}

/// Depth convention: the orbital plane is viewed tilted, so bodies further
/// "down" the plane (larger world y) are nearer. Lower depth is nearer.
pub fn depth_of(world_y: f64) -> f64 {
    -world_y
}

fn local_offset(radius: f64, period: f64, phase: f64, time: f64) -> DVec2 {
    let period = if period.abs() < 1e-3 { 1e-3_f64.copysign(period) } else { period };
    let angle = phase + std::f64::consts::TAU * time / period;
    DVec2::new(radius * angle.cos(), radius * angle.sin())
}
