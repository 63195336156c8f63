use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{Asteroid, Moon, NebulaCloud, Planet, Station};
use super::ship::Ship;

/// Category of a body inside a star system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    Station,
    Ship,
    Asteroid,
    Nebula,
}

/// Typed reference to a body: kind plus index (and sub-index for moons,
/// where `index` is the parent planet and `sub_index` the moon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyRef {
    pub kind: BodyKind,
    pub index: usize,
    pub sub_index: usize,
}

impl BodyRef {
    pub const STAR: BodyRef = BodyRef { kind: BodyKind::Star, index: 0, sub_index: 0 };

    pub fn planet(index: usize) -> Self {
        Self { kind: BodyKind::Planet, index, sub_index: 0 }
    }

    pub fn moon(planet: usize, moon: usize) -> Self {
        Self { kind: BodyKind::Moon, index: planet, sub_index: moon }
    }

    pub fn station(index: usize) -> Self {
        Self { kind: BodyKind::Station, index, sub_index: 0 }
    }

    pub fn ship(index: usize) -> Self {
        Self { kind: BodyKind::Ship, index, sub_index: 0 }
    }

    pub fn asteroid(index: usize) -> Self {
        Self { kind: BodyKind::Asteroid, index, sub_index: 0 }
    }

    pub fn nebula(index: usize) -> Self {
        Self { kind: BodyKind::Nebula, index, sub_index: 0 }
    }
}

/// A resolved, borrowed view of one body.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    /// The system center; carries the star radius (zero when there is no star).
    Star { radius: f64 },
    Planet(&'a Planet),
    Moon { parent: &'a Planet, moon: &'a Moon },
    Station(&'a Station),
    Ship(&'a Ship),
    Asteroid(&'a Asteroid),
    Nebula(&'a NebulaCloud),
}

impl EntityRef<'_> {
    pub fn position(&self) -> DVec2 {
        match self {
            EntityRef::Star { .. } => DVec2::ZERO,
            EntityRef::Planet(p) => p.position(),
            EntityRef::Moon { moon, .. } => moon.position(),
            EntityRef::Station(s) => s.position(),
            EntityRef::Ship(s) => s.pos,
            EntityRef::Asteroid(a) => a.position(),
            EntityRef::Nebula(n) => n.position(),
        }
    }

    /// Visual radius in world units, used for selection and ship orbit spacing.
    pub fn radius(&self) -> f64 {
        match self {
            EntityRef::Star { radius } => *radius,
            EntityRef::Planet(p) => p.radius,
            EntityRef::Moon { moon, .. } => moon.radius,
            EntityRef::Station(_) => 0.08,
            EntityRef::Ship(_) => 0.05,
            EntityRef::Asteroid(a) => a.radius,
            EntityRef::Nebula(n) => n.radius,
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            EntityRef::Star { .. } => BodyKind::Star,
            EntityRef::Planet(_) => BodyKind::Planet,
            EntityRef::Moon { .. } => BodyKind::Moon,
            EntityRef::Station(_) => BodyKind::Station,
            EntityRef::Ship(_) => BodyKind::Ship,
            EntityRef::Asteroid(_) => BodyKind::Asteroid,
            EntityRef::Nebula(_) => BodyKind::Nebula,
        }
    }
}
