use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{Asteroid, NebulaCloud, Planet, Station};
use super::color::Color;
use super::entity::{BodyKind, BodyRef, EntityRef};
use super::ship::Ship;

/// Classification of a star system; decides which content builder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    NormalStar,
    AsteroidField,
    Nebula,
    DebrisDisk,
    Protostar,
    BrownDwarf,
    NeutronStar,
    BlackHole,
    SupernovaRemnant,
    DarkNebula,
}

impl SystemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NormalStar => "star",
            Self::AsteroidField => "asteroid field",
            Self::Nebula => "nebula",
            Self::DebrisDisk => "debris disk",
            Self::Protostar => "protostar",
            Self::BrownDwarf => "brown dwarf",
            Self::NeutronStar => "neutron star",
            Self::BlackHole => "black hole",
            Self::SupernovaRemnant => "supernova remnant",
            Self::DarkNebula => "dark nebula",
        }
    }
}

/// One star system. The header (kind, star, position) is built with the
/// galaxy; bodies are built on first activation.
#[derive(Debug, Clone)]
pub struct StarSystem {
    pub seed: u32,
    pub name: String,
    /// Position in the galaxy map.
    pub galactic_pos: DVec2,
    pub kind: SystemKind,
    pub has_star: bool,
    pub star_color: Color,
    pub star_radius: f64,
    pub corona_radius: f64,
    pub planets: Vec<Planet>,
    pub stations: Vec<Station>,
    pub ships: Vec<Ship>,
    pub asteroids: Vec<Asteroid>,
    pub nebulae: Vec<NebulaCloud>,
    pub(crate) populated: bool,
}

impl StarSystem {
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Build the bodies from the seed if they are not built yet.
    pub fn ensure_populated(&mut self) {
        crate::generation::builders::populate(self);
    }

    /// Drop all bodies; the next activation rebuilds them from the seed.
    pub fn clear_content(&mut self) {
        self.planets.clear();
        self.stations.clear();
        self.ships.clear();
        self.asteroids.clear();
        self.nebulae.clear();
        self.populated = false;
    }

    pub fn moon_count(&self) -> usize {
        self.planets.iter().map(|p| p.moons.len()).sum()
    }

    /// Resolve a typed reference against the current content.
    pub fn resolve(&self, body: BodyRef) -> Option<EntityRef<'_>> {
        match body.kind {
            BodyKind::Star => Some(EntityRef::Star {
                radius: if self.has_star { self.star_radius } else { 0.0 },
            }),
            BodyKind::Planet => self.planets.get(body.index).map(EntityRef::Planet),
            BodyKind::Moon => {
                let parent = self.planets.get(body.index)?;
                let moon = parent.moons.get(body.sub_index)?;
                Some(EntityRef::Moon { parent, moon })
            }
            BodyKind::Station => self.stations.get(body.index).map(EntityRef::Station),
            BodyKind::Ship => self.ships.get(body.index).map(EntityRef::Ship),
            BodyKind::Asteroid => self.asteroids.get(body.index).map(EntityRef::Asteroid),
            BodyKind::Nebula => self.nebulae.get(body.index).map(EntityRef::Nebula),
        }
    }

    pub fn position_of(&self, body: BodyRef) -> Option<DVec2> {
        self.resolve(body).map(|e| e.position())
    }

    /// Every selectable body in a stable order: star, planets with their
    /// moons, stations, ships.
    pub fn selectable_bodies(&self) -> Vec<BodyRef> {
        let mut out = Vec::with_capacity(1 + self.planets.len() + self.moon_count());
        if self.has_star || self.kind == SystemKind::BlackHole {
            out.push(BodyRef::STAR);
        }
        for (pi, planet) in self.planets.iter().enumerate() {
            out.push(BodyRef::planet(pi));
            for mi in 0..planet.moons.len() {
                out.push(BodyRef::moon(pi, mi));
            }
        }
        out.extend((0..self.stations.len()).map(BodyRef::station));
        out.extend((0..self.ships.len()).map(BodyRef::ship));
        out
    }

    /// Largest orbit extent, for framing the camera.
    pub fn extent(&self) -> f64 {
        let planets = self
            .planets
            .iter()
            .map(|p| p.orbit.a * (1.0 + p.orbit.e))
            .fold(0.0, f64::max);
        let rocks = self.asteroids.iter().map(|a| a.orbit_radius).fold(0.0, f64::max);
        let clouds = self
            .nebulae
            .iter()
            .map(|n| n.position().length() + n.radius)
            .fold(0.0, f64::max);
        planets.max(rocks).max(clouds).max(self.corona_radius).max(1.0)
    }
}
