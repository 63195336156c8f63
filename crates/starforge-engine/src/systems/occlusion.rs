//! Per-frame screen-space occluders for planets and moons.
//!
//! A pixel drawn at some depth is hidden when another disc with strictly
//! lower depth covers it. Lower depth is nearer.

use glam::Vec2;

use crate::components::{BodyRef, StarSystem};
use crate::renderer::camera::Camera;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    pub body: BodyRef,
    /// Screen-space center in pixels.
    pub center: Vec2,
    /// Screen-space radius in pixels.
    pub radius: f32,
    pub depth: f64,
}

impl Occluder {
    fn covers(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Debug, Clone, Default)]
pub struct OcclusionIndex {
    occluders: Vec<Occluder>,
}

impl OcclusionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.occluders.clear();
    }

    pub fn push(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }

    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Occluder> {
        self.occluders.iter()
    }

    /// Rebuild from the visible planets and moons of `system`.
    pub fn rebuild(&mut self, system: &StarSystem, camera: &Camera) {
        self.occluders.clear();
        for (pi, planet) in system.planets.iter().enumerate() {
            let center = camera.world_to_screen_f(planet.wx, planet.wy);
            let radius = camera.scale(planet.radius).max(0.5);
            if camera.is_disc_visible(center, radius) {
                self.occluders.push(Occluder {
                    body: BodyRef::planet(pi),
                    center,
                    radius,
                    depth: planet.wz,
                });
            }
            for (mi, moon) in planet.moons.iter().enumerate() {
                let center = camera.world_to_screen_f(moon.wx, moon.wy);
                let radius = camera.scale(moon.radius).max(0.5);
                if camera.is_disc_visible(center, radius) {
                    self.occluders.push(Occluder {
                        body: BodyRef::moon(pi, mi),
                        center,
                        radius,
                        depth: moon.wz,
                    });
                }
            }
        }
    }

    /// True iff an occluder other than `exclude` with strictly lower depth
    /// covers the pixel.
    pub fn is_occluded(&self, x: f32, y: f32, depth: f64, exclude: BodyRef) -> bool {
        self.occluders
            .iter()
            .any(|o| o.body != exclude && o.depth < depth && o.covers(x, y))
    }
}
