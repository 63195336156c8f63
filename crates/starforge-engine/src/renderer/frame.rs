//! One frame of a star system: background, fog, orbit paths, then every body
//! painted far to near, then dark clouds and the selection marker.

use glam::DVec2;

use super::camera::Camera;
use super::fog::{draw_asteroid, draw_path, draw_ring_outline, draw_ship, draw_starfield, draw_station, shade_nebula};
use super::ring::{shade_ring, RingLayer, RingShade};
use super::sphere::{light_direction, shade_sphere, spin_turns, SphereShade};
use super::star::{shade_black_hole, shade_star, BlackHoleShade, StarShade};
use super::style::RenderStyle;
use super::surface::RenderSurface;
use super::texture::{StarTextureCache, TextureCache, STAR_REFRESH_INTERVAL, TEXTURE_HEIGHT, TEXTURE_WIDTH};
use crate::components::{BodyRef, Color, StarSystem, SystemKind, TextureKind};
use crate::core::orbit::OrbitModel;
use crate::systems::occlusion::OcclusionIndex;

const ORBIT_PATH_COLOR: Color = Color::new(0.14, 0.18, 0.26);
const SELECTION_COLOR: Color = Color::new(0.4, 0.95, 0.6);
const ORBIT_PATH_SAMPLES: usize = 128;

/// Per-frame switches that are not part of the visual style.
#[derive(Debug, Clone, Copy)]
pub struct FrameOptions {
    pub draw_orbits: bool,
    pub orbit_model: OrbitModel,
    pub starfield_seed: u32,
    pub starfield_count: u32,
    pub selected: Option<BodyRef>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            draw_orbits: true,
            orbit_model: OrbitModel::Kepler,
            starfield_seed: 0x51a2,
            starfield_count: 400,
            selected: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DrawItem {
    Star,
    Planet(usize),
    Moon(usize, usize),
    Asteroid(usize),
    Station(usize),
    Ship(usize),
}

/// Owns the render-side caches that persist across frames.
#[derive(Debug)]
pub struct FrameRenderer {
    textures: TextureCache,
    star_cache: StarTextureCache,
    occlusion: OcclusionIndex,
    items: Vec<(f64, DrawItem)>,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(TEXTURE_WIDTH, TEXTURE_HEIGHT, STAR_REFRESH_INTERVAL)
    }
}

impl FrameRenderer {
    pub fn new(texture_width: usize, texture_height: usize, star_interval: f64) -> Self {
        Self {
            textures: TextureCache::with_resolution(texture_width, texture_height),
            star_cache: StarTextureCache::new(star_interval),
            occlusion: OcclusionIndex::new(),
            items: Vec::new(),
        }
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn occlusion(&self) -> &OcclusionIndex {
        &self.occlusion
    }

    /// Keep only textures used by `system`.
    pub fn retain_system(&mut self, system: &StarSystem) {
        let keys: Vec<(u32, TextureKind)> = system
            .planets
            .iter()
            .flat_map(|p| {
                std::iter::once((p.seed, p.texture)).chain(p.moons.iter().map(|m| (m.seed, m.texture)))
            })
            .collect();
        self.textures.retain_keys(&keys);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        system: &StarSystem,
        camera: &Camera,
        style: &RenderStyle,
        sim_time: f64,
        frame_dt: f64,
        options: &FrameOptions,
    ) {
        surface.clear(Color::BLACK);
        draw_starfield(surface, camera, style, options.starfield_seed, options.starfield_count);

        for cloud in system.nebulae.iter().filter(|c| !c.dark) {
            shade_nebula(surface, camera, style, cloud);
        }

        if options.draw_orbits {
            for planet in &system.planets {
                let path = planet.orbit.sample_path(ORBIT_PATH_SAMPLES, options.orbit_model);
                draw_path(surface, camera, style, &path, ORBIT_PATH_COLOR);
            }
        }

        self.occlusion.rebuild(system, camera);
        self.collect_items(system);

        let squash = camera.current.squash;
        let light_color = light_color(system);
        let Self { textures, star_cache, occlusion, items } = self;

        for &(_, item) in items.iter() {
            match item {
                DrawItem::Star => {
                    let center = camera.world_to_screen_f(0.0, 0.0);
                    let radius = camera.scale(system.star_radius);
                    let corona = camera.scale(system.corona_radius);
                    if !camera.is_disc_visible(center, corona.max(radius)) {
                        continue;
                    }
                    if system.kind == SystemKind::BlackHole {
                        let bh = BlackHoleShade {
                            center,
                            radius,
                            disk_radius: corona,
                            squash: squash as f32,
                            time: sim_time,
                            seed: system.seed,
                            color: system.star_color,
                        };
                        shade_black_hole(surface, style, &bh);
                    } else {
                        let texture = star_cache.get(system.seed, system.star_color, sim_time, frame_dt);
                        let star = StarShade {
                            center,
                            radius,
                            corona_radius: corona,
                            color: system.star_color,
                            texture,
                        };
                        shade_star(surface, style, &star);
                    }
                }
                DrawItem::Planet(pi) => {
                    let planet = &system.planets[pi];
                    let center = camera.world_to_screen_f(planet.wx, planet.wy);
                    let radius = camera.scale(planet.radius).max(0.5);
                    let reach = planet.ring.as_ref().map(|r| r.outer_mul).unwrap_or(1.0);
                    if !camera.is_disc_visible(center, radius * reach) {
                        continue;
                    }
                    let light = light_direction(planet.position(), DVec2::ZERO, squash);
                    let ring = planet.ring.as_ref().map(|params| RingShade {
                        body: BodyRef::planet(pi),
                        params,
                        center,
                        radius,
                        depth: planet.wz,
                        light,
                        light_color,
                    });
                    if let Some(ring) = &ring {
                        shade_ring(surface, occlusion, style, ring, RingLayer::Back);
                    }
                    let shade = SphereShade {
                        body: BodyRef::planet(pi),
                        center,
                        radius,
                        depth: planet.wz,
                        spin_turns: spin_turns(sim_time, planet.spin_speed),
                        axis_tilt: planet.axis_tilt as f32,
                        light,
                        light_color,
                        texture: textures.get(planet.seed, planet.texture),
                        emissive_strength: planet.texture.emissive_strength(),
                        ring: planet.ring.as_ref(),
                    };
                    shade_sphere(surface, occlusion, style, &shade);
                    if let Some(ring) = &ring {
                        shade_ring(surface, occlusion, style, ring, RingLayer::Front);
                    }
                }
                DrawItem::Moon(pi, mi) => {
                    let moon = &system.planets[pi].moons[mi];
                    let center = camera.world_to_screen_f(moon.wx, moon.wy);
                    let radius = camera.scale(moon.radius).max(0.5);
                    if !camera.is_disc_visible(center, radius) {
                        continue;
                    }
                    let shade = SphereShade {
                        body: BodyRef::moon(pi, mi),
                        center,
                        radius,
                        depth: moon.wz,
                        spin_turns: spin_turns(sim_time, moon.spin_speed),
                        axis_tilt: moon.axis_tilt as f32,
                        light: light_direction(moon.position(), DVec2::ZERO, squash),
                        light_color,
                        texture: textures.get(moon.seed, moon.texture),
                        emissive_strength: moon.texture.emissive_strength(),
                        ring: None,
                    };
                    shade_sphere(surface, occlusion, style, &shade);
                }
                DrawItem::Asteroid(ai) => {
                    draw_asteroid(surface, camera, style, &system.asteroids[ai], 0.7);
                }
                DrawItem::Station(si) => draw_station(surface, camera, style, &system.stations[si]),
                DrawItem::Ship(si) => draw_ship(surface, camera, style, &system.ships[si]),
            }
        }

        for cloud in system.nebulae.iter().filter(|c| c.dark) {
            shade_nebula(surface, camera, style, cloud);
        }

        if let Some(entity) = options.selected.and_then(|b| system.resolve(b)) {
            let p = entity.position();
            let center = camera.world_to_screen_f(p.x, p.y);
            let radius = camera.scale(entity.radius()).max(3.0) + 4.0;
            draw_ring_outline(surface, center, radius, style.output(SELECTION_COLOR));
        }
    }

    /// Fill the draw list, sorted far to near (higher depth first).
    fn collect_items(&mut self, system: &StarSystem) {
        let items = &mut self.items;
        items.clear();
        if system.has_star || system.kind == SystemKind::BlackHole {
            items.push((0.0, DrawItem::Star));
        }
        for (pi, planet) in system.planets.iter().enumerate() {
            items.push((planet.wz, DrawItem::Planet(pi)));
            for (mi, moon) in planet.moons.iter().enumerate() {
                items.push((moon.wz, DrawItem::Moon(pi, mi)));
            }
        }
        items.extend(system.asteroids.iter().enumerate().map(|(i, a)| (a.wz, DrawItem::Asteroid(i))));
        items.extend(system.stations.iter().enumerate().map(|(i, s)| (s.wz, DrawItem::Station(i))));
        items.extend(system.ships.iter().enumerate().map(|(i, s)| (-s.pos.y, DrawItem::Ship(i))));
        items.sort_by(|a, b| b.0.total_cmp(&a.0));
    }
}

/// Color of the light falling on bodies in `system`.
fn light_color(system: &StarSystem) -> Color {
    if system.has_star {
        Color::WHITE.lerp(system.star_color, 0.35)
    } else if system.kind == SystemKind::BlackHole {
        system.star_color.scale(0.6)
    } else {
        Color::new(0.5, 0.52, 0.58)
    }
}
