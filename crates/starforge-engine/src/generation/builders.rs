//! Per-kind content builders.
//!
//! Each builder consumes one [`Rng`] seeded from the system seed, so a system's
//! content is a pure function of `(kind, seed)`. Draw order matters: changing
//! it changes every universe.

use std::f64::consts::TAU;

use glam::DVec2;

use super::names;
use crate::components::{
    Asteroid, BodyRef, Color, Moon, NebulaCloud, Planet, RingParams, Ship, ShipOrder, StarSystem,
    Station, SystemKind, TextureKind,
};
use crate::core::hash::derive_seed;
use crate::core::orbit::{period_for, OrbitModel, OrbitalElements};
use crate::core::rng::Rng;
use crate::systems::simulation::update_positions;

/// Period scale for planets: `period = PLANET_PERIOD_SCALE · a^1.5` seconds.
pub const PLANET_PERIOD_SCALE: f64 = 1.6;
/// Period scale for moons and stations around their planet.
pub const LOCAL_PERIOD_SCALE: f64 = 2.2;
/// Period scale for free-floating debris.
pub const DEBRIS_PERIOD_SCALE: f64 = 2.4;
/// Hard cap on moons per planet.
pub const MAX_MOONS: u32 = 8;
pub const MIN_PLANETS: u32 = 4;
pub const MAX_PLANETS: u32 = 12;
/// Largest planet apoapsis. Keeps every system framable at minimum zoom.
pub const MAX_ORBIT_RADIUS: f64 = 220.0;

const ROCK_COLOR: Color = Color::new(0.55, 0.5, 0.46);
const DEBRIS_COLOR: Color = Color::new(0.62, 0.52, 0.42);
const DARK_CLOUD_COLOR: Color = Color::new(0.05, 0.04, 0.07);
const EMISSION_PALETTE: [Color; 5] = [
    Color::new(0.85, 0.3, 0.62),
    Color::new(0.22, 0.68, 0.82),
    Color::new(0.9, 0.28, 0.22),
    Color::new(0.35, 0.45, 0.95),
    Color::new(0.55, 0.85, 0.45),
];

/// Visual parameters of the central star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarStyle {
    pub has_star: bool,
    pub color: Color,
    pub radius: f64,
    pub corona_radius: f64,
}

/// Spectral classes with pick weight, color and base radius.
const SPECTRAL_CLASSES: [(u32, Color, f64); 7] = [
    (1, Color::new(0.62, 0.72, 1.0), 2.2),
    (2, Color::new(0.72, 0.8, 1.0), 1.8),
    (4, Color::new(0.9, 0.92, 1.0), 1.5),
    (8, Color::new(1.0, 0.97, 0.88), 1.25),
    (12, Color::new(1.0, 0.9, 0.68), 1.0),
    (16, Color::new(1.0, 0.74, 0.45), 0.85),
    (24, Color::new(1.0, 0.55, 0.35), 0.65),
];

/// Pick the star body for a system kind. Uses its own derived seed so the
/// header can be built without populating content.
pub fn star_style(kind: SystemKind, seed: u32) -> StarStyle {
    let mut rng = Rng::new(derive_seed(seed, 0x5747));
    match kind {
        SystemKind::NormalStar | SystemKind::DebrisDisk | SystemKind::Nebula => {
            let total: u32 = SPECTRAL_CLASSES.iter().map(|c| c.0).sum();
            let mut roll = rng.range_u32(0, total - 1);
            let mut pick = SPECTRAL_CLASSES[SPECTRAL_CLASSES.len() - 1];
            for class in SPECTRAL_CLASSES {
                if roll < class.0 {
                    pick = class;
                    break;
                }
                roll -= class.0;
            }
            let radius = pick.2 * rng.range_f64(0.85, 1.15);
            let dim = if kind == SystemKind::Nebula { 0.8 } else { 1.0 };
            StarStyle {
                has_star: true,
                color: pick.1.scale(dim),
                radius,
                corona_radius: radius * rng.range_f64(1.6, 2.6),
            }
        }
        SystemKind::Protostar => {
            let radius = rng.range_f64(1.3, 1.9);
            StarStyle {
                has_star: true,
                color: Color::new(1.0, 0.62, 0.3),
                radius,
                corona_radius: radius * rng.range_f64(3.0, 4.2),
            }
        }
        SystemKind::BrownDwarf => {
            let radius = rng.range_f64(0.45, 0.65);
            StarStyle {
                has_star: true,
                color: Color::new(0.7, 0.3, 0.22),
                radius,
                corona_radius: radius * rng.range_f64(1.3, 1.6),
            }
        }
        SystemKind::NeutronStar | SystemKind::SupernovaRemnant => {
            let radius = rng.range_f64(0.18, 0.3);
            StarStyle {
                has_star: true,
                color: Color::new(0.78, 0.88, 1.0),
                radius,
                corona_radius: radius * rng.range_f64(6.0, 9.0),
            }
        }
        SystemKind::BlackHole => {
            // No star body; radius is the shadow, corona the accretion disk.
            let radius = rng.range_f64(0.9, 1.4);
            StarStyle {
                has_star: false,
                color: Color::new(1.0, 0.7, 0.4),
                radius,
                corona_radius: radius * 4.5,
            }
        }
        SystemKind::AsteroidField | SystemKind::DarkNebula => StarStyle {
            has_star: false,
            color: Color::BLACK,
            radius: 0.0,
            corona_radius: 0.0,
        },
    }
}

/// Build all bodies for a system and place them at t = 0. No-op if already built.
pub fn populate(system: &mut StarSystem) {
    if system.populated {
        return;
    }
    let mut rng = Rng::new(derive_seed(system.seed, 0xc0de));
    match system.kind {
        SystemKind::NormalStar => build_normal(system, &mut rng),
        SystemKind::AsteroidField => build_asteroid_field(system, &mut rng),
        SystemKind::Nebula => build_nebula(system, &mut rng),
        SystemKind::DebrisDisk => build_debris_disk(system, &mut rng),
        SystemKind::Protostar => build_protostar(system, &mut rng),
        SystemKind::BrownDwarf => build_brown_dwarf(system, &mut rng),
        SystemKind::NeutronStar => build_neutron_star(system, &mut rng),
        SystemKind::BlackHole => build_black_hole(system, &mut rng),
        SystemKind::SupernovaRemnant => build_supernova_remnant(system, &mut rng),
        SystemKind::DarkNebula => build_dark_nebula(system, &mut rng),
    }
    system.populated = true;
    update_positions(system, 0.0, OrbitModel::Kepler);
    log::debug!(
        "populated {} ({}): {} planets, {} moons, {} asteroids, {} clouds",
        system.name,
        system.kind.label(),
        system.planets.len(),
        system.moon_count(),
        system.asteroids.len(),
        system.nebulae.len()
    );
}

/// Weighted pick from the fixed texture pool, conditioned on body class.
pub fn pick_texture(rng: &mut Rng, is_gas: bool, cold_zone: bool) -> TextureKind {
    use TextureKind::*;
    let pool: &[(TextureKind, u32)] = match (is_gas, cold_zone) {
        (true, true) => &[(IceGiant, 4), (GasBands, 3), (GasStorm, 2)],
        (true, false) => &[(GasBands, 5), (GasStorm, 3), (IceGiant, 1)],
        (false, true) => &[(Ice, 5), (Barren, 3), (Rocky, 2), (Ocean, 1)],
        (false, false) => &[
            (Rocky, 4),
            (Desert, 3),
            (Terran, 2),
            (Ocean, 2),
            (Lava, 2),
            (Toxic, 2),
            (Barren, 1),
        ],
    };
    weighted(rng, pool)
}

fn pick_moon_texture(rng: &mut Rng, cold_zone: bool) -> TextureKind {
    use TextureKind::*;
    let ice = if cold_zone { 4 } else { 1 };
    weighted(rng, &[(Barren, 4), (Rocky, 2), (Ice, ice), (Lava, 1)])
}

fn weighted<T: Copy>(rng: &mut Rng, pool: &[(T, u32)]) -> T {
    let total: u32 = pool.iter().map(|p| p.1).sum();
    let mut roll = rng.range_u32(0, total.saturating_sub(1));
    for &(item, w) in pool {
        if roll < w {
            return item;
        }
        roll -= w;
    }
    pool[pool.len() - 1].0
}

/// Parameters for a run of planets built outward from `a_start`.
struct PlanetRun {
    count: u32,
    a_start: f64,
    spacing: (f64, f64),
    max_e: f64,
    /// Cold-zone boundary (semi-major axis).
    snow_line: f64,
    allow_gas: bool,
}

/// Semi-major axes for a run: multiplicative spacing plus a gap. When the
/// outermost apoapsis would pass `MAX_ORBIT_RADIUS` the ratios are
/// compressed geometrically, so order and relative spacing survive.
fn orbit_axes(rng: &mut Rng, run: &PlanetRun) -> Vec<f64> {
    let mut axes = Vec::with_capacity(run.count as usize);
    let mut a = run.a_start;
    for _ in 0..run.count {
        axes.push(a);
        a = a * rng.range_f64(run.spacing.0, run.spacing.1) + rng.range_f64(0.4, 1.2);
    }
    let (first, last) = match (axes.first(), axes.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return axes,
    };
    let limit = MAX_ORBIT_RADIUS / (1.0 + run.max_e);
    if last <= limit {
        return axes;
    }
    if first < limit {
        let k = (limit / first).ln() / (last / first).ln();
        for a in &mut axes {
            *a = first * (*a / first).powf(k);
        }
    } else {
        let scale = limit / last;
        for a in &mut axes {
            *a *= scale;
        }
    }
    axes
}

fn build_planets(system: &mut StarSystem, rng: &mut Rng, run: PlanetRun) {
    let axes = orbit_axes(rng, &run);
    for (i, &a) in axes.iter().enumerate() {
        let i = i as u32;
        let index = system.planets.len();
        let seed = derive_seed(system.seed, 100 + index as u32);
        let cold_zone = a > run.snow_line;
        let outward = i as f64 / run.count.max(1) as f64;
        let p_gas = if cold_zone { 0.65 } else { 0.15 + 0.1 * outward };
        let is_gas = run.allow_gas && rng.chance(p_gas);
        let texture = pick_texture(rng, is_gas, cold_zone);

        let radius = if is_gas { rng.range_f64(0.8, 1.6) } else { rng.range_f64(0.25, 0.6) };
        let e = rng.range_f64(0.0, run.max_e);
        let omega = rng.angle();
        let m0 = rng.angle();
        let spin_speed = if is_gas { rng.range_f64(0.6, 1.5) } else { rng.range_f64(0.2, 0.9) };
        let axis_tilt = rng.range_f64(-0.5, 0.5);

        let ring_chance = match (is_gas, texture) {
            (true, TextureKind::IceGiant) => 0.30,
            (true, _) => 0.45,
            _ => 0.05,
        };
        let ring = if rng.chance(ring_chance) { Some(RingParams::from_seed(seed)) } else { None };

        let base_moons = if is_gas { rng.range_u32(2, 8) } else { rng.range_u32(0, 2) };
        let moon_count = (base_moons + u32::from(cold_zone)).min(MAX_MOONS);
        let moons = build_moons(rng, seed, radius, moon_count, cold_zone, ring.as_ref());

        system.planets.push(Planet {
            seed,
            name: names::planet_name(&system.name, index),
            orbit: OrbitalElements::new(a, e, omega, period_for(a, PLANET_PERIOD_SCALE), m0),
            radius,
            spin_speed,
            axis_tilt,
            ring,
            texture,
            is_gas,
            cold_zone,
            moons,
            wx: 0.0,
            wy: 0.0,
            wz: 0.0,
        });
    }
}

fn build_moons(
    rng: &mut Rng,
    planet_seed: u32,
    planet_radius: f64,
    count: u32,
    cold_zone: bool,
    ring: Option<&RingParams>,
) -> Vec<Moon> {
    // Moons start outside the ring system if there is one.
    let clearance = ring.map(|r| r.outer_mul as f64).unwrap_or(1.0).max(1.0);
    let mut local_radius = planet_radius * (clearance + rng.range_f64(0.8, 1.4));
    (0..count)
        .map(|mi| {
            let radius = (planet_radius * rng.range_f64(0.12, 0.32)).min(0.35);
            let retrograde = rng.chance(0.1);
            let period = period_for(local_radius, LOCAL_PERIOD_SCALE);
            let moon = Moon {
                seed: derive_seed(planet_seed, 1 + mi),
                local_radius,
                local_period: if retrograde { -period } else { period },
                phase: rng.angle(),
                radius,
                spin_speed: rng.range_f64(0.1, 0.6),
                axis_tilt: rng.range_f64(-0.3, 0.3),
                texture: pick_moon_texture(rng, cold_zone),
                wx: 0.0,
                wy: 0.0,
                wz: 0.0,
            };
            local_radius += radius * 2.0 + planet_radius * rng.range_f64(0.5, 0.9);
            moon
        })
        .collect()
}

fn add_stations(system: &mut StarSystem, rng: &mut Rng, count: u32) {
    if system.planets.is_empty() {
        return;
    }
    for si in 0..count {
        let planet = rng.range_u32(0, system.planets.len() as u32 - 1) as usize;
        let anchor = &system.planets[planet];
        let local_radius = anchor.radius * 2.6 + 0.6;
        system.stations.push(Station {
            name: names::station_name(&anchor.name, si as usize),
            planet,
            local_radius,
            local_period: period_for(local_radius, LOCAL_PERIOD_SCALE),
            phase: rng.angle(),
            wx: 0.0,
            wy: 0.0,
            wz: 0.0,
        });
    }
}

fn add_ships(system: &mut StarSystem, rng: &mut Rng, count: u32) {
    let extent = system
        .planets
        .iter()
        .map(|p| p.orbit.a)
        .fold(system.corona_radius.max(6.0), f64::max);
    for _ in 0..count {
        let angle = rng.angle();
        let r = rng.range_f64(0.3, 0.9) * extent;
        let pos = DVec2::new(r * angle.cos(), r * angle.sin());
        let mut ship = Ship::new(names::ship_name(rng), pos, rng.range_f64(1.5, 3.0), rng.range_f64(2.0, 4.0));
        if !system.planets.is_empty() && rng.chance(0.6) {
            let target = rng.range_u32(0, system.planets.len() as u32 - 1) as usize;
            let radius = system.planets[target].radius * 3.0 + 0.5;
            ship.apply_order(ShipOrder::Orbit { target: BodyRef::planet(target), radius });
        }
        system.ships.push(ship);
    }
}

/// A band of rocks between `r_min` and `r_max`. `speed` scales the Kepler
/// angular rate (0 gives a frozen field).
fn add_rocks(
    system: &mut StarSystem,
    rng: &mut Rng,
    count: u32,
    r_min: f64,
    r_max: f64,
    speed: f64,
    color: Color,
) {
    for _ in 0..count {
        let r = rng.range_f64(r_min, r_max.max(r_min + 0.1));
        let direction = if speed < 0.0 { -1.0 } else { 1.0 };
        let rate = TAU / period_for(r, DEBRIS_PERIOD_SCALE) * speed.abs() * rng.range_f64(0.9, 1.1);
        system.asteroids.push(Asteroid {
            orbit_radius: r,
            angle0: rng.angle(),
            angular_speed: rate * direction,
            flatten: rng.range_f64(0.96, 1.0),
            radius: rng.range_f64(0.03, 0.12),
            shade: rng.range_f32(0.55, 1.0),
            color,
            wx: 0.0,
            wy: 0.0,
            wz: 0.0,
        });
    }
}

fn add_clouds(
    system: &mut StarSystem,
    rng: &mut Rng,
    count: u32,
    spread: f64,
    radius: (f64, f64),
    dark: bool,
) {
    for ci in 0..count {
        let angle = rng.angle();
        let r = spread * rng.next_f64().sqrt();
        let color = if dark {
            DARK_CLOUD_COLOR
        } else {
            EMISSION_PALETTE[rng.range_u32(0, EMISSION_PALETTE.len() as u32 - 1) as usize]
        };
        system.nebulae.push(NebulaCloud {
            wx: r * angle.cos(),
            wy: r * angle.sin(),
            radius: rng.range_f64(radius.0, radius.1),
            density: if dark { rng.range_f32(0.6, 0.9) } else { rng.range_f32(0.25, 0.55) },
            color,
            noise_seed: derive_seed(system.seed, 500 + ci),
            dark,
        });
    }
}

fn standard_run(system: &StarSystem, rng: &mut Rng, count: u32) -> PlanetRun {
    let r = system.star_radius.max(0.5);
    PlanetRun {
        count,
        a_start: r * rng.range_f64(3.0, 4.5) + 1.5,
        spacing: (1.35, 1.85),
        max_e: 0.22,
        snow_line: r * rng.range_f64(9.0, 16.0),
        allow_gas: true,
    }
}

fn build_normal(system: &mut StarSystem, rng: &mut Rng) {
    let count = rng.range_u32(MIN_PLANETS, MAX_PLANETS);
    let run = standard_run(system, rng, count);
    build_planets(system, rng, run);

    // Optional main belt in a wide gap between two planets.
    let n = system.planets.len();
    if n >= 4 && rng.chance(0.55) {
        let k = rng.range_u32(1, n as u32 - 3) as usize;
        let inner = system.planets[k].orbit.a * 1.15;
        let outer = system.planets[k + 1].orbit.a * 0.85;
        if outer > inner + 0.5 {
            let count = rng.range_u32(60, 120);
            add_rocks(system, rng, count, inner, outer, 1.0, ROCK_COLOR);
        }
    }
    let stations = rng.range_u32(0, 2);
    add_stations(system, rng, stations);
    let ships = rng.range_u32(1, 3);
    add_ships(system, rng, ships);
}

fn build_asteroid_field(system: &mut StarSystem, rng: &mut Rng) {
    let count = rng.range_u32(160, 260);
    add_rocks(system, rng, count, 1.0, 28.0, 0.05, ROCK_COLOR);
    let planets = rng.range_u32(1, 2);
    let run = PlanetRun {
        count: planets,
        a_start: rng.range_f64(8.0, 14.0),
        spacing: (1.4, 1.8),
        max_e: 0.3,
        snow_line: f64::MAX,
        allow_gas: false,
    };
    build_planets(system, rng, run);
    let ships = rng.range_u32(1, 3);
    add_ships(system, rng, ships);
}

fn build_nebula(system: &mut StarSystem, rng: &mut Rng) {
    let clouds = rng.range_u32(5, 9);
    add_clouds(system, rng, clouds, 24.0, (6.0, 14.0), false);
    let count = rng.range_u32(1, 4);
    let run = standard_run(system, rng, count);
    build_planets(system, rng, run);
    let ships = rng.range_u32(0, 2);
    add_ships(system, rng, ships);
}

fn build_debris_disk(system: &mut StarSystem, rng: &mut Rng) {
    let r = system.star_radius.max(0.5);
    let inner = r * 3.0;
    let outer = r * rng.range_f64(9.0, 13.0);
    let rocks = rng.range_u32(200, 320);
    add_rocks(system, rng, rocks, inner, outer, 1.0, DEBRIS_COLOR);
    let count = rng.range_u32(1, 3);
    let run = PlanetRun {
        count,
        a_start: outer * 1.3,
        spacing: (1.3, 1.6),
        max_e: 0.15,
        snow_line: outer * 1.5,
        allow_gas: true,
    };
    build_planets(system, rng, run);
    let ships = rng.range_u32(0, 2);
    add_ships(system, rng, ships);
}

fn build_protostar(system: &mut StarSystem, rng: &mut Rng) {
    let r = system.star_radius.max(0.5);
    let clouds = rng.range_u32(6, 10);
    add_clouds(system, rng, clouds, r * 10.0, (4.0, 9.0), false);
    let rocks = rng.range_u32(80, 140);
    add_rocks(system, rng, rocks, r * 4.0, r * 9.0, 1.2, DEBRIS_COLOR);
}

fn build_brown_dwarf(system: &mut StarSystem, rng: &mut Rng) {
    let count = rng.range_u32(1, 4);
    let run = PlanetRun {
        count,
        a_start: rng.range_f64(2.0, 3.0),
        spacing: (1.3, 1.5),
        max_e: 0.1,
        snow_line: rng.range_f64(4.0, 6.0),
        allow_gas: false,
    };
    build_planets(system, rng, run);
    let ships = rng.range_u32(0, 1);
    add_ships(system, rng, ships);
}

fn build_neutron_star(system: &mut StarSystem, rng: &mut Rng) {
    let count = rng.range_u32(0, 2);
    if count > 0 {
        let run = PlanetRun {
            count,
            a_start: rng.range_f64(5.0, 8.0),
            spacing: (1.4, 1.8),
            max_e: 0.3,
            snow_line: 0.0,
            allow_gas: false,
        };
        build_planets(system, rng, run);
    }
    let ships = rng.range_u32(0, 1);
    add_ships(system, rng, ships);
}

fn build_black_hole(system: &mut StarSystem, rng: &mut Rng) {
    let horizon = system.star_radius.max(0.5);
    let rocks = rng.range_u32(180, 260);
    add_rocks(system, rng, rocks, horizon * 5.0, horizon * 8.0, 3.0, DEBRIS_COLOR);
    let clouds = rng.range_u32(2, 4);
    add_clouds(system, rng, clouds, 30.0, (5.0, 10.0), true);
    let count = rng.range_u32(0, 2);
    if count > 0 {
        let run = PlanetRun {
            count,
            a_start: horizon * rng.range_f64(14.0, 20.0),
            spacing: (1.3, 1.6),
            max_e: 0.35,
            snow_line: 0.0,
            allow_gas: true,
        };
        build_planets(system, rng, run);
    }
    let ships = rng.range_u32(0, 1);
    add_ships(system, rng, ships);
}

fn build_supernova_remnant(system: &mut StarSystem, rng: &mut Rng) {
    // Shell of clouds on a ring around the remnant.
    let shell = rng.range_f64(14.0, 20.0);
    let clouds = rng.range_u32(6, 10);
    for ci in 0..clouds {
        let angle = TAU * ci as f64 / clouds as f64 + rng.range_f64(-0.2, 0.2);
        let r = shell * rng.range_f64(0.85, 1.15);
        system.nebulae.push(NebulaCloud {
            wx: r * angle.cos(),
            wy: r * angle.sin(),
            radius: rng.range_f64(5.0, 9.0),
            density: rng.range_f32(0.3, 0.6),
            color: EMISSION_PALETTE[(ci as usize) % 3],
            noise_seed: derive_seed(system.seed, 500 + ci),
            dark: false,
        });
    }
    let rocks = rng.range_u32(60, 120);
    add_rocks(system, rng, rocks, 3.0, shell * 0.7, 0.6, DEBRIS_COLOR);
}

fn build_dark_nebula(system: &mut StarSystem, rng: &mut Rng) {
    let clouds = rng.range_u32(4, 7);
    add_clouds(system, rng, clouds, 20.0, (7.0, 13.0), true);
    let rocks = rng.range_u32(10, 40);
    add_rocks(system, rng, rocks, 2.0, 20.0, 0.05, ROCK_COLOR);
}
