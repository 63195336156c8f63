use glam::DVec2;

use super::builders::star_style;
use super::links::{build_links, neighbors_of, LINK_K};
use super::names;
use crate::components::{StarSystem, SystemKind};
use crate::core::hash::{derive_seed, hash01, hash01_f64};
use crate::core::rng::Rng;

/// Radius of the galaxy map disc.
pub const GALAXY_RADIUS: f64 = 600.0;
pub const MIN_SYSTEMS: usize = 1;
pub const MAX_SYSTEMS: usize = 4096;

/// Cumulative kind table, checked in order against one uniform draw.
const KIND_TABLE: [(f32, SystemKind); 9] = [
    (0.70, SystemKind::NormalStar),
    (0.80, SystemKind::AsteroidField),
    (0.88, SystemKind::Nebula),
    (0.92, SystemKind::DebrisDisk),
    (0.95, SystemKind::BrownDwarf),
    (0.97, SystemKind::Protostar),
    (0.985, SystemKind::NeutronStar),
    (0.993, SystemKind::BlackHole),
    (0.998, SystemKind::SupernovaRemnant),
];

/// Salts for the per-system header draws.
const SALT_POS_R: i32 = 1;
const SALT_POS_ANGLE: i32 = 2;
const SALT_KIND: i32 = 3;
const SALT_NAME: u32 = 0x4e41;

/// Map a uniform draw in [0, 1) to a system kind.
pub fn kind_from_roll(roll: f32) -> SystemKind {
    KIND_TABLE
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map(|(_, kind)| *kind)
        .unwrap_or(SystemKind::DarkNebula)
}

/// The whole universe: system headers plus the travel graph. Content of each
/// system is built lazily by [`Galaxy::ensure_populated`].
#[derive(Debug, Clone)]
pub struct Galaxy {
    root_seed: u32,
    systems: Vec<StarSystem>,
    links: Vec<(usize, usize)>,
    forced_black_hole: usize,
}

impl Galaxy {
    /// Build system headers and links. `count` is clamped to [1, 4096].
    pub fn generate(root_seed: u32, count: usize) -> Self {
        let count = count.clamp(MIN_SYSTEMS, MAX_SYSTEMS);
        let forced = ((hash01_f64(root_seed, -1, -1) * count as f64) as usize).min(count - 1);

        let systems: Vec<StarSystem> = (0..count)
            .map(|i| {
                let kind = if i == forced {
                    SystemKind::BlackHole
                } else {
                    kind_from_roll(hash01(root_seed, i as i32, SALT_KIND))
                };
                build_header(root_seed, i, kind)
            })
            .collect();

        let positions: Vec<DVec2> = systems.iter().map(|s| s.galactic_pos).collect();
        let links = build_links(&positions, LINK_K);

        log::info!(
            "galaxy {root_seed:#010x}: {count} systems, {} links, black hole at #{forced}",
            links.len()
        );

        Self { root_seed, systems, links, forced_black_hole: forced }
    }

    pub fn root_seed(&self) -> u32 {
        self.root_seed
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Never true; a galaxy always holds at least one system.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Index of the system forced to be a black hole.
    pub fn forced_black_hole(&self) -> usize {
        self.forced_black_hole
    }

    /// Clamp an index into range.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.systems.len() - 1)
    }

    /// System at `index`, clamped into range.
    pub fn system(&self, index: usize) -> &StarSystem {
        &self.systems[self.clamp_index(index)]
    }

    pub fn system_mut(&mut self, index: usize) -> &mut StarSystem {
        let index = self.clamp_index(index);
        &mut self.systems[index]
    }

    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        neighbors_of(&self.links, self.clamp_index(index))
    }

    /// Build the content of a system if it has not been built yet.
    /// Returns the clamped index.
    pub fn ensure_populated(&mut self, index: usize) -> usize {
        let index = self.clamp_index(index);
        self.systems[index].ensure_populated();
        index
    }

    /// Drop content of every system except `keep`. Used to bound memory on
    /// long sessions.
    pub fn evict_except(&mut self, keep: usize) {
        let keep = self.clamp_index(keep);
        for (i, system) in self.systems.iter_mut().enumerate() {
            if i != keep && system.is_populated() {
                system.clear_content();
            }
        }
    }
}

fn build_header(root_seed: u32, index: usize, kind: SystemKind) -> StarSystem {
    let seed = derive_seed(root_seed, index as u32);
    let r = GALAXY_RADIUS * hash01_f64(root_seed, index as i32, SALT_POS_R).sqrt();
    let angle = std::f64::consts::TAU * hash01_f64(root_seed, index as i32, SALT_POS_ANGLE);
    let style = star_style(kind, seed);
    StarSystem {
        seed,
        name: names::system_name(&mut Rng::new(derive_seed(seed, SALT_NAME))),
        galactic_pos: DVec2::new(r * angle.cos(), r * angle.sin()),
        kind,
        has_star: style.has_star,
        star_color: style.color,
        star_radius: style.radius,
        corona_radius: style.corona_radius,
        planets: Vec::new(),
        stations: Vec::new(),
        ships: Vec::new(),
        asteroids: Vec::new(),
        nebulae: Vec::new(),
        populated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = Galaxy::generate(42, 200);
        let b = Galaxy::generate(42, 200);
        assert_eq!(a.len(), 200);
        assert_eq!(a.links(), b.links());
        for (sa, sb) in a.systems().iter().zip(b.systems()) {
            assert_eq!(sa.seed, sb.seed);
            assert_eq!(sa.kind, sb.kind);
            assert_eq!(sa.name, sb.name);
            assert_eq!(sa.galactic_pos, sb.galactic_pos);
        }
    }

    #[test]
    fn populated_content_is_deterministic() {
        let mut a = Galaxy::generate(7, 50);
        let mut b = Galaxy::generate(7, 50);
        for i in 0..50 {
            a.ensure_populated(i);
            b.ensure_populated(i);
            let (sa, sb) = (a.system(i), b.system(i));
            assert_eq!(sa.planets.len(), sb.planets.len());
            assert_eq!(sa.asteroids.len(), sb.asteroids.len());
            for (pa, pb) in sa.planets.iter().zip(&sb.planets) {
                assert_eq!(pa.orbit, pb.orbit);
                assert_eq!(pa.wx, pb.wx);
                assert_eq!(pa.texture, pb.texture);
            }
        }
    }

    #[test]
    fn forced_black_hole_exists() {
        for seed in [0u32, 1, 99, 0xdead_beef, u32::MAX] {
            let g = Galaxy::generate(seed, 100);
            let f = g.forced_black_hole();
            assert!(f < 100);
            assert_eq!(g.system(f).kind, SystemKind::BlackHole);
            assert!(!g.system(f).has_star);
        }
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(Galaxy::generate(1, 0).len(), 1);
        assert_eq!(Galaxy::generate(1, 10_000).len(), MAX_SYSTEMS);
        let g = Galaxy::generate(1, 1);
        assert_eq!(g.forced_black_hole(), 0);
        assert!(g.links().is_empty());
    }

    #[test]
    fn positions_within_radius_and_index_clamps() {
        let g = Galaxy::generate(5, 64);
        for s in g.systems() {
            assert!(s.galactic_pos.length() <= GALAXY_RADIUS + 1e-9);
        }
        assert_eq!(g.system(1_000).seed, g.system(63).seed);
        assert!(!g.neighbors(0).is_empty());
    }

    #[test]
    fn kind_table_boundaries() {
        assert_eq!(kind_from_roll(0.0), SystemKind::NormalStar);
        assert_eq!(kind_from_roll(0.70), SystemKind::AsteroidField);
        assert_eq!(kind_from_roll(0.9925), SystemKind::BlackHole);
        assert_eq!(kind_from_roll(0.999), SystemKind::DarkNebula);
    }

    #[test]
    fn eviction_keeps_one() {
        let mut g = Galaxy::generate(3, 10);
        g.ensure_populated(2);
        g.ensure_populated(4);
        g.evict_except(4);
        assert!(!g.system(2).is_populated());
        assert!(g.system(4).is_populated());
    }
}
