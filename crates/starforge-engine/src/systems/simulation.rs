//! Per-tick body updates: derived positions from orbital elements, and ship
//! steering.

use glam::DVec2;

use crate::components::{ShipMode, StarSystem, ARRIVE_RADIUS};
use crate::core::orbit::OrbitModel;

/// Recompute every derived position for `time`. Pure in `(content, time)`.
pub fn update_positions(system: &mut StarSystem, time: f64, model: OrbitModel) {
    for planet in &mut system.planets {
        planet.update_position(time, model);
    }

    let last = system.planets.len().checked_sub(1);
    for station in &mut system.stations {
        // Out-of-range anchors clamp to the last planet; none parks at the origin.
        let anchor = match last {
            Some(last) => system.planets[station.planet.min(last)].position(),
            None => DVec2::ZERO,
        };
        station.update_position(anchor, time);
    }

    for asteroid in &mut system.asteroids {
        asteroid.update_position(time);
    }
}

/// Advance every ship by `dt` simulation seconds.
pub fn step_ships(system: &mut StarSystem, dt: f64) {
    if dt <= 0.0 {
        return;
    }
    // Resolve orbit targets before borrowing ships mutably.
    let targets: Vec<Option<DVec2>> = system
        .ships
        .iter()
        .map(|ship| ship.orbit_target.and_then(|t| system.position_of(t)))
        .collect();

    for (ship, target) in system.ships.iter_mut().zip(targets) {
        match ship.mode {
            ShipMode::Orbit => match target {
                Some(center) => {
                    ship.orbit_angle += ship.orbit_rate * dt;
                    let (s, c) = ship.orbit_angle.sin_cos();
                    let goal = center + DVec2::new(c, s) * ship.orbit_radius;
                    let goal_vel = DVec2::new(-s, c) * ship.orbit_radius * ship.orbit_rate;
                    ship.steer_toward(goal, goal_vel, dt);
                }
                None => {
                    log::debug!("{}: orbit target lost, holding position", ship.name);
                    ship.hold_last_point();
                    ship.steer_toward(ship.target_point, DVec2::ZERO, dt);
                }
            },
            ShipMode::TravelToPoint => {
                ship.steer_toward(ship.target_point, DVec2::ZERO, dt);
                if ship.pos.distance(ship.target_point) < ARRIVE_RADIUS
                    && ship.vel.length() < ship.accel * dt * 2.0
                {
                    ship.vel = DVec2::ZERO;
                    ship.mode = ShipMode::Idle;
                }
            }
            ShipMode::Idle => ship.coast(dt),
        }
    }
}

/// One fixed simulation step: positions at `time`, then ships over `step`.
pub fn tick(system: &mut StarSystem, time: f64, step: f64, model: OrbitModel) {
    update_positions(system, time, model);
    step_ships(system, step);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BodyRef, Ship, ShipOrder, SystemKind};
    use crate::generation::Galaxy;

    fn populated(kind: SystemKind) -> StarSystem {
        let mut g = Galaxy::generate(17, 400);
        let index = g
            .systems()
            .iter()
            .position(|s| s.kind == kind)
            .unwrap_or(g.forced_black_hole());
        g.ensure_populated(index);
        g.system(index).clone()
    }

    #[test]
    fn positions_are_pure_in_time() {
        let mut a = populated(SystemKind::NormalStar);
        let mut b = a.clone();
        update_positions(&mut a, 123.25, OrbitModel::Kepler);
        update_positions(&mut b, 50.0, OrbitModel::Kepler);
        update_positions(&mut b, 123.25, OrbitModel::Kepler);
        for (pa, pb) in a.planets.iter().zip(&b.planets) {
            assert_eq!(pa.wx, pb.wx);
            assert_eq!(pa.wy, pb.wy);
            for (ma, mb) in pa.moons.iter().zip(&pb.moons) {
                assert_eq!(ma.wx, mb.wx);
            }
        }
    }

    #[test]
    fn station_with_bad_anchor_is_clamped() {
        let mut sys = populated(SystemKind::NormalStar);
        if sys.stations.is_empty() {
            return;
        }
        sys.stations[0].planet = 999;
        update_positions(&mut sys, 1.0, OrbitModel::Kepler);
        let last = sys.planets.last().map(|p| p.position()).unwrap_or(DVec2::ZERO);
        let s = &sys.stations[0];
        assert!((s.position().distance(last) - s.local_radius).abs() < 1e-9);
    }

    #[test]
    fn ship_with_vanished_target_holds_last_point() {
        let mut sys = populated(SystemKind::NormalStar);
        let mut ship = Ship::new("x", DVec2::new(1.0, 1.0), 2.0, 3.0);
        ship.apply_order(ShipOrder::TravelTo { x: 4.0, y: 0.0 });
        ship.apply_order(ShipOrder::Orbit { target: BodyRef::planet(500), radius: 1.0 });
        sys.ships = vec![ship];
        step_ships(&mut sys, 1.0 / 60.0);
        let ship = &sys.ships[0];
        assert_eq!(ship.mode, ShipMode::TravelToPoint);
        assert_eq!(ship.target_point, DVec2::new(4.0, 0.0));
    }

    #[test]
    fn ship_orbits_live_target() {
        let mut sys = populated(SystemKind::NormalStar);
        update_positions(&mut sys, 0.0, OrbitModel::Kepler);
        let center = sys.planets[0].position();
        let mut ship = Ship::new("x", center + DVec2::new(1.0, 0.0), 4.0, 8.0);
        ship.apply_order(ShipOrder::Orbit { target: BodyRef::planet(0), radius: 1.0 });
        sys.ships = vec![ship];
        for _ in 0..600 {
            step_ships(&mut sys, 1.0 / 60.0);
        }
        let d = sys.ships[0].pos.distance(center);
        assert!(d > 0.5 && d < 1.5, "distance {d}");
        assert_eq!(sys.ships[0].mode, ShipMode::Orbit);
    }

    #[test]
    fn travelling_ship_arrives_and_idles() {
        let mut sys = populated(SystemKind::AsteroidField);
        let mut ship = Ship::new("x", DVec2::ZERO, 2.0, 4.0);
        ship.apply_order(ShipOrder::TravelTo { x: 3.0, y: 0.0 });
        sys.ships = vec![ship];
        for _ in 0..900 {
            step_ships(&mut sys, 1.0 / 60.0);
        }
        assert_eq!(sys.ships[0].mode, ShipMode::Idle);
        assert!(sys.ships[0].pos.distance(DVec2::new(3.0, 0.0)) < 0.1);
    }

    #[test]
    fn debris_ring_moves() {
        let mut sys = populated(SystemKind::BlackHole);
        update_positions(&mut sys, 0.0, OrbitModel::Kepler);
        let before = sys.asteroids[0].position();
        update_positions(&mut sys, 5.0, OrbitModel::Kepler);
        assert_ne!(before, sys.asteroids[0].position());
    }
}
