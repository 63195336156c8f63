use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::BodyRef;

/// What a ship is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShipMode {
    #[default]
    Idle,
    TravelToPoint,
    Orbit,
}

/// An order issued to a ship from outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShipOrder {
    Idle,
    TravelTo { x: f64, y: f64 },
    Orbit { target: BodyRef, radius: f64 },
}

/// Distance at which a travelling ship counts as arrived.
pub const ARRIVE_RADIUS: f64 = 0.05;

/// A free-moving ship integrated with simple steering.
#[derive(Debug, Clone)]
pub struct Ship {
    pub name: String,
    pub pos: DVec2,
    pub vel: DVec2,
    pub mode: ShipMode,
    /// Last commanded point; held when an orbit target disappears.
    pub target_point: DVec2,
    pub orbit_target: Option<BodyRef>,
    pub orbit_radius: f64,
    pub orbit_angle: f64,
    /// Angular speed around an orbit target (radians per second).
    pub orbit_rate: f64,
    pub max_speed: f64,
    pub accel: f64,
}

impl Ship {
    pub fn new(name: impl Into<String>, pos: DVec2, max_speed: f64, accel: f64) -> Self {
        Self {
            name: name.into(),
            pos,
            vel: DVec2::ZERO,
            mode: ShipMode::Idle,
            target_point: pos,
            orbit_target: None,
            orbit_radius: 0.5,
            orbit_angle: 0.0,
            orbit_rate: 0.6,
            max_speed: max_speed.max(1e-3),
            accel: accel.max(1e-3),
        }
    }

    pub fn apply_order(&mut self, order: ShipOrder) {
        match order {
            ShipOrder::Idle => {
                self.mode = ShipMode::Idle;
                self.orbit_target = None;
                self.target_point = self.pos;
            }
            ShipOrder::TravelTo { x, y } => {
                self.mode = ShipMode::TravelToPoint;
                self.orbit_target = None;
                self.target_point = DVec2::new(x, y);
            }
            ShipOrder::Orbit { target, radius } => {
                self.mode = ShipMode::Orbit;
                self.orbit_target = Some(target);
                self.orbit_radius = radius.max(0.05);
            }
        }
    }

    /// Target lost: hold the last commanded point.
    pub fn hold_last_point(&mut self) {
        self.mode = ShipMode::TravelToPoint;
        self.orbit_target = None;
    }

    /// Accelerate toward `goal`, braking on approach, capped at `max_speed`.
    pub fn steer_toward(&mut self, goal: DVec2, goal_vel: DVec2, dt: f64) {
        let to_goal = goal - self.pos;
        let dist = to_goal.length();
        // Speed that still allows stopping within `dist`.
        let brake_speed = (2.0 * self.accel * dist).sqrt();
        let desired_speed = self.max_speed.min(brake_speed);
        let desired = if dist > 1e-9 {
            to_goal / dist * desired_speed + goal_vel
        } else {
            goal_vel
        };
        let dv = desired - self.vel;
        let max_dv = self.accel * dt;
        let dv_len = dv.length();
        let dv = if dv_len > max_dv { dv * (max_dv / dv_len) } else { dv };
        self.vel += dv;
        let speed = self.vel.length();
        let cap = self.max_speed + goal_vel.length();
        if speed > cap {
            self.vel *= cap / speed;
        }
        self.pos += self.vel * dt;
    }

    /// Damp velocity toward zero.
    pub fn coast(&mut self, dt: f64) {
        let speed = self.vel.length();
        if speed < 1e-9 {
            self.vel = DVec2::ZERO;
            return;
        }
        let drop = (self.accel * dt).min(speed);
        self.vel *= (speed - drop) / speed;
        self.pos += self.vel * dt;
    }

    pub fn heading(&self) -> f64 {
        if self.vel.length_squared() < 1e-12 {
            let d = self.target_point - self.pos;
            return d.y.atan2(d.x);
        }
        self.vel.y.atan2(self.vel.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steering_reaches_goal() {
        let mut ship = Ship::new("t", DVec2::ZERO, 2.0, 4.0);
        let goal = DVec2::new(5.0, 0.0);
        for _ in 0..600 {
            ship.steer_toward(goal, DVec2::ZERO, 1.0 / 60.0);
        }
        assert!((ship.pos - goal).length() < 0.1, "pos = {:?}", ship.pos);
        assert!(ship.vel.length() <= ship.max_speed + 1e-9);
    }

    #[test]
    fn orders_switch_modes() {
        let mut ship = Ship::new("t", DVec2::ZERO, 1.0, 1.0);
        ship.apply_order(ShipOrder::TravelTo { x: 1.0, y: 2.0 });
        assert_eq!(ship.mode, ShipMode::TravelToPoint);
        assert_eq!(ship.target_point, DVec2::new(1.0, 2.0));

        ship.apply_order(ShipOrder::Orbit { target: BodyRef::planet(0), radius: 0.0 });
        assert_eq!(ship.mode, ShipMode::Orbit);
        assert!(ship.orbit_radius >= 0.05);

        ship.hold_last_point();
        assert_eq!(ship.mode, ShipMode::TravelToPoint);
        assert_eq!(ship.target_point, DVec2::new(1.0, 2.0));
        assert!(ship.orbit_target.is_none());
    }

    #[test]
    fn coast_stops() {
        let mut ship = Ship::new("t", DVec2::ZERO, 1.0, 2.0);
        ship.vel = DVec2::new(1.0, 0.0);
        for _ in 0..60 {
            ship.coast(1.0 / 60.0);
        }
        assert!(ship.vel.length() < 1e-9);
    }
}
