use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::api::config::EngineConfig;
use crate::components::{BodyRef, ShipOrder, StarSystem};
use crate::core::orbit::OrbitModel;
use crate::core::time::SimulationClock;
use crate::generation::Galaxy;
use crate::input::queue::{ControlEvent, InputQueue};
use crate::renderer::camera::{Camera, CameraState};
use crate::renderer::frame::{FrameOptions, FrameRenderer};
use crate::renderer::style::RenderStyle;
use crate::renderer::surface::RenderSurface;
use crate::systems::simulation;

/// Screen radius under which a click still picks a tiny body.
const PICK_RADIUS_PX: f32 = 6.0;
/// Share of the shorter viewport side the system extent fills on entry.
const FRAME_FILL: f64 = 0.45;

/// Everything needed to resume a session where it left off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub system: usize,
    pub sim_time: f64,
    pub time_scale: f64,
    pub paused: bool,
    pub camera: CameraState,
    pub orbit_model: OrbitModel,
    #[serde(default)]
    pub selected: Option<BodyRef>,
    #[serde(default = "default_draw_orbits")]
    pub draw_orbits: bool,
}

fn default_draw_orbits() -> bool {
    true
}

impl SessionSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A running view of the galaxy: one active system, its clock, the camera
/// and the render caches.
pub struct Session {
    config: EngineConfig,
    galaxy: Galaxy,
    current: usize,
    clock: SimulationClock,
    camera: Camera,
    renderer: FrameRenderer,
    style: RenderStyle,
    orbit_model: OrbitModel,
    follow: bool,
    draw_orbits: bool,
    selected: Option<BodyRef>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        let galaxy = Galaxy::generate(config.root_seed, config.system_count);
        let mut camera = Camera::new(config.viewport_width, config.viewport_height).with_state(CameraState {
            x: 0.0,
            y: 0.0,
            zoom: config.initial_zoom,
            squash: config.initial_squash,
        });
        camera.pan_responsiveness = config.pan_responsiveness;
        camera.zoom_responsiveness = config.zoom_responsiveness;

        let mut session = Self {
            galaxy,
            current: 0,
            clock: SimulationClock::with_step(config.fixed_step),
            camera,
            renderer: FrameRenderer::new(config.texture_width, config.texture_height, config.star_refresh_interval),
            style: config.style,
            orbit_model: config.orbit_model,
            follow: false,
            draw_orbits: config.draw_orbits,
            selected: None,
            config,
        };
        let start = session.config.start_system.unwrap_or(0);
        session.enter_system(start);
        log::info!(
            "Session started: seed {:#x}, {} systems, at {}",
            session.galaxy.root_seed(),
            session.galaxy.len(),
            session.system().name
        );
        session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active system.
    pub fn system(&self) -> &StarSystem {
        self.galaxy.system(self.current)
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    pub fn orbit_model(&self) -> OrbitModel {
        self.orbit_model
    }

    pub fn set_orbit_model(&mut self, model: OrbitModel) {
        self.orbit_model = model;
    }

    pub fn selected(&self) -> Option<BodyRef> {
        self.selected
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn draws_orbits(&self) -> bool {
        self.draw_orbits
    }

    /// Switch to system `index` without restarting the session. The clock
    /// keeps running; selection is cleared and the camera frames the system.
    pub fn enter_system(&mut self, index: usize) {
        let clamped = self.galaxy.clamp_index(index);
        if clamped != index {
            log::warn!("System index {} out of range, using {}", index, clamped);
        }
        self.current = self.galaxy.ensure_populated(clamped);
        if self.config.evict_inactive {
            self.galaxy.evict_except(self.current);
        }

        let time = self.clock.time();
        let model = self.orbit_model;
        simulation::update_positions(self.galaxy.system_mut(self.current), time, model);

        let system = self.galaxy.system(self.current);
        self.renderer.retain_system(system);
        self.selected = None;
        self.follow = false;

        let (w, h) = self.camera.viewport();
        let fit = w.min(h) as f64 * FRAME_FILL / system.extent();
        self.camera.follow(DVec2::ZERO);
        self.camera.set_zoom(fit);
        self.camera.snap();

        log::info!(
            "Entered system {} '{}' ({}): {} planets, {} moons, {} ships",
            self.current,
            system.name,
            system.kind.label(),
            system.planets.len(),
            system.moon_count(),
            system.ships.len()
        );
    }

    /// Run one frame: apply queued input, advance the clock in fixed steps,
    /// move the camera, and draw into `surface`.
    pub fn frame(&mut self, dt: f64, input: &mut InputQueue, surface: &mut dyn RenderSurface) {
        for event in input.drain() {
            self.apply_event(event);
        }

        let (w, h) = (surface.width(), surface.height());
        if self.camera.viewport() != (w.max(1), h.max(1)) {
            self.camera.set_viewport(w, h);
        }

        let model = self.orbit_model;
        let system = self.galaxy.system_mut(self.current);
        self.clock.advance(dt, |time, step| simulation::tick(system, time, step, model));
        // Paused or between steps, bodies still sit at the clock's time.
        simulation::update_positions(system, self.clock.time(), model);

        if let Some(body) = self.selected {
            match self.system().position_of(body) {
                Some(p) if self.follow => self.camera.follow(p),
                Some(_) => {}
                None => self.selected = None,
            }
        }
        self.camera.update(dt);

        let options = FrameOptions {
            draw_orbits: self.draw_orbits,
            orbit_model: self.orbit_model,
            starfield_seed: self.galaxy.root_seed() ^ self.system().seed,
            starfield_count: self.config.starfield_count,
            selected: self.selected,
        };
        self.renderer.render(
            surface,
            self.galaxy.system(self.current),
            &self.camera,
            &self.style,
            self.clock.time(),
            dt,
            &options,
        );
    }

    pub fn apply_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Pan { dx, dy } => {
                self.follow = false;
                self.camera.pan_by(dx as f64, dy as f64);
            }
            ControlEvent::Zoom { factor, anchor_x, anchor_y } => {
                if factor.is_finite() && factor > 0.0 {
                    let zoom = self.camera.target.zoom * factor as f64;
                    self.camera.zoom_at(zoom, Vec2::new(anchor_x, anchor_y));
                }
            }
            ControlEvent::Squash { delta } => {
                if delta.is_finite() {
                    self.camera.set_squash(self.camera.target.squash + delta as f64);
                }
            }
            ControlEvent::TogglePause => self.clock.toggle_pause(),
            ControlEvent::ToggleFollow => self.follow = !self.follow && self.selected.is_some(),
            ControlEvent::ToggleOrbits => self.draw_orbits = !self.draw_orbits,
            ControlEvent::SetTimeScale { scale } => self.clock.set_time_scale(scale),
            ControlEvent::Select { body } => self.select(Some(body)),
            ControlEvent::Pick { x, y } => {
                let hit = self.pick(x, y);
                self.select(hit);
            }
            ControlEvent::SelectNext => {
                let bodies = self.system().selectable_bodies();
                let next = match self.selected.and_then(|s| bodies.iter().position(|b| *b == s)) {
                    Some(i) => bodies.get((i + 1) % bodies.len()).copied(),
                    None => bodies.first().copied(),
                };
                self.select(next);
            }
            ControlEvent::JumpTo { system } => self.enter_system(system),
            ControlEvent::ShipOrder { ship, order } => self.order_ship(ship, order),
            ControlEvent::Resize { width, height } => self.camera.set_viewport(width, height),
        }
    }

    /// Select a body, or clear the selection. References that do not resolve
    /// in the active system clear it too.
    pub fn select(&mut self, body: Option<BodyRef>) {
        self.selected = body.filter(|b| self.system().resolve(*b).is_some());
        if self.selected.is_none() {
            self.follow = false;
        }
    }

    /// Nearest selectable body under a screen point, if any.
    pub fn pick(&self, x: f32, y: f32) -> Option<BodyRef> {
        let system = self.system();
        let point = Vec2::new(x, y);
        system
            .selectable_bodies()
            .into_iter()
            .filter_map(|body| {
                let entity = system.resolve(body)?;
                let p = entity.position();
                let center = self.camera.world_to_screen_f(p.x, p.y);
                let reach = self.camera.scale(entity.radius()).max(PICK_RADIUS_PX);
                let dist = center.distance(point);
                (dist <= reach).then_some((dist, body))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, body)| body)
    }

    /// Give an order to ship `index` of the active system. Unknown ships and
    /// orbit orders on missing bodies are ignored.
    pub fn order_ship(&mut self, index: usize, order: ShipOrder) {
        if let ShipOrder::Orbit { target, .. } = order {
            if self.system().resolve(target).is_none() {
                log::debug!("Ignoring orbit order on missing body {:?}", target);
                return;
            }
        }
        match self.galaxy.system_mut(self.current).ships.get_mut(index) {
            Some(ship) => ship.apply_order(order),
            None => log::debug!("Ignoring order for missing ship {}", index),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            system: self.current,
            sim_time: self.clock.time(),
            time_scale: self.clock.time_scale(),
            paused: self.clock.is_paused(),
            camera: self.camera.target,
            orbit_model: self.orbit_model,
            selected: self.selected,
            draw_orbits: self.draw_orbits,
        }
    }

    /// Resume from a snapshot. Out-of-range indices are clamped; the camera
    /// pose is clamped into its valid range.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.orbit_model = snapshot.orbit_model;
        self.clock.set_time(snapshot.sim_time);
        self.clock.set_time_scale(snapshot.time_scale);
        self.clock.set_paused(snapshot.paused);
        self.enter_system(snapshot.system);

        self.camera.target = snapshot.camera.clamped();
        self.camera.snap();
        self.draw_orbits = snapshot.draw_orbits;
        self.select(snapshot.selected);

        log::info!(
            "Restored session at system {} (t = {:.2}, scale {:.2}{})",
            self.current,
            self.clock.time(),
            self.clock.time_scale(),
            if self.clock.is_paused() { ", paused" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ShipMode, SystemKind};
    use crate::renderer::surface::Framebuffer;

    fn config() -> EngineConfig {
        EngineConfig {
            root_seed: 99,
            system_count: 32,
            viewport_width: 96,
            viewport_height: 72,
            texture_width: 32,
            texture_height: 16,
            starfield_count: 40,
            ..Default::default()
        }
    }

    fn run(session: &mut Session, frames: usize, dt: f64) -> Framebuffer {
        let mut fb = Framebuffer::new(96, 72);
        let mut input = InputQueue::new();
        for _ in 0..frames {
            session.frame(dt, &mut input, &mut fb);
        }
        fb
    }

    #[test]
    fn new_session_opens_populated_start_system() {
        let session = Session::new(EngineConfig { start_system: Some(5), ..config() });
        assert_eq!(session.current_index(), 5);
        assert!(session.system().is_populated());
        assert_eq!(session.galaxy().len(), 32);
    }

    #[test]
    fn frame_advances_clock_in_fixed_steps() {
        let mut session = Session::new(config());
        run(&mut session, 30, 1.0 / 30.0);
        let t = session.clock().time();
        assert!((t - 1.0).abs() < 0.05, "t = {}", t);
    }

    #[test]
    fn pause_freezes_positions_but_still_renders() {
        let mut session = Session::new(config());
        let mut input = InputQueue::new();
        let mut fb = Framebuffer::new(96, 72);
        input.push(ControlEvent::TogglePause);
        session.frame(0.1, &mut input, &mut fb);
        let before: Vec<_> = session.system().planets.iter().map(|p| p.position()).collect();
        session.frame(0.1, &mut input, &mut fb);
        let after: Vec<_> = session.system().planets.iter().map(|p| p.position()).collect();
        assert_eq!(before, after);
        assert_eq!(session.clock().time(), 0.0);
        assert!(fb.pixels().iter().any(|p| p.r > 0 || p.g > 0 || p.b > 0));
    }

    #[test]
    fn jump_clamps_and_keeps_clock() {
        let mut session = Session::new(config());
        run(&mut session, 10, 0.05);
        let t = session.clock().time();
        let mut input = InputQueue::new();
        input.push(ControlEvent::JumpTo { system: 10_000 });
        session.frame(0.0, &mut input, &mut Framebuffer::new(96, 72));
        assert_eq!(session.current_index(), 31);
        assert_eq!(session.clock().time(), t);
        assert!(session.system().is_populated());
    }

    #[test]
    fn entering_a_system_evicts_the_previous_one() {
        let mut session = Session::new(config());
        session.enter_system(3);
        assert!(!session.galaxy().system(0).is_populated());
        assert!(session.galaxy().system(3).is_populated());
    }

    #[test]
    fn select_next_cycles_and_follow_tracks() {
        let mut session = Session::new(config());
        let index = (0..32)
            .find(|&i| {
                session.enter_system(i);
                !session.system().planets.is_empty()
            })
            .unwrap_or(0);
        session.enter_system(index);
        let bodies = session.system().selectable_bodies();
        if bodies.is_empty() {
            return;
        }
        session.apply_event(ControlEvent::SelectNext);
        assert_eq!(session.selected(), bodies.first().copied());
        if bodies.len() > 1 {
            session.apply_event(ControlEvent::SelectNext);
            assert_eq!(session.selected(), Some(bodies[1]));
        }
        session.apply_event(ControlEvent::ToggleFollow);
        assert!(session.is_following());
        run(&mut session, 5, 0.1);
        let body = session.selected().unwrap();
        let p = session.system().position_of(body).unwrap();
        assert!((session.camera().target.x - p.x).abs() < 1e-9);
        assert!((session.camera().target.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn follow_needs_a_selection() {
        let mut session = Session::new(config());
        session.apply_event(ControlEvent::ToggleFollow);
        assert!(!session.is_following());
    }

    #[test]
    fn selecting_a_missing_body_clears_selection() {
        let mut session = Session::new(config());
        session.select(Some(BodyRef::planet(999)));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn pick_at_center_finds_the_star() {
        let mut session = Session::new(config());
        let kind = session.system().kind;
        if session.system().has_star || kind == SystemKind::BlackHole {
            session.apply_event(ControlEvent::Pick { x: 48.0, y: 36.0 });
            assert!(session.selected().is_some());
        }
        session.apply_event(ControlEvent::Pick { x: -500.0, y: -500.0 });
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn zoom_and_squash_stay_in_range() {
        let mut session = Session::new(config());
        for _ in 0..40 {
            session.apply_event(ControlEvent::Zoom { factor: 2.0, anchor_x: 10.0, anchor_y: 10.0 });
            session.apply_event(ControlEvent::Squash { delta: 0.3 });
        }
        let t = session.camera().target;
        assert_eq!(t.zoom, crate::renderer::camera::MAX_ZOOM);
        assert_eq!(t.squash, crate::renderer::camera::MAX_SQUASH);
    }

    #[test]
    fn ship_orders_reach_ships() {
        let mut session = Session::new(config());
        let index = (0..32)
            .find(|&i| {
                session.enter_system(i);
                !session.system().ships.is_empty()
            })
            .expect("some system has ships");
        session.enter_system(index);
        session.apply_event(ControlEvent::ShipOrder { ship: 0, order: ShipOrder::TravelTo { x: 3.0, y: 1.0 } });
        assert_eq!(session.system().ships[0].mode, ShipMode::TravelToPoint);
        // Orbit orders on missing bodies and unknown ships are ignored.
        session.order_ship(0, ShipOrder::Orbit { target: BodyRef::planet(999), radius: 1.0 });
        assert_eq!(session.system().ships[0].mode, ShipMode::TravelToPoint);
        session.order_ship(999, ShipOrder::Idle);
    }

    #[test]
    fn snapshot_restore_resumes_state() {
        let mut session = Session::new(config());
        session.enter_system(7);
        session.apply_event(ControlEvent::SetTimeScale { scale: 4.0 });
        session.apply_event(ControlEvent::ToggleOrbits);
        run(&mut session, 10, 0.05);
        session.apply_event(ControlEvent::TogglePause);
        let snap = session.snapshot();
        let json = snap.to_json().unwrap();

        let mut other = Session::new(config());
        other.restore(&SessionSnapshot::from_json(&json).unwrap());
        assert_eq!(other.current_index(), 7);
        assert_eq!(other.clock().time(), session.clock().time());
        assert_eq!(other.clock().time_scale(), 4.0);
        assert!(other.clock().is_paused());
        assert!(!other.draws_orbits());
        assert_eq!(other.snapshot(), snap);

        let a: Vec<_> = session.system().planets.iter().map(|p| p.position()).collect();
        let b: Vec<_> = other.system().planets.iter().map(|p| p.position()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn every_system_is_framed_on_entry() {
        let mut session = Session::new(EngineConfig {
            system_count: 64,
            viewport_width: 800,
            viewport_height: 600,
            ..config()
        });
        let budget = 600.0 * FRAME_FILL + 1e-6;
        for i in 0..session.galaxy().len() {
            session.enter_system(i);
            let extent = session.galaxy().system(i).extent();
            let zoom = session.camera().current.zoom;
            assert!(zoom * extent <= budget, "system {i}: extent {extent} at zoom {zoom}");
        }
    }

    #[test]
    fn restore_clamps_bad_snapshot() {
        let mut session = Session::new(config());
        let snap = SessionSnapshot::from_json(
            r#"{ "system": 5000, "sim_time": 12.5, "time_scale": 1.0, "paused": false,
                 "camera": { "x": 0.0, "y": 0.0, "zoom": 9000.0, "squash": 0.0 },
                 "orbit_model": "Circular" }"#,
        )
        .unwrap();
        session.restore(&snap);
        assert_eq!(session.current_index(), 31);
        assert_eq!(session.orbit_model(), OrbitModel::Circular);
        assert_eq!(session.camera().current.zoom, crate::renderer::camera::MAX_ZOOM);
        assert_eq!(session.camera().current.squash, crate::renderer::camera::MIN_SQUASH);
        assert!(session.draws_orbits());
        assert!(SessionSnapshot::from_json("{}").is_err());
    }
}
