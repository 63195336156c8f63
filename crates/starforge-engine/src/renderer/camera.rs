use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::extensions::easing::exp_alpha;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 240.0;
pub const MIN_SQUASH: f64 = 0.2;
pub const MAX_SQUASH: f64 = 1.2;

/// Camera pose: world center, pixels per world unit, and vertical squash of
/// the orbital plane (1.0 is top-down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub squash: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 12.0, squash: 0.55 }
    }
}

impl CameraState {
    /// Clamp zoom and squash into range; non-finite values reset to defaults.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            x: pick(self.x, d.x),
            y: pick(self.y, d.y),
            zoom: pick(self.zoom, d.zoom).clamp(MIN_ZOOM, MAX_ZOOM),
            squash: pick(self.squash, d.squash).clamp(MIN_SQUASH, MAX_SQUASH),
        }
    }
}

/// Orthographic view of the orbital plane with exponential smoothing toward
/// a target pose.
#[derive(Debug, Clone)]
pub struct Camera {
    pub current: CameraState,
    pub target: CameraState,
    viewport: (u32, u32),
    /// Pan smoothing rate (1/s). Higher is snappier.
    pub pan_responsiveness: f64,
    /// Zoom and squash smoothing rate (1/s).
    pub zoom_responsiveness: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            current: CameraState::default(),
            target: CameraState::default(),
            viewport: (width.max(1), height.max(1)),
            pan_responsiveness: 8.0,
            zoom_responsiveness: 10.0,
        }
    }

    pub fn with_state(mut self, state: CameraState) -> Self {
        self.target = state.clamped();
        self.current = self.target;
        self
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn center_px(&self) -> DVec2 {
        DVec2::new(self.viewport.0 as f64 / 2.0, self.viewport.1 as f64 / 2.0)
    }

    /// Move the current pose toward the target.
    pub fn update(&mut self, dt: f64) {
        let a_pan = exp_alpha(self.pan_responsiveness, dt);
        let a_zoom = exp_alpha(self.zoom_responsiveness, dt);
        let (c, t) = (&mut self.current, &self.target);
        c.x += (t.x - c.x) * a_pan;
        c.y += (t.y - c.y) * a_pan;
        c.zoom += (t.zoom - c.zoom) * a_zoom;
        c.squash += (t.squash - c.squash) * a_zoom;
    }

    /// Jump the current pose to the target.
    pub fn snap(&mut self) {
        self.current = self.target;
    }

    /// Drag by a screen delta: the content follows the pointer.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let t = &mut self.target;
        t.x -= dx / t.zoom;
        t.y -= dy / (t.zoom * t.squash);
    }

    pub fn follow(&mut self, point: DVec2) {
        self.target.x = point.x;
        self.target.y = point.y;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.target.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_squash(&mut self, squash: f64) {
        self.target.squash = squash.clamp(MIN_SQUASH, MAX_SQUASH);
    }

    /// Change zoom keeping the world point under `anchor` (screen pixels)
    /// fixed. Computed on the target pose.
    pub fn zoom_at(&mut self, new_zoom: f64, anchor: Vec2) {
        let c = self.center_px();
        let offset = DVec2::new(anchor.x as f64, anchor.y as f64) - c;
        let t = self.target;
        let world_x = t.x + offset.x / t.zoom;
        let world_y = t.y + offset.y / (t.zoom * t.squash);
        let zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.target.zoom = zoom;
        self.target.x = world_x - offset.x / zoom;
        self.target.y = world_y - offset.y / (zoom * t.squash);
    }

    /// World to integer screen pixel.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (i32, i32) {
        let c = self.center_px();
        let s = &self.current;
        (
            (c.x + ((wx - s.x) * s.zoom).round()) as i32,
            (c.y + ((wy - s.y) * s.zoom * s.squash).round()) as i32,
        )
    }

    /// World to unrounded screen position.
    pub fn world_to_screen_f(&self, wx: f64, wy: f64) -> Vec2 {
        let c = self.center_px();
        let s = &self.current;
        Vec2::new(
            (c.x + (wx - s.x) * s.zoom) as f32,
            (c.y + (wy - s.y) * s.zoom * s.squash) as f32,
        )
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> DVec2 {
        let c = self.center_px();
        let s = &self.current;
        DVec2::new(
            s.x + (sx - c.x) / s.zoom,
            s.y + (sy - c.y) / (s.zoom * s.squash),
        )
    }

    /// World length to pixels (horizontal scale).
    pub fn scale(&self, world: f64) -> f32 {
        (world * self.current.zoom) as f32
    }

    /// Whether a disc of `radius` pixels at `center` touches the viewport.
    pub fn is_disc_visible(&self, center: Vec2, radius: f32) -> bool {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        center.x + radius >= 0.0
            && center.x - radius <= w
            && center.y + radius >= 0.0
            && center.y - radius <= h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_screen_round_trip() {
        let cam = Camera::new(800, 600).with_state(CameraState { x: 3.0, y: -2.0, zoom: 20.0, squash: 0.5 });
        let (sx, sy) = cam.world_to_screen(3.0, -2.0);
        assert_eq!((sx, sy), (400, 300));
        let w = cam.screen_to_world(500.0, 350.0);
        assert!((w.x - 8.0).abs() < 1e-9);
        assert!((w.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut cam = Camera::new(800, 600);
        let anchor = Vec2::new(650.0, 120.0);
        let before = cam.screen_to_world(650.0, 120.0);
        cam.zoom_at(40.0, anchor);
        cam.snap();
        let after = cam.screen_to_world(650.0, 120.0);
        assert!((before - after).length() < 1e-9);
        assert_eq!(cam.current.zoom, 40.0);
    }

    #[test]
    fn zoom_and_squash_are_clamped() {
        let mut cam = Camera::new(100, 100);
        cam.zoom_at(10_000.0, Vec2::new(50.0, 50.0));
        assert_eq!(cam.target.zoom, MAX_ZOOM);
        cam.set_zoom(0.0);
        assert_eq!(cam.target.zoom, MIN_ZOOM);
        cam.set_squash(5.0);
        assert_eq!(cam.target.squash, MAX_SQUASH);
        cam.set_squash(-1.0);
        assert_eq!(cam.target.squash, MIN_SQUASH);
        let s = CameraState { x: f64::NAN, y: 0.0, zoom: 0.5, squash: 2.0 }.clamped();
        assert_eq!(s.x, 0.0);
        assert_eq!(s.zoom, MIN_ZOOM);
        assert_eq!(s.squash, MAX_SQUASH);
    }

    #[test]
    fn update_converges_toward_target() {
        let mut cam = Camera::new(100, 100);
        cam.follow(DVec2::new(10.0, 0.0));
        cam.update(1.0 / 60.0);
        assert!(cam.current.x > 0.0 && cam.current.x < 10.0);
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        assert!((cam.current.x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn pan_moves_content_with_pointer() {
        let mut cam = Camera::new(200, 200);
        let p = cam.world_to_screen(1.0, 1.0);
        cam.pan_by(24.0, 0.0);
        cam.snap();
        let q = cam.world_to_screen(1.0, 1.0);
        assert_eq!(q.0 - p.0, 24);
        assert_eq!(q.1, p.1);
    }

    #[test]
    fn disc_visibility() {
        let cam = Camera::new(100, 100);
        assert!(cam.is_disc_visible(Vec2::new(50.0, 50.0), 1.0));
        assert!(cam.is_disc_visible(Vec2::new(-5.0, 50.0), 10.0));
        assert!(!cam.is_disc_visible(Vec2::new(-50.0, 50.0), 10.0));
    }
}
