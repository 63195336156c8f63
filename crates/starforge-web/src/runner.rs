use starforge_engine::{
    BodyRef, ControlEvent, EngineConfig, Framebuffer, InputQueue, RenderSurface, Session, SessionSnapshot,
    ShipOrder,
};

/// Wires a [`Session`] to an owned framebuffer for the browser.
///
/// The page calls `tick(dt)` once per animation frame, then reads the RGBA
/// bytes at `frame_ptr()` (length `frame_len()`) straight out of wasm memory
/// into an `ImageData`.
pub struct SessionRunner {
    session: Session,
    framebuffer: Framebuffer,
    input: InputQueue,
}

impl SessionRunner {
    pub fn new(config: EngineConfig) -> Self {
        let framebuffer = Framebuffer::new(config.viewport_width, config.viewport_height);
        Self {
            session: Session::new(config),
            framebuffer,
            input: InputQueue::new(),
        }
    }

    /// Build from a JSON config. Invalid JSON falls back to the default
    /// config and is logged.
    pub fn from_json(json: &str) -> Self {
        let config = match EngineConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid engine config, using defaults: {}", e);
                EngineConfig::default()
            }
        };
        Self::new(config)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Push a control event into the queue.
    pub fn push_input(&mut self, event: ControlEvent) {
        self.input.push(event);
    }

    /// Run one frame. `dt` is wall time in seconds.
    pub fn tick(&mut self, dt: f64) {
        self.session.frame(dt, &mut self.input, &mut self.framebuffer);
    }

    /// Resize the framebuffer and the camera viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
        self.input.push(ControlEvent::Resize { width, height });
    }

    pub fn select(&mut self, body: BodyRef) {
        self.input.push(ControlEvent::Select { body });
    }

    pub fn order_ship(&mut self, ship: usize, order: ShipOrder) {
        self.input.push(ControlEvent::ShipOrder { ship, order });
    }

    pub fn snapshot_json(&self) -> String {
        match self.session.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                String::new()
            }
        }
    }

    /// Restore from a JSON snapshot. Returns false (and leaves the session
    /// untouched) when the JSON does not parse.
    pub fn restore_json(&mut self, json: &str) -> bool {
        match SessionSnapshot::from_json(json) {
            Ok(snapshot) => {
                self.session.restore(&snapshot);
                true
            }
            Err(e) => {
                log::warn!("Ignoring invalid snapshot: {}", e);
                false
            }
        }
    }

    // ---- Pointer accessors for ImageData reads ----

    pub fn frame_ptr(&self) -> *const u8 {
        self.framebuffer.as_bytes().as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.framebuffer.as_bytes().len() as u32
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn current_system(&self) -> u32 {
        self.session.current_index() as u32
    }

    pub fn system_count(&self) -> u32 {
        self.session.galaxy().len() as u32
    }

    pub fn sim_time(&self) -> f64 {
        self.session.clock().time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SessionRunner {
        SessionRunner::from_json(
            r#"{ "root_seed": 5, "system_count": 16, "viewport_width": 64, "viewport_height": 48,
                 "texture_width": 32, "texture_height": 16 }"#,
        )
    }

    #[test]
    fn tick_fills_the_frame() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert_eq!(r.frame_len(), 64 * 48 * 4);
        assert!(!r.frame_ptr().is_null());
        assert_eq!(r.system_count(), 16);
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let r = SessionRunner::from_json("nope");
        assert_eq!(r.session().config(), &EngineConfig::default());
    }

    #[test]
    fn resize_reaches_buffer_and_camera() {
        let mut r = runner();
        r.resize(100, 50);
        r.tick(0.0);
        assert_eq!((r.width(), r.height()), (100, 50));
        assert_eq!(r.frame_len(), 100 * 50 * 4);
        assert_eq!(r.session().camera().viewport(), (100, 50));
    }

    #[test]
    fn snapshot_round_trip_through_json() {
        let mut r = runner();
        r.push_input(ControlEvent::JumpTo { system: 3 });
        for _ in 0..10 {
            r.tick(0.05);
        }
        let json = r.snapshot_json();

        let mut other = runner();
        assert!(other.restore_json(&json));
        assert_eq!(other.current_system(), 3);
        assert_eq!(other.sim_time(), r.sim_time());
        assert!(!other.restore_json("{"));
    }
}
