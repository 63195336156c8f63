pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use starforge_engine::{BodyKind, BodyRef, ControlEvent, ShipOrder};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Session not initialized. Call session_init() first.");
        f(runner)
    })
}

fn body_kind(code: u32) -> Option<BodyKind> {
    Some(match code {
        0 => BodyKind::Star,
        1 => BodyKind::Planet,
        2 => BodyKind::Moon,
        3 => BodyKind::Station,
        4 => BodyKind::Ship,
        5 => BodyKind::Asteroid,
        6 => BodyKind::Nebula,
        _ => return None,
    })
}

/// Create the session from a JSON config (`"{}"` for defaults).
#[wasm_bindgen]
pub fn session_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(config_json);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("starforge: initialized");
}

#[wasm_bindgen]
pub fn session_tick(dt: f64) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn session_resize(width: u32, height: u32) {
    with_runner(|r| r.resize(width, height));
}

// ---- Input ----

#[wasm_bindgen]
pub fn session_pan(dx: f32, dy: f32) {
    with_runner(|r| r.push_input(ControlEvent::Pan { dx, dy }));
}

#[wasm_bindgen]
pub fn session_zoom(factor: f32, anchor_x: f32, anchor_y: f32) {
    with_runner(|r| r.push_input(ControlEvent::Zoom { factor, anchor_x, anchor_y }));
}

#[wasm_bindgen]
pub fn session_squash(delta: f32) {
    with_runner(|r| r.push_input(ControlEvent::Squash { delta }));
}

#[wasm_bindgen]
pub fn session_toggle_pause() {
    with_runner(|r| r.push_input(ControlEvent::TogglePause));
}

#[wasm_bindgen]
pub fn session_toggle_follow() {
    with_runner(|r| r.push_input(ControlEvent::ToggleFollow));
}

#[wasm_bindgen]
pub fn session_toggle_orbits() {
    with_runner(|r| r.push_input(ControlEvent::ToggleOrbits));
}

#[wasm_bindgen]
pub fn session_set_time_scale(scale: f64) {
    with_runner(|r| r.push_input(ControlEvent::SetTimeScale { scale }));
}

#[wasm_bindgen]
pub fn session_pick(x: f32, y: f32) {
    with_runner(|r| r.push_input(ControlEvent::Pick { x, y }));
}

#[wasm_bindgen]
pub fn session_select_next() {
    with_runner(|r| r.push_input(ControlEvent::SelectNext));
}

/// Select by kind code (0 star, 1 planet, 2 moon, 3 station, 4 ship,
/// 5 asteroid, 6 nebula). Unknown codes are ignored.
#[wasm_bindgen]
pub fn session_select(kind: u32, index: u32, sub_index: u32) {
    if let Some(kind) = body_kind(kind) {
        let body = BodyRef { kind, index: index as usize, sub_index: sub_index as usize };
        with_runner(|r| r.select(body));
    }
}

#[wasm_bindgen]
pub fn session_jump(system: u32) {
    with_runner(|r| r.push_input(ControlEvent::JumpTo { system: system as usize }));
}

#[wasm_bindgen]
pub fn ship_travel_to(ship: u32, x: f64, y: f64) {
    with_runner(|r| r.order_ship(ship as usize, ShipOrder::TravelTo { x, y }));
}

#[wasm_bindgen]
pub fn ship_orbit(ship: u32, kind: u32, index: u32, sub_index: u32, radius: f64) {
    if let Some(kind) = body_kind(kind) {
        let target = BodyRef { kind, index: index as usize, sub_index: sub_index as usize };
        with_runner(|r| r.order_ship(ship as usize, ShipOrder::Orbit { target, radius }));
    }
}

#[wasm_bindgen]
pub fn ship_idle(ship: u32) {
    with_runner(|r| r.order_ship(ship as usize, ShipOrder::Idle));
}

// ---- Persistence ----

#[wasm_bindgen]
pub fn session_snapshot() -> String {
    with_runner(|r| r.snapshot_json())
}

#[wasm_bindgen]
pub fn session_restore(json: &str) -> bool {
    with_runner(|r| r.restore_json(json))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const u8 {
    with_runner(|r| r.frame_ptr())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len())
}

#[wasm_bindgen]
pub fn get_width() -> u32 {
    with_runner(|r| r.width())
}

#[wasm_bindgen]
pub fn get_height() -> u32 {
    with_runner(|r| r.height())
}

#[wasm_bindgen]
pub fn get_current_system() -> u32 {
    with_runner(|r| r.current_system())
}

#[wasm_bindgen]
pub fn get_system_count() -> u32 {
    with_runner(|r| r.system_count())
}

#[wasm_bindgen]
pub fn get_sim_time() -> f64 {
    with_runner(|r| r.sim_time())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_kind_codes() {
        assert_eq!(body_kind(0), Some(BodyKind::Star));
        assert_eq!(body_kind(2), Some(BodyKind::Moon));
        assert_eq!(body_kind(6), Some(BodyKind::Nebula));
        assert_eq!(body_kind(7), None);
    }
}
