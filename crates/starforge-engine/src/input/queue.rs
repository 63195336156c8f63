use crate::components::{BodyRef, ShipOrder};

/// Control events the session understands.
/// Screen quantities are in pixels; the session converts to world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Drag the view by a screen delta.
    Pan { dx: f32, dy: f32 },
    /// Multiply zoom by `factor`, keeping the point under the anchor fixed.
    Zoom { factor: f32, anchor_x: f32, anchor_y: f32 },
    /// Add to the plane squash.
    Squash { delta: f32 },
    TogglePause,
    /// Toggle camera follow of the selected body.
    ToggleFollow,
    ToggleOrbits,
    SetTimeScale { scale: f64 },
    /// Select a body directly.
    Select { body: BodyRef },
    /// Select whatever is under a screen point (or clear the selection).
    Pick { x: f32, y: f32 },
    /// Cycle selection through selectable bodies.
    SelectNext,
    /// Switch to another system by galaxy index.
    JumpTo { system: usize },
    /// Issue an order to a ship of the current system.
    ShipOrder { ship: usize, order: ShipOrder },
    /// Viewport size changed.
    Resize { width: u32, height: u32 },
}

/// A queue of control events.
/// The host pushes events; the session drains them each frame.
pub struct InputQueue {
    events: Vec<ControlEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
