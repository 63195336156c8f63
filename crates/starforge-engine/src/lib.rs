pub mod api;
pub mod core;
pub mod components;
pub mod generation;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::session::{Session, SessionSnapshot};
pub use components::{
    BodyKind, BodyRef, Color, EntityRef, Planet, Moon, Rgba8, Ship, ShipMode, ShipOrder, StarSystem, SystemKind,
    TextureKind,
};
pub use core::orbit::{orbit_position, solve_kepler, KeplerSolution, OrbitModel, OrbitalElements};
pub use core::rng::Rng;
pub use core::time::SimulationClock;
pub use generation::Galaxy;
pub use input::queue::{ControlEvent, InputQueue};
pub use renderer::{
    Camera, CameraState, ColorDepth, FrameOptions, FrameRenderer, Framebuffer, RenderStyle, RenderSurface,
    ShadingMode,
};
pub use systems::{Occluder, OcclusionIndex};
