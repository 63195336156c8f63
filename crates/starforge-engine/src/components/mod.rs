pub mod body;
pub mod color;
pub mod entity;
pub mod ring;
pub mod ship;
pub mod system;

pub use body::{Asteroid, Moon, NebulaCloud, Planet, Station, TextureKind};
pub use color::{Color, Rgba8};
pub use entity::{BodyKind, BodyRef, EntityRef};
pub use ring::{RingGap, RingParams, RingPoint};
pub use ship::{Ship, ShipMode, ShipOrder, ARRIVE_RADIUS};
pub use system::{StarSystem, SystemKind};
