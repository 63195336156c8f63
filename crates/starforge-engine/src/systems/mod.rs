pub mod occlusion;
pub mod simulation;

pub use occlusion::{Occluder, OcclusionIndex};
