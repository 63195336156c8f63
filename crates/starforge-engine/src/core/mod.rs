pub mod hash;
pub mod orbit;
pub mod rng;
pub mod time;
