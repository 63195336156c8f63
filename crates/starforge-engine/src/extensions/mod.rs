// Extensions: small decoupled helpers.

pub mod easing;

pub use easing::{exp_alpha, lerp, smoothstep};
