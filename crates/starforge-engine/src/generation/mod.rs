pub mod builders;
pub mod galaxy;
pub mod links;
pub mod names;

pub use galaxy::Galaxy;
