pub mod camera;
pub mod fog;
pub mod frame;
pub mod ring;
pub mod sphere;
pub mod star;
pub mod style;
pub mod surface;
pub mod texture;

pub use camera::{Camera, CameraState};
pub use frame::{FrameOptions, FrameRenderer};
pub use style::{ColorDepth, RenderStyle, ShadingMode};
pub use surface::{Framebuffer, RenderSurface};
pub use texture::{StarTextureCache, SurfaceTexture, TextureCache};
