//! 纯 CPU 的三角形光栅化管线：齐次裁剪空间的近/远平面裁剪、
//! 透视校正的重心坐标插值，以及带 Z-buffer 的扫描线填充。

pub mod camera;
pub mod error;
pub mod framebuffer;
pub mod model;
pub mod rasterizer;
pub mod renderer;
pub mod vertex;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use framebuffer::{FAR_DEPTH, FrameBuffer};
pub use model::{Instance, Mesh};
pub use renderer::shader::{Shader, Uniforms};
pub use renderer::{RenderStats, Renderer, Viewport};
pub use vertex::ClipPolygon;
