//! CPU rendering: pixel storage, triangle fill and model drawing.

pub mod framebuffer;
pub mod model_renderer;
pub mod rasterizer;

pub use framebuffer::PixelBuffer;
pub use model_renderer::ModelRenderer;
pub use rasterizer::{EdgeFunctionRasterizer, FillRule, Rasterizer, Triangle};
