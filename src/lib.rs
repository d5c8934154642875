//! A minimal CPU software rasterizer.
//!
//! Models are read from a small OBJ subset, projected orthographically,
//! split into triangle fans and filled into a [`PixelBuffer`] with an
//! edge-function rasterizer. Buffers can be written as uncompressed 24-bit
//! bitmaps. SDL2 is only used, behind the `window` feature, to show the
//! buffer on screen.
//!
//! # Quick Start
//!
//! ```no_run
//! use tinyrast::prelude::*;
//!
//! # fn main() -> tinyrast::Result<()> {
//! let model = Model::load("assets/cube.obj")?;
//! let mut buffer = PixelBuffer::new(240, 135)?;
//! buffer.clear(colors::BACKGROUND);
//! ModelRenderer::new(42).draw(&mut buffer, &model);
//! tinyrast::bitmap::save(&buffer, "cube.bmp")?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod bitmap;
pub mod colors;
pub mod config;
pub mod error;
pub mod frame_limiter;
pub mod loader;
pub mod math;
pub mod model;
pub mod playground;
pub mod render;
#[cfg(feature = "window")]
pub mod window;

pub use app::{App, FrameInput};
pub use bitmap::BitmapError;
pub use colors::Color;
pub use config::Config;
pub use error::{BufferError, Error, Result};
pub use frame_limiter::FrameLimiter;
pub use loader::LoadError;
pub use model::{Face, Model};
pub use render::{EdgeFunctionRasterizer, FillRule, ModelRenderer, PixelBuffer, Rasterizer, Triangle};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::colors::{self, Color};
    pub use crate::frame_limiter::FrameLimiter;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::model::{Face, Model};
    pub use crate::render::{
        EdgeFunctionRasterizer, FillRule, ModelRenderer, PixelBuffer, Rasterizer, Triangle,
    };

    #[cfg(feature = "window")]
    pub use crate::window::{InputState, Key, Window};
}
