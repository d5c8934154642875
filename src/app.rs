//! Frame driver shared by the windowed viewer and headless runs.
//!
//! [`App`] owns the pixel buffer, the optional model and the playground. A
//! frame clears to the background, draws the model, draws the playground on
//! top and then applies the requested actions. The presentation layer only
//! translates its input into a [`FrameInput`] and shows [`App::buffer`].

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::math::vec2::Vec2;
use crate::model::Model;
use crate::playground::Playground;
use crate::render::{EdgeFunctionRasterizer, ModelRenderer, PixelBuffer};

/// What happened since the previous frame, in buffer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub cursor: Option<Vec2>,
    pub pin_a: bool,
    pub pin_b: bool,
    pub toggle_fill_rule: bool,
    pub save_snapshot: bool,
}

pub struct App {
    config: Config,
    buffer: PixelBuffer,
    renderer: ModelRenderer<EdgeFunctionRasterizer>,
    model: Option<Model>,
    playground: Playground,
}

impl App {
    /// Allocate the buffer and load the configured model, if any.
    pub fn new(config: Config) -> Result<Self> {
        let (width, height) = config.buffer_size();
        let buffer = PixelBuffer::new(width, height)?;
        let model = match &config.model {
            Some(path) => {
                let model = Model::load(path)?;
                log::info!(
                    "Loaded {}: {} vertices, {} faces, {} triangles",
                    path.display(),
                    model.vertices().len(),
                    model.faces().len(),
                    model.triangle_count()
                );
                Some(model)
            }
            None => None,
        };
        let renderer =
            ModelRenderer::with_rasterizer(EdgeFunctionRasterizer::new(config.fill_rule), config.seed);

        Ok(Self {
            config,
            buffer,
            renderer,
            model,
            playground: Playground::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn rasterizer(&self) -> &EdgeFunctionRasterizer {
        self.renderer.rasterizer()
    }

    /// Render one frame, then handle the actions in `input`.
    pub fn frame(&mut self, input: &FrameInput) -> Result<()> {
        if let Some(cursor) = input.cursor {
            if input.pin_a {
                self.playground.pin_a(cursor);
            }
            if input.pin_b {
                self.playground.pin_b(cursor);
            }
        }
        if input.toggle_fill_rule {
            let rasterizer = self.renderer.rasterizer_mut();
            let rule = rasterizer.fill_rule().toggled();
            rasterizer.set_fill_rule(rule);
            log::info!("Fill rule: {rule}");
        }

        self.render(input.cursor);

        if input.save_snapshot {
            save_snapshot(&self.buffer, &self.config.snapshot)?;
        }
        Ok(())
    }

    fn render(&mut self, cursor: Option<Vec2>) {
        self.buffer.clear(self.config.background);
        if let Some(model) = &self.model {
            self.renderer.draw(&mut self.buffer, model);
        }
        self.playground
            .draw(&mut self.buffer, self.renderer.rasterizer(), cursor);
    }
}

/// Write the buffer to `path`. `.bmp` files (or paths without an extension)
/// go through the built-in encoder, anything else through `image`.
pub fn save_snapshot<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_bitmap = path
        .extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("bmp"));
    if is_bitmap {
        buffer.save_bitmap(path)?;
    } else {
        buffer.save_image(path)?;
        log::info!("Saved snapshot to {}", path.display());
    }
    Ok(())
}
