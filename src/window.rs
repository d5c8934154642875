//! SDL2 presentation adapter, behind the `window` feature.
//!
//! The window is `scale` times the pixel buffer in each direction; the
//! buffer is uploaded to a streaming texture of its own size and stretched
//! on copy, so every buffer pixel shows as a `scale` x `scale` block.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::app::FrameInput;
use crate::math::vec2::Vec2;
use crate::render::PixelBuffer;

/// Viewer actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PinA,
    PinB,
    ToggleFillRule,
    Save,
}

impl Key {
    fn from_keycode(keycode: Keycode) -> Option<Self> {
        match keycode {
            Keycode::Num1 | Keycode::Kp1 => Some(Key::PinA),
            Keycode::Num2 | Keycode::Kp2 => Some(Key::PinB),
            Keycode::F => Some(Key::ToggleFillRule),
            Keycode::S => Some(Key::Save),
            _ => None,
        }
    }
}

/// Input gathered by one [`Window::poll_input`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub quit: bool,
    pub pressed: Vec<Key>,
    /// Mouse position in window pixels.
    pub mouse: (i32, i32),
}

impl InputState {
    /// Translate to buffer coordinates by dividing the mouse position by
    /// the window scale.
    pub fn to_frame_input(&self, scale: u32) -> FrameInput {
        let scale = scale.max(1) as f32;
        let (x, y) = self.mouse;
        FrameInput {
            cursor: Some(Vec2::new(x as f32 / scale, y as f32 / scale)),
            pin_a: self.pressed.contains(&Key::PinA),
            pin_b: self.pressed.contains(&Key::PinB),
            toggle_fill_rule: self.pressed.contains(&Key::ToggleFillRule),
            save_snapshot: self.pressed.contains(&Key::Save),
        }
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before the creator it borrows from so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    buffer_width: u32,
    buffer_height: u32,
    scale: u32,
    staging: Vec<u8>,
}

impl Window {
    pub fn new(title: &str, buffer_width: u32, buffer_height: u32, scale: u32) -> Result<Self, String> {
        let scale = scale.max(1);
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, buffer_width * scale, buffer_height * scale)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is boxed, never moved out and outlives the
        // texture (field order drops the texture first).
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, buffer_width, buffer_height)
            .map_err(|e| e.to_string())?;

        log::info!(
            "Opened {}x{} window for a {}x{} buffer",
            buffer_width * scale,
            buffer_height * scale,
            buffer_width,
            buffer_height
        );

        Ok(Self {
            canvas,
            texture,
            _texture_creator: texture_creator,
            event_pump,
            buffer_width,
            buffer_height,
            scale,
            staging: Vec::with_capacity(buffer_width as usize * buffer_height as usize * 4),
        })
    }

    pub fn poll_input(&mut self) -> InputState {
        let mut input = InputState::default();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => input.quit = true,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => input.pressed.extend(Key::from_keycode(keycode)),
                _ => {}
            }
        }
        let mouse = self.event_pump.mouse_state();
        input.mouse = (mouse.x(), mouse.y());
        input
    }

    /// Upload `buffer` and show it. The buffer must match the size the
    /// window was created for.
    pub fn present(&mut self, buffer: &PixelBuffer) -> Result<(), String> {
        if buffer.width() != self.buffer_width || buffer.height() != self.buffer_height {
            return Err(format!(
                "buffer is {}x{}, window expects {}x{}",
                buffer.width(),
                buffer.height(),
                self.buffer_width,
                self.buffer_height
            ));
        }

        self.staging.clear();
        self.staging
            .extend(buffer.pixels().iter().flat_map(|c| c.to_argb().to_ne_bytes()));
        self.texture
            .update(None, &self.staging, (self.buffer_width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(
            &self.texture,
            None,
            Some(Rect::new(
                0,
                0,
                self.buffer_width * self.scale,
                self.buffer_height * self.scale,
            )),
        )?;
        self.canvas.present();
        Ok(())
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}
