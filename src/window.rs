//! Presentation of packed frames.
//!
//! The frame loop only needs two things from a display: drain pending input
//! and show a packed ARGB8888 buffer. [`Presenter`] captures that, and
//! [`Window`] implements it on top of SDL2.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::WindowContext;

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
}

/// Something that can show a frame.
pub trait Presenter {
    /// Drains all pending input without blocking.
    fn poll_events(&mut self) -> WindowEvent;

    /// Shows `pixels`, row-major ARGB8888, one `u32` per pixel.
    fn present(&mut self, pixels: &[u32]) -> Result<(), RenderError>;
}

pub struct Window {
    // Declared before `texture_creator` so it is dropped first.
    texture: Texture<'static>,
    _texture_creator: Box<TextureCreator<WindowContext>>,
    canvas: Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    width: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, RenderError> {
        let sdl_context = sdl2::init().map_err(RenderError::Display)?;
        let video_subsystem = sdl_context.video().map_err(RenderError::Display)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| RenderError::Display(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| RenderError::Display(e.to_string()))?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(RenderError::Display)?;

        // SAFETY: texture_creator is heap-allocated, never moved out of its box,
        // and outlives texture by struct field order.
        let texture_creator_ref: &'static TextureCreator<WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| RenderError::Display(e.to_string()))?;

        log::debug!("window created: {width}x{height}");

        Ok(Self {
            texture,
            _texture_creator: texture_creator,
            canvas,
            event_pump,
            width,
        })
    }
}

impl Presenter for Window {
    fn poll_events(&mut self) -> WindowEvent {
        let mut result = WindowEvent::None;
        for event in self.event_pump.poll_iter() {
            if let Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } = event
            {
                result = WindowEvent::Quit;
            }
        }
        result
    }

    fn present(&mut self, pixels: &[u32]) -> Result<(), RenderError> {
        let bytes: &[u8] = bytemuck::cast_slice(pixels);
        self.texture
            .update(None, bytes, (self.width * 4) as usize)
            .map_err(|e| RenderError::Display(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, None)
            .map_err(RenderError::Display)?;
        self.canvas.present();
        Ok(())
    }
}
