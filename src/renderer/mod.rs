//! Drawing contract
//!
//! The simulation only ever talks to [`Graphics`]. A host plugs in its own
//! vector/raster backend; [`DrawList`] records commands for headless use.

pub mod recorder;
pub mod shapes;

pub use recorder::{DrawCommand, DrawList};
pub use shapes::{Fill, Shape, Sprite};

use glam::Vec2;
use serde::Serialize;

use crate::assets::Image;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Line style for strokes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
}

/// Font request for text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    /// Glyph height in drawing units
    pub size: f32,
    pub bold: bool,
}

/// Axis-aligned rectangle (x, y is the minimum corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same rectangle moved by `offset`
    pub fn offset(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// 2D graphics context
///
/// State (transform and clip) is a stack: `push_state`/`pop_state` must be
/// balanced by every caller.
pub trait Graphics {
    fn push_state(&mut self);
    fn pop_state(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn rotate(&mut self, angle: f32);
    /// Intersect the clip region with `rect` (current coordinates)
    fn clip(&mut self, rect: Rect);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_bitmap(&mut self, image: &Image, rect: Rect);
    fn draw_text(&mut self, text: &str, position: Vec2, font: Font, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, pen: Pen);
}
