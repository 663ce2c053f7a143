//! Recording graphics backend
//!
//! Captures every call as a [`DrawCommand`]. Used by the CLI to dump frames
//! as JSON and by tests to inspect what a component painted.

use glam::Vec2;
use serde::Serialize;

use super::{Color, Font, Graphics, Pen, Rect};
use crate::assets::Image;

/// One recorded graphics call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    PushState,
    PopState,
    Translate { x: f32, y: f32 },
    Scale { sx: f32, sy: f32 },
    Rotate { angle: f32 },
    Clip { rect: Rect },
    FillPolygon { points: Vec<Vec2>, color: Color },
    FillRect { rect: Rect, color: Color },
    Bitmap { image: String, rect: Rect },
    Text { text: String, position: Vec2, font: Font, color: Color },
    Line { from: Vec2, to: Vec2, pen: Pen },
}

/// Ordered list of recorded graphics calls
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    #[serde(skip)]
    depth: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save/restore nesting depth (0 when balanced)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All bitmaps drawn, in order
    pub fn bitmaps(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Bitmap { image, .. } => Some(image.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Graphics for DrawList {
    fn push_state(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::PushState);
    }

    fn pop_state(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopState);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate { angle });
    }

    fn clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clip { rect });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_bitmap(&mut self, image: &Image, rect: Rect) {
        self.commands.push(DrawCommand::Bitmap {
            image: image.path().to_string(),
            rect,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, font: Font, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            font,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, pen: Pen) {
        self.commands.push(DrawCommand::Line { from, to, pen });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order_and_tracks_depth() {
        let mut list = DrawList::new();
        list.push_state();
        list.translate(1.0, 2.0);
        assert_eq!(list.depth(), 1);
        list.draw_text("07", Vec2::ZERO, Font { size: 20.0, bold: true }, Color::WHITE);
        list.pop_state();

        assert_eq!(list.depth(), 0);
        assert_eq!(list.commands.len(), 4);
        assert_eq!(list.commands[1], DrawCommand::Translate { x: 1.0, y: 2.0 });
        assert_eq!(list.texts(), vec!["07"]);
    }

    #[test]
    fn test_serializes_tagged() {
        let mut list = DrawList::new();
        list.scale(1.5, -1.5);
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains(r#""op":"scale""#));
    }
}
