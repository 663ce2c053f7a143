//! Shape geometry for machine parts
//!
//! Shapes are authored in centimeters relative to the part's origin, with the
//! Y axis pointing up.

use glam::Vec2;
use std::f32::consts::PI;

use super::{Color, Graphics, Rect};
use crate::assets::Image;
use crate::error::ConfigError;

/// Segments used when a circle has to become a polygon
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Smallest area (cm²) a shape may enclose
const MIN_AREA: f32 = 1e-3;

/// Outline of a part, local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Convex polygon, counter-clockwise
    Polygon(Vec<Vec2>),
    Circle { radius: f32 },
}

impl Shape {
    /// Rectangle with its lower-left corner at (x, y)
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Polygon(vec![
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ])
    }

    /// Rectangle whose bottom edge is centered on the origin
    pub fn bottom_centered_rectangle(width: f32, height: f32) -> Self {
        Self::rectangle(-width / 2.0, 0.0, width, height)
    }

    /// Square centered on the origin
    pub fn centered_square(size: f32) -> Self {
        Self::rectangle(-size / 2.0, -size / 2.0, size, size)
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Shape::Polygon(points)
    }

    /// Reject shapes with no area or non-finite coordinates
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Shape::Circle { radius } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(ConfigError::DegenerateShape(format!(
                        "circle radius {radius}"
                    )));
                }
            }
            Shape::Polygon(points) => {
                if points.len() < 3 {
                    return Err(ConfigError::DegenerateShape(format!(
                        "polygon with {} points",
                        points.len()
                    )));
                }
                if points.iter().any(|p| !p.is_finite()) {
                    return Err(ConfigError::DegenerateShape(
                        "non-finite polygon point".to_string(),
                    ));
                }
                let area = polygon_area(points).abs();
                if area < MIN_AREA {
                    return Err(ConfigError::DegenerateShape(format!(
                        "polygon area {area}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Bounding rectangle in local coordinates
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Circle { radius } => Rect::new(-radius, -radius, radius * 2.0, radius * 2.0),
            Shape::Polygon(points) => {
                let min = points.iter().copied().reduce(Vec2::min).unwrap_or(Vec2::ZERO);
                let max = points.iter().copied().reduce(Vec2::max).unwrap_or(Vec2::ZERO);
                Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
            }
        }
    }

    /// Outline as a polygon
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            Shape::Circle { radius } => circle_outline(Vec2::ZERO, *radius, CIRCLE_SEGMENTS),
            Shape::Polygon(points) => points.clone(),
        }
    }
}

/// Signed area (positive when counter-clockwise)
fn polygon_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

/// Points around a circle
pub fn circle_outline(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            Vec2::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

/// How a shape is painted
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Stretch the image over the shape's bounds
    Image(Image),
    Color(Color),
}

/// A shape plus its paint
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    pub fill: Fill,
}

impl Sprite {
    pub fn new(shape: Shape, fill: Fill) -> Self {
        Self { shape, fill }
    }

    pub fn image(shape: Shape, image: Image) -> Self {
        Self::new(shape, Fill::Image(image))
    }

    pub fn colored(shape: Shape, color: Color) -> Self {
        Self::new(shape, Fill::Color(color))
    }

    /// Draw with the local origin at `position`, rotated by `angle`
    pub fn draw(&self, gfx: &mut dyn Graphics, position: Vec2, angle: f32) {
        gfx.push_state();
        gfx.translate(position.x, position.y);
        if angle != 0.0 {
            gfx.rotate(angle);
        }
        match &self.fill {
            Fill::Image(image) => gfx.draw_bitmap(image, self.shape.bounds()),
            Fill::Color(color) => gfx.fill_polygon(&self.shape.outline(), *color),
        }
        gfx.pop_state();
    }
}
