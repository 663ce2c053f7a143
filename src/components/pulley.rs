//! Pulley: a driven shaft that drives others
//!
//! A pulley takes rotation through its sink and passes it unchanged on
//! through its source. It can be belted to one other pulley; the belt is
//! only drawn.

use glam::Vec2;

use super::turns_to_radians;
use crate::assets::Image;
use crate::error::ConfigError;
use crate::renderer::{Color, Graphics, Pen, Shape, Sprite};
use crate::sim::{
    Component, ComponentBase, ComponentId, DrawContext, PartState, PhysicsWorld, Rotation,
    RotationSink, RotationSource,
};

/// Belt stroke
pub const BELT_PEN: Pen = Pen {
    color: Color::BLACK,
    width: 2.0,
};

#[derive(Debug, Clone)]
pub struct Pulley {
    base: ComponentBase,
    radius: f32,
    position: Vec2,
    sprite: Sprite,
    /// Turns
    rotation: f32,
    /// Turns per second
    speed: f32,
    sink: RotationSink,
    source: RotationSource,
    belt: Option<ComponentId>,
}

impl Pulley {
    pub fn new(radius: f32) -> Result<Self, ConfigError> {
        let shape = Shape::centered_square(radius * 2.0);
        shape.validate()?;
        Ok(Self {
            base: ComponentBase::default(),
            radius,
            position: Vec2::ZERO,
            sprite: Sprite::colored(shape, Color::BLACK),
            rotation: 0.0,
            speed: 0.0,
            sink: RotationSink::new(),
            source: RotationSource::new(),
            belt: None,
        })
    }

    /// Paint the pulley with `image` instead of a flat color
    pub fn set_image(&mut self, image: Image) {
        self.sprite = Sprite::image(self.sprite.shape.clone(), image);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Pulley the belt runs to
    pub fn belt(&self) -> Option<ComponentId> {
        self.belt
    }

    pub(crate) fn set_belt(&mut self, pulley: ComponentId) {
        self.belt = Some(pulley);
    }

    /// Two belt segments tangent to this pulley and `other`, both radius
    /// `self.radius`
    pub fn belt_lines(&self, other: Vec2) -> [(Vec2, Vec2); 2] {
        let a = (other - self.position).normalize_or_zero() * self.radius;
        let beta = a.perp();
        [
            (self.position + beta, other + beta),
            (self.position - beta, other - beta),
        ]
    }
}

impl Component for Pulley {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, ctx: &DrawContext) {
        let other = self
            .belt
            .and_then(|id| ctx.part(id))
            .and_then(|part| part.as_pulley());
        if let Some(other) = other {
            for (from, to) in self.belt_lines(other.position) {
                gfx.stroke_line(from, to, BELT_PEN);
            }
        }
        self.sprite
            .draw(gfx, self.position, turns_to_radians(self.rotation));
    }

    fn update_time(&mut self, dt: f32) -> Option<Rotation> {
        self.base.advance(dt);
        self.rotation += self.speed * dt;
        None
    }

    fn rotate(&mut self, rotation: Rotation, _world: &mut PhysicsWorld) -> Option<Rotation> {
        // A stationary driver must not clear a speed already set
        if rotation.angle != 0.0 {
            self.speed = rotation.speed;
        }
        Some(rotation)
    }

    fn reset_component(&mut self) {
        self.rotation = 0.0;
        self.speed = 0.0;
    }

    fn source(&self) -> Option<&RotationSource> {
        Some(&self.source)
    }

    fn source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn sink(&self) -> Option<&RotationSink> {
        Some(&self.sink)
    }

    fn sink_mut(&mut self) -> Option<&mut RotationSink> {
        Some(&mut self.sink)
    }

    fn state(&self) -> PartState {
        PartState::Pulley {
            rotation: self.rotation,
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::Part;

    #[test]
    fn test_stationary_drive_keeps_speed_and_forwards() {
        let mut world = PhysicsWorld::new();
        let mut pulley = Pulley::new(10.0).unwrap();

        pulley.rotate(Rotation::new(0.3, 2.0), &mut world);
        assert_eq!(pulley.speed(), 2.0);

        let forwarded = pulley.rotate(Rotation::new(0.0, 5.0), &mut world);
        assert_eq!(pulley.speed(), 2.0);
        assert_eq!(forwarded, Some(Rotation::new(0.0, 5.0)));
    }

    #[test]
    fn test_moving_drive_is_forwarded_unchanged() {
        let mut world = PhysicsWorld::new();
        let mut pulley = Pulley::new(10.0).unwrap();
        let forwarded = pulley.rotate(Rotation::new(-0.5, -3.0), &mut world);
        assert_eq!(pulley.speed(), -3.0);
        assert_eq!(forwarded, Some(Rotation::new(-0.5, -3.0)));
    }

    #[test]
    fn test_rotation_integrates_speed() {
        let mut world = PhysicsWorld::new();
        let mut pulley = Pulley::new(10.0).unwrap();
        pulley.rotate(Rotation::new(0.1, -2.0), &mut world);
        pulley.update_time(0.25);
        pulley.update_time(0.25);
        assert!((pulley.rotation() + 1.0).abs() < 1e-6);

        pulley.reset_component();
        assert_eq!(pulley.rotation(), 0.0);
        assert_eq!(pulley.speed(), 0.0);
    }

    #[test]
    fn test_belt_lines_are_tangent() {
        let mut pulley = Pulley::new(10.0).unwrap();
        pulley.set_position(Vec2::new(0.0, 0.0));
        let [upper, lower] = pulley.belt_lines(Vec2::new(100.0, 0.0));
        assert_eq!(upper, (Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0)));
        assert_eq!(lower, (Vec2::new(0.0, -10.0), Vec2::new(100.0, -10.0)));
    }

    #[test]
    fn test_draws_belt_to_linked_pulley() {
        let mut driver = Pulley::new(10.0).unwrap();
        driver.set_belt(ComponentId(1));
        let mut driven = Pulley::new(10.0).unwrap();
        driven.set_position(Vec2::new(0.0, 50.0));
        let world = PhysicsWorld::new();
        let parts = vec![Part::from(driver), Part::from(driven)];
        let ctx = DrawContext {
            world: &world,
            parts: &parts,
        };

        let mut list = DrawList::new();
        parts[0].component().draw(&mut list, &ctx);
        let lines = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { pen, .. } if *pen == BELT_PEN))
            .count();
        assert_eq!(lines, 2);
        assert_eq!(list.depth(), 0);
    }
}
