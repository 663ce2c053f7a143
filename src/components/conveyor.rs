//! Conveyor belt
//!
//! The belt is a frictionless static slab. Driving it sets a surface speed
//! that is given to every body resting on it, each tick and the moment a new
//! body lands. A stopped belt holds its loads still.

use glam::Vec2;

use crate::assets::AssetSource;
use crate::error::ConfigError;
use crate::renderer::{Graphics, Shape, Sprite};
use crate::sim::{
    BodyHandle, Component, ComponentBase, Contact, ContactHandler, ContactListener,
    ContactResponse, DrawContext, Material, PartState, PhysicsShape, PhysicsWorld, Rotation,
    RotationSink,
};

/// Belt size (cm)
pub const CONVEYOR_SIZE: Vec2 = Vec2::new(125.0, 14.0);
/// Drive shaft relative to the bottom center
pub const SHAFT_OFFSET: Vec2 = Vec2::new(48.0, 4.0);

const CONVEYOR_IMAGE: &str = "conveyor.png";

#[derive(Debug, Clone)]
pub struct Conveyor {
    base: ComponentBase,
    position: Vec2,
    belt: PhysicsShape,
    sink: RotationSink,
    /// Surface speed, meters per second; positive moves loads right
    speed: f32,
}

impl Conveyor {
    pub fn new(assets: &dyn AssetSource) -> Result<Self, ConfigError> {
        let sprite = Sprite::image(
            Shape::bottom_centered_rectangle(CONVEYOR_SIZE.x, CONVEYOR_SIZE.y),
            assets.image(CONVEYOR_IMAGE)?,
        );
        let mut belt = PhysicsShape::new(sprite);
        belt.set_material(Material::frictionless());
        Ok(Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            belt,
            sink: RotationSink::new(),
            speed: 0.0,
        })
    }

    /// Bottom center of the belt
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.belt.set_initial_position(position);
    }

    /// Where the pulley driving this conveyor goes
    pub fn shaft_position(&self) -> Vec2 {
        self.position + SHAFT_OFFSET
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Surface speed in meters per second for a drive shaft turning at
    /// `speed`. The belt runs opposite to the shaft, one meter per turn.
    pub fn surface_speed(speed: f32) -> f32 {
        -speed
    }

    fn carry(&self, body: BodyHandle) -> ContactResponse {
        ContactResponse::SetVelocity {
            body,
            velocity: Vec2::new(self.speed, 0.0),
        }
    }
}

impl Component for Conveyor {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, ctx: &DrawContext) {
        self.belt.draw(gfx, ctx.world);
    }

    fn install_physics(&mut self, world: &mut PhysicsWorld) {
        self.belt.install(world);
    }

    fn add_contact_listener(&self, listener: &mut ContactListener) {
        if let (Some(body), Some(id)) = (self.belt.handle(), self.base.id()) {
            listener.add(body, id);
        }
    }

    fn rotate(&mut self, rotation: Rotation, world: &mut PhysicsWorld) -> Option<Rotation> {
        self.speed = Self::surface_speed(rotation.speed);
        if let Some(belt) = self.belt.handle() {
            for body in world.touching_bodies(belt) {
                if let ContactResponse::SetVelocity { body, velocity } = self.carry(body) {
                    world.set_linear_velocity(body, velocity);
                }
            }
        }
        None
    }

    fn reset_component(&mut self) {
        self.speed = 0.0;
    }

    fn sink(&self) -> Option<&RotationSink> {
        Some(&self.sink)
    }

    fn sink_mut(&mut self) -> Option<&mut RotationSink> {
        Some(&mut self.sink)
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.belt.handle().into_iter().collect()
    }

    fn state(&self) -> PartState {
        PartState::Conveyor { speed: self.speed }
    }
}

impl ContactHandler for Conveyor {
    fn begin_contact(&mut self, contact: &Contact) -> Option<ContactResponse> {
        contact.other_body.map(|body| self.carry(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::renderer::Color;
    use crate::sim::BodyKind;

    #[test]
    fn test_surface_runs_against_shaft() {
        assert_eq!(Conveyor::surface_speed(-2.0), 2.0);
        assert_eq!(Conveyor::surface_speed(1.0), -1.0);
    }

    #[test]
    fn test_drive_sets_speed_on_resting_bodies() {
        let mut conveyor = Conveyor::new(&VirtualAssets).unwrap();
        conveyor.set_position(Vec2::new(0.0, 100.0));
        let mut world = PhysicsWorld::new();
        conveyor.install_physics(&mut world);

        let mut ball = PhysicsShape::new(Sprite::colored(Shape::circle(12.0), Color::BLUE));
        ball.set_kind(BodyKind::Dynamic);
        ball.set_initial_position(Vec2::new(0.0, 126.0));
        ball.install(&mut world);
        for _ in 0..5 {
            world.step(1.0 / 30.0);
        }

        conveyor.rotate(Rotation::new(0.5, -2.0), &mut world);
        let velocity = ball.state(&world).unwrap().linear_velocity;
        assert_eq!(velocity, Vec2::new(2.0, 0.0));
        assert_eq!(conveyor.speed(), 2.0);
    }

    #[test]
    fn test_stopped_belt_holds_sliding_load() {
        let mut conveyor = Conveyor::new(&VirtualAssets).unwrap();
        conveyor.set_position(Vec2::new(0.0, 100.0));
        let mut world = PhysicsWorld::new();
        conveyor.install_physics(&mut world);

        let mut ball = PhysicsShape::new(Sprite::colored(Shape::circle(12.0), Color::BLUE));
        ball.set_kind(BodyKind::Dynamic);
        ball.set_initial_position(Vec2::new(0.0, 126.0));
        ball.install(&mut world);
        for _ in 0..5 {
            world.step(1.0 / 30.0);
        }

        let body = ball.handle().unwrap();
        world.set_linear_velocity(body, Vec2::new(1.0, 0.0));
        conveyor.rotate(Rotation::new(0.0, 0.0), &mut world);
        assert_eq!(ball.state(&world).unwrap().linear_velocity.x, 0.0);
        assert_eq!(conveyor.speed(), 0.0);
    }

    #[test]
    fn test_newcomers_take_belt_speed() {
        let mut conveyor = Conveyor::new(&VirtualAssets).unwrap();
        let mut world = PhysicsWorld::new();
        conveyor.install_physics(&mut world);
        let belt = conveyor.bodies()[0];
        let collider = world.colliders_of(belt)[0];
        let contact = Contact {
            body: belt,
            collider,
            other_body: Some(belt),
            other_collider: collider,
        };
        assert_eq!(
            conveyor.begin_contact(&contact),
            Some(ContactResponse::SetVelocity {
                body: belt,
                velocity: Vec2::ZERO
            })
        );

        conveyor.rotate(Rotation::new(0.0, 1.0), &mut world);
        assert_eq!(
            conveyor.begin_contact(&contact),
            Some(ContactResponse::SetVelocity {
                body: belt,
                velocity: Vec2::new(-1.0, 0.0)
            })
        );
        conveyor.reset_component();
        assert_eq!(conveyor.speed(), 0.0);
    }
}
