//! A plain physics-backed shape
//!
//! Floors, wedges and balls. A body can be driven like a shaft, which spins
//! it in place when it is not static.

use glam::Vec2;

use super::turns_to_radians;
use crate::error::ConfigError;
use crate::renderer::{Graphics, Sprite};
use crate::sim::{
    BodyHandle, BodyKind, Component, ComponentBase, DrawContext, Material, PartState,
    PhysicsShape, PhysicsWorld, Rotation, RotationSink,
};

#[derive(Debug, Clone)]
pub struct Body {
    base: ComponentBase,
    shape: PhysicsShape,
    sink: RotationSink,
}

impl Body {
    /// Static body drawn with `sprite`
    pub fn new(sprite: Sprite) -> Result<Self, ConfigError> {
        sprite.shape.validate()?;
        Ok(Self {
            base: ComponentBase::default(),
            shape: PhysicsShape::new(sprite),
            sink: RotationSink::new(),
        })
    }

    pub fn shape(&self) -> &PhysicsShape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut PhysicsShape {
        &mut self.shape
    }

    pub fn set_initial_position(&mut self, position: Vec2) {
        self.shape.set_initial_position(position);
    }

    pub fn set_dynamic(&mut self) {
        self.shape.set_kind(BodyKind::Dynamic);
    }

    pub fn set_kinematic(&mut self) {
        self.shape.set_kind(BodyKind::Kinematic);
    }

    pub fn set_physics(&mut self, density: f32, friction: f32, restitution: f32) {
        self.shape
            .set_material(Material::new(density, friction, restitution));
    }
}

impl Component for Body {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, ctx: &DrawContext) {
        self.shape.draw(gfx, ctx.world);
    }

    fn install_physics(&mut self, world: &mut PhysicsWorld) {
        self.shape.install(world);
    }

    fn rotate(&mut self, rotation: Rotation, world: &mut PhysicsWorld) -> Option<Rotation> {
        self.shape
            .set_angular_velocity(world, turns_to_radians(rotation.speed));
        None
    }

    fn sink(&self) -> Option<&RotationSink> {
        Some(&self.sink)
    }

    fn sink_mut(&mut self) -> Option<&mut RotationSink> {
        Some(&mut self.sink)
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.shape.handle().into_iter().collect()
    }

    fn state(&self) -> PartState {
        PartState::Body
    }
}
