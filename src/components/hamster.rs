//! Hamster: the motor
//!
//! A hamster in a wheel inside a cage. While running, the wheel advances by
//! the hamster's speed and the angle and speed are pushed through the
//! hamster's rotation source every tick. A sleeping hamster pushes a stopped
//! drive, which holds downstream belts still without clearing pulley speeds.
//! Anything touching the cage wakes it.

use glam::Vec2;

use super::turns_to_radians;
use crate::assets::{AssetSource, Image};
use crate::error::ConfigError;
use crate::renderer::{Graphics, Shape, Sprite};
use crate::sim::{
    BodyHandle, Component, ComponentBase, Contact, ContactHandler, ContactListener,
    ContactResponse, DrawContext, PartState, PhysicsShape, PhysicsWorld, Rotation,
    RotationSource,
};

/// Cage size (cm)
pub const CAGE_SIZE: Vec2 = Vec2::new(75.0, 50.0);
/// Wheel diameter (cm)
pub const WHEEL_SIZE: f32 = 45.0;
/// Hamster image size (cm)
pub const HAMSTER_SIZE: f32 = 45.0;
/// Wheel center relative to the bottom center of the cage
pub const WHEEL_CENTER: Vec2 = Vec2::new(-12.0, 24.0);
/// Output shaft relative to the bottom center of the cage
pub const SHAFT_OFFSET: Vec2 = Vec2::new(25.0, 40.0);
/// Turns per second unless told otherwise
pub const DEFAULT_SPEED: f32 = 1.0;
/// Wheel turns per pass through the run animation
pub const RUN_CYCLE: f32 = 0.25;
/// Images per run cycle (1, 2, 3, 2)
const RUN_PHASES: f32 = 4.0;

const CAGE_IMAGE: &str = "hamster-cage.png";
const WHEEL_IMAGE: &str = "hamster-wheel.png";
/// Sleeping, then the three running frames
const HAMSTER_IMAGES: [&str; 4] = [
    "hamster-sleep.png",
    "hamster-run-1.png",
    "hamster-run-2.png",
    "hamster-run-3.png",
];

#[derive(Debug, Clone)]
pub struct Hamster {
    base: ComponentBase,
    position: Vec2,
    cage: PhysicsShape,
    wheel: Sprite,
    hamsters: Vec<Sprite>,
    source: RotationSource,
    speed: f32,
    /// Turns
    rotation: f32,
    running: bool,
    initially_running: bool,
}

impl Hamster {
    /// A sleeping hamster at the origin
    pub fn new(assets: &dyn AssetSource) -> Result<Self, ConfigError> {
        let cage = Sprite::image(
            Shape::bottom_centered_rectangle(CAGE_SIZE.x, CAGE_SIZE.y),
            assets.image(CAGE_IMAGE)?,
        );
        let wheel = Sprite::image(Shape::centered_square(WHEEL_SIZE), assets.image(WHEEL_IMAGE)?);
        let hamsters = HAMSTER_IMAGES
            .iter()
            .map(|name| {
                assets.image(name).map(|image: Image| {
                    Sprite::image(
                        Shape::bottom_centered_rectangle(HAMSTER_SIZE, HAMSTER_SIZE),
                        image,
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            cage: PhysicsShape::new(cage),
            wheel,
            hamsters,
            source: RotationSource::new(),
            speed: DEFAULT_SPEED,
            rotation: 0.0,
            running: false,
            initially_running: false,
        })
    }

    /// Bottom center of the cage
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.cage.set_initial_position(position);
    }

    /// Where a pulley driven by this hamster goes
    pub fn shaft_position(&self) -> Vec2 {
        self.position + SHAFT_OFFSET
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Turns per second; negative runs the other way
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_initially_running(&mut self, running: bool) {
        self.initially_running = running;
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Which hamster image shows: 0 while asleep, otherwise 1, 2, 3, 2 over
    /// each run cycle
    pub fn frame(&self) -> usize {
        if !self.running {
            return 0;
        }
        let phase = self.rotation.abs() % RUN_CYCLE;
        let step = RUN_CYCLE / RUN_PHASES;
        if phase <= step {
            1
        } else if phase <= step * 2.0 {
            2
        } else if phase <= step * 3.0 {
            3
        } else {
            2
        }
    }
}

impl Component for Hamster {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, ctx: &DrawContext) {
        self.cage.draw(gfx, ctx.world);

        let wheel_center = self.position + WHEEL_CENTER;
        self.wheel
            .draw(gfx, wheel_center, turns_to_radians(self.rotation));

        gfx.push_state();
        gfx.translate(wheel_center.x, wheel_center.y);
        if self.speed < 0.0 {
            gfx.scale(-1.0, 1.0);
        }
        if let Some(hamster) = self.hamsters.get(self.frame()) {
            hamster.draw(gfx, Vec2::new(0.0, -WHEEL_CENTER.y), 0.0);
        }
        gfx.pop_state();
    }

    fn update_time(&mut self, dt: f32) -> Option<Rotation> {
        self.base.advance(dt);
        if !self.running {
            self.rotation = 0.0;
            return Some(Rotation::new(0.0, 0.0));
        }
        self.rotation -= self.speed * dt;
        Some(Rotation::new(self.rotation, -self.speed))
    }

    fn install_physics(&mut self, world: &mut PhysicsWorld) {
        self.cage.install(world);
    }

    fn add_contact_listener(&self, listener: &mut ContactListener) {
        if let (Some(body), Some(id)) = (self.cage.handle(), self.base.id()) {
            listener.add(body, id);
        }
    }

    fn reset_component(&mut self) {
        self.running = self.initially_running;
        self.rotation = 0.0;
    }

    fn source(&self) -> Option<&RotationSource> {
        Some(&self.source)
    }

    fn source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.cage.handle().into_iter().collect()
    }

    fn state(&self) -> PartState {
        PartState::Hamster {
            running: self.running,
            rotation: self.rotation,
            speed: self.speed,
        }
    }
}

impl ContactHandler for Hamster {
    fn begin_contact(&mut self, _contact: &Contact) -> Option<ContactResponse> {
        if !self.running {
            log::debug!("Hamster {:?} woke up", self.base.id());
        }
        self.running = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::renderer::DrawList;

    fn hamster() -> Hamster {
        Hamster::new(&VirtualAssets).unwrap()
    }

    #[test]
    fn test_sleeping_hamster_drives_stopped() {
        let mut h = hamster();
        assert_eq!(h.update_time(0.1), Some(Rotation::new(0.0, 0.0)));
        assert_eq!(h.frame(), 0);
    }

    #[test]
    fn test_running_hamster_turns_backwards() {
        let mut h = hamster();
        h.set_initially_running(true);
        h.set_speed(2.0);
        h.update_time(0.25);
        let r = h.update_time(0.25).unwrap();
        assert!((r.angle + 1.0).abs() < 1e-6);
        assert_eq!(r.speed, -2.0);
    }

    #[test]
    fn test_run_frames_cycle() {
        let mut h = hamster();
        h.set_initially_running(true);
        h.set_speed(1.0);
        let mut frames = Vec::new();
        for _ in 0..8 {
            h.update_time(0.03125);
            frames.push(h.frame());
        }
        assert_eq!(frames, vec![1, 1, 2, 2, 3, 3, 2, 1]);
    }

    #[test]
    fn test_contact_wakes_and_reset_restores_sleep() {
        let mut h = hamster();
        let mut world = PhysicsWorld::new();
        h.install_physics(&mut world);
        let body = h.bodies()[0];
        let contact = Contact {
            body,
            collider: world.colliders_of(body)[0],
            other_body: None,
            other_collider: world.colliders_of(body)[0],
        };
        h.begin_contact(&contact);
        assert!(h.is_running());
        h.update_time(0.5);
        assert!(h.rotation() != 0.0);

        h.reset_component();
        assert!(!h.is_running());
        assert_eq!(h.rotation(), 0.0);
    }

    #[test]
    fn test_shaft_follows_position() {
        let mut h = hamster();
        h.set_position(Vec2::new(-250.0, 0.0));
        assert_eq!(h.shaft_position(), Vec2::new(-225.0, 40.0));
    }

    #[test]
    fn test_reverse_hamster_is_mirrored() {
        let mut h = hamster();
        h.set_speed(-2.0);
        let world = PhysicsWorld::new();
        let mut list = DrawList::new();
        h.draw(
            &mut list,
            &DrawContext {
                world: &world,
                parts: &[],
            },
        );
        assert!(list
            .commands
            .contains(&crate::renderer::DrawCommand::Scale { sx: -1.0, sy: 1.0 }));
        assert!(list.bitmaps().contains(&"hamster-sleep.png"));
        assert_eq!(list.depth(), 0);
    }
}
