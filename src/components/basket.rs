//! Basket: catch a ball, hold it, shoot it out

use glam::Vec2;

use crate::assets::AssetSource;
use crate::error::ConfigError;
use crate::renderer::{Color, Graphics, Shape, Sprite};
use crate::sim::{
    BodyHandle, Component, ComponentBase, Contact, ContactHandler, ContactListener,
    ContactResponse, DrawContext, PartState, PhysicsShape, PhysicsWorld, Rotation,
};

/// Width and wall height (cm)
pub const BASKET_SIZE: f32 = 40.0;
/// Seconds a ball rests before it is shot out
pub const BASKET_DELAY: f32 = 1.0;
/// Launch velocity (m/s) unless overridden
pub const BASKET_SHOT: Vec2 = Vec2::new(1.0, 7.0);
const SIDE_THICKNESS: f32 = 4.0;
const BOTTOM_THICKNESS: f32 = 9.0;
const BASKET_IMAGE: &str = "basket.png";

#[derive(Debug, Clone)]
pub struct Basket {
    base: ComponentBase,
    position: Vec2,
    sprite: Sprite,
    bottom: PhysicsShape,
    left: PhysicsShape,
    right: PhysicsShape,
    shot: Vec2,
    resting: bool,
    time_in_basket: f32,
}

impl Basket {
    pub fn new(assets: &dyn AssetSource) -> Result<Self, ConfigError> {
        let wall = || {
            PhysicsShape::new(Sprite::colored(
                Shape::bottom_centered_rectangle(SIDE_THICKNESS, BASKET_SIZE),
                Color::BLUE,
            ))
        };
        Ok(Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            sprite: Sprite::image(
                Shape::bottom_centered_rectangle(BASKET_SIZE, BASKET_SIZE),
                assets.image(BASKET_IMAGE)?,
            ),
            bottom: PhysicsShape::new(Sprite::colored(
                Shape::bottom_centered_rectangle(BASKET_SIZE, BOTTOM_THICKNESS),
                Color::BLUE,
            )),
            left: wall(),
            right: wall(),
            shot: BASKET_SHOT,
            resting: false,
            time_in_basket: 0.0,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.bottom.set_initial_position(position);
        self.left
            .set_initial_position(position - Vec2::new(BASKET_SIZE / 2.0, 0.0));
        self.right
            .set_initial_position(position + Vec2::new(BASKET_SIZE / 2.0, 0.0));
    }

    pub fn shot(&self) -> Vec2 {
        self.shot
    }

    /// Launch velocity in meters per second
    pub fn set_shot(&mut self, shot: Vec2) {
        self.shot = shot;
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn time_in_basket(&self) -> f32 {
        self.time_in_basket
    }
}

impl Component for Basket {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, _ctx: &DrawContext) {
        self.sprite.draw(gfx, self.position, 0.0);
    }

    fn update_time(&mut self, dt: f32) -> Option<Rotation> {
        self.base.advance(dt);
        if self.resting {
            self.time_in_basket += dt;
        }
        None
    }

    fn install_physics(&mut self, world: &mut PhysicsWorld) {
        self.bottom.install(world);
        self.right.install(world);
        self.left.install(world);
    }

    fn add_contact_listener(&self, listener: &mut ContactListener) {
        if let (Some(body), Some(id)) = (self.bottom.handle(), self.base.id()) {
            listener.add(body, id);
        }
    }

    fn reset_component(&mut self) {
        self.resting = false;
        self.time_in_basket = 0.0;
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        [&self.bottom, &self.right, &self.left]
            .iter()
            .filter_map(|shape| shape.handle())
            .collect()
    }

    fn state(&self) -> PartState {
        PartState::Basket {
            resting: self.resting,
            time_in_basket: self.time_in_basket,
        }
    }
}

impl ContactHandler for Basket {
    fn pre_solve(&mut self, contact: &Contact) -> Option<ContactResponse> {
        self.resting = true;
        if self.time_in_basket < BASKET_DELAY {
            return None;
        }
        self.resting = false;
        self.time_in_basket = 0.0;
        contact.other_body.map(|body| ContactResponse::SetVelocity {
            body,
            velocity: self.shot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;

    fn contact_on(basket: &mut Basket, world: &mut PhysicsWorld) -> Contact {
        basket.install_physics(world);
        let body = basket.bodies()[0];
        let ball = basket.bodies()[1];
        Contact {
            body,
            collider: world.colliders_of(body)[0],
            other_body: Some(ball),
            other_collider: world.colliders_of(ball)[0],
        }
    }

    #[test]
    fn test_catch_hold_and_eject_once() {
        let mut basket = Basket::new(&VirtualAssets).unwrap();
        let mut world = PhysicsWorld::new();
        let contact = contact_on(&mut basket, &mut world);

        let mut shots = 0;
        for _ in 0..4 {
            if basket.pre_solve(&contact).is_some() {
                shots += 1;
            }
            basket.update_time(0.25);
        }
        assert!(basket.is_resting());
        assert_eq!(basket.time_in_basket(), BASKET_DELAY);

        let response = basket.pre_solve(&contact);
        assert_eq!(
            response,
            Some(ContactResponse::SetVelocity {
                body: contact.other_body.unwrap(),
                velocity: BASKET_SHOT
            })
        );
        shots += 1;
        assert!(!basket.is_resting());
        assert_eq!(basket.time_in_basket(), 0.0);
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_timer_only_runs_while_resting() {
        let mut basket = Basket::new(&VirtualAssets).unwrap();
        basket.update_time(2.0);
        assert_eq!(basket.time_in_basket(), 0.0);
        assert_eq!(basket.base().time(), 2.0);
    }

    #[test]
    fn test_walls_follow_position() {
        let mut basket = Basket::new(&VirtualAssets).unwrap();
        basket.set_position(Vec2::new(270.0, 0.0));
        basket.set_shot(Vec2::new(-1.0, 8.0));
        let mut world = PhysicsWorld::new();
        basket.install_physics(&mut world);
        let xs: Vec<f32> = basket
            .bodies()
            .iter()
            .map(|b| world.position(*b).unwrap().x.round())
            .collect();
        assert_eq!(xs, vec![270.0, 290.0, 250.0]);
        assert_eq!(basket.shot(), Vec2::new(-1.0, 8.0));
    }
}
