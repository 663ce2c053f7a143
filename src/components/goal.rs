//! Goal: post, backboard and a scoreboard
//!
//! The post is solid. The target inside the net is a sensor, so balls pass
//! through it and every new overlap scores.

use glam::Vec2;

use crate::assets::AssetSource;
use crate::error::ConfigError;
use crate::renderer::{Color, Font, Graphics, Rect, Shape, Sprite};
use crate::sim::{
    BodyHandle, Component, ComponentBase, Contact, ContactHandler, ContactListener,
    ContactResponse, DrawContext, PartState, PhysicsShape, PhysicsWorld,
};

/// Points per goal
pub const GOAL_POINTS: u32 = 2;
/// Drawn goal image size (cm)
pub const GOAL_SIZE: Vec2 = Vec2::new(65.0, 247.0);
/// Solid post, relative to the goal position
pub const POST_SIZE: Vec2 = Vec2::new(10.0, 250.0);
pub const POST_OFFSET: Vec2 = Vec2::new(22.0, 0.0);
/// Scoring target inside the net, relative to the goal position
pub const TARGET_SIZE: Vec2 = Vec2::new(20.0, 5.0);
pub const TARGET_OFFSET: Vec2 = Vec2::new(-12.0, 165.0);

const SCOREBOARD_COLOR: Color = Color::rgb(24, 69, 59);
/// Scoreboard rectangle relative to the goal position
const SCOREBOARD: Rect = Rect::new(5.0, 280.0, 30.0, 20.0);
/// Score text anchor relative to the goal position
const SCORE_TEXT: Vec2 = Vec2::new(9.0, 299.0);
const SCORE_FONT: Font = Font {
    size: 20.0,
    bold: true,
};
const GOAL_IMAGE: &str = "goal.png";

/// Two base-ten digits of `score`
pub fn scoreboard_text(score: u32) -> String {
    format!("{}{}", score / 10 % 10, score % 10)
}

#[derive(Debug, Clone)]
pub struct Goal {
    base: ComponentBase,
    position: Vec2,
    sprite: Sprite,
    post: PhysicsShape,
    target: PhysicsShape,
    score: u32,
}

impl Goal {
    pub fn new(assets: &dyn AssetSource) -> Result<Self, ConfigError> {
        let mut target = PhysicsShape::new(Sprite::colored(
            Shape::bottom_centered_rectangle(TARGET_SIZE.x, TARGET_SIZE.y),
            Color::BLUE,
        ));
        target.set_sensor();
        Ok(Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            sprite: Sprite::image(
                Shape::bottom_centered_rectangle(GOAL_SIZE.x, GOAL_SIZE.y),
                assets.image(GOAL_IMAGE)?,
            ),
            post: PhysicsShape::new(Sprite::colored(
                Shape::bottom_centered_rectangle(POST_SIZE.x, POST_SIZE.y),
                Color::BLUE,
            )),
            target,
            score: 0,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.post.set_initial_position(position + POST_OFFSET);
        self.target.set_initial_position(position + TARGET_OFFSET);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Handle of the scoring target in the current world
    pub fn target(&self) -> Option<BodyHandle> {
        self.target.handle()
    }
}

impl Component for Goal {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, _ctx: &DrawContext) {
        self.sprite.draw(gfx, self.position, 0.0);
        gfx.fill_rect(SCOREBOARD.offset(self.position), SCOREBOARD_COLOR);

        let anchor = self.position + SCORE_TEXT;
        gfx.push_state();
        gfx.translate(anchor.x, anchor.y);
        gfx.scale(1.0, -1.0);
        gfx.draw_text(
            &scoreboard_text(self.score),
            Vec2::ZERO,
            SCORE_FONT,
            Color::WHITE,
        );
        gfx.pop_state();
    }

    fn install_physics(&mut self, world: &mut PhysicsWorld) {
        self.target.install(world);
        self.post.install(world);
    }

    fn add_contact_listener(&self, listener: &mut ContactListener) {
        if let (Some(body), Some(id)) = (self.target.handle(), self.base.id()) {
            listener.add(body, id);
        }
    }

    fn reset_component(&mut self) {
        self.score = 0;
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        [&self.target, &self.post]
            .iter()
            .filter_map(|shape| shape.handle())
            .collect()
    }

    fn state(&self) -> PartState {
        PartState::Goal { score: self.score }
    }
}

impl ContactHandler for Goal {
    fn begin_contact(&mut self, _contact: &Contact) -> Option<ContactResponse> {
        self.score += GOAL_POINTS;
        log::debug!("Goal {:?} scored, now {}", self.base.id(), self.score);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::renderer::DrawList;
    use proptest::prelude::*;

    fn goal_with_contact() -> (Goal, Contact) {
        let mut goal = Goal::new(&VirtualAssets).unwrap();
        let mut world = PhysicsWorld::new();
        goal.install_physics(&mut world);
        let target = goal.target().unwrap();
        let collider = world.colliders_of(target)[0];
        let contact = Contact {
            body: target,
            collider,
            other_body: None,
            other_collider: collider,
        };
        (goal, contact)
    }

    #[test]
    fn test_scoreboard_text() {
        assert_eq!(scoreboard_text(0), "00");
        assert_eq!(scoreboard_text(8), "08");
        assert_eq!(scoreboard_text(42), "42");
        assert_eq!(scoreboard_text(146), "46");
    }

    #[test]
    fn test_draws_score() {
        let (mut goal, contact) = goal_with_contact();
        for _ in 0..6 {
            goal.begin_contact(&contact);
        }
        let world = PhysicsWorld::new();
        let mut list = DrawList::new();
        goal.draw(
            &mut list,
            &DrawContext {
                world: &world,
                parts: &[],
            },
        );
        assert_eq!(list.texts(), vec!["12"]);
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_target_is_sensor_and_post_is_solid() {
        let goal = Goal::new(&VirtualAssets).unwrap();
        assert!(goal.target.is_sensor());
        assert!(!goal.post.is_sensor());
    }

    proptest! {
        #[test]
        fn test_each_begin_scores_two(n in 0u32..200) {
            let (mut goal, contact) = goal_with_contact();
            for _ in 0..n {
                goal.begin_contact(&contact);
            }
            prop_assert_eq!(goal.score(), 2 * n);
            let text = scoreboard_text(goal.score());
            prop_assert_eq!(text, format!("{}{}", (2 * n) / 10 % 10, (2 * n) % 10));
            goal.reset_component();
            prop_assert_eq!(goal.score(), 0);
        }
    }
}
