//! Banner unrolling from its roll
//!
//! Purely visual. The banner slides out of the roll a fixed distance per
//! tick until fully shown; drawing clips it so only the unrolled part shows.

use glam::Vec2;

use crate::assets::{AssetSource, Image};
use crate::error::ConfigError;
use crate::renderer::{Graphics, Rect};
use crate::sim::{Component, ComponentBase, DrawContext, PartState, Rotation};

/// Drawing scale relative to the image sizes
pub const BANNER_SCALE: f32 = 0.42;
pub const BANNER_WIDTH: f32 = 1024.0 * BANNER_SCALE;
pub const BANNER_HEIGHT: f32 = 150.0 * BANNER_SCALE;
pub const ROLL_WIDTH: f32 = 16.0 * BANNER_SCALE;
pub const ROLL_HEIGHT: f32 = 300.0 * BANNER_SCALE;
/// Distance unrolled per tick
pub const BANNER_SPEED: f32 = 4.0;
/// Shown before unrolling starts
pub const BANNER_MINIMUM: f32 = 15.0;

const BANNER_IMAGE: &str = "banner.png";
const ROLL_IMAGE: &str = "banner-roll.png";

#[derive(Debug, Clone)]
pub struct Banner {
    base: ComponentBase,
    /// Where the roll sits
    position: Vec2,
    banner: Image,
    roll: Image,
    /// Banner image offset from the roll; 0 when fully unrolled
    offset: f32,
}

impl Banner {
    pub fn new(assets: &dyn AssetSource) -> Result<Self, ConfigError> {
        Ok(Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            banner: assets.image(BANNER_IMAGE)?,
            roll: assets.image(ROLL_IMAGE)?,
            offset: Self::rolled_offset(),
        })
    }

    fn rolled_offset() -> f32 {
        BANNER_WIDTH - BANNER_MINIMUM
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.offset = Self::rolled_offset();
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// How much of the banner is showing
    pub fn exposed(&self) -> f32 {
        BANNER_WIDTH - self.offset
    }

    pub fn is_unrolled(&self) -> bool {
        self.offset == 0.0
    }
}

impl Component for Banner {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn draw(&self, gfx: &mut dyn Graphics, _ctx: &DrawContext) {
        gfx.push_state();
        gfx.translate(self.position.x, self.position.y);
        gfx.scale(BANNER_SCALE, -BANNER_SCALE);
        gfx.clip(Rect::new(ROLL_WIDTH, 0.0, BANNER_WIDTH, BANNER_HEIGHT));
        gfx.draw_bitmap(
            &self.banner,
            Rect::new(self.offset, 0.0, BANNER_WIDTH, BANNER_HEIGHT),
        );
        gfx.draw_bitmap(
            &self.roll,
            Rect::new(BANNER_WIDTH, -BANNER_HEIGHT / 2.0, ROLL_WIDTH, ROLL_HEIGHT),
        );
        gfx.pop_state();
    }

    fn update_time(&mut self, dt: f32) -> Option<Rotation> {
        self.base.advance(dt);
        self.offset = (self.offset - BANNER_SPEED).max(0.0);
        None
    }

    fn reset_component(&mut self) {
        self.offset = Self::rolled_offset();
    }

    fn state(&self) -> PartState {
        PartState::Banner {
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::PhysicsWorld;

    #[test]
    fn test_unrolls_and_clamps() {
        let mut banner = Banner::new(&VirtualAssets).unwrap();
        banner.set_position(Vec2::new(100.0, 350.0));
        assert!((banner.exposed() - BANNER_MINIMUM).abs() < 1e-3);

        banner.update_time(1.0 / 30.0);
        assert!((banner.exposed() - (BANNER_MINIMUM + BANNER_SPEED)).abs() < 1e-3);

        for _ in 0..200 {
            banner.update_time(1.0 / 30.0);
            assert!(banner.offset() >= 0.0);
        }
        assert!(banner.is_unrolled());

        banner.reset_component();
        assert_eq!(banner.offset(), BANNER_WIDTH - BANNER_MINIMUM);
    }

    #[test]
    fn test_draw_clips_to_banner() {
        let mut banner = Banner::new(&VirtualAssets).unwrap();
        banner.set_position(Vec2::new(100.0, 350.0));
        let world = PhysicsWorld::new();
        let mut list = DrawList::new();
        banner.draw(
            &mut list,
            &DrawContext {
                world: &world,
                parts: &[],
            },
        );
        assert!(list.commands.contains(&DrawCommand::Clip {
            rect: Rect::new(ROLL_WIDTH, 0.0, BANNER_WIDTH, BANNER_HEIGHT)
        }));
        assert_eq!(list.bitmaps(), vec!["banner.png", "banner-roll.png"]);
        assert_eq!(list.depth(), 0);
    }
}
