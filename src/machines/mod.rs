//! Machine variants
//!
//! Each variant is a factory: it lays out parts in centimeters (Y up, floor
//! top at Y = 0) and wires their transmission. Factories only configure; the
//! caller resets the machine before running it.

pub mod hamster_conveyor;
pub mod machine1;
pub mod machine2;

pub use hamster_conveyor::HamsterAndConveyor;

use glam::Vec2;

use crate::assets::AssetSource;
use crate::components::{Body, Pulley};
use crate::consts::{DEFAULT_MACHINE, MAX_MACHINE};
use crate::error::ConfigError;
use crate::renderer::{Shape, Sprite};
use crate::sim::Machine;

const FLOOR_WIDTH: f32 = 600.0;
const FLOOR_HEIGHT: f32 = 15.0;
const FLOOR_IMAGE: &str = "floor.png";
const BASKETBALL_RADIUS: f32 = 12.0;
const PULLEY_RADIUS: f32 = 10.0;
const PULLEY_IMAGE: &str = "pulley3.png";

/// Selectable machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    One,
    Two,
}

impl Variant {
    /// Variant for a host-supplied number; anything unsupported is machine 1
    pub fn from_number(number: i64) -> Self {
        match number {
            1 => Variant::One,
            2 => Variant::Two,
            other => {
                log::warn!(
                    "Machine {other} is not in 1..={MAX_MACHINE}, using machine {DEFAULT_MACHINE}"
                );
                Variant::One
            }
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Variant::One => 1,
            Variant::Two => 2,
        }
    }

    /// Lay out a fresh, not yet reset machine
    pub fn build(self, assets: &dyn AssetSource) -> Result<Machine, ConfigError> {
        match self {
            Variant::One => machine1::build(assets),
            Variant::Two => machine2::build(assets),
        }
    }
}

/// Static floor whose top edge is Y = 0
fn floor(assets: &dyn AssetSource) -> Result<Body, ConfigError> {
    Body::new(Sprite::image(
        Shape::rectangle(-FLOOR_WIDTH / 2.0, -FLOOR_HEIGHT, FLOOR_WIDTH, FLOOR_HEIGHT),
        assets.image(FLOOR_IMAGE)?,
    ))
}

/// Pulley centered on `position`
fn pulley(assets: &dyn AssetSource, position: Vec2) -> Result<Pulley, ConfigError> {
    let mut pulley = Pulley::new(PULLEY_RADIUS)?;
    pulley.set_image(assets.image(PULLEY_IMAGE)?);
    pulley.set_position(position);
    Ok(pulley)
}

/// Dynamic basketball
fn basketball(
    assets: &dyn AssetSource,
    image: &str,
    position: Vec2,
    restitution: f32,
) -> Result<Body, ConfigError> {
    let mut ball = Body::new(Sprite::image(
        Shape::circle(BASKETBALL_RADIUS),
        assets.image(image)?,
    ))?;
    ball.set_initial_position(position);
    ball.set_dynamic();
    ball.set_physics(1.0, 0.5, restitution);
    Ok(ball)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;

    #[test]
    fn test_numbers() {
        assert_eq!(Variant::from_number(1), Variant::One);
        assert_eq!(Variant::from_number(2), Variant::Two);
        assert_eq!(Variant::from_number(3), Variant::One);
        assert_eq!(Variant::from_number(0), Variant::One);
        assert_eq!(Variant::from_number(-1), Variant::One);
        assert_eq!(Variant::Two.number(), 2);
    }

    #[test]
    fn test_every_variant_builds() {
        for variant in [Variant::One, Variant::Two] {
            let mut machine = variant.build(&VirtualAssets).unwrap();
            assert_eq!(machine.number(), variant.number());
            machine.reset();
            machine.update(1.0 / 30.0);
        }
    }
}
