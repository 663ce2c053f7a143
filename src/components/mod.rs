//! Concrete machine parts
//!
//! Positions are in centimeters with Y up. Rotation angles are in turns
//! (1.0 is one revolution) and speeds in turns per second.

pub mod banner;
pub mod basket;
pub mod body;
pub mod conveyor;
pub mod goal;
pub mod hamster;
pub mod pulley;

pub use banner::Banner;
pub use basket::Basket;
pub use body::Body;
pub use conveyor::Conveyor;
pub use goal::Goal;
pub use hamster::Hamster;
pub use pulley::Pulley;

use std::f32::consts::TAU;

/// Turns to radians
#[inline]
pub fn turns_to_radians(turns: f32) -> f32 {
    turns * TAU
}
