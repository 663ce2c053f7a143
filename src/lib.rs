//! Contraption - deterministic hamster-powered machines
//!
//! Core modules:
//! - `sim`: Physics adapter, contact dispatch, power transmission, machine and replay façade
//! - `components`: The concrete machine parts (bodies, pulleys, hamsters, ...)
//! - `machines`: Factories for the selectable machine variants
//! - `renderer`: Abstract drawing contract and a recording backend
//! - `assets`: Image resolution
//! - `settings`: Host configuration

pub mod assets;
pub mod components;
pub mod error;
pub mod machines;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;
pub use sim::{Machine, MachineSystem};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Default animation frame rate (frames per second)
    pub const DEFAULT_FRAME_RATE: f32 = 30.0;
    /// Default drawing scale
    pub const DEFAULT_PIXELS_PER_CENTIMETER: f32 = 1.5;

    /// Gravity in meters per second per second
    pub const GRAVITY: f32 = -9.8;
    /// Velocity solver iterations per physics step
    pub const VELOCITY_ITERATIONS: usize = 6;
    /// Position correction iterations per physics step
    pub const POSITION_ITERATIONS: usize = 2;

    /// Machine geometry is authored in centimeters, the physics world runs in meters
    pub const CENTIMETERS_PER_METER: f32 = 100.0;

    /// Variant used when an unsupported machine number is requested
    pub const DEFAULT_MACHINE: u32 = 1;
    /// Highest supported machine number
    pub const MAX_MACHINE: u32 = 2;
}

/// Convert a machine-space point (centimeters) to physics space (meters)
#[inline]
pub fn to_meters(v: Vec2) -> Vec2 {
    v / consts::CENTIMETERS_PER_METER
}

/// Convert a physics-space point (meters) to machine space (centimeters)
#[inline]
pub fn to_centimeters(v: Vec2) -> Vec2 {
    v * consts::CENTIMETERS_PER_METER
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        let p = Vec2::new(250.0, -15.0);
        assert_eq!(to_meters(p), Vec2::new(2.5, -0.15));
        assert!((to_centimeters(to_meters(p)) - p).length() < 1e-4);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
