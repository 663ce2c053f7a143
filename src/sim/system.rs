//! Frame-replay façade
//!
//! The host asks for frame N; the system gets there by stepping forward with
//! a fixed `1 / frame_rate` step, rewinding through a full machine reset when
//! N lies behind the current frame. Any frame is therefore reached by one
//! path only: reset, then N fixed steps.

use glam::Vec2;

use super::machine::{Machine, MachineSnapshot};
use crate::assets::{AssetSource, ImageDirectory, VirtualAssets};
use crate::consts::{DEFAULT_FRAME_RATE, DEFAULT_MACHINE, DEFAULT_PIXELS_PER_CENTIMETER};
use crate::error::ConfigError;
use crate::machines::Variant;
use crate::renderer::Graphics;
use crate::settings::Settings;

/// Host-facing machine player
pub struct MachineSystem {
    assets: Box<dyn AssetSource>,
    machine: Machine,
    frame: u32,
    frame_rate: f32,
    location: Vec2,
    pixels_per_centimeter: f32,
    /// Host timeline frame at which the machine leaves frame 0
    start_frame: u32,
    /// Host wall time, seconds
    time: f64,
    /// Simulated state no longer matches the frame counter
    stale: bool,
}

impl MachineSystem {
    /// Machine 1 at frame 0
    pub fn new(assets: Box<dyn AssetSource>) -> Result<Self, ConfigError> {
        Self::with_variant(assets, Variant::from_number(DEFAULT_MACHINE as i64))
    }

    /// Apply host settings: variant, frame rate, placement and timeline
    /// start. The machine stays at frame 0.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let assets: Box<dyn AssetSource> = match &settings.resources_dir {
            Some(dir) => Box::new(ImageDirectory::new(dir)),
            None => Box::new(VirtualAssets),
        };
        let mut system = Self::with_variant(assets, Variant::from_number(settings.machine as i64))?;
        system.set_frame_rate(settings.frame_rate)?;
        system.set_pixels_per_centimeter(settings.pixels_per_centimeter)?;
        system.set_location(settings.location);
        system.set_start_frame(settings.start_frame);
        Ok(system)
    }

    fn with_variant(assets: Box<dyn AssetSource>, variant: Variant) -> Result<Self, ConfigError> {
        let mut machine = variant.build(assets.as_ref())?;
        machine.reset();
        log::info!("Machine {} ready with {} parts", machine.number(), machine.len());
        Ok(Self {
            assets,
            machine,
            frame: 0,
            frame_rate: DEFAULT_FRAME_RATE,
            location: Vec2::ZERO,
            pixels_per_centimeter: DEFAULT_PIXELS_PER_CENTIMETER,
            start_frame: 0,
            time: 0.0,
            stale: false,
        })
    }

    /// Replace the machine with variant `number` at frame 0. Unsupported
    /// numbers select machine 1. On error the current machine is kept.
    pub fn set_machine_number(&mut self, number: i64) -> Result<(), ConfigError> {
        let mut machine = Variant::from_number(number).build(self.assets.as_ref())?;
        machine.reset();
        log::info!("Machine {} ready with {} parts", machine.number(), machine.len());
        self.machine = machine;
        self.frame = 0;
        self.stale = false;
        Ok(())
    }

    pub fn machine_number(&self) -> u32 {
        self.machine.number()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Current frame
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Simulate to `frame`, rewinding through a reset if it lies behind
    pub fn set_frame(&mut self, frame: u32) {
        if frame < self.frame || self.stale {
            log::debug!(
                "Machine {} rewinding from frame {} for frame {frame}",
                self.machine.number(),
                self.frame
            );
            self.machine.reset();
            self.frame = 0;
            self.stale = false;
        }

        let dt = 1.0 / self.frame_rate;
        while self.frame < frame {
            self.machine.update(dt);
            self.frame += 1;
        }
    }

    /// Map a host timeline frame to a machine frame; the machine sits at
    /// frame 0 until the timeline reaches `start_frame`
    pub fn set_timeline_frame(&mut self, timeline_frame: u32, start_frame: u32) {
        self.set_frame(timeline_frame.saturating_sub(start_frame));
    }

    /// Timeline frame at which the machine starts running
    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    pub fn set_start_frame(&mut self, start_frame: u32) {
        self.start_frame = start_frame;
    }

    /// Follow the host timeline using the stored start frame
    pub fn set_timeline(&mut self, timeline_frame: u32) {
        self.set_timeline_frame(timeline_frame, self.start_frame);
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Change the step size; the next `set_frame` replays from reset
    pub fn set_frame_rate(&mut self, frame_rate: f32) -> Result<(), ConfigError> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(frame_rate));
        }
        if frame_rate != self.frame_rate {
            self.frame_rate = frame_rate;
            self.stale = true;
        }
        Ok(())
    }

    /// Seconds of machine time at the current frame
    pub fn machine_time(&self) -> f32 {
        self.frame as f32 / self.frame_rate
    }

    /// Where machine origin lands in host drawing space
    pub fn location(&self) -> Vec2 {
        self.location
    }

    pub fn set_location(&mut self, location: Vec2) {
        self.location = location;
    }

    pub fn pixels_per_centimeter(&self) -> f32 {
        self.pixels_per_centimeter
    }

    pub fn set_pixels_per_centimeter(&mut self, scale: f32) -> Result<(), ConfigError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::InvalidScale(scale));
        }
        self.pixels_per_centimeter = scale;
        Ok(())
    }

    /// Accumulate host wall time (not machine time)
    pub fn update_time(&mut self, elapsed: f64) {
        self.time += elapsed;
    }

    pub fn elapsed(&self) -> f64 {
        self.time
    }

    /// Draw at the current location and scale, Y up
    pub fn draw(&self, gfx: &mut dyn Graphics) {
        gfx.push_state();
        gfx.translate(self.location.x, self.location.y);
        gfx.scale(self.pixels_per_centimeter, -self.pixels_per_centimeter);
        self.machine.draw(gfx);
        gfx.pop_state();
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        self.machine.snapshot()
    }
}
