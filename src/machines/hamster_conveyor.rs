//! Hamster driving a conveyor through a belted pair of pulleys

use glam::Vec2;

use super::pulley;
use crate::assets::AssetSource;
use crate::components::{Body, Conveyor, Hamster};
use crate::error::ConfigError;
use crate::renderer::{Shape, Sprite};
use crate::sim::{ComponentId, Machine, Part};

const BALL_RADIUS: f32 = 12.0;
const BALL_IMAGE: &str = "ball1.png";
/// Height above the conveyor position where a ball rests on the belt
const BALL_LIFT: f32 = 26.0;

/// Ids of the parts added by [`HamsterAndConveyor::build`]
#[derive(Debug, Clone, Copy)]
pub struct HamsterAndConveyor {
    pub hamster: ComponentId,
    pub conveyor: ComponentId,
    /// On the hamster shaft
    pub drive_pulley: ComponentId,
    /// On the conveyor shaft
    pub conveyor_pulley: ComponentId,
    conveyor_position: Vec2,
}

impl HamsterAndConveyor {
    /// Add a sleeping hamster at `hamster_position` whose wheel drives a
    /// conveyor at `conveyor_position`
    pub fn build(
        machine: &mut Machine,
        assets: &dyn AssetSource,
        hamster_position: Vec2,
        conveyor_position: Vec2,
    ) -> Result<Self, ConfigError> {
        let mut hamster = Hamster::new(assets)?;
        hamster.set_position(hamster_position);
        let hamster_shaft = hamster.shaft_position();
        let hamster = machine.add(hamster);

        let mut conveyor = Conveyor::new(assets)?;
        conveyor.set_position(conveyor_position);
        let conveyor_shaft = conveyor.shaft_position();
        let conveyor = machine.add(conveyor);

        let drive_pulley = machine.add(pulley(assets, hamster_shaft)?);
        machine.connect(hamster, drive_pulley)?;

        let conveyor_pulley = machine.add(pulley(assets, conveyor_shaft)?);
        machine.drive_pulley(drive_pulley, conveyor_pulley)?;
        machine.connect(conveyor_pulley, conveyor)?;

        Ok(Self {
            hamster,
            conveyor,
            drive_pulley,
            conveyor_pulley,
            conveyor_position,
        })
    }

    /// The hamster, for setting speed or waking it
    pub fn hamster_mut<'a>(&self, machine: &'a mut Machine) -> Option<&'a mut Hamster> {
        machine.part_mut(self.hamster).and_then(Part::as_hamster_mut)
    }

    /// Drop a ball onto the belt; `placement` runs left (negative) to right
    pub fn add_ball(
        &self,
        machine: &mut Machine,
        assets: &dyn AssetSource,
        placement: f32,
    ) -> Result<ComponentId, ConfigError> {
        let mut ball = Body::new(Sprite::image(
            Shape::circle(BALL_RADIUS),
            assets.image(BALL_IMAGE)?,
        ))?;
        ball.set_initial_position(self.conveyor_position + Vec2::new(placement, BALL_LIFT));
        ball.set_dynamic();
        ball.set_physics(2.0, 0.5, 0.1);
        Ok(machine.add(ball))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::components::hamster;
    use crate::sim::Component;

    #[test]
    fn test_pulleys_sit_on_shafts_and_belt() {
        let mut machine = Machine::new(1);
        let built = HamsterAndConveyor::build(
            &mut machine,
            &VirtualAssets,
            Vec2::new(-200.0, 0.0),
            Vec2::new(0.0, 150.0),
        )
        .unwrap();

        let drive = machine.part(built.drive_pulley).and_then(Part::as_pulley).unwrap();
        assert_eq!(drive.position(), Vec2::new(-200.0, 0.0) + hamster::SHAFT_OFFSET);
        assert_eq!(drive.belt(), Some(built.conveyor_pulley));

        let driven = machine.part(built.conveyor_pulley).and_then(Part::as_pulley).unwrap();
        let conveyor = machine.part(built.conveyor).and_then(Part::as_conveyor).unwrap();
        assert_eq!(driven.position(), conveyor.shaft_position());
        assert_eq!(driven.source().unwrap().sinks(), &[built.conveyor]);
    }

    #[test]
    fn test_ball_lands_on_belt_and_rides_it() {
        let mut machine = Machine::new(1);
        let built = HamsterAndConveyor::build(
            &mut machine,
            &VirtualAssets,
            Vec2::new(-200.0, 0.0),
            Vec2::new(0.0, 150.0),
        )
        .unwrap();
        let hamster = built.hamster_mut(&mut machine).unwrap();
        hamster.set_initially_running(true);
        hamster.set_speed(2.0);
        let ball = built.add_ball(&mut machine, &VirtualAssets, -40.0).unwrap();

        machine.reset();
        for _ in 0..10 {
            machine.update(1.0 / 30.0);
        }

        let body = machine.part(ball).and_then(Part::as_body).unwrap();
        let state = body.shape().state(machine.world()).unwrap();
        assert!(state.position.x > -40.0, "ball did not move: {state:?}");
        assert!(state.linear_velocity.x > 0.0);
    }
}
