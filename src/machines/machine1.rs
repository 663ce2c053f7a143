//! Machine 1: a falling basketball wakes a hamster that runs a conveyor

use glam::Vec2;

use super::{HamsterAndConveyor, basketball, floor};
use crate::assets::AssetSource;
use crate::components::Goal;
use crate::error::ConfigError;
use crate::sim::Machine;

const HAMSTER: Vec2 = Vec2::new(-211.0, 0.0);
const CONVEYOR: Vec2 = Vec2::new(-30.0, 150.0);
const HAMSTER_SPEED: f32 = 3.0;

pub fn build(assets: &dyn AssetSource) -> Result<Machine, ConfigError> {
    let mut machine = Machine::new(1);

    machine.add(floor(assets)?);

    // Dropped straight onto the sleeping hamster's cage
    machine.add(basketball(
        assets,
        "basketball1.png",
        Vec2::new(HAMSTER.x, 353.0),
        0.6,
    )?);

    let drive = HamsterAndConveyor::build(&mut machine, assets, HAMSTER, CONVEYOR)?;
    if let Some(hamster) = drive.hamster_mut(&mut machine) {
        hamster.set_speed(HAMSTER_SPEED);
    }
    drive.add_ball(&mut machine, assets, -40.0)?;

    let mut goal = Goal::new(assets)?;
    goal.set_position(Vec2::new(270.0, 0.0));
    machine.add(goal);

    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::sim::Part;

    #[test]
    fn test_ball_wakes_hamster() {
        let mut machine = build(&VirtualAssets).unwrap();
        machine.reset();

        let hamster_running = |machine: &Machine| {
            machine
                .parts()
                .iter()
                .find_map(Part::as_hamster)
                .map(|h| h.is_running())
                .unwrap()
        };
        assert!(!hamster_running(&machine));

        for _ in 0..90 {
            machine.update(1.0 / 30.0);
        }
        assert!(hamster_running(&machine));
    }
}
