//! Machine 2: two hamsters, two conveyors, three baskets and a banner

use glam::Vec2;

use super::{basketball, floor, pulley};
use crate::assets::AssetSource;
use crate::components::{Banner, Basket, Body, Conveyor, Goal, Hamster};
use crate::error::ConfigError;
use crate::renderer::{Shape, Sprite};
use crate::sim::Machine;

pub fn build(assets: &dyn AssetSource) -> Result<Machine, ConfigError> {
    let mut machine = Machine::new(2);

    machine.add(floor(assets)?);

    let mut banner = Banner::new(assets)?;
    banner.set_position(Vec2::new(100.0, 350.0));
    machine.add(banner);

    let mut wedge = Body::new(Sprite::image(
        Shape::polygon(vec![
            Vec2::new(-25.0, 0.0),
            Vec2::new(25.0, 0.0),
            Vec2::new(25.0, 4.5),
            Vec2::new(-25.0, 25.0),
        ]),
        assets.image("wedge.png")?,
    ))?;
    wedge.set_initial_position(Vec2::new(-90.0, 320.0));
    machine.add(wedge);

    machine.add(basketball(assets, "basketball1.png", Vec2::new(145.0, 100.0), 0.6)?);
    machine.add(basketball(assets, "basketball1.png", Vec2::new(-250.0, 200.0), 0.7)?);
    machine.add(basketball(assets, "basketball2.png", Vec2::new(-90.0, 360.0), 0.72)?);

    let mut basket = Basket::new(assets)?;
    basket.set_position(Vec2::new(145.0, 0.0));
    machine.add(basket);

    let mut goal = Goal::new(assets)?;
    goal.set_position(Vec2::new(270.0, 0.0));
    machine.add(goal);

    let mut hamster = Hamster::new(assets)?;
    hamster.set_position(Vec2::new(-250.0, 0.0));
    hamster.set_initially_running(true);
    let hamster_shaft = hamster.shaft_position();
    let hamster = machine.add(hamster);

    let mut basket2 = Basket::new(assets)?;
    basket2.set_position(Vec2::new(-250.0, 50.0));
    machine.add(basket2);

    let mut basket3 = Basket::new(assets)?;
    basket3.set_position(Vec2::new(270.0, 0.0));
    basket3.set_shot(Vec2::new(-1.0, 8.0));
    machine.add(basket3);

    let pulley1 = machine.add(pulley(assets, hamster_shaft)?);
    machine.connect(hamster, pulley1)?;

    let mut conveyor = Conveyor::new(assets)?;
    conveyor.set_position(Vec2::new(-100.0, 200.0));
    let conveyor_shaft = conveyor.shaft_position();
    let conveyor = machine.add(conveyor);

    let pulley2 = machine.add(pulley(assets, conveyor_shaft)?);
    machine.drive_pulley(pulley1, pulley2)?;
    machine.connect(pulley2, conveyor)?;

    let mut conveyor2 = Conveyor::new(assets)?;
    conveyor2.set_position(Vec2::new(0.0, 300.0));
    let conveyor2_shaft = conveyor2.shaft_position();
    let conveyor2 = machine.add(conveyor2);

    let pulley3 = machine.add(pulley(assets, conveyor2_shaft)?);
    machine.drive_pulley(pulley2, pulley3)?;
    machine.connect(pulley3, conveyor2)?;

    // Runs backwards and drives nothing but its own pulley
    let mut hamster2 = Hamster::new(assets)?;
    hamster2.set_position(Vec2::new(-2.0, 0.0));
    hamster2.set_speed(-2.0);
    let hamster2_shaft = hamster2.shaft_position();
    let hamster2 = machine.add(hamster2);

    let pulley4 = machine.add(pulley(assets, hamster2_shaft)?);
    machine.connect(hamster2, pulley4)?;

    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;
    use crate::sim::Part;

    #[test]
    fn test_layout() {
        let machine = build(&VirtualAssets).unwrap();
        let count = |f: fn(&Part) -> bool| machine.parts().iter().filter(|p| f(p)).count();
        assert_eq!(count(|p| p.as_hamster().is_some()), 2);
        assert_eq!(count(|p| p.as_conveyor().is_some()), 2);
        assert_eq!(count(|p| p.as_pulley().is_some()), 4);
        assert_eq!(count(|p| p.as_basket().is_some()), 3);
        assert_eq!(count(|p| p.as_goal().is_some()), 1);
        assert_eq!(count(|p| p.as_banner().is_some()), 1);
    }

    #[test]
    fn test_conveyors_start_moving() {
        let mut machine = build(&VirtualAssets).unwrap();
        machine.reset();
        for _ in 0..10 {
            machine.update(1.0 / 30.0);
        }
        for conveyor in machine.parts().iter().filter_map(Part::as_conveyor) {
            // Hamster broadcasts -1 turn/s, so both belts carry right
            assert!((conveyor.speed() - 1.0).abs() < 1e-6, "{}", conveyor.speed());
        }
    }

    #[test]
    fn test_banner_unrolls() {
        let mut machine = build(&VirtualAssets).unwrap();
        machine.reset();
        for _ in 0..150 {
            machine.update(1.0 / 30.0);
        }
        let banner = machine.parts().iter().find_map(Part::as_banner).unwrap();
        assert!(banner.is_unrolled());
    }
}
