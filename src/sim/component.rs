//! Component model
//!
//! Every machine part implements [`Component`]. The machine owns its parts as
//! a closed [`Part`] enum, addressed by [`ComponentId`] (the part's position
//! in the machine). Transmission links and contact registrations refer to
//! parts by id, never by reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::contact::{ContactHandler, ContactListener};
use super::physics::{BodyHandle, BodyState, PhysicsWorld};
use super::transmission::{Rotation, RotationSink, RotationSource};
use crate::components::{Banner, Basket, Body, Conveyor, Goal, Hamster, Pulley};
use crate::renderer::Graphics;

/// Position of a part within its machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State every component carries
#[derive(Debug, Clone, Default)]
pub struct ComponentBase {
    time: f32,
    machine: Option<u32>,
    id: Option<ComponentId>,
}

impl ComponentBase {
    /// Seconds of machine time this component has seen since reset
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Machine number this component belongs to
    pub fn machine(&self) -> Option<u32> {
        self.machine
    }

    pub fn id(&self) -> Option<ComponentId> {
        self.id
    }

    pub(crate) fn attach(&mut self, machine: u32, id: ComponentId) {
        self.machine = Some(machine);
        self.id = Some(id);
    }
}

/// What a component sees while drawing
pub struct DrawContext<'a> {
    pub world: &'a PhysicsWorld,
    pub parts: &'a [Part],
}

impl DrawContext<'_> {
    pub fn part(&self, id: ComponentId) -> Option<&Part> {
        self.parts.get(id.index())
    }
}

/// A machine part
///
/// Lifecycle per machine reset: `install_physics`, `add_contact_listener`,
/// then `reset_component`. Each simulation step calls `update_time` before
/// the physics world advances.
pub trait Component {
    fn base(&self) -> &ComponentBase;
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Paint in machine coordinates (centimeters, Y up)
    fn draw(&self, gfx: &mut dyn Graphics, ctx: &DrawContext);

    /// Advance local time. A returned rotation is broadcast through this
    /// component's rotation source.
    fn update_time(&mut self, dt: f32) -> Option<Rotation> {
        self.base_mut().advance(dt);
        None
    }

    /// Create this component's bodies in a fresh world
    fn install_physics(&mut self, _world: &mut PhysicsWorld) {}

    /// Register bodies whose contacts this component handles
    fn add_contact_listener(&self, _listener: &mut ContactListener) {}

    /// Rotation delivered through this component's sink. A returned
    /// rotation is forwarded through its source.
    fn rotate(&mut self, _rotation: Rotation, _world: &mut PhysicsWorld) -> Option<Rotation> {
        None
    }

    /// Restore component-local state (scores, timers, flags)
    fn reset_component(&mut self) {}

    fn source(&self) -> Option<&RotationSource> {
        None
    }

    fn source_mut(&mut self) -> Option<&mut RotationSource> {
        None
    }

    fn sink(&self) -> Option<&RotationSink> {
        None
    }

    fn sink_mut(&mut self) -> Option<&mut RotationSink> {
        None
    }

    /// Bodies installed in the current world
    fn bodies(&self) -> Vec<BodyHandle> {
        Vec::new()
    }

    /// Component-local state for snapshots
    fn state(&self) -> PartState;
}

/// Component-local state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartState {
    Body,
    Pulley { rotation: f32, speed: f32 },
    Hamster { running: bool, rotation: f32, speed: f32 },
    Conveyor { speed: f32 },
    Basket { resting: bool, time_in_basket: f32 },
    Goal { score: u32 },
    Banner { offset: f32 },
}

/// One component in a machine snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSnapshot {
    pub id: ComponentId,
    pub time: f32,
    pub bodies: Vec<BodyState>,
    pub state: PartState,
}

// Generates the closed part set with conversions and typed accessors.
macro_rules! parts {
    ($($variant:ident => $as_ref:ident, $as_mut:ident;)*) => {
        /// Every kind of part a machine can hold
        #[derive(Debug)]
        pub enum Part {
            $($variant($variant),)*
        }

        $(
            impl From<$variant> for Part {
                fn from(component: $variant) -> Self {
                    Part::$variant(component)
                }
            }
        )*

        impl Part {
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Part::$variant(_) => stringify!($variant),)*
                }
            }

            pub fn component(&self) -> &dyn Component {
                match self {
                    $(Part::$variant(c) => c,)*
                }
            }

            pub fn component_mut(&mut self) -> &mut dyn Component {
                match self {
                    $(Part::$variant(c) => c,)*
                }
            }

            $(
                pub fn $as_ref(&self) -> Option<&$variant> {
                    match self {
                        Part::$variant(c) => Some(c),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut $variant> {
                    match self {
                        Part::$variant(c) => Some(c),
                        _ => None,
                    }
                }
            )*
        }
    };
}

parts! {
    Body => as_body, as_body_mut;
    Pulley => as_pulley, as_pulley_mut;
    Hamster => as_hamster, as_hamster_mut;
    Conveyor => as_conveyor, as_conveyor_mut;
    Basket => as_basket, as_basket_mut;
    Goal => as_goal, as_goal_mut;
    Banner => as_banner, as_banner_mut;
}

impl Part {
    /// Parts that react to contacts on their bodies
    pub fn contact_handler_mut(&mut self) -> Option<&mut dyn ContactHandler> {
        match self {
            Part::Hamster(c) => Some(c),
            Part::Conveyor(c) => Some(c),
            Part::Basket(c) => Some(c),
            Part::Goal(c) => Some(c),
            Part::Body(_) | Part::Pulley(_) | Part::Banner(_) => None,
        }
    }

    /// Bind to a machine slot, including any source or sink ends
    pub(crate) fn attach(&mut self, machine: u32, id: ComponentId) {
        let component = self.component_mut();
        component.base_mut().attach(machine, id);
        if let Some(source) = component.source_mut() {
            source.set_owner(id);
        }
        if let Some(sink) = component.sink_mut() {
            sink.set_owner(id);
        }
    }

    /// Zero local time and restore component state
    pub fn reset(&mut self) {
        let component = self.component_mut();
        component.base_mut().reset();
        component.reset_component();
    }

    pub fn snapshot(&self, id: ComponentId, world: &PhysicsWorld) -> ComponentSnapshot {
        let component = self.component();
        ComponentSnapshot {
            id,
            time: component.base().time(),
            bodies: component
                .bodies()
                .into_iter()
                .filter_map(|b| world.state(b))
                .collect(),
            state: component.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VirtualAssets;

    #[test]
    fn test_attach_binds_transmission_ends() {
        let mut part = Part::from(Pulley::new(10.0).unwrap());
        part.attach(2, ComponentId(5));
        let component = part.component();
        assert_eq!(component.base().machine(), Some(2));
        assert_eq!(component.base().id(), Some(ComponentId(5)));
        assert_eq!(component.source().and_then(|s| s.owner()), Some(ComponentId(5)));
        assert_eq!(component.sink().and_then(|s| s.owner()), Some(ComponentId(5)));
    }

    #[test]
    fn test_reset_zeroes_time() {
        let mut part = Part::from(Hamster::new(&VirtualAssets).unwrap());
        part.component_mut().update_time(0.5);
        assert_eq!(part.component().base().time(), 0.5);
        part.reset();
        assert_eq!(part.component().base().time(), 0.0);
    }

    #[test]
    fn test_contact_handlers() {
        let mut goal = Part::from(Goal::new(&VirtualAssets).unwrap());
        let mut pulley = Part::from(Pulley::new(10.0).unwrap());
        assert!(goal.contact_handler_mut().is_some());
        assert!(pulley.contact_handler_mut().is_none());
        assert_eq!(goal.kind(), "Goal");
        assert!(goal.as_goal().is_some());
        assert!(goal.as_pulley().is_none());
    }

    #[test]
    fn test_component_id_display() {
        assert_eq!(ComponentId(3).to_string(), "#3");
    }
}
