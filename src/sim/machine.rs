//! Machine: an ordered collection of parts sharing one physics world
//!
//! Parts are updated, drawn and reset in the order they were added. Reset
//! rebuilds the physics world and contact routing from scratch, so replaying
//! from reset is deterministic.

use serde::Serialize;

use super::component::{ComponentId, ComponentSnapshot, DrawContext, Part};
use super::contact::ContactListener;
use super::physics::PhysicsWorld;
use super::transmission::Rotation;
use crate::error::ConfigError;
use crate::renderer::Graphics;

/// Machine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineState {
    /// Parts added, no physics installed yet
    Uninitialized,
    /// Freshly reset, no steps taken
    Ready,
    /// At least one step taken since reset
    Stepping,
}

/// Serializable view of a machine at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineSnapshot {
    pub number: u32,
    pub state: MachineState,
    pub components: Vec<ComponentSnapshot>,
}

/// An ordered set of parts, their physics world and contact routing
#[derive(Debug)]
pub struct Machine {
    number: u32,
    parts: Vec<Part>,
    world: PhysicsWorld,
    listener: ContactListener,
    state: MachineState,
}

impl Machine {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            parts: Vec::new(),
            world: PhysicsWorld::new(),
            listener: ContactListener::new(),
            state: MachineState::Uninitialized,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Append a part. Update, draw and reset follow insertion order.
    pub fn add(&mut self, component: impl Into<Part>) -> ComponentId {
        let id = ComponentId(self.parts.len());
        let mut part = component.into();
        part.attach(self.number, id);
        log::debug!("Machine {} added {} {id}", self.number, part.kind());
        self.parts.push(part);
        id
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, id: ComponentId) -> Option<&Part> {
        self.parts.get(id.index())
    }

    pub fn part_mut(&mut self, id: ComponentId) -> Option<&mut Part> {
        self.parts.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn listener(&self) -> &ContactListener {
        &self.listener
    }

    /// Drive `to` from `from`: rotation broadcast by `from` reaches `to`
    /// after every sink linked before it
    pub fn connect(&mut self, from: ComponentId, to: ComponentId) -> Result<(), ConfigError> {
        let source_part = self.part(from).ok_or(ConfigError::UnknownComponent(from))?;
        let sink_part = self.part(to).ok_or(ConfigError::UnknownComponent(to))?;
        if source_part.component().source().is_none() {
            return Err(ConfigError::NoRotationSource(from));
        }
        if sink_part.component().sink().is_none() {
            return Err(ConfigError::NoRotationSink(to));
        }
        if from == to || self.drives(to, from) {
            return Err(ConfigError::TransmissionCycle { from, to });
        }

        let (source_part, sink_part) = pair_mut(&mut self.parts, from.index(), to.index());
        if let (Some(source), Some(sink)) = (
            source_part.component_mut().source_mut(),
            sink_part.component_mut().sink_mut(),
        ) {
            source.add_sink(sink);
        }
        Ok(())
    }

    /// Connect pulley `from` to pulley `to` and draw a belt between them
    pub fn drive_pulley(&mut self, from: ComponentId, to: ComponentId) -> Result<(), ConfigError> {
        if self.part(to).and_then(Part::as_pulley).is_none() {
            return Err(ConfigError::NoRotationSink(to));
        }
        self.connect(from, to)?;
        if let Some(pulley) = self.part_mut(from).and_then(Part::as_pulley_mut) {
            pulley.set_belt(to);
        }
        Ok(())
    }

    /// Whether rotation from `from` can reach `to` through existing links
    fn drives(&self, from: ComponentId, to: ComponentId) -> bool {
        let mut stack = vec![from];
        let mut seen = vec![false; self.parts.len()];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            if let Some(source) = self.parts[id.index()].component().source() {
                stack.extend_from_slice(source.sinks());
            }
        }
        false
    }

    /// Rebuild physics and contact routing, then restore every part
    pub fn reset(&mut self) {
        self.world = PhysicsWorld::new();
        self.listener = ContactListener::new();
        for part in &mut self.parts {
            let component = part.component_mut();
            component.install_physics(&mut self.world);
            component.add_contact_listener(&mut self.listener);
        }
        for part in &mut self.parts {
            part.reset();
        }
        self.state = MachineState::Ready;
        log::debug!(
            "Machine {} reset: {} parts, {} bodies, {} contact bodies",
            self.number,
            self.parts.len(),
            self.world.body_count(),
            self.listener.len()
        );
    }

    /// Advance every part by `dt`, then the physics world by exactly `dt`
    ///
    /// # Panics
    ///
    /// If the machine was never reset.
    pub fn update(&mut self, dt: f32) {
        assert!(
            self.state != MachineState::Uninitialized,
            "machine {} updated before reset installed its physics",
            self.number
        );
        for index in 0..self.parts.len() {
            if let Some(rotation) = self.parts[index].component_mut().update_time(dt) {
                self.transmit(ComponentId(index), rotation);
            }
        }
        self.world.step(dt);
        self.listener.dispatch(&mut self.world, &mut self.parts);
        self.state = MachineState::Stepping;
    }

    /// Send `rotation` out of `from`'s source, depth first
    fn transmit(&mut self, from: ComponentId, rotation: Rotation) {
        let mut deliveries = Vec::new();
        if let Some(source) = self.parts[from.index()].component().source() {
            source.rotate(rotation, |sink, r| deliveries.push((sink, r)));
        }
        for (sink, r) in deliveries {
            let forwarded = self.parts[sink.index()]
                .component_mut()
                .rotate(r, &mut self.world);
            if let Some(next) = forwarded {
                self.transmit(sink, next);
            }
        }
    }

    /// Draw every part in insertion order
    pub fn draw(&self, gfx: &mut dyn Graphics) {
        let ctx = DrawContext {
            world: &self.world,
            parts: &self.parts,
        };
        for part in &self.parts {
            part.component().draw(gfx, &ctx);
        }
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            number: self.number,
            state: self.state,
            components: self
                .parts
                .iter()
                .enumerate()
                .map(|(i, part)| part.snapshot(ComponentId(i), &self.world))
                .collect(),
        }
    }
}

/// Mutable references to two distinct parts
fn pair_mut(parts: &mut [Part], a: usize, b: usize) -> (&mut Part, &mut Part) {
    if a < b {
        let (left, right) = parts.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = parts.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
