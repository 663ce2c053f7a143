//! Contact routing
//!
//! Components register the bodies whose contacts they care about. After each
//! physics step the listener compares which registered bodies touch something
//! with the previous step, and forwards begin and pre-solve notifications to
//! the owning component in registration order.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::component::{ComponentId, Part};
use super::physics::{BodyHandle, ColliderHandle, PhysicsWorld};

/// A registered body touching another collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The registered body
    pub body: BodyHandle,
    pub collider: ColliderHandle,
    /// Whatever it touched
    pub other_body: Option<BodyHandle>,
    pub other_collider: ColliderHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First step the pair touches
    Begin,
    /// Every step the pair touches
    PreSolve,
}

/// A contact notification for one component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub component: ComponentId,
    pub phase: ContactPhase,
    pub contact: Contact,
}

/// What a handler wants done to the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResponse {
    /// Replace a body's linear velocity (meters per second)
    SetVelocity { body: BodyHandle, velocity: Vec2 },
}

/// Components that react to contacts on their registered bodies
pub trait ContactHandler {
    fn begin_contact(&mut self, _contact: &Contact) -> Option<ContactResponse> {
        None
    }

    fn pre_solve(&mut self, _contact: &Contact) -> Option<ContactResponse> {
        None
    }
}

/// Body-to-component registry for one physics world
#[derive(Debug, Default)]
pub struct ContactListener {
    registrations: Vec<(BodyHandle, ComponentId)>,
    owners: HashMap<BodyHandle, ComponentId>,
    touching: HashSet<(ColliderHandle, ColliderHandle)>,
}

impl ContactListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route contacts on `body` to `component`. A body has one owner; a
    /// component may own many bodies.
    pub fn add(&mut self, body: BodyHandle, component: ComponentId) {
        if let Some(owner) = self.owners.get(&body) {
            log::warn!("Body {body:?} already routed to component {owner}, ignoring {component}");
            return;
        }
        self.owners.insert(body, component);
        self.registrations.push((body, component));
    }

    pub fn owner(&self, body: BodyHandle) -> Option<ComponentId> {
        self.owners.get(&body).copied()
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Contact notifications for the step just taken, in registration order
    pub fn collect(&mut self, world: &PhysicsWorld) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        let mut touching = HashSet::new();

        for &(body, component) in &self.registrations {
            for collider in world.colliders_of(body) {
                for other_collider in world.touching(collider) {
                    let contact = Contact {
                        body,
                        collider,
                        other_body: world.body_of(other_collider),
                        other_collider,
                    };
                    let key = (collider, other_collider);
                    if !self.touching.contains(&key) {
                        events.push(ContactEvent {
                            component,
                            phase: ContactPhase::Begin,
                            contact,
                        });
                    }
                    events.push(ContactEvent {
                        component,
                        phase: ContactPhase::PreSolve,
                        contact,
                    });
                    touching.insert(key);
                }
            }
        }

        self.touching = touching;
        events
    }

    /// Collect this step's notifications, hand them to the owning parts and
    /// apply whatever they ask of the world
    pub fn dispatch(&mut self, world: &mut PhysicsWorld, parts: &mut [Part]) {
        for event in self.collect(world) {
            let Some(part) = parts.get_mut(event.component.index()) else {
                log::warn!("Contact for unknown component {}", event.component);
                continue;
            };
            let Some(handler) = part.contact_handler_mut() else {
                log::warn!("Component {} has no contact handler", event.component);
                continue;
            };
            let response = match event.phase {
                ContactPhase::Begin => handler.begin_contact(&event.contact),
                ContactPhase::PreSolve => handler.pre_solve(&event.contact),
            };
            if let Some(ContactResponse::SetVelocity { body, velocity }) = response {
                world.set_linear_velocity(body, velocity);
            }
        }
    }
}
