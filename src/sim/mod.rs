//! Deterministic machine simulation
//!
//! Everything that moves lives here:
//! - Fixed timestep only; a frame is reached by reset plus N fixed steps
//! - Parts update, draw and reset in insertion order
//! - Contact dispatch follows registration order

pub mod component;
pub mod contact;
pub mod machine;
pub mod physics;
pub mod system;
pub mod transmission;

pub use component::{
    Component, ComponentBase, ComponentId, ComponentSnapshot, DrawContext, Part, PartState,
};
pub use contact::{
    Contact, ContactEvent, ContactHandler, ContactListener, ContactPhase, ContactResponse,
};
pub use machine::{Machine, MachineSnapshot, MachineState};
pub use physics::{
    BodyHandle, BodyKind, BodyState, ColliderHandle, Material, PhysicsShape, PhysicsWorld,
};
pub use system::MachineSystem;
pub use transmission::{Rotation, RotationSink, RotationSource};
