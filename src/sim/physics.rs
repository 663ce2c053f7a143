//! Rigid-body physics adapter
//!
//! Wraps a rapier2d world behind the small surface the machine needs: fixed
//! gravity, a fixed-step integrator, body creation from machine shapes and
//! contact queries. Machine geometry is in centimeters; the world runs in
//! meters, and velocities are reported in meters per second.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;
use serde::Serialize;

use crate::consts::{CENTIMETERS_PER_METER, GRAVITY, POSITION_ITERATIONS, VELOCITY_ITERATIONS};
use crate::renderer::{Graphics, Shape, Sprite};
use crate::{to_centimeters, to_meters};

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle as BodyHandle};

/// How the integrator treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BodyKind {
    /// Never moves
    #[default]
    Static,
    /// Moved by forces and contacts
    Dynamic,
    /// Moved only by the velocity it is given
    Kinematic,
}

impl From<BodyKind> for RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => RigidBodyType::Fixed,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Kinematic => RigidBodyType::KinematicVelocityBased,
        }
    }
}

/// Surface and mass properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Combine friction with the other surface by minimum, so a zero-friction
    /// surface stays frictionless against anything
    pub slippery: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.5,
            restitution: 0.5,
            slippery: false,
        }
    }
}

impl Material {
    pub fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            density,
            friction,
            restitution,
            slippery: false,
        }
    }

    /// No friction against any surface
    pub fn frictionless() -> Self {
        Self {
            friction: 0.0,
            slippery: true,
            ..Self::default()
        }
    }
}

/// Pose and velocity of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyState {
    /// Centimeters
    pub position: Vec2,
    pub angle: f32,
    /// Meters per second
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
}

/// A physics world with fixed gravity
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.body_count())
            .finish_non_exhaustive()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Empty world with standard gravity and fixed solver iterations
    pub fn new() -> Self {
        let mut params = IntegrationParameters::default();
        params.num_solver_iterations =
            NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(NonZeroUsize::MIN);
        params.num_internal_pgs_iterations = POSITION_ITERATIONS;

        Self {
            gravity: vector![0.0, GRAVITY],
            pipeline: PhysicsPipeline::new(),
            params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Create a body with one collider for `shape` (centimeters) at `position`
    pub fn create_body(
        &mut self,
        shape: &Shape,
        position: Vec2,
        angle: f32,
        kind: BodyKind,
        material: Material,
        sensor: bool,
    ) -> BodyHandle {
        let origin = to_meters(position);
        let mut body = RigidBodyBuilder::new(kind.into())
            .translation(vector![origin.x, origin.y])
            .rotation(angle);
        if kind == BodyKind::Dynamic {
            body = body.ccd_enabled(true);
        }
        let handle = self.bodies.insert(body.build());

        let builder = match shape {
            Shape::Circle { radius } => Some(ColliderBuilder::ball(radius / CENTIMETERS_PER_METER)),
            Shape::Polygon(points) => {
                let points: Vec<Point<Real>> = points
                    .iter()
                    .map(|p| {
                        let m = to_meters(*p);
                        point![m.x, m.y]
                    })
                    .collect();
                ColliderBuilder::convex_hull(&points)
            }
        };
        let Some(builder) = builder else {
            log::warn!("Shape has no convex hull, body {handle:?} will not collide");
            return handle;
        };

        let mut collider = builder
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution);
        if material.slippery {
            collider = collider.friction_combine_rule(CoefficientCombineRule::Min);
        }
        if sensor {
            collider = collider.sensor(true);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        handle
    }

    /// Advance the world by exactly `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Body position in centimeters
    pub fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| {
            let t = b.translation();
            to_centimeters(Vec2::new(t.x, t.y))
        })
    }

    /// Body rotation in radians
    pub fn angle(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|b| b.rotation().angle())
    }

    pub fn kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(body).map(|b| {
            if b.is_dynamic() {
                BodyKind::Dynamic
            } else if b.is_kinematic() {
                BodyKind::Kinematic
            } else {
                BodyKind::Static
            }
        })
    }

    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|b| {
            let v = b.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body) {
            b.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    pub fn angular_velocity(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|b| b.angvel())
    }

    /// Spin a body; static bodies ignore this
    pub fn set_angular_velocity(&mut self, body: BodyHandle, speed: f32) {
        if let Some(b) = self.bodies.get_mut(body) {
            if !b.is_fixed() {
                b.set_angvel(speed, true);
            }
        }
    }

    pub fn state(&self, body: BodyHandle) -> Option<BodyState> {
        Some(BodyState {
            position: self.position(body)?,
            angle: self.angle(body)?,
            linear_velocity: self.linear_velocity(body)?,
            angular_velocity: self.angular_velocity(body)?,
        })
    }

    /// Colliders attached to a body
    pub fn colliders_of(&self, body: BodyHandle) -> Vec<ColliderHandle> {
        self.bodies
            .get(body)
            .map(|b| b.colliders().to_vec())
            .unwrap_or_default()
    }

    /// Body a collider is attached to
    pub fn body_of(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        self.colliders.get(collider).and_then(|c| c.parent())
    }

    /// Colliders currently touching or overlapping `collider`, solid
    /// contacts first, then sensor overlaps
    pub fn touching(&self, collider: ColliderHandle) -> Vec<ColliderHandle> {
        let other = |c1: ColliderHandle, c2: ColliderHandle| if c1 == collider { c2 } else { c1 };
        let contacts = self
            .narrow_phase
            .contact_pairs_with(collider)
            .filter(|pair| is_touching(pair))
            .map(|pair| other(pair.collider1, pair.collider2));
        let overlaps = self
            .narrow_phase
            .intersection_pairs_with(collider)
            .filter(|(_, _, intersecting)| *intersecting)
            .map(|(c1, c2, _)| other(c1, c2));
        contacts.chain(overlaps).collect()
    }

    /// Bodies touching any collider of `body`
    pub fn touching_bodies(&self, body: BodyHandle) -> Vec<BodyHandle> {
        let mut touching = Vec::new();
        for collider in self.colliders_of(body) {
            for other in self.touching(collider) {
                if let Some(other_body) = self.body_of(other) {
                    if other_body != body && !touching.contains(&other_body) {
                        touching.push(other_body);
                    }
                }
            }
        }
        touching
    }
}

/// A pair touches when it has solver contacts or any penetrating point
fn is_touching(pair: &ContactPair) -> bool {
    pair.has_any_active_contact
        || pair
            .manifolds
            .iter()
            .any(|m| m.points.iter().any(|p| p.dist <= 0.0))
}

/// A drawable shape that becomes one physics body on install
#[derive(Debug, Clone)]
pub struct PhysicsShape {
    sprite: Sprite,
    position: Vec2,
    angle: f32,
    kind: BodyKind,
    material: Material,
    sensor: bool,
    handle: Option<BodyHandle>,
}

impl PhysicsShape {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            position: Vec2::ZERO,
            angle: 0.0,
            kind: BodyKind::Static,
            material: Material::default(),
            sensor: false,
            handle: None,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.sprite = sprite;
    }

    /// Position the body starts at after every reset (centimeters)
    pub fn initial_position(&self) -> Vec2 {
        self.position
    }

    pub fn set_initial_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_initial_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Detect overlaps without ever being solid
    pub fn set_sensor(&mut self) {
        self.sensor = true;
    }

    pub fn is_sensor(&self) -> bool {
        self.sensor
    }

    /// Handle in the current world, if installed
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// Create the body in `world`, replacing any handle from an older world
    pub fn install(&mut self, world: &mut PhysicsWorld) {
        self.handle = Some(world.create_body(
            &self.sprite.shape,
            self.position,
            self.angle,
            self.kind,
            self.material,
            self.sensor,
        ));
    }

    /// Current pose, or the initial pose when not installed
    pub fn pose(&self, world: &PhysicsWorld) -> (Vec2, f32) {
        self.handle
            .and_then(|h| Some((world.position(h)?, world.angle(h)?)))
            .unwrap_or((self.position, self.angle))
    }

    pub fn state(&self, world: &PhysicsWorld) -> Option<BodyState> {
        self.handle.and_then(|h| world.state(h))
    }

    pub fn set_angular_velocity(&self, world: &mut PhysicsWorld, speed: f32) {
        if let Some(h) = self.handle {
            world.set_angular_velocity(h, speed);
        }
    }

    pub fn draw(&self, gfx: &mut dyn Graphics, world: &PhysicsWorld) {
        let (position, angle) = self.pose(world);
        self.sprite.draw(gfx, position, angle);
    }
}
