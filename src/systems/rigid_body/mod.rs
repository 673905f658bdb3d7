//! Rigid bodies and the physics backend capability set.
//!
//! The globe only needs a handful of things from a physics engine: create
//! bodies, push them around, step the world and ask what touched what.
//! `PhysicsBackend` is that set; `ImpulseWorld` in `rigid_body_system` is the
//! minimal impulse solver that ships with the crate.

mod body;

pub use body::{Body, BodyDesc, Shape};

use crate::core::{GlobeError, Vec2};

/// Stable identifier of a body inside a backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub const CATEGORY_CONTAINER: u32 = 0x0001;
pub const CATEGORY_FLOOR: u32 = 0x0002;
pub const CATEGORY_RING: u32 = 0x0004;
pub const CATEGORY_PARTICLE: u32 = 0x0008;

/// Group shared by all particles; a negative group never collides with itself.
pub const GROUP_PARTICLES: i32 = -1;

/// Category/mask/group collision filtering.
///
/// Two bodies in the same non-zero group collide if the group is positive and
/// never if it is negative. Otherwise each body's category must be in the
/// other's mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
    pub group: i32,
}

impl CollisionFilter {
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask, group: 0 }
    }

    pub const fn with_group(self, group: i32) -> Self {
        Self { group, ..self }
    }

    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        if self.group != 0 && self.group == other.group {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::new(0x0001, u32::MAX)
    }
}

/// A contact resolved during the last step.
///
/// `normal` points from `b` toward `a`; `depth` is the penetration before
/// correction.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub normal: Vec2,
    pub depth: f32,
}

/// What the globe needs from a rigid-body engine.
pub trait PhysicsBackend {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn body_count(&self) -> usize;

    fn position(&self, body: BodyHandle) -> Vec2;
    fn set_position(&mut self, body: BodyHandle, pos: Vec2);
    fn angle(&self, body: BodyHandle) -> f32;
    fn set_angle(&mut self, body: BodyHandle, angle: f32);
    fn velocity(&self, body: BodyHandle) -> Vec2;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32);
    fn mass(&self, body: BodyHandle) -> f32;

    /// Queue a force for the next step (consumed by `step`)
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);

    fn is_static(&self, body: BodyHandle) -> bool;
    fn set_static(&mut self, body: BodyHandle, is_static: bool);
    fn is_sleeping(&self, body: BodyHandle) -> bool;
    fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool);

    /// Advance the world by one fixed timestep.
    fn step(&mut self) -> Result<(), GlobeError>;

    /// Contacts resolved during the last step
    fn contacts(&self) -> &[Contact];

    /// Drop every body
    fn clear(&mut self);
}
