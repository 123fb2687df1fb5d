//! # STRANDED Physics
//!
//! The rigid-body seam the simulation talks to, plus a small kinematic
//! implementation of it.
//!
//! Features:
//! - Fixed timestep with a capped number of sub-steps per frame
//! - Gravity and linear damping on dynamic bodies
//! - Terrain floor clamp against the height grid
//! - AABB overlap contacts filtered by collision group and mask
//! - Downward ray test for grounding
//!
//! Contacts come back from `step` as a list, sorted by body handle, so
//! the caller resolves them in a fixed order.

use std::collections::BTreeMap;

use stranded_core::EntityId;
use stranded_procedural::TerrainGrid;
use stranded_shared::{Quaternion, Vec3};

/// Collision group bits.
pub mod groups {
    /// The player.
    pub const PLAYER: u32 = 1;
    /// Enemies.
    pub const ENEMY: u32 = 2;
    /// Shots.
    pub const PROJECTILE: u32 = 4;
    /// Terrain and everything static: trees, NPCs, walls, doors.
    pub const STATIC: u32 = 8;
}

// ============================================================================
// AABB (Axis-Aligned Bounding Box)
// ============================================================================

/// Axis-Aligned Bounding Box for overlap tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates an AABB centered at `center` with the given half extents.
    #[must_use]
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Checks if this AABB intersects another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Overlap on each axis. Positive = overlap, negative = gap.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Vec3 {
        Vec3::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
            self.max.z.min(other.max.z) - self.min.z.max(other.min.z),
        )
    }

    /// True when `(x, z)` lies inside the horizontal footprint.
    #[must_use]
    pub fn covers(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }
}

// ============================================================================
// BODY DESCRIPTION
// ============================================================================

/// Collision shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Box.
    Cuboid {
        /// Half size on each axis.
        half_extents: Vec3,
    },
    /// Upright cylinder.
    Cylinder {
        /// Radius.
        radius: f32,
        /// Half of the height.
        half_height: f32,
    },
}

impl Shape {
    /// Half size of the shape's bounding box.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Sphere { radius } => Vec3::new(radius, radius, radius),
            Self::Cuboid { half_extents } => half_extents,
            Self::Cylinder { radius, half_height } => Vec3::new(radius, half_height, radius),
        }
    }
}

/// How a body moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Integrated every step.
    Dynamic {
        /// Mass; only bodies with mass are pushed out of statics.
        mass: f32,
    },
    /// Never moves on its own.
    Static,
}

/// Everything needed to create a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    /// Collision shape.
    pub shape: Shape,
    /// Dynamic or static.
    pub motion: Motion,
    /// Initial center.
    pub position: Vec3,
    /// Initial velocity.
    pub velocity: Vec3,
    /// Group bits this body belongs to.
    pub group: u32,
    /// Group bits this body collides with.
    pub mask: u32,
    /// Fraction of velocity lost per second.
    pub linear_damping: f32,
    /// Entity the body belongs to, `EntityId::NULL` for the player.
    pub owner: EntityId,
}

impl BodyDesc {
    /// A dynamic body.
    #[must_use]
    pub fn dynamic(shape: Shape, position: Vec3, mass: f32) -> Self {
        Self {
            shape,
            motion: Motion::Dynamic { mass },
            position,
            velocity: Vec3::ZERO,
            group: groups::STATIC,
            mask: 0,
            linear_damping: 0.0,
            owner: EntityId::NULL,
        }
    }

    /// A static body.
    #[must_use]
    pub fn fixed(shape: Shape, position: Vec3) -> Self {
        Self {
            motion: Motion::Static,
            group: groups::STATIC,
            mask: groups::PLAYER | groups::ENEMY | groups::PROJECTILE,
            ..Self::dynamic(shape, position, 0.0)
        }
    }

    /// Sets group and mask bits.
    #[must_use]
    pub const fn with_filter(mut self, group: u32, mask: u32) -> Self {
        self.group = group;
        self.mask = mask;
        self
    }

    /// Sets the owning entity.
    #[must_use]
    pub const fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = owner;
        self
    }

    /// Sets linear damping.
    #[must_use]
    pub const fn with_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Sets the initial velocity.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Opaque body reference, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

/// What a body touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Collider {
    /// The terrain surface.
    Ground,
    /// Another body.
    Body {
        /// Handle of the other body.
        handle: BodyHandle,
        /// Its owner.
        owner: EntityId,
    },
}

/// One touch reported by a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Contact {
    /// Moving body that touched something.
    pub body: BodyHandle,
    /// What it touched.
    pub other: Collider,
    /// Owner of `body`.
    pub owner: EntityId,
}

// ============================================================================
// PHYSICS SEAM
// ============================================================================

/// Rigid-body service consumed by the simulation.
pub trait PhysicsWorld {
    /// Adds a body and returns its handle.
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Removes a body. `false` if it was not attached.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// True while the body is attached.
    fn contains(&self, handle: BodyHandle) -> bool;

    /// Number of attached bodies.
    fn body_count(&self) -> usize;

    /// Center of a body.
    fn position(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Moves a body.
    fn set_position(&mut self, handle: BodyHandle, position: Vec3);

    /// Velocity of a body.
    fn velocity(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Sets the velocity of a body.
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3);

    /// Orientation of a body.
    fn orientation(&self, handle: BodyHandle) -> Option<Quaternion>;

    /// Sets the orientation of a body.
    fn set_orientation(&mut self, handle: BodyHandle, orientation: Quaternion);

    /// Advances by a frame delta and returns the contacts seen, sorted by
    /// body handle, one per touching pair.
    fn step(&mut self, dt: f32, terrain: &TerrainGrid) -> Vec<Contact>;

    /// True when a ray from one unit above `origin` down to `length` below
    /// it hits the terrain or a static body.
    fn raycast_down(&self, origin: Vec3, length: f32, terrain: &TerrainGrid) -> bool;
}

// ============================================================================
// KINEMATIC WORLD
// ============================================================================

#[derive(Clone, Debug)]
struct Body {
    desc: BodyDesc,
    position: Vec3,
    velocity: Vec3,
    orientation: Quaternion,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.desc.shape.half_extents())
    }

    const fn is_dynamic(&self) -> bool {
        matches!(self.desc.motion, Motion::Dynamic { .. })
    }

    const fn collides_with(&self, other: &Self) -> bool {
        self.desc.mask & other.desc.group != 0 && other.desc.mask & self.desc.group != 0
    }
}

/// In-crate `PhysicsWorld`: integrates dynamic bodies, clamps them to
/// the terrain and reports overlaps. Rotations are not simulated.
#[derive(Clone, Debug)]
pub struct KinematicWorld {
    bodies: BTreeMap<BodyHandle, Body>,
    next_handle: u32,
    gravity: f32,
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl KinematicWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new(gravity: f32, fixed_timestep: f32, max_substeps: u32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_handle: 0,
            gravity,
            fixed_timestep,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Simulated time carried over to the next `step`.
    #[must_use]
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    fn substep(&mut self, h: f32, terrain: &TerrainGrid, contacts: &mut Vec<Contact>) {
        let gravity = self.gravity;

        for (&handle, body) in &mut self.bodies {
            if !body.is_dynamic() {
                continue;
            }
            body.velocity.y -= gravity * h;
            let keep = (1.0 - body.desc.linear_damping).clamp(0.0, 1.0).powf(h);
            body.velocity = body.velocity * keep;
            body.position += body.velocity * h;

            let half = body.desc.shape.half_extents();
            let floor = terrain.height_at(body.position.x, body.position.z);
            if body.position.y - half.y <= floor {
                body.position.y = floor + half.y;
                body.velocity.y = body.velocity.y.max(0.0);
                if body.desc.mask & groups::STATIC != 0 {
                    contacts.push(Contact {
                        body: handle,
                        other: Collider::Ground,
                        owner: body.desc.owner,
                    });
                }
            }
        }

        let movers: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .map(|(&handle, _)| handle)
            .collect();

        for handle in movers {
            let Some(mover) = self.bodies.get(&handle).cloned() else {
                continue;
            };
            let mut push = Vec3::ZERO;
            for (&other_handle, other) in &self.bodies {
                if other_handle == handle || !mover.collides_with(other) {
                    continue;
                }
                let (a, b) = (mover.aabb(), other.aabb());
                if !a.intersects(&b) {
                    continue;
                }
                contacts.push(Contact {
                    body: handle,
                    other: Collider::Body {
                        handle: other_handle,
                        owner: other.desc.owner,
                    },
                    owner: mover.desc.owner,
                });
                if let (Motion::Dynamic { mass }, Motion::Static) = (mover.desc.motion, other.desc.motion) {
                    if mass > 0.0 {
                        push += separation(&a, &b);
                    }
                }
            }
            if push != Vec3::ZERO {
                if let Some(body) = self.bodies.get_mut(&handle) {
                    body.position += push;
                    if push.y > 0.0 {
                        body.velocity.y = body.velocity.y.max(0.0);
                    }
                }
            }
        }
    }
}

/// Smallest translation moving `a` out of `b`.
fn separation(a: &Aabb, b: &Aabb) -> Vec3 {
    let overlap = a.overlap(b);
    let center_a = (a.min + a.max) * 0.5;
    let center_b = (b.min + b.max) * 0.5;
    let sign = |delta: f32| if delta >= 0.0 { 1.0 } else { -1.0 };

    if overlap.x <= overlap.y && overlap.x <= overlap.z {
        Vec3::new(overlap.x * sign(center_a.x - center_b.x), 0.0, 0.0)
    } else if overlap.z <= overlap.y {
        Vec3::new(0.0, 0.0, overlap.z * sign(center_a.z - center_b.z))
    } else {
        Vec3::new(0.0, overlap.y * sign(center_a.y - center_b.y), 0.0)
    }
}

impl PhysicsWorld for KinematicWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Body {
                desc,
                position: desc.position,
                velocity: desc.velocity,
                orientation: Quaternion::IDENTITY,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(&handle).is_some()
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&handle).map(|body| body.position)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
        }
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&handle).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn orientation(&self, handle: BodyHandle) -> Option<Quaternion> {
        self.bodies.get(&handle).map(|body| body.orientation)
    }

    fn set_orientation(&mut self, handle: BodyHandle, orientation: Quaternion) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.orientation = orientation;
        }
    }

    fn step(&mut self, dt: f32, terrain: &TerrainGrid) -> Vec<Contact> {
        let mut contacts = Vec::new();
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            self.substep(self.fixed_timestep, terrain, &mut contacts);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        if steps == self.max_substeps {
            // Behind by more than the cap: drop the backlog
            self.accumulator %= self.fixed_timestep;
        }

        contacts.sort_unstable();
        contacts.dedup_by(|a, b| a.body == b.body && a.other == b.other);
        contacts
    }

    fn raycast_down(&self, origin: Vec3, length: f32, terrain: &TerrainGrid) -> bool {
        let top = origin.y + 1.0;
        let bottom = origin.y - length;

        let ground = terrain.height_at(origin.x, origin.z);
        if ground >= bottom && ground <= top {
            return true;
        }

        self.bodies.values().any(|body| {
            if body.is_dynamic() || body.desc.group & groups::STATIC == 0 {
                return false;
            }
            let aabb = body.aabb();
            aabb.covers(origin.x, origin.z) && aabb.max.y >= bottom && aabb.min.y <= top
        })
    }
}
