//! # Entity Variants
//!
//! Per-kind payloads stored in the registries, plus `Entities`, which owns
//! one registry per kind and runs the purge phase.
//!
//! Positions of body-backed entities are cached here and refreshed from
//! the physics seam after every step, so gameplay code reads them without
//! going through the trait object.

use stranded_core::{EntityId, EntityKind, Registry};
use stranded_economy::{ItemKind, QuestOffer};
use stranded_shared::{Quaternion, Vec3};
use tracing::debug;

use crate::events::{EventSender, GameEvent};
use crate::physics::{BodyHandle, PhysicsWorld};

// ============================================================================
// ENEMY
// ============================================================================

/// Movement behavior of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// Walking to a random nearby point.
    Wandering,
    /// Running at the player.
    Chasing,
    /// Running away from the player. Never left once entered.
    Fleeing,
}

/// A hostile creature.
#[derive(Clone, Debug)]
pub struct Enemy {
    /// Archetype name, also the model tag.
    pub archetype: String,
    /// Physics body.
    pub body: BodyHandle,
    /// Center, refreshed after each physics step.
    pub position: Vec3,
    /// Current health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Chase speed.
    pub speed: f32,
    /// Damage per attack.
    pub damage: f32,
    /// Distance at which chasing starts.
    pub chase_range: f32,
    /// Distance at which attacks land.
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
    /// Behavior this tick.
    pub state: EnemyState,
    /// Time of the last attack; `None` means ready.
    pub last_attack: Option<f32>,
    /// Current wander destination.
    pub wander_target: Option<Vec3>,
    /// Start time of the running attack tilt.
    pub attack_started: Option<f32>,
    /// Yaw-only facing target.
    pub facing: Quaternion,
    /// Smoothed orientation pushed to the body.
    pub orientation: Quaternion,
}

impl Enemy {
    /// True when health is below `threshold` of max health.
    #[inline]
    #[must_use]
    pub fn is_wounded(&self, threshold: f32) -> bool {
        self.health < self.max_health * threshold
    }
}

// ============================================================================
// PROJECTILE
// ============================================================================

/// A shot in flight.
#[derive(Clone, Debug)]
pub struct Projectile {
    /// Physics body.
    pub body: BodyHandle,
    /// Center, refreshed after each physics step.
    pub position: Vec3,
    /// Launch velocity.
    pub velocity: Vec3,
    /// Sim time at launch.
    pub spawned_at: f32,
    /// Damage applied to an enemy on hit.
    pub damage: f32,
    /// False once it resolved a hit or was queued for removal.
    pub active: bool,
}

// ============================================================================
// LOOT
// ============================================================================

/// A pickup lying on the ground.
#[derive(Clone, Debug)]
pub struct Loot {
    /// Item credited on pickup.
    pub item: ItemKind,
    /// Units credited on pickup.
    pub amount: u32,
    /// Resting position.
    pub position: Vec3,
}

// ============================================================================
// STATICS
// ============================================================================

/// A quest giver.
#[derive(Clone, Debug)]
pub struct Npc {
    /// Static body.
    pub body: BodyHandle,
    /// Position.
    pub position: Vec3,
    /// Quest still on offer; taken on first interaction.
    pub offer: Option<QuestOffer>,
}

/// A tree.
#[derive(Clone, Debug)]
pub struct Tree {
    /// Static body.
    pub body: BodyHandle,
    /// Position.
    pub position: Vec3,
}

/// A chest inside a building.
#[derive(Clone, Debug)]
pub struct Chest {
    /// World position on the floor.
    pub position: Vec3,
    /// Opened chests never open again.
    pub opened: bool,
}

/// A swinging door on a building's front face.
#[derive(Clone, Debug)]
pub struct Door {
    /// Hinge position in world space.
    pub hinge: Vec3,
    /// Door width.
    pub width: f32,
    /// Door height.
    pub height: f32,
    /// Current angle, 0 = closed.
    pub angle: f32,
    /// Angle the door turns toward.
    pub target: f32,
    /// Body while attached; attached only when fully closed.
    pub body: Option<BodyHandle>,
}

impl Door {
    /// Angle of a fully open door.
    pub const OPEN_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

    /// Center of the door leaf at its current angle.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        let half = self.width * 0.5;
        Vec3::new(
            self.hinge.x + half * self.angle.cos(),
            self.hinge.y,
            self.hinge.z + half * self.angle.sin(),
        )
    }

    /// True while the door is turning.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_moving(&self) -> bool {
        self.angle != self.target
    }

    /// True when the door is heading to (or at) the open angle.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_opening(&self) -> bool {
        self.target != 0.0
    }
}

/// A house: walls, one door, maybe a chest.
#[derive(Clone, Debug)]
pub struct Building {
    /// Center of the wall box.
    pub center: Vec3,
    /// Size on x.
    pub width: f32,
    /// Size on z.
    pub depth: f32,
    /// Wall height.
    pub height: f32,
    /// Wall bodies.
    pub walls: Vec<BodyHandle>,
    /// Front door.
    pub door: Door,
    /// Optional chest.
    pub chest: Option<Chest>,
}

// ============================================================================
// ENTITIES
// ============================================================================

/// One registry per entity kind.
#[derive(Clone, Debug)]
pub struct Entities {
    /// Hostiles.
    pub enemies: Registry<Enemy>,
    /// Shots.
    pub projectiles: Registry<Projectile>,
    /// Pickups.
    pub loot: Registry<Loot>,
    /// Quest givers.
    pub npcs: Registry<Npc>,
    /// Trees.
    pub trees: Registry<Tree>,
    /// Houses.
    pub buildings: Registry<Building>,
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

impl Entities {
    /// Empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enemies: Registry::with_capacity(EntityKind::Enemy, 16),
            projectiles: Registry::with_capacity(EntityKind::Projectile, 32),
            loot: Registry::with_capacity(EntityKind::Loot, 64),
            npcs: Registry::new(EntityKind::Npc),
            trees: Registry::with_capacity(EntityKind::Tree, 64),
            buildings: Registry::new(EntityKind::Building),
        }
    }

    /// Entities waiting for purge, all kinds.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.enemies.pending_len()
            + self.projectiles.pending_len()
            + self.loot.pending_len()
            + self.npcs.pending_len()
            + self.trees.pending_len()
            + self.buildings.pending_len()
    }

    /// Marks any entity for removal. Projectiles are deactivated too.
    ///
    /// Returns `false` when the id is absent or already queued.
    pub fn queue_removal(&mut self, id: EntityId) -> bool {
        match id.kind() {
            Some(EntityKind::Enemy) => self.enemies.queue_removal(id),
            Some(EntityKind::Projectile) => {
                if let Some(projectile) = self.projectiles.get_mut(id) {
                    projectile.active = false;
                }
                self.projectiles.queue_removal(id)
            }
            Some(EntityKind::Loot) => self.loot.queue_removal(id),
            Some(EntityKind::Npc) => self.npcs.queue_removal(id),
            Some(EntityKind::Tree) => self.trees.queue_removal(id),
            Some(EntityKind::Building) => self.buildings.queue_removal(id),
            None => false,
        }
    }

    /// Removes every queued entity, detaches its bodies and announces it.
    ///
    /// Returns how many entities left.
    pub fn purge(&mut self, physics: &mut dyn PhysicsWorld, events: &EventSender) -> usize {
        let mut removed = Vec::new();

        for (id, enemy) in self.enemies.purge() {
            physics.remove_body(enemy.body);
            removed.push(id);
        }
        for (id, projectile) in self.projectiles.purge() {
            physics.remove_body(projectile.body);
            removed.push(id);
        }
        removed.extend(self.loot.purge().into_iter().map(|(id, _)| id));
        for (id, npc) in self.npcs.purge() {
            physics.remove_body(npc.body);
            removed.push(id);
        }
        for (id, tree) in self.trees.purge() {
            physics.remove_body(tree.body);
            removed.push(id);
        }
        for (id, building) in self.buildings.purge() {
            for wall in building.walls {
                physics.remove_body(wall);
            }
            if let Some(door) = building.door.body {
                physics.remove_body(door);
            }
            removed.push(id);
        }

        for &id in &removed {
            let _ = events.send(GameEvent::EntityDespawned { id });
        }
        if !removed.is_empty() {
            debug!(count = removed.len(), "purge complete");
        }
        removed.len()
    }
}
