//! # Spawning
//!
//! Startup population and the per-tick random spawns.
//!
//! Everything is placed with the terrain grid's `height_at`, after the
//! building plots are flattened, so nothing floats over a flattened plot
//! or sinks into it.

use rand::Rng;
use stranded_core::EntityId;
use stranded_economy::{pickup_amount, ItemKind, Objective, QuestOffer, Reward};
use stranded_shared::{Quaternion, Vec3};
use tracing::{debug, info};

use crate::assets::ModelRole;
use crate::entities::{Enemy, EnemyState, Npc, Tree};
use crate::events::GameEvent;
use crate::gameplay::buildings;
use crate::physics::{groups, BodyDesc};
use crate::world::World;

/// Enemy body mass.
pub const ENEMY_MASS: f32 = 1.0;

/// Enemy body damping.
pub const ENEMY_DAMPING: f32 = 0.6;

/// Model tag of quest givers.
pub const NPC_MODEL: &str = "NPC";

/// Model tag of trees.
pub const TREE_MODEL: &str = "tree";

/// The quest every NPC hands out.
#[must_use]
pub fn npc_offer() -> QuestOffer {
    QuestOffer::new(
        "Collect 5 crystal_shards",
        Objective::CollectItem {
            item: ItemKind::CrystalShard,
            count: 5,
        },
        Reward::Item(ItemKind::LaserSword),
    )
}

// =============================================================================
// STARTUP
// =============================================================================

/// Populates a fresh world: buildings first, then resources, enemies,
/// NPCs and trees.
pub fn populate(world: &mut World) {
    let buildings = buildings::place_buildings(world);

    let spawning = world.config.spawning.clone();
    for _ in 0..spawning.initial_resources {
        spawn_resource(world);
    }
    for _ in 0..spawning.initial_enemies {
        spawn_random_enemy(world);
    }
    for _ in 0..spawning.npcs {
        spawn_npc(world);
    }
    for _ in 0..spawning.trees {
        spawn_tree(world);
    }

    info!(
        buildings,
        loot = world.entities.loot.len(),
        enemies = world.entities.enemies.len(),
        npcs = world.entities.npcs.len(),
        trees = world.entities.trees.len(),
        "world populated"
    );
}

/// Per-tick rolls: maybe a resource, maybe an enemy while under the cap.
pub fn random_spawns(world: &mut World) {
    if world.rng.gen_bool(world.config.spawning.resource_chance_per_tick) {
        spawn_resource(world);
    }
    let enemies = &world.entities.enemies;
    let live = enemies.len() - enemies.pending_len();
    if live < world.config.enemies.max_enemies
        && world.rng.gen_bool(world.config.spawning.enemy_chance_per_tick)
    {
        spawn_random_enemy(world);
    }
}

// =============================================================================
// ENEMIES
// =============================================================================

/// Spawns an enemy of a weighted-random archetype somewhere in the world.
pub fn spawn_random_enemy(world: &mut World) -> Option<EntityId> {
    let index = world.enemy_table.choose(&mut world.rng)?;
    let (x, z) = world.random_ground_point();
    let y = world.ground_height(x, z) + world.config.enemies.height_offset;
    spawn_enemy(world, index, Vec3::new(x, y, z))
}

/// Spawns an enemy of archetype `index` at `position`.
///
/// `None` when the archetype does not exist.
pub fn spawn_enemy(world: &mut World, index: usize, position: Vec3) -> Option<EntityId> {
    let archetype = world.config.enemies.archetypes.get(index)?.clone();
    let prototype = world.catalog.resolve(&archetype.name, ModelRole::Enemy);

    let id = world.entities.enemies.next_id();
    let body = world.physics.add_body(
        BodyDesc::dynamic(prototype.shape, position, ENEMY_MASS)
            .with_filter(
                groups::ENEMY,
                groups::PLAYER | groups::PROJECTILE | groups::STATIC,
            )
            .with_damping(ENEMY_DAMPING)
            .with_owner(id),
    );

    let spawned = world.entities.enemies.spawn(Enemy {
        archetype: archetype.name.clone(),
        body,
        position,
        health: archetype.health,
        max_health: archetype.health,
        speed: archetype.speed,
        damage: archetype.damage,
        chase_range: archetype.chase_range,
        attack_range: archetype.attack_range,
        attack_cooldown: archetype.attack_cooldown,
        state: EnemyState::Wandering,
        last_attack: None,
        wander_target: None,
        attack_started: None,
        facing: Quaternion::IDENTITY,
        orientation: Quaternion::IDENTITY,
    });
    debug!(id = %spawned, archetype = %archetype.name, "enemy spawned");
    world.emit(GameEvent::EntitySpawned {
        id: spawned,
        tag: archetype.name,
        position,
    });
    Some(spawned)
}

// =============================================================================
// RESOURCES AND STATICS
// =============================================================================

/// Drops a weighted-random resource pickup of 1 to 3 units somewhere in
/// the world.
pub fn spawn_resource(world: &mut World) -> Option<EntityId> {
    let item = world.resource_table.choose(&mut world.rng)?;
    let amount = pickup_amount(&mut world.rng);
    let (x, z) = world.random_ground_point();
    let y = world.ground_height(x, z) + world.config.spawning.resource_height_offset;
    Some(world.spawn_loot(item, amount, Vec3::new(x, y, z)))
}

/// Places a quest giver somewhere in the world.
pub fn spawn_npc(world: &mut World) -> EntityId {
    let (x, z) = world.random_ground_point();
    spawn_npc_at(world, x, z)
}

/// Places a quest giver standing on the terrain at `(x, z)`.
pub fn spawn_npc_at(world: &mut World, x: f32, z: f32) -> EntityId {
    let position = Vec3::new(
        x,
        world.ground_height(x, z) + world.config.spawning.npc_height_offset,
        z,
    );
    let prototype = world.catalog.resolve(NPC_MODEL, ModelRole::Npc);
    let id = world.entities.npcs.next_id();
    let body = world
        .physics
        .add_body(BodyDesc::fixed(prototype.shape, position).with_owner(id));

    let spawned = world.entities.npcs.spawn(Npc {
        body,
        position,
        offer: Some(npc_offer()),
    });
    world.emit(GameEvent::EntitySpawned {
        id: spawned,
        tag: NPC_MODEL.to_string(),
        position,
    });
    spawned
}

/// Plants a tree somewhere in the world.
pub fn spawn_tree(world: &mut World) -> EntityId {
    let (x, z) = world.random_ground_point();
    let position = Vec3::new(
        x,
        world.ground_height(x, z) + world.config.spawning.tree_height_offset,
        z,
    );
    let prototype = world.catalog.resolve(TREE_MODEL, ModelRole::Tree);
    let id = world.entities.trees.next_id();
    let body = world
        .physics
        .add_body(BodyDesc::fixed(prototype.shape, position).with_owner(id));

    let spawned = world.entities.trees.spawn(Tree { body, position });
    world.emit(GameEvent::EntitySpawned {
        id: spawned,
        tag: TREE_MODEL.to_string(),
        position,
    });
    spawned
}
