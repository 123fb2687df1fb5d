//! # Gameplay Systems
//!
//! Free functions over `&mut World`, one module per system:
//! - `movement`: walking, running, jumping, ground clamp
//! - `combat`: attacks, projectile contacts, the defeat path
//! - `weapons`: equip, aim, fire, reload, swing
//! - `enemy`: the enemy AI controller
//! - `survival`: hunger, thirst, item use
//! - `trade`: crafting, shop, campfire
//! - `buildings`: plots, doors, chests
//! - `interaction`: the interact key
//! - `spawning`: startup population and random spawns

pub mod buildings;
pub mod combat;
pub mod enemy;
pub mod interaction;
pub mod movement;
pub mod spawning;
pub mod survival;
pub mod trade;
pub mod weapons;

pub use combat::{attack, defeat_enemy, hit_enemy, resolve_contacts};
pub use enemy::update_enemies;
pub use interaction::update_interactions;
pub use movement::{clamp_to_ground, update_movement};
pub use spawning::{populate, random_spawns};
pub use survival::{update_survival, use_item};

#[cfg(test)]
use crate::world::World;

/// World on flat ground at height 0, player standing at `(0, 2, 0)`,
/// nothing spawned.
#[cfg(test)]
pub(crate) fn test_world() -> World {
    use stranded_procedural::TerrainGrid;
    use stranded_shared::Vec3;

    use crate::assets::ModelCatalog;
    use crate::config::SimConfig;
    use crate::events::EventBus;
    use crate::physics::KinematicWorld;

    let mut config = SimConfig::default();
    config.world.terrain_segments = 50;
    let physics = Box::new(KinematicWorld::new(
        config.world.gravity,
        config.world.fixed_timestep,
        config.world.max_substeps,
    ));
    let bus = EventBus::new(config.world.event_capacity);
    let size = config.world.terrain_size;
    let segments = config.world.terrain_segments;

    let mut world = World::new(config, physics, ModelCatalog::new(), bus.sender()).unwrap();
    world.terrain = TerrainGrid::from_fn(size, segments, |_, _| 0.0);

    let spawn = Vec3::new(0.0, 2.0, 0.0);
    world.physics.set_position(world.player.body, spawn);
    world.player.position = spawn;
    world
}

/// Spawns an enemy of archetype `index` at `position`.
#[cfg(test)]
pub(crate) fn spawn_enemy_at(
    world: &mut World,
    index: usize,
    position: stranded_shared::Vec3,
) -> stranded_core::EntityId {
    spawning::spawn_enemy(world, index, position).unwrap()
}
