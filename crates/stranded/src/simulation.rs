//! # Simulation
//!
//! `Simulation` owns the world, the frame clock and the event bus, and
//! runs the fixed per-tick order:
//!
//! ```text
//! clock → physics + contacts → doors → movement → combat → enemy AI
//!       → survival → day-night → particles → interactions
//!       → timers → spawns → purge → feedback + stats
//! ```
//!
//! Every system sees stable registries: removals requested anywhere in
//! the tick only take effect in the purge phase.

use std::time::Instant;

use stranded_core::EntityId;
use stranded_shared::{Quaternion, Vec3};
use tracing::{debug, info};

use crate::assets::{AssetSource, ModelCatalog};
use crate::config::SimConfig;
use crate::day_night::Lighting;
use crate::error::SimResult;
use crate::events::{EventBus, EventReceiver};
use crate::game_loop::{FrameClock, FrameStats, FrameStatsAccumulator};
use crate::gameplay::{
    buildings, combat, enemy, interaction, movement, spawning, survival, trade, weapons,
};
use crate::input::{InputSnapshot, PlayerCommand};
use crate::physics::{BodyHandle, KinematicWorld, PhysicsWorld};
use crate::world::World;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Pose of one entity as a renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    /// Entity id.
    pub id: EntityId,
    /// World position.
    pub position: Vec3,
    /// World orientation.
    pub orientation: Quaternion,
}

/// Door pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorView {
    /// Building the door belongs to.
    pub building: EntityId,
    /// Hinge position.
    pub hinge: Vec3,
    /// Current swing angle.
    pub angle: f32,
}

/// Player pose and HUD values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    /// Body center.
    pub position: Vec3,
    /// Smoothed orientation.
    pub orientation: Quaternion,
    /// Health.
    pub health: f32,
    /// Food meter.
    pub hunger: f32,
    /// Water meter.
    pub thirst: f32,
    /// Stamina meter.
    pub stamina: f32,
    /// Rounds in the equipped gun.
    pub magazine: Option<u32>,
}

/// Everything a render consumer reads after a tick.
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    /// Frame the snapshot was taken after.
    pub frame: u64,
    /// Simulated seconds since start.
    pub time: f32,
    /// The player.
    pub player: PlayerView,
    /// Live enemies.
    pub enemies: Vec<EntityView>,
    /// Shots in flight.
    pub projectiles: Vec<EntityView>,
    /// Pickups.
    pub loot: Vec<EntityView>,
    /// Quest givers.
    pub npcs: Vec<EntityView>,
    /// Trees.
    pub trees: Vec<EntityView>,
    /// Building doors.
    pub doors: Vec<DoorView>,
    /// Current light.
    pub lighting: Lighting,
    /// Bumped whenever terrain heights changed; rebuild the mesh on change.
    pub terrain_revision: u64,
    /// Message on screen, if any.
    pub message: Option<String>,
}

fn view(id: EntityId, position: Vec3, orientation: Quaternion) -> EntityView {
    EntityView {
        id,
        position,
        orientation,
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// The survival simulation.
pub struct Simulation {
    world: World,
    clock: FrameClock,
    bus: EventBus,
    stats: FrameStatsAccumulator,
}

impl Simulation {
    /// Loads assets, generates the world and populates it, using the
    /// built-in kinematic physics.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config or on the first model that does not load.
    pub fn new(config: SimConfig, assets: &mut dyn AssetSource) -> SimResult<Self> {
        let physics = Box::new(KinematicWorld::new(
            config.world.gravity,
            config.world.fixed_timestep,
            config.world.max_substeps,
        ));
        Self::with_physics(config, assets, physics)
    }

    /// Same as `new` with a caller-supplied physics service.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config or on the first model that does not load.
    pub fn with_physics(
        config: SimConfig,
        assets: &mut dyn AssetSource,
        physics: Box<dyn PhysicsWorld>,
    ) -> SimResult<Self> {
        config.validate()?;
        let catalog = ModelCatalog::load_all(assets)?;
        let bus = EventBus::new(config.world.event_capacity);
        let clock = FrameClock::new(config.world.max_frame_delta);

        let mut world = World::new(config, physics, catalog, bus.sender())?;
        spawning::populate(&mut world);

        Ok(Self {
            world,
            clock,
            bus,
            stats: FrameStatsAccumulator::new(),
        })
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self, elapsed: f32, input: &InputSnapshot) -> FrameStats {
        let start = Instant::now();

        let dt = self.clock.advance(elapsed);
        let world = &mut self.world;
        world.now = self.clock.now();

        let physics_start = Instant::now();
        let contacts = world.physics.step(dt, &world.terrain);
        combat::resolve_contacts(world, &contacts);
        movement::clamp_to_ground(world);
        movement::sync_positions(world);
        let physics_us = elapsed_us(physics_start);

        let logic_start = Instant::now();
        buildings::update_doors(world, dt);
        movement::update_movement(world, input, dt);
        combat::update_cooldown(world, dt);
        for &command in &input.commands {
            dispatch(world, command, input);
        }
        enemy::update_enemies(world, dt);
        survival::update_survival(world, dt);
        world.day_night.advance(dt);
        world.particles.update(dt);
        interaction::update_interactions(world, input);
        weapons::expire_projectiles(world);
        weapons::update_swing(world);
        weapons::update_reload(world);
        spawning::random_spawns(world);
        let logic_us = elapsed_us(logic_start);

        let purge_start = Instant::now();
        let removed = world.entities.purge(world.physics.as_mut(), &world.events);
        let purge_us = elapsed_us(purge_start);

        world.feedback.advance(dt);

        let stats = FrameStats {
            frame: self.clock.frame(),
            delta_time: dt,
            total_us: elapsed_us(start),
            physics_us,
            logic_us,
            purge_us,
            contacts: u32::try_from(contacts.len()).unwrap_or(u32::MAX),
            removed: u32::try_from(removed).unwrap_or(u32::MAX),
        };
        self.stats.record(stats);
        if removed > 0 {
            debug!(frame = stats.frame, removed, "purged");
        }
        stats
    }

    /// Current render view.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let world = &self.world;
        let entities = &world.entities;
        let physics = &world.physics;
        let pose = |body: BodyHandle| physics.orientation(body).unwrap_or(Quaternion::IDENTITY);

        let player = &world.player;
        WorldSnapshot {
            frame: self.clock.frame(),
            time: self.clock.now(),
            player: PlayerView {
                position: player.position,
                orientation: player.orientation,
                health: player.health,
                hunger: player.hunger,
                thirst: player.thirst,
                stamina: player.stamina,
                magazine: player.magazine(),
            },
            enemies: entities
                .enemies
                .iter()
                .map(|(id, enemy)| view(id, enemy.position, enemy.orientation))
                .collect(),
            projectiles: entities
                .projectiles
                .iter()
                .map(|(id, shot)| view(id, shot.position, pose(shot.body)))
                .collect(),
            loot: entities
                .loot
                .iter()
                .map(|(id, loot)| view(id, loot.position, Quaternion::IDENTITY))
                .collect(),
            npcs: entities
                .npcs
                .iter()
                .map(|(id, npc)| view(id, npc.position, pose(npc.body)))
                .collect(),
            trees: entities
                .trees
                .iter()
                .map(|(id, tree)| view(id, tree.position, pose(tree.body)))
                .collect(),
            doors: entities
                .buildings
                .iter()
                .map(|(id, building)| DoorView {
                    building: id,
                    hinge: building.door.hinge,
                    angle: building.door.angle,
                })
                .collect(),
            lighting: world.day_night.lighting(),
            terrain_revision: world.terrain.revision(),
            message: world.feedback.current().map(str::to_string),
        }
    }

    /// New receiver on the outbound event channel.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }

    /// Events dropped because nobody drained the channel.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.bus.dropped()
    }

    /// The world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world state, for scripted setups.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Frames run so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Accumulated frame statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Logs the frame statistics and a world summary.
    pub fn log_summary(&self) {
        self.stats.log_summary();
        let world = &self.world;
        info!(
            time = format_args!("{:.1}", self.clock.now()),
            enemies = world.entities.enemies.len(),
            loot = world.entities.loot.len(),
            defeated = world.player.enemies_defeated,
            health = format_args!("{:.1}", world.player.health),
            "world summary"
        );
    }
}

fn dispatch(world: &mut World, command: PlayerCommand, input: &InputSnapshot) {
    match command {
        PlayerCommand::Attack => combat::attack(world, input),
        PlayerCommand::Reload => weapons::reload(world),
        PlayerCommand::ToggleAim => weapons::toggle_aim(world),
        PlayerCommand::PlaceCampfire => trade::place_campfire(world),
        PlayerCommand::Equip(item) => weapons::equip(world, item),
        PlayerCommand::Unequip => weapons::unequip(world),
        PlayerCommand::Use(item) => survival::use_item(world, item),
        PlayerCommand::Craft(item) => trade::craft(world, item),
        PlayerCommand::Purchase(item) => trade::purchase(world, item),
    }
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::error::SimError;
    use crate::events::GameEvent;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.world.terrain_segments = 50;
        config
    }

    fn simulation() -> Simulation {
        Simulation::new(small_config(), &mut MemoryAssets::standard()).unwrap()
    }

    #[test]
    fn test_failed_asset_aborts_startup() {
        let mut assets = MemoryAssets::standard().with_broken("tree");
        let result = Simulation::new(small_config(), &mut assets);
        assert!(matches!(result, Err(SimError::AssetLoad { id, .. }) if id == "tree"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.world.terrain_segments = 0;
        let result = Simulation::new(config, &mut MemoryAssets::standard());
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_tick_clamps_delta() {
        let mut sim = simulation();
        let stats = sim.tick(5.0, &InputSnapshot::idle());
        assert!((stats.delta_time - 0.1).abs() < 1e-6);
        assert_eq!(stats.frame, 1);
        assert!((sim.world().now - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_startup_announces_entities() {
        let sim = simulation();
        let events = sim.events().drain();
        let trees = events
            .iter()
            .filter(|event| matches!(event, GameEvent::EntitySpawned { tag, .. } if tag == "tree"))
            .count();
        assert_eq!(trees, 50);
    }

    #[test]
    fn test_commands_dispatched() {
        let mut sim = simulation();
        let input = InputSnapshot::idle().with_command(PlayerCommand::PlaceCampfire);
        sim.tick(1.0 / 60.0, &input);
        assert!(sim.world().player.campfire.is_some());
    }

    #[test]
    fn test_queued_entities_gone_after_tick() {
        let mut sim = simulation();
        let ids = sim.world().entities.loot.ids();
        for &id in &ids {
            sim.world_mut().entities.queue_removal(id);
        }
        let stats = sim.tick(1.0 / 60.0, &InputSnapshot::idle());
        assert!(stats.removed as usize >= ids.len());
        assert!(ids.iter().all(|&id| !sim.world().entities.loot.contains(id)));
    }

    #[test]
    fn test_snapshot_reflects_world() {
        let mut sim = simulation();
        sim.tick(1.0 / 60.0, &InputSnapshot::idle());
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.frame, 1);
        assert_eq!(snapshot.trees.len(), 50);
        assert_eq!(snapshot.doors.len(), sim.world().entities.buildings.len());
        assert_eq!(snapshot.terrain_revision, sim.world().terrain.revision());
    }
}
