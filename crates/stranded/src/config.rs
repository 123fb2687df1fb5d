//! # Simulation Config
//!
//! Every tunable the simulation reads, grouped by system. Each section
//! falls back to its defaults field by field, so a config file only needs
//! to name what it changes:
//!
//! ```toml
//! [world]
//! seed = 7
//!
//! [enemies]
//! max_chasing = 3
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stranded_economy::{Inventory, ItemKind};
use stranded_procedural::HeightFieldParams;
use stranded_shared::constants::{
    FIXED_TIMESTEP, MAX_FRAME_DELTA, MAX_SUBSTEPS, TERRAIN_SEGMENTS, TERRAIN_SIZE,
};

use crate::error::{SimError, SimResult};

// =============================================================================
// SECTIONS
// =============================================================================

/// World extent, seed and clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for terrain noise and every random roll.
    pub seed: u64,
    /// Side length of the square world.
    pub terrain_size: f32,
    /// Grid cells per side.
    pub terrain_segments: usize,
    /// Downward acceleration on dynamic bodies.
    pub gravity: f32,
    /// Physics step length.
    pub fixed_timestep: f32,
    /// Physics steps allowed per frame.
    pub max_substeps: u32,
    /// Frame delta clamp.
    pub max_frame_delta: f32,
    /// Capacity of the outbound event channel.
    pub event_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            terrain_size: TERRAIN_SIZE,
            terrain_segments: TERRAIN_SEGMENTS,
            gravity: 19.6,
            fixed_timestep: FIXED_TIMESTEP,
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta: MAX_FRAME_DELTA,
            event_capacity: 1024,
        }
    }
}

/// Player movement and meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting and respawn health.
    pub max_health: f32,
    /// Starting stamina cap.
    pub max_stamina: f32,
    /// Walking speed.
    pub walk_speed: f32,
    /// Running speed.
    pub run_speed: f32,
    /// Speed while aiming.
    pub aim_speed: f32,
    /// Velocity correction gain while grounded.
    pub acceleration: f32,
    /// Length of the downward grounding ray.
    pub ground_ray_length: f32,
    /// Windup before leaving the ground.
    pub jump_delay: f32,
    /// Time spent rising.
    pub jump_up_duration: f32,
    /// Minimum time spent falling.
    pub jump_down_duration: f32,
    /// Vertical velocity at take-off.
    pub jump_velocity: f32,
    /// Stamina drained per second of running.
    pub stamina_drain: f32,
    /// Stamina regained per second at rest.
    pub stamina_regen: f32,
    /// Spawn height above the terrain.
    pub spawn_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            walk_speed: 10.0,
            run_speed: 20.0,
            aim_speed: 5.0,
            acceleration: 100.0,
            ground_ray_length: 10.0,
            jump_delay: 0.3,
            jump_up_duration: 0.75,
            jump_down_duration: 0.8,
            jump_velocity: 10.0,
            stamina_drain: 10.0,
            stamina_regen: 5.0,
            spawn_height: 2.0,
        }
    }
}

/// One enemy type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    /// Type tag, also the model id.
    pub name: String,
    /// Starting and maximum health.
    pub health: f32,
    /// Chase speed.
    pub speed: f32,
    /// Damage per landed attack.
    pub damage: f32,
    /// Distance at which pursuit starts.
    pub chase_range: f32,
    /// Distance at which attacks land.
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
    /// Relative spawn weight.
    pub spawn_weight: f32,
}

impl EnemyArchetype {
    fn new(name: &str, stats: [f32; 7]) -> Self {
        let [health, speed, damage, chase_range, attack_range, attack_cooldown, spawn_weight] =
            stats;
        Self {
            name: name.to_owned(),
            health,
            speed,
            damage,
            chase_range,
            attack_range,
            attack_cooldown,
            spawn_weight,
        }
    }

    /// The four stock enemy types.
    #[must_use]
    pub fn standard() -> Vec<Self> {
        vec![
            Self::new("enemy1", [30.0, 4.0, 5.0, 15.0, 5.0, 1.5, 0.4]),
            Self::new("enemy2", [100.0, 3.0, 12.0, 20.0, 7.0, 2.5, 0.2]),
            Self::new("enemy3", [50.0, 6.0, 8.0, 18.0, 6.0, 1.0, 0.3]),
            Self::new("enemy4", [150.0, 5.0, 15.0, 22.0, 8.0, 3.0, 0.1]),
        ]
    }
}

/// Enemy population and AI tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Population cap for random spawns.
    pub max_enemies: usize,
    /// Pursuers allowed per tick.
    pub max_chasing: usize,
    /// Speed while wandering.
    pub wander_speed: f32,
    /// Speed while fleeing.
    pub flee_speed: f32,
    /// Fraction of max health below which an enemy flees for good.
    pub flee_health_threshold: f32,
    /// Height above the terrain enemies are pinned to.
    pub height_offset: f32,
    /// Shortest wander leg.
    pub wander_min_distance: f32,
    /// Longest wander leg.
    pub wander_max_distance: f32,
    /// Distance at which a wander target counts as reached.
    pub arrival_distance: f32,
    /// Per-tick blend toward the movement facing.
    pub facing_slerp: f32,
    /// Length of the attack tilt.
    pub attack_tilt_duration: f32,
    /// Peak attack tilt in radians.
    pub attack_tilt_angle: f32,
    /// Enemy types.
    pub archetypes: Vec<EnemyArchetype>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_enemies: 15,
            max_chasing: 5,
            wander_speed: 2.0,
            flee_speed: 8.0,
            flee_health_threshold: 0.2,
            height_offset: 4.0,
            wander_min_distance: 5.0,
            wander_max_distance: 10.0,
            arrival_distance: 1.0,
            facing_slerp: 0.1,
            attack_tilt_duration: 0.3,
            attack_tilt_angle: std::f32::consts::FRAC_PI_6,
            archetypes: EnemyArchetype::standard(),
        }
    }
}

/// Damage, projectiles and loot scatter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Unarmed damage.
    pub barehanded_damage: f32,
    /// Unarmed cooldown.
    pub barehanded_cooldown: f32,
    /// Unarmed swing radius.
    pub barehanded_radius: f32,
    /// Melee weapon swing radius.
    pub melee_radius: f32,
    /// Muzzle speed.
    pub projectile_speed: f32,
    /// Projectile sphere radius.
    pub projectile_radius: f32,
    /// Seconds before an unresolved projectile expires.
    pub projectile_lifetime: f32,
    /// Muzzle height above the player origin.
    pub muzzle_height: f32,
    /// Player invulnerability after a hit.
    pub invulnerability: f32,
    /// Campfire damage radius.
    pub campfire_radius: f32,
    /// Campfire damage per second.
    pub campfire_damage_per_second: f32,
    /// Half-width of the loot scatter square.
    pub loot_spread: f32,
    /// Loot height above the terrain.
    pub loot_height_offset: f32,
    /// Blood particles per hit.
    pub blood_particles: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            barehanded_damage: 10.0,
            barehanded_cooldown: 1.0,
            barehanded_radius: 8.0,
            melee_radius: 10.0,
            projectile_speed: 80.0,
            projectile_radius: 0.2,
            projectile_lifetime: 5.0,
            muzzle_height: 1.5,
            invulnerability: 0.5,
            campfire_radius: 10.0,
            campfire_damage_per_second: 100.0,
            loot_spread: 1.5,
            loot_height_offset: 0.5,
            blood_particles: 20,
        }
    }
}

/// Hunger and thirst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    /// Hunger lost per second.
    pub hunger_rate: f32,
    /// Thirst lost per second.
    pub thirst_rate: f32,
    /// Health lost per second while either meter is empty.
    pub starvation_damage: f32,
    /// Meter cap.
    pub max_meter: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            hunger_rate: 0.5,
            thirst_rate: 0.7,
            starvation_damage: 2.0,
            max_meter: 100.0,
        }
    }
}

/// Length of the day-night cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Day portion in seconds.
    pub day_length: f32,
    /// Night portion in seconds.
    pub night_length: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            day_length: 1200.0,
            night_length: 60.0,
        }
    }
}

/// Startup population and per-tick spawn rolls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Resources placed at startup.
    pub initial_resources: usize,
    /// Enemies placed at startup.
    pub initial_enemies: usize,
    /// Quest givers placed at startup.
    pub npcs: usize,
    /// Trees placed at startup.
    pub trees: usize,
    /// Per-tick chance of a resource spawn.
    pub resource_chance_per_tick: f64,
    /// Per-tick chance of an enemy spawn.
    pub enemy_chance_per_tick: f64,
    /// Fewest buildings placed.
    pub min_buildings: usize,
    /// Most buildings placed.
    pub max_buildings: usize,
    /// Flattened margin added to the building footprint.
    pub building_flat_margin: f32,
    /// Nominal building footprint side.
    pub building_base_size: f32,
    /// Largest height spread accepted for a plot.
    pub flatness_threshold: f32,
    /// Plot candidates tried per building.
    pub placement_attempts: u32,
    /// Chance that a building holds a chest.
    pub chest_chance: f64,
    /// Height offset of resources.
    pub resource_height_offset: f32,
    /// Height offset of quest givers.
    pub npc_height_offset: f32,
    /// Height offset of trees.
    pub tree_height_offset: f32,
    /// Height offset of a placed campfire.
    pub campfire_height_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_resources: 30,
            initial_enemies: 5,
            npcs: 3,
            trees: 50,
            resource_chance_per_tick: 0.01,
            enemy_chance_per_tick: 0.005,
            min_buildings: 2,
            max_buildings: 5,
            building_flat_margin: 50.0,
            building_base_size: 20.0,
            flatness_threshold: 5.0,
            placement_attempts: 20,
            chest_chance: 0.5,
            resource_height_offset: 1.0,
            npc_height_offset: 2.0,
            tree_height_offset: 4.0,
            campfire_height_offset: 1.0,
        }
    }
}

/// Reach of the interact key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pickup radius for loot.
    pub resource_distance: f32,
    /// Talk radius for quest givers.
    pub npc_distance: f32,
    /// Reach for chests.
    pub chest_distance: f32,
    /// Reach for doors.
    pub door_distance: f32,
    /// Door swing speed in radians per second.
    pub door_speed: f32,
    /// Pickup lockout after a chest opens.
    pub chest_collection_cooldown: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            resource_distance: 3.0,
            npc_distance: 3.0,
            chest_distance: 5.0,
            door_distance: 5.0,
            door_speed: 5.0,
            chest_collection_cooldown: 0.5,
        }
    }
}

// =============================================================================
// ROOT
// =============================================================================

/// Complete simulation config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World extent and clock.
    pub world: WorldConfig,
    /// Height field tuning.
    pub terrain: HeightFieldParams,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Enemy tuning.
    pub enemies: EnemyConfig,
    /// Combat tuning.
    pub combat: CombatConfig,
    /// Hunger and thirst.
    pub survival: SurvivalConfig,
    /// Cycle length.
    pub day_night: DayNightConfig,
    /// Population.
    pub spawning: SpawnConfig,
    /// Interaction reach.
    pub interaction: InteractionConfig,
    /// Seconds each feedback message stays visible.
    pub feedback_duration: f32,
    /// Item name to starting count.
    pub starting_inventory: BTreeMap<String, u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let starting_inventory = [
            ("gold_coin", 20),
            ("energy_cell", 50),
            ("plasma_cell", 100),
            ("campfire", 1),
            ("wood", 10),
            ("plasma_rifle", 1),
            ("energy_blaster", 1),
        ]
        .into_iter()
        .map(|(name, count)| (name.to_owned(), count))
        .collect();

        Self {
            world: WorldConfig::default(),
            terrain: HeightFieldParams::default(),
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            combat: CombatConfig::default(),
            survival: SurvivalConfig::default(),
            day_night: DayNightConfig::default(),
            spawning: SpawnConfig::default(),
            interaction: InteractionConfig::default(),
            feedback_duration: 1.0,
            starting_inventory,
        }
    }
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `SimError::Config` for malformed TOML, `SimError::InvalidConfig`
    /// when a value is out of range.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// `SimError::Io` when the file cannot be read, otherwise as
    /// `from_toml_str`.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        let w = &self.world;
        positive("world.terrain_size", w.terrain_size)?;
        if w.terrain_segments == 0 {
            return Err(invalid("world.terrain_segments must be at least 1"));
        }
        positive("world.fixed_timestep", w.fixed_timestep)?;
        positive("world.max_frame_delta", w.max_frame_delta)?;
        if w.max_substeps == 0 {
            return Err(invalid("world.max_substeps must be at least 1"));
        }
        if w.event_capacity == 0 {
            return Err(invalid("world.event_capacity must be at least 1"));
        }

        let e = &self.enemies;
        unit_interval("enemies.flee_health_threshold", e.flee_health_threshold)?;
        unit_interval("enemies.facing_slerp", e.facing_slerp)?;
        if e.wander_min_distance > e.wander_max_distance {
            return Err(invalid("enemies.wander_min_distance exceeds wander_max_distance"));
        }
        if e.archetypes.is_empty() {
            return Err(invalid("enemies.archetypes must not be empty"));
        }
        for archetype in &e.archetypes {
            positive(&format!("enemy '{}' health", archetype.name), archetype.health)?;
            if archetype.spawn_weight < 0.0 || archetype.spawn_weight.is_nan() {
                return Err(invalid(format!(
                    "enemy '{}' spawn_weight must not be negative",
                    archetype.name
                )));
            }
        }
        if e.archetypes.iter().all(|a| a.spawn_weight <= 0.0) {
            return Err(invalid("enemies.archetypes need a positive spawn_weight"));
        }

        positive("combat.projectile_speed", self.combat.projectile_speed)?;
        positive("combat.projectile_lifetime", self.combat.projectile_lifetime)?;

        let s = &self.spawning;
        unit_interval_f64("spawning.resource_chance_per_tick", s.resource_chance_per_tick)?;
        unit_interval_f64("spawning.enemy_chance_per_tick", s.enemy_chance_per_tick)?;
        unit_interval_f64("spawning.chest_chance", s.chest_chance)?;
        if s.min_buildings > s.max_buildings {
            return Err(invalid("spawning.min_buildings exceeds max_buildings"));
        }
        if s.building_base_size + s.building_flat_margin >= w.terrain_size {
            return Err(invalid("building plot does not fit in the world"));
        }

        positive(
            "day_night cycle",
            self.day_night.day_length + self.day_night.night_length,
        )?;
        positive("feedback_duration", self.feedback_duration)?;

        self.starting_inventory()?;
        Ok(())
    }

    /// Inventory built from `starting_inventory`.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfig` for an unknown item name.
    pub fn starting_inventory(&self) -> SimResult<Inventory> {
        let counts = self
            .starting_inventory
            .iter()
            .map(|(name, &count)| {
                ItemKind::from_str(name)
                    .map(|item| (item, count))
                    .map_err(|_| invalid(format!("unknown item '{name}' in starting_inventory")))
            })
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Inventory::from_counts(counts))
    }
}

fn invalid(message: impl Into<String>) -> SimError {
    SimError::InvalidConfig(message.into())
}

fn positive(field: &str, value: f32) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be positive, got {value}")))
    }
}

fn unit_interval(field: &str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be within [0, 1], got {value}")))
    }
}

fn unit_interval_f64(field: &str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be within [0, 1], got {value}")))
    }
}
