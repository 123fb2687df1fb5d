//! # World State
//!
//! `World` owns every piece of mutable simulation state: terrain, bodies,
//! entity registries, the player, the economy and the outbound queues.
//! Gameplay systems are free functions taking `&mut World`, so a test can
//! build several independent worlds side by side.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stranded_core::EntityId;
use stranded_economy::{
    resource_table, ChestLootTable, Inventory, ItemKind, QuestContext, QuestLog, RecipeBook, Reward,
    Shop, WeightedTable,
};
use stranded_procedural::{HeightField, TerrainGrid, WorldSeed};
use stranded_shared::Vec3;
use tracing::{debug, info};

use crate::assets::{loot_model, ModelCatalog, ModelRole};
use crate::config::SimConfig;
use crate::day_night::DayNightCycle;
use crate::entities::{Entities, Loot};
use crate::error::SimResult;
use crate::events::{EventSender, GameEvent};
use crate::feedback::FeedbackQueue;
use crate::particles::ParticleSystem;
use crate::physics::{groups, BodyDesc, PhysicsWorld, Shape};
use crate::player::{DamageOutcome, Player, PLAYER_DAMPING, PLAYER_HALF_EXTENTS, PLAYER_MASS};

/// Max health and max stamina gained per boost reward.
pub const BOOST_AMOUNT: f32 = 20.0;

/// All mutable simulation state.
pub struct World {
    /// Validated config.
    pub config: SimConfig,
    /// Continuous elevation function.
    pub height_field: HeightField,
    /// Sampled, flattenable terrain.
    pub terrain: TerrainGrid,
    /// Rigid-body service.
    pub physics: Box<dyn PhysicsWorld>,
    /// Entity registries.
    pub entities: Entities,
    /// The player.
    pub player: Player,
    /// Item counts.
    pub inventory: Inventory,
    /// Crafting recipes.
    pub recipes: RecipeBook,
    /// Shop stock and prices.
    pub shop: Shop,
    /// Quests accepted so far.
    pub quests: QuestLog,
    /// Messages for the HUD.
    pub feedback: FeedbackQueue,
    /// Outbound events.
    pub events: EventSender,
    /// Every random roll of the run.
    pub rng: ChaCha8Rng,
    /// Time of day.
    pub day_night: DayNightCycle,
    /// Blood particles.
    pub particles: ParticleSystem,
    /// Loaded models.
    pub catalog: ModelCatalog,
    /// Simulated seconds since start.
    pub now: f32,
    /// Resource pickup is blocked before this time.
    pub collection_cooldown_until: f32,
    /// Chest contents.
    pub chest_loot: ChestLootTable,
    /// Resource spawn weights.
    pub resource_table: WeightedTable<ItemKind>,
    /// Enemy spawn weights, by archetype index.
    pub enemy_table: WeightedTable<usize>,
    /// Interact key state of the previous tick.
    pub interact_was_held: bool,
}

impl World {
    /// Generates terrain and places the player. Nothing else is spawned.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfig` for a config that fails validation and
    /// `SimError::Economy` when the recipe book is inconsistent.
    pub fn new(
        config: SimConfig,
        mut physics: Box<dyn PhysicsWorld>,
        catalog: ModelCatalog,
        events: EventSender,
    ) -> SimResult<Self> {
        config.validate()?;
        let inventory = config.starting_inventory()?;
        let recipes = RecipeBook::standard();
        recipes.validate()?;

        let seed = config.world.seed;
        let height_field = HeightField::with_params(WorldSeed::new(seed), config.terrain);
        let terrain = TerrainGrid::build(
            &height_field,
            config.world.terrain_size,
            config.world.terrain_segments,
        );

        let spawn = Vec3::new(0.0, terrain.height_at(0.0, 0.0) + config.player.spawn_height, 0.0);
        let body = physics.add_body(
            BodyDesc::dynamic(
                Shape::Cuboid {
                    half_extents: PLAYER_HALF_EXTENTS,
                },
                spawn,
                PLAYER_MASS,
            )
            .with_filter(groups::PLAYER, groups::ENEMY | groups::STATIC)
            .with_damping(PLAYER_DAMPING),
        );
        let player = Player::new(&config.player, body, spawn, config.combat.barehanded_damage);

        let enemy_table = WeightedTable::new(
            config
                .enemies
                .archetypes
                .iter()
                .enumerate()
                .map(|(index, archetype)| (index, archetype.spawn_weight)),
        );

        info!(
            seed,
            size = config.world.terrain_size,
            segments = config.world.terrain_segments,
            "world generated"
        );

        Ok(Self {
            feedback: FeedbackQueue::new(config.feedback_duration),
            day_night: DayNightCycle::new(&config.day_night),
            rng: ChaCha8Rng::seed_from_u64(seed),
            height_field,
            terrain,
            physics,
            entities: Entities::new(),
            player,
            inventory,
            recipes,
            shop: Shop::standard(),
            quests: QuestLog::standard(),
            events,
            particles: ParticleSystem::new(),
            catalog,
            now: 0.0,
            collection_cooldown_until: 0.0,
            chest_loot: ChestLootTable::default(),
            resource_table: resource_table(),
            enemy_table,
            interact_was_held: false,
            config,
        })
    }

    // ========================================================================
    // OUTBOUND
    // ========================================================================

    /// Queues a HUD message.
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "feedback");
        self.feedback.push(message);
    }

    /// Sends an event; a full channel drops it.
    pub fn emit(&self, event: GameEvent) {
        let _ = self.events.send(event);
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Terrain height under `(x, z)`.
    #[inline]
    #[must_use]
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.terrain.height_at(x, z)
    }

    /// Uniform random `(x, z)` inside the world.
    pub fn random_ground_point(&mut self) -> (f32, f32) {
        let half = self.terrain.half_extent();
        let x = self.rng.gen_range(-half..=half);
        let z = self.rng.gen_range(-half..=half);
        (x, z)
    }

    /// Where the player appears at start and after death.
    #[must_use]
    pub fn player_spawn_point(&self) -> Vec3 {
        Vec3::new(0.0, self.ground_height(0.0, 0.0) + self.config.player.spawn_height, 0.0)
    }

    // ========================================================================
    // PLAYER
    // ========================================================================

    /// Damages the player through the invulnerability window.
    pub fn damage_player(&mut self, amount: f32) -> DamageOutcome {
        let outcome =
            self.player
                .apply_damage(amount, self.now, self.config.combat.invulnerability);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt => self.emit(GameEvent::PlayerDamaged {
                health: self.player.health,
            }),
            DamageOutcome::Died => self.respawn_player(),
        }
        outcome
    }

    /// Refills health and moves the player back to the spawn point.
    pub fn respawn_player(&mut self) {
        self.player.health = self.player.max_health;
        let spawn = self.player_spawn_point();
        self.physics.set_position(self.player.body, spawn);
        self.physics.set_velocity(self.player.body, Vec3::ZERO);
        self.player.position = spawn;
        self.notify("You died! Respawning...");
        self.emit(GameEvent::PlayerRespawned);
        info!(x = spawn.x, y = spawn.y, z = spawn.z, "player respawned");
    }

    // ========================================================================
    // QUESTS
    // ========================================================================

    /// Re-evaluates quest progress and pays out completed quests.
    ///
    /// Item rewards can complete further collect quests, so evaluation
    /// repeats until nothing new completes.
    pub fn refresh_quests(&mut self) {
        loop {
            let completions = self.quests.evaluate(&QuestContext {
                inventory: &self.inventory,
                enemies_defeated: self.player.enemies_defeated,
                coins_spent: self.player.coins_spent,
            });
            if completions.is_empty() {
                return;
            }
            for completion in completions {
                self.apply_reward(completion.reward);
                self.notify(format!("Quest Complete: {}", completion.description));
                self.emit(GameEvent::QuestCompleted { id: completion.id });
            }
        }
    }

    /// Applies one quest reward.
    pub fn apply_reward(&mut self, reward: Reward) {
        match reward {
            Reward::HealthBoost => {
                self.player.max_health += BOOST_AMOUNT;
                self.player.health = self.player.max_health;
            }
            Reward::StaminaBoost => {
                self.player.max_stamina += BOOST_AMOUNT;
                self.player.stamina = self.player.max_stamina;
            }
            Reward::Item(item) => self.inventory.add(item, 1),
            Reward::Coins(amount) => self.inventory.add(ItemKind::GoldCoin, amount),
        }
    }

    // ========================================================================
    // SPAWNING
    // ========================================================================

    /// Adds a pickup lying at `position`.
    pub fn spawn_loot(&mut self, item: ItemKind, amount: u32, position: Vec3) -> EntityId {
        let tag = loot_model(item);
        self.catalog.resolve(tag, ModelRole::Loot(item));
        let id = self.entities.loot.spawn(Loot {
            item,
            amount,
            position,
        });
        debug!(%id, item = item.name(), amount, "loot spawned");
        self.emit(GameEvent::EntitySpawned {
            id,
            tag: tag.to_string(),
            position,
        });
        id
    }

    /// Scatters one pickup per unit of `drops` around `origin`, resting on
    /// the terrain.
    pub fn scatter_loot(&mut self, drops: &[(ItemKind, u32)], origin: Vec3) {
        let spread = self.config.combat.loot_spread;
        let lift = self.config.combat.loot_height_offset;
        for &(item, count) in drops {
            for _ in 0..count {
                let x = origin.x + (self.rng.gen::<f32>() - 0.5) * 2.0 * spread;
                let z = origin.z + (self.rng.gen::<f32>() - 0.5) * 2.0 * spread;
                let y = self.ground_height(x, z) + lift;
                self.spawn_loot(item, 1, Vec3::new(x, y, z));
            }
        }
    }
}
