//! # Model Catalog
//!
//! Resolves entity and item tags to visual prototypes and derives body
//! shapes from them.
//!
//! ```text
//! AssetSource ──load_all──> ModelCatalog ──resolve(tag)──> Prototype
//!                                 │                          ├─ model bounds × scale
//!                                 └─ missing tag ───────────>└─ colored primitive
//! ```
//!
//! Loading is one batch before the first tick and fails fast. A tag with
//! no model at resolve time is not an error: the primitive fallback is
//! used and a warning is logged once per tag.

use std::collections::{BTreeMap, BTreeSet};

use stranded_economy::ItemKind;
use stranded_shared::Vec3;
use tracing::{error, info, warn};

use crate::error::{SimError, SimResult};
use crate::physics::Shape;

/// Models loaded at startup.
pub const STANDARD_MANIFEST: &[&str] = &[
    "alien_crystal",
    "alien_fruit",
    "alien_vine",
    "alien_water",
    "axe",
    "berries",
    "campfire",
    "crystal_shard",
    "enemy1",
    "enemy2",
    "enemy3",
    "enemy4",
    "energy_blaster",
    "fiber",
    "laser_sword",
    "meat",
    "metal",
    "NPC",
    "plasma_rifle",
    "rock",
    "sword",
    "tree",
    "water_bottle",
    "wood",
    "gold_coin",
    "chest",
];

/// Fallback colors.
pub mod colors {
    /// Enemy placeholder.
    pub const ENEMY: u32 = 0xff_00_00;
    /// NPC placeholder.
    pub const NPC: u32 = 0x00_ff_00;
    /// Wood brown: trees, chests and meat.
    pub const BROWN: u32 = 0x8b_45_13;
    /// Coins.
    pub const GOLD: u32 = 0xff_d7_00;
    /// Any other loot.
    pub const GREY: u32 = 0xaa_aa_aa;
    /// Campfire placeholder.
    pub const FIRE: u32 = 0xff_45_00;
}

/// A loaded model: identifier and bounding size at scale 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelPrototype {
    /// Identifier in the manifest.
    pub id: String,
    /// Full bounding box size.
    pub size: Vec3,
}

/// Where models come from.
pub trait AssetSource {
    /// Identifiers to load at startup.
    fn manifest(&self) -> Vec<String>;

    /// Loads one model.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the model cannot be loaded.
    fn load(&mut self, id: &str) -> Result<ModelPrototype, String>;
}

/// In-memory asset source for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    models: BTreeMap<String, Vec3>,
    broken: BTreeSet<String>,
}

impl MemoryAssets {
    /// Source with no models: every tag falls back to a primitive.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Source holding every standard model with a unit bounding box.
    #[must_use]
    pub fn standard() -> Self {
        let mut assets = Self::empty();
        for id in STANDARD_MANIFEST {
            assets.models.insert((*id).to_string(), Vec3::new(1.0, 1.0, 1.0));
        }
        assets
    }

    /// Adds or replaces a model.
    #[must_use]
    pub fn with_model(mut self, id: &str, size: Vec3) -> Self {
        self.models.insert(id.to_string(), size);
        self
    }

    /// Makes loading `id` fail.
    #[must_use]
    pub fn with_broken(mut self, id: &str) -> Self {
        self.broken.insert(id.to_string());
        self.models.insert(id.to_string(), Vec3::ZERO);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn manifest(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    fn load(&mut self, id: &str) -> Result<ModelPrototype, String> {
        if self.broken.contains(id) {
            return Err("corrupt model data".to_string());
        }
        self.models
            .get(id)
            .map(|&size| ModelPrototype {
                id: id.to_string(),
                size,
            })
            .ok_or_else(|| "not found".to_string())
    }
}

/// What a prototype is for; decides scale and fallback primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelRole {
    /// Enemy of some archetype.
    Enemy,
    /// Quest giver.
    Npc,
    /// Tree.
    Tree,
    /// Building chest.
    Chest,
    /// Placed campfire.
    Campfire,
    /// Pickup of an item.
    Loot(ItemKind),
}

impl ModelRole {
    /// Uniform scale applied to the model.
    #[must_use]
    pub const fn scale(self) -> f32 {
        match self {
            Self::Enemy => 7.0,
            Self::Npc => 4.0,
            Self::Tree => 8.0,
            Self::Chest | Self::Campfire => 1.0,
            Self::Loot(item) => loot_scale(item),
        }
    }

    fn fallback(self) -> (Shape, u32) {
        match self {
            Self::Enemy => (Shape::Sphere { radius: 0.7 * 7.0 }, colors::ENEMY),
            Self::Npc => (
                Shape::Cuboid {
                    half_extents: Vec3::new(0.5, 1.0, 0.5),
                },
                colors::NPC,
            ),
            Self::Tree => (
                Shape::Cylinder {
                    radius: 1.0,
                    half_height: 2.5,
                },
                colors::BROWN,
            ),
            Self::Chest => (
                Shape::Cuboid {
                    half_extents: Vec3::new(0.75, 0.5, 0.5),
                },
                colors::BROWN,
            ),
            Self::Campfire => (
                Shape::Cylinder {
                    radius: 1.0,
                    half_height: 0.25,
                },
                colors::FIRE,
            ),
            Self::Loot(item) => {
                let color = match item {
                    ItemKind::GoldCoin => colors::GOLD,
                    ItemKind::Meat => colors::BROWN,
                    _ => colors::GREY,
                };
                (
                    Shape::Sphere {
                        radius: 0.2 * loot_scale(item),
                    },
                    color,
                )
            }
        }
    }
}

const fn loot_scale(item: ItemKind) -> f32 {
    match item {
        ItemKind::GoldCoin => 0.5,
        ItemKind::Meat => 0.8,
        ItemKind::WaterBottle | ItemKind::AlienWater => 1.0,
        ItemKind::EnergyCell | ItemKind::PlasmaCell => 0.7,
        ItemKind::Berries
        | ItemKind::Stone
        | ItemKind::Wood
        | ItemKind::MetalScrap
        | ItemKind::AlienCrystal
        | ItemKind::Fiber
        | ItemKind::CrystalShard
        | ItemKind::AlienVine
        | ItemKind::AlienFruit => 1.5,
        _ => 1.0,
    }
}

/// Model tag used for a loot pickup of `item`.
#[must_use]
pub const fn loot_model(item: ItemKind) -> &'static str {
    match item {
        ItemKind::Stone => "rock",
        ItemKind::MetalScrap | ItemKind::EnergyCell => "metal",
        ItemKind::PlasmaCell => "alien_crystal",
        other => other.name(),
    }
}

/// A resolved prototype.
#[derive(Clone, Debug, PartialEq)]
pub struct Prototype {
    /// Tag it was resolved for.
    pub tag: String,
    /// Collision and visual bounds, scale applied.
    pub shape: Shape,
    /// Scale applied to the model.
    pub scale: f32,
    /// `Some` when the primitive fallback is in use.
    pub fallback_color: Option<u32>,
}

impl Prototype {
    /// True when a loaded model backs this prototype.
    #[inline]
    #[must_use]
    pub const fn has_model(&self) -> bool {
        self.fallback_color.is_none()
    }
}

/// Loaded models plus the missing-tag warning memory.
#[derive(Clone, Debug, Default)]
pub struct ModelCatalog {
    models: BTreeMap<String, ModelPrototype>,
    warned: BTreeSet<String>,
}

impl ModelCatalog {
    /// Catalog with no models.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every model in the source's manifest.
    ///
    /// # Errors
    ///
    /// `SimError::AssetLoad` naming the first model that fails. Nothing is
    /// kept from a failed batch.
    pub fn load_all(source: &mut dyn AssetSource) -> SimResult<Self> {
        let mut catalog = Self::new();
        for id in source.manifest() {
            match source.load(&id) {
                Ok(model) => {
                    catalog.models.insert(id, model);
                }
                Err(reason) => {
                    error!(asset = %id, %reason, "asset load failed");
                    return Err(SimError::AssetLoad { id, reason });
                }
            }
        }
        info!(models = catalog.models.len(), "assets loaded");
        Ok(catalog)
    }

    /// Number of loaded models.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True when nothing is loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Loaded model for `tag`.
    #[must_use]
    pub fn model(&self, tag: &str) -> Option<&ModelPrototype> {
        self.models.get(tag)
    }

    /// Tags that fell back to a primitive so far.
    pub fn missing_tags(&self) -> impl Iterator<Item = &str> {
        self.warned.iter().map(String::as_str)
    }

    /// Prototype for `tag` in `role`: the model when loaded, else the
    /// role's primitive.
    pub fn resolve(&mut self, tag: &str, role: ModelRole) -> Prototype {
        let scale = role.scale();
        if let Some(model) = self.models.get(tag) {
            return Prototype {
                tag: tag.to_string(),
                shape: Shape::Cuboid {
                    half_extents: model.size * (scale * 0.5),
                },
                scale,
                fallback_color: None,
            };
        }

        if self.warned.insert(tag.to_string()) {
            warn!(%tag, "no model found, using fallback primitive");
        }
        let (shape, color) = role.fallback();
        Prototype {
            tag: tag.to_string(),
            shape,
            scale,
            fallback_color: Some(color),
        }
    }
}
