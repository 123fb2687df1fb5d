//! # Entity Identity
//!
//! Entities are lightweight identifiers consisting of:
//! - A serial number, unique within the entity's registry
//! - A kind tag naming which registry the entity lives in

use serde::{Deserialize, Serialize};

/// The variant an entity belongs to.
///
/// Each kind has its own registry; collision and removal routing
/// dispatch on this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Hostile creature driven by the AI controller.
    Enemy = 0,
    /// Shot fired from a gun.
    Projectile = 1,
    /// Collectable item lying on the ground.
    Loot = 2,
    /// Friendly quest giver.
    Npc = 3,
    /// Static tree.
    Tree = 4,
    /// House with optional chest and door.
    Building = 5,
}

impl EntityKind {
    /// All kinds, in tag order.
    pub const ALL: [Self; 6] = [
        Self::Enemy,
        Self::Projectile,
        Self::Loot,
        Self::Npc,
        Self::Tree,
        Self::Building,
    ];

    /// Human-readable name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enemy => "enemy",
            Self::Projectile => "projectile",
            Self::Loot => "loot",
            Self::Npc => "npc",
            Self::Tree => "tree",
            Self::Building => "building",
        }
    }

    const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Enemy),
            1 => Some(Self::Projectile),
            2 => Some(Self::Loot),
            3 => Some(Self::Npc),
            4 => Some(Self::Tree),
            5 => Some(Self::Building),
            _ => None,
        }
    }
}

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Serial number, increasing in spawn order
/// - Upper 32 bits: Kind tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from kind and serial.
    #[inline]
    #[must_use]
    pub const fn new(kind: EntityKind, serial: u32) -> Self {
        Self(((kind as u64) << 32) | (serial as u64))
    }

    /// Returns the serial portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn serial(self) -> u32 {
        self.0 as u32
    }

    /// Returns the kind portion of the entity ID.
    ///
    /// `None` only for `NULL`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn kind(self) -> Option<EntityKind> {
        EntityKind::from_tag((self.0 >> 32) as u8)
    }

    /// Raw packed value, for render-side maps.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}#{}", kind.name(), self.serial()),
            None => f.write_str("null"),
        }
    }
}
