//! # Item Catalog
//!
//! Every item the player can hold. Names are the snake_case tags used in
//! config files and feedback text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EconomyError;

/// An item type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ItemKind {
    /// Food, hunger +20.
    Berries = 0,
    /// Crafting material.
    Stone,
    /// Crafting material.
    Wood,
    /// Crafting material.
    MetalScrap,
    /// Crafting material and quest target.
    AlienCrystal,
    /// Drink, thirst +30.
    WaterBottle,
    /// Drink, thirst +50.
    AlienWater,
    /// Crafting material.
    Fiber,
    /// Crafting material.
    CrystalShard,
    /// Crafting material.
    AlienVine,
    /// Food, hunger +30. Dropped by enemies.
    Meat,
    /// Food, hunger +40 and health +10.
    AlienFruit,
    /// Melee weapon.
    Axe,
    /// Melee weapon.
    Sword,
    /// Gun firing energy cells.
    EnergyBlaster,
    /// Gun firing plasma cells.
    PlasmaRifle,
    /// Melee weapon.
    LaserSword,
    /// Placeable area-damage fire.
    Campfire,
    /// Ammo for the energy blaster.
    EnergyCell,
    /// Ammo for the plasma rifle.
    PlasmaCell,
    /// Currency.
    GoldCoin,
}

impl ItemKind {
    /// Number of item kinds.
    pub const COUNT: usize = 21;

    /// All kinds, in tag order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Berries,
        Self::Stone,
        Self::Wood,
        Self::MetalScrap,
        Self::AlienCrystal,
        Self::WaterBottle,
        Self::AlienWater,
        Self::Fiber,
        Self::CrystalShard,
        Self::AlienVine,
        Self::Meat,
        Self::AlienFruit,
        Self::Axe,
        Self::Sword,
        Self::EnergyBlaster,
        Self::PlasmaRifle,
        Self::LaserSword,
        Self::Campfire,
        Self::EnergyCell,
        Self::PlasmaCell,
        Self::GoldCoin,
    ];

    /// Dense index for array-backed tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Berries => "berries",
            Self::Stone => "stone",
            Self::Wood => "wood",
            Self::MetalScrap => "metal_scrap",
            Self::AlienCrystal => "alien_crystal",
            Self::WaterBottle => "water_bottle",
            Self::AlienWater => "alien_water",
            Self::Fiber => "fiber",
            Self::CrystalShard => "crystal_shard",
            Self::AlienVine => "alien_vine",
            Self::Meat => "meat",
            Self::AlienFruit => "alien_fruit",
            Self::Axe => "axe",
            Self::Sword => "sword",
            Self::EnergyBlaster => "energy_blaster",
            Self::PlasmaRifle => "plasma_rifle",
            Self::LaserSword => "laser_sword",
            Self::Campfire => "campfire",
            Self::EnergyCell => "energy_cell",
            Self::PlasmaCell => "plasma_cell",
            Self::GoldCoin => "gold_coin",
        }
    }

    /// True for anything that can be equipped.
    #[inline]
    #[must_use]
    pub const fn is_weapon(self) -> bool {
        matches!(
            self,
            Self::Axe | Self::Sword | Self::EnergyBlaster | Self::PlasmaRifle | Self::LaserSword
        )
    }

    /// True for weapons that fire projectiles.
    #[inline]
    #[must_use]
    pub const fn is_gun(self) -> bool {
        matches!(self, Self::EnergyBlaster | Self::PlasmaRifle)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EconomyError::UnknownItem(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_position() {
        for (i, kind) in ItemKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.name().parse::<ItemKind>(), Ok(kind));
        }
        assert_eq!(
            "unobtainium".parse::<ItemKind>(),
            Err(EconomyError::UnknownItem("unobtainium".into()))
        );
    }

    #[test]
    fn test_weapon_classes() {
        assert!(ItemKind::Sword.is_weapon());
        assert!(!ItemKind::Sword.is_gun());
        assert!(ItemKind::PlasmaRifle.is_gun());
        assert!(!ItemKind::Campfire.is_weapon());
    }
}
