//! # Weapon Table
//!
//! Damage and cooldown for every equippable item, plus magazine data for
//! guns.

use crate::item::ItemKind;

/// Magazine and ammo data for a gun.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunStats {
    /// Rounds per full magazine.
    pub magazine_size: u32,
    /// Seconds from reload start to a full magazine.
    pub reload_time: f32,
    /// Item consumed per reload.
    pub ammo: ItemKind,
}

/// Stats for one weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    /// Damage per hit.
    pub damage: f32,
    /// Seconds between attacks.
    pub cooldown: f32,
    /// `Some` for guns.
    pub gun: Option<GunStats>,
}

impl WeaponStats {
    const fn melee(damage: f32, cooldown: f32) -> Self {
        Self {
            damage,
            cooldown,
            gun: None,
        }
    }

    const fn gun(damage: f32, cooldown: f32, magazine_size: u32, reload_time: f32, ammo: ItemKind) -> Self {
        Self {
            damage,
            cooldown,
            gun: Some(GunStats {
                magazine_size,
                reload_time,
                ammo,
            }),
        }
    }

    /// Stats for `item`, or `None` when it is not a weapon.
    #[must_use]
    pub const fn of(item: ItemKind) -> Option<Self> {
        match item {
            ItemKind::Axe => Some(Self::melee(20.0, 1.0)),
            ItemKind::Sword => Some(Self::melee(30.0, 0.8)),
            ItemKind::LaserSword => Some(Self::melee(60.0, 0.7)),
            ItemKind::EnergyBlaster => Some(Self::gun(50.0, 0.5, 10, 2.0, ItemKind::EnergyCell)),
            ItemKind::PlasmaRifle => Some(Self::gun(70.0, 0.3, 20, 3.0, ItemKind::PlasmaCell)),
            _ => None,
        }
    }

    /// True when the weapon fires projectiles.
    #[inline]
    #[must_use]
    pub const fn is_gun(&self) -> bool {
        self.gun.is_some()
    }
}
