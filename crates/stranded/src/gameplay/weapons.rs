//! Equipping, aiming, firing and reloading.

use std::f32::consts::PI;

use stranded_economy::{ItemKind, WeaponStats};
use stranded_shared::Vec3;
use tracing::debug;

use crate::entities::Projectile;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::physics::{groups, BodyDesc, Shape};
use crate::player::Swing;
use crate::world::World;

/// Swing out time.
pub const SWING_OUT: f32 = 0.4;

/// Swing back time.
pub const SWING_BACK: f32 = 0.3;

/// Peak swing angle.
pub const SWING_ANGLE: f32 = PI / 2.5;

/// Projectile body mass.
const PROJECTILE_MASS: f32 = 0.1;

/// Aim vectors shorter than this fall back to the facing direction.
const MIN_AIM_LENGTH_SQUARED: f32 = 1e-6;

// ============================================================================
// EQUIP
// ============================================================================

/// Takes `item` out of the inventory and into the player's hand.
///
/// A different weapon already in hand goes back to the inventory first.
pub fn equip(world: &mut World, item: ItemKind) {
    if world.player.aiming {
        world.notify("Cannot switch weapons while aiming!");
        return;
    }
    let Some(stats) = WeaponStats::of(item) else {
        world.notify(format!("{item} cannot be equipped!"));
        return;
    };
    if world.player.equipped == Some(item) {
        world.notify(format!("Equipped {item}!"));
        return;
    }
    if world.inventory.count(item) == 0 {
        world.notify(format!("No {item} in inventory to equip!"));
        return;
    }

    if let Some(previous) = world.player.equipped.take() {
        world.inventory.add(previous, 1);
        world.notify(format!("Returned {previous} to inventory."));
    }
    world.inventory.take_one(item);
    world.player.equipped = Some(item);
    world.player.attack_damage = stats.damage;
    world.player.reload_started_at = None;
    world.player.swing = None;
    world.notify(format!("Equipped {item}!"));
}

/// Puts the weapon in hand back into the inventory.
pub fn unequip(world: &mut World) {
    if world.player.aiming {
        world.notify("Cannot unequip weapon while aiming!");
        return;
    }
    let Some(item) = world.player.equipped.take() else {
        world.notify("No weapon equipped to unequip!");
        return;
    };
    world.inventory.add(item, 1);
    world.player.attack_damage = world.config.combat.barehanded_damage;
    world.player.reload_started_at = None;
    world.player.swing = None;
    world.notify("Unequipped weapon!");
}

/// Enters or leaves aim mode. Only guns can aim.
pub fn toggle_aim(world: &mut World) {
    match world.player.weapon() {
        Some(stats) if stats.is_gun() => {
            world.player.aiming = !world.player.aiming;
            debug!(aiming = world.player.aiming, "aim mode toggled");
        }
        Some(_) => world.notify("Aim mode only available with guns!"),
        None => world.notify("Equip a weapon first!"),
    }
}

// ============================================================================
// GUNS
// ============================================================================

/// Fires the equipped gun.
///
/// With an empty magazine only the message is produced: no body, no
/// projectile, no ammo change.
pub fn fire(world: &mut World, input: &InputSnapshot) {
    let Some(gun_item) = world.player.equipped else {
        return;
    };
    let Some(stats) = WeaponStats::of(gun_item) else {
        return;
    };
    if stats.gun.is_none() || world.player.is_reloading() {
        return;
    }
    let loaded = world.player.magazines.get(&gun_item).copied().unwrap_or(0);
    if loaded == 0 {
        world.notify("Magazine empty! Reload.");
        return;
    }

    let aim = input.aim_direction;
    let direction = if world.player.aiming && aim.length_squared() > MIN_AIM_LENGTH_SQUARED {
        aim.normalize()
    } else {
        world.player.facing.rotate(Vec3::Z).normalize()
    };
    let combat = &world.config.combat;
    let origin = world.player.position + Vec3::new(0.0, combat.muzzle_height, 0.0);
    let velocity = direction * combat.projectile_speed;
    let radius = combat.projectile_radius;

    world.player.magazines.insert(gun_item, loaded - 1);
    world.player.attack_cooldown = stats.cooldown;

    let id = world.entities.projectiles.next_id();
    let body = world.physics.add_body(
        BodyDesc::dynamic(Shape::Sphere { radius }, origin, PROJECTILE_MASS)
            .with_filter(groups::PROJECTILE, groups::ENEMY | groups::STATIC)
            .with_velocity(velocity)
            .with_owner(id),
    );
    let spawned = world.entities.projectiles.spawn(Projectile {
        body,
        position: origin,
        velocity,
        spawned_at: world.now,
        damage: world.player.attack_damage,
        active: true,
    });
    debug_assert_eq!(spawned, id);
    debug!(%id, rounds = loaded - 1, "projectile fired");
    world.emit(GameEvent::EntitySpawned {
        id,
        tag: "projectile".to_string(),
        position: origin,
    });
}

/// Starts reloading the equipped gun.
pub fn reload(world: &mut World) {
    let Some(gun_item) = world.player.equipped else {
        return;
    };
    let Some(gun) = WeaponStats::of(gun_item).and_then(|stats| stats.gun) else {
        return;
    };
    if world.player.is_reloading() {
        return;
    }
    let loaded = world.player.magazines.get(&gun_item).copied().unwrap_or(0);
    if loaded >= gun.magazine_size {
        world.notify("Magazine is full.");
        return;
    }
    if world.inventory.count(gun.ammo) == 0 {
        world.notify("No ammo left to reload.");
        return;
    }
    world.player.reload_started_at = Some(world.now);
    world.notify("Reloading...");
}

/// Finishes a reload once its time has passed.
///
/// One ammo item refills the whole magazine. If the reserve ran out while
/// reloading, the magazine stays as it was.
pub fn update_reload(world: &mut World) {
    let Some(started) = world.player.reload_started_at else {
        return;
    };
    let Some(gun_item) = world.player.equipped else {
        world.player.reload_started_at = None;
        return;
    };
    let Some(gun) = WeaponStats::of(gun_item).and_then(|stats| stats.gun) else {
        world.player.reload_started_at = None;
        return;
    };
    if world.now - started < gun.reload_time {
        return;
    }

    world.player.reload_started_at = None;
    if world.inventory.take_one(gun.ammo) {
        world.player.magazines.insert(gun_item, gun.magazine_size);
        world.notify("Reloaded!");
    } else {
        world.notify("No ammo left to reload.");
    }
}

// ============================================================================
// MELEE ANIMATION
// ============================================================================

/// Starts the melee swing animation.
pub fn start_swing(world: &mut World) {
    world.player.swing = Some(Swing {
        started: world.now,
        angle: 0.0,
    });
}

/// Advances the swing: out to the peak angle, then back.
pub fn update_swing(world: &mut World) {
    let Some(swing) = world.player.swing.as_mut() else {
        return;
    };
    let elapsed = world.now - swing.started;
    if elapsed < SWING_OUT {
        swing.angle = SWING_ANGLE * (elapsed / SWING_OUT);
    } else if elapsed < SWING_OUT + SWING_BACK {
        swing.angle = SWING_ANGLE * (1.0 - (elapsed - SWING_OUT) / SWING_BACK);
    } else {
        world.player.swing = None;
    }
}

// ============================================================================
// PROJECTILE EXPIRY
// ============================================================================

/// Queues projectiles older than their lifetime.
pub fn expire_projectiles(world: &mut World) {
    let lifetime = world.config.combat.projectile_lifetime;
    let now = world.now;
    let expired: Vec<_> = world
        .entities
        .projectiles
        .iter()
        .filter(|(_, projectile)| projectile.active && now - projectile.spawned_at > lifetime)
        .map(|(id, _)| id)
        .collect();
    for id in expired {
        debug!(%id, "projectile expired");
        world.entities.queue_removal(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::test_world;

    fn armed(item: ItemKind) -> World {
        let mut world = test_world();
        equip(&mut world, item);
        world.feedback = crate::feedback::FeedbackQueue::new(1.0);
        world
    }

    #[test]
    fn test_equip_swaps_weapons() {
        let mut world = test_world();
        equip(&mut world, ItemKind::PlasmaRifle);
        assert_eq!(world.inventory.count(ItemKind::PlasmaRifle), 0);
        assert_eq!(world.player.attack_damage, 70.0);

        equip(&mut world, ItemKind::EnergyBlaster);
        assert_eq!(world.player.equipped, Some(ItemKind::EnergyBlaster));
        assert_eq!(world.inventory.count(ItemKind::PlasmaRifle), 1);
        assert_eq!(world.inventory.count(ItemKind::EnergyBlaster), 0);
        assert!(world.feedback.iter().any(|m| m == "Returned plasma_rifle to inventory."));
    }

    #[test]
    fn test_equip_missing_weapon() {
        let mut world = test_world();
        equip(&mut world, ItemKind::Sword);
        assert_eq!(world.player.equipped, None);
        assert_eq!(world.feedback.current(), Some("No sword in inventory to equip!"));
    }

    #[test]
    fn test_cannot_switch_while_aiming() {
        let mut world = armed(ItemKind::PlasmaRifle);
        toggle_aim(&mut world);
        assert!(world.player.aiming);

        equip(&mut world, ItemKind::EnergyBlaster);
        unequip(&mut world);
        assert_eq!(world.player.equipped, Some(ItemKind::PlasmaRifle));
        let messages: Vec<_> = world.feedback.iter().collect();
        assert_eq!(
            messages,
            vec!["Cannot switch weapons while aiming!", "Cannot unequip weapon while aiming!"]
        );
    }

    #[test]
    fn test_unequip_restores_barehanded_damage() {
        let mut world = armed(ItemKind::PlasmaRifle);
        unequip(&mut world);
        assert_eq!(world.player.equipped, None);
        assert_eq!(world.player.attack_damage, 10.0);
        assert_eq!(world.inventory.count(ItemKind::PlasmaRifle), 1);

        unequip(&mut world);
        assert!(world.feedback.iter().any(|m| m == "No weapon equipped to unequip!"));
    }

    #[test]
    fn test_zero_aim_fires_along_facing() {
        let mut world = armed(ItemKind::EnergyBlaster);
        toggle_aim(&mut world);
        assert!(world.player.aiming);

        let mut input = InputSnapshot::idle();
        input.aim_direction = Vec3::ZERO;
        fire(&mut world, &input);

        let (_, projectile) = world.entities.projectiles.iter().next().unwrap();
        let speed = world.config.combat.projectile_speed;
        assert!((projectile.velocity.length() - speed).abs() < 1e-3);
        assert!((projectile.velocity.z - speed).abs() < 1e-3);
    }

    #[test]
    fn test_aim_requires_gun() {
        let mut world = test_world();
        toggle_aim(&mut world);
        assert_eq!(world.feedback.current(), Some("Equip a weapon first!"));

        world.inventory.add(ItemKind::Axe, 1);
        equip(&mut world, ItemKind::Axe);
        toggle_aim(&mut world);
        assert!(!world.player.aiming);
        assert!(world.feedback.iter().any(|m| m == "Aim mode only available with guns!"));
    }

    #[test]
    fn test_fire_spawns_projectile() {
        let mut world = armed(ItemKind::EnergyBlaster);
        let bodies = world.physics.body_count();

        fire(&mut world, &InputSnapshot::idle());

        assert_eq!(world.entities.projectiles.len(), 1);
        assert_eq!(world.physics.body_count(), bodies + 1);
        assert_eq!(world.player.magazine(), Some(9));
        assert_eq!(world.player.attack_cooldown, 0.5);
        let (_, projectile) = world.entities.projectiles.iter().next().unwrap();
        assert!((projectile.velocity.length() - 80.0).abs() < 1e-3);
        assert!((projectile.position.y - (world.player.position.y + 1.5)).abs() < 1e-5);
    }

    #[test]
    fn test_fire_uses_aim_direction_when_aiming() {
        let mut world = armed(ItemKind::PlasmaRifle);
        toggle_aim(&mut world);
        let input = InputSnapshot {
            aim_direction: Vec3::new(1.0, 0.0, 0.0),
            ..InputSnapshot::idle()
        };
        fire(&mut world, &input);
        let (_, projectile) = world.entities.projectiles.iter().next().unwrap();
        assert!((projectile.velocity.x - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_reload_messages() {
        let mut world = armed(ItemKind::EnergyBlaster);
        reload(&mut world);
        assert_eq!(world.feedback.current(), Some("Magazine is full."));

        world.player.magazines.insert(ItemKind::EnergyBlaster, 3);
        world.inventory.remove(ItemKind::EnergyCell, 50).unwrap();
        reload(&mut world);
        assert!(!world.player.is_reloading());
        assert!(world.feedback.iter().any(|m| m == "No ammo left to reload."));
    }

    #[test]
    fn test_reload_completes_after_reload_time() {
        let mut world = armed(ItemKind::EnergyBlaster);
        world.player.magazines.insert(ItemKind::EnergyBlaster, 3);

        reload(&mut world);
        assert!(world.player.is_reloading());

        // Firing is blocked while reloading
        fire(&mut world, &InputSnapshot::idle());
        assert!(world.entities.projectiles.is_empty());

        world.now = 1.9;
        update_reload(&mut world);
        assert!(world.player.is_reloading());

        world.now = 2.0;
        update_reload(&mut world);
        assert!(!world.player.is_reloading());
        assert_eq!(world.player.magazine(), Some(10));
        assert_eq!(world.inventory.count(ItemKind::EnergyCell), 49);
        assert!(world.feedback.iter().any(|m| m == "Reloaded!"));
    }

    #[test]
    fn test_swing_returns_to_rest() {
        let mut world = test_world();
        start_swing(&mut world);
        world.now = 0.2;
        update_swing(&mut world);
        let angle = world.player.swing.unwrap().angle;
        assert!((angle - SWING_ANGLE * 0.5).abs() < 1e-5);

        world.now = 0.8;
        update_swing(&mut world);
        assert!(world.player.swing.is_none());
    }

    #[test]
    fn test_projectiles_expire() {
        let mut world = armed(ItemKind::EnergyBlaster);
        fire(&mut world, &InputSnapshot::idle());
        let (id, _) = world.entities.projectiles.iter().next().unwrap();

        world.now = 5.0;
        expire_projectiles(&mut world);
        assert!(world.entities.projectiles.is_live(id));

        world.now = 5.1;
        expire_projectiles(&mut world);
        assert!(world.entities.projectiles.is_pending(id));
        assert!(!world.entities.projectiles.get(id).unwrap().active);
    }
}
