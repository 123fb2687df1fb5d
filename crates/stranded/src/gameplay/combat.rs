//! # Combat Resolver
//!
//! Melee swings, projectile contacts and the single defeat path. Campfire
//! damage is applied by the enemy controller but ends up in
//! `defeat_enemy` as well.

use stranded_core::{EntityId, EntityKind};
use stranded_economy::enemy_drops;
use tracing::{debug, info};

use crate::events::GameEvent;
use crate::gameplay::weapons;
use crate::input::InputSnapshot;
use crate::physics::{Collider, Contact};
use crate::world::World;

/// Counts the player's attack cooldown down to zero.
pub fn update_cooldown(world: &mut World, dt: f32) {
    world.player.attack_cooldown = (world.player.attack_cooldown - dt).max(0.0);
}

/// Attacks with whatever is in hand: gun fires, melee weapon swings,
/// empty hand punches. Nothing happens while the cooldown runs.
pub fn attack(world: &mut World, input: &InputSnapshot) {
    if world.player.attack_cooldown > 0.0 {
        return;
    }
    match world.player.weapon() {
        Some(stats) if stats.is_gun() => weapons::fire(world, input),
        Some(stats) => {
            let radius = world.config.combat.melee_radius;
            melee(world, radius);
            weapons::start_swing(world);
            world.player.attack_cooldown = stats.cooldown;
        }
        None => {
            let radius = world.config.combat.barehanded_radius;
            melee(world, radius);
            world.player.attack_started = Some(world.now);
            world.player.attack_cooldown = world.config.combat.barehanded_cooldown;
        }
    }
}

/// Area swing: every live enemy within `radius` takes the attack damage.
///
/// Defeats are processed after every hit has landed.
pub fn melee(world: &mut World, radius: f32) {
    let origin = world.player.position;
    let damage = world.player.attack_damage;
    let targets: Vec<EntityId> = world
        .entities
        .enemies
        .iter()
        .filter(|&(id, enemy)| {
            world.entities.enemies.is_live(id) && enemy.position.distance(origin) < radius
        })
        .map(|(id, _)| id)
        .collect();
    debug!(targets = targets.len(), radius, "melee swing");

    let defeated: Vec<EntityId> = targets
        .into_iter()
        .filter(|&id| hit_enemy(world, id, damage))
        .collect();
    for id in defeated {
        defeat_enemy(world, id);
    }
}

/// Applies `damage` to a live enemy, with feedback and blood.
///
/// Health floors at zero. Returns true when the enemy is now at zero;
/// the caller runs the defeat path.
pub fn hit_enemy(world: &mut World, id: EntityId, damage: f32) -> bool {
    if !world.entities.enemies.is_live(id) {
        return false;
    }
    let Some(enemy) = world.entities.enemies.get_mut(id) else {
        return false;
    };
    enemy.health = (enemy.health - damage).max(0.0);
    let (health, position) = (enemy.health, enemy.position);
    let message = format!("Hit {}! ({} HP)", enemy.archetype, health);

    world.notify(message);
    world.emit(GameEvent::EnemyDamaged { id, health });
    let count = world.config.combat.blood_particles;
    world.particles.burst(position, count, &mut world.rng);
    health <= 0.0
}

/// The one defeat path.
///
/// Queues the enemy, drops meat and coins on the terrain under it, counts
/// the defeat and re-evaluates quests. An enemy already queued (or gone)
/// is ignored, so calling this twice has the effect of calling it once.
pub fn defeat_enemy(world: &mut World, id: EntityId) -> bool {
    if !world.entities.enemies.is_live(id) {
        return false;
    }
    let Some(position) = world.entities.enemies.get(id).map(|enemy| enemy.position) else {
        return false;
    };
    world.entities.queue_removal(id);

    let death = position.with_y(world.ground_height(position.x, position.z));
    let drops: Vec<_> = enemy_drops(&mut world.rng)
        .into_iter()
        .map(|item| (item, 1))
        .collect();
    world.scatter_loot(&drops, death);

    world.player.enemies_defeated += 1;
    info!(%id, total = world.player.enemies_defeated, "enemy defeated");
    world.emit(GameEvent::EnemyDefeated { id, position: death });
    world.refresh_quests();
    true
}

/// Resolves projectile contacts from the physics step, in the order given.
///
/// Ground, trees, NPCs, building walls and doors, and enemies stop a
/// projectile; only enemies take damage. A projectile resolves at most one
/// contact.
pub fn resolve_contacts(world: &mut World, contacts: &[Contact]) {
    for contact in contacts {
        if contact.owner.kind() != Some(EntityKind::Projectile) {
            continue;
        }
        let projectile_id = contact.owner;
        let Some(projectile) = world.entities.projectiles.get(projectile_id) else {
            continue;
        };
        if !projectile.active {
            continue;
        }
        let damage = projectile.damage;

        match contact.other {
            Collider::Ground => {
                world.entities.queue_removal(projectile_id);
            }
            Collider::Body { owner, .. } => match owner.kind() {
                Some(EntityKind::Enemy) => {
                    world.entities.queue_removal(projectile_id);
                    if hit_enemy(world, owner, damage) {
                        defeat_enemy(world, owner);
                    }
                }
                Some(EntityKind::Tree | EntityKind::Npc | EntityKind::Building) => {
                    world.entities.queue_removal(projectile_id);
                }
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::{spawn_enemy_at, test_world};
    use stranded_economy::ItemKind;
    use stranded_shared::Vec3;

    #[test]
    fn test_barehanded_radius_and_cooldown() {
        let mut world = test_world();
        let near = spawn_enemy_at(&mut world, 0, Vec3::new(5.0, 2.0, 0.0));
        let far = spawn_enemy_at(&mut world, 0, Vec3::new(9.0, 2.0, 0.0));

        attack(&mut world, &InputSnapshot::idle());

        assert_eq!(world.entities.enemies.get(near).unwrap().health, 20.0);
        assert_eq!(world.entities.enemies.get(far).unwrap().health, 30.0);
        assert_eq!(world.player.attack_cooldown, 1.0);
        assert!(world.player.attack_started.is_some());
        assert_eq!(world.feedback.current(), Some("Hit enemy1! (20 HP)"));
        assert_eq!(world.particles.len(), 20);

        // Cooldown gates the next swing
        attack(&mut world, &InputSnapshot::idle());
        assert_eq!(world.entities.enemies.get(near).unwrap().health, 20.0);

        update_cooldown(&mut world, 1.5);
        assert_eq!(world.player.attack_cooldown, 0.0);
    }

    #[test]
    fn test_weapon_swing_hits_everything_in_radius() {
        let mut world = test_world();
        world.inventory.add(ItemKind::Sword, 1);
        weapons::equip(&mut world, ItemKind::Sword);
        let a = spawn_enemy_at(&mut world, 0, Vec3::new(9.0, 2.0, 0.0));
        let b = spawn_enemy_at(&mut world, 1, Vec3::new(0.0, 2.0, -9.0));

        attack(&mut world, &InputSnapshot::idle());

        assert!(world.entities.enemies.is_pending(a));
        assert_eq!(world.entities.enemies.get(b).unwrap().health, 70.0);
        assert!(world.player.swing.is_some());
        assert_eq!(world.player.attack_cooldown, 0.8);
        assert_eq!(world.player.enemies_defeated, 1);
    }

    #[test]
    fn test_defeat_is_idempotent() {
        let mut world = test_world();
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(5.0, 2.0, 0.0));

        assert!(defeat_enemy(&mut world, id));
        let loot = world.entities.loot.len();
        assert!((2..=5).contains(&loot));

        assert!(!defeat_enemy(&mut world, id));
        assert_eq!(world.entities.loot.len(), loot);
        assert_eq!(world.player.enemies_defeated, 1);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut world = test_world();
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(5.0, 2.0, 0.0));
        assert!(hit_enemy(&mut world, id, 500.0));
        assert_eq!(world.entities.enemies.get(id).unwrap().health, 0.0);
    }

    #[test]
    fn test_projectile_contact_with_enemy() {
        let mut world = test_world();
        world.inventory.add(ItemKind::EnergyBlaster, 1);
        weapons::equip(&mut world, ItemKind::EnergyBlaster);
        let enemy = spawn_enemy_at(&mut world, 1, Vec3::new(5.0, 2.0, 0.0));
        weapons::fire(&mut world, &InputSnapshot::idle());
        let (projectile, body) = world
            .entities
            .projectiles
            .iter()
            .map(|(id, p)| (id, p.body))
            .next()
            .unwrap();
        let enemy_body = world.entities.enemies.get(enemy).unwrap().body;

        let hit = Contact {
            body,
            other: Collider::Body {
                handle: enemy_body,
                owner: enemy,
            },
            owner: projectile,
        };
        resolve_contacts(&mut world, &[hit, hit]);

        // Second copy is ignored: the projectile is already inactive
        assert_eq!(world.entities.enemies.get(enemy).unwrap().health, 50.0);
        assert!(world.entities.projectiles.is_pending(projectile));
    }

    #[test]
    fn test_projectile_stops_on_building_wall() {
        let mut world = test_world();
        world.inventory.add(ItemKind::EnergyBlaster, 1);
        weapons::equip(&mut world, ItemKind::EnergyBlaster);
        let building = crate::gameplay::buildings::spawn_building(&mut world, 50.0, 50.0);
        let wall = world.entities.buildings.get(building).unwrap().walls[0];
        weapons::fire(&mut world, &InputSnapshot::idle());
        let (projectile, body) = world
            .entities
            .projectiles
            .iter()
            .map(|(id, p)| (id, p.body))
            .next()
            .unwrap();

        resolve_contacts(
            &mut world,
            &[Contact {
                body,
                other: Collider::Body {
                    handle: wall,
                    owner: building,
                },
                owner: projectile,
            }],
        );

        assert!(!world.entities.projectiles.get(projectile).unwrap().active);
        assert!(world.entities.projectiles.is_pending(projectile));
        assert!(world.entities.buildings.is_live(building));
    }

    #[test]
    fn test_projectile_stops_on_ground_without_damage() {
        let mut world = test_world();
        world.inventory.add(ItemKind::EnergyBlaster, 1);
        weapons::equip(&mut world, ItemKind::EnergyBlaster);
        weapons::fire(&mut world, &InputSnapshot::idle());
        let (projectile, body) = world
            .entities
            .projectiles
            .iter()
            .map(|(id, p)| (id, p.body))
            .next()
            .unwrap();

        resolve_contacts(
            &mut world,
            &[Contact {
                body,
                other: Collider::Ground,
                owner: projectile,
            }],
        );
        assert!(world.entities.projectiles.is_pending(projectile));
        assert_eq!(world.player.enemies_defeated, 0);
    }
}
