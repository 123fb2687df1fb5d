//! # Enemy AI Controller
//!
//! Per-tick state machine for every live enemy, in ascending id order:
//!
//! ```text
//! campfire in range  -> damage, maybe defeat (rest of the tick skipped)
//! wounded or fleeing -> Fleeing (never left)
//! in chase range and
//! chase slots left   -> Chasing, attack when in range and ready
//! otherwise          -> Wandering toward a random nearby target
//! ```
//!
//! Enemies are pinned to the terrain: their height is forced every tick
//! and vertical velocity is zeroed.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use stranded_core::EntityId;
use stranded_procedural::TerrainGrid;
use stranded_shared::{Quaternion, Vec3};

use crate::config::EnemyConfig;
use crate::entities::{Enemy, EnemyState};
use crate::gameplay::combat;
use crate::player::tilt_profile;
use crate::world::World;

/// Squared horizontal speed below which facing is left alone.
const FACING_EPSILON: f32 = 0.01;

/// Runs the controller for every live enemy.
pub fn update_enemies(world: &mut World, dt: f32) {
    let mut chasing = 0;
    for id in world.entities.enemies.ids() {
        if !world.entities.enemies.is_live(id) {
            continue;
        }
        if burn(world, id, dt) {
            combat::defeat_enemy(world, id);
            continue;
        }

        let player = world.player.position;
        let now = world.now;
        let config = &world.config.enemies;
        let Some(enemy) = world.entities.enemies.get_mut(id) else {
            continue;
        };
        if let Some(position) = world.physics.position(enemy.body) {
            enemy.position = position;
        }

        let distance = enemy.position.distance(player);
        let velocity = if enemy.state == EnemyState::Fleeing || enemy.is_wounded(config.flee_health_threshold)
        {
            enemy.state = EnemyState::Fleeing;
            (enemy.position - player).horizontal().normalize() * config.flee_speed
        } else if distance <= enemy.chase_range && chasing < config.max_chasing {
            chasing += 1;
            enemy.state = EnemyState::Chasing;
            (player - enemy.position).horizontal().normalize() * enemy.speed
        } else {
            enemy.state = EnemyState::Wandering;
            wander_velocity(enemy, config, &world.terrain, &mut world.rng)
        };

        let strike = (enemy.state == EnemyState::Chasing
            && distance <= enemy.attack_range
            && enemy.last_attack.map_or(true, |last| now - last >= enemy.attack_cooldown))
        .then(|| {
            enemy.last_attack = Some(now);
            enemy.attack_started = Some(now);
            enemy.damage
        });

        // Pinned to the terrain
        let ground = world.terrain.height_at(enemy.position.x, enemy.position.z);
        enemy.position.y = ground + config.height_offset;
        world.physics.set_position(enemy.body, enemy.position);
        world.physics.set_velocity(enemy.body, velocity.with_y(0.0));

        orient(enemy, velocity, now, config);
        world.physics.set_orientation(enemy.body, enemy.orientation);

        if let Some(damage) = strike {
            world.damage_player(damage);
        }
    }
}

/// Campfire damage for one enemy. True when it burned down to zero.
fn burn(world: &mut World, id: EntityId, dt: f32) -> bool {
    let Some(fire) = world.player.campfire else {
        return false;
    };
    let combat = &world.config.combat;
    let Some(enemy) = world.entities.enemies.get_mut(id) else {
        return false;
    };
    if enemy.position.distance(fire) >= combat.campfire_radius {
        return false;
    }
    enemy.health = (enemy.health - combat.campfire_damage_per_second * dt).max(0.0);
    enemy.health <= 0.0
}

/// Velocity toward the wander target, picking a new target when there is
/// none, it is not finite, or it has been reached.
fn wander_velocity<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    config: &EnemyConfig,
    terrain: &TerrainGrid,
    rng: &mut R,
) -> Vec3 {
    let target = match enemy.wander_target {
        Some(target)
            if target.is_finite()
                && (target - enemy.position).horizontal().length() >= config.arrival_distance =>
        {
            target
        }
        _ => {
            let target = wander_target(enemy.position, config, terrain, rng);
            enemy.wander_target = Some(target);
            target
        }
    };
    (target - enemy.position).horizontal().normalize() * config.wander_speed
}

/// Random point `wander_min..wander_max` away from `origin`, inside the
/// world, on the terrain.
pub fn wander_target<R: Rng + ?Sized>(
    origin: Vec3,
    config: &EnemyConfig,
    terrain: &TerrainGrid,
    rng: &mut R,
) -> Vec3 {
    let angle = rng.gen::<f32>() * TAU;
    let span = config.wander_max_distance - config.wander_min_distance;
    let distance = config.wander_min_distance + rng.gen::<f32>() * span;

    let half = terrain.half_extent();
    let x = (origin.x + angle.sin() * distance).clamp(-half, half);
    let z = (origin.z + angle.cos() * distance).clamp(-half, half);
    Vec3::new(x, terrain.height_at(x, z) + config.height_offset, z)
}

/// Turns toward the movement direction and applies the attack tilt.
fn orient(enemy: &mut Enemy, velocity: Vec3, now: f32, config: &EnemyConfig) {
    let flat = velocity.horizontal();
    if flat.length_squared() > FACING_EPSILON {
        enemy.facing = Quaternion::from_yaw(flat.x.atan2(flat.z) - FRAC_PI_2);
    }

    let tilt = match enemy.attack_started {
        Some(started) => match tilt_profile(now - started, config.attack_tilt_duration) {
            Some(amount) => Quaternion::from_axis_angle(Vec3::Z, -amount * config.attack_tilt_angle),
            None => {
                enemy.attack_started = None;
                Quaternion::IDENTITY
            }
        },
        None => Quaternion::IDENTITY,
    };
    enemy.orientation = enemy.orientation.slerp(enemy.facing * tilt, config.facing_slerp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::{spawn_enemy_at, test_world};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn states(world: &World) -> Vec<EnemyState> {
        world.entities.enemies.iter().map(|(_, enemy)| enemy.state).collect()
    }

    #[test]
    fn test_chase_cap_in_id_order() {
        let mut world = test_world();
        for i in 0..7 {
            #[allow(clippy::cast_precision_loss)]
            let x = 8.0 + i as f32;
            spawn_enemy_at(&mut world, 0, Vec3::new(x, 4.0, 0.0));
        }

        update_enemies(&mut world, 1.0 / 60.0);

        let states = states(&world);
        assert_eq!(states.iter().filter(|s| **s == EnemyState::Chasing).count(), 5);
        assert!(states[..5].iter().all(|s| *s == EnemyState::Chasing));
        assert!(states[5..].iter().all(|s| *s == EnemyState::Wandering));
    }

    #[test]
    fn test_flee_is_sticky() {
        let mut world = test_world();
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(8.0, 4.0, 0.0));
        world.entities.enemies.get_mut(id).unwrap().health = 1.0;

        update_enemies(&mut world, 1.0 / 60.0);
        assert_eq!(world.entities.enemies.get(id).unwrap().state, EnemyState::Fleeing);

        world.entities.enemies.get_mut(id).unwrap().health = 30.0;
        update_enemies(&mut world, 1.0 / 60.0);
        let enemy = world.entities.enemies.get(id).unwrap();
        assert_eq!(enemy.state, EnemyState::Fleeing);

        // Moving away from the player at flee speed
        let velocity = world.physics.velocity(enemy.body).unwrap();
        assert!(velocity.x > 0.0);
        assert!((velocity.length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_attack_respects_cooldown_and_invulnerability() {
        let mut world = test_world();
        spawn_enemy_at(&mut world, 0, Vec3::new(3.0, 4.0, 0.0));

        update_enemies(&mut world, 1.0 / 60.0);
        assert_eq!(world.player.health, 95.0);

        world.now = 1.0;
        update_enemies(&mut world, 1.0 / 60.0);
        assert_eq!(world.player.health, 95.0);

        world.now = 1.5;
        update_enemies(&mut world, 1.0 / 60.0);
        assert_eq!(world.player.health, 90.0);
    }

    #[test]
    fn test_enemies_are_pinned_to_terrain() {
        let mut world = test_world();
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(100.0, 30.0, 100.0));
        update_enemies(&mut world, 1.0 / 60.0);

        let enemy = world.entities.enemies.get(id).unwrap();
        assert_eq!(enemy.position.y, 4.0);
        assert_eq!(world.physics.velocity(enemy.body).unwrap().y, 0.0);
        assert_eq!(enemy.state, EnemyState::Wandering);
    }

    #[test]
    fn test_invalid_wander_target_is_replaced() {
        let mut world = test_world();
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(100.0, 4.0, 100.0));
        world.entities.enemies.get_mut(id).unwrap().wander_target = Some(Vec3::new(f32::NAN, 0.0, 0.0));

        update_enemies(&mut world, 1.0 / 60.0);
        let target = world.entities.enemies.get(id).unwrap().wander_target.unwrap();
        assert!(target.is_finite());
    }

    #[test]
    fn test_wander_target_distance_and_bounds() {
        let world = test_world();
        let config = &world.config.enemies;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let origin = Vec3::new(0.0, 4.0, 0.0);
        for _ in 0..100 {
            let target = wander_target(origin, config, &world.terrain, &mut rng);
            let d = (target - origin).horizontal().length();
            assert!((5.0 - 1e-4..=10.0 + 1e-4).contains(&d));
        }

        let corner = Vec3::new(249.0, 4.0, 249.0);
        for _ in 0..100 {
            let target = wander_target(corner, config, &world.terrain, &mut rng);
            assert!(target.x <= 250.0 && target.z <= 250.0);
        }
    }

    #[test]
    fn test_campfire_defeats_through_shared_path() {
        let mut world = test_world();
        world.player.campfire = Some(Vec3::new(50.0, 1.0, 50.0));
        let id = spawn_enemy_at(&mut world, 0, Vec3::new(52.0, 4.0, 50.0));

        update_enemies(&mut world, 0.1);
        assert_eq!(world.entities.enemies.get(id).unwrap().health, 20.0);

        for _ in 0..2 {
            update_enemies(&mut world, 0.1);
        }
        assert!(world.entities.enemies.is_pending(id));
        assert_eq!(world.player.enemies_defeated, 1);
        assert!(world.entities.loot.len() >= 2);
    }
}
