//! # Player Movement
//!
//! Camera-relative walking, running and jumping, plus the post-physics
//! ground clamp and position sync.
//!
//! Velocity is only corrected while the grounding ray hits; in the air the
//! body keeps whatever momentum it had. Horizontal speed is capped in
//! both cases.

use std::f32::consts::FRAC_PI_6;

use stranded_shared::{Quaternion, Vec3};

use crate::input::InputSnapshot;
use crate::player::{tilt_profile, PLAYER_HALF_EXTENTS};
use crate::world::World;

/// Per-tick blend toward the target orientation.
pub const FACING_SLERP: f32 = 0.2;

/// Length of the barehanded punch lean.
pub const PUNCH_TILT_DURATION: f32 = 0.3;

/// Peak forward lean of a punch, radians.
pub const PUNCH_TILT_ANGLE: f32 = FRAC_PI_6;

/// Squared length of a move direction that turns the player.
const TURN_EPSILON: f32 = 0.01;

// =============================================================================
// MOVEMENT
// =============================================================================

/// Applies one tick of player input to the player body.
pub fn update_movement(world: &mut World, input: &InputSnapshot, dt: f32) {
    let config = &world.config.player;
    let body = world.player.body;
    let Some(position) = world.physics.position(body) else {
        return;
    };
    let mut velocity = world.physics.velocity(body).unwrap_or(Vec3::ZERO);

    let player = &mut world.player;
    player.grounded = world
        .physics
        .raycast_down(position, config.ground_ray_length, &world.terrain);
    player.running = !player.aiming && input.keys.run && player.stamina > 0.0;

    let max_speed = if player.aiming {
        config.aim_speed
    } else if player.running {
        config.run_speed
    } else {
        config.walk_speed
    };

    let look = if player.aiming {
        input.aim_direction
    } else {
        input.camera_forward
    };
    let direction = input.move_direction(look);

    if player.grounded {
        let desired = direction * max_speed;
        let blend = (config.acceleration * dt).min(1.0);
        velocity.x += (desired.x - velocity.x) * blend;
        velocity.z += (desired.z - velocity.z) * blend;
    }
    let flat = velocity.horizontal();
    if flat.length() > max_speed {
        let capped = flat.normalize() * max_speed;
        velocity.x = capped.x;
        velocity.z = capped.z;
    }

    if let Some(vy) = player.update_jump(input.keys.jump, world.now, config) {
        velocity.y = vy;
    }
    player.update_stamina(dt, config);

    if player.aiming {
        let aim = input.aim_direction.horizontal();
        if aim.length_squared() > TURN_EPSILON {
            player.facing = Quaternion::from_yaw(aim.x.atan2(aim.z));
        }
    } else if direction.length_squared() > TURN_EPSILON {
        player.facing = Quaternion::from_yaw(direction.x.atan2(direction.z));
    }

    let tilt = match player.attack_started {
        Some(started) => match tilt_profile(world.now - started, PUNCH_TILT_DURATION) {
            Some(amount) => Quaternion::from_axis_angle(Vec3::X, amount * PUNCH_TILT_ANGLE),
            None => {
                player.attack_started = None;
                Quaternion::IDENTITY
            }
        },
        None => Quaternion::IDENTITY,
    };
    player.orientation = player.orientation.slerp(player.facing * tilt, FACING_SLERP);

    world.physics.set_velocity(body, velocity);
    world.physics.set_orientation(body, player.orientation);
}

// =============================================================================
// POST-PHYSICS
// =============================================================================

/// Keeps the player on or above the terrain and refreshes its cached
/// position.
pub fn clamp_to_ground(world: &mut World) {
    let body = world.player.body;
    let Some(mut position) = world.physics.position(body) else {
        return;
    };
    let floor = world.ground_height(position.x, position.z) + PLAYER_HALF_EXTENTS.y;
    if position.y < floor {
        position.y = floor;
        world.physics.set_position(body, position);
        if let Some(velocity) = world.physics.velocity(body) {
            world.physics.set_velocity(body, velocity.with_y(velocity.y.max(0.0)));
        }
    }
    world.player.position = position;
}

/// Copies body positions of enemies and projectiles into their entities.
pub fn sync_positions(world: &mut World) {
    let physics = &world.physics;
    for (_, enemy) in world.entities.enemies.iter_mut() {
        if let Some(position) = physics.position(enemy.body) {
            enemy.position = position;
        }
    }
    for (_, projectile) in world.entities.projectiles.iter_mut() {
        if let Some(position) = physics.position(projectile.body) {
            projectile.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::test_world;
    use crate::input::MoveKeys;
    use crate::player::JumpPhase;
    use std::f32::consts::FRAC_PI_2;

    fn forward(run: bool) -> InputSnapshot {
        InputSnapshot::idle().with_keys(MoveKeys {
            forward: true,
            run,
            ..MoveKeys::default()
        })
    }

    fn velocity(world: &World) -> Vec3 {
        world.physics.velocity(world.player.body).unwrap()
    }

    #[test]
    fn test_walk_reaches_walk_speed() {
        let mut world = test_world();
        update_movement(&mut world, &forward(false), 1.0 / 60.0);

        let v = velocity(&world);
        assert!(world.player.grounded);
        assert!((v.z + 10.0).abs() < 1e-4);
        assert!(v.x.abs() < 1e-4);
    }

    #[test]
    fn test_run_drains_stamina() {
        let mut world = test_world();
        update_movement(&mut world, &forward(true), 0.5);

        assert!(world.player.running);
        assert!((velocity(&world).horizontal().length() - 20.0).abs() < 1e-3);
        assert!((world.player.stamina - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_stamina_means_walking() {
        let mut world = test_world();
        world.player.stamina = 0.0;
        update_movement(&mut world, &forward(true), 1.0 / 60.0);

        assert!(!world.player.running);
        assert!((velocity(&world).horizontal().length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_aiming_caps_speed() {
        let mut world = test_world();
        world.player.aiming = true;
        world.physics.set_velocity(world.player.body, Vec3::new(30.0, 0.0, 0.0));
        update_movement(&mut world, &forward(true), 1.0 / 60.0);

        assert!(!world.player.running);
        assert!(velocity(&world).horizontal().length() <= 5.0 + 1e-4);
    }

    #[test]
    fn test_airborne_keeps_momentum() {
        let mut world = test_world();
        let body = world.player.body;
        world.physics.set_position(body, Vec3::new(0.0, 40.0, 0.0));
        world.physics.set_velocity(body, Vec3::new(3.0, 0.0, 0.0));
        update_movement(&mut world, &forward(false), 1.0 / 60.0);

        assert!(!world.player.grounded);
        assert_eq!(velocity(&world).x, 3.0);
        assert_eq!(velocity(&world).z, 0.0);
    }

    #[test]
    fn test_jump_windup_then_launch() {
        let mut world = test_world();
        let jump = InputSnapshot::idle().with_keys(MoveKeys {
            jump: true,
            ..MoveKeys::default()
        });
        update_movement(&mut world, &jump, 1.0 / 60.0);
        assert!(matches!(world.player.jump, JumpPhase::Windup { .. }));
        assert_eq!(velocity(&world).y, 0.0);

        world.now = 0.3;
        update_movement(&mut world, &jump, 1.0 / 60.0);
        assert!(matches!(world.player.jump, JumpPhase::Rising { .. }));
        assert_eq!(velocity(&world).y, 10.0);
    }

    #[test]
    fn test_facing_follows_direction() {
        let mut world = test_world();
        let right = InputSnapshot::idle().with_keys(MoveKeys {
            right: true,
            ..MoveKeys::default()
        });
        update_movement(&mut world, &right, 1.0 / 60.0);
        assert_eq!(world.player.facing, Quaternion::from_yaw(FRAC_PI_2));
    }

    #[test]
    fn test_clamp_to_ground() {
        let mut world = test_world();
        let body = world.player.body;
        world.physics.set_position(body, Vec3::new(5.0, -3.0, 5.0));
        world.physics.set_velocity(body, Vec3::new(0.0, -8.0, 0.0));

        clamp_to_ground(&mut world);
        assert_eq!(world.player.position, Vec3::new(5.0, 2.0, 5.0));
        assert_eq!(velocity(&world).y, 0.0);
    }
}
