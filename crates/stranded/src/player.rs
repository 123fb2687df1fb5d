//! # Player State
//!
//! Survival meters, weapon state, timers and mode flags of the single
//! player, plus the pure state transitions on them (damage, jump phases,
//! stamina). Anything that needs the physics seam or the feedback queue
//! lives in `gameplay`.

use std::collections::BTreeMap;

use stranded_economy::{ItemKind, WeaponStats};
use stranded_shared::{Quaternion, Vec3};

use crate::config::PlayerConfig;
use crate::physics::BodyHandle;

/// Half extents of the player's box body.
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 2.0, 0.5);

/// Player body mass.
pub const PLAYER_MASS: f32 = 5.0;

/// Player body damping.
pub const PLAYER_DAMPING: f32 = 0.6;

/// Jump progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JumpPhase {
    /// On the ground, not jumping.
    Idle,
    /// Crouching before take-off.
    Windup {
        /// Phase start.
        since: f32,
    },
    /// Moving up.
    Rising {
        /// Phase start.
        since: f32,
    },
    /// Coming down, waiting to land.
    Falling {
        /// Phase start.
        since: f32,
    },
}

/// Result of `Player::apply_damage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still invulnerable; nothing changed.
    Ignored,
    /// Health went down.
    Hurt,
    /// Health reached zero and was refilled; the caller respawns the body.
    Died,
}

/// Melee swing animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swing {
    /// Start time.
    pub started: f32,
    /// Current weapon angle.
    pub angle: f32,
}

/// Everything about the player that outlives a tick.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug)]
pub struct Player {
    /// Physics body.
    pub body: BodyHandle,
    /// Center, refreshed after each physics step.
    pub position: Vec3,

    /// Current health.
    pub health: f32,
    /// Health cap, raised by quests.
    pub max_health: f32,
    /// Food meter.
    pub hunger: f32,
    /// Water meter.
    pub thirst: f32,
    /// Stamina meter.
    pub stamina: f32,
    /// Stamina cap, raised by quests.
    pub max_stamina: f32,

    /// Weapon in hand; it is out of the inventory while equipped.
    pub equipped: Option<ItemKind>,
    /// Damage of the next attack.
    pub attack_damage: f32,
    /// Seconds until the next attack.
    pub attack_cooldown: f32,
    /// Damage is ignored before this time.
    pub invulnerable_until: f32,
    /// Rounds loaded per gun.
    pub magazines: BTreeMap<ItemKind, u32>,
    /// Set while a reload runs.
    pub reload_started_at: Option<f32>,
    /// Running melee swing.
    pub swing: Option<Swing>,
    /// Start of the running attack lean.
    pub attack_started: Option<f32>,

    /// Aim mode.
    pub aiming: bool,
    /// Running this tick.
    pub running: bool,
    /// Ground ray hit this tick.
    pub grounded: bool,
    /// Jump progress.
    pub jump: JumpPhase,

    /// Total enemies defeated.
    pub enemies_defeated: u32,
    /// Total coins spent in the shop.
    pub coins_spent: u32,
    /// Position of the placed campfire.
    pub campfire: Option<Vec3>,

    /// Yaw-only facing target.
    pub facing: Quaternion,
    /// Smoothed orientation pushed to the body.
    pub orientation: Quaternion,
}

impl Player {
    /// Fresh player with full meters and full magazines.
    #[must_use]
    pub fn new(config: &PlayerConfig, body: BodyHandle, position: Vec3, barehanded_damage: f32) -> Self {
        let magazines = ItemKind::ALL
            .iter()
            .filter_map(|&item| {
                WeaponStats::of(item)
                    .and_then(|stats| stats.gun)
                    .map(|gun| (item, gun.magazine_size))
            })
            .collect();

        Self {
            body,
            position,
            health: config.max_health,
            max_health: config.max_health,
            hunger: 100.0,
            thirst: 100.0,
            stamina: config.max_stamina,
            max_stamina: config.max_stamina,
            equipped: None,
            attack_damage: barehanded_damage,
            attack_cooldown: 0.0,
            invulnerable_until: 0.0,
            magazines,
            reload_started_at: None,
            swing: None,
            attack_started: None,
            aiming: false,
            running: false,
            grounded: false,
            jump: JumpPhase::Idle,
            enemies_defeated: 0,
            coins_spent: 0,
            campfire: None,
            facing: Quaternion::IDENTITY,
            orientation: Quaternion::IDENTITY,
        }
    }

    /// Stats of the equipped weapon.
    #[must_use]
    pub fn weapon(&self) -> Option<WeaponStats> {
        self.equipped.and_then(WeaponStats::of)
    }

    /// True while a reload runs.
    #[inline]
    #[must_use]
    pub const fn is_reloading(&self) -> bool {
        self.reload_started_at.is_some()
    }

    /// True in any jump phase but `Idle`.
    #[inline]
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.jump != JumpPhase::Idle
    }

    /// Rounds loaded in the equipped gun.
    #[must_use]
    pub fn magazine(&self) -> Option<u32> {
        let gun = self.equipped?;
        self.weapon()?.gun?;
        Some(self.magazines.get(&gun).copied().unwrap_or(0))
    }

    /// Applies `amount` damage unless invulnerable.
    ///
    /// A hit opens an `invulnerability` second window. At zero health the
    /// meter is refilled and `Died` is returned.
    pub fn apply_damage(&mut self, amount: f32, now: f32, invulnerability: f32) -> DamageOutcome {
        if now < self.invulnerable_until {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.invulnerable_until = now + invulnerability;
        if self.health <= 0.0 {
            self.health = self.max_health;
            DamageOutcome::Died
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Advances the jump phases. Returns a vertical velocity to apply.
    pub fn update_jump(&mut self, jump_held: bool, now: f32, config: &PlayerConfig) -> Option<f32> {
        let mut velocity = None;

        if jump_held && self.grounded && self.jump == JumpPhase::Idle {
            self.jump = JumpPhase::Windup { since: now };
            self.grounded = false;
        }
        if let JumpPhase::Windup { since } = self.jump {
            if now - since >= config.jump_delay {
                self.jump = JumpPhase::Rising { since: now };
                velocity = Some(config.jump_velocity);
            }
        }
        if let JumpPhase::Rising { since } = self.jump {
            if now - since >= config.jump_up_duration {
                self.jump = JumpPhase::Falling { since: now };
            }
        }
        if let JumpPhase::Falling { since } = self.jump {
            if now - since >= config.jump_down_duration && self.grounded {
                self.jump = JumpPhase::Idle;
                velocity = Some(0.0);
            }
        }
        velocity
    }

    /// Drains stamina while running, regenerates it at rest.
    pub fn update_stamina(&mut self, dt: f32, config: &PlayerConfig) {
        if self.running && !self.aiming {
            self.stamina = (self.stamina - config.stamina_drain * dt).max(0.0);
        }
        if !self.running && !self.is_jumping() {
            self.stamina = (self.stamina + config.stamina_regen * dt).min(self.max_stamina);
        }
    }
}

/// Lean profile of an attack animation: 0 → 1 → 0 over `duration`.
///
/// `None` once the animation is over.
#[must_use]
pub fn tilt_profile(elapsed: f32, duration: f32) -> Option<f32> {
    let progress = elapsed / duration;
    if progress < 0.5 {
        Some(progress.max(0.0) * 2.0)
    } else if progress < 1.0 {
        Some(1.0 - (progress - 0.5) * 2.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDesc, KinematicWorld, PhysicsWorld, Shape};

    fn player() -> (Player, PlayerConfig) {
        let config = PlayerConfig::default();
        let mut physics = KinematicWorld::new(19.6, 1.0 / 60.0, 3);
        let body = physics.add_body(BodyDesc::dynamic(Shape::Sphere { radius: 1.0 }, Vec3::ZERO, 5.0));
        (Player::new(&config, body, Vec3::ZERO, 10.0), config)
    }

    #[test]
    fn test_new_player_has_full_magazines() {
        let (player, _) = player();
        assert_eq!(player.magazines.get(&ItemKind::EnergyBlaster), Some(&10));
        assert_eq!(player.magazines.get(&ItemKind::PlasmaRifle), Some(&20));
        assert_eq!(player.magazines.len(), 2);
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn test_invulnerability_window() {
        let (mut player, _) = player();
        assert_eq!(player.apply_damage(10.0, 1.0, 0.5), DamageOutcome::Hurt);
        assert_eq!(player.apply_damage(10.0, 1.2, 0.5), DamageOutcome::Ignored);
        assert_eq!(player.health, 90.0);
        assert_eq!(player.apply_damage(10.0, 1.5, 0.5), DamageOutcome::Hurt);
        assert_eq!(player.health, 80.0);
    }

    #[test]
    fn test_death_refills_health() {
        let (mut player, _) = player();
        player.max_health = 120.0;
        player.health = 5.0;
        assert_eq!(player.apply_damage(10.0, 0.0, 0.5), DamageOutcome::Died);
        assert_eq!(player.health, 120.0);
    }

    #[test]
    fn test_jump_phases() {
        let (mut player, config) = player();
        player.grounded = true;

        assert_eq!(player.update_jump(true, 0.0, &config), None);
        assert!(matches!(player.jump, JumpPhase::Windup { .. }));

        assert_eq!(player.update_jump(false, 0.3, &config), Some(config.jump_velocity));
        assert!(matches!(player.jump, JumpPhase::Rising { .. }));

        player.update_jump(false, 1.05, &config);
        assert!(matches!(player.jump, JumpPhase::Falling { .. }));

        // Not grounded yet: keep falling
        player.grounded = false;
        assert_eq!(player.update_jump(false, 2.0, &config), None);
        player.grounded = true;
        assert_eq!(player.update_jump(false, 2.1, &config), Some(0.0));
        assert_eq!(player.jump, JumpPhase::Idle);
    }

    #[test]
    fn test_stamina_drain_and_regen() {
        let (mut player, config) = player();
        player.running = true;
        player.update_stamina(1.0, &config);
        assert!((player.stamina - 90.0).abs() < 1e-4);

        player.running = false;
        player.update_stamina(1.0, &config);
        assert!((player.stamina - 95.0).abs() < 1e-4);

        player.update_stamina(10.0, &config);
        assert_eq!(player.stamina, player.max_stamina);
    }

    #[test]
    fn test_tilt_profile() {
        assert_eq!(tilt_profile(0.0, 0.3), Some(0.0));
        assert!((tilt_profile(0.15, 0.3).unwrap() - 1.0).abs() < 1e-5);
        assert!(tilt_profile(0.225, 0.3).unwrap() < 1.0);
        assert_eq!(tilt_profile(0.3, 0.3), None);
    }
}
