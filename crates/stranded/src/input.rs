//! Input snapshot consumed by one tick.
//!
//! Held keys are level states; everything the player triggers once
//! (attack, reload, craft, ...) arrives as a `PlayerCommand`.

use stranded_economy::ItemKind;
use stranded_shared::Vec3;

/// One-shot player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Swing, shoot or punch depending on the equipped weapon.
    Attack,
    /// Start reloading the equipped gun.
    Reload,
    /// Enter or leave aim mode.
    ToggleAim,
    /// Place a campfire from the inventory.
    PlaceCampfire,
    /// Equip a weapon from the inventory.
    Equip(ItemKind),
    /// Put the equipped weapon back.
    Unequip,
    /// Eat, drink or inspect an item.
    Use(ItemKind),
    /// Craft one item.
    Craft(ItemKind),
    /// Buy one item.
    Purchase(ItemKind),
}

/// Held movement keys.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveKeys {
    /// W.
    pub forward: bool,
    /// S.
    pub back: bool,
    /// A.
    pub left: bool,
    /// D.
    pub right: bool,
    /// Shift.
    pub run: bool,
    /// Space.
    pub jump: bool,
}

impl MoveKeys {
    /// True when any direction key is held.
    #[must_use]
    pub const fn any_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Read-only input state for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSnapshot {
    /// Held movement keys.
    pub keys: MoveKeys,
    /// E held.
    pub interact: bool,
    /// Direction the follow camera looks in.
    pub camera_forward: Vec3,
    /// Direction the aim camera looks in.
    pub aim_direction: Vec3,
    /// Actions triggered this tick, applied in order.
    pub commands: Vec<PlayerCommand>,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

impl InputSnapshot {
    /// Nothing held, camera looking down -Z.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            keys: MoveKeys::default(),
            interact: false,
            camera_forward: Vec3::new(0.0, 0.0, -1.0),
            aim_direction: Vec3::new(0.0, 0.0, -1.0),
            commands: Vec::new(),
        }
    }

    /// Adds a command.
    #[must_use]
    pub fn with_command(mut self, command: PlayerCommand) -> Self {
        self.commands.push(command);
        self
    }

    /// Sets the held movement keys.
    #[must_use]
    pub const fn with_keys(mut self, keys: MoveKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the interact key.
    #[must_use]
    pub const fn with_interact(mut self, held: bool) -> Self {
        self.interact = held;
        self
    }

    /// Unit move direction on the ground plane, camera-relative.
    ///
    /// Zero when no key is held or opposing keys cancel out.
    #[must_use]
    pub fn move_direction(&self, forward: Vec3) -> Vec3 {
        let forward = forward.horizontal().normalize();
        let strafe = forward.cross(Vec3::Y).normalize();

        let mut direction = Vec3::ZERO;
        if self.keys.forward {
            direction += forward;
        }
        if self.keys.back {
            direction += -forward;
        }
        if self.keys.left {
            direction += -strafe;
        }
        if self.keys.right {
            direction += strafe;
        }
        direction.normalize()
    }
}
