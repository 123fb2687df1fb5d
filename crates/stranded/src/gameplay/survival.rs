//! Hunger, thirst and item use.

use stranded_economy::ItemKind;
use tracing::debug;

use crate::world::World;

/// Meter changes applied by eating or drinking one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Consumable {
    /// Hunger restored.
    pub hunger: f32,
    /// Thirst restored.
    pub thirst: f32,
    /// Health restored.
    pub health: f32,
}

impl Consumable {
    /// Effect of consuming `item`, `None` for anything inedible.
    #[must_use]
    pub const fn of(item: ItemKind) -> Option<Self> {
        let (hunger, thirst, health) = match item {
            ItemKind::Berries => (20.0, 0.0, 0.0),
            ItemKind::AlienFruit => (40.0, 0.0, 10.0),
            ItemKind::Meat => (30.0, 0.0, 0.0),
            ItemKind::WaterBottle => (0.0, 30.0, 0.0),
            ItemKind::AlienWater => (0.0, 50.0, 0.0),
            _ => return None,
        };
        Some(Self {
            hunger,
            thirst,
            health,
        })
    }
}

/// Drains hunger and thirst. An empty meter costs health, and starving
/// to zero respawns the player like a combat death.
pub fn update_survival(world: &mut World, dt: f32) {
    let config = &world.config.survival;
    let player = &mut world.player;
    player.hunger = (player.hunger - config.hunger_rate * dt).max(0.0);
    player.thirst = (player.thirst - config.thirst_rate * dt).max(0.0);

    if player.hunger <= 0.0 || player.thirst <= 0.0 {
        player.health -= config.starvation_damage * dt;
        if player.health <= 0.0 {
            debug!("player starved");
            world.respawn_player();
        }
    }
}

/// Eats, drinks or inspects one `item`. Nothing happens without one in
/// the inventory.
pub fn use_item(world: &mut World, item: ItemKind) {
    if world.inventory.count(item) == 0 {
        return;
    }
    if item == ItemKind::GoldCoin {
        world.notify("It's a shiny gold coin! Use 'L' to open the shop.");
        return;
    }
    let Some(effect) = Consumable::of(item) else {
        return;
    };

    world.inventory.take_one(item);
    let cap = world.config.survival.max_meter;
    let player = &mut world.player;
    player.hunger = (player.hunger + effect.hunger).min(cap);
    player.thirst = (player.thirst + effect.thirst).min(cap);
    player.health = (player.health + effect.health).min(player.max_health);
    debug!(%item, hunger = player.hunger, thirst = player.thirst, "item used");
}
