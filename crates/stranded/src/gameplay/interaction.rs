//! The interact key.
//!
//! Holding it picks up nearby loot every tick. NPCs, chests and doors
//! only react to the press itself, so holding the key through a door
//! swing does not toggle it again.

use std::collections::BTreeMap;

use stranded_core::EntityId;
use stranded_economy::ItemKind;
use tracing::debug;

use crate::gameplay::buildings;
use crate::input::InputSnapshot;
use crate::world::World;

/// Runs the interaction checks for one tick.
pub fn update_interactions(world: &mut World, input: &InputSnapshot) {
    let pressed = input.interact && !world.interact_was_held;
    world.interact_was_held = input.interact;

    if input.interact {
        collect_resources(world);
    }
    if pressed {
        talk_to_npcs(world);
        open_nearby_chests(world);
        use_nearby_doors(world);
    }
}

/// Picks up every live loot within reach, one message per item kind.
///
/// Does nothing while the post-chest lockout runs. Returns how many loot
/// entities were picked up.
pub fn collect_resources(world: &mut World) -> usize {
    if world.now < world.collection_cooldown_until {
        return 0;
    }
    let origin = world.player.position;
    let reach = world.config.interaction.resource_distance;

    let mut collected: BTreeMap<ItemKind, u32> = BTreeMap::new();
    let mut picked = Vec::new();
    for (id, loot) in world.entities.loot.iter() {
        if world.entities.loot.is_live(id) && loot.position.distance(origin) < reach {
            *collected.entry(loot.item).or_insert(0) += loot.amount;
            picked.push(id);
        }
    }
    if picked.is_empty() {
        return 0;
    }

    for &id in &picked {
        world.entities.queue_removal(id);
    }
    for (&item, &amount) in &collected {
        world.inventory.add(item, amount);
    }
    world.refresh_quests();
    for (item, amount) in collected {
        world.notify(format!("Collected {amount} {item}!"));
    }
    debug!(count = picked.len(), "loot collected");
    picked.len()
}

fn talk_to_npcs(world: &mut World) {
    let origin = world.player.position;
    let reach = world.config.interaction.npc_distance;
    let offers: Vec<_> = world
        .entities
        .npcs
        .iter_mut()
        .filter(|(_, npc)| npc.position.distance(origin) < reach)
        .filter_map(|(id, npc)| npc.offer.take().map(|offer| (id, offer)))
        .collect();

    for (npc, offer) in offers {
        let message = format!("New Quest from NPC: {}", offer.description);
        let quest = world.quests.accept(offer);
        debug!(%npc, ?quest, "quest accepted");
        world.notify(message);
        world.refresh_quests();
    }
}

fn open_nearby_chests(world: &mut World) {
    let origin = world.player.position;
    let reach = world.config.interaction.chest_distance;
    let nearby: Vec<EntityId> = world
        .entities
        .buildings
        .iter()
        .filter(|(_, building)| {
            building
                .chest
                .as_ref()
                .is_some_and(|chest| !chest.opened && chest.position.distance(origin) < reach)
        })
        .map(|(id, _)| id)
        .collect();

    for id in nearby {
        buildings::open_chest(world, id);
    }
}

fn use_nearby_doors(world: &mut World) {
    let origin = world.player.position;
    let reach = world.config.interaction.door_distance;
    let nearby: Vec<EntityId> = world
        .entities
        .buildings
        .iter()
        .filter(|(_, building)| building.door.center().distance(origin) < reach)
        .map(|(id, _)| id)
        .collect();

    for id in nearby {
        buildings::toggle_door(world, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Chest;
    use crate::gameplay::{spawning, test_world};
    use stranded_shared::Vec3;

    fn hold() -> InputSnapshot {
        InputSnapshot::idle().with_interact(true)
    }

    #[test]
    fn test_collection_aggregates_per_item() {
        let mut world = test_world();
        world.spawn_loot(ItemKind::Berries, 2, Vec3::new(1.0, 1.0, 0.0));
        world.spawn_loot(ItemKind::Berries, 1, Vec3::new(0.0, 1.0, 1.0));
        world.spawn_loot(ItemKind::Stone, 3, Vec3::new(-1.0, 1.0, 0.0));
        let far = world.spawn_loot(ItemKind::Stone, 1, Vec3::new(10.0, 1.0, 0.0));

        update_interactions(&mut world, &hold());

        assert_eq!(world.inventory.count(ItemKind::Berries), 3);
        assert_eq!(world.inventory.count(ItemKind::Stone), 3);
        assert!(world.entities.loot.is_live(far));
        assert_eq!(world.entities.loot.pending_len(), 3);
        let messages: Vec<_> = world.feedback.iter().collect();
        assert_eq!(messages, vec!["Collected 3 berries!", "Collected 3 stone!"]);
    }

    #[test]
    fn test_pending_loot_is_not_collected_twice() {
        let mut world = test_world();
        world.spawn_loot(ItemKind::Wood, 1, Vec3::new(1.0, 1.0, 0.0));
        update_interactions(&mut world, &hold());
        update_interactions(&mut world, &hold());
        assert_eq!(world.inventory.count(ItemKind::Wood), 11);
    }

    #[test]
    fn test_collection_lockout() {
        let mut world = test_world();
        world.spawn_loot(ItemKind::Wood, 1, Vec3::new(1.0, 1.0, 0.0));
        world.collection_cooldown_until = 0.5;

        assert_eq!(collect_resources(&mut world), 0);
        world.now = 0.5;
        assert_eq!(collect_resources(&mut world), 1);
    }

    #[test]
    fn test_npc_quest_handed_out_once() {
        let mut world = test_world();
        spawning::spawn_npc_at(&mut world, 1.0, 0.0);

        update_interactions(&mut world, &hold());
        assert_eq!(world.quests.quests().len(), 5);
        assert_eq!(
            world.feedback.current(),
            Some("New Quest from NPC: Collect 5 crystal_shards")
        );

        // Release and press again: nothing left to offer
        update_interactions(&mut world, &InputSnapshot::idle());
        update_interactions(&mut world, &hold());
        assert_eq!(world.quests.quests().len(), 5);
    }

    #[test]
    fn test_npc_quest_completes_when_already_held() {
        let mut world = test_world();
        world.inventory.add(ItemKind::CrystalShard, 5);
        spawning::spawn_npc_at(&mut world, 1.0, 0.0);

        update_interactions(&mut world, &hold());
        assert_eq!(world.inventory.count(ItemKind::LaserSword), 1);
    }

    #[test]
    fn test_door_reacts_to_press_not_hold() {
        let mut world = test_world();
        let id = buildings::spawn_building(&mut world, 50.0, 50.0);
        let building = world.entities.buildings.get_mut(id).unwrap();
        building.chest = None;
        world.player.position = building.door.center();

        for _ in 0..3 {
            update_interactions(&mut world, &hold());
        }
        assert!(world.entities.buildings.get(id).unwrap().door.is_opening());

        update_interactions(&mut world, &InputSnapshot::idle());
        update_interactions(&mut world, &hold());
        assert!(!world.entities.buildings.get(id).unwrap().door.is_opening());

        let messages: Vec<_> = world.feedback.iter().collect();
        assert_eq!(messages, vec!["Opening door...", "Closing door..."]);
    }

    #[test]
    fn test_chest_in_reach_opens() {
        let mut world = test_world();
        let id = buildings::spawn_building(&mut world, 50.0, 50.0);
        world.entities.buildings.get_mut(id).unwrap().chest = Some(Chest {
            position: Vec3::new(0.0, 0.0, 2.0),
            opened: false,
        });

        update_interactions(&mut world, &hold());
        let chest = world.entities.buildings.get(id).unwrap().chest.as_ref().unwrap();
        assert!(chest.opened);
        assert_eq!(world.collection_cooldown_until, 0.5);
    }
}
