//! # Economy Flow Tests
//!
//! Crafting, trading and questing together, the way a play session
//! strings them.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stranded_economy::{
    enemy_drops, EconomyError, Inventory, ItemKind, QuestContext, QuestLog, RecipeBook, Reward,
    Shop,
};

/// Test: Buying until broke completes the spend quest exactly when the
/// running total reaches 20, whatever the purse held at the start.
#[test]
fn test_spend_quest_follows_purchases() {
    let mut shop = Shop::standard();
    let mut quests = QuestLog::standard();
    // A bigger purse than the usual 20 coins
    let mut inventory = Inventory::from_counts([(ItemKind::GoldCoin, 50)]);
    let mut coins_spent = 0;
    let mut rewards = Vec::new();

    for _ in 0..4 {
        coins_spent += shop.purchase(&mut inventory, ItemKind::WaterBottle).unwrap();
        let ctx = QuestContext {
            inventory: &inventory,
            enemies_defeated: 0,
            coins_spent,
        };
        rewards.extend(quests.evaluate(&ctx).into_iter().map(|c| c.reward));
    }

    println!("Spent {coins_spent}, holding {}", inventory.count(ItemKind::GoldCoin));
    assert_eq!(coins_spent, 20);
    assert_eq!(inventory.count(ItemKind::GoldCoin), 30);
    assert_eq!(rewards, vec![Reward::Item(ItemKind::PlasmaRifle)]);
}

/// Test: A failed craft leaves the inventory exactly as it was, and a
/// later success after gathering consumes only the recipe.
#[test]
fn test_craft_after_gathering() {
    let book = RecipeBook::standard();
    let mut inventory = Inventory::from_counts([(ItemKind::AlienCrystal, 1), (ItemKind::MetalScrap, 4)]);
    let before = inventory.clone();

    let err = book.craft(&mut inventory, ItemKind::EnergyBlaster).unwrap_err();
    assert!(matches!(err, EconomyError::InsufficientMaterials { .. }), "{err}");
    assert_eq!(inventory, before);

    inventory.add(ItemKind::AlienCrystal, 2);
    inventory.add(ItemKind::MetalScrap, 1);
    book.craft(&mut inventory, ItemKind::EnergyBlaster).unwrap();

    assert_eq!(inventory.count(ItemKind::EnergyBlaster), 1);
    assert_eq!(inventory.total(), 1);
}

/// Test: Enemy drops feed the defeat and collection quests.
#[test]
fn test_drops_and_defeats_progress_quests() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut quests = QuestLog::standard();
    let mut inventory = Inventory::new();

    let mut completed = Vec::new();
    for defeated in 1..=5 {
        for item in enemy_drops(&mut rng) {
            inventory.add(item, 1);
        }
        let ctx = QuestContext {
            inventory: &inventory,
            enemies_defeated: defeated,
            coins_spent: 0,
        };
        completed.extend(quests.evaluate(&ctx));
    }

    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].description, "Defeat 5 enemies");
    assert!(inventory.count(ItemKind::Meat) >= 5);
    assert!(inventory.count(ItemKind::GoldCoin) >= 5);
}
