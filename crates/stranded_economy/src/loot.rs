//! # Loot Tables
//!
//! Weighted selection of resource spawns, chest contents and enemy drops.
//!
//! ## Determinism
//!
//! Tables own no randomness. Every roll takes the caller's RNG, so a
//! seeded `rand_chacha` generator reproduces a whole run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::item::ItemKind;

/// Weighted choice among values of `T`.
///
/// Weights need not sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f32)>,
    total: f32,
}

impl<T: Copy> WeightedTable<T> {
    /// Builds a table. Non-positive and non-finite weights are dropped.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (T, f32)>) -> Self {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|&(_, weight)| weight.is_finite() && weight > 0.0)
            .collect();
        let total = entries.iter().map(|&(_, weight)| weight).sum();
        Self { entries, total }
    }

    /// Sum of all weights.
    #[inline]
    #[must_use]
    pub const fn total_weight(&self) -> f32 {
        self.total
    }

    /// True when nothing can be chosen.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks one value with probability proportional to its weight.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        let mut roll = rng.gen::<f32>() * self.total;
        for &(value, weight) in &self.entries {
            roll -= weight;
            if roll <= 0.0 {
                return Some(value);
            }
        }
        // Rounding can leave a sliver past the last entry
        self.entries.last().map(|&(value, _)| value)
    }
}

/// Resource spawn weights.
#[must_use]
pub fn resource_table() -> WeightedTable<ItemKind> {
    WeightedTable::new([
        (ItemKind::Berries, 0.3),
        (ItemKind::Stone, 0.2),
        (ItemKind::Wood, 0.2),
        (ItemKind::AlienCrystal, 0.05),
        (ItemKind::MetalScrap, 0.1),
        (ItemKind::WaterBottle, 0.05),
        (ItemKind::AlienWater, 0.05),
        (ItemKind::Fiber, 0.05),
        (ItemKind::CrystalShard, 0.05),
        (ItemKind::AlienVine, 0.05),
        (ItemKind::AlienFruit, 0.05),
    ])
}

/// Quantity of a freshly spawned resource pickup, 1..=3.
pub fn pickup_amount<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(1..=3)
}

/// One independent line of a chest table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChestEntry {
    /// Item rolled.
    pub item: ItemKind,
    /// Minimum quantity when the line hits.
    pub min: u32,
    /// Maximum quantity when the line hits.
    pub max: u32,
    /// Probability the line hits.
    pub chance: f32,
}

/// Chest contents: every line rolls independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChestLootTable {
    entries: Vec<ChestEntry>,
}

impl ChestLootTable {
    /// Builds a table from explicit lines.
    #[must_use]
    pub fn new(entries: Vec<ChestEntry>) -> Self {
        Self { entries }
    }

    /// Lines of the table.
    #[must_use]
    pub fn entries(&self) -> &[ChestEntry] {
        &self.entries
    }

    /// Rolls the table. Items appear at most once, in table order.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(ItemKind, u32)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                if rng.gen::<f32>() >= entry.chance {
                    return None;
                }
                let (lo, hi) = (entry.min.min(entry.max), entry.min.max(entry.max));
                Some((entry.item, rng.gen_range(lo..=hi)))
            })
            .collect()
    }
}

impl Default for ChestLootTable {
    fn default() -> Self {
        let line = |item, min, max, chance| ChestEntry {
            item,
            min,
            max,
            chance,
        };
        Self::new(vec![
            line(ItemKind::GoldCoin, 5, 15, 0.9),
            line(ItemKind::Berries, 2, 5, 0.7),
            line(ItemKind::WaterBottle, 1, 2, 0.6),
            line(ItemKind::MetalScrap, 1, 3, 0.5),
            line(ItemKind::AlienCrystal, 1, 1, 0.2),
            line(ItemKind::EnergyCell, 3, 8, 0.4),
            line(ItemKind::PlasmaCell, 2, 5, 0.3),
        ])
    }
}

/// Drops of a defeated enemy: 1..=2 meat, then 1..=3 gold coins.
///
/// Each unit is its own pickup, so the list repeats items.
pub fn enemy_drops<R: Rng + ?Sized>(rng: &mut R) -> Vec<ItemKind> {
    let meat = rng.gen_range(1..=2usize);
    let coins = rng.gen_range(1..=3usize);
    let mut drops = Vec::with_capacity(meat + coins);
    drops.extend(std::iter::repeat(ItemKind::Meat).take(meat));
    drops.extend(std::iter::repeat(ItemKind::GoldCoin).take(coins));
    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_weighted_choice_respects_weights() {
        let table = WeightedTable::new([(1u8, 9.0), (2u8, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ones = (0..10_000)
            .filter(|_| table.choose(&mut rng) == Some(1))
            .count();
        assert!((8_500..9_500).contains(&ones), "{ones}");
    }

    #[test]
    fn test_zero_weights_never_chosen() {
        let table = WeightedTable::new([(1u8, 0.0), (2u8, 1.0), (3u8, f32::NAN)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert_eq!(table.choose(&mut rng), Some(2));
        }
    }

    #[test]
    fn test_empty_table_chooses_nothing() {
        let table: WeightedTable<u8> = WeightedTable::new([]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(table.is_empty());
        assert_eq!(table.choose(&mut rng), None);
    }

    #[test]
    fn test_resource_weights_total_one() {
        assert!((resource_table().total_weight() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_chest_quantities_in_range() {
        let table = ChestLootTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..500 {
            for (item, qty) in table.roll(&mut rng) {
                let line = table.entries().iter().find(|e| e.item == item).unwrap();
                assert!((line.min..=line.max).contains(&qty));
            }
        }
    }

    #[test]
    fn test_enemy_drops_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let drops = enemy_drops(&mut rng);
            let meat = drops.iter().filter(|&&i| i == ItemKind::Meat).count();
            let coins = drops.iter().filter(|&&i| i == ItemKind::GoldCoin).count();
            assert!((1..=2).contains(&meat));
            assert!((1..=3).contains(&coins));
            assert_eq!(meat + coins, drops.len());
        }
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let table = ChestLootTable::default();
        let a = table.roll(&mut ChaCha8Rng::seed_from_u64(5));
        let b = table.roll(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
