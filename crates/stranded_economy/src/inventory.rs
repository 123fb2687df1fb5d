//! # Inventory
//!
//! Item counts, one slot per `ItemKind`. No allocation after creation.

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::item::ItemKind;

/// Count of every item the player holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; ItemKind::COUNT],
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [0; ItemKind::COUNT],
        }
    }

    /// Builds an inventory from `(item, count)` pairs. Repeated items add up.
    #[must_use]
    pub fn from_counts(counts: impl IntoIterator<Item = (ItemKind, u32)>) -> Self {
        let mut inventory = Self::new();
        for (item, count) in counts {
            inventory.add(item, count);
        }
        inventory
    }

    /// How many of `item` are held.
    #[inline]
    #[must_use]
    pub const fn count(&self, item: ItemKind) -> u32 {
        self.counts[item.index()]
    }

    /// True when at least `amount` of `item` are held.
    #[inline]
    #[must_use]
    pub const fn has(&self, item: ItemKind, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Adds `amount` of `item`, saturating.
    pub fn add(&mut self, item: ItemKind, amount: u32) {
        let slot = &mut self.counts[item.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Removes `amount` of `item`.
    ///
    /// # Errors
    ///
    /// `InsufficientItems` when fewer are held; nothing is removed.
    pub fn remove(&mut self, item: ItemKind, amount: u32) -> EconomyResult<()> {
        let available = self.count(item);
        if available < amount {
            return Err(EconomyError::InsufficientItems {
                item,
                requested: amount,
                available,
            });
        }
        self.counts[item.index()] = available - amount;
        Ok(())
    }

    /// Removes one `item` if any is held.
    pub fn take_one(&mut self, item: ItemKind) -> bool {
        self.remove(item, 1).is_ok()
    }

    /// Held items with a non-zero count, in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        ItemKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .filter(|&(_, count)| count > 0)
    }

    /// Total number of items held.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_count() {
        let mut inventory = Inventory::new();
        inventory.add(ItemKind::Wood, 3);
        inventory.add(ItemKind::Wood, 2);
        assert_eq!(inventory.count(ItemKind::Wood), 5);
        assert!(inventory.has(ItemKind::Wood, 5));
        assert!(!inventory.has(ItemKind::Wood, 6));
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut inventory = Inventory::from_counts([(ItemKind::Stone, 2)]);
        let err = inventory.remove(ItemKind::Stone, 3).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientItems {
                item: ItemKind::Stone,
                requested: 3,
                available: 2
            }
        );
        assert_eq!(inventory.count(ItemKind::Stone), 2);

        inventory.remove(ItemKind::Stone, 2).unwrap();
        assert_eq!(inventory.count(ItemKind::Stone), 0);
        assert!(!inventory.take_one(ItemKind::Stone));
    }

    #[test]
    fn test_add_saturates() {
        let mut inventory = Inventory::from_counts([(ItemKind::GoldCoin, u32::MAX - 1)]);
        inventory.add(ItemKind::GoldCoin, 10);
        assert_eq!(inventory.count(ItemKind::GoldCoin), u32::MAX);
    }

    #[test]
    fn test_iter_skips_empty() {
        let inventory = Inventory::from_counts([(ItemKind::Meat, 1), (ItemKind::Berries, 4)]);
        let held: Vec<_> = inventory.iter().collect();
        assert_eq!(held, vec![(ItemKind::Berries, 4), (ItemKind::Meat, 1)]);
        assert_eq!(inventory.total(), 5);
    }
}
