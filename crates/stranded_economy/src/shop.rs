//! # Shop
//!
//! Fixed-price items with limited stock, paid for in gold coins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EconomyError, EconomyResult};
use crate::inventory::Inventory;
use crate::item::ItemKind;

/// Price and remaining stock of one shop item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopEntry {
    /// Price in gold coins.
    pub price: u32,
    /// Units left.
    pub stock: u32,
}

/// Item vendor.
#[derive(Clone, Debug, Default)]
pub struct Shop {
    entries: BTreeMap<ItemKind, ShopEntry>,
}

impl Shop {
    /// Creates an empty shop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The survival shop: food, water, ammo and campfires.
    #[must_use]
    pub fn standard() -> Self {
        let mut shop = Self::new();
        shop.stock(ItemKind::WaterBottle, 5, 10);
        shop.stock(ItemKind::Berries, 2, 20);
        shop.stock(ItemKind::Meat, 8, 10);
        shop.stock(ItemKind::EnergyCell, 3, 30);
        shop.stock(ItemKind::PlasmaCell, 5, 20);
        shop.stock(ItemKind::Campfire, 15, 5);
        shop
    }

    /// Lists `item` at `price` with `stock` units, replacing any entry.
    pub fn stock(&mut self, item: ItemKind, price: u32, stock: u32) {
        self.entries.insert(item, ShopEntry { price, stock });
    }

    /// Entry for `item`.
    #[must_use]
    pub fn entry(&self, item: ItemKind) -> Option<ShopEntry> {
        self.entries.get(&item).copied()
    }

    /// Items with stock left, ordered by item.
    pub fn listing(&self) -> impl Iterator<Item = (ItemKind, ShopEntry)> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.stock > 0)
            .map(|(&item, &entry)| (item, entry))
    }

    /// Buys one `item`, returning the price paid.
    ///
    /// Funds are checked before stock.
    ///
    /// # Errors
    ///
    /// `NotForSale`, `InsufficientFunds` or `OutOfStock`; on error neither
    /// the inventory nor the shop changes.
    pub fn purchase(&mut self, inventory: &mut Inventory, item: ItemKind) -> EconomyResult<u32> {
        let entry = self
            .entries
            .get_mut(&item)
            .ok_or(EconomyError::NotForSale(item))?;

        let available = inventory.count(ItemKind::GoldCoin);
        if available < entry.price {
            return Err(EconomyError::InsufficientFunds {
                price: entry.price,
                available,
            });
        }
        if entry.stock == 0 {
            return Err(EconomyError::OutOfStock(item));
        }

        inventory.remove(ItemKind::GoldCoin, entry.price)?;
        inventory.add(item, 1);
        entry.stock -= 1;
        debug!(item = %item, price = entry.price, stock = entry.stock, "purchased");
        Ok(entry.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_debits_and_credits() {
        let mut shop = Shop::standard();
        let mut inventory = Inventory::from_counts([(ItemKind::GoldCoin, 20)]);

        let paid = shop.purchase(&mut inventory, ItemKind::Meat).unwrap();

        assert_eq!(paid, 8);
        assert_eq!(inventory.count(ItemKind::GoldCoin), 12);
        assert_eq!(inventory.count(ItemKind::Meat), 1);
        assert_eq!(shop.entry(ItemKind::Meat).unwrap().stock, 9);
    }

    #[test]
    fn test_funds_checked_before_stock() {
        let mut shop = Shop::new();
        shop.stock(ItemKind::Campfire, 15, 0);
        let mut inventory = Inventory::from_counts([(ItemKind::GoldCoin, 3)]);

        assert_eq!(
            shop.purchase(&mut inventory, ItemKind::Campfire),
            Err(EconomyError::InsufficientFunds {
                price: 15,
                available: 3
            })
        );

        inventory.add(ItemKind::GoldCoin, 20);
        assert_eq!(
            shop.purchase(&mut inventory, ItemKind::Campfire),
            Err(EconomyError::OutOfStock(ItemKind::Campfire))
        );
        assert_eq!(inventory.count(ItemKind::GoldCoin), 23);
    }

    #[test]
    fn test_not_for_sale() {
        let mut shop = Shop::standard();
        let mut inventory = Inventory::from_counts([(ItemKind::GoldCoin, 100)]);
        assert_eq!(
            shop.purchase(&mut inventory, ItemKind::PlasmaRifle),
            Err(EconomyError::NotForSale(ItemKind::PlasmaRifle))
        );
    }

    #[test]
    fn test_listing_hides_sold_out() {
        let mut shop = Shop::new();
        shop.stock(ItemKind::Berries, 2, 1);
        shop.stock(ItemKind::Meat, 8, 0);
        let listed: Vec<_> = shop.listing().map(|(item, _)| item).collect();
        assert_eq!(listed, vec![ItemKind::Berries]);
    }
}
