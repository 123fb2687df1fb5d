//! # STRANDED Economy
//!
//! Everything the player owns and trades, kept free of rendering and
//! physics so it can be tested on its own.
//!
//! ## Design Principles
//!
//! 1. **Counts, not slots** - the inventory is one counter per item kind
//! 2. **Transactional crafting and trade** - all-or-nothing changes
//! 3. **Failures are values** - every refusal is an `EconomyError`, and the
//!    caller decides what the player is told
//! 4. **Caller-owned randomness** - loot rolls take an `Rng`
//!
//! ## Example
//!
//! ```rust
//! use stranded_economy::{EconomyResult, Inventory, ItemKind, RecipeBook, Shop};
//!
//! # fn main() -> EconomyResult<()> {
//! let book = RecipeBook::standard();
//! let mut shop = Shop::standard();
//! let mut inventory = Inventory::from_counts([
//!     (ItemKind::Wood, 3),
//!     (ItemKind::Stone, 2),
//!     (ItemKind::GoldCoin, 10),
//! ]);
//!
//! book.craft(&mut inventory, ItemKind::Campfire)?;
//! let paid = shop.purchase(&mut inventory, ItemKind::WaterBottle)?;
//!
//! assert_eq!(inventory.count(ItemKind::Campfire), 1);
//! assert_eq!(paid, 5);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod crafting;
pub mod error;
pub mod inventory;
pub mod item;
pub mod loot;
pub mod quest;
pub mod shop;
pub mod weapons;

pub use crafting::{Recipe, RecipeBook};
pub use error::{EconomyError, EconomyResult};
pub use inventory::Inventory;
pub use item::ItemKind;
pub use loot::{enemy_drops, pickup_amount, resource_table, ChestEntry, ChestLootTable, WeightedTable};
pub use quest::{Completion, Objective, Quest, QuestContext, QuestId, QuestLog, QuestOffer, Reward};
pub use shop::{Shop, ShopEntry};
pub use weapons::{GunStats, WeaponStats};
