//! # Economy Error Types
//!
//! All errors that can occur in the economy system.

use thiserror::Error;

use crate::item::ItemKind;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Attempted to craft with insufficient materials.
    #[error("insufficient materials: need {required} {item}, have {available}")]
    InsufficientMaterials {
        /// The item that was missing.
        item: ItemKind,
        /// The amount required.
        required: u32,
        /// The amount available.
        available: u32,
    },

    /// No recipe produces this item.
    #[error("no recipe for {0}")]
    UnknownRecipe(ItemKind),

    /// A recipe consumes (transitively) its own output.
    #[error("cycle detected in recipe book at {0}")]
    RecipeCycle(ItemKind),

    /// The shop does not carry this item.
    #[error("{0} is not for sale")]
    NotForSale(ItemKind),

    /// The shop ran out of this item.
    #[error("{0} is out of stock")]
    OutOfStock(ItemKind),

    /// Not enough coins for a purchase.
    #[error("insufficient funds: price {price}, have {available}")]
    InsufficientFunds {
        /// Price of the item.
        price: u32,
        /// Coins held.
        available: u32,
    },

    /// Tried to take more of an item than the inventory holds.
    #[error("insufficient items: requested {requested} {item}, have {available}")]
    InsufficientItems {
        /// The item requested.
        item: ItemKind,
        /// The amount requested.
        requested: u32,
        /// The amount available.
        available: u32,
    },

    /// Item name that matches no known item.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// Invalid configuration data.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
