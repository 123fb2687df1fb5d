//! # Entities
//!
//! Every live game object belongs to exactly one `Registry`, keyed by an
//! `EntityId` that carries the object's kind.
//!
//! ## Design Philosophy
//!
//! - Registries are plain ordered arenas; ids stay sorted by spawn order
//! - Removal is two-phase so a tick always sees a stable collection
//! - Kind dispatch is a `match` on `EntityKind`, never a field probe

mod entity;
mod registry;

pub use entity::{EntityId, EntityKind};
pub use registry::Registry;
