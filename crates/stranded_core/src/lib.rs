//! # Stranded Core
//!
//! Entity identity and lifecycle for the survival simulation.
//!
//! ## Lifecycle Rules
//!
//! 1. **Append on spawn** - entities join the end of their registry
//! 2. **Mark, then purge** - gameplay code only queues removals; the
//!    registry is compacted once per tick, after all systems have run
//! 3. **Ids are never reused** - a stale id simply stops resolving
//!
//! ## Example
//!
//! ```rust
//! use stranded_core::{EntityKind, Registry};
//!
//! let mut enemies = Registry::new(EntityKind::Enemy);
//! let id = enemies.spawn(30_u32);
//! assert!(enemies.queue_removal(id));
//! assert!(!enemies.queue_removal(id));
//!
//! let removed = enemies.purge();
//! assert_eq!(removed.len(), 1);
//! assert!(enemies.get(id).is_none());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;

pub use ecs::{EntityId, EntityKind, Registry};
