//! # STRANDED
//!
//! The simulation crate: a survival game core that runs headless, one tick
//! per frame, driven by an input snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           STRANDED SIMULATION                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │  procedural     │     │  core           │     │  economy        │   │
//! │  │                 │     │                 │     │                 │   │
//! │  │  • Noise        │     │  • EntityId     │     │  • Inventory    │   │
//! │  │  • HeightField  │     │  • Registry     │     │  • Recipes      │   │
//! │  │  • TerrainGrid  │     │  • Removal queue│     │  • Shop, Quests │   │
//! │  └────────┬────────┘     └────────┬────────┘     └────────┬────────┘   │
//! │           │                       │                       │            │
//! │           │              ┌────────▼────────┐              │            │
//! │           └─────────────>│   stranded      │<─────────────┘            │
//! │                          │                 │                           │
//! │                          │  • World        │                           │
//! │                          │  • Gameplay     │──────> EventBus           │
//! │                          │  • Simulation   │──────> WorldSnapshot      │
//! │                          └─────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `simulation`: `Simulation::tick` and the render snapshot
//! - `world`: all mutable state
//! - `gameplay`: the per-tick systems
//! - `physics`: the rigid-body seam and a kinematic implementation
//! - `assets`: model loading and placeholder shapes
//! - `events`: outbound event bus
//! - `game_loop`: frame clock and timing statistics

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod assets;
pub mod config;
pub mod day_night;
pub mod entities;
pub mod error;
pub mod events;
pub mod feedback;
pub mod game_loop;
pub mod gameplay;
pub mod input;
pub mod particles;
pub mod physics;
pub mod player;
pub mod simulation;
pub mod world;

// Re-export the sub-crates
pub use stranded_core as core;
pub use stranded_economy as economy;
pub use stranded_procedural as procedural;
pub use stranded_shared as shared;

// Re-export commonly used types
pub use assets::{AssetSource, MemoryAssets, ModelCatalog};
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use game_loop::{FrameStats, FrameStatsAccumulator};
pub use input::{InputSnapshot, MoveKeys, PlayerCommand};
pub use physics::{KinematicWorld, PhysicsWorld};
pub use simulation::{Simulation, WorldSnapshot};
pub use world::World;
