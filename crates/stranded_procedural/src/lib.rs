//! # Stranded Procedural Terrain
//!
//! Deterministic terrain for a fixed square world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same terrain
//! 2. **Two layers**: a continuous `HeightField` and the sampled
//!    `TerrainGrid` that gameplay actually queries
//! 3. **Flatten-aware**: building foundations rewrite the grid, so every
//!    placement query goes through `TerrainGrid::height_at`
//!
//! ## Core Components
//!
//! - `SimplexNoise`: 2D coherent noise
//! - `HeightField`: biome amplitude + three detail octaves, floored at 0
//! - `TerrainGrid`: (N+1)² vertex heights, bilinear lookup, area flattening
//!
//! ## Example
//!
//! ```rust
//! use stranded_procedural::{HeightField, TerrainGrid, WorldSeed};
//!
//! let field = HeightField::new(WorldSeed::new(12345));
//! let mut grid = TerrainGrid::build(&field, 500.0, 200);
//!
//! grid.flatten_area(0.0, 0.0, 10.0, 10.0, 5.0);
//! grid.commit_flatten();
//! assert!((grid.height_at(0.0, 0.0) - 5.0).abs() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod height_field;
pub mod noise;
pub mod terrain;

pub use height_field::{HeightField, HeightFieldParams};
pub use noise::{SimplexNoise, WorldSeed};
pub use terrain::TerrainGrid;
