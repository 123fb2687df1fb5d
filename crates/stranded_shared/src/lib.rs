//! # Stranded Shared
//!
//! Common types used by the terrain, economy and simulation crates.
//!
//! Everything here is plain data: `Vec3`, `Quaternion`, `Transform`
//! and the world constants the defaults are built from.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    ELEMENT_SIZE, FIXED_TIMESTEP, MAX_FRAME_DELTA, MAX_SUBSTEPS, TERRAIN_SEGMENTS, TERRAIN_SIZE,
    TICK_RATE,
};
pub use math::{Quaternion, Transform, Vec3};
