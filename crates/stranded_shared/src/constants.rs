//! # World Constants
//!
//! Defaults for the world extent and the frame clock. Runtime values
//! come from `SimConfig`; these are what it falls back to.

// =============================================================================
// TERRAIN
// =============================================================================

/// Side length of the square world, in world units.
pub const TERRAIN_SIZE: f32 = 500.0;

/// Number of grid cells along each side of the terrain.
pub const TERRAIN_SEGMENTS: usize = 200;

/// Distance between neighbouring grid vertices.
#[allow(clippy::cast_precision_loss)]
pub const ELEMENT_SIZE: f32 = TERRAIN_SIZE / TERRAIN_SEGMENTS as f32;

// =============================================================================
// FRAME CLOCK
// =============================================================================

/// Physics updates per second.
pub const TICK_RATE: u32 = 60;

/// Physics step length in seconds.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum physics sub-steps per frame.
pub const MAX_SUBSTEPS: u32 = 3;

/// Upper bound on a frame's delta time, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;
