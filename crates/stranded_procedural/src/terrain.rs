//! # Terrain Grid
//!
//! Discrete sampling of the `HeightField` over a fixed square world.
//!
//! The grid owns `(segments + 1)²` vertex heights laid out row-major by z.
//! Vertex `(ix, iz)` sits at world position
//! `(ix * cell - size / 2, height, iz * cell - size / 2)`.
//!
//! Gameplay never calls the height field directly after startup:
//! `height_at` interpolates the grid so flattened building plots are
//! visible to every placement and grounding query.

use stranded_shared::Vec3;
use tracing::info;

use crate::height_field::HeightField;

/// Sampled, mutable terrain heights.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    size: f32,
    segments: usize,
    cell: f32,
    /// Row-major by z: index = iz * (segments + 1) + ix
    heights: Vec<f32>,
    revision: u64,
    dirty: bool,
}

impl TerrainGrid {
    /// Samples `field` at every vertex of a `size` x `size` world split
    /// into `segments` cells per side.
    ///
    /// A zero segment count is raised to one.
    #[must_use]
    pub fn build(field: &HeightField, size: f32, segments: usize) -> Self {
        let grid = Self::from_fn(size, segments, |x, z| field.sample_f32(x, z));
        info!(size, segments = grid.segments, "terrain grid built");
        grid
    }

    /// Builds a grid from an arbitrary height function of world (x, z).
    #[must_use]
    pub fn from_fn(size: f32, segments: usize, mut height: impl FnMut(f32, f32) -> f32) -> Self {
        let segments = segments.max(1);
        #[allow(clippy::cast_precision_loss)]
        let cell = size / segments as f32;
        let half = size * 0.5;
        let side = segments + 1;

        let mut heights = Vec::with_capacity(side * side);
        for iz in 0..side {
            for ix in 0..side {
                #[allow(clippy::cast_precision_loss)]
                let (x, z) = (ix as f32 * cell - half, iz as f32 * cell - half);
                heights.push(height(x, z));
            }
        }

        Self {
            size,
            segments,
            cell,
            heights,
            revision: 0,
            dirty: false,
        }
    }

    /// Side length of the world.
    #[inline]
    #[must_use]
    pub const fn world_size(&self) -> f32 {
        self.size
    }

    /// Cells per side.
    #[inline]
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.segments
    }

    /// Spacing between neighbouring vertices.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell
    }

    /// Half the world size; coordinates lie in `[-half, half]`.
    #[inline]
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    /// Clamps a world coordinate into the world extent.
    #[inline]
    #[must_use]
    pub fn clamp_coord(&self, v: f32) -> f32 {
        let half = self.half_extent();
        v.clamp(-half, half)
    }

    #[inline]
    fn side(&self) -> usize {
        self.segments + 1
    }

    #[inline]
    fn index(&self, ix: usize, iz: usize) -> usize {
        iz * self.side() + ix
    }

    /// Height stored at a vertex. Indices past the edge are clamped.
    #[must_use]
    pub fn vertex_height(&self, ix: usize, iz: usize) -> f32 {
        let ix = ix.min(self.segments);
        let iz = iz.min(self.segments);
        self.heights[self.index(ix, iz)]
    }

    /// World position of a vertex, including its height.
    #[must_use]
    pub fn vertex_position(&self, ix: usize, iz: usize) -> Vec3 {
        let ix = ix.min(self.segments);
        let iz = iz.min(self.segments);
        Vec3::new(
            self.vertex_coord(ix),
            self.heights[self.index(ix, iz)],
            self.vertex_coord(iz),
        )
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn vertex_coord(&self, i: usize) -> f32 {
        i as f32 * self.cell - self.half_extent()
    }

    /// Continuous grid coordinate for a world coordinate, clamped to
    /// `[0, segments]`. NaN maps to the low edge.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn grid_coord(&self, v: f32) -> f32 {
        let g = (v + self.half_extent()) / self.cell;
        if g.is_nan() {
            return 0.0;
        }
        g.clamp(0.0, self.segments as f32)
    }

    /// Bilinearly interpolated height at world `(x, z)`.
    ///
    /// Coordinates outside the world clamp to the nearest edge.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let gx = self.grid_coord(x);
        let gz = self.grid_coord(z);

        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.segments);
        let z1 = (z0 + 1).min(self.segments);

        let h00 = self.heights[self.index(x0, z0)];
        let h10 = self.heights[self.index(x1, z0)];
        let h01 = self.heights[self.index(x0, z1)];
        let h11 = self.heights[self.index(x1, z1)];

        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;
        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;
        h0 * (1.0 - tz) + h1 * tz
    }

    /// Inclusive vertex index range whose coordinates fall in `[lo, hi]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn vertex_span(&self, lo: f32, hi: f32) -> Option<(usize, usize)> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return None;
        }
        let half = self.half_extent();
        // One vertex of slack each way; the exact test happens per vertex.
        let first = (((lo + half) / self.cell).floor() - 1.0).max(0.0) as usize;
        let last = ((((hi + half) / self.cell).ceil() + 1.0).max(0.0) as usize).min(self.segments);
        let first = first.min(self.segments);
        (first <= last).then_some((first, last))
    }

    /// Sets every vertex inside the rectangle to `target`.
    ///
    /// The rectangle is centered on `(center_x, center_z)` and its edges
    /// are inclusive. Returns how many vertices were written. The grid is
    /// marked dirty; call `commit_flatten` once after a batch.
    pub fn flatten_area(
        &mut self,
        center_x: f32,
        center_z: f32,
        width: f32,
        depth: f32,
        target: f32,
    ) -> usize {
        let (x_lo, x_hi) = (center_x - width / 2.0, center_x + width / 2.0);
        let (z_lo, z_hi) = (center_z - depth / 2.0, center_z + depth / 2.0);

        let (Some((ix0, ix1)), Some((iz0, iz1))) =
            (self.vertex_span(x_lo, x_hi), self.vertex_span(z_lo, z_hi))
        else {
            return 0;
        };

        let mut written = 0;
        for iz in iz0..=iz1 {
            let z = self.vertex_coord(iz);
            if z < z_lo || z > z_hi {
                continue;
            }
            for ix in ix0..=ix1 {
                let x = self.vertex_coord(ix);
                if x < x_lo || x > x_hi {
                    continue;
                }
                let i = self.index(ix, iz);
                self.heights[i] = target;
                written += 1;
            }
        }

        if written > 0 {
            self.dirty = true;
        }
        written
    }

    /// Publishes a batch of flattens.
    ///
    /// Returns the new revision when anything changed since the last
    /// commit, so the mesh is rebuilt once per batch.
    pub fn commit_flatten(&mut self) -> Option<u64> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.revision += 1;
        info!(revision = self.revision, "terrain flatten committed");
        Some(self.revision)
    }

    /// True when the five-point probe (four corners and center) of the
    /// rectangle spans less than `threshold` in height.
    #[must_use]
    pub fn is_area_flat(
        &self,
        center_x: f32,
        center_z: f32,
        width: f32,
        depth: f32,
        threshold: f32,
    ) -> bool {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        let probes = [
            (center_x - hw, center_z - hd),
            (center_x + hw, center_z - hd),
            (center_x - hw, center_z + hd),
            (center_x + hw, center_z + hd),
            (center_x, center_z),
        ];

        let (min, max) = probes
            .iter()
            .map(|&(x, z)| self.height_at(x, z))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| (lo.min(h), hi.max(h)));
        max - min < threshold
    }

    /// Vertex heights, row-major by z.
    #[inline]
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Vertex heights as raw bytes for a vertex buffer upload.
    #[inline]
    #[must_use]
    pub fn height_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.heights)
    }

    /// Bumped once per committed flatten batch.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;

    fn ramp() -> TerrainGrid {
        // Height equals x + 100, so interpolation is exact
        TerrainGrid::from_fn(200.0, 200, |x, _| x + 100.0)
    }

    #[test]
    fn test_grid_dimensions() {
        let grid = TerrainGrid::build(&HeightField::new(WorldSeed::new(1)), 500.0, 200);
        assert_eq!(grid.heights().len(), 201 * 201);
        assert!((grid.cell_size() - 2.5).abs() < f32::EPSILON);
        assert_eq!(grid.height_bytes().len(), 201 * 201 * 4);
    }

    #[test]
    fn test_vertex_positions() {
        let grid = ramp();
        let corner = grid.vertex_position(0, 0);
        assert_eq!(corner.x, -100.0);
        assert_eq!(corner.z, -100.0);
        assert_eq!(grid.vertex_position(200, 200).x, 100.0);
    }

    #[test]
    fn test_height_at_vertex_matches_stored() {
        let field = HeightField::new(WorldSeed::new(8));
        let grid = TerrainGrid::build(&field, 500.0, 200);
        let v = grid.vertex_position(37, 121);
        assert_eq!(grid.height_at(v.x, v.z), grid.vertex_height(37, 121));
    }

    #[test]
    fn test_bilinear_on_ramp() {
        let grid = ramp();
        assert!((grid.height_at(10.25, -3.5) - 110.25).abs() < 1e-3);
    }

    #[test]
    fn test_outside_clamps_to_edge() {
        let grid = ramp();
        assert_eq!(grid.height_at(5_000.0, 0.0), grid.height_at(100.0, 0.0));
        assert_eq!(grid.height_at(-5_000.0, 7.0), grid.height_at(-100.0, 7.0));
        assert_eq!(grid.height_at(f32::INFINITY, 0.0), grid.height_at(100.0, 0.0));
    }

    #[test]
    fn test_flatten_writes_inclusive_rectangle() {
        let mut grid = ramp();
        let written = grid.flatten_area(0.0, 0.0, 10.0, 10.0, 5.0);
        // 11 x 11 vertices on a unit grid, edges included
        assert_eq!(written, 121);
        assert_eq!(grid.height_at(5.0, 5.0), 5.0);
        assert_eq!(grid.vertex_height(106, 100), 106.0);
    }

    #[test]
    fn test_flatten_outside_world_is_noop() {
        let mut grid = ramp();
        assert_eq!(grid.flatten_area(1_000.0, 0.0, 10.0, 10.0, 5.0), 0);
        assert_eq!(grid.commit_flatten(), None);
    }

    #[test]
    fn test_commit_once_per_batch() {
        let mut grid = ramp();
        grid.flatten_area(0.0, 0.0, 4.0, 4.0, 1.0);
        grid.flatten_area(20.0, 20.0, 4.0, 4.0, 1.0);
        assert_eq!(grid.commit_flatten(), Some(1));
        assert_eq!(grid.commit_flatten(), None);
        assert_eq!(grid.revision(), 1);
    }

    #[test]
    fn test_area_flat_probe() {
        let flat = TerrainGrid::from_fn(100.0, 50, |_, _| 3.0);
        assert!(flat.is_area_flat(0.0, 0.0, 70.0, 70.0, 5.0));

        let steep = ramp();
        assert!(!steep.is_area_flat(0.0, 0.0, 70.0, 70.0, 5.0));
        assert!(steep.is_area_flat(0.0, 0.0, 4.0, 4.0, 5.0));
    }

    #[test]
    fn test_nan_query_is_finite() {
        let grid = ramp();
        assert!(grid.height_at(f32::NAN, 0.0).is_finite());
    }
}
