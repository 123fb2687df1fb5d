//! # Simplex Noise
//!
//! Deterministic 2D coherent noise, the raw material of the height field.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, a generator produces exactly the same
//! values for the same coordinates, every run. Independent generators
//! are built from `WorldSeed::derive` so their outputs never coincide.

use serde::{Deserialize, Serialize};

/// World seed for deterministic generation.
///
/// All terrain derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for one noise channel.
    ///
    /// Different `channel` values give independent streams.
    #[inline]
    #[must_use]
    pub const fn derive(self, channel: u64) -> Self {
        let mut hash = self.0 ^ channel;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        // xorshift stalls on zero
        if hash == 0 {
            hash = 0x9e37_79b9_7f4a_7c15;
        }
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(42)
    }
}

/// Shuffled lattice hash and gradient set, built once per generator.
struct PermutationTable {
    /// 256 entries, doubled so lookups never wrap.
    perm: [u8; 512],
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (slot, value) in perm.iter_mut().zip(0..=255u8) {
            *slot = value;
        }

        // Fisher-Yates driven by xorshift64
        let mut state = seed.value();
        for i in (1..256usize).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            #[allow(clippy::cast_possible_truncation)]
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        let grad = [
            [1, 0], [1, 1], [0, 1], [-1, 1],
            [-1, 0], [-1, -1], [0, -1], [1, -1],
            [1, 0], [0, 1], [-1, 0], [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous values in [-1, 1]. O(1) per sample and
/// allocation free.
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor, (sqrt(3) - 1) / 2.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor, (3 - sqrt(3)) / 6.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a new generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples noise at `(x, z)`. Returns a value in [-1, 1].
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::similar_names)]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let skew = (x + z) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(z + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let z0 = z - (f64::from(j) - unskew);

        // Lower or upper triangle of the skewed cell
        let (i1, j1) = if x0 > z0 { (1usize, 0usize) } else { (0, 1) };

        #[allow(clippy::cast_precision_loss)]
        let x1 = x0 - i1 as f64 + Self::G2;
        #[allow(clippy::cast_precision_loss)]
        let z1 = z0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let z2 = z0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let table = &self.perm_table;

        let g0 = table.get(ii + table.get(jj) as usize);
        let g1 = table.get(ii + i1 + table.get(jj + j1) as usize);
        let g2 = table.get(ii + 1 + table.get(jj + 1) as usize);

        70.0 * (self.corner(x0, z0, g0) + self.corner(x1, z1, g1) + self.corner(x2, z2, g2))
    }

    /// Samples noise remapped from [-1, 1] to [0, 1].
    #[inline]
    #[must_use]
    pub fn sample_unit(&self, x: f64, z: f64) -> f64 {
        (self.sample(x, z) + 1.0) * 0.5
    }

    #[inline]
    fn corner(&self, x: f64, z: f64, hash: u8) -> f64 {
        let t = 0.5 - x * x - z * z;
        if t < 0.0 {
            return 0.0;
        }
        let grad = self.perm_table.gradient(hash);
        let t2 = t * t;
        t2 * t2 * (x * f64::from(grad[0]) + z * f64::from(grad[1]))
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let a = SimplexNoise::new(seed);
        let b = SimplexNoise::new(seed);

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let z = f64::from(i) * 0.17;
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let a = SimplexNoise::new(WorldSeed::new(1));
        let b = SimplexNoise::new(WorldSeed::new(2));
        assert_ne!(a.sample(100.3, 100.7), b.sample(100.3, 100.7));
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(WorldSeed::new(42));
        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let z = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, z);
            assert!((-1.0..=1.0).contains(&value), "{value} at ({x}, {z})");

            let unit = noise.sample_unit(x, z);
            assert!((0.0..=1.0).contains(&unit));
        }
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(WorldSeed::new(42));
        let v = noise.sample(100.0, 100.0);
        assert!((v - noise.sample(100.001, 100.0)).abs() < 0.01);
        assert!((v - noise.sample(100.0, 100.001)).abs() < 0.01);
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        assert_ne!(base.derive(1), base.derive(2));
        assert_eq!(base.derive(1), base.derive(1));
        assert_ne!(base.derive(1), base);
    }

    #[test]
    fn test_negative_coordinates_sample() {
        let noise = SimplexNoise::new(WorldSeed::new(7));
        let value = noise.sample(-250.0 * 0.02, -249.5 * 0.02);
        assert!(value.is_finite());
    }
}
