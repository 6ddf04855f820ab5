//! Seeded two-dimensional simplex noise.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Skew and unskew factors for the 2-D simplex grid.
const SKEW: f64 = 0.366_025_403_784_438_6;
const UNSKEW: f64 = 0.211_324_865_405_187_1;

// Brings the summed corner contributions into roughly -1.0..=1.0.
const OUTPUT_SCALE: f64 = 70.0;

const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Coherent noise source backed by a shuffled permutation table.
///
/// The table is drawn once at construction; every subsequent sample reuses it
/// so neighbouring samples stay continuous.
#[derive(Clone)]
pub struct SimplexNoise {
    permutation: [u8; 512],
}

impl SimplexNoise {
    /// Builds a noise source whose permutation table is derived from `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Builds a noise source by shuffling the permutation table with `rng`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|index| index as u8);
        table.shuffle(rng);

        let mut permutation = [0_u8; 512];
        for (index, slot) in permutation.iter_mut().enumerate() {
            *slot = table[index & 255];
        }

        Self { permutation }
    }

    /// Samples the noise field at the provided coordinates.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * SKEW;
        let cell_x = (x + skew).floor();
        let cell_y = (y + skew).floor();
        let unskew = (cell_x + cell_y) * UNSKEW;

        let x0 = x - (cell_x - unskew);
        let y0 = y - (cell_y - unskew);

        let (step_x, step_y) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - step_x as f64 + UNSKEW;
        let y1 = y0 - step_y as f64 + UNSKEW;
        let x2 = x0 - 1.0 + 2.0 * UNSKEW;
        let y2 = y0 - 1.0 + 2.0 * UNSKEW;

        let ii = (cell_x as i64 & 255) as usize;
        let jj = (cell_y as i64 & 255) as usize;

        let g0 = self.gradient(ii, jj);
        let g1 = self.gradient(ii + step_x, jj + step_y);
        let g2 = self.gradient(ii + 1, jj + 1);

        let total = corner(g0, x0, y0) + corner(g1, x1, y1) + corner(g2, x2, y2);
        OUTPUT_SCALE * total
    }

    fn gradient(&self, i: usize, j: usize) -> (f64, f64) {
        let inner = usize::from(self.permutation[j]);
        let index = usize::from(self.permutation[i + inner]) % GRADIENTS.len();
        GRADIENTS[index]
    }
}

impl std::fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimplexNoise").finish_non_exhaustive()
    }
}

fn corner(gradient: (f64, f64), x: f64, y: f64) -> f64 {
    let falloff = 0.5 - x * x - y * y;
    if falloff < 0.0 {
        return 0.0;
    }

    let falloff_sq = falloff * falloff;
    falloff_sq * falloff_sq * (gradient.0 * x + gradient.1 * y)
}
