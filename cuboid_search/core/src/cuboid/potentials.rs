//! Disharmony potentials for the gradient harmonizer
//!
//! Entropy is a step function over integers and has no useful gradient on
//! its own. These three continuous penalties act as smooth proxies that the
//! harmonizer can follow between integer states.

use serde::{Deserialize, Serialize};

/// Target value for [`shape_hash`]: lobe radius 0.2438 over |κ'| = 1.69501254
pub const UNIFYING_TARGET: f64 = 0.2438 / 1.69501254;

/// Gaps at or below this are treated as collapsed
const GAP_EPSILON: f64 = 1e-9;

/// Rhythmic disharmony reported for collapsed gaps
const RHYTHM_FALLBACK: f64 = 1.0;

/// Weights applied to each force term by the harmonizer
///
/// Supplied by the caller; never derived from the search itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialWeights {
    /// Weight on the entropy difference
    pub entropy: f64,

    /// Weight on geometric disharmony
    pub geometric: f64,

    /// Weight on rhythmic disharmony
    pub rhythmic: f64,

    /// Weight on unifying disharmony
    pub unifying: f64,
}

impl Default for PotentialWeights {
    fn default() -> Self {
        Self {
            entropy: 1.0,
            geometric: 0.01,
            rhythmic: 0.01,
            unifying: 0.005,
        }
    }
}

impl PotentialWeights {
    pub fn is_finite(&self) -> bool {
        self.entropy.is_finite()
            && self.geometric.is_finite()
            && self.rhythmic.is_finite()
            && self.unifying.is_finite()
    }
}

/// Sum of |b/a − 1|, |c/a − 1|, |c/b − 1|
///
/// Returns `+∞` when `a` or `b` is zero.
pub fn geometric_disharmony(a: f64, b: f64, c: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        return f64::INFINITY;
    }
    (b / a - 1.0).abs() + (c / a - 1.0).abs() + (c / b - 1.0).abs()
}

/// Imbalance between the two gaps of the sorted sides
///
/// With sides ascending as (low, mid, high): |gap_out − gap_in| / (gap_in + gap_out),
/// where gap_in = mid − low and gap_out = high − mid. Collapsed gaps give 1.0.
pub fn rhythmic_disharmony(a: f64, b: f64, c: f64) -> f64 {
    let mut sides = [a, b, c];
    sides.sort_by(f64::total_cmp);

    let gap_in = sides[1] - sides[0];
    let gap_out = sides[2] - sides[1];
    // NaN sides fail both comparisons, so test the positive condition
    if !(gap_in > GAP_EPSILON && gap_out > GAP_EPSILON) {
        return RHYTHM_FALLBACK;
    }
    (gap_out - gap_in).abs() / (gap_in + gap_out)
}

/// (a + b + c) / √(a² + b² + c²), or 0 for the zero vector
pub fn shape_hash(a: f64, b: f64, c: f64) -> f64 {
    let norm_sq = a * a + b * b + c * c;
    if norm_sq > 0.0 {
        (a + b + c) / norm_sq.sqrt()
    } else {
        0.0
    }
}

/// Distance of [`shape_hash`] from [`UNIFYING_TARGET`]
pub fn unifying_disharmony(a: f64, b: f64, c: f64) -> f64 {
    (shape_hash(a, b, c) - UNIFYING_TARGET).abs()
}

/// The three potentials evaluated at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Potentials {
    pub geometric: f64,
    pub rhythmic: f64,
    pub unifying: f64,
}

impl Potentials {
    pub fn at(point: [f64; 3]) -> Self {
        let [a, b, c] = point;
        Potentials {
            geometric: geometric_disharmony(a, b, c),
            rhythmic: rhythmic_disharmony(a, b, c),
            unifying: unifying_disharmony(a, b, c),
        }
    }
}
