//! Gene quadruples and the gene-to-brick generator
//!
//! A quadruple (m, n, p, q) holds two Euclid generators: (m, n) and (p, q).
//! The generator combines them as
//!
//! - a = 4mnpq
//! - b = (m² − n²)(p² − q²)
//! - c = 2pq(m² + n²)
//!
//! Validity (m > n, p > q, both pairs coprime with odd difference) is the
//! seeding code's job; [`brick_from_genes`] accepts anything.

use crate::cuboid::Candidate;
use num_integer::Integer;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest upper bound that still admits a valid quadruple (m=2, n=1)
const MIN_GENE_BOUND: u32 = 2;

/// Four generator parameters (m, n, p, q)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneQuadruple {
    pub m: u32,
    pub n: u32,
    pub p: u32,
    pub q: u32,
}

impl GeneQuadruple {
    pub fn new(m: u32, n: u32, p: u32, q: u32) -> Self {
        GeneQuadruple { m, n, p, q }
    }

    pub fn genes(&self) -> [u32; 4] {
        [self.m, self.n, self.p, self.q]
    }

    pub fn from_genes(genes: [u32; 4]) -> Self {
        GeneQuadruple::new(genes[0], genes[1], genes[2], genes[3])
    }

    /// Both pairs generate primitive Pythagorean triples
    pub fn is_valid(&self) -> bool {
        is_primitive_pair(self.m, self.n) && is_primitive_pair(self.p, self.q)
    }

    /// Draw a valid quadruple by rejection sampling
    ///
    /// m and p are drawn from `2..=max_gene_value`, n and q from below them.
    /// Bounds under 2 are raised to 2 so a valid draw always exists.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_gene_value: u32) -> Self {
        let max = max_gene_value.max(MIN_GENE_BOUND);
        loop {
            let m = rng.gen_range(2..=max);
            let n = rng.gen_range(1..m);
            let p = rng.gen_range(2..=max);
            let q = rng.gen_range(1..p);

            let genes = GeneQuadruple::new(m, n, p, q);
            if genes.is_valid() {
                return genes;
            }
        }
    }

    /// Single-point crossover: (m, n) from `self`, (p, q) from `other`
    pub fn crossover(&self, other: &GeneQuadruple) -> Self {
        GeneQuadruple::new(self.m, self.n, other.p, other.q)
    }

    /// Shift one gene by `offset`, never going below 1
    ///
    /// `index` is taken modulo 4.
    pub fn mutate(&self, index: usize, offset: i64) -> Self {
        let mut genes = self.genes();
        let slot = &mut genes[index % 4];
        let shifted = (*slot as i64 + offset).clamp(1, u32::MAX as i64);
        *slot = shifted as u32;
        GeneQuadruple::from_genes(genes)
    }

    /// The candidate box these genes generate
    pub fn to_candidate(&self) -> Candidate {
        brick_from_genes(self.m, self.n, self.p, self.q)
    }
}

impl fmt::Display for GeneQuadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{m={}, n={}, p={}, q={}}}", self.m, self.n, self.p, self.q)
    }
}

/// x > y ≥ 1, gcd(x, y) = 1, x − y odd
fn is_primitive_pair(x: u32, y: u32) -> bool {
    x > y && y >= 1 && x.gcd(&y) == 1 && (x - y) % 2 == 1
}

/// Map a gene quadruple to a candidate box, sides ascending
///
/// Pure: the same genes always give the same candidate. Sides are absolute
/// values; a side too large for `i64` saturates at `i64::MAX`.
pub fn brick_from_genes(m: u32, n: u32, p: u32, q: u32) -> Candidate {
    let (m, n, p, q) = (m as i128, n as i128, p as i128, q as i128);

    let a = Some(4i128)
        .and_then(|v| v.checked_mul(m))
        .and_then(|v| v.checked_mul(n))
        .and_then(|v| v.checked_mul(p))
        .and_then(|v| v.checked_mul(q));
    let b = (m * m - n * n).checked_mul(p * p - q * q);
    let c = (2 * p * q).checked_mul(m * m + n * n);

    Candidate::new(to_side(a), to_side(b), to_side(c)).sorted()
}

fn to_side(value: Option<i128>) -> i64 {
    value
        .and_then(|v| i64::try_from(v.unsigned_abs()).ok())
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_formula() {
        // a = 4·2·1·2·1 = 16, b = 3·3 = 9, c = 2·2·1·5 = 20
        let c = brick_from_genes(2, 1, 2, 1);
        assert_eq!(c, Candidate::new(9, 16, 20));
    }

    #[test]
    fn test_sorted_and_absolute() {
        // m < n gives a negative b before abs
        let c = brick_from_genes(1, 2, 3, 2);
        assert!(c.a <= c.b && c.b <= c.c);
        assert!(c.is_valid());
    }

    #[test]
    fn test_pure() {
        let first = brick_from_genes(5, 2, 7, 4);
        for _ in 0..10 {
            assert_eq!(brick_from_genes(5, 2, 7, 4), first);
        }
    }

    #[test]
    fn test_equal_pair_gives_zero_side() {
        // m = n collapses b to 0, which scores as invalid
        let c = brick_from_genes(3, 3, 2, 1);
        assert_eq!(c.a, 0);
        assert_eq!(c.entropy().value(), 4);
    }

    #[test]
    fn test_huge_genes_saturate() {
        let c = brick_from_genes(u32::MAX, u32::MAX - 1, u32::MAX, u32::MAX - 1);
        assert_eq!(c.c, i64::MAX);
    }

    #[test]
    fn test_validity() {
        assert!(GeneQuadruple::new(2, 1, 2, 1).is_valid());
        assert!(GeneQuadruple::new(5, 2, 4, 1).is_valid());
        // m - n even
        assert!(!GeneQuadruple::new(3, 1, 2, 1).is_valid());
        // not coprime
        assert!(!GeneQuadruple::new(9, 6, 2, 1).is_valid());
        // p ≤ q
        assert!(!GeneQuadruple::new(2, 1, 1, 2).is_valid());
    }

    #[test]
    fn test_random_always_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let g = GeneQuadruple::random(&mut rng, 20);
            assert!(g.is_valid(), "{} should be valid", g);
            assert!(g.m <= 20 && g.p <= 20);
        }
    }

    #[test]
    fn test_random_with_tiny_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = GeneQuadruple::random(&mut rng, 0);
        assert_eq!(g, GeneQuadruple::new(2, 1, 2, 1));
    }

    #[test]
    fn test_crossover() {
        let left = GeneQuadruple::new(2, 1, 4, 1);
        let right = GeneQuadruple::new(5, 2, 7, 4);
        assert_eq!(left.crossover(&right), GeneQuadruple::new(2, 1, 7, 4));
    }

    #[test]
    fn test_mutate_clamps_to_one() {
        let g = GeneQuadruple::new(2, 1, 4, 1);
        assert_eq!(g.mutate(1, -2), GeneQuadruple::new(2, 1, 4, 1));
        assert_eq!(g.mutate(2, 2), GeneQuadruple::new(2, 1, 6, 1));
        assert_eq!(g.mutate(0, -2), GeneQuadruple::new(1, 1, 4, 1));
    }
}
