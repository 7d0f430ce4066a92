//! Hypotenuse pool for the inverse reconstructor
//!
//! Every face diagonal of an Euler brick is the hypotenuse of an integer
//! right triangle, so it is a primitive hypotenuse m² + n² (m > n ≥ 1,
//! coprime, opposite parity) or a multiple of one.

use crate::cuboid::integer_sqrt;
use num_integer::Integer;
use rustc_hash::FxHashSet;

/// Sorted, deduplicated hypotenuse candidates up to a limit
///
/// Built once per reconstructor run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypotenusePool {
    limit: u64,
    values: Vec<u64>,
}

impl HypotenusePool {
    /// Collect every primitive hypotenuse ≤ `limit` and all its multiples
    pub fn build(limit: u64) -> Self {
        let mut found: FxHashSet<u64> = FxHashSet::default();
        let limit_wide = limit as u128;
        let m_max = integer_sqrt(limit_wide) as u64;

        for m in 2..=m_max {
            for n in 1..m {
                if (m - n) % 2 == 0 || m.gcd(&n) != 1 {
                    continue;
                }

                let h = (m as u128) * (m as u128) + (n as u128) * (n as u128);
                // h grows with n, so nothing further in this row fits
                if h > limit_wide {
                    break;
                }

                let h = h as u64;
                let mut multiple = h;
                while multiple <= limit {
                    found.insert(multiple);
                    match multiple.checked_add(h) {
                        Some(next) => multiple = next,
                        None => break,
                    }
                }
            }
        }

        let mut values: Vec<u64> = found.into_iter().collect();
        values.sort_unstable();

        HypotenusePool { limit, values }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Pool members, ascending
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// C(|pool|, 3): how many triples [`HypotenusePool::combinations`] yields
    pub fn combination_count(&self) -> u128 {
        let n = self.values.len() as u128;
        if n < 3 {
            return 0;
        }
        n * (n - 1) * (n - 2) / 6
    }

    /// Every unordered triple of distinct members, in lexicographic index order
    pub fn combinations(&self) -> TripleCombinations<'_> {
        TripleCombinations::new(&self.values)
    }
}

/// Iterator over 3-combinations of a slice without repetition
///
/// Yields `(values[i], values[j], values[k])` for i < j < k, with k moving
/// fastest. The order is fixed, so the first match found is reproducible.
#[derive(Debug, Clone)]
pub struct TripleCombinations<'a> {
    values: &'a [u64],
    i: usize,
    j: usize,
    k: usize,
}

impl<'a> TripleCombinations<'a> {
    pub fn new(values: &'a [u64]) -> Self {
        TripleCombinations {
            values,
            i: 0,
            j: 1,
            k: 2,
        }
    }
}

impl Iterator for TripleCombinations<'_> {
    type Item = (u64, u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.values.len();
        if self.k >= len {
            return None;
        }

        let item = (self.values[self.i], self.values[self.j], self.values[self.k]);

        self.k += 1;
        if self.k == len {
            self.j += 1;
            if self.j + 1 == len {
                self.i += 1;
                self.j = self.i + 1;
            }
            self.k = self.j + 1;
        }

        Some(item)
    }
}
