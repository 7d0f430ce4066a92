//! Genes module - the two parameterizations the searches work over
//!
//! - **gene**: (m, n, p, q) quadruples of Pythagorean generators and the
//!   fixed formula turning them into a candidate box
//! - **hypotenuse**: the pool of integers that can be a right triangle's
//!   hypotenuse, used to rebuild boxes backwards from their diagonals

pub mod gene;
pub mod hypotenuse;

pub use gene::{brick_from_genes, GeneQuadruple};
pub use hypotenuse::{HypotenusePool, TripleCombinations};
