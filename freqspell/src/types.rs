//! Scalar types shared across the crate.

/// Number of occurrences of a word in a population.
pub type Count = u64;

/// Relative frequency of a word, `count / total`.
pub type Probability = f64;
