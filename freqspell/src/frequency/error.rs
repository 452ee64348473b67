//! Error types for frequency model operations.

use smol_str::SmolStr;

use crate::types::Count;

/// Usage errors reported by [`WordFrequency`](super::WordFrequency).
///
/// Absent words are never an error; these only flag calls that break the
/// model's contract.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FrequencyError {
    /// A lookup or mutation was given an empty word
    #[error("Empty word given to the frequency model")]
    EmptyWord,

    /// A negative adjustment would drive a count below zero
    #[error("Adjusting {word:?} by {delta} would drop its count of {count} below zero")]
    CountUnderflow {
        /// normalized word
        word: SmolStr,
        /// count before the adjustment
        count: Count,
        /// requested change
        delta: i64,
    },

    /// A count or the population total no longer fits
    #[error("Count overflow while updating {0:?}")]
    CountOverflow(SmolStr),
}
