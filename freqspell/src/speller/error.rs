//! Error types for spell-checking operations.

use crate::frequency::FrequencyError;

/// Errors that can occur during spell-checking operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpellerError {
    /// The frequency model rejected the call
    #[error(transparent)]
    Frequency(#[from] FrequencyError),

    /// Maximum edit distance outside the supported tiers
    #[error("Unsupported edit distance {0}, expected 1 or 2")]
    InvalidDistance(u8),
}
