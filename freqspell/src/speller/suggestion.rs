//! Ranked candidate for a spelling correction.
use crate::types::{Count, Probability};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Ranked candidate for a spelling correction
pub struct Suggestion {
    /// the suggested word-form
    pub value: SmolStr,
    /// relative frequency of the word-form, 0 for an echoed unknown input
    pub probability: Probability,
    /// raw occurrence count of the word-form
    pub count: Count,
    /// Damerau-Levenshtein distance from the normalized input
    pub distance: usize,
}

impl Suggestion {
    /// creates a ranked candidate
    pub fn new(value: SmolStr, probability: Probability, count: Count, distance: usize) -> Suggestion {
        Suggestion {
            value,
            probability,
            count,
            distance,
        }
    }

    /// the input itself, reported when no correction was found
    pub fn unknown(value: SmolStr) -> Suggestion {
        Suggestion::new(value, 0.0, 0, 0)
    }

    /// gets the suggested word-form
    pub fn value(&self) -> &str {
        &self.value
    }

    /// gets the relative frequency of the suggestion
    pub fn probability(&self) -> Probability {
        self.probability
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Most probable first; equal probabilities in lexicographic order.
impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = other
            .probability
            .partial_cmp(&self.probability)
            .unwrap_or(Equal);

        if let Equal = x {
            return self.value.cmp(&other.value);
        }

        x
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.probability == other.probability
    }
}

impl Eq for Suggestion {}
