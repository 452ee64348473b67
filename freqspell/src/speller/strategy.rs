//! Candidate tiers tried in order by the speller.
//!
//! Each strategy maps a normalized word and a model to an optional set of
//! known words. The speller stops at the first strategy returning a
//! non-empty set, so closer tiers always win over farther ones.
use std::fmt::Debug;

use hashbrown::HashSet;
use log::trace;
use smol_str::SmolStr;

use super::Distance;
use crate::edits::{self, Alphabet};
use crate::frequency::WordFrequency;

pub trait CandidateStrategy: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this strategy mutates the input. Screened inputs (numbers,
    /// punctuation, overlong tokens) skip mutating strategies.
    fn generates_edits(&self) -> bool {
        true
    }

    fn candidates(
        &self,
        word: &str,
        model: &WordFrequency,
        alphabet: &Alphabet,
    ) -> Option<HashSet<SmolStr>>;
}

fn non_empty(set: HashSet<SmolStr>) -> Option<HashSet<SmolStr>> {
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// The word itself, when known.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exact;

impl CandidateStrategy for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn generates_edits(&self) -> bool {
        false
    }

    fn candidates(
        &self,
        word: &str,
        model: &WordFrequency,
        _alphabet: &Alphabet,
    ) -> Option<HashSet<SmolStr>> {
        if model.is_known_key(word) {
            Some(std::iter::once(SmolStr::new(word)).collect())
        } else {
            None
        }
    }
}

/// Known words one edit away.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance1;

impl CandidateStrategy for EditDistance1 {
    fn name(&self) -> &'static str {
        "distance-1"
    }

    fn candidates(
        &self,
        word: &str,
        model: &WordFrequency,
        alphabet: &Alphabet,
    ) -> Option<HashSet<SmolStr>> {
        let mut found = HashSet::new();
        edits::for_each_edit1(word, alphabet, |edit| {
            if model.is_known_key(edit) && !found.contains(edit) {
                found.insert(SmolStr::new(edit));
            }
        });
        non_empty(found)
    }
}

/// Known words two edits away, composing single edits and filtering as it
/// goes instead of materializing the full distance-2 set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance2;

impl CandidateStrategy for EditDistance2 {
    fn name(&self) -> &'static str {
        "distance-2"
    }

    fn candidates(
        &self,
        word: &str,
        model: &WordFrequency,
        alphabet: &Alphabet,
    ) -> Option<HashSet<SmolStr>> {
        let first = edits::edits1(word, alphabet);
        let mut found = HashSet::new();
        for edit in first.iter() {
            edits::for_each_edit1(edit, alphabet, |second| {
                if model.is_known_key(second) && !found.contains(second) {
                    found.insert(SmolStr::new(second));
                }
            });
        }
        trace!(
            "{} known words two edits from {:?} via {} intermediates",
            found.len(),
            word,
            first.len()
        );
        non_empty(found)
    }
}

/// Tiers for a maximum edit distance.
pub fn default_strategies(distance: Distance) -> Vec<Box<dyn CandidateStrategy>> {
    let mut strategies: Vec<Box<dyn CandidateStrategy>> =
        vec![Box::new(Exact), Box::new(EditDistance1)];
    if distance == Distance::Two {
        strategies.push(Box::new(EditDistance2));
    }
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::case_handling::CaseHandling;

    fn model() -> WordFrequency {
        WordFrequency::from_counts(
            vec![("spelling", 100), ("spewing", 10), ("hello", 5)],
            CaseHandling::Insensitive,
        )
        .unwrap()
    }

    fn set(words: &[&str]) -> HashSet<SmolStr> {
        words.iter().map(|w| SmolStr::new(w)).collect()
    }

    #[test]
    fn exact() {
        let alphabet = Alphabet::default();
        assert_eq!(Exact.candidates("hello", &model(), &alphabet), Some(set(&["hello"])));
        assert_eq!(Exact.candidates("helo", &model(), &alphabet), None);
    }

    #[test]
    fn distance_1() {
        let alphabet = Alphabet::default();
        assert_eq!(
            EditDistance1.candidates("speling", &model(), &alphabet),
            Some(set(&["spelling", "spewing"]))
        );
        assert_eq!(EditDistance1.candidates("spelng", &model(), &alphabet), None);
    }

    #[test]
    fn distance_2() {
        let alphabet = Alphabet::default();
        assert_eq!(
            EditDistance2.candidates("spelng", &model(), &alphabet),
            Some(set(&["spelling", "spewing"]))
        );
        assert_eq!(
            EditDistance2.candidates("hllo", &model(), &alphabet),
            Some(set(&["hello"]))
        );
        assert_eq!(EditDistance2.candidates("zzzzzz", &model(), &alphabet), None);
    }

    #[test]
    fn tiers() {
        let names = |d| {
            default_strategies(d)
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(Distance::One), vec!["exact", "distance-1"]);
        assert_eq!(names(Distance::Two), vec!["exact", "distance-1", "distance-2"]);
    }
}
