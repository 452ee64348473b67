use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ALPHABET;
use crate::frequency::WordFrequency;

/// Letters used for substitutions and insertions.
///
/// Letters are deduplicated and keep their first-seen order. Serializes as a
/// plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(letters: I) -> Alphabet {
        Alphabet {
            letters: letters.into_iter().unique().collect(),
        }
    }

    /// Every character used by the words of `model`.
    pub fn from_model(model: &WordFrequency) -> Alphabet {
        Alphabet::new(model.letters())
    }

    #[inline(always)]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::from(DEFAULT_ALPHABET)
    }
}

impl From<&str> for Alphabet {
    fn from(letters: &str) -> Self {
        Alphabet::new(letters.chars())
    }
}

impl From<String> for Alphabet {
    fn from(letters: String) -> Self {
        Alphabet::from(letters.as_str())
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.letters.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::case_handling::CaseHandling;

    #[test]
    fn dedup_keeps_order() {
        let alphabet = Alphabet::from("cabbac");
        assert_eq!(alphabet.letters(), &['c', 'a', 'b']);
    }

    #[test]
    fn from_model() {
        let model =
            WordFrequency::from_counts(vec![("ýes", 1), ("no", 2)], CaseHandling::Insensitive)
                .unwrap();
        assert_eq!(Alphabet::from_model(&model).letters(), &['e', 'n', 'o', 's', 'ý']);
    }

    #[test]
    fn serde_as_string() {
        let alphabet: Alphabet = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(serde_json::to_string(&alphabet).unwrap(), "\"xyz\"");
    }
}
