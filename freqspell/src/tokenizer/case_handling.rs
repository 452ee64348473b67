//! Case folding applied before lookups, and recasing applied to output.
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Neither,
}

impl Case {
    #[inline(always)]
    fn new(ch: char) -> Case {
        if ch.is_lowercase() {
            Case::Lower
        } else if ch.is_uppercase() {
            Case::Upper
        } else {
            Case::Neither
        }
    }
}

/// An uppercase letter following a lowercase one, as in "McDonald".
/// Words containing non-letters are never mixed.
pub fn is_mixed_case(word: &str) -> bool {
    let mut seen_lower = false;
    let mut mixed = false;

    for ch in word.chars() {
        match Case::new(ch) {
            Case::Neither => return false,
            Case::Lower => seen_lower = true,
            Case::Upper => mixed |= seen_lower,
        }
    }

    mixed
}

fn has_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase)
}

pub fn is_all_caps(word: &str) -> bool {
    has_upper(word) && upper_case(word) == word
}

pub fn is_first_caps(word: &str) -> bool {
    has_upper(word) && upper_first(word) == word
}

/// Case folding policy of a frequency model.
///
/// The policy is a pure function of the input: the same word always folds to
/// the same key, and it is applied identically when populating the model,
/// when looking words up and before generating edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseHandling {
    /// Fold every word to lower case.
    Insensitive,
    /// Keep words exactly as given.
    Sensitive,
}

impl CaseHandling {
    pub fn from_sensitivity(case_sensitive: bool) -> CaseHandling {
        if case_sensitive {
            CaseHandling::Sensitive
        } else {
            CaseHandling::Insensitive
        }
    }

    pub fn is_sensitive(self) -> bool {
        self == CaseHandling::Sensitive
    }

    #[inline]
    pub fn normalize(self, word: &str) -> SmolStr {
        match self {
            CaseHandling::Insensitive => lower_case(word),
            CaseHandling::Sensitive => SmolStr::new(word),
        }
    }
}

impl Default for CaseHandling {
    fn default() -> Self {
        CaseHandling::Insensitive
    }
}

/// Case pattern of an input word, re-applied to corrections on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMutation {
    FirstCaps,
    AllCaps,
    None,
}

impl CaseMutation {
    pub fn of(word: &str) -> CaseMutation {
        if is_mixed_case(word) {
            return CaseMutation::None;
        }

        if word.chars().count() > 1 && is_all_caps(word) {
            CaseMutation::AllCaps
        } else if is_first_caps(word) {
            CaseMutation::FirstCaps
        } else {
            CaseMutation::None
        }
    }

    pub fn apply(self, word: &str) -> SmolStr {
        match self {
            CaseMutation::AllCaps => upper_case(word),
            CaseMutation::FirstCaps => upper_first(word),
            CaseMutation::None => SmolStr::new(word),
        }
    }
}
