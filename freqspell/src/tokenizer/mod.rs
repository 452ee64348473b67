//! Splitting free text into candidate words.
//!
//! Word boundaries follow Unicode Standard Annex #29, so inner apostrophes
//! ("don't") stay part of the word while punctuation and whitespace become
//! separate, non-word tokens.
use unic_segment::WordBoundIndices;

pub mod case_handling;

fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// Word tokens of a string with their byte offsets.
pub struct WordIndices<'a> {
    inner: WordBoundIndices<'a>,
}

impl<'a> Iterator for WordIndices<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|(_, token)| is_word(token))
    }
}

/// Word tokens of a string.
pub struct Words<'a> {
    inner: WordIndices<'a>,
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, token)| token)
    }
}

pub trait Tokenize {
    /// Every boundary-delimited token, words and separators alike.
    fn word_bound_indices(&self) -> WordBoundIndices;
    fn word_indices(&self) -> WordIndices;
    fn words(&self) -> Words;
}

impl Tokenize for str {
    fn word_bound_indices(&self) -> WordBoundIndices {
        WordBoundIndices::new(self)
    }

    fn word_indices(&self) -> WordIndices {
        WordIndices {
            inner: WordBoundIndices::new(self),
        }
    }

    fn words(&self) -> Words {
        Words {
            inner: self.word_indices(),
        }
    }
}
