//! Word population with running totals and a removal overlay.
//!
//! [`WordFrequency`] maps normalized words to occurrence counts and keeps the
//! sum of all counts alongside, updated by every mutation together with the
//! per-word count. Words on the exclusion overlay are hidden from every query
//! without losing their counts, so they can be re-admitted later.
use std::cmp;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::debug;
use smol_str::SmolStr;

use crate::tokenizer::case_handling::CaseHandling;
use crate::tokenizer::Tokenize;
use crate::types::{Count, Probability};

pub mod error;

pub use self::error::FrequencyError;

#[derive(Debug, Clone, Default)]
pub struct WordFrequency {
    counts: HashMap<SmolStr, Count>,
    total: Count,
    excluded: HashSet<SmolStr>,
    case: CaseHandling,
    longest_word_length: usize,
}

impl WordFrequency {
    pub fn new(case: CaseHandling) -> WordFrequency {
        WordFrequency {
            case,
            ..Default::default()
        }
    }

    /// Builds a model from a bulk `word -> count` mapping.
    pub fn from_counts<I, S>(counts: I, case: CaseHandling) -> Result<WordFrequency, FrequencyError>
    where
        I: IntoIterator<Item = (S, Count)>,
        S: AsRef<str>,
    {
        let mut model = WordFrequency::new(case);
        model.load(counts)?;
        Ok(model)
    }

    #[inline(always)]
    pub fn case_handling(&self) -> CaseHandling {
        self.case
    }

    /// Folds `word` into the key space of this model.
    pub fn normalize(&self, word: &str) -> Result<SmolStr, FrequencyError> {
        let key = self.case.normalize(word);
        if key.is_empty() {
            return Err(FrequencyError::EmptyWord);
        }
        Ok(key)
    }

    fn normalize_all<I, S>(&self, words: I) -> Result<Vec<SmolStr>, FrequencyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .map(|word| self.normalize(word.as_ref()))
            .collect()
    }

    /// Count of an already normalized key, 0 when absent or excluded.
    #[inline]
    pub fn count_of(&self, key: &str) -> Count {
        if self.excluded.contains(key) {
            return 0;
        }
        self.counts.get(key).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_known_key(&self, key: &str) -> bool {
        self.count_of(key) > 0
    }

    pub fn probability_of(&self, key: &str) -> Probability {
        match self.count_of(key) {
            0 => 0.0,
            count => count as Probability / self.total as Probability,
        }
    }

    pub fn known(&self, word: &str) -> Result<bool, FrequencyError> {
        Ok(self.is_known_key(&self.normalize(word)?))
    }

    pub fn word_count(&self, word: &str) -> Result<Count, FrequencyError> {
        Ok(self.count_of(&self.normalize(word)?))
    }

    /// `count / total`, or 0 for absent and excluded words.
    pub fn probability(&self, word: &str) -> Result<Probability, FrequencyError> {
        Ok(self.probability_of(&self.normalize(word)?))
    }

    /// Adds `increment` occurrences of `word`, returning the new count.
    pub fn add(&mut self, word: &str, increment: Count) -> Result<Count, FrequencyError> {
        let key = self.normalize(word)?;
        let count = self.counts.get(&key).copied().unwrap_or(0);
        let next = count
            .checked_add(increment)
            .ok_or_else(|| FrequencyError::CountOverflow(key.clone()))?;
        self.store(key, next)?;
        Ok(next)
    }

    /// Changes the count of `word` by a signed `delta`.
    ///
    /// A count reaching zero removes the word. Going below zero is rejected
    /// and leaves the model untouched.
    pub fn adjust(&mut self, word: &str, delta: i64) -> Result<Count, FrequencyError> {
        let key = self.normalize(word)?;
        let count = self.counts.get(&key).copied().unwrap_or(0);
        let next = if delta < 0 {
            count
                .checked_sub(delta.unsigned_abs())
                .ok_or_else(|| FrequencyError::CountUnderflow {
                    word: key.clone(),
                    count,
                    delta,
                })?
        } else {
            count
                .checked_add(delta as Count)
                .ok_or_else(|| FrequencyError::CountOverflow(key.clone()))?
        };
        self.store(key, next)?;
        Ok(next)
    }

    /// Replaces the count of `word`, returning the previous one.
    pub fn set_count(&mut self, word: &str, count: Count) -> Result<Option<Count>, FrequencyError> {
        let key = self.normalize(word)?;
        let prior = self.counts.get(&key).copied();
        self.store(key, count)?;
        Ok(prior)
    }

    /// Deletes `word`, returning its previous count. Absent words are a no-op.
    pub fn remove(&mut self, word: &str) -> Result<Option<Count>, FrequencyError> {
        let key = self.normalize(word)?;
        let prior = self.take(&key);
        if prior.is_some() {
            self.shrink_longest(&key);
        }
        Ok(prior)
    }

    pub fn remove_words<I, S>(&mut self, words: I) -> Result<usize, FrequencyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = self.normalize_all(words)?;
        let removed = keys.iter().filter_map(|key| self.take(key)).count();
        if removed > 0 {
            self.refresh_longest();
        }
        Ok(removed)
    }

    /// Drops every word seen `threshold` times or fewer.
    pub fn remove_by_threshold(&mut self, threshold: Count) -> usize {
        let before = self.counts.len();
        let mut dropped: Count = 0;
        self.counts.retain(|_, count| {
            if *count <= threshold {
                dropped += *count;
                false
            } else {
                true
            }
        });
        self.total -= dropped;

        let removed = before - self.counts.len();
        if removed > 0 {
            self.refresh_longest();
        }
        debug!("removed {} words at or below {} occurrences", removed, threshold);
        removed
    }

    /// Merges counts additively, so several dictionaries can be layered.
    ///
    /// Nothing is merged unless every key is valid and no count or the total
    /// overflows. Entries with a zero count are skipped. Returns the number
    /// of merged entries.
    pub fn load<I, S>(&mut self, counts: I) -> Result<usize, FrequencyError>
    where
        I: IntoIterator<Item = (S, Count)>,
        S: AsRef<str>,
    {
        let entries = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(word, count)| Ok((self.normalize(word.as_ref())?, count)))
            .collect::<Result<Vec<_>, FrequencyError>>()?;

        let merged = entries.len();
        let mut staged: HashMap<SmolStr, Count> = HashMap::new();
        let mut total = self.total;
        for (key, count) in entries {
            total = total
                .checked_add(count)
                .ok_or_else(|| FrequencyError::CountOverflow(key.clone()))?;
            let base = match staged.get(&key) {
                Some(next) => *next,
                None => self.counts.get(&key).copied().unwrap_or(0),
            };
            let next = base
                .checked_add(count)
                .ok_or_else(|| FrequencyError::CountOverflow(key.clone()))?;
            staged.insert(key, next);
        }

        for (key, next) in staged {
            self.store(key, next)?;
        }

        debug!(
            "loaded {} entries; {} unique words, {} total",
            merged,
            self.counts.len(),
            self.total
        );
        Ok(merged)
    }

    /// Counts every occurrence in `words` once.
    pub fn load_words<I, S>(&mut self, words: I) -> Result<usize, FrequencyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<SmolStr, Count> = HashMap::new();
        for word in words {
            *counts.entry(SmolStr::new(word.as_ref())).or_insert(0) += 1;
        }
        self.load(counts.iter().map(|(word, count)| (word.as_str(), *count)))
    }

    /// Tokenizes `text` and counts its words.
    pub fn load_text(&mut self, text: &str) -> Result<usize, FrequencyError> {
        self.load_words(text.words())
    }

    /// Hides words from every query without deleting their counts.
    pub fn exclude<I, S>(&mut self, words: I) -> Result<usize, FrequencyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for key in self.normalize_all(words)? {
            if self.excluded.insert(key) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Re-admits a previously excluded word.
    pub fn include(&mut self, word: &str) -> Result<bool, FrequencyError> {
        let key = self.normalize(word)?;
        Ok(self.excluded.remove(&key))
    }

    pub fn clear_exclusions(&mut self) {
        self.excluded.clear();
    }

    pub fn is_excluded(&self, word: &str) -> Result<bool, FrequencyError> {
        Ok(self.excluded.contains(&self.normalize(word)?))
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> + '_ {
        self.excluded.iter().map(SmolStr::as_str)
    }

    /// Visible `(word, count)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Count)> + '_ {
        self.counts
            .iter()
            .filter(move |(word, _)| !self.excluded.contains(word.as_str()))
            .map(|(word, count)| (word.as_str(), *count))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(word, _)| word)
    }

    /// Number of stored words, excluded ones included.
    #[inline(always)]
    pub fn unique_words(&self) -> usize {
        self.counts.len()
    }

    #[inline(always)]
    pub fn total_words(&self) -> Count {
        self.total
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Length in characters of the longest stored word.
    #[inline(always)]
    pub fn longest_word_length(&self) -> usize {
        self.longest_word_length
    }

    /// Sorted set of characters used by the visible words.
    pub fn letters(&self) -> Vec<char> {
        self.words()
            .flat_map(str::chars)
            .unique()
            .sorted()
            .collect()
    }

    fn store(&mut self, key: SmolStr, next: Count) -> Result<(), FrequencyError> {
        if next == 0 {
            if self.take(&key).is_some() {
                self.shrink_longest(&key);
            }
            return Ok(());
        }

        let prior = self.counts.get(&key).copied().unwrap_or(0);
        self.total = if next >= prior {
            self.total
                .checked_add(next - prior)
                .ok_or_else(|| FrequencyError::CountOverflow(key.clone()))?
        } else {
            self.total - (prior - next)
        };
        self.longest_word_length = cmp::max(self.longest_word_length, key.chars().count());
        self.counts.insert(key, next);
        Ok(())
    }

    fn take(&mut self, key: &str) -> Option<Count> {
        let prior = self.counts.remove(key)?;
        self.total -= prior;
        Some(prior)
    }

    fn shrink_longest(&mut self, removed: &str) {
        if removed.chars().count() >= self.longest_word_length {
            self.refresh_longest();
        }
    }

    fn refresh_longest(&mut self) {
        self.longest_word_length = self
            .counts
            .keys()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0);
    }
}
