use std::convert::TryFrom;

use hashbrown::HashSet;
use log::{debug, warn};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

use self::strategy::{default_strategies, CandidateStrategy};
use crate::constants::LENGTH_SLACK;
use crate::edits::{self, Alphabet};
use crate::frequency::WordFrequency;
use crate::speller::suggestion::Suggestion;
use crate::tokenizer::case_handling::{CaseHandling, CaseMutation};
use crate::tokenizer::Tokenize;
use crate::types::{Count, Probability};

pub mod error;
pub mod strategy;
pub mod suggestion;

pub use self::error::SpellerError;

/// Maximum number of edits tried before giving up on a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Distance {
    One,
    Two,
}

impl TryFrom<u8> for Distance {
    type Error = SpellerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Distance::One),
            2 => Ok(Distance::Two),
            n => Err(SpellerError::InvalidDistance(n)),
        }
    }
}

impl From<Distance> for u8 {
    fn from(distance: Distance) -> u8 {
        match distance {
            Distance::One => 1,
            Distance::Two => 2,
        }
    }
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Two
    }
}

/// What to report for a word with no known neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownHandling {
    /// Report the input itself, unmodified, with probability 0.
    Echo,
    /// Report nothing.
    Ignore,
}

impl Default for UnknownHandling {
    fn default() -> Self {
        UnknownHandling::Echo
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellerConfig {
    pub alphabet: Alphabet,
    pub case_sensitive: bool,
    pub distance: Distance,
    pub unknown_handling: UnknownHandling,
    /// Re-apply the input's capitalisation to corrections.
    pub recase: bool,
    pub n_best: Option<usize>,
    /// Skip edit generation for numbers, lone punctuation and overlong tokens.
    pub screen_input: bool,
}

impl Default for SpellerConfig {
    fn default() -> SpellerConfig {
        SpellerConfig {
            alphabet: Alphabet::default(),
            case_sensitive: false,
            distance: Distance::Two,
            unknown_handling: UnknownHandling::Echo,
            recase: false,
            n_best: Some(10),
            screen_input: true,
        }
    }
}

/// Numbers, `nan` and lone punctuation characters.
fn is_non_word(word: &str) -> bool {
    let mut chars = word.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_punctuation() || GeneralCategory::of(c).is_punctuation() {
            return true;
        }
    }
    word.eq_ignore_ascii_case("nan") || word.parse::<f64>().is_ok()
}

fn within_reach(word: &str, model: &WordFrequency) -> bool {
    word.chars().count() <= model.longest_word_length() + LENGTH_SLACK
}

struct Lookup {
    normalized: SmolStr,
    found: Option<HashSet<SmolStr>>,
    /// The input itself is known and comes back unchanged.
    exact: bool,
}

/// Frequency-ranked spelling corrector.
///
/// Owns its [`WordFrequency`] behind a read-write lock: queries share a read
/// lock for their whole duration, mutations take the write lock, so a query
/// never observes a count without its matching total. Share it across
/// threads as `Arc<Speller>`.
#[derive(Debug)]
pub struct Speller {
    model: RwLock<WordFrequency>,
    config: SpellerConfig,
    strategies: Vec<Box<dyn CandidateStrategy>>,
}

impl Speller {
    /// The model's case policy wins over `config.case_sensitive`.
    pub fn new(model: WordFrequency, mut config: SpellerConfig) -> Speller {
        let sensitive = model.case_handling().is_sensitive();
        if config.case_sensitive != sensitive {
            warn!(
                "config asks for case_sensitive = {}, model was built with {:?}; using the model's policy",
                config.case_sensitive,
                model.case_handling()
            );
            config.case_sensitive = sensitive;
        }

        let strategies = default_strategies(config.distance);

        Speller {
            model: RwLock::new(model),
            config,
            strategies,
        }
    }

    pub fn from_counts<I, S>(counts: I, config: SpellerConfig) -> Result<Speller, SpellerError>
    where
        I: IntoIterator<Item = (S, Count)>,
        S: AsRef<str>,
    {
        let case = CaseHandling::from_sensitivity(config.case_sensitive);
        let model = WordFrequency::from_counts(counts, case)?;
        Ok(Speller::new(model, config))
    }

    /// Appends a tier tried after the built-in ones.
    pub fn push_strategy(&mut self, strategy: Box<dyn CandidateStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    pub fn config(&self) -> &SpellerConfig {
        &self.config
    }

    pub fn model(&self) -> RwLockReadGuard<'_, WordFrequency> {
        self.model.read()
    }

    pub fn model_mut(&self) -> RwLockWriteGuard<'_, WordFrequency> {
        self.model.write()
    }

    pub fn known(&self, word: &str) -> Result<bool, SpellerError> {
        Ok(self.model.read().known(word)?)
    }

    /// Known, or not a word at all (numbers, lone punctuation) when screening.
    pub fn is_correct(&self, word: &str) -> Result<bool, SpellerError> {
        let model = self.model.read();
        let key = model.normalize(word)?;
        Ok(model.is_known_key(&key) || (self.config.screen_input && is_non_word(&key)))
    }

    pub fn probability(&self, word: &str) -> Result<Probability, SpellerError> {
        Ok(self.model.read().probability(word)?)
    }

    pub fn word_count(&self, word: &str) -> Result<Count, SpellerError> {
        Ok(self.model.read().word_count(word)?)
    }

    /// The normalized members of `words` that are known.
    pub fn known_words<I, S>(&self, words: I) -> Result<HashSet<SmolStr>, SpellerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let model = self.model.read();
        let mut out = HashSet::new();
        for word in words {
            let key = model.normalize(word.as_ref())?;
            if model.is_known_key(&key) {
                out.insert(key);
            }
        }
        Ok(out)
    }

    /// The normalized members of `words` that are unknown. Numbers and lone
    /// punctuation are not reported when screening.
    pub fn unknown<I, S>(&self, words: I) -> Result<HashSet<SmolStr>, SpellerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let model = self.model.read();
        let mut out = HashSet::new();
        for word in words {
            let key = model.normalize(word.as_ref())?;
            if model.is_known_key(&key) || (self.config.screen_input && is_non_word(&key)) {
                continue;
            }
            out.insert(key);
        }
        Ok(out)
    }

    /// Words of `text`, normalized with the model's case policy.
    pub fn split_words(&self, text: &str) -> Vec<SmolStr> {
        let case = self.model.read().case_handling();
        text.words().map(|word| case.normalize(word)).collect()
    }

    pub fn edits1(&self, word: &str) -> Result<HashSet<SmolStr>, SpellerError> {
        let key = self.model.read().normalize(word)?;
        Ok(edits::edits1(&key, &self.config.alphabet))
    }

    pub fn edits2(&self, word: &str) -> Result<HashSet<SmolStr>, SpellerError> {
        let key = self.model.read().normalize(word)?;
        Ok(edits::edits2(&key, &self.config.alphabet))
    }

    /// Known words of the closest non-empty tier, unranked.
    ///
    /// A known input comes back as given, without case folding. With no
    /// candidate in any tier the set holds the input unmodified
    /// ([`UnknownHandling::Echo`]) or is empty ([`UnknownHandling::Ignore`]).
    pub fn candidates(&self, word: &str) -> Result<HashSet<SmolStr>, SpellerError> {
        let model = self.model.read();
        let lookup = self.lookup(&model, word)?;

        Ok(match lookup.found {
            _ if lookup.exact => std::iter::once(SmolStr::new(word)).collect(),
            Some(found) => found,
            None => self.fallback(word).into_iter().collect(),
        })
    }

    /// Candidates ranked by probability, truncated to `n_best`.
    pub fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, SpellerError> {
        let model = self.model.read();
        let lookup = self.lookup(&model, word)?;
        let mut out = self.rank(&model, word, lookup);

        if let Some(n_best) = self.config.n_best {
            out.truncate(n_best);
        }
        Ok(out)
    }

    /// The most probable candidate; ties go to the lexicographically
    /// smallest word. `None` only under [`UnknownHandling::Ignore`].
    pub fn correction(&self, word: &str) -> Result<Option<SmolStr>, SpellerError> {
        let model = self.model.read();
        let lookup = self.lookup(&model, word)?;

        Ok(self
            .rank(&model, word, lookup)
            .into_iter()
            .next()
            .map(|s| s.value))
    }

    pub fn add(&self, word: &str, increment: Count) -> Result<Count, SpellerError> {
        Ok(self.model.write().add(word, increment)?)
    }

    pub fn adjust(&self, word: &str, delta: i64) -> Result<Count, SpellerError> {
        Ok(self.model.write().adjust(word, delta)?)
    }

    pub fn set_count(&self, word: &str, count: Count) -> Result<Option<Count>, SpellerError> {
        Ok(self.model.write().set_count(word, count)?)
    }

    pub fn remove(&self, word: &str) -> Result<Option<Count>, SpellerError> {
        Ok(self.model.write().remove(word)?)
    }

    pub fn load<I, S>(&self, counts: I) -> Result<usize, SpellerError>
    where
        I: IntoIterator<Item = (S, Count)>,
        S: AsRef<str>,
    {
        Ok(self.model.write().load(counts)?)
    }

    pub fn exclude<I, S>(&self, words: I) -> Result<usize, SpellerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.model.write().exclude(words)?)
    }

    pub fn include(&self, word: &str) -> Result<bool, SpellerError> {
        Ok(self.model.write().include(word)?)
    }

    pub fn clear_exclusions(&self) {
        self.model.write().clear_exclusions();
    }

    fn lookup(&self, model: &WordFrequency, word: &str) -> Result<Lookup, SpellerError> {
        let normalized = model.normalize(word)?;
        let screened = self.config.screen_input
            && (is_non_word(&normalized) || !within_reach(&normalized, model));

        for strategy in self.strategies.iter() {
            if screened && strategy.generates_edits() {
                continue;
            }

            let found = strategy
                .candidates(&normalized, model, &self.config.alphabet)
                .filter(|found| !found.is_empty());

            if let Some(found) = found {
                debug!(
                    "{:?}: {} candidates from {}",
                    word,
                    found.len(),
                    strategy.name()
                );
                return Ok(Lookup {
                    exact: found.contains(&normalized),
                    normalized,
                    found: Some(found),
                });
            }
        }

        debug!(
            "{:?}: no candidates{}",
            word,
            if screened { " (screened)" } else { "" }
        );
        Ok(Lookup {
            normalized,
            found: None,
            exact: false,
        })
    }

    fn fallback(&self, word: &str) -> Option<SmolStr> {
        match self.config.unknown_handling {
            UnknownHandling::Echo => Some(SmolStr::new(word)),
            UnknownHandling::Ignore => None,
        }
    }

    fn rank(&self, model: &WordFrequency, word: &str, lookup: Lookup) -> Vec<Suggestion> {
        let found = match lookup.found {
            Some(found) => found,
            None => {
                return self
                    .fallback(word)
                    .map(Suggestion::unknown)
                    .into_iter()
                    .collect()
            }
        };

        if lookup.exact {
            let key = &lookup.normalized;
            return vec![Suggestion::new(
                SmolStr::new(word),
                model.probability_of(key),
                model.count_of(key),
                0,
            )];
        }

        let mut out = found
            .into_iter()
            .map(|candidate| {
                let probability = model.probability_of(&candidate);
                let count = model.count_of(&candidate);
                let distance = strsim::damerau_levenshtein(&lookup.normalized, &candidate);
                Suggestion::new(candidate, probability, count, distance)
            })
            .collect::<Vec<_>>();
        out.sort();

        // Recased after sorting, so ties are broken on the normalized word.
        if self.config.recase && !model.case_handling().is_sensitive() {
            let mutation = CaseMutation::of(word);
            if mutation != CaseMutation::None {
                out.iter_mut()
                    .for_each(|sugg| sugg.value = mutation.apply(&sugg.value));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(config: SpellerConfig) -> Speller {
        Speller::from_counts(
            vec![
                ("spelling", 100),
                ("spewing", 10),
                ("hello", 5),
                ("help", 5),
                ("the", 50),
            ],
            config,
        )
        .unwrap()
    }

    #[test]
    fn correction_prefers_probability() {
        let speller = sample(SpellerConfig::default());
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "spelling");
        assert_eq!(speller.correction("teh").unwrap().unwrap(), "the");
    }

    #[test]
    fn ties_are_lexicographic() {
        let speller = sample(SpellerConfig::default());
        // "hello" and "help" are both one edit away with equal counts.
        let suggestions = speller.suggest("helo").unwrap();
        let values = suggestions.iter().map(Suggestion::value).collect::<Vec<_>>();
        assert_eq!(values, vec!["hello", "help"]);
        assert_eq!(speller.correction("helo").unwrap().unwrap(), "hello");
    }

    #[test]
    fn known_words_are_not_mutated() {
        let speller = sample(SpellerConfig::default());
        let expected: HashSet<SmolStr> = std::iter::once(SmolStr::new("hello")).collect();
        assert_eq!(speller.candidates("hello").unwrap(), expected);
        assert_eq!(speller.correction("hello").unwrap().unwrap(), "hello");
    }

    #[test]
    fn fallback_policies() {
        let speller = sample(SpellerConfig::default());
        assert_eq!(speller.correction("qqqqqqq").unwrap().unwrap(), "qqqqqqq");
        let suggestions = speller.suggest("qqqqqqq").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].probability, 0.0);

        let speller = sample(SpellerConfig {
            unknown_handling: UnknownHandling::Ignore,
            ..Default::default()
        });
        assert_eq!(speller.correction("qqqqqqq").unwrap(), None);
        assert!(speller.candidates("qqqqqqq").unwrap().is_empty());
        assert!(speller.suggest("qqqqqqq").unwrap().is_empty());
    }

    #[test]
    fn distance_one_stops_early() {
        let speller = sample(SpellerConfig {
            distance: Distance::One,
            ..Default::default()
        });
        assert_eq!(speller.correction("spelng").unwrap().unwrap(), "spelng");

        let speller = sample(SpellerConfig::default());
        assert_eq!(speller.correction("spelng").unwrap().unwrap(), "spelling");
    }

    #[test]
    fn screening() {
        let speller = sample(SpellerConfig::default());
        assert_eq!(speller.correction("1234").unwrap().unwrap(), "1234");
        assert!(speller.is_correct("3.14").unwrap());
        assert!(!speller.is_correct("helo").unwrap());

        // Longer than "spelling" + 3: no generation at all.
        assert_eq!(
            speller.correction("spellingxxxx").unwrap().unwrap(),
            "spellingxxxx"
        );

        let speller = sample(SpellerConfig {
            screen_input: false,
            ..Default::default()
        });
        assert!(!speller.is_correct("3.14").unwrap());
    }

    #[test]
    fn known_input_is_returned_unchanged() {
        let speller = Speller::from_counts(
            vec![("paris", 10), ("hello", 5)],
            SpellerConfig::default(),
        )
        .unwrap();

        let expected: HashSet<SmolStr> = std::iter::once(SmolStr::new("Paris")).collect();
        assert_eq!(speller.candidates("Paris").unwrap(), expected);
        assert_eq!(speller.correction("Paris").unwrap().unwrap(), "Paris");

        let suggestions = speller.suggest("PARIS").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value(), "PARIS");
        assert_eq!(suggestions[0].count, 10);
        assert_eq!(suggestions[0].distance, 0);

        // Corrections still come from the normalized model.
        assert_eq!(speller.correction("Pariss").unwrap().unwrap(), "paris");
        assert_eq!(speller.correction("Xyzzyq").unwrap().unwrap(), "Xyzzyq");
    }

    #[test]
    fn screening_keeps_letterless_words() {
        let speller = Speller::from_counts(vec![("a", 5), ("a-", 3)], SpellerConfig::default())
            .unwrap();
        assert!(speller.edits1("1").unwrap().contains("a"));

        // Numbers, nan and lone punctuation are left alone.
        assert_eq!(speller.correction("1").unwrap().unwrap(), "1");
        assert_eq!(speller.correction("NaN").unwrap().unwrap(), "NaN");
        assert_eq!(speller.correction(".").unwrap().unwrap(), ".");
        assert!(speller.is_correct("1e5").unwrap());

        // Other letterless tokens are corrected like any word.
        assert!(!speller.is_correct("--").unwrap());
        assert_eq!(speller.correction("--").unwrap().unwrap(), "a-");

        let speller = Speller::from_counts(
            vec![("a", 5), ("a-", 3)],
            SpellerConfig {
                screen_input: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(speller.correction("1").unwrap().unwrap(), "a");
        assert_eq!(speller.correction("--").unwrap().unwrap(), "a-");
    }

    #[test]
    fn recasing() {
        let speller = sample(SpellerConfig {
            recase: true,
            ..Default::default()
        });
        assert_eq!(speller.correction("SPELING").unwrap().unwrap(), "SPELLING");
        assert_eq!(speller.correction("Speling").unwrap().unwrap(), "Spelling");
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "spelling");
        assert_eq!(speller.correction("Hello").unwrap().unwrap(), "Hello");

        let speller = sample(SpellerConfig::default());
        assert_eq!(speller.correction("SPELING").unwrap().unwrap(), "spelling");
    }

    #[test]
    fn case_sensitive_model() {
        let speller = Speller::from_counts(
            vec![("Paris", 10), ("pairs", 3)],
            SpellerConfig {
                case_sensitive: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(speller.known("Paris").unwrap());
        assert!(!speller.known("paris").unwrap());
        assert_eq!(speller.correction("Pariss").unwrap().unwrap(), "Paris");
    }

    #[test]
    fn model_policy_wins() {
        let model = WordFrequency::new(CaseHandling::Sensitive);
        let speller = Speller::new(model, SpellerConfig::default());
        assert!(speller.config().case_sensitive);
    }

    #[test]
    fn unknown_and_known_words() {
        let speller = sample(SpellerConfig::default());
        let words = speller.split_words("The helo world, 42 times");
        let unknown = speller.unknown(words.iter().map(SmolStr::as_str)).unwrap();
        let expected: HashSet<SmolStr> = vec!["helo", "world", "times"]
            .into_iter()
            .map(SmolStr::new)
            .collect();
        assert_eq!(unknown, expected);
        assert_eq!(
            speller
                .known_words(words.iter().map(SmolStr::as_str))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn mutations_are_visible() {
        let speller = sample(SpellerConfig::default());
        speller.add("speeling", 1000).unwrap();
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "speeling");

        speller.exclude(vec!["speeling"]).unwrap();
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "spelling");

        speller.include("speeling").unwrap();
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "speeling");

        speller.remove("speeling").unwrap();
        assert_eq!(speller.correction("speling").unwrap().unwrap(), "spelling");
    }

    #[test]
    fn empty_input_is_an_error() {
        let speller = sample(SpellerConfig::default());
        assert!(speller.correction("").is_err());
        assert!(speller.candidates("").is_err());
        assert!(speller.known("").is_err());
    }

    #[test]
    fn distance_config() {
        let config: SpellerConfig = serde_json::from_str(r#"{"distance": 1}"#).unwrap();
        assert_eq!(config.distance, Distance::One);
        assert_eq!(config.n_best, Some(10));
        assert!(serde_json::from_str::<SpellerConfig>(r#"{"distance": 3}"#).is_err());
        assert!(matches!(
            Distance::try_from(0),
            Err(SpellerError::InvalidDistance(0))
        ));
    }

    #[derive(Debug)]
    struct Fixed;

    impl CandidateStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn candidates(
            &self,
            _word: &str,
            model: &WordFrequency,
            _alphabet: &Alphabet,
        ) -> Option<HashSet<SmolStr>> {
            if model.is_known_key("the") {
                Some(std::iter::once(SmolStr::new("the")).collect())
            } else {
                None
            }
        }
    }

    #[test]
    fn appended_strategy() {
        let mut speller = sample(SpellerConfig::default());
        speller.push_strategy(Box::new(Fixed));
        assert_eq!(
            speller.strategies().collect::<Vec<_>>(),
            vec!["exact", "distance-1", "distance-2", "fixed"]
        );
        assert_eq!(speller.correction("qqqqqqq").unwrap().unwrap(), "the");
    }
}
