/*! Probabilistic spelling correction from word frequencies.

Given a model of how often each word occurs, a misspelled word is corrected
to the most probable known word reachable within a small edit distance:
the word itself if known, else the best known word one edit away, else two
edits away. The approach follows Peter Norvig's [`How to Write a Spelling
Corrector`].

[`How to Write a Spelling Corrector`]: (https://norvig.com/spell-correct.html)

# Usage examples

```
use freqspell::speller::{Speller, SpellerConfig};

let speller = Speller::from_counts(
    vec![("spelling", 100), ("spewing", 10)],
    SpellerConfig::default(),
)
.unwrap();

assert_eq!(speller.correction("speling").unwrap().as_deref(), Some("spelling"));
assert!(speller.is_correct("spelling").unwrap());
```

Word counts are usually loaded from files, see [`dictionary::open`]; the
`freqspell` command line tool in the same repository shows the full flow.
*/

pub mod dictionary;
pub mod edits;
pub mod frequency;
pub mod speller;
pub mod tokenizer;
pub mod types;

pub(crate) mod constants;

pub use crate::dictionary::DictionarySource;
pub use crate::frequency::WordFrequency;
pub use crate::speller::{Speller, SpellerConfig};

/// Initializes `env_logger` from `RUST_LOG`; repeated calls are ignored.
#[cfg(feature = "logging")]
pub fn enable_logging() {
    let _ = env_logger::try_init();
}
