use std::path::Path;

use smol_str::SmolStr;

use super::error::DictionaryError;
use super::meta::DictionaryMetadata;
use super::{Counts, DictionarySource};
use crate::tokenizer::Tokenize;
use crate::types::Count;

fn read_to_string(path: &Path) -> Result<String, DictionaryError> {
    std::fs::read_to_string(path).map_err(|e| DictionaryError::Io(path.display().to_string(), e))
}

/// Free text; every word occurrence counts once.
#[derive(Debug)]
pub struct TextDictionary {
    counts: Counts,
}

impl TextDictionary {
    pub fn from_text(text: &str) -> TextDictionary {
        let mut counts = Counts::new();
        for word in text.words() {
            *counts.entry(SmolStr::new(word)).or_insert(0) += 1;
        }
        TextDictionary { counts }
    }

    pub fn into_counts(self) -> Counts {
        self.counts
    }
}

impl DictionarySource for TextDictionary {
    fn open(path: &Path) -> Result<TextDictionary, DictionaryError> {
        Ok(TextDictionary::from_text(&read_to_string(path)?))
    }

    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn metadata(&self) -> Option<&DictionaryMetadata> {
        None
    }
}

/// One `word count` pair per line, separated by tabs or spaces.
///
/// A bare word counts once; blank lines and lines starting with `#` are
/// skipped. Repeated words are summed.
#[derive(Debug)]
pub struct CountListDictionary {
    counts: Counts,
}

impl CountListDictionary {
    pub fn parse(text: &str, name: &str) -> Result<CountListDictionary, DictionaryError> {
        let mut counts = Counts::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let bad_line = || DictionaryError::BadCountLine {
                path: name.to_string(),
                line: index + 1,
                text: line.to_string(),
            };

            let mut fields = line.split_whitespace();
            let word = fields.next().ok_or_else(bad_line)?;
            let count = match fields.next() {
                Some(field) => field.parse::<Count>().map_err(|_| bad_line())?,
                None => 1,
            };
            if fields.next().is_some() {
                return Err(bad_line());
            }

            let entry = counts.entry(SmolStr::new(word)).or_insert(0);
            *entry = entry.saturating_add(count);
        }

        Ok(CountListDictionary { counts })
    }

    pub fn into_counts(self) -> Counts {
        self.counts
    }
}

impl DictionarySource for CountListDictionary {
    fn open(path: &Path) -> Result<CountListDictionary, DictionaryError> {
        CountListDictionary::parse(&read_to_string(path)?, &path.display().to_string())
    }

    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn metadata(&self) -> Option<&DictionaryMetadata> {
        None
    }
}
