//! Loading and exporting word-count dictionaries.
//!
//! Dictionaries are only a way to deliver a `word -> count` mapping to
//! [`WordFrequency::load`]; several can be layered onto one model, since
//! loading is additive.
use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::HashMap;
use log::debug;
use smol_str::SmolStr;

use crate::frequency::WordFrequency;
use crate::types::Count;

pub mod error;
pub mod gzip;
pub mod json;
pub mod meta;
pub mod text;
pub mod zip;

use self::error::DictionaryError;
pub use self::gzip::GzipDictionary;
pub use self::json::JsonDictionary;
use self::meta::DictionaryMetadata;
pub use self::text::{CountListDictionary, TextDictionary};
pub use self::zip::ZipDictionary;

pub type Counts = HashMap<SmolStr, Count>;

pub trait DictionarySource {
    fn open(path: &Path) -> Result<Self, DictionaryError>
    where
        Self: Sized;

    fn counts(&self) -> &Counts;
    fn metadata(&self) -> Option<&DictionaryMetadata>;
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Opens a dictionary, picking the format from the file extension:
/// `.json`, `.zip`, `.gz`, `.txt` (free text), `.tsv` or `.freq` (count lists).
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn DictionarySource>, DictionaryError> {
    let path = path.as_ref();

    let dictionary: Box<dyn DictionarySource> = match extension(path).as_str() {
        "json" => Box::new(JsonDictionary::open(path)?),
        "zip" => Box::new(ZipDictionary::open(path)?),
        "gz" => Box::new(GzipDictionary::open(path)?),
        "txt" => Box::new(TextDictionary::open(path)?),
        "tsv" | "freq" => Box::new(CountListDictionary::open(path)?),
        _ => {
            return Err(DictionaryError::UnsupportedFormat(
                path.display().to_string(),
            ))
        }
    };

    debug!(
        "opened {} with {} entries",
        path.display(),
        dictionary.counts().len()
    );
    Ok(dictionary)
}

/// Merges a dictionary into `model`, returning the number of merged entries.
pub fn load_into(
    model: &mut WordFrequency,
    dictionary: &dyn DictionarySource,
) -> Result<usize, DictionaryError> {
    let counts = dictionary
        .counts()
        .iter()
        .map(|(word, count)| (word.as_str(), *count));
    Ok(model.load(counts)?)
}

/// Writes the visible words of `model` as JSON. A `.gz` path gets gzip
/// JSON; otherwise `compressed` selects a zip archive.
pub fn export<P: AsRef<Path>>(
    model: &WordFrequency,
    path: P,
    compressed: bool,
) -> Result<(), DictionaryError> {
    let path = path.as_ref();
    if extension(path) == "gz" {
        gzip::export_gzip(model, path)
    } else if compressed {
        zip::export_zip(model, None, path)
    } else {
        json::export_json(model, path)
    }
}

pub(crate) fn sorted_counts(model: &WordFrequency) -> BTreeMap<&str, Count> {
    model.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::case_handling::CaseHandling;

    fn model() -> WordFrequency {
        WordFrequency::from_counts(
            vec![("alpha", 3), ("beta", 2), ("gamma", 1)],
            CaseHandling::Insensitive,
        )
        .unwrap()
    }

    #[test]
    fn json_export_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");

        let mut model = model();
        model.exclude(vec!["gamma"]).unwrap();
        export(&model, &path, false).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, r#"{"alpha":3,"beta":2}"#);

        let dictionary = open(&path).unwrap();
        assert_eq!(dictionary.counts().len(), 2);
        assert_eq!(dictionary.counts()["alpha"], 3);
        assert!(dictionary.metadata().is_none());
    }

    #[test]
    fn zip_export_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.zip");
        let metadata = DictionaryMetadata {
            locale: "en".into(),
            title: "Test".into(),
            ..Default::default()
        };

        zip::export_zip(&model(), Some(&metadata), &path).unwrap();

        let dictionary = open(&path).unwrap();
        assert_eq!(dictionary.counts()["beta"], 2);
        assert_eq!(dictionary.metadata(), Some(&metadata));

        let bare = dir.path().join("bare.zip");
        export(&model(), &bare, true).unwrap();
        assert!(open(&bare).unwrap().metadata().is_none());
    }

    #[test]
    fn gzip_export_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.json.gz");

        let mut model = model();
        model.exclude(vec!["gamma"]).unwrap();
        export(&model, &path, false).unwrap();
        assert_ne!(std::fs::read(&path).unwrap(), br#"{"alpha":3,"beta":2}"#.to_vec());

        let dictionary = open(&path).unwrap();
        assert_eq!(dictionary.counts().len(), 2);
        assert_eq!(dictionary.counts()["beta"], 2);

        let mut reloaded = WordFrequency::new(CaseHandling::Insensitive);
        load_into(&mut reloaded, dictionary.as_ref()).unwrap();
        assert_eq!(reloaded.total_words(), 5);
    }

    #[test]
    fn zip_without_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        let mut writer = ::zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        writer.finish().unwrap();
        drop(writer);

        assert!(matches!(
            open(&path),
            Err(DictionaryError::MissingEntry { entry: "words.json", .. })
        ));
    }

    #[test]
    fn layering_is_additive() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.json");
        let user = dir.path().join("user.tsv");
        std::fs::write(&base, r#"{"Colour": 10, "color": 4}"#).unwrap();
        std::fs::write(&user, "colour 5\nfreqspell\n").unwrap();

        let mut model = WordFrequency::new(CaseHandling::Insensitive);
        for path in &[&base, &user] {
            load_into(&mut model, open(path).unwrap().as_ref()).unwrap();
        }

        assert_eq!(model.word_count("colour").unwrap(), 15);
        assert_eq!(model.word_count("color").unwrap(), 4);
        assert_eq!(model.word_count("freqspell").unwrap(), 1);
        assert_eq!(model.total_words(), 20);
    }

    #[test]
    fn errors() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("words.xml");
        std::fs::write(&odd, "<words/>").unwrap();
        assert!(matches!(open(&odd), Err(DictionaryError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(open(&missing), Err(DictionaryError::Io(..))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[1, 2, 3]").unwrap();
        assert!(matches!(open(&broken), Err(DictionaryError::Json(..))));

        let empty_key = dir.path().join("empty.json");
        std::fs::write(&empty_key, r#"{"": 3}"#).unwrap();
        let mut model = WordFrequency::new(CaseHandling::Insensitive);
        assert!(matches!(
            load_into(&mut model, open(&empty_key).unwrap().as_ref()),
            Err(DictionaryError::Frequency(_))
        ));
    }
}
