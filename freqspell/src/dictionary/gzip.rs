use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::error::DictionaryError;
use super::meta::DictionaryMetadata;
use super::text::{CountListDictionary, TextDictionary};
use super::{extension, sorted_counts, Counts, DictionarySource};
use crate::frequency::WordFrequency;

/// A gzip-compressed dictionary. The extension under `.gz` picks the inner
/// format: `.txt.gz` is free text, `.tsv.gz` and `.freq.gz` are count lists,
/// anything else (`.json.gz`, bare `.gz`) is a JSON count map.
#[derive(Debug)]
pub struct GzipDictionary {
    counts: Counts,
}

impl DictionarySource for GzipDictionary {
    fn open(path: &Path) -> Result<GzipDictionary, DictionaryError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;

        let mut text = String::new();
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut text)
            .map_err(|e| DictionaryError::Io(name.clone(), e))?;

        let counts = match extension(Path::new(path.file_stem().unwrap_or_default())).as_str() {
            "txt" => TextDictionary::from_text(&text).into_counts(),
            "tsv" | "freq" => CountListDictionary::parse(&text, &name)?.into_counts(),
            _ => serde_json::from_str(&text).map_err(|e| DictionaryError::Json(name, e))?,
        };

        Ok(GzipDictionary { counts })
    }

    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn metadata(&self) -> Option<&DictionaryMetadata> {
        None
    }
}

/// Writes the visible words of `model` as gzip-compressed JSON.
pub fn export_gzip(model: &WordFrequency, path: &Path) -> Result<(), DictionaryError> {
    let name = path.display().to_string();
    let file = File::create(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    serde_json::to_writer(&mut encoder, &sorted_counts(model))
        .map_err(|e| DictionaryError::Json(name.clone(), e))?;
    let mut writer = encoder
        .finish()
        .map_err(|e| DictionaryError::Io(name.clone(), e))?;
    writer.flush().map_err(|e| DictionaryError::Io(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::case_handling::CaseHandling;

    fn write_gzip(path: &Path, text: &str) {
        let file = File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn export_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.json.gz");

        let model = WordFrequency::from_counts(
            vec![("alpha", 3), ("beta", 2)],
            CaseHandling::Insensitive,
        )
        .unwrap();
        export_gzip(&model, &path).unwrap();

        let dictionary = GzipDictionary::open(&path).unwrap();
        assert_eq!(dictionary.counts().len(), 2);
        assert_eq!(dictionary.counts().get("alpha").copied(), Some(3));
        assert!(dictionary.metadata().is_none());
    }

    #[test]
    fn inner_extension_picks_format() {
        let dir = tempfile::tempdir().unwrap();

        let text = dir.path().join("corpus.txt.gz");
        write_gzip(&text, "the cat saw the dog");
        let dictionary = GzipDictionary::open(&text).unwrap();
        assert_eq!(dictionary.counts().get("the").copied(), Some(2));

        let list = dir.path().join("counts.tsv.gz");
        write_gzip(&list, "the\t40\ncat 2\n");
        let dictionary = GzipDictionary::open(&list).unwrap();
        assert_eq!(dictionary.counts().get("the").copied(), Some(40));

        let bare = dir.path().join("words.gz");
        write_gzip(&bare, r#"{"dog": 7}"#);
        let dictionary = GzipDictionary::open(&bare).unwrap();
        assert_eq!(dictionary.counts().get("dog").copied(), Some(7));
    }

    #[test]
    fn not_gzip_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.json.gz");
        std::fs::write(&path, r#"{"dog": 7}"#).unwrap();

        assert!(matches!(
            GzipDictionary::open(&path).unwrap_err(),
            DictionaryError::Io(..)
        ));
    }
}
