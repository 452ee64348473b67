use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::error::DictionaryError;
use super::meta::DictionaryMetadata;
use super::{sorted_counts, Counts, DictionarySource};
use crate::frequency::WordFrequency;

/// A JSON object mapping words to counts: `{"the": 23135851162, ...}`.
#[derive(Debug)]
pub struct JsonDictionary {
    counts: Counts,
}

impl DictionarySource for JsonDictionary {
    fn open(path: &Path) -> Result<JsonDictionary, DictionaryError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;
        let counts = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DictionaryError::Json(name, e))?;

        Ok(JsonDictionary { counts })
    }

    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn metadata(&self) -> Option<&DictionaryMetadata> {
        None
    }
}

pub fn export_json(model: &WordFrequency, path: &Path) -> Result<(), DictionaryError> {
    let name = path.display().to_string();
    let file = File::create(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, &sorted_counts(model))
        .map_err(|e| DictionaryError::Json(name.clone(), e))?;
    writer.flush().map_err(|e| DictionaryError::Io(name, e))
}
