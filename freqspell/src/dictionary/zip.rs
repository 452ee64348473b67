use ::zip::result::ZipError;
use ::zip::write::FileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use super::error::DictionaryError;
use super::meta::DictionaryMetadata;
use super::{sorted_counts, Counts, DictionarySource};
use crate::constants::{INDEX_ENTRY, WORDS_ENTRY};
use crate::frequency::WordFrequency;

/// A zip archive holding `words.json` and, optionally, `index.json`
/// metadata.
#[derive(Debug)]
pub struct ZipDictionary {
    metadata: Option<DictionaryMetadata>,
    counts: Counts,
}

#[cfg(feature = "compression")]
fn compression_method() -> CompressionMethod {
    CompressionMethod::Deflated
}

#[cfg(not(feature = "compression"))]
fn compression_method() -> CompressionMethod {
    CompressionMethod::Stored
}

impl DictionarySource for ZipDictionary {
    fn open(path: &Path) -> Result<ZipDictionary, DictionaryError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| DictionaryError::Zip(name.clone(), e))?;

        let counts = match archive.by_name(WORDS_ENTRY) {
            Ok(entry) => serde_json::from_reader(entry)
                .map_err(|e| DictionaryError::Json(format!("{}:{}", name, WORDS_ENTRY), e))?,
            Err(ZipError::FileNotFound) => {
                return Err(DictionaryError::MissingEntry {
                    path: name,
                    entry: WORDS_ENTRY,
                })
            }
            Err(e) => return Err(DictionaryError::Zip(name, e)),
        };

        let metadata = match archive.by_name(INDEX_ENTRY) {
            Ok(mut entry) => {
                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| DictionaryError::Io(format!("{}:{}", name, INDEX_ENTRY), e))?;
                let metadata = DictionaryMetadata::from_bytes(&bytes)
                    .map_err(|e| DictionaryError::Json(format!("{}:{}", name, INDEX_ENTRY), e))?;
                Some(metadata)
            }
            Err(ZipError::FileNotFound) => None,
            Err(e) => return Err(DictionaryError::Zip(name, e)),
        };

        Ok(ZipDictionary { metadata, counts })
    }

    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn metadata(&self) -> Option<&DictionaryMetadata> {
        self.metadata.as_ref()
    }
}

pub fn export_zip(
    model: &WordFrequency,
    metadata: Option<&DictionaryMetadata>,
    path: &Path,
) -> Result<(), DictionaryError> {
    let name = path.display().to_string();
    let zip_err = |e| DictionaryError::Zip(name.clone(), e);
    let json_err = |e| DictionaryError::Json(name.clone(), e);

    let file = File::create(path).map_err(|e| DictionaryError::Io(name.clone(), e))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(compression_method());

    writer.start_file(WORDS_ENTRY, options).map_err(zip_err)?;
    serde_json::to_writer(&mut writer, &sorted_counts(model)).map_err(json_err)?;

    if let Some(metadata) = metadata {
        writer.start_file(INDEX_ENTRY, options).map_err(zip_err)?;
        serde_json::to_writer_pretty(&mut writer, metadata).map_err(json_err)?;
    }

    writer.finish().map_err(zip_err)?;
    Ok(())
}
