//! Error types for loading and exporting dictionaries.

use crate::frequency::FrequencyError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DictionaryError {
    /// Reading or writing a dictionary file failed
    #[error("IO error for {0}: {1}")]
    Io(String, #[source] std::io::Error),

    /// The dictionary is not a JSON object of word counts
    #[error("Invalid JSON in {0}: {1}")]
    Json(String, #[source] serde_json::Error),

    /// The zip container could not be read or written
    #[error("Zip error in {0}: {1}")]
    Zip(String, #[source] zip::result::ZipError),

    /// A required entry is missing from an archive
    #[error("Missing {entry} in {path}")]
    MissingEntry { path: String, entry: &'static str },

    /// A count list line has an unparseable count
    #[error("Bad count on line {line} of {path}: {text:?}")]
    BadCountLine {
        path: String,
        line: usize,
        text: String,
    },

    /// The file extension does not name a known format
    #[error("Unsupported dictionary format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Frequency(#[from] FrequencyError),
}
