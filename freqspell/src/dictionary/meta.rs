use serde::{Deserialize, Serialize};

/// Descriptive metadata stored next to the counts in a zip dictionary.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct DictionaryMetadata {
    pub locale: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

impl std::str::FromStr for DictionaryMetadata {
    type Err = serde_json::Error;

    fn from_str(string: &str) -> Result<DictionaryMetadata, serde_json::Error> {
        DictionaryMetadata::from_bytes(string.as_bytes())
    }
}

impl DictionaryMetadata {
    pub fn from_bytes(bytes: &[u8]) -> Result<DictionaryMetadata, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[test]
fn test_json_parse() {
    use std::str::FromStr;

    let json_data = r##"
        {
            "locale": "en",
            "title": "English word frequencies",
            "description": "Counts gathered from public domain books."
        }
    "##;

    let meta = DictionaryMetadata::from_str(json_data).unwrap();
    assert_eq!(meta.locale, "en");
    assert_eq!(meta.producer, None);
    assert!(DictionaryMetadata::from_str(r#"{"title": "no locale"}"#).is_err());
}
