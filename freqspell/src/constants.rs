pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
/// Inputs longer than the longest known word by more than this many
/// characters cannot reach any known word within the edit tiers.
pub const LENGTH_SLACK: usize = 3;
pub const WORDS_ENTRY: &str = "words.json";
pub const INDEX_ENTRY: &str = "index.json";
