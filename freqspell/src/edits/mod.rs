//! Bounded edit-distance generation.
//!
//! A single edit is one deletion, one transposition of adjacent characters,
//! one substitution or one insertion, over the characters (Unicode scalar
//! values) of the word. Distance 2 is the composition of distance 1 with
//! itself; both go through [`for_each_edit1`] so they share one algorithm and
//! one alphabet.
//!
//! For a word of length `L` over an alphabet of size `A`, [`edits1`] has
//! `O(L·A)` members and [`edits2`] `O(L²·A²)`. Callers filtering against a
//! dictionary should compose through [`for_each_edit1`] rather than
//! materializing [`edits2`].
use hashbrown::HashSet;
use log::trace;
use smol_str::SmolStr;

pub mod alphabet;

pub use self::alphabet::Alphabet;

/// Calls `visit` once per single edit of `word`.
///
/// The same string may be visited more than once (e.g. a substitution with
/// the original character reproduces `word`).
pub fn for_each_edit1<F>(word: &str, alphabet: &Alphabet, mut visit: F)
where
    F: FnMut(&str),
{
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut buf = String::with_capacity(word.len() + 4);

    for i in 0..n {
        buf.clear();
        buf.extend(chars[..i].iter().chain(&chars[i + 1..]));
        visit(&buf);
    }

    for i in 0..n.saturating_sub(1) {
        buf.clear();
        buf.extend(&chars[..i]);
        buf.push(chars[i + 1]);
        buf.push(chars[i]);
        buf.extend(&chars[i + 2..]);
        visit(&buf);
    }

    for i in 0..n {
        for &letter in alphabet.letters() {
            buf.clear();
            buf.extend(&chars[..i]);
            buf.push(letter);
            buf.extend(&chars[i + 1..]);
            visit(&buf);
        }
    }

    for i in 0..=n {
        for &letter in alphabet.letters() {
            buf.clear();
            buf.extend(&chars[..i]);
            buf.push(letter);
            buf.extend(&chars[i..]);
            visit(&buf);
        }
    }
}

/// Every string one edit away from `word`.
pub fn edits1(word: &str, alphabet: &Alphabet) -> HashSet<SmolStr> {
    let mut out = HashSet::new();
    for_each_edit1(word, alphabet, |edit| {
        out.insert(SmolStr::new(edit));
    });
    trace!("{} edits at distance 1 from {:?}", out.len(), word);
    out
}

/// Every string two edits away from `word`: `edits1` applied to each member
/// of `edits1(word)`.
pub fn edits2(word: &str, alphabet: &Alphabet) -> HashSet<SmolStr> {
    let mut out = HashSet::new();
    for first in edits1(word, alphabet) {
        for_each_edit1(&first, alphabet, |edit| {
            if !out.contains(edit) {
                out.insert(SmolStr::new(edit));
            }
        });
    }
    trace!("{} edits at distance 2 from {:?}", out.len(), word);
    out
}
