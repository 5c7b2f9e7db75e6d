//! Name normalization for rank lookups and identity guesses.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase, trim, strip diacritics and collapse runs of whitespace,
/// so "Ludvig  Åberg" and "ludvig aberg" compare equal.
pub fn normalize_for_match(name: &str) -> String {
    let stripped: String = name.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Scheffler, Scottie" -> "Scottie Scheffler". None when the name has
/// no ", " separator.
pub fn swap_last_first(name: &str) -> Option<String> {
    let (last, first) = name.split_once(", ")?;
    if last.is_empty() {
        return None;
    }
    Some(format!("{first} {last}"))
}
