//! Text normalization utilities for city and category comparisons
//!
//! Every comparison of city names, category names, or POI names in the
//! planning core goes through [`norm_key`]. User-facing spellings differ in
//! case, accents, and spacing ("Málaga", "malaga", " MALAGA "), and comparing
//! raw strings at each call site is a recurring bug source.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove accents from a string ("Córdoba" → "Cordoba")
#[must_use]
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a string for comparison: lowercase, no accents, single spaces
#[must_use]
pub fn norm_key(s: &str) -> String {
    strip_accents(s)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether two city names refer to the same city
#[must_use]
pub fn cities_match(a: &str, b: &str) -> bool {
    let (ka, kb) = (norm_key(a), norm_key(b));
    !ka.is_empty() && ka == kb
}

/// Convert a name to title form ("jerez de la frontera" → "Jerez De La Frontera")
#[must_use]
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a user-typed city name to the canonical label used by the dataset.
///
/// Matching is exact (case/accent/space insensitive) first, then falls back
/// to a prefix match to absorb partial input like "sevil". Returns `None`
/// when nothing in the dataset resembles the input.
#[must_use]
pub fn canonicalize_city(user_city: &str, known_city_labels: &[String]) -> Option<String> {
    let key = norm_key(user_city);
    if key.is_empty() {
        return None;
    }

    for label in known_city_labels {
        if norm_key(label) == key {
            return Some(label.clone());
        }
    }

    // Gentle fallback: prefix match (helps with typos and partial input)
    for label in known_city_labels {
        if norm_key(label).starts_with(&key) {
            return Some(label.clone());
        }
    }

    None
}
