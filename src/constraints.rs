//! Free-text constraint parsing
//!
//! Extracts structured travel constraints from a user's special-request
//! text: required cities ("must see Granada"), excluded cities
//! ("avoid Marbella"), and per-city stay overrides ("spend 2 days in
//! Ronda"). Phrases that match no pattern are silently ignored; this is a
//! documented limitation of the pattern-based approach, not an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::title_case;
use crate::{Result, TripCraftError};

static MUST_SEE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"must see ([^,]+)").expect("valid must-see pattern"));
static AVOID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"avoid ([^,]+)").expect("valid avoid pattern"));
static STAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"spend (\d+) days? in ([^,]+)").expect("valid stay pattern"));

/// Constraints recovered from free-form request text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRequests {
    /// Cities that must appear in the route, in title form
    pub must_see_cities: Vec<String>,
    /// Cities excluded from routing, in title form
    pub avoid_cities: Vec<String>,
    /// Requested day counts per city, in title form
    pub stay_durations: Vec<(String, u32)>,
}

impl ParsedRequests {
    /// True when no constraint was recovered from the text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.must_see_cities.is_empty()
            && self.avoid_cities.is_empty()
            && self.stay_durations.is_empty()
    }
}

/// Parse special-request text into structured constraints.
///
/// Any stay duration that is not a positive integer fails the whole parse;
/// a request asking for "0 days" somewhere is contradictory and better
/// rejected than silently repaired.
pub fn parse(text: &str) -> Result<ParsedRequests> {
    let text = text.trim().to_lowercase();
    let mut result = ParsedRequests::default();
    if text.is_empty() {
        return Ok(result);
    }

    for capture in MUST_SEE_RE.captures_iter(&text) {
        result
            .must_see_cities
            .push(title_case(capture[1].trim()));
    }

    for capture in AVOID_RE.captures_iter(&text) {
        result.avoid_cities.push(title_case(capture[1].trim()));
    }

    for capture in STAY_RE.captures_iter(&text) {
        let days: u32 = capture[1].parse().map_err(|_| {
            TripCraftError::validation(format!(
                "stay duration '{}' is not a valid day count",
                &capture[1]
            ))
        })?;
        if days == 0 {
            return Err(TripCraftError::validation(format!(
                "stay duration for '{}' must be at least 1 day",
                title_case(capture[2].trim())
            )));
        }
        result
            .stay_durations
            .push((title_case(capture[2].trim()), days));
    }

    Ok(result)
}
