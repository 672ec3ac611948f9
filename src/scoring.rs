//! Weighted POI scoring
//!
//! Ranks attractions by a score that balances rating, review volume, and
//! landmark importance, so that a 4.5-star site with 10,000 reviews outranks
//! a 5.0-star venue with 30 reviews, and city-defining landmarks are never
//! crowded out by obscure high-rated spots.

use std::collections::HashMap;

use crate::models::PointOfInterest;
use crate::normalize::norm_key;

/// Score boost applied to a POI matching the must-see landmark table
pub const MUST_SEE_BONUS: f64 = 50.0;

/// Curated per-city landmark lookup.
///
/// Maps a city to name fragments of its iconic attractions; any POI whose
/// name contains a fragment (case/accent insensitive) is treated as a
/// must-see. The table is read-only reference data, injected into the
/// planner rather than consulted through global state.
#[derive(Debug, Clone)]
pub struct MustSeeTable {
    landmarks: HashMap<String, Vec<String>>,
}

impl MustSeeTable {
    /// Build a table from (city, fragments) pairs
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut landmarks = HashMap::new();
        for (city, fragments) in entries {
            let city: String = city.into();
            landmarks.insert(
                norm_key(&city),
                fragments.into_iter().map(Into::into).collect(),
            );
        }
        Self { landmarks }
    }

    /// An empty table; no POI gets the must-see bonus
    #[must_use]
    pub fn empty() -> Self {
        Self {
            landmarks: HashMap::new(),
        }
    }

    /// Check whether a POI name matches a must-see landmark of the city
    #[must_use]
    pub fn is_must_see(&self, poi_name: &str, city: &str) -> bool {
        let Some(fragments) = self.landmarks.get(&norm_key(city)) else {
            return false;
        };

        let name = norm_key(poi_name);
        fragments
            .iter()
            .any(|fragment| name.contains(&norm_key(fragment)))
    }

    /// Landmark fragments for a city, in table order
    #[must_use]
    pub fn city_landmarks(&self, city: &str) -> &[String] {
        match self.landmarks.get(&norm_key(city)) {
            Some(fragments) => fragments,
            None => &[],
        }
    }

    /// Landmarks of a city not covered by any POI in the given list
    #[must_use]
    pub fn missing_landmarks(&self, pois: &[&PointOfInterest], city: &str) -> Vec<String> {
        let Some(fragments) = self.landmarks.get(&norm_key(city)) else {
            return Vec::new();
        };

        let names: Vec<String> = pois.iter().map(|p| norm_key(&p.name)).collect();
        fragments
            .iter()
            .filter(|fragment| {
                let key = norm_key(fragment);
                !names.iter().any(|name| name.contains(&key))
            })
            .cloned()
            .collect()
    }
}

impl Default for MustSeeTable {
    /// The curated Andalusian landmark dataset
    fn default() -> Self {
        Self::new([
            (
                "Granada",
                vec![
                    "Alhambra",
                    "Generalife",
                    "Albaicín",
                    "Cathedral",
                    "Royal Chapel",
                    "Sacromonte",
                    "Mirador de San Nicolás",
                ],
            ),
            (
                "Seville",
                vec![
                    "Cathedral",
                    "Alcázar",
                    "Plaza de España",
                    "Torre del Oro",
                    "Metropol Parasol",
                    "Plaza de Toros",
                    "Barrio Santa Cruz",
                    "Maria Luisa Park",
                ],
            ),
            (
                "Córdoba",
                vec![
                    "Mezquita",
                    "Mosque-Cathedral",
                    "Jewish Quarter",
                    "Alcázar de los Reyes Cristianos",
                    "Roman Bridge",
                    "Medina Azahara",
                    "Palacio de Viana",
                ],
            ),
            (
                "Málaga",
                vec![
                    "Alcazaba",
                    "Gibralfaro Castle",
                    "Picasso Museum",
                    "Cathedral",
                    "Roman Theatre",
                    "Centre Pompidou",
                ],
            ),
            (
                "Cádiz",
                vec![
                    "Cathedral",
                    "Torre Tavira",
                    "Roman Theatre",
                    "Santa Catalina Castle",
                    "La Caleta Beach",
                    "Old Town",
                ],
            ),
            (
                "Ronda",
                vec![
                    "Puente Nuevo",
                    "Plaza de Toros",
                    "Old Town",
                    "Arab Baths",
                    "Mondragón Palace",
                    "Tajo Gorge",
                ],
            ),
            (
                "Jerez de la Frontera",
                vec!["Alcázar", "Cathedral", "Bodegas", "Old Town"],
            ),
            (
                "Marbella",
                vec!["Old Town", "Orange Square", "Puerto Banús"],
            ),
            ("Nerja", vec!["Nerja Caves", "Balcón de Europa"]),
            ("Antequera", vec!["Dolmens", "Alcazaba", "El Torcal"]),
            ("Tarifa", vec!["Old Town", "Castle", "Whale Watching"]),
        ])
    }
}

/// Weighted desirability score for a POI in a given city; higher is better.
///
/// base = rating × √review_count, plus a popularity bonus for high review
/// volumes, a must-see bonus for landmark-table matches, and an importance
/// bonus for high importance tiers. Missing rating/review data counts as 0.
#[must_use]
pub fn weighted_score(poi: &PointOfInterest, city: &str, must_see: &MustSeeTable) -> f64 {
    let rating = poi.rating_value();
    let reviews = poi.review_count_value();

    let base_score = rating * f64::from(reviews).sqrt();

    // Highest tier only, not cumulative
    let popularity_bonus = if reviews > 5000 {
        20.0
    } else if reviews > 1000 {
        10.0
    } else if reviews > 500 {
        5.0
    } else {
        0.0
    };

    let must_see_bonus = if must_see.is_must_see(&poi.name, city) {
        MUST_SEE_BONUS
    } else {
        0.0
    };

    let importance = poi.importance_value();
    let importance_bonus = if importance >= 9 {
        15.0
    } else if importance >= 7 {
        8.0
    } else if importance >= 5 {
        3.0
    } else {
        0.0
    };

    base_score + popularity_bonus + must_see_bonus + importance_bonus
}

/// Coarse priority tier for day packing.
///
/// Kept separate from [`weighted_score`] so the packer's ordering stays
/// deterministic and explainable: a POI either is a city-defining sight or
/// it is not.
#[must_use]
pub fn priority_tier(poi: &PointOfInterest, city: &str, must_see: &MustSeeTable) -> u8 {
    if poi.must_see || must_see.is_must_see(&poi.name, city) {
        3
    } else {
        0
    }
}

/// A POI paired with its computed weighted score
#[derive(Debug, Clone)]
pub struct ScoredPoi<'a> {
    pub poi: &'a PointOfInterest,
    pub score: f64,
}

/// Top-N POIs of a city by weighted score, after the quality gate.
///
/// The quality gate drops POIs that are too new or too poorly rated to
/// trust (`review_count < min_review_count` or `rating < min_rating`)
/// before ranking.
#[must_use]
pub fn top_pois<'a>(
    pois: &[&'a PointOfInterest],
    city: &str,
    must_see: &MustSeeTable,
    top_n: usize,
    min_review_count: u32,
    min_rating: f64,
) -> Vec<ScoredPoi<'a>> {
    let mut scored: Vec<ScoredPoi<'a>> = pois
        .iter()
        .filter(|p| p.review_count_value() >= min_review_count && p.rating_value() >= min_rating)
        .map(|p| ScoredPoi {
            poi: p,
            score: weighted_score(p, city, must_see),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);
    scored
}

/// Human-readable breakdown of a POI's weighted score
#[must_use]
pub fn explain_score(poi: &PointOfInterest, city: &str, must_see: &MustSeeTable) -> String {
    let score = weighted_score(poi, city, must_see);
    let rating = poi.rating_value();
    let reviews = poi.review_count_value();
    let importance = poi.importance_value();
    let base = rating * f64::from(reviews).sqrt();

    let mut explanation = format!("{}: {score:.1} points\n", poi.name);
    explanation += &format!("  Base (rating × √reviews): {rating} × √{reviews} = {base:.1}\n");

    if reviews > 5000 {
        explanation += &format!("  Popularity bonus: +20 (>{reviews} reviews)\n");
    } else if reviews > 1000 {
        explanation += &format!("  Popularity bonus: +10 (>{reviews} reviews)\n");
    } else if reviews > 500 {
        explanation += &format!("  Popularity bonus: +5 (>{reviews} reviews)\n");
    }

    if must_see.is_must_see(&poi.name, city) {
        explanation += "  Must-see bonus: +50 (iconic landmark)\n";
    }

    if importance >= 9 {
        explanation += &format!("  Importance bonus: +15 (tier {importance})\n");
    } else if importance >= 7 {
        explanation += &format!("  Importance bonus: +8 (tier {importance})\n");
    } else if importance >= 5 {
        explanation += &format!("  Importance bonus: +3 (tier {importance})\n");
    }

    explanation
}
