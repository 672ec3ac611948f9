//! Greedy single-day POI packing
//!
//! Selects a bounded, non-repeating subset of candidate POIs for one
//! sightseeing day under time, budget, and category-diversity constraints.
//! Packing is a heuristic: it fills the day in ranked order and never
//! revisits a decision, trading optimality for determinism.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::PointOfInterest;
use crate::normalize::norm_key;
use crate::scoring::{MustSeeTable, priority_tier};

/// Per-day packing limits
#[derive(Debug, Clone)]
pub struct PackLimits {
    /// Sightseeing hours available
    pub hours_per_day: f64,
    /// Maximum admissions of one category
    pub max_same_category: usize,
    /// Maximum entrance-fee spend
    pub max_daily_budget: f64,
    /// Safety bound on admitted POIs
    pub max_pois_per_day: usize,
}

/// Result of packing one day
#[derive(Debug)]
pub struct PackedDay<'a> {
    /// Admitted POIs in visit order
    pub attractions: Vec<&'a PointOfInterest>,
    /// Hours consumed by the admitted POIs
    pub hours_used: f64,
}

/// Rank candidates for packing: priority tier descending, rating descending,
/// duration ascending.
///
/// The tier is the coarse must-see signal, not the full weighted score;
/// keeping it coarse makes the packing order easy to explain and stable
/// under small rating fluctuations. The sort is stable, so equal candidates
/// keep their input order.
#[must_use]
pub fn rank_candidates<'a>(
    pois: impl IntoIterator<Item = &'a PointOfInterest>,
    city: &str,
    must_see: &MustSeeTable,
) -> Vec<&'a PointOfInterest> {
    let mut ranked: Vec<(u8, &PointOfInterest)> = pois
        .into_iter()
        .map(|p| (priority_tier(p, city, must_see), p))
        .collect();

    ranked.sort_by(|(tier_a, a), (tier_b, b)| {
        tier_b
            .cmp(tier_a)
            .then_with(|| {
                b.rating_value()
                    .partial_cmp(&a.rating_value())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                a.visit_duration_hours
                    .partial_cmp(&b.visit_duration_hours)
                    .unwrap_or(Ordering::Equal)
            })
    });

    ranked.into_iter().map(|(_, poi)| poi).collect()
}

/// Pack one day from ranked candidates.
///
/// A POI is admitted when its identity is unused, its duration is positive
/// and fits the remaining hours, its fee fits the remaining budget, and its
/// category has not reached the per-day cap. Admitted identities are added
/// to `used`, which the caller keeps across all days of the same city.
///
/// Never fails: no eligible candidate simply yields an empty day.
pub fn pack_day<'a>(
    ranked: &[&'a PointOfInterest],
    limits: &PackLimits,
    used: &mut HashSet<String>,
) -> PackedDay<'a> {
    let mut attractions: Vec<&PointOfInterest> = Vec::new();
    let mut category_counts: HashMap<String, usize> = HashMap::new();
    let mut time_left = limits.hours_per_day;
    let mut total_cost = 0.0;

    for poi in ranked {
        if attractions.len() >= limits.max_pois_per_day {
            break;
        }
        if used.contains(&poi.id) {
            continue;
        }

        let duration = poi.visit_duration_hours;
        let fee = poi.entrance_fee_value;
        if duration <= 0.0 || duration > time_left {
            continue;
        }
        if total_cost + fee > limits.max_daily_budget {
            continue;
        }

        let category = norm_key(&poi.category);
        if limits.max_same_category > 0
            && category_counts.get(&category).copied().unwrap_or(0) >= limits.max_same_category
        {
            continue;
        }

        attractions.push(poi);
        used.insert(poi.id.clone());
        *category_counts.entry(category).or_insert(0) += 1;
        time_left -= duration;
        total_cost += fee;
    }

    PackedDay {
        attractions,
        hours_used: limits.hours_per_day - time_left,
    }
}
