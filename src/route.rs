//! Route composition
//!
//! Orders the cities of a trip and greedily inserts extra en-route cities
//! while the day budget allows it. An insertion candidate is judged by how
//! many attractions it offers against how far it pulls the route off course
//! (its detour cost); candidates beyond the configured detour bound are
//! never inserted.

use std::collections::HashMap;

use tracing::debug;

use crate::config::PlannerConfig;
use crate::geo;
use crate::models::UserConstraints;
use crate::normalize::{cities_match, norm_key};
use crate::repository::CentroidProvider;
use crate::{Result, TripCraftError};

/// An ordered city route plus the stay overrides accumulated while
/// composing it (inserted cities are pinned to 1 day)
#[derive(Debug, Clone)]
pub struct ComposedRoute {
    /// Cities in visit order
    pub cities: Vec<String>,
    /// Day-count overrides keyed by normalized city name
    pub stay_overrides: HashMap<String, u32>,
}

/// Compose the city route for a trip.
///
/// The seed is the start city, the end city when it differs from the start,
/// and any must-see cities (inserted before the end). While the allocated
/// days (one per seed city unless overridden) fall short of the trip length,
/// the candidate with the best poi-count/detour score is inserted at its
/// best position.
///
/// Ties are broken deterministically: candidates are examined in sorted
/// name order and positions front to back, and only a strictly better score
/// displaces the incumbent, so the first-found pair wins. Routes are
/// therefore reproducible for identical inputs.
pub fn compose(
    start_city: &str,
    end_city: Option<&str>,
    total_days: u32,
    constraints: &UserConstraints,
    centroids: &dyn CentroidProvider,
    poi_counts: &HashMap<String, usize>,
    config: &PlannerConfig,
) -> Result<ComposedRoute> {
    if start_city.trim().is_empty() {
        return Err(TripCraftError::validation("start city must not be empty"));
    }

    let mut cities: Vec<String> = vec![start_city.to_string()];
    if let Some(end) = end_city {
        if !cities_match(end, start_city) {
            cities.push(end.to_string());
        }
    }

    for must_see in &constraints.must_see_cities {
        if cities.iter().any(|c| cities_match(c, must_see)) {
            continue;
        }
        if cities.len() >= 2 {
            let end_position = cities.len() - 1;
            cities.insert(end_position, must_see.clone());
        } else {
            cities.push(must_see.clone());
        }
    }

    let mut stay_overrides = constraints.stay_overrides.clone();
    let mut allocated_days: u32 = cities
        .iter()
        .map(|c| stay_overrides.get(&norm_key(c)).copied().unwrap_or(1))
        .sum();

    // Candidate pool: cities with attractions, not yet routed, not avoided.
    // Sorted by name so the insertion order is stable.
    let mut candidates: Vec<(String, usize)> = poi_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .filter(|(city, _)| !cities.iter().any(|c| cities_match(c, city)))
        .filter(|(city, _)| {
            !constraints
                .avoid_cities
                .iter()
                .any(|avoided| cities_match(avoided, city))
        })
        .map(|(city, count)| (city.clone(), *count))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let road_factor = config.routing.road_factor;
    let max_detour = config.routing.max_detour_km;

    while allocated_days < total_days && !candidates.is_empty() {
        let mut best: Option<(usize, usize, f64)> = None;

        for (candidate_index, (candidate, poi_count)) in candidates.iter().enumerate() {
            let candidate_coord = centroids.centroid(candidate);
            for position in 1..cities.len() {
                let prev_coord = centroids.centroid(&cities[position - 1]);
                let next_coord = centroids.centroid(&cities[position]);

                let detour = geo::road_distance_between(prev_coord, candidate_coord, road_factor)
                    + geo::road_distance_between(candidate_coord, next_coord, road_factor)
                    - geo::road_distance_between(prev_coord, next_coord, road_factor);
                if detour > max_detour {
                    continue;
                }

                let score = *poi_count as f64 / (1.0 + detour / 10.0);
                if best.is_none_or(|(_, _, best_score)| score > best_score) {
                    best = Some((candidate_index, position, score));
                }
            }
        }

        let Some((candidate_index, position, score)) = best else {
            break;
        };

        let (city, _) = candidates.remove(candidate_index);
        debug!(%city, position, score, "inserting en-route city");
        cities.insert(position, city.clone());
        stay_overrides.insert(norm_key(&city), 1);
        allocated_days += 1;
    }

    Ok(ComposedRoute {
        cities,
        stay_overrides,
    })
}
