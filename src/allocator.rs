//! City day allocation
//!
//! Decides how many days each routed city receives and drives the day
//! packer to fill them. The output always contains exactly the requested
//! number of day plans: cities short on attractions produce empty days
//! rather than errors, and rounding artifacts are padded or truncated away
//! at the end.

use std::collections::HashSet;

use tracing::debug;

use crate::config::PlannerConfig;
use crate::geo;
use crate::models::{CityDayPlan, PointOfInterest, TripItinerary, UserConstraints};
use crate::normalize::norm_key;
use crate::packer::{self, PackLimits};
use crate::repository::{AttractionRepository, CentroidProvider};
use crate::scoring::MustSeeTable;
use crate::{Result, TripCraftError};

/// Filter a city's pool down to schedulable candidates.
///
/// Applies the rating floor, the allowed-category set (empty set means no
/// restriction), the per-day budget as an upper bound on a single fee, and
/// the positive-duration requirement.
pub fn eligible_pois<'a>(
    pois: &[&'a PointOfInterest],
    constraints: &UserConstraints,
) -> Vec<&'a PointOfInterest> {
    let allowed: HashSet<String> = constraints
        .allowed_categories
        .iter()
        .map(|c| norm_key(c))
        .collect();

    pois.iter()
        .copied()
        .filter(|p| {
            p.rating_value() >= constraints.min_rating
                && (allowed.is_empty() || allowed.contains(&norm_key(&p.category)))
                && p.entrance_fee_value <= constraints.max_daily_budget
                && p.visit_duration_hours > 0.0
        })
        .collect()
}

/// Assign a day count to every routed city.
///
/// Explicit stay overrides are taken as-is; the remaining days are spread
/// proportionally to each city's eligible POI count, or evenly (leftovers
/// round-robin from the first city) when no city has eligible POIs.
fn assign_city_days(
    cities: &[String],
    total_days: u32,
    constraints: &UserConstraints,
    eligible_counts: &[usize],
) -> Result<Vec<u32>> {
    let mut city_days: Vec<u32> = cities
        .iter()
        .map(|city| {
            constraints
                .stay_overrides
                .get(&norm_key(city))
                .copied()
                .unwrap_or(0)
        })
        .collect();

    let override_sum: u32 = city_days.iter().sum();
    if override_sum > total_days {
        return Err(TripCraftError::validation(format!(
            "stay overrides require {override_sum} days but the trip has only {total_days}"
        )));
    }

    let remaining = total_days - override_sum;
    if remaining == 0 {
        return Ok(city_days);
    }

    let total_pois: usize = eligible_counts.iter().sum();
    if total_pois > 0 {
        for (days, count) in city_days.iter_mut().zip(eligible_counts) {
            let proportion = *count as f64 / total_pois as f64;
            *days += (proportion * f64::from(remaining)).round() as u32;
        }
    } else {
        let per_city = remaining / cities.len() as u32;
        let leftover = remaining % cities.len() as u32;
        for (i, days) in city_days.iter_mut().enumerate() {
            *days += per_city;
            if (i as u32) < leftover {
                *days += 1;
            }
        }
    }

    Ok(city_days)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Build the full itinerary for an ordered city route.
///
/// For each city, the candidate pool is filtered and ranked once, and the
/// packer runs once per allocated day against a city-wide used set, so no
/// attraction repeats across that city's days. The driving distance to the
/// next city is attached to the last day of each stay.
pub fn allocate(
    ordered_cities: &[String],
    total_days: u32,
    constraints: &UserConstraints,
    repo: &dyn AttractionRepository,
    centroids: &dyn CentroidProvider,
    must_see: &MustSeeTable,
    config: &PlannerConfig,
) -> Result<TripItinerary> {
    if ordered_cities.is_empty() {
        return Err(TripCraftError::validation(
            "cannot allocate days without any cities",
        ));
    }

    let pools: Vec<Vec<&PointOfInterest>> = ordered_cities
        .iter()
        .map(|city| eligible_pois(&repo.get_by_city(city), constraints))
        .collect();
    let eligible_counts: Vec<usize> = pools.iter().map(Vec::len).collect();

    let city_days = assign_city_days(ordered_cities, total_days, constraints, &eligible_counts)?;
    debug!(?city_days, cities = ?ordered_cities, "assigned day counts");

    let road_factor = config.routing.road_factor;
    let limits = PackLimits {
        hours_per_day: constraints.hours_per_day,
        max_same_category: constraints.max_same_category_per_day,
        max_daily_budget: constraints.max_daily_budget,
        max_pois_per_day: config.packing.max_pois_per_day,
    };

    let mut days: Vec<CityDayPlan> = Vec::with_capacity(total_days as usize);
    for (i, city) in ordered_cities.iter().enumerate() {
        let days_for_city = city_days[i];
        if days_for_city == 0 {
            continue;
        }

        let ranked = packer::rank_candidates(pools[i].iter().copied(), city, must_see);
        let mut used: HashSet<String> = HashSet::new();

        let travel_km = if i < ordered_cities.len() - 1 {
            geo::road_distance_between(
                centroids.centroid(city),
                centroids.centroid(&ordered_cities[i + 1]),
                road_factor,
            )
        } else {
            0.0
        };

        for day_in_city in 0..days_for_city {
            let packed = packer::pack_day(&ranked, &limits, &mut used);
            let is_last_day_in_city = day_in_city == days_for_city - 1;
            days.push(CityDayPlan {
                day: days.len() as u32 + 1,
                city: city.clone(),
                attractions: packed.attractions.into_iter().cloned().collect(),
                total_hours: round_hours(packed.hours_used),
                travel_km: if is_last_day_in_city { travel_km } else { 0.0 },
                lodging: Vec::new(),
            });
        }
    }

    // Rounding can leave the plan short or long; the contract is an exact
    // day count, so pad against the last city or trim the tail.
    let anchor_city = &ordered_cities[ordered_cities.len() - 1];
    while (days.len() as u32) < total_days {
        days.push(CityDayPlan::empty(days.len() as u32 + 1, anchor_city));
    }
    days.truncate(total_days as usize);
    for (i, plan) in days.iter_mut().enumerate() {
        plan.day = i as u32 + 1;
    }

    let mut hop_kms: Vec<f64> = Vec::new();
    let mut total_km = 0.0;
    for pair in ordered_cities.windows(2) {
        let km = geo::road_distance_between(
            centroids.centroid(&pair[0]),
            centroids.centroid(&pair[1]),
            road_factor,
        );
        hop_kms.push(km);
        total_km += km;
    }

    Ok(TripItinerary {
        days,
        cities: ordered_cities.to_vec(),
        hop_kms,
        total_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::repository::{CityCentroids, InMemoryAttractions};
    use rstest::rstest;
    use std::collections::HashMap;

    fn poi(id: &str, city: &str, rating: f64, hours: f64, fee: f64, cat: &str) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: id.to_string(),
            city: city.to_string(),
            category: cat.to_string(),
            rating: Some(rating),
            review_count: Some(200),
            visit_duration_hours: hours,
            entrance_fee_value: fee,
            importance: None,
            must_see: false,
            coordinates: None,
        }
    }

    fn repo_with_counts(counts: &[(&str, usize)]) -> InMemoryAttractions {
        let mut pois = Vec::new();
        for (city, count) in counts {
            for i in 0..*count {
                pois.push(poi(
                    &format!("{city}-{i}"),
                    city,
                    4.0,
                    2.0,
                    0.0,
                    &format!("Cat{i}"),
                ));
            }
        }
        InMemoryAttractions::new(pois)
    }

    fn cities(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[rstest]
    #[case(&["A"], 1)]
    #[case(&["A"], 5)]
    #[case(&["A", "B"], 2)]
    #[case(&["A", "B", "C"], 6)]
    #[case(&["A", "B", "C"], 14)]
    fn test_exact_day_count(#[case] names: &[&str], #[case] total_days: u32) {
        let repo = repo_with_counts(&[("A", 4), ("B", 2), ("C", 3)]);
        let itinerary = allocate(
            &cities(names),
            total_days,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(itinerary.days.len(), total_days as usize);
        let numbers: Vec<u32> = itinerary.days.iter().map(|d| d.day).collect();
        assert_eq!(numbers, (1..=total_days).collect::<Vec<u32>>());
    }

    #[test]
    fn test_proportional_allocation_favors_poi_rich_cities() {
        // A: 10 eligible, B: 0, C: 5 over 6 days
        let repo = repo_with_counts(&[("A", 10), ("B", 0), ("C", 5)]);
        let itinerary = allocate(
            &cities(&["A", "B", "C"]),
            6,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        let count = |city: &str| itinerary.days.iter().filter(|d| d.city == city).count();
        assert!(count("A") > count("C"));
        assert_eq!(count("B"), 0);
        assert_eq!(itinerary.days.len(), 6);
    }

    #[test]
    fn test_even_split_when_no_city_has_pois() {
        let repo = repo_with_counts(&[("A", 0), ("B", 0), ("C", 0)]);
        let itinerary = allocate(
            &cities(&["A", "B", "C"]),
            7,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        let count = |city: &str| itinerary.days.iter().filter(|d| d.city == city).count();
        // 7 = 2 per city + 1 leftover, round-robin from the first city
        assert_eq!(count("A"), 3);
        assert_eq!(count("B"), 2);
        assert_eq!(count("C"), 2);
        assert!(itinerary.days.iter().all(|d| d.attractions.is_empty()));
    }

    #[test]
    fn test_overrides_exceeding_total_days_fail() {
        let repo = repo_with_counts(&[("A", 3), ("B", 3)]);
        let mut constraints = UserConstraints::default();
        constraints.stay_overrides.insert("a".to_string(), 4);
        constraints.stay_overrides.insert("b".to_string(), 4);

        let result = allocate(
            &cities(&["A", "B"]),
            5,
            &constraints,
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        );

        assert!(matches!(
            result,
            Err(TripCraftError::Validation { .. })
        ));
    }

    #[test]
    fn test_override_fixes_city_day_count() {
        let repo = repo_with_counts(&[("A", 6), ("B", 6)]);
        let mut constraints = UserConstraints::default();
        constraints.stay_overrides.insert("b".to_string(), 3);

        let itinerary = allocate(
            &cities(&["A", "B"]),
            5,
            &constraints,
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        let count = |city: &str| itinerary.days.iter().filter(|d| d.city == city).count();
        assert!(count("B") >= 3);
        assert_eq!(itinerary.days.len(), 5);
    }

    #[test]
    fn test_no_poi_repeats_within_city() {
        // 4 POIs, 3 days in one city: day 3 must not reuse anything
        let repo = repo_with_counts(&[("A", 4)]);
        let itinerary = allocate(
            &cities(&["A"]),
            3,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        let mut seen = HashSet::new();
        for day in &itinerary.days {
            for attraction in &day.attractions {
                assert!(
                    seen.insert(attraction.id.clone()),
                    "{} appears twice",
                    attraction.id
                );
            }
        }
    }

    #[test]
    fn test_packer_bounds_hold_for_every_day() {
        let mut pois = Vec::new();
        for i in 0..12 {
            pois.push(poi(
                &format!("a-{i}"),
                "A",
                4.5,
                1.5,
                12.0,
                if i % 2 == 0 { "Museum" } else { "Park" },
            ));
        }
        let repo = InMemoryAttractions::new(pois);
        let constraints = UserConstraints::default();

        let itinerary = allocate(
            &cities(&["A"]),
            3,
            &constraints,
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        for day in &itinerary.days {
            let hours: f64 = day.attractions.iter().map(|p| p.visit_duration_hours).sum();
            let spend: f64 = day.attractions.iter().map(|p| p.entrance_fee_value).sum();
            assert!(hours <= constraints.hours_per_day + 1e-9);
            assert!(spend <= constraints.max_daily_budget + 1e-9);

            let mut by_cat: HashMap<&str, usize> = HashMap::new();
            for p in &day.attractions {
                *by_cat.entry(p.category.as_str()).or_insert(0) += 1;
            }
            assert!(
                by_cat
                    .values()
                    .all(|&n| n <= constraints.max_same_category_per_day)
            );
        }
    }

    #[test]
    fn test_travel_km_on_last_city_day_only() {
        let repo = repo_with_counts(&[("A", 4), ("B", 4)]);
        let mut centroids = CityCentroids::default();
        centroids.insert("A", Coordinates::new(37.1773, -3.5986));
        centroids.insert("B", Coordinates::new(37.3891, -5.9845));

        let itinerary = allocate(
            &cities(&["A", "B"]),
            4,
            &UserConstraints::default(),
            &repo,
            &centroids,
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        let a_days: Vec<&CityDayPlan> =
            itinerary.days.iter().filter(|d| d.city == "A").collect();
        assert!(a_days.len() >= 2);
        for day in &a_days[..a_days.len() - 1] {
            assert_eq!(day.travel_km, 0.0);
        }
        assert!(a_days.last().unwrap().travel_km > 0.0);

        // Final city never carries a hop
        let b_days: Vec<&CityDayPlan> =
            itinerary.days.iter().filter(|d| d.city == "B").collect();
        assert!(b_days.iter().all(|d| d.travel_km == 0.0));

        assert_eq!(itinerary.hop_kms.len(), 1);
        assert!((itinerary.total_km - itinerary.hop_kms[0]).abs() < 1e-9);
    }

    #[test]
    fn test_missing_centroids_degrade_to_zero_distance() {
        let repo = repo_with_counts(&[("A", 2), ("B", 2)]);
        let itinerary = allocate(
            &cities(&["A", "B"]),
            2,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(itinerary.hop_kms, vec![0.0]);
        assert_eq!(itinerary.total_km, 0.0);
    }

    #[test]
    fn test_rounding_overshoot_is_truncated() {
        // Two cities with one POI each: each gets round(1.5) = 2 days, so 4
        // days are built for a 3-day trip and the tail is trimmed.
        let repo = repo_with_counts(&[("A", 1), ("B", 1)]);
        let itinerary = allocate(
            &cities(&["A", "B"]),
            3,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(itinerary.days.len(), 3);
    }

    #[test]
    fn test_category_filter_uses_normalization() {
        let pois = vec![
            poi("a", "A", 4.5, 2.0, 0.0, "Jardín"),
            poi("b", "A", 4.5, 2.0, 0.0, "Museum"),
        ];
        let repo = InMemoryAttractions::new(pois);
        let mut constraints = UserConstraints::default();
        constraints.allowed_categories = vec!["jardin".to_string()];

        let itinerary = allocate(
            &cities(&["A"]),
            1,
            &constraints,
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(itinerary.days[0].attractions.len(), 1);
        assert_eq!(itinerary.days[0].attractions[0].id, "a");
    }

    #[test]
    fn test_empty_city_list_is_rejected() {
        let repo = repo_with_counts(&[]);
        let result = allocate(
            &[],
            3,
            &UserConstraints::default(),
            &repo,
            &CityCentroids::default(),
            &MustSeeTable::empty(),
            &PlannerConfig::default(),
        );
        assert!(matches!(result, Err(TripCraftError::Validation { .. })));
    }
}
