//! Data models for the itinerary planning core
//!
//! This module contains the data structures exchanged between the planning
//! components: the attraction records owned by the repository, the user
//! constraints driving a request, and the day-plan/itinerary output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Location coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A visitable attraction, owned by the attraction repository.
///
/// Records are immutable once loaded; the planner borrows them and only
/// clones the admitted ones into the final itinerary.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PointOfInterest {
    /// Stable identity within the dataset
    pub id: String,
    /// Display name
    pub name: String,
    /// City this attraction belongs to
    pub city: String,
    /// Category label ("Museum", "Historic Site", ...)
    #[serde(default = "default_category")]
    pub category: String,
    /// Rating on a 0-5 scale, when known
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews behind the rating
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Typical visit length in hours; must be positive to be schedulable
    #[serde(default = "default_visit_duration")]
    pub visit_duration_hours: f64,
    /// Entrance fee in the dataset currency, 0 for free entry
    #[serde(default)]
    pub entrance_fee_value: f64,
    /// Importance tier (0-10) assigned by the dataset, when known
    #[serde(default)]
    pub importance: Option<u8>,
    /// Flags a city-defining attraction that packing should prioritize
    #[serde(default)]
    pub must_see: bool,
    /// Geographic position, when geocoded
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

fn default_category() -> String {
    "Other".to_string()
}

fn default_visit_duration() -> f64 {
    2.0
}

impl PointOfInterest {
    /// Rating with missing values treated as 0
    #[must_use]
    pub fn rating_value(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Review count with missing values treated as 0
    #[must_use]
    pub fn review_count_value(&self) -> u32 {
        self.review_count.unwrap_or(0)
    }

    /// Importance tier with missing values treated as 0
    #[must_use]
    pub fn importance_value(&self) -> u8 {
        self.importance.unwrap_or(0)
    }
}

/// Structured travel constraints for one planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConstraints {
    /// Sightseeing hours available per day
    pub hours_per_day: f64,
    /// Minimum POI rating to consider (0 disables the filter)
    pub min_rating: f64,
    /// Allowed category labels; empty means no restriction
    pub allowed_categories: Vec<String>,
    /// Maximum admissions of one category within a single day
    pub max_same_category_per_day: usize,
    /// Maximum entrance-fee spend within a single day
    pub max_daily_budget: f64,
    /// Explicit day counts per city (normalized city key → days)
    pub stay_overrides: HashMap<String, u32>,
    /// Cities that must appear in the route
    pub must_see_cities: Vec<String>,
    /// Cities excluded from routing and packing
    pub avoid_cities: Vec<String>,
}

impl Default for UserConstraints {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            min_rating: 0.0,
            allowed_categories: Vec::new(),
            max_same_category_per_day: 2,
            max_daily_budget: 50.0,
            stay_overrides: HashMap::new(),
            must_see_cities: Vec::new(),
            avoid_cities: Vec::new(),
        }
    }
}

/// One planned sightseeing day in one city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDayPlan {
    /// 1-based day number within the trip
    pub day: u32,
    /// City visited on this day
    pub city: String,
    /// Admitted attractions in visit order
    pub attractions: Vec<PointOfInterest>,
    /// Hours consumed by the admitted attractions
    pub total_hours: f64,
    /// Driving distance to the next city; nonzero only on a city's last day
    pub travel_km: f64,
    /// Lodging suggestions, attached on the first day of each city stay
    pub lodging: Vec<LodgingSuggestion>,
}

impl CityDayPlan {
    /// An empty day anchored to a city (valid output for a POI-less city)
    #[must_use]
    pub fn empty(day: u32, city: &str) -> Self {
        Self {
            day,
            city: city.to_string(),
            attractions: Vec::new(),
            total_hours: 0.0,
            travel_km: 0.0,
            lodging: Vec::new(),
        }
    }
}

/// Complete day-by-day itinerary for one planning request.
///
/// Constructed once per request and treated as immutable output. The number
/// of day plans always equals the requested trip length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripItinerary {
    /// Exactly one entry per requested trip day
    pub days: Vec<CityDayPlan>,
    /// Final ordered city sequence
    pub cities: Vec<String>,
    /// Driving distance for each consecutive city pair
    pub hop_kms: Vec<f64>,
    /// Sum of all hops
    pub total_km: f64,
}

impl TripItinerary {
    /// Cities actually visited (with at least one day plan), in order
    #[must_use]
    pub fn visited_cities(&self) -> Vec<&str> {
        let mut visited: Vec<&str> = Vec::new();
        for plan in &self.days {
            if visited.last() != Some(&plan.city.as_str()) {
                visited.push(&plan.city);
            }
        }
        visited
    }
}

/// A lodging option attached to a day plan by the lodging collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingSuggestion {
    /// Display name
    pub name: String,
    /// City the lodging is in
    pub city: String,
    /// Guest rating, when known
    pub rating: Option<f64>,
    /// Average price per night, when known
    pub price_per_night: Option<f64>,
    /// Number of nights for this stay
    pub nights: u32,
}

/// A lodging record as stored by the lodging repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lodging {
    /// Display name
    pub name: String,
    /// City the lodging is in
    pub city: String,
    /// Guest rating, when known
    #[serde(default)]
    pub rating: Option<f64>,
    /// Average price per night, when known
    #[serde(default)]
    pub price_per_night: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_defaults_from_sparse_record() {
        let json = r#"{
            "id": "alhambra",
            "name": "Alhambra",
            "city": "Granada"
        }"#;

        let poi: PointOfInterest = serde_json::from_str(json).unwrap();
        assert_eq!(poi.category, "Other");
        assert_eq!(poi.visit_duration_hours, 2.0);
        assert_eq!(poi.rating_value(), 0.0);
        assert_eq!(poi.review_count_value(), 0);
        assert!(!poi.must_see);
        assert!(poi.coordinates.is_none());
    }

    #[test]
    fn test_poi_full_record() {
        let json = r#"{
            "id": "alhambra",
            "name": "Alhambra",
            "city": "Granada",
            "category": "Historic Site",
            "rating": 4.8,
            "review_count": 150000,
            "visit_duration_hours": 3.5,
            "entrance_fee_value": 19.0,
            "importance": 10,
            "must_see": true,
            "coordinates": { "latitude": 37.1761, "longitude": -3.5881 }
        }"#;

        let poi: PointOfInterest = serde_json::from_str(json).unwrap();
        assert_eq!(poi.rating_value(), 4.8);
        assert_eq!(poi.review_count_value(), 150_000);
        assert_eq!(poi.importance_value(), 10);
        assert!(poi.must_see);
    }

    #[test]
    fn test_default_constraints() {
        let constraints = UserConstraints::default();
        assert_eq!(constraints.hours_per_day, 8.0);
        assert_eq!(constraints.max_same_category_per_day, 2);
        assert_eq!(constraints.max_daily_budget, 50.0);
        assert!(constraints.allowed_categories.is_empty());
        assert!(constraints.stay_overrides.is_empty());
    }

    #[test]
    fn test_visited_cities_collapses_consecutive_days() {
        let itinerary = TripItinerary {
            days: vec![
                CityDayPlan::empty(1, "Granada"),
                CityDayPlan::empty(2, "Granada"),
                CityDayPlan::empty(3, "Ronda"),
            ],
            cities: vec!["Granada".to_string(), "Ronda".to_string()],
            hop_kms: vec![120.0],
            total_km: 120.0,
        };

        assert_eq!(itinerary.visited_cities(), vec!["Granada", "Ronda"]);
    }

    #[test]
    fn test_coordinates_format() {
        let coord = Coordinates::new(37.1761, -3.5881);
        assert_eq!(coord.format_coordinates(), "37.1761, -3.5881");
    }
}
