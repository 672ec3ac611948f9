//! External data interfaces
//!
//! The planning core is agnostic to where attraction, centroid, and lodging
//! data come from; it only consumes the traits defined here. The in-memory
//! implementations back the demo binary and the test suite, and double as
//! reference adapters for integrators.

use std::collections::HashMap;

use crate::Result;
use crate::models::{Coordinates, Lodging, LodgingSuggestion, PointOfInterest, TripItinerary};
use crate::normalize::norm_key;

/// Read-only access to the attraction dataset
pub trait AttractionRepository {
    /// All attractions in the dataset
    fn get_all(&self) -> &[PointOfInterest];

    /// Attractions of one city (case/accent-insensitive match)
    fn get_by_city(&self, city: &str) -> Vec<&PointOfInterest>;

    /// Lookup a single attraction by its identity
    fn get_by_id(&self, id: &str) -> Option<&PointOfInterest>;

    /// Sorted canonical city labels present in the dataset
    fn cities(&self) -> Vec<String>;
}

/// Attraction repository backed by an owned vector
#[derive(Debug, Default)]
pub struct InMemoryAttractions {
    pois: Vec<PointOfInterest>,
}

impl InMemoryAttractions {
    /// Wrap an already-loaded dataset
    #[must_use]
    pub fn new(pois: Vec<PointOfInterest>) -> Self {
        Self { pois }
    }

    /// Load a dataset from its JSON representation (an array of records)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let pois: Vec<PointOfInterest> = serde_json::from_str(json)?;
        Ok(Self::new(pois))
    }

    /// Number of attractions loaded
    #[must_use]
    pub fn len(&self) -> usize {
        self.pois.len()
    }

    /// True when the dataset is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

impl AttractionRepository for InMemoryAttractions {
    fn get_all(&self) -> &[PointOfInterest] {
        &self.pois
    }

    fn get_by_city(&self, city: &str) -> Vec<&PointOfInterest> {
        let key = norm_key(city);
        self.pois
            .iter()
            .filter(|p| norm_key(&p.city) == key)
            .collect()
    }

    fn get_by_id(&self, id: &str) -> Option<&PointOfInterest> {
        self.pois.iter().find(|p| p.id == id)
    }

    fn cities(&self) -> Vec<String> {
        let mut seen: HashMap<String, String> = HashMap::new();
        for poi in &self.pois {
            seen.entry(norm_key(&poi.city))
                .or_insert_with(|| poi.city.clone());
        }
        let mut cities: Vec<String> = seen.into_values().collect();
        cities.sort();
        cities
    }
}

/// Lookup of a representative coordinate per city
pub trait CentroidProvider {
    /// Centroid of a city, or `None` when the city has no geocoded data
    fn centroid(&self, city: &str) -> Option<Coordinates>;
}

/// City centroids held in a map keyed by normalized city name
#[derive(Debug, Default)]
pub struct CityCentroids {
    centroids: HashMap<String, Coordinates>,
}

impl CityCentroids {
    /// Derive centroids by averaging the geocoded POIs of each city.
    ///
    /// Cities whose POIs carry no coordinates simply get no centroid; the
    /// distance helpers degrade those to 0 km.
    #[must_use]
    pub fn from_pois(pois: &[PointOfInterest]) -> Self {
        struct Bucket {
            n: u32,
            lat: f64,
            lon: f64,
        }

        let mut buckets: HashMap<String, Bucket> = HashMap::new();
        for poi in pois {
            let Some(coord) = poi.coordinates else {
                continue;
            };
            let bucket = buckets
                .entry(norm_key(&poi.city))
                .or_insert(Bucket {
                    n: 0,
                    lat: 0.0,
                    lon: 0.0,
                });
            bucket.n += 1;
            bucket.lat += coord.latitude;
            bucket.lon += coord.longitude;
        }

        let centroids = buckets
            .into_iter()
            .map(|(city, b)| {
                (
                    city,
                    Coordinates::new(b.lat / f64::from(b.n), b.lon / f64::from(b.n)),
                )
            })
            .collect();

        Self { centroids }
    }

    /// Insert or replace the centroid of a city
    pub fn insert(&mut self, city: &str, coord: Coordinates) {
        self.centroids.insert(norm_key(city), coord);
    }
}

impl CentroidProvider for CityCentroids {
    fn centroid(&self, city: &str) -> Option<Coordinates> {
        self.centroids.get(&norm_key(city)).copied()
    }
}

/// Read-only access to lodging data (optional collaborator)
pub trait LodgingRepository {
    /// Lodgings of one city (case/accent-insensitive match)
    fn get_by_city(&self, city: &str) -> Vec<&Lodging>;
}

/// Lodging repository backed by an owned vector
#[derive(Debug, Default)]
pub struct InMemoryLodging {
    lodgings: Vec<Lodging>,
}

impl InMemoryLodging {
    /// Wrap an already-loaded dataset
    #[must_use]
    pub fn new(lodgings: Vec<Lodging>) -> Self {
        Self { lodgings }
    }
}

impl LodgingRepository for InMemoryLodging {
    fn get_by_city(&self, city: &str) -> Vec<&Lodging> {
        let key = norm_key(city);
        self.lodgings
            .iter()
            .filter(|l| norm_key(&l.city) == key)
            .collect()
    }
}

/// Attach the top-N lodgings (by rating) to the first day of each city stay.
///
/// The night count on each suggestion equals the stay length, so a booking
/// made from the first day covers the whole visit. Cities without lodging
/// data are left without suggestions.
pub fn attach_lodging(
    itinerary: &mut TripItinerary,
    lodging: &dyn LodgingRepository,
    top_n: usize,
) {
    let mut index = 0;
    while index < itinerary.days.len() {
        let city = itinerary.days[index].city.clone();
        let mut stay_len = 1;
        while index + stay_len < itinerary.days.len()
            && itinerary.days[index + stay_len].city == city
        {
            stay_len += 1;
        }

        let mut options = lodging.get_by_city(&city);
        options.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .partial_cmp(&a.rating.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        itinerary.days[index].lodging = options
            .into_iter()
            .take(top_n)
            .map(|l| LodgingSuggestion {
                name: l.name.clone(),
                city: l.city.clone(),
                rating: l.rating,
                price_per_night: l.price_per_night,
                nights: stay_len as u32,
            })
            .collect();

        index += stay_len;
    }
}
