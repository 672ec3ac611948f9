//! `TripCraft` - Greedy multi-city travel itinerary planning
//!
//! This library turns a set of candidate attractions, a list of cities, and
//! a trip length into a concrete day-by-day itinerary: which attractions to
//! visit each day, how many days to spend per city, and in which order to
//! visit cities, optionally inserting extra cities along the route when they
//! add value for little extra travel.

pub mod allocator;
pub mod config;
pub mod constraints;
pub mod error;
pub mod geo;
pub mod models;
pub mod normalize;
pub mod packer;
pub mod planner;
pub mod repository;
pub mod route;
pub mod scoring;

// Re-export core types for public API
pub use config::PlannerConfig;
pub use error::TripCraftError;
pub use models::{
    CityDayPlan, Coordinates, Lodging, LodgingSuggestion, PointOfInterest, TripItinerary,
    UserConstraints,
};
pub use planner::{PlanRequest, TripPlanner};
pub use repository::{
    AttractionRepository, CentroidProvider, CityCentroids, InMemoryAttractions, InMemoryLodging,
    LodgingRepository,
};
pub use scoring::MustSeeTable;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripCraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
