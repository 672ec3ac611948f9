//! Trip planning pipeline
//!
//! `TripPlanner` wires the planning stages together: parse the free-text
//! requests, compose the city route, allocate days, pack each day, and
//! optionally attach lodging suggestions. One call produces one immutable
//! [`TripItinerary`]; the planner holds only read-only reference data and
//! can serve any number of requests.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::allocator;
use crate::config::PlannerConfig;
use crate::constraints;
use crate::models::{TripItinerary, UserConstraints};
use crate::normalize::{canonicalize_city, norm_key};
use crate::repository::{
    AttractionRepository, CentroidProvider, LodgingRepository, attach_lodging,
};
use crate::route;
use crate::scoring::{self, MustSeeTable, ScoredPoi};
use crate::{Result, TripCraftError};

/// One planning request
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Where the trip starts
    pub start_city: String,
    /// Where the trip ends; `None` or the start city itself keeps the route
    /// anchored to a single endpoint
    pub end_city: Option<String>,
    /// Trip length in days
    pub total_days: u32,
    /// Structured preferences
    pub constraints: UserConstraints,
    /// Free-text special requests ("must see X, avoid Y, spend N days in Z")
    pub special_requests: String,
}

impl PlanRequest {
    /// A request with default preferences
    #[must_use]
    pub fn new(start_city: &str, end_city: Option<&str>, total_days: u32) -> Self {
        Self {
            start_city: start_city.to_string(),
            end_city: end_city.map(ToString::to_string),
            total_days,
            constraints: UserConstraints::default(),
            special_requests: String::new(),
        }
    }
}

/// The planning pipeline over injected reference data
pub struct TripPlanner<R, C> {
    repo: R,
    centroids: C,
    must_see: MustSeeTable,
    config: PlannerConfig,
}

impl<R, C> TripPlanner<R, C>
where
    R: AttractionRepository,
    C: CentroidProvider,
{
    /// Create a planner with the default landmark table and configuration
    #[must_use]
    pub fn new(repo: R, centroids: C) -> Self {
        Self {
            repo,
            centroids,
            must_see: MustSeeTable::default(),
            config: PlannerConfig::default(),
        }
    }

    /// Replace the planner configuration
    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the must-see landmark table
    #[must_use]
    pub fn with_must_see_table(mut self, table: MustSeeTable) -> Self {
        self.must_see = table;
        self
    }

    /// Access the underlying attraction repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Plan a trip.
    ///
    /// Fails only on invalid configuration: zero trip length, unknown
    /// start/end city, stay overrides that exceed the trip length, or an
    /// invalid stay value in the special requests. Missing data (a city
    /// without eligible POIs, a missing centroid) degrades to empty days
    /// and zero distances instead.
    pub fn plan(&self, request: &PlanRequest) -> Result<TripItinerary> {
        if request.total_days == 0 {
            return Err(TripCraftError::validation("trip length must be at least 1 day"));
        }

        let known_cities = self.repo.cities();

        let start_city = canonicalize_city(&request.start_city, &known_cities).ok_or_else(|| {
            TripCraftError::validation(format!(
                "start city '{}' not found in the dataset",
                request.start_city
            ))
        })?;

        let end_city = match &request.end_city {
            Some(end) => Some(canonicalize_city(end, &known_cities).ok_or_else(|| {
                TripCraftError::validation(format!("end city '{end}' not found in the dataset"))
            })?),
            None => None,
        };

        info!(
            start = %start_city,
            end = end_city.as_deref().unwrap_or("-"),
            days = request.total_days,
            "planning trip"
        );

        let parsed = constraints::parse(&request.special_requests)?;
        debug!(?parsed, "parsed special requests");

        let mut merged = request.constraints.clone();
        if merged.hours_per_day <= 0.0 {
            merged.hours_per_day = self.config.packing.default_hours_per_day;
        }
        for city in &parsed.must_see_cities {
            let resolved = canonicalize_city(city, &known_cities).unwrap_or_else(|| city.clone());
            merged.must_see_cities.push(resolved);
        }
        for city in &parsed.avoid_cities {
            let resolved = canonicalize_city(city, &known_cities).unwrap_or_else(|| city.clone());
            merged.avoid_cities.push(resolved);
        }
        for (city, days) in &parsed.stay_durations {
            let resolved = canonicalize_city(city, &known_cities).unwrap_or_else(|| city.clone());
            merged.stay_overrides.insert(norm_key(&resolved), *days);
        }

        let poi_counts: HashMap<String, usize> = known_cities
            .iter()
            .map(|city| (city.clone(), self.repo.get_by_city(city).len()))
            .filter(|(_, count)| *count > 0)
            .collect();

        let composed = route::compose(
            &start_city,
            end_city.as_deref(),
            request.total_days,
            &merged,
            &self.centroids,
            &poi_counts,
            &self.config,
        )?;
        debug!(route = ?composed.cities, "composed route");

        merged.stay_overrides = composed.stay_overrides.clone();

        let itinerary = allocator::allocate(
            &composed.cities,
            request.total_days,
            &merged,
            &self.repo,
            &self.centroids,
            &self.must_see,
            &self.config,
        )?;

        info!(
            days = itinerary.days.len(),
            cities = itinerary.cities.len(),
            total_km = itinerary.total_km,
            "itinerary complete"
        );
        Ok(itinerary)
    }

    /// Plan a trip and attach lodging suggestions from the given repository
    pub fn plan_with_lodging(
        &self,
        request: &PlanRequest,
        lodging: &dyn LodgingRepository,
    ) -> Result<TripItinerary> {
        let mut itinerary = self.plan(request)?;
        attach_lodging(&mut itinerary, lodging, self.config.lodging.top_n);
        Ok(itinerary)
    }

    /// Top attractions of a city by weighted score, behind the quality gate
    #[must_use]
    pub fn top_attractions(&self, city: &str) -> Vec<ScoredPoi<'_>> {
        let pois = self.repo.get_by_city(city);
        scoring::top_pois(
            &pois,
            city,
            &self.must_see,
            self.config.scoring.top_n,
            self.config.scoring.min_review_count,
            self.config.scoring.min_rating,
        )
    }
}
