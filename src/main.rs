use std::{env, fs};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripcraft::{
    AttractionRepository, CityCentroids, InMemoryAttractions, PlanRequest, PlannerConfig,
    TripPlanner,
};

fn parse_start_end(text: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = text
        .split(" to ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [start, end] => ((*start).to_string(), Some((*end).to_string())),
        _ => (text.trim().to_string(), None),
    }
}

fn main() -> Result<()> {
    let config = PlannerConfig::load().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let dataset_path = args.get(1).cloned().unwrap_or_else(|| "attractions.json".to_string());
    let route_text = args.get(2).cloned().unwrap_or_else(|| "Malaga to Seville".to_string());
    let total_days: u32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(7);
    let special_requests = args.get(4).cloned().unwrap_or_default();

    let json = fs::read_to_string(&dataset_path)
        .with_context(|| format!("Failed to read dataset: {dataset_path}"))?;
    let repo = InMemoryAttractions::from_json_str(&json)
        .with_context(|| format!("Failed to parse dataset: {dataset_path}"))?;
    let centroids = CityCentroids::from_pois(repo.get_all());

    println!(
        "Loaded {} attractions across {} cities",
        repo.len(),
        repo.cities().len()
    );

    let planner = TripPlanner::new(repo, centroids).with_config(config);

    let (start_city, end_city) = parse_start_end(&route_text);
    let mut request = PlanRequest::new(&start_city, end_city.as_deref(), total_days);
    request.special_requests = special_requests;

    let itinerary = planner.plan(&request).context("Planning failed")?;

    println!("\nRoute: {}", itinerary.cities.join(" -> "));
    println!("Total driving: {:.0} km", itinerary.total_km);

    for day in &itinerary.days {
        println!("\nDay {}: {}", day.day, day.city);
        if day.attractions.is_empty() {
            println!("  (free day)");
        }
        for attraction in &day.attractions {
            println!(
                "  - {} ({:.1}h, {:.0} entry)",
                attraction.name, attraction.visit_duration_hours, attraction.entrance_fee_value
            );
        }
        if day.travel_km > 0.0 {
            println!("  Drive on to the next city: {:.0} km", day.travel_km);
        }
    }

    if let Some(first_city) = itinerary.cities.first() {
        println!("\nTop attractions in {first_city}:");
        for scored in planner.top_attractions(first_city).iter().take(5) {
            println!("  {:.1}  {}", scored.score, scored.poi.name);
        }
    }

    Ok(())
}
