//! Configuration management for the `TripCraft` planner
//!
//! Handles loading configuration from files and environment variables, and
//! provides validation for all configuration settings. The values here are
//! the tunable policy knobs of the planning heuristics; per-request inputs
//! live in [`crate::models::UserConstraints`].

use crate::TripCraftError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TripCraft` planner
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    /// Day packing limits
    #[serde(default)]
    pub packing: PackingConfig,
    /// Route composition parameters
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Scoring quality-gate thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Lodging suggestion settings
    #[serde(default)]
    pub lodging: LodgingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Day packing limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingConfig {
    /// Safety bound on admitted POIs within a single day
    #[serde(default = "default_max_pois_per_day")]
    pub max_pois_per_day: usize,
    /// Sightseeing hours per day used when a request does not specify one
    #[serde(default = "default_hours_per_day")]
    pub default_hours_per_day: f64,
}

/// Route composition parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Maximum accepted detour when inserting an en-route city, in km
    #[serde(default = "default_max_detour_km")]
    pub max_detour_km: f64,
    /// Multiplier converting great-circle distance to driving distance
    #[serde(default = "default_road_factor")]
    pub road_factor: f64,
}

/// Scoring quality-gate thresholds for top-N queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum review count before a POI is trusted for ranking
    #[serde(default = "default_min_review_count")]
    pub min_review_count: u32,
    /// Minimum rating before a POI is trusted for ranking
    #[serde(default = "default_min_quality_rating")]
    pub min_rating: f64,
    /// Number of POIs returned by top-N queries
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Lodging suggestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingConfig {
    /// Number of lodging suggestions attached per city stay
    #[serde(default = "default_lodging_top_n")]
    pub top_n: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_max_pois_per_day() -> usize {
    12
}

fn default_hours_per_day() -> f64 {
    8.0
}

fn default_max_detour_km() -> f64 {
    120.0
}

fn default_road_factor() -> f64 {
    1.3
}

fn default_min_review_count() -> u32 {
    10
}

fn default_min_quality_rating() -> f64 {
    3.5
}

fn default_top_n() -> usize {
    10
}

fn default_lodging_top_n() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            max_pois_per_day: default_max_pois_per_day(),
            default_hours_per_day: default_hours_per_day(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_detour_km: default_max_detour_km(),
            road_factor: default_road_factor(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_review_count: default_min_review_count(),
            min_rating: default_min_quality_rating(),
            top_n: default_top_n(),
        }
    }
}

impl Default for LodgingConfig {
    fn default() -> Self {
        Self {
            top_n: default_lodging_top_n(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRIPCRAFT_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TRIPCRAFT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcraft").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.packing.max_pois_per_day == 0 || self.packing.max_pois_per_day > 50 {
            return Err(
                TripCraftError::config("Max POIs per day must be between 1 and 50").into(),
            );
        }

        if self.packing.default_hours_per_day <= 0.0 || self.packing.default_hours_per_day > 24.0 {
            return Err(
                TripCraftError::config("Default hours per day must be between 0 and 24").into(),
            );
        }

        if self.routing.max_detour_km < 0.0 || self.routing.max_detour_km > 1000.0 {
            return Err(
                TripCraftError::config("Max detour cannot exceed 1000 km").into(),
            );
        }

        if self.routing.road_factor < 1.0 || self.routing.road_factor > 3.0 {
            return Err(
                TripCraftError::config("Road factor must be between 1.0 and 3.0").into(),
            );
        }

        if self.scoring.min_rating < 0.0 || self.scoring.min_rating > 5.0 {
            return Err(
                TripCraftError::config("Minimum rating must be on the 0-5 scale").into(),
            );
        }

        if self.scoring.top_n == 0 || self.scoring.top_n > 100 {
            return Err(
                TripCraftError::config("Top-N size must be between 1 and 100").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripCraftError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripCraftError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.packing.max_pois_per_day, 12);
        assert_eq!(config.packing.default_hours_per_day, 8.0);
        assert_eq!(config.routing.max_detour_km, 120.0);
        assert_eq!(config.routing.road_factor, 1.3);
        assert_eq!(config.scoring.min_review_count, 10);
        assert_eq!(config.scoring.min_rating, 3.5);
        assert_eq!(config.lodging.top_n, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = PlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = PlannerConfig::default();
        config.routing.road_factor = 0.5; // Invalid - below straight-line
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Road factor"));

        let mut config = PlannerConfig::default();
        config.packing.max_pois_per_day = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = PlannerConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("tripcraft"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
