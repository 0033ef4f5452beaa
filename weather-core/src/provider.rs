use crate::{
    Config, WeatherError,
    model::{Coordinates, ForecastPoint, Observation},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Upstream weather capability. The server only talks to this trait, so tests
/// can swap in an in-memory implementation.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a city name to its first geocoding match.
    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, WeatherError>;

    /// Current conditions for a city name, metric units.
    async fn current_observation(&self, city: &str) -> Result<Observation, WeatherError>;

    /// Forecast samples (3-hourly) for a coordinate pair, in upstream order.
    async fn forecast(&self, coords: Coordinates) -> Result<Vec<ForecastPoint>, WeatherError>;
}

/// Trimmed city name, or `InvalidInput` when nothing is left.
pub fn validate_city(city: &str) -> Result<&str, WeatherError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidInput("city name cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    Ok(Arc::new(OpenWeatherProvider::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_city_trims_whitespace() {
        assert_eq!(validate_city("  New Delhi \n").unwrap(), "New Delhi");
    }

    #[test]
    fn validate_city_rejects_blank_names() {
        for city in ["", "   ", "\t\n"] {
            let err = validate_city(city).unwrap_err();
            assert!(matches!(err, WeatherError::InvalidInput(_)), "city {city:?}");
        }
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, WeatherError::Config(_)));
    }

    #[test]
    fn provider_from_config_works_when_key_present() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
