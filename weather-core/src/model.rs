use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::condition::Condition;

/// Icon reported when the upstream payload carries no weather entry.
pub const DEFAULT_ICON: &str = "01d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// First entry of the upstream `weather` array.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCondition {
    pub main: String,
    pub icon: String,
}

/// One raw upstream measurement, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed_mps: f64,
    pub weather: Option<UpstreamCondition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub observation: Observation,
}

/// Normalized sample returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub condition: Condition,
    pub icon: String,
    pub timestamp: String,
}

impl WeatherSample {
    pub fn from_observation(observation: &Observation, timestamp: String) -> Self {
        let (condition, icon) = match &observation.weather {
            Some(w) => (Condition::from_upstream(&w.main), w.icon.clone()),
            None => (Condition::Cloudy, DEFAULT_ICON.to_string()),
        };

        Self {
            temperature: observation.temperature,
            humidity: observation.humidity,
            rainfall: observation.rainfall,
            wind_speed: mps_to_kmh(observation.wind_speed_mps),
            condition,
            icon,
            timestamp,
        }
    }

    /// Sample stamped with an RFC 3339 request time.
    pub fn current<Tz: TimeZone>(observation: &Observation, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::from_observation(observation, now.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn current_now(observation: &Observation) -> Self {
        Self::current(observation, &Local::now())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub location: String,
    pub current: WeatherSample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherHistory {
    pub location: String,
    pub history: Vec<WeatherSample>,
}

pub fn mps_to_kmh(speed_mps: f64) -> f64 {
    speed_mps * 3.6
}

/// Upstream rain volume, treating absent or non-positive values as no rain.
pub(crate) fn rainfall_or_zero(volume: Option<f64>) -> f64 {
    volume.filter(|v| *v > 0.0).unwrap_or(0.0)
}
