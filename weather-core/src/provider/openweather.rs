use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    Config, WeatherError,
    model::{Coordinates, ForecastPoint, Observation, UpstreamCondition, rainfall_or_zero},
    provider::validate_city,
};

use super::WeatherProvider;

const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    weather_url: String,
    geo_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key.to_owned(), config.request_timeout())?
            .with_base_urls(&config.weather_base_url, &config.geocoding_base_url))
    }

    /// Point the provider at different upstream hosts (e.g. a mock server).
    pub fn with_base_urls(mut self, weather_url: &str, geo_url: &str) -> Self {
        self.weather_url = weather_url.trim_end_matches('/').to_string();
        self.geo_url = geo_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, WeatherError> {
        tracing::debug!(url, what, "Requesting OpenWeather");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(what, error = %e, "OpenWeather request failed");
                WeatherError::upstream(format!("failed to fetch {what}: {e}"))
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::upstream(format!("failed to read {what} response: {e}")))?;

        if !status.is_success() {
            tracing::warn!(what, status = status.as_u16(), "OpenWeather returned an error status");
            return Err(WeatherError::upstream(format!(
                "{what} API error (status {}): {}",
                status.as_u16(),
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::upstream(format!("failed to decode {what} response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocodeEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn observation(
    main: &OwMain,
    weather: &[OwWeather],
    wind: &OwWind,
    rain: Option<f64>,
) -> Observation {
    Observation {
        temperature: main.temp,
        humidity: main.humidity,
        rainfall: rainfall_or_zero(rain),
        wind_speed_mps: wind.speed,
        weather: weather.first().map(|w| UpstreamCondition {
            main: w.main.clone(),
            icon: w.icon.clone(),
        }),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let city = validate_city(city)?;
        let url = format!("{}/direct", self.geo_url);

        let matches: Vec<OwGeocodeEntry> =
            self.get_json(&url, &[("q", city), ("limit", "1")], "geocoding").await?;

        let first = matches.first().ok_or_else(|| {
            WeatherError::NotFound(format!("city '{city}' not found in geocoding API"))
        })?;

        tracing::debug!(city, lat = first.lat, lon = first.lon, "Resolved coordinates");
        Ok(Coordinates { lat: first.lat, lon: first.lon })
    }

    async fn current_observation(&self, city: &str) -> Result<Observation, WeatherError> {
        let url = format!("{}/weather", self.weather_url);

        let parsed: OwCurrentResponse = self
            .get_json(&url, &[("q", city), ("units", "metric")], "current weather")
            .await?;

        let rain = parsed.rain.as_ref().and_then(|r| r.one_hour);
        Ok(observation(&parsed.main, &parsed.weather, &parsed.wind, rain))
    }

    async fn forecast(&self, coords: Coordinates) -> Result<Vec<ForecastPoint>, WeatherError> {
        let url = format!("{}/forecast", self.weather_url);
        let lat = format!("{:.4}", coords.lat);
        let lon = format!("{:.4}", coords.lon);

        let parsed: OwForecastResponse = self
            .get_json(
                &url,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
                "forecast",
            )
            .await?;

        parsed
            .list
            .iter()
            .map(|entry| -> Result<ForecastPoint, WeatherError> {
                let timestamp = unix_to_utc(entry.dt).ok_or_else(|| {
                    WeatherError::upstream(format!("forecast timestamp {} out of range", entry.dt))
                })?;
                let rain = entry.rain.as_ref().and_then(|r| r.three_hours);

                Ok(ForecastPoint {
                    timestamp,
                    observation: observation(&entry.main, &entry.weather, &entry.wind, rain),
                })
            })
            .collect()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
