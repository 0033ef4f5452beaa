//! Core library for the weather proxy service.
//!
//! This crate defines:
//! - Configuration loading (TOML file + environment overrides)
//! - Abstraction over the upstream weather provider
//! - Condition normalization and the synthesized 7-day history
//! - Shared domain models (observations, samples, response envelopes)
//!
//! It is used by `weather-server`, but has no HTTP server dependencies of its own.

pub mod condition;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;

pub use condition::Condition;
pub use config::Config;
pub use error::WeatherError;
pub use history::{HISTORY_DAYS, synthesize_history};
pub use model::{
    Coordinates, CurrentWeather, ForecastPoint, Observation, UpstreamCondition, WeatherHistory,
    WeatherSample,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
