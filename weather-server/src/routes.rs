use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method},
    routing::get,
};
use chrono::Local;
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use weather_core::{
    CurrentWeather, WeatherHistory, WeatherProvider, WeatherSample, synthesize_history,
};

use crate::error::ApiError;

/// Request-independent handles shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
    default_location: String,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_location: String) -> Self {
        Self { provider, default_location }
    }

    /// A missing or empty `location` falls back to the configured city.
    fn location_or_default(&self, requested: Option<String>) -> String {
        requested
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_location.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/weather/current", get(current_weather))
        .route("/weather/history", get(weather_history))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// A `*` entry allows every origin; `AllowOrigin::list` rejects it.
fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let location = state.location_or_default(query.location);

    let observation = state.provider.current_observation(&location).await.map_err(|e| {
        ApiError::with_context(format!("Error fetching weather for '{location}'"), e)
    })?;

    Ok(Json(CurrentWeather { current: WeatherSample::current_now(&observation), location }))
}

async fn weather_history(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<WeatherHistory>, ApiError> {
    let location = state.location_or_default(query.location);

    let coords = state.provider.resolve_coordinates(&location).await.map_err(|e| {
        ApiError::with_context(format!("Error getting coordinates for '{location}'"), e)
    })?;

    let points = state
        .provider
        .forecast(coords)
        .await
        .map_err(|e| ApiError::with_context("Error fetching forecast", e))?;

    let history = synthesize_history(&points, &Local::now())?;
    tracing::debug!(%location, samples = points.len(), "Synthesized weather history");

    Ok(Json(WeatherHistory { location, history }))
}
