//! Error taxonomy shared by the provider, the history synthesizer and the server.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// City name was empty after trimming.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transport failure, timeout, non-2xx status or undecodable body.
    #[error("{0}")]
    Upstream(String),

    /// Geocoding returned no match.
    #[error("{0}")]
    NotFound(String),

    /// Forecast list was empty.
    #[error("No forecast data available")]
    NoData,

    #[error("configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Whether the failure means "nothing to show" rather than "something broke".
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}
