use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::WeatherError;

/// Plain-text error response. Requests either succeed whole or fail with one of these.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Wrap a core error with request context, e.g. "Error fetching forecast".
    pub fn with_context(context: impl std::fmt::Display, err: WeatherError) -> Self {
        Self { status: status_for(&err), message: format!("{context}: {err}") }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self { status: status_for(&err), message: err.to_string() }
    }
}

/// Empty forecast data is a 404; every other failure is the server's (or upstream's) fault.
fn status_for(err: &WeatherError) -> StatusCode {
    if err.is_no_data() { StatusCode::NOT_FOUND } else { StatusCode::INTERNAL_SERVER_ERROR }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), "{}", self.message);
        } else {
            tracing::warn!(status = self.status.as_u16(), "{}", self.message);
        }

        (self.status, self.message).into_response()
    }
}
