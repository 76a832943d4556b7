use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::registry::RegistryError;

/// Failures of the `/api/games` path. The body always carries an empty
/// `games` list so the page can render "no games" without special casing.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownSport(#[from] RegistryError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Network, HTTP status or decode failure talking to the scoreboard feed
    #[error("{0:#}")]
    Upstream(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownSport(_) | ApiError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string(), "games": [] });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let unknown = ApiError::from(RegistryError::NotFound("cricket".into()));
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.to_string(), "Unknown sport: cricket");

        let bad_date = ApiError::InvalidDate("01/15/2024".into());
        assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);

        let upstream = ApiError::Upstream(
            anyhow::anyhow!("ESPN scoreboard error: 503 Service Unavailable").context("fetch failed"),
        );
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            upstream.to_string(),
            "fetch failed: ESPN scoreboard error: 503 Service Unavailable"
        );
    }
}
