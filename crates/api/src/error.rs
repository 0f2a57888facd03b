//! HTTP mapping of the domain error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openhouse_domain::OpenHouseError;
use serde::Serialize;

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    error: OpenHouseError,
    expose_detail: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn new(error: OpenHouseError, expose_detail: bool) -> Self {
        Self { error, expose_detail }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            OpenHouseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            OpenHouseError::NotFound(_) => StatusCode::NOT_FOUND,
            OpenHouseError::Conflict(_) => StatusCode::CONFLICT,
            OpenHouseError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OpenHouseError::Database(_)
            | OpenHouseError::Config(_)
            | OpenHouseError::Network(_)
            | OpenHouseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Client-addressable errors carry their own message; internal ones
        // get a generic message with the detail gated on the environment.
        let message = if status.is_client_error() || status == StatusCode::SERVICE_UNAVAILABLE {
            self.error.to_string()
        } else {
            "internal server error".to_string()
        };
        let detail = self.expose_detail.then(|| self.error.to_string());

        (status, Json(ErrorBody { success: false, message, error: detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (OpenHouseError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (OpenHouseError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (OpenHouseError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                OpenHouseError::ProviderUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (OpenHouseError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (OpenHouseError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::new(error, true).status(), expected);
        }
    }
}
