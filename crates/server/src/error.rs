//! HTTP boundary mapping for the unified error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pagesnap_core::Error;

/// Wrapper that renders a pipeline error as a plain-text HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_user_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_map_to_400() {
        let response = ApiError(Error::MissingUrl).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(Error::InvalidInteger { name: "width".into(), value: "abc".into() })
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_pipeline_errors_map_to_500() {
        let response = ApiError(Error::RenderUnavailable("no browser".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(Error::RenderFailed("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let response = ApiError(Error::Storage(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
