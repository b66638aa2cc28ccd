use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use coastal_core::error::CoastalError;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CoastalError> for ApiError {
    fn from(err: CoastalError) -> Self {
        match &err {
            // Input validation: the current analysis halts, nothing was sent remotely
            CoastalError::MissingGeometry
            | CoastalError::UnsupportedGeometry { .. }
            | CoastalError::InvalidRing { .. }
            | CoastalError::YearOutOfRange { .. }
            | CoastalError::InvalidYearRange { .. }
            | CoastalError::EmptyTrainingSet
            | CoastalError::ExportAlreadyFinished { .. } => Self::bad_request(err.to_string()),

            CoastalError::ExportNotFound { .. } => Self::not_found(err.to_string()),

            // Remote-service faults
            CoastalError::AuthenticationFailed { .. }
            | CoastalError::EngineUnavailable { .. }
            | CoastalError::RemoteFault { .. }
            | CoastalError::ClassificationFailed { .. } => {
                Self::bad_gateway("Imagery engine request failed").with_details(err.to_string())
            }

            CoastalError::Serialization(_) => {
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_400() {
        let err: ApiError = CoastalError::MissingGeometry.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = CoastalError::InvalidYearRange { start: 2020, end: 2015 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_remote_faults_map_to_502() {
        let err: ApiError = CoastalError::EngineUnavailable {
            reason: "connection refused".to_string(),
            remediation: "start the engine".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.details.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_unknown_export_maps_to_404() {
        let err: ApiError = CoastalError::ExportNotFound { id: "x".to_string() }.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
