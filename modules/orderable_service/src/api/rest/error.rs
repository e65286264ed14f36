//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::OrderingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: OrderingError) -> Problem {
    let detail = error.to_string();
    match error {
        OrderingError::NotFound { .. }
        | OrderingError::EntityNotFound { .. }
        | OrderingError::UrlNameNotFound { .. }
        | OrderingError::NoContent => {
            Problem::new(StatusCode::NOT_FOUND, "Content Not Found").with_detail(detail)
        }

        OrderingError::InvalidMove { .. } => {
            Problem::new(StatusCode::CONFLICT, "Invalid Move").with_detail(detail)
        }

        OrderingError::ConcurrencyConflict { .. } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(detail)
        }

        OrderingError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        OrderingError::StoreUnavailable { .. } => {
            tracing::error!("Store failure: {}", detail);
            Problem::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
                .with_detail("The content store is temporarily unavailable")
        }

        OrderingError::Inconsistent { .. } => {
            tracing::error!("Inconsistent ordering: {}", detail);
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Inconsistent Ordering")
                .with_detail(detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Direction;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                OrderingError::NotFound {
                    partition: 1,
                    position: 4,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                OrderingError::InvalidMove {
                    partition: 1,
                    position: 0,
                    direction: Direction::Up,
                },
                StatusCode::CONFLICT,
            ),
            (
                OrderingError::UrlNameNotFound {
                    url_name: "about".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (OrderingError::NoContent, StatusCode::NOT_FOUND),
            (
                OrderingError::StoreUnavailable {
                    reason: "connection reset".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                OrderingError::Validation {
                    message: "name cannot be empty".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status.as_u16());
        }
    }

    #[test]
    fn test_store_details_are_not_leaked() {
        let problem = map_domain_error(OrderingError::StoreUnavailable {
            reason: "password authentication failed".to_string(),
        });
        assert!(!problem
            .detail
            .unwrap_or_default()
            .contains("password"));
    }
}
