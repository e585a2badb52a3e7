//! API types for the car-wash order HTTP API.
//!
//! This module defines the request and response bodies that are not orders
//! themselves, plus the error type handlers return.

use crate::OrderStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for `PATCH /api/orders/{orderId}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
	/// New status for the order.
	pub status: OrderStatus,
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
}

impl HealthResponse {
	pub fn ok() -> Self {
		Self {
			status: "ok".to_string(),
		}
	}
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// No order exists for the requested id (404, empty body)
	NotFound,
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::NotFound => 404,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	///
	/// Returns `None` for errors that are reported with an empty body.
	pub fn to_error_response(&self) -> Option<ErrorResponse> {
		match self {
			APIError::NotFound => None,
			APIError::InternalServerError {
				error_type,
				message,
			} => Some(ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
			}),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::NotFound => write!(f, "Not Found"),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		match self.to_error_response() {
			Some(body) => (status, Json(body)).into_response(),
			None => status.into_response(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_health_response_shape() {
		let value = serde_json::to_value(HealthResponse::ok()).unwrap();
		assert_eq!(value, json!({ "status": "ok" }));
	}

	#[test]
	fn test_status_update_request_parses() {
		let request: StatusUpdateRequest =
			serde_json::from_value(json!({ "status": "COMPLETED" })).unwrap();
		assert_eq!(request.status, OrderStatus::Completed);
	}

	#[test]
	fn test_not_found_has_no_body() {
		let err = APIError::NotFound;
		assert_eq!(err.status_code(), 404);
		assert!(err.to_error_response().is_none());
	}

	#[test]
	fn test_internal_error_body() {
		let err = APIError::InternalServerError {
			error_type: "STORAGE_ERROR".into(),
			message: "backend down".into(),
		};
		assert_eq!(err.status_code(), 500);
		let body = err.to_error_response().unwrap();
		assert_eq!(body.error, "STORAGE_ERROR");
		assert_eq!(err.to_string(), "Internal Server Error: backend down");
	}

	#[cfg(feature = "axum")]
	#[test]
	fn test_into_response_status() {
		use axum::{http::StatusCode, response::IntoResponse};

		assert_eq!(
			APIError::NotFound.into_response().status(),
			StatusCode::NOT_FOUND
		);
		let response = APIError::InternalServerError {
			error_type: "STORAGE_ERROR".into(),
			message: "backend down".into(),
		}
		.into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
