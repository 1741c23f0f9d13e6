use std::time::Duration;

use axum::{
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients whenever the failure is on our side.
pub const INTERNAL_ERROR_MESSAGE: &str = "the server encountered a problem";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ServiceResponse<T: Serialize> {
	pub data: T,
}

impl<T: Serialize> From<T> for ServiceResponse<T> {
	fn from(data: T) -> Self {
		Self { data }
	}
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
	fn into_response(self) -> Response {
		Json(self).into_response()
	}
}

/// Error envelope: `{"error": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("{0}")]
	Validation(String),

	#[error("record not found")]
	NotFound,

	#[error("{0}")]
	Conflict(String),

	#[error("invalid credentials")]
	Authentication,

	#[error("only the author may modify this resource")]
	Forbidden,

	#[error("database error: {0}")]
	Database(sqlx::Error),

	#[error("query timed out after {0:?}")]
	Timeout(Duration),

	#[error("internal error: {0}")]
	Internal(String),
}

impl ServiceError {
	/// Connection, timeout or driver failures. These are opaque to clients.
	pub fn is_data_access(&self) -> bool {
		matches!(self, Self::Database(_) | Self::Timeout(_) | Self::Internal(_))
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Validation(_) => StatusCode::BAD_REQUEST,
			Self::Authentication => StatusCode::UNAUTHORIZED,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::NotFound => StatusCode::NOT_FOUND,
			Self::Conflict(_) => StatusCode::CONFLICT,
			Self::Database(_) | Self::Timeout(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

// Zero rows and constraint violations are classified here so callers only
// ever match on the variant.
impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		match err {
			sqlx::Error::RowNotFound => ServiceError::NotFound,
			sqlx::Error::Database(ref db_err) => {
				let code = db_err.code().map(|code| code.into_owned());
				match code.as_deref() {
					Some(UNIQUE_VIOLATION) => ServiceError::Conflict("resource already exists".to_string()),
					Some(FOREIGN_KEY_VIOLATION) => ServiceError::NotFound,
					_ => ServiceError::Database(err),
				}
			}
			err => ServiceError::Database(err),
		}
	}
}

impl From<validator::ValidationErrors> for ServiceError {
	fn from(err: validator::ValidationErrors) -> Self {
		ServiceError::Validation(err.to_string())
	}
}

impl From<JsonRejection> for ServiceError {
	fn from(rejection: JsonRejection) -> Self {
		ServiceError::Validation(rejection.body_text())
	}
}

impl From<PathRejection> for ServiceError {
	fn from(rejection: PathRejection) -> Self {
		ServiceError::Validation(rejection.body_text())
	}
}

impl From<QueryRejection> for ServiceError {
	fn from(rejection: QueryRejection) -> Self {
		ServiceError::Validation(rejection.body_text())
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let error = match &self {
			err if err.is_data_access() => {
				tracing::error!(error = %err, "internal server error");
				INTERNAL_ERROR_MESSAGE.to_string()
			}
			ServiceError::NotFound => {
				tracing::warn!(error = %self, "not found error");
				"not found".to_string()
			}
			err => {
				tracing::warn!(error = %err, "bad request error");
				err.to_string()
			}
		};

		(status, Json(ErrorResponse { error })).into_response()
	}
}

#[cfg(test)]
mod test {
	use axum::{http::StatusCode, response::IntoResponse};

	use super::{ServiceError, INTERNAL_ERROR_MESSAGE};

	#[test]
	fn test_status_code_mapping() {
		assert_eq!(ServiceError::Validation("bad".into()).status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(ServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(ServiceError::Conflict("stale".into()).status_code(), StatusCode::CONFLICT);
		assert_eq!(ServiceError::Authentication.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(ServiceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
		assert_eq!(
			ServiceError::Timeout(std::time::Duration::from_secs(5)).status_code(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn test_row_not_found_is_classified_as_not_found() {
		let err: ServiceError = sqlx::Error::RowNotFound.into();
		assert!(matches!(err, ServiceError::NotFound));
	}

	#[test]
	fn test_driver_failures_are_data_access() {
		let err: ServiceError = sqlx::Error::PoolTimedOut.into();
		assert!(err.is_data_access());
		assert!(!ServiceError::NotFound.is_data_access());
		assert!(!ServiceError::Conflict("x".into()).is_data_access());
	}

	#[tokio::test]
	async fn test_internal_errors_do_not_leak_details() {
		let response = ServiceError::Internal("connection reset by peer".into()).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
		let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
	}

	#[tokio::test]
	async fn test_validation_message_is_returned() {
		let response = ServiceError::Validation("limit must be between 1 and 20".into()).into_response();
		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
		let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["error"], "limit must be between 1 and 20");
	}
}
