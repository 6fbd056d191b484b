//! Error type shared by every Hiatus crate

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No valid identity on a route that needs one
	Unauthorized,
	/// Identity present but lacking the required capability
	PermissionDenied,
	ValidationError(String),
	ConfigError(String),
	ServiceUnavailable(String),
	Internal(String),

	// externals
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl Error {
	/// Machine readable error code used in API responses
	pub fn code(&self) -> &'static str {
		match self {
			Error::Unauthorized => "E-AUTH-UNAUTH",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::ValidationError(_) | Error::Json(_) => "E-CORE-VALIDATION",
			Error::ConfigError(_) => "E-CORE-CONFIG",
			Error::ServiceUnavailable(_) => "E-CORE-UNAVAILABLE",
			Error::Internal(_) | Error::Io(_) => "E-CORE-INTERNAL",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationError(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Unauthorized => write!(f, "authentication required"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			Error::Json(err) => write!(f, "json error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			Error::Json(err) => Some(err),
			_ => None,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the log
		let message = if status.is_server_error() {
			tracing::error!("request failed: {}", self);
			"Internal server error".to_string()
		} else {
			self.to_string()
		};

		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});

		(status, Json(body)).into_response()
	}
}


// vim: ts=4
