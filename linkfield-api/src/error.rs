//! Failures raised outside the search envelope.
//!
//! `/search` always answers `{success, data}`; everything else in the
//! service (startup, fixture loading, configuration, the health routes)
//! reports through [`ApiError`], which renders as a JSON body carrying a
//! machine-readable [`ErrorCode`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linkfield_core::{ConfigError, LinkfieldError, ResolveError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable failure category, serialized in SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The caller sent something unusable.
    InvalidInput,
    /// The requested content type is unknown or switched off.
    UnsupportedType,
    /// The content store could not answer.
    StoreError,
    /// Settings or fixtures failed to load.
    ConfigError,
    InternalError,
}

impl ErrorCode {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::UnsupportedType => StatusCode::BAD_REQUEST,
            ErrorCode::StoreError | ErrorCode::ConfigError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON error body: a code, a readable message and optional context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured context, such as the offending setting.
    pub fn with_details(self, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn unsupported_type(requested: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnsupportedType,
            format!("Content type '{}' is not enabled", requested),
        )
        .with_details(serde_json::json!({ "type": requested.to_string() }))
    }

    pub fn store_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreError, message)
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument { key, reason } => {
                ApiError::invalid_input(format!("Query argument '{}' rejected: {}", key, reason))
            }
            other => {
                tracing::error!(error = %other, "content store failed");
                ApiError::store_error("The content store did not answer")
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnsupportedType { requested } => ApiError::unsupported_type(requested),
            ResolveError::MissingStrategy { kind } => ApiError::unsupported_type(kind),
            ResolveError::Store(store) => store.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::config_error(err.to_string())
    }
}

impl From<LinkfieldError> for ApiError {
    fn from(err: LinkfieldError) -> Self {
        match err {
            LinkfieldError::Resolve(e) => e.into(),
            LinkfieldError::Store(e) => e.into(),
            LinkfieldError::Config(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!(error = %err, "rejecting undecodable body");
        ApiError::invalid_input(format!("Body is not valid JSON: {}", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
