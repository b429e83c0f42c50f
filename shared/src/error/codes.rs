//! Unified error codes for the koda backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Catalog errors
//! - 7xxx: Sync queue errors
//! - 8xxx: Payment provider errors
//! - 9xxx: System errors

use super::category::ErrorCategory;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Token is invalid
    TokenInvalid = 1002,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Price display string could not be parsed to minor units
    InvalidPrice = 6002,
    /// Product title is empty after sanitization
    EmptyTitle = 6003,

    // ==================== 7xxx: Sync queue ====================
    /// Sync job not found
    JobNotFound = 7001,
    /// Sync job retry budget exhausted
    RetryExhausted = 7002,
    /// Unknown sync operation type
    UnknownOperation = 7003,

    // ==================== 8xxx: Provider ====================
    /// Payment provider rejected the request
    ProviderError = 8001,
    /// Payment provider resource is missing
    ProviderResourceMissing = 8002,
    /// Payment provider unreachable
    ProviderUnavailable = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Category this code belongs to
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::NotAuthenticated => "Authentication required",
            Self::TokenInvalid => "Invalid token",
            Self::ProductNotFound => "Product not found",
            Self::InvalidPrice => "Price could not be parsed",
            Self::EmptyTitle => "Product title is empty",
            Self::JobNotFound => "Sync job not found",
            Self::RetryExhausted => "Sync job retry budget exhausted",
            Self::UnknownOperation => "Unknown sync operation",
            Self::ProviderError => "Payment provider request failed",
            Self::ProviderResourceMissing => "Payment provider resource missing",
            Self::ProviderUnavailable => "Payment provider unreachable",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }

    /// HTTP status code this error maps to
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest | Self::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidPrice | Self::EmptyTitle | Self::UnknownOperation => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound | Self::ProductNotFound | Self::JobNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::NotAuthenticated | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::ProviderUnavailable => StatusCode::BAD_GATEWAY,
            Self::Unknown
            | Self::RetryExhausted
            | Self::ProviderError
            | Self::ProviderResourceMissing
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unrecognized u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            1001 => Self::NotAuthenticated,
            1002 => Self::TokenInvalid,
            6001 => Self::ProductNotFound,
            6002 => Self::InvalidPrice,
            6003 => Self::EmptyTitle,
            7001 => Self::JobNotFound,
            7002 => Self::RetryExhausted,
            7003 => Self::UnknownOperation,
            8001 => Self::ProviderError,
            8002 => Self::ProviderResourceMissing,
            8003 => Self::ProviderUnavailable,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidPrice,
            ErrorCode::RetryExhausted,
            ErrorCode::ProviderResourceMissing,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidPrice.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::ProviderUnavailable.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorCode::InvalidPrice.category(), ErrorCategory::Catalog);
        assert_eq!(
            ErrorCode::RetryExhausted.category(),
            ErrorCategory::SyncQueue
        );
        assert_eq!(ErrorCode::ProviderError.category(), ErrorCategory::Provider);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
