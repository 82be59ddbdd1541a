use crate::core::config::ConfigError;
use crate::core::kernel::rest::TransportError;
use std::fmt;
use thiserror::Error;

/// Errors raised by the gateway client.
///
/// Only local failures raise: precondition violations, transport failures and
/// unreadable success payloads. A non-200 answer from the gateway is not an
/// error; it is folded into the returned container (see
/// [`ResultResponse::is_remote_error`](crate::core::types::ResultResponse::is_remote_error)).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unsupported request method: {0}")]
    UnsupportedMethod(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Discriminant of an [`ApiError`], for callers that branch on the failure
/// class rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Auth,
    UnsupportedMethod,
    Operation,
    Config,
}

impl ApiError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Auth(_) => ErrorKind::Auth,
            Self::UnsupportedMethod(_) => ErrorKind::UnsupportedMethod,
            Self::Operation(_) => ErrorKind::Operation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Numeric gateway code for this failure
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ParamsError,
            Self::Auth(_) => ErrorCode::NoAuthError,
            Self::UnsupportedMethod(_) | Self::Operation(_) => ErrorCode::OperationError,
            Self::Config(_) => ErrorCode::SystemError,
        }
    }

    /// True when the failure happened before any network activity
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Auth | ErrorKind::UnsupportedMethod
        )
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::Operation(err.to_string())
    }
}

/// Numeric result codes shared with the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    ParamsError,
    NotLoginError,
    NoAuthError,
    ForbiddenError,
    NotFoundError,
    SystemError,
    OperationError,
}

impl ErrorCode {
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ParamsError => 40000,
            Self::NotLoginError => 40100,
            Self::NoAuthError => 40101,
            Self::ForbiddenError => 40300,
            Self::NotFoundError => 40400,
            Self::SystemError => 50000,
            Self::OperationError => 50001,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::ParamsError => "invalid request parameters",
            Self::NotLoginError => "not logged in",
            Self::NoAuthError => "no permission",
            Self::ForbiddenError => "access forbidden",
            Self::NotFoundError => "requested data does not exist",
            Self::SystemError => "internal system error",
            Self::OperationError => "operation failed",
        }
    }

    /// Look up a code reported by the gateway
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            40000 => Some(Self::ParamsError),
            40100 => Some(Self::NotLoginError),
            40101 => Some(Self::NoAuthError),
            40300 => Some(Self::ForbiddenError),
            40400 => Some(Self::NotFoundError),
            50000 => Some(Self::SystemError),
            50001 => Some(Self::OperationError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_and_code() {
        let err = ApiError::Validation("path is blank".to_string());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code().code(), 40000);
        assert!(err.is_precondition());

        let err = ApiError::Auth("missing keys".to_string());
        assert_eq!(err.code(), ErrorCode::NoAuthError);

        let err = ApiError::Operation("connection refused".to_string());
        assert_eq!(err.kind(), ErrorKind::Operation);
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_transport_error_becomes_operation() {
        let err: ApiError = TransportError::Request("connection refused".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Operation);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_code_lookup() {
        assert_eq!(ErrorCode::from_code(40300), Some(ErrorCode::ForbiddenError));
        assert_eq!(ErrorCode::from_code(12345), None);
        assert_eq!(ErrorCode::OperationError.to_string(), "operation failed (50001)");
    }
}
