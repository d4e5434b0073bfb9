/// Unified error handling for the service.
///
/// Domain-specific error enums keep control flow typed; the single
/// `AppError` wrapper maps every expected failure to an HTTP status and
/// a user-safe JSON body, logging 5xx conditions at error severity.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Validation errors for input data
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(msg) => write!(f, "non-compliant {}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Authentication and session errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Login subject does not exist.
    UnknownUser(String),
    /// Presented secret does not match the stored digest.
    CredentialMismatch,
    /// Account exists but the email address was never verified.
    NotVerified(String),
    /// Token failed signature, structure, or expiry checks.
    Unauthorized,
    /// Refresh token is structurally valid but its session was rotated
    /// away, revoked, or never recorded.
    SessionInvalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UnknownUser(login) => write!(f, "user: {} doesn't exist", login),
            AuthError::CredentialMismatch => write!(f, "login failed, credentials mismatch"),
            AuthError::NotVerified(login) => {
                write!(f, "login failed, {} is not verified", login)
            }
            AuthError::Unauthorized => write!(f, "token has expired or is not yet valid"),
            AuthError::SessionInvalid => write!(f, "refresh token is invalid or expired"),
        }
    }
}

impl StdError for AuthError {}

/// Failures surfaced by the relational store or the session cache.
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    UniqueViolation(String),
    Timeout(String),
    Unavailable(String),
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::UniqueViolation(msg) => write!(f, "duplicate entry: {}", msg),
            StoreError::Timeout(msg) => write!(f, "store call timed out: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Query(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl StdError for StoreError {}

/// Email delivery errors
#[derive(Debug, Clone)]
pub enum EmailError {
    SendFailed(String),
    InvalidRecipient(String),
}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailError::SendFailed(msg) => write!(f, "failed to send email: {}", msg),
            EmailError::InvalidRecipient(msg) => write!(f, "invalid recipient: {}", msg),
        }
    }
}

impl StdError for EmailError {}

/// Central error type that all application errors map to.
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
    Store(StoreError),
    Email(EmailError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Email(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        AppError::Email(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Timeout("database pool timed out".to_string())
            }
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::PoolClosed => {
                StoreError::Unavailable("database pool closed".to_string())
            }
            sqlx::Error::Database(e) if e.code().as_deref() == Some("23505") => {
                StoreError::UniqueViolation("email already registered".to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(err.into())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            StoreError::Timeout(err.to_string())
        } else if err.is_connection_refusal() || err.is_io_error() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Query(err.to_string())
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn response_parts(&self) -> (StatusCode, String, String) {
        match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                e.to_string(),
            ),

            AppError::Auth(e) => match e {
                AuthError::UnknownUser(_) => (
                    StatusCode::NOT_FOUND,
                    "USER_NOT_FOUND".to_string(),
                    e.to_string(),
                ),
                AuthError::CredentialMismatch => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS".to_string(),
                    e.to_string(),
                ),
                AuthError::NotVerified(_) => (
                    StatusCode::FORBIDDEN,
                    "NOT_VERIFIED".to_string(),
                    e.to_string(),
                ),
                AuthError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_INVALID".to_string(),
                    "token has expired or is not yet valid".to_string(),
                ),
                AuthError::SessionInvalid => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_INVALID".to_string(),
                    e.to_string(),
                ),
            },

            AppError::Store(e) => match e {
                StoreError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    e.to_string(),
                ),
                StoreError::UniqueViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY".to_string(),
                    e.to_string(),
                ),
                StoreError::Timeout(_) | StoreError::Unavailable(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE".to_string(),
                    "storage temporarily unavailable".to_string(),
                ),
                StoreError::Query(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR".to_string(),
                    "storage error occurred".to_string(),
                ),
            },

            AppError::Email(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "EMAIL_SERVICE_ERROR".to_string(),
                "email service temporarily unavailable".to_string(),
            ),

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "internal server error".to_string(),
            ),
        }
    }

    fn log(&self, error_id: &str, status: StatusCode) {
        if status.is_server_error() {
            tracing::error!(error_id = error_id, error = %self, "request failed");
        } else {
            tracing::warn!(error_id = error_id, error = %self, "request rejected");
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        let (status, code, message) = self.response_parts();
        self.log(&error_id, status);

        HttpResponse::build(status).json(ErrorResponse::new(
            error_id,
            message,
            code,
            status.as_u16(),
        ))
    }

    fn status_code(&self) -> StatusCode {
        self.response_parts().0
    }
}
