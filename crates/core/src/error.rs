//! Domain error model and the classified application error.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the pure domain (malformed
/// input, bad identifiers). Storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Message without the variant prefix, suitable for a client-facing detail.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::InvalidId(msg) => msg,
        }
    }
}

/// Severity class of an [`AppError`], fixed to an HTTP-equivalent status.
///
/// The set is closed: adding a class means adding a variant here together
/// with its status, title and code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusClass {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    MethodNotAllowed,
    Conflict,
    InternalServerError,
}

impl StatusClass {
    /// Numeric HTTP status.
    pub fn status_code(self) -> u16 {
        match self {
            StatusClass::NotFound => 404,
            StatusClass::BadRequest => 400,
            StatusClass::Unauthorized => 401,
            StatusClass::Forbidden => 403,
            StatusClass::MethodNotAllowed => 405,
            StatusClass::Conflict => 409,
            StatusClass::InternalServerError => 500,
        }
    }

    /// Canonical reason phrase for the status.
    pub fn title(self) -> &'static str {
        match self {
            StatusClass::NotFound => "Not Found",
            StatusClass::BadRequest => "Bad Request",
            StatusClass::Unauthorized => "Unauthorized",
            StatusClass::Forbidden => "Forbidden",
            StatusClass::MethodNotAllowed => "Method Not Allowed",
            StatusClass::Conflict => "Conflict",
            StatusClass::InternalServerError => "Internal Server Error",
        }
    }

    /// Default machine-readable code for the class.
    pub fn code(self) -> &'static str {
        match self {
            StatusClass::NotFound => "NOT_FOUND",
            StatusClass::BadRequest => "BAD_REQUEST",
            StatusClass::Unauthorized => "UNAUTHORIZED",
            StatusClass::Forbidden => "FORBIDDEN",
            StatusClass::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            StatusClass::Conflict => "CONFLICT",
            StatusClass::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Classified application error.
///
/// This is the only error the orchestration layer returns. Expected conditions
/// get an explicit class; anything else is wrapped with [`AppError::internal_from`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AppError {
    status: StatusClass,
    code: String,
    message: String,
}

impl AppError {
    pub fn new(status: StatusClass, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    fn of(status: StatusClass, message: impl Into<String>) -> Self {
        Self::new(status, status.code(), message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(StatusClass::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::of(StatusClass::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::of(StatusClass::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::of(StatusClass::Forbidden, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::of(StatusClass::MethodNotAllowed, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::of(StatusClass::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(StatusClass::InternalServerError, message)
    }

    /// Wrap an opaque failure as `InternalServerError`, keeping its message.
    pub fn internal_from(context: &str, err: impl core::fmt::Display) -> Self {
        Self::internal(format!("{context}: {err}"))
    }

    pub fn status(&self) -> StatusClass {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::bad_request(err.message())
    }
}
