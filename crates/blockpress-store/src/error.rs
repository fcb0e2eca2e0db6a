use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Gateway-facing error taxonomy. Validation and conflict errors name the
/// offending field; storage errors wrap the structural cause and are never
/// swallowed on the way up.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation failed for '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("slug already in use: '{slug}'")]
    Conflict { slug: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub(crate) fn conflict(slug: impl Into<String>) -> Self {
        Self::Conflict { slug: slug.into() }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation { .. } => ErrorClass::Validation,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Conflict { .. } => ErrorClass::Conflict,
            Self::Store(_) => ErrorClass::Internal,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// StoreError
///
/// Structural storage failure. `Corrupt` fires when stored rows no longer
/// decode into the block model; `InvariantViolation` when the table state
/// contradicts the schema (for example two rating rows on one block).
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store corruption: {message}")]
    Corrupt { message: String },

    #[error("store invariant violation: {message}")]
    InvariantViolation { message: String },
}

impl StoreError {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
