//! Structured error descriptors carried by every failed [`Outcome`](crate::Outcome).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Classification of an [`Error`], used by the API boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unclassified failure. Rendered opaquely as a server failure.
    #[default]
    Failure,
    /// Malformed input, usually carrying field-level component errors.
    Validation,
    /// A domain precondition was violated by the caller.
    Problem,
    /// The addressed resource does not exist.
    NotFound,
    /// The request conflicts with the current state of the resource.
    Conflict,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Validation => "validation",
            Self::Problem => "problem",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of why an operation failed.
///
/// `Error::none()` is the sentinel for "no error" and is the only error a
/// successful outcome may carry. Validation errors additionally carry their
/// component errors, see [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    code: String,
    description: String,
    kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<Error>,
}

impl Error {
    pub const NULL_VALUE_CODE: &'static str = "General.Null";

    /// Creates an error with an explicit kind.
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            kind,
            errors: Vec::new(),
        }
    }

    /// The "no error" sentinel: empty code and description, kind `Failure`.
    #[must_use]
    pub fn none() -> Self {
        Self::new(String::new(), String::new(), ErrorKind::Failure)
    }

    /// A null value was supplied where a value is required.
    #[must_use]
    pub fn null_value() -> Self {
        Self::failure(Self::NULL_VALUE_CODE, "Null value was provided")
    }

    #[must_use]
    pub fn failure(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(code, description, ErrorKind::Failure)
    }

    #[must_use]
    pub fn not_found(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(code, description, ErrorKind::NotFound)
    }

    #[must_use]
    pub fn problem(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(code, description, ErrorKind::Problem)
    }

    #[must_use]
    pub fn conflict(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(code, description, ErrorKind::Conflict)
    }

    /// A single field-level validation error. The code names the offending field.
    #[must_use]
    pub fn validation(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(code, description, ErrorKind::Validation)
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` for the `Error::none()` sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }

    /// Component errors of a validation error, in the order they were collected.
    /// Empty for every other error.
    #[must_use]
    pub fn validation_errors(&self) -> &[Error] {
        &self.errors
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.kind, self.description)
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// An aggregate of component errors reported as one validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    errors: Vec<Error>,
}

impl ValidationError {
    pub const CODE: &'static str = "General.Validation";
    pub const DESCRIPTION: &'static str = "One or more validation errors occurred";

    #[must_use]
    pub fn new(errors: Vec<Error>) -> Self {
        Self { errors }
    }

    /// Collects the errors of every failed outcome, preserving input order.
    ///
    /// Successful outcomes are skipped, so an all-success input produces an
    /// empty `ValidationError`. Check [`is_empty`](Self::is_empty) before
    /// surfacing the result as a failure.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        Self::new(
            results
                .into_iter()
                .filter(|r| r.is_failure())
                .map(|r| r.error().clone())
                .collect(),
        )
    }

    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Self {
            code: ValidationError::CODE.to_string(),
            description: ValidationError::DESCRIPTION.to_string(),
            kind: ErrorKind::Validation,
            errors: value.errors,
        }
    }
}
