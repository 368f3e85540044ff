//! Success/failure outcome of an operation.

use crate::error::Error;

/// The outcome of an operation: either a success carrying a value, or a
/// failure carrying a non-sentinel [`Error`].
///
/// `Outcome<()>` is the untyped form used by commands that produce no value.
///
/// Invariant: `is_success() == error().is_none()`. Every constructor enforces
/// it, so an outcome observed anywhere in the pipeline is consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T = ()> {
    value: Option<T>,
    error: Error,
}

impl Outcome<()> {
    /// A successful outcome without a value.
    pub fn ok() -> Self {
        Self::success(())
    }
}

impl<T> Outcome<T> {
    /// Checked constructor.
    ///
    /// # Panics
    ///
    /// Panics if `is_success` is `true` and `error` is not `Error::none()`,
    /// if `is_success` is `false` and `error` is `Error::none()`, or if a
    /// success is built without a value.
    pub fn new(value: Option<T>, is_success: bool, error: Error) -> Self {
        assert!(
            is_success == error.is_none(),
            "invalid error for outcome: success={is_success}, error={error}"
        );
        assert!(
            !is_success || value.is_some(),
            "successful outcome requires a value"
        );
        Self {
            value: if is_success { value } else { None },
            error,
        }
    }

    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            error: Error::none(),
        }
    }

    /// # Panics
    ///
    /// Panics if `error` is `Error::none()`.
    pub fn failure(error: Error) -> Self {
        Self::new(None, false, error)
    }

    /// Same as [`failure`](Self::failure); marks the failure as coming from
    /// input validation.
    ///
    /// # Panics
    ///
    /// Panics if `error` is `Error::none()`.
    pub fn validation_failure(error: Error) -> Self {
        Self::failure(error)
    }

    /// Lifts an optional value: `Some` becomes a success, `None` becomes a
    /// failure with [`Error::null_value`].
    pub fn from_nullable(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::success(value),
            None => Self::failure(Error::null_value()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The error of a failure, or `Error::none()` for a success.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// # Panics
    ///
    /// Panics when called on a failed outcome.
    #[must_use]
    pub fn value(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => panic!("cannot access value of a failed outcome: {}", self.error),
        }
    }

    /// # Panics
    ///
    /// Panics when called on a failed outcome.
    #[must_use]
    pub fn into_value(self) -> T {
        match self.value {
            Some(value) => value,
            None => panic!("cannot access value of a failed outcome: {}", self.error),
        }
    }

    /// The value of a success, `None` for a failure.
    #[must_use]
    pub fn try_value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Drops the value, keeping only success or failure.
    pub fn discard_value(self) -> Outcome {
        Outcome {
            value: self.value.map(|_| ()),
            error: self.error,
        }
    }

    /// Converts into a standard `Result` for `?`-style composition.
    ///
    /// # Errors
    ///
    /// Returns the outcome's error when it is a failure.
    pub fn into_result(self) -> Result<T, Error> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(self.error),
        }
    }

    /// Inverse of [`into_result`](Self::into_result).
    ///
    /// # Panics
    ///
    /// Panics if `result` is `Err(Error::none())`.
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: self.value.map(f),
            error: self.error,
        }
    }
}
