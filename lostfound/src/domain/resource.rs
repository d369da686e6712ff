//! Lifecycle wrapper for asynchronous operations.
//!
//! A [`Resource`] is what the presentation layer observes for every tracked
//! slot: nothing attempted yet, a call in flight, or exactly one terminal
//! outcome. Leaving a terminal state always goes through `Loading`; only a
//! fresh slot (or an explicit reset) starts at `Idle`.

use super::Error;

/// Four-variant lifecycle of a single asynchronous operation.
///
/// # Examples
/// ```
/// use lostfound::domain::{Error, Resource};
///
/// let done: Resource<u32> = Ok(3).into();
/// assert_eq!(done.success(), Some(&3));
///
/// let failed: Resource<u32> = Err(Error::not_found("gone")).into();
/// assert!(failed.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Resource<T> {
    /// No attempt has been made yet.
    #[default]
    Idle,
    /// A call is in flight.
    Loading,
    /// The last call succeeded with this value.
    Success(T),
    /// The last call failed.
    Error(Error),
}

impl<T> Resource<T> {
    /// Whether no attempt has been made.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a call is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the last call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the last call failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Borrow the success value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the failure cause, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Transform the success value, leaving the other variants untouched.
    pub fn map<U, F>(self, f: F) -> Resource<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Idle => Resource::Idle,
            Self::Loading => Resource::Loading,
            Self::Success(value) => Resource::Success(f(value)),
            Self::Error(error) => Resource::Error(error),
        }
    }
}

impl<T> From<Result<T, Error>> for Resource<T> {
    fn from(value: Result<T, Error>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Error(error),
        }
    }
}
