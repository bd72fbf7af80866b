//! Explicit outcome of an external lookup.

use std::fmt;

/// Result of querying an external provider for one listing.
///
/// Lookups never abort a batch. The caller decides how to treat
/// `NotFound` and `Error`; the screener treats both as "no match".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Provider returned a usable value.
    Found(T),
    /// Provider answered but has no value for this key.
    NotFound,
    /// Transport, status, or decode failure.
    Error(String),
}

impl<T> Lookup<T> {
    /// Check if a value was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Check if the lookup failed (as opposed to answering "not found").
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Convert into `Option`, discarding the failure reason.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::Error(_) => None,
        }
    }

    /// Borrowing variant of [`Lookup::found`].
    pub fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::Error(_) => None,
        }
    }

    /// Map the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(v) => Lookup::Found(f(v)),
            Self::NotFound => Lookup::NotFound,
            Self::Error(e) => Lookup::Error(e),
        }
    }

    /// Chain a fallible step on the found value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Self::Found(v) => f(v),
            Self::NotFound => Lookup::NotFound,
            Self::Error(e) => Lookup::Error(e),
        }
    }

    /// Short label for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Error(_) => "error",
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::NotFound, Self::Found)
    }
}

impl<T: fmt::Display> fmt::Display for Lookup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(v) => write!(f, "FOUND({v})"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Error(e) => write!(f, "ERROR({e})"),
        }
    }
}
