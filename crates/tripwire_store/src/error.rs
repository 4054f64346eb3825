// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for counter store operations.

use std::fmt::{Display, Formatter};

use recoverable::{Recovery, RecoveryInfo};

/// Classifies why a counter store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No counter store has been configured. Raised before any I/O is attempted.
    NotConfigured,
    /// The counter store could not be reached or rejected the operation.
    Unavailable,
}

impl ErrorKind {
    /// Returns a short, stable label for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "counter store not configured",
            Self::Unavailable => "counter store unavailable",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a counter store operation.
///
/// The error carries an [`ErrorKind`] and, for backend failures, the underlying cause.
/// Use [`std::error::Error::source()`] or the `Display` output to inspect the cause.
///
/// # Example
///
/// ```
/// use tripwire_store::{Error, ErrorKind};
///
/// let error = Error::unavailable("connection refused");
/// assert_eq!(error.kind(), ErrorKind::Unavailable);
/// assert!(error.to_string().contains("connection refused"));
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates the error returned when no counter store has been configured.
    #[must_use]
    pub fn not_configured() -> Self {
        Self::new(ErrorKind::NotConfigured)
    }

    /// Creates an error for a backend that cannot be reached, wrapping the cause.
    ///
    /// This is the public API for reporting failures from counter store implementations
    /// in external crates.
    pub fn unavailable(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Unavailable, cause)
    }

    /// Returns the kind of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Recovery for Error {
    fn recovery(&self) -> RecoveryInfo {
        match self.kind {
            ErrorKind::Unavailable => RecoveryInfo::unavailable(),
            ErrorKind::NotConfigured => RecoveryInfo::never(),
        }
    }
}

/// A specialized [`Result`] type for counter store operations.
pub type Result<T> = std::result::Result<T, Error>;
