//! src/error.rs
//! ============================================================================
//! # `CoreError`: Unified Error Type for the Navigation Engine
//!
//! Every failure the core can surface to a caller. All variants are
//! recoverable: a failed navigate/refresh leaves the pane at its last good
//! state and the caller renders the error as a status message.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use compact_str::CompactString;
use thiserror::Error;

/// Convenient alias carrying our unified error type
pub type CoreResult<T> = Result<T, CoreError>;

/// Primary error enumeration (grouped by concern)
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ────────────────────────────────────────────────────────────
    // Navigation
    // ────────────────────────────────────────────────────────────
    /// Path no longer exists (e.g. removed between navigation and listing).
    #[error("File or directory not found: {0:?}")]
    NotFound(PathBuf),

    /// Directory exists but cannot be read.
    #[error("Permission denied: {0:?}")]
    PermissionDenied(PathBuf),

    /// Path refers to something that is not a directory.
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Parent requested for a path that has none.
    #[error("Already at the root: {0:?}")]
    AtRoot(PathBuf),

    // ────────────────────────────────────────────────────────────
    // Other I/O
    // ────────────────────────────────────────────────────────────
    #[error("I/O error on {path:?}: {kind:?}")]
    Io { path: PathBuf, kind: ErrorKind },

    // ────────────────────────────────────────────────────────────
    // Input validation
    // ────────────────────────────────────────────────────────────
    #[error("Invalid input: {field} - {message}")]
    InvalidInput {
        field: CompactString,
        message: CompactString,
    },

    /// Background listing task failed to complete (panicked or was cancelled).
    #[error("Listing task for {path:?} did not complete: {reason}")]
    TaskFailed { path: PathBuf, reason: String },
}

impl CoreError {
    /// Map an `io::Error` raised while touching `path` onto the taxonomy.
    #[must_use]
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(path),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            ErrorKind::NotADirectory => Self::NotADirectory(path),
            kind => Self::Io { path, kind },
        }
    }

    /// Create an input validation error
    pub fn invalid_input<S1, S2>(field: S1, message: S2) -> Self
    where
        S1: Into<CompactString>,
        S2: Into<CompactString>,
    {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Path the error refers to, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::NotADirectory(p) | Self::AtRoot(p) => {
                Some(p)
            }
            Self::Io { path, .. } | Self::TaskFailed { path, .. } => Some(path),
            Self::InvalidInput { .. } => None,
        }
    }

    /// Every navigation failure leaves the pane usable; only a crashed
    /// listing worker is worth reporting as a fault.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::TaskFailed { .. })
    }

    /// Short text for a status bar.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(p) => format!("{} no longer exists", p.display()),
            Self::PermissionDenied(p) => format!("Cannot access {}", p.display()),
            Self::NotADirectory(p) => format!("{} is not a directory", p.display()),
            Self::AtRoot(_) => "Already at the top level".to_string(),
            Self::Io { path, kind } => format!("Cannot read {}: {kind}", path.display()),
            Self::InvalidInput { message, .. } => message.to_string(),
            Self::TaskFailed { path, .. } => format!("Listing {} was interrupted", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_navigation_errors() {
        let p = Path::new("/tmp/x");

        let nf = io::Error::from(ErrorKind::NotFound);
        assert_eq!(CoreError::from_io(p, &nf), CoreError::NotFound(p.to_path_buf()));

        let pd = io::Error::from(ErrorKind::PermissionDenied);
        assert_eq!(CoreError::from_io(p, &pd), CoreError::PermissionDenied(p.to_path_buf()));

        let other = io::Error::from(ErrorKind::Interrupted);
        assert!(matches!(
            CoreError::from_io(p, &other),
            CoreError::Io { kind: ErrorKind::Interrupted, .. }
        ));
    }

    #[test]
    fn user_message_mentions_path() {
        let err = CoreError::NotFound(PathBuf::from("/gone"));
        assert!(err.user_message().contains("/gone"));
        assert_eq!(err.path(), Some(Path::new("/gone")));
        assert!(CoreError::invalid_input("path", "empty").path().is_none());
    }

    #[test]
    fn navigation_errors_are_recoverable() {
        assert!(CoreError::AtRoot(PathBuf::from("/")).is_recoverable());
        assert!(CoreError::PermissionDenied(PathBuf::from("/root")).is_recoverable());
        let failed = CoreError::TaskFailed {
            path: PathBuf::from("/x"),
            reason: "panicked".to_string(),
        };
        assert!(!failed.is_recoverable());
    }
}
