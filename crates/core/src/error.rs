//! Access decision error model.

use thiserror::Error;

/// Result type used across the decision engine.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Access decision failure.
///
/// `NoAccess` is a security denial; the other variants indicate programming
/// errors by the caller and are never audited. None of these are retried by
/// the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// An enforcing check denied access. Terminal for the calling operation.
    #[error("no access")]
    NoAccess,

    /// A required argument was absent or inconsistent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A dynamic permission check ran with no guarded target in the context.
    #[error("no guarded target in context for dynamic permission check")]
    MissingTarget,

    /// A dynamic-association registration arrived after the registry was
    /// sealed.
    #[error("dynamic association registry is sealed")]
    Sealed,
}
