//! Error types for the registry auth module.

use http::StatusCode;
use thiserror::Error;

/// Errors produced by the authorization chain, the credential codec, and
/// the credential middlewares.
///
/// `Display` yields the bare message, which is what middlewares record on a
/// principal and what clients see in the problem `detail`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryAuthError {
    /// The credential header is not shaped like `<Scheme> <value>`.
    #[error("{0}")]
    MalformedCredential(String),

    /// The signed token is too short, badly signed, or expired.
    #[error("{0}")]
    InvalidToken(String),

    /// Authentication or authorization was denied.
    #[error("{0}")]
    Forbidden(String),

    /// The user already exists, or registration is refused.
    #[error("{0}")]
    Conflict(String),

    /// A programming or infrastructure error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryAuthError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCredential(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status class callers branch on.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedCredential(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MalformedCredential(m)
            | Self::InvalidToken(m)
            | Self::Forbidden(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}
