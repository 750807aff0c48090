//! Domain errors for the registry auth service.

use registry_auth_sdk::RegistryAuthError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    /// Verdict from the provider chain or the credential codec. Reaches
    /// callers unchanged.
    #[error(transparent)]
    Rejected(#[from] RegistryAuthError),

    #[error("invalid package pattern '{pattern}': {reason}")]
    InvalidPackagePattern { pattern: String, reason: String },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}

impl DomainError {
    /// Returns `true` for errors that are a decision about the caller
    /// rather than a fault of the service.
    #[must_use]
    pub fn is_verdict(&self) -> bool {
        matches!(self, Self::Rejected(e) if !matches!(e, RegistryAuthError::Internal(_)))
    }
}

impl From<DomainError> for RegistryAuthError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Rejected(e) => e,
            other => Self::internal(other.to_string()),
        }
    }
}
