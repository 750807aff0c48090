//! Provider contract for the authorization chain.
//!
//! A provider implements any subset of four operations and declares which
//! ones through [`AuthProvider::capabilities`]. The chain only calls the
//! operations a provider declared; the default method bodies exist so a
//! provider need not spell out the ones it does not support.

use async_trait::async_trait;
use registry_security::Principal;

use crate::error::RegistryAuthError;
use crate::models::PackageAccess;

/// One operation of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authenticate,
    /// Registration. Covers providers that expose it as `adduser` too.
    AddUser,
    AllowAccess,
    AllowPublish,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Self::Authenticate => 0b0001,
            Self::AddUser => 0b0010,
            Self::AllowAccess => 0b0100,
            Self::AllowPublish => 0b1000,
        }
    }
}

/// Set of [`Capability`] values a provider implements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// A capability provider consulted by the authorization chain.
///
/// Every operation has three outcomes:
/// - `Err(_)` stops the chain and is returned to the caller unchanged;
/// - an affirmative value (`Some` non-empty groups, `true`) stops the chain
///   with that result;
/// - `Ok(None)`, an empty group list, or `Ok(false)` passes to the next provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Operations this provider implements. Read once when the chain is built.
    fn capabilities(&self) -> Capabilities;

    /// Check a user/password pair and return the user's real groups.
    ///
    /// # Errors
    ///
    /// Any error aborts authentication.
    async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Option<Vec<String>>, RegistryAuthError> {
        let _ = (user, password);
        Ok(None)
    }

    /// Register a user. `Ok(true)` means the user was created.
    ///
    /// # Errors
    ///
    /// Any error aborts registration (e.g. `Conflict` for an existing user).
    async fn add_user(&self, user: &str, password: &str) -> Result<bool, RegistryAuthError> {
        let _ = (user, password);
        Ok(false)
    }

    /// Decide whether `principal` may read `package`.
    ///
    /// # Errors
    ///
    /// Any error denies access.
    async fn allow_access(
        &self,
        principal: &Principal,
        package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        let _ = (principal, package);
        Ok(false)
    }

    /// Decide whether `principal` may publish `package`.
    ///
    /// # Errors
    ///
    /// Any error denies publishing.
    async fn allow_publish(
        &self,
        principal: &Principal,
        package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        let _ = (principal, package);
        Ok(false)
    }
}
