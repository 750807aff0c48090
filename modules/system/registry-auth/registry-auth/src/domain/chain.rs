//! Ordered provider chain.
//!
//! Every operation walks the providers in order, skipping those that did not
//! declare the capability. The first error or affirmative verdict ends the
//! walk; "no verdict" moves on to the next provider. Providers are called one
//! at a time, each only after the previous one has returned.

use std::sync::Arc;

use async_trait::async_trait;
use registry_auth_sdk::{
    AuthProvider, Capabilities, Capability, PackageAccess, Principal, RegistryAuthError,
};
use tracing::debug;

use super::builtin::{DenyAllProvider, StaticUsersProvider};

/// One chain operation: which capability it needs and how to call it.
#[async_trait]
pub trait ChainOperation: Sync {
    type Output: Send;

    const CAPABILITY: Capability;
    const NAME: &'static str;

    /// Call the provider. `Ok(None)` means "no verdict, ask the next one".
    async fn invoke(
        &self,
        provider: &dyn AuthProvider,
    ) -> Result<Option<Self::Output>, RegistryAuthError>;
}

pub struct Authenticate<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[async_trait]
impl ChainOperation for Authenticate<'_> {
    type Output = Vec<String>;

    const CAPABILITY: Capability = Capability::Authenticate;
    const NAME: &'static str = "authenticate";

    async fn invoke(
        &self,
        provider: &dyn AuthProvider,
    ) -> Result<Option<Vec<String>>, RegistryAuthError> {
        let groups = provider.authenticate(self.user, self.password).await?;
        // An empty group list is not a verdict.
        Ok(groups.filter(|g| !g.is_empty()))
    }
}

pub struct AddUser<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[async_trait]
impl ChainOperation for AddUser<'_> {
    type Output = ();

    const CAPABILITY: Capability = Capability::AddUser;
    const NAME: &'static str = "add_user";

    async fn invoke(&self, provider: &dyn AuthProvider) -> Result<Option<()>, RegistryAuthError> {
        let created = provider.add_user(self.user, self.password).await?;
        Ok(created.then_some(()))
    }
}

pub struct AllowAccess<'a> {
    pub principal: &'a Principal,
    pub package: &'a PackageAccess,
}

#[async_trait]
impl ChainOperation for AllowAccess<'_> {
    type Output = bool;

    const CAPABILITY: Capability = Capability::AllowAccess;
    const NAME: &'static str = "allow_access";

    async fn invoke(&self, provider: &dyn AuthProvider) -> Result<Option<bool>, RegistryAuthError> {
        let allowed = provider.allow_access(self.principal, self.package).await?;
        Ok(allowed.then_some(true))
    }
}

pub struct AllowPublish<'a> {
    pub principal: &'a Principal,
    pub package: &'a PackageAccess,
}

#[async_trait]
impl ChainOperation for AllowPublish<'_> {
    type Output = bool;

    const CAPABILITY: Capability = Capability::AllowPublish;
    const NAME: &'static str = "allow_publish";

    async fn invoke(&self, provider: &dyn AuthProvider) -> Result<Option<bool>, RegistryAuthError> {
        let allowed = provider.allow_publish(self.principal, self.package).await?;
        Ok(allowed.then_some(true))
    }
}

struct ChainEntry {
    provider: Arc<dyn AuthProvider>,
    capabilities: Capabilities,
}

impl ChainEntry {
    fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let capabilities = provider.capabilities();
        Self {
            provider,
            capabilities,
        }
    }
}

/// Static credential list, then the configured providers in order, then
/// deny-all.
pub struct ProviderChain {
    entries: Vec<ChainEntry>,
}

impl ProviderChain {
    #[must_use]
    pub fn new(static_users: StaticUsersProvider, providers: Vec<Arc<dyn AuthProvider>>) -> Self {
        let mut entries = Vec::with_capacity(providers.len() + 2);
        entries.push(ChainEntry::new(Arc::new(static_users)));
        entries.extend(providers.into_iter().map(ChainEntry::new));
        entries.push(ChainEntry::new(Arc::new(DenyAllProvider::new())));
        Self { entries }
    }

    /// Provider names in chain order.
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.provider.name())
    }

    /// Walk the chain for `op`.
    ///
    /// # Errors
    ///
    /// The first provider error, unchanged. `Internal` if no provider reached
    /// a verdict, which a chain ending in deny-all never does.
    pub async fn resolve<O: ChainOperation>(
        &self,
        op: &O,
    ) -> Result<O::Output, RegistryAuthError> {
        let eligible = self
            .entries
            .iter()
            .filter(|e| e.capabilities.contains(O::CAPABILITY));

        for entry in eligible {
            match op.invoke(entry.provider.as_ref()).await {
                Ok(Some(output)) => {
                    debug!(
                        operation = O::NAME,
                        provider = entry.provider.name(),
                        "provider granted"
                    );
                    return Ok(output);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(
                        operation = O::NAME,
                        provider = entry.provider.name(),
                        error = %err,
                        "provider refused"
                    );
                    return Err(err);
                }
            }
        }

        Err(RegistryAuthError::internal(format!(
            "no provider reached a verdict for {}",
            O::NAME
        )))
    }
}
