//! Fallback provider, always last in the chain.

use async_trait::async_trait;
use registry_auth_sdk::{
    AuthProvider, Capabilities, PackageAccess, PackageAction, Principal, RegistryAuthError,
};

/// Refuses authentication and registration, and grants package actions only
/// through the package ACLs. Implements every capability, so a chain ending
/// with it always reaches a verdict.
#[derive(Default)]
pub struct DenyAllProvider;

impl DenyAllProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn allow_action(
    principal: &Principal,
    package: &PackageAccess,
    action: PackageAction,
) -> Result<bool, RegistryAuthError> {
    if principal.in_any_group(package.acl(action)) {
        return Ok(true);
    }
    let package = &package.name;
    let message = match principal.name() {
        Some(name) => format!("user {name} is not allowed to {action} package {package}"),
        None => format!("unregistered users are not allowed to {action} package {package}"),
    };
    Err(RegistryAuthError::forbidden(message))
}

#[async_trait]
impl AuthProvider for DenyAllProvider {
    fn name(&self) -> &'static str {
        "deny-all"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    async fn authenticate(
        &self,
        _user: &str,
        _password: &str,
    ) -> Result<Option<Vec<String>>, RegistryAuthError> {
        Err(RegistryAuthError::forbidden(
            "bad username/password, access denied",
        ))
    }

    async fn add_user(&self, _user: &str, _password: &str) -> Result<bool, RegistryAuthError> {
        Err(RegistryAuthError::conflict("registration is disabled"))
    }

    async fn allow_access(
        &self,
        principal: &Principal,
        package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        allow_action(principal, package, PackageAction::Access)
    }

    async fn allow_publish(
        &self,
        principal: &Principal,
        package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        allow_action(principal, package, PackageAction::Publish)
    }
}
