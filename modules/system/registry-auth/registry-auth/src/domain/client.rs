//! `RegistryAuthClient` implementation for the service.

use async_trait::async_trait;
use registry_auth_sdk::{
    Credentials, Principal, RegistryAuthClient, RegistryAuthError, TokenPayload,
};

use super::error::DomainError;
use super::service::Service;

fn log_and_convert(op: &str, e: DomainError) -> RegistryAuthError {
    if e.is_verdict() {
        tracing::debug!(operation = op, error = %e, "registry_auth call refused");
    } else {
        tracing::error!(operation = op, error = ?e, "registry_auth call failed");
    }
    e.into()
}

#[async_trait]
impl RegistryAuthClient for Service {
    async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Principal, RegistryAuthError> {
        Service::authenticate(self, user, password)
            .await
            .map_err(|e| log_and_convert("authenticate", e))
    }

    async fn add_user(&self, user: &str, password: &str) -> Result<Principal, RegistryAuthError> {
        Service::add_user(self, user, password)
            .await
            .map_err(|e| log_and_convert("add_user", e))
    }

    async fn allow_access(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, RegistryAuthError> {
        Service::allow_access(self, package, principal)
            .await
            .map_err(|e| log_and_convert("allow_access", e))
    }

    async fn allow_publish(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, RegistryAuthError> {
        Service::allow_publish(self, package, principal)
            .await
            .map_err(|e| log_and_convert("allow_publish", e))
    }

    fn issue_token(&self, principal: &Principal) -> Result<String, RegistryAuthError> {
        Service::issue_token(self, principal).map_err(|e| log_and_convert("issue_token", e))
    }

    fn decode_token(&self, token: &str) -> Result<TokenPayload, RegistryAuthError> {
        Service::decode_token(self, token).map_err(RegistryAuthError::from)
    }

    fn pack_credentials(&self, user: &str, password: &str) -> Result<String, RegistryAuthError> {
        Service::pack_credentials(self, user, password)
            .map_err(|e| log_and_convert("pack_credentials", e))
    }

    fn unpack_credentials(&self, packed: &str) -> Option<Credentials> {
        Service::unpack_credentials(self, packed)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn faults_are_logged_as_errors() {
        let err = log_and_convert("add_user", DomainError::KeyDerivation("bad length".to_owned()));

        assert_eq!(
            err,
            RegistryAuthError::internal("key derivation failed: bad length")
        );
        assert!(logs_contain("registry_auth call failed"));
    }

    #[test]
    #[traced_test]
    fn verdicts_pass_through_quietly() {
        let err = log_and_convert(
            "authenticate",
            RegistryAuthError::forbidden("bad username/password, access denied").into(),
        );

        assert_eq!(
            err,
            RegistryAuthError::forbidden("bad username/password, access denied")
        );
        assert!(!logs_contain("registry_auth call failed"));
    }
}
