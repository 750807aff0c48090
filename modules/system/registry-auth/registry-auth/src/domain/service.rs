//! Auth service: the provider chain plus the credential codec.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use registry_auth_sdk::{
    AuthProvider, Credentials, PackageAction, PackageSpecProvider, Principal, TokenPayload,
};
use secrecy::SecretString;
use tracing::{info, warn};

use super::builtin::StaticUsersProvider;
use super::chain::{AddUser, AllowAccess, AllowPublish, Authenticate, ProviderChain};
use super::cipher::CredentialCipher;
use super::error::DomainError;
use super::packages::ConfigPackageSpecs;
use super::token::TokenCodec;
use crate::config::RegistryAuthConfig;

/// Registry auth service.
///
/// Owns the provider chain, the package-rule lookup, and the crypto
/// components. The secret is fixed for the lifetime of the service.
pub struct Service {
    chain: ProviderChain,
    packages: Arc<dyn PackageSpecProvider>,
    tokens: TokenCodec,
    cipher: CredentialCipher,
    token_expire_secs: u64,
}

impl Service {
    /// Build the service with package rules taken from `cfg.packages`.
    ///
    /// `providers` is the ordered list of configured providers; the static
    /// credential list and the deny-all fallback are added around it.
    ///
    /// # Errors
    ///
    /// `InvalidPackagePattern` or `KeyDerivation`.
    pub fn from_config(
        cfg: &RegistryAuthConfig,
        providers: Vec<Arc<dyn AuthProvider>>,
    ) -> Result<Self, DomainError> {
        let packages = ConfigPackageSpecs::from_rules(&cfg.packages)?;
        Self::new(cfg, providers, Arc::new(packages))
    }

    /// Build the service with an external package-rule lookup.
    ///
    /// # Errors
    ///
    /// `KeyDerivation` if the credential key cannot be derived.
    pub fn new(
        cfg: &RegistryAuthConfig,
        providers: Vec<Arc<dyn AuthProvider>>,
        packages: Arc<dyn PackageSpecProvider>,
    ) -> Result<Self, DomainError> {
        let secret = resolve_secret(cfg);
        let chain = ProviderChain::new(StaticUsersProvider::from_config(&cfg.users), providers);
        info!(
            providers = ?chain.provider_names().collect::<Vec<_>>(),
            token_expire_secs = cfg.token_expire_secs,
            "Registry auth chain ready"
        );

        Ok(Self {
            chain,
            packages,
            cipher: CredentialCipher::new(&secret)?,
            tokens: TokenCodec::new(secret),
            token_expire_secs: cfg.token_expire_secs,
        })
    }

    /// Resolve a user/password pair through the chain.
    ///
    /// # Errors
    ///
    /// The first provider error; deny-all answers `Forbidden`.
    #[tracing::instrument(skip_all, fields(user = %user))]
    pub async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Principal, DomainError> {
        let groups = self.chain.resolve(&Authenticate { user, password }).await?;
        Ok(Principal::authenticated(user, groups))
    }

    /// Register a user, then log them in with the same credentials.
    ///
    /// # Errors
    ///
    /// The first provider error; deny-all answers `Conflict`.
    #[tracing::instrument(skip_all, fields(user = %user))]
    pub async fn add_user(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Principal, DomainError> {
        self.chain.resolve(&AddUser { user, password }).await?;
        info!("User registered");
        self.authenticate(user, password).await
    }

    /// # Errors
    ///
    /// `Forbidden` when no provider grants read access.
    pub async fn allow_access(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, DomainError> {
        self.allow(PackageAction::Access, package, principal).await
    }

    /// # Errors
    ///
    /// `Forbidden` when no provider grants publish access.
    pub async fn allow_publish(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, DomainError> {
        self.allow(PackageAction::Publish, package, principal).await
    }

    #[tracing::instrument(
        skip_all,
        fields(action = %action, package = %package, user = principal.name())
    )]
    async fn allow(
        &self,
        action: PackageAction,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, DomainError> {
        let mut spec = self.packages.get_package_spec(package);
        package.clone_into(&mut spec.name);

        let allowed = match action {
            PackageAction::Access => {
                self.chain
                    .resolve(&AllowAccess {
                        principal,
                        package: &spec,
                    })
                    .await?
            }
            PackageAction::Publish => {
                self.chain
                    .resolve(&AllowPublish {
                        principal,
                        package: &spec,
                    })
                    .await?
            }
        };
        Ok(allowed)
    }

    /// # Errors
    ///
    /// `Internal` for anonymous principals.
    pub fn issue_token(&self, principal: &Principal) -> Result<String, DomainError> {
        Ok(self.tokens.issue(principal)?)
    }

    /// Validate a token within the configured expiry window.
    ///
    /// # Errors
    ///
    /// `InvalidToken` for malformed, badly signed, or expired tokens.
    pub fn decode_token(&self, token: &str) -> Result<TokenPayload, DomainError> {
        Ok(self.tokens.decode(token, self.token_expire_secs)?)
    }

    /// # Errors
    ///
    /// `Encryption` if the cipher rejects the input.
    pub fn pack_credentials(
        &self,
        user: &str,
        password: &str,
    ) -> Result<String, DomainError> {
        let blob = self.cipher.encrypt(format!("{user}:{password}").as_bytes())?;
        Ok(STANDARD.encode(blob))
    }

    /// Anything that is not valid base64, does not decrypt, or has no `:`
    /// yields `None`.
    #[must_use]
    pub fn unpack_credentials(&self, packed: &str) -> Option<Credentials> {
        let blob = STANDARD.decode(packed).ok()?;
        let plain = String::from_utf8(self.cipher.decrypt(&blob)).ok()?;
        if plain.is_empty() {
            return None;
        }
        Credentials::parse(&plain)
    }
}

fn resolve_secret(cfg: &RegistryAuthConfig) -> SecretString {
    if let Some(secret) = &cfg.secret {
        return secret.clone();
    }
    warn!("No secret configured; generated a random one. Tokens will not survive a restart.");
    let bytes: [u8; 32] = rand::random();
    SecretString::from(hex::encode(bytes))
}
