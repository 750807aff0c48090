//! Public API trait for the registry auth module.
//!
//! The credential middlewares and registry handlers consume this trait; the
//! module's service implements it on top of the authorization chain and the
//! credential codec.

use async_trait::async_trait;
use registry_security::Principal;

use crate::error::RegistryAuthError;
use crate::models::{Credentials, TokenPayload};

/// Public API trait for registry authentication and authorization.
///
/// ```ignore
/// let principal = auth.authenticate("alice", "pw").await?;
/// let token = auth.issue_token(&principal)?;
/// auth.allow_access("left-pad", &principal).await?;
/// ```
#[async_trait]
pub trait RegistryAuthClient: Send + Sync {
    /// Resolve a user/password pair to an authenticated principal.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if no provider accepts the credentials
    /// - any error a provider raised
    async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Principal, RegistryAuthError>;

    /// Register a user and log them in.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the user exists or registration is disabled
    /// - any error a provider raised, including from the follow-up login
    async fn add_user(&self, user: &str, password: &str) -> Result<Principal, RegistryAuthError>;

    /// Check read permission on `package`.
    ///
    /// # Errors
    ///
    /// `Forbidden` naming the principal when access is denied.
    async fn allow_access(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, RegistryAuthError>;

    /// Check publish permission on `package`.
    ///
    /// # Errors
    ///
    /// `Forbidden` naming the principal when publishing is denied.
    async fn allow_publish(
        &self,
        package: &str,
        principal: &Principal,
    ) -> Result<bool, RegistryAuthError>;

    /// Issue a signed bearer token for a named principal.
    ///
    /// # Errors
    ///
    /// `Internal` for anonymous principals.
    fn issue_token(&self, principal: &Principal) -> Result<String, RegistryAuthError>;

    /// Validate a signed bearer token.
    ///
    /// # Errors
    ///
    /// `InvalidToken` if the token is malformed, badly signed, or expired.
    fn decode_token(&self, token: &str) -> Result<TokenPayload, RegistryAuthError>;

    /// Encrypt `"user:password"` and base64-encode it for a cookie or an
    /// encrypted bearer value.
    ///
    /// # Errors
    ///
    /// `Internal` if encryption fails.
    fn pack_credentials(&self, user: &str, password: &str) -> Result<String, RegistryAuthError>;

    /// Reverse [`Self::pack_credentials`]. Undecodable input yields `None`.
    fn unpack_credentials(&self, packed: &str) -> Option<Credentials>;
}
