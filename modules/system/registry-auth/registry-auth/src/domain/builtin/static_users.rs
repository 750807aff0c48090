//! Static credential list, always first in the chain.

use std::collections::HashMap;

use async_trait::async_trait;
use registry_auth_sdk::{AuthProvider, Capabilities, Capability, RegistryAuthError};
use sha1::{Digest, Sha1};

use crate::config::UserEntry;

/// Authenticates users listed in the module config.
///
/// Passwords are stored as unsalted hex SHA-1 digests, the format existing
/// registry configs use.
pub struct StaticUsersProvider {
    users: HashMap<String, String>,
}

impl StaticUsersProvider {
    #[must_use]
    pub fn from_config(users: &HashMap<String, UserEntry>) -> Self {
        Self {
            users: users
                .iter()
                .map(|(name, entry)| (name.clone(), entry.password.to_ascii_lowercase()))
                .collect(),
        }
    }
}

/// Hex SHA-1 digest of `password`.
#[must_use]
pub fn sha1_hex(password: &str) -> String {
    hex::encode(Sha1::digest(password.as_bytes()))
}

#[async_trait]
impl AuthProvider for StaticUsersProvider {
    fn name(&self) -> &'static str {
        "static-users"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
            .with(Capability::Authenticate)
            .with(Capability::AddUser)
    }

    async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Option<Vec<String>>, RegistryAuthError> {
        let matches = self
            .users
            .get(user)
            .is_some_and(|digest| *digest == sha1_hex(password));
        Ok(matches.then(|| vec![user.to_owned()]))
    }

    async fn add_user(&self, user: &str, _password: &str) -> Result<bool, RegistryAuthError> {
        if self.users.contains_key(user) {
            return Err(RegistryAuthError::conflict("this user already exists"));
        }
        Ok(false)
    }
}
