//! Configuration for the registry auth module.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::domain::token::DEFAULT_EXPIRE_SECS;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryAuthConfig {
    /// Key for token signatures and credential encryption.
    ///
    /// When absent a random secret is generated at startup, so tokens and
    /// packed credentials do not survive a restart.
    pub secret: Option<SecretString>,

    /// Validity window of signed tokens, in seconds.
    pub token_expire_secs: u64,

    /// Static credential list consulted before any provider.
    pub users: HashMap<String, UserEntry>,

    /// Package access rules. The first matching pattern wins.
    pub packages: Vec<PackageRule>,
}

impl Default for RegistryAuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_expire_secs: DEFAULT_EXPIRE_SECS,
            users: HashMap::new(),
            packages: default_package_rules(),
        }
    }
}

/// Static credential list entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEntry {
    /// Hex SHA-1 digest of the password.
    pub password: String,
}

/// Access rule for packages whose name matches `pattern`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageRule {
    /// Glob pattern, e.g. `@scope/*` or `**`.
    pub pattern: String,

    /// Groups allowed to read. A list or a space-separated string.
    #[serde(default, alias = "allow_access", deserialize_with = "group_list")]
    pub access: Vec<String>,

    /// Groups allowed to publish. A list or a space-separated string.
    #[serde(default, alias = "allow_publish", deserialize_with = "group_list")]
    pub publish: Vec<String>,
}

impl PackageRule {
    fn new(pattern: &str, access: &str, publish: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            access: vec![access.to_owned()],
            publish: vec![publish.to_owned()],
        }
    }
}

/// Everyone reads, authenticated users publish.
fn default_package_rules() -> Vec<PackageRule> {
    vec![
        PackageRule::new("@*/*", "$all", "$authenticated"),
        PackageRule::new("**", "$all", "$authenticated"),
    ]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupList {
    Joined(String),
    List(Vec<String>),
}

fn group_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match GroupList::deserialize(deserializer)? {
        GroupList::Joined(s) => s.split_whitespace().map(str::to_owned).collect(),
        GroupList::List(v) => v,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_allow_everyone_to_read() {
        let cfg = RegistryAuthConfig::default();

        assert!(cfg.secret.is_none());
        assert_eq!(cfg.token_expire_secs, 86_400);
        assert_eq!(cfg.packages.len(), 2);
        assert_eq!(cfg.packages[1].pattern, "**");
        assert_eq!(cfg.packages[1].access, vec!["$all"]);
        assert_eq!(cfg.packages[1].publish, vec!["$authenticated"]);
    }

    #[test]
    fn group_lists_accept_strings_and_arrays() {
        let cfg: RegistryAuthConfig = serde_json::from_value(json!({
            "secret": "s3cr3t",
            "users": { "alice": { "password": "abc" } },
            "packages": [
                { "pattern": "private-*", "access": "dev ops", "publish": ["ops"] },
                { "pattern": "**", "allow_access": "$all" }
            ]
        }))
        .unwrap();

        assert_eq!(
            cfg.secret.as_ref().map(ExposeSecret::expose_secret),
            Some("s3cr3t")
        );
        assert_eq!(cfg.users["alice"].password, "abc");
        assert_eq!(cfg.packages[0].access, vec!["dev", "ops"]);
        assert_eq!(cfg.packages[0].publish, vec!["ops"]);
        assert_eq!(cfg.packages[1].access, vec!["$all"]);
        assert!(cfg.packages[1].publish.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RegistryAuthConfig, _> =
            serde_json::from_value(json!({ "max_users": 10 }));
        assert!(result.is_err());
    }
}
