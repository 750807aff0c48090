//! Domain models for the registry auth module.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Package action a principal asks permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageAction {
    Access,
    Publish,
}

impl PackageAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access-control lists for one package, as produced by the package-spec
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageAccess {
    /// Package name. Filled in by the auth service before the chain runs.
    #[serde(default)]
    pub name: String,
    /// Groups allowed to read the package.
    #[serde(default)]
    pub access: Vec<String>,
    /// Groups allowed to publish the package.
    #[serde(default)]
    pub publish: Vec<String>,
}

impl PackageAccess {
    /// Groups authorized for `action`.
    #[must_use]
    pub fn acl(&self, action: PackageAction) -> &[String] {
        match action {
            PackageAction::Access => &self.access,
            PackageAction::Publish => &self.publish,
        }
    }
}

/// Payload carried inside a signed token.
///
/// Field names are part of the wire format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// User name.
    pub u: String,
    /// Real groups. Omitted when the principal has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<Vec<String>>,
    /// Issue time, unix seconds.
    pub t: i64,
}

impl TokenPayload {
    /// Real groups, empty when the token carries none.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        self.g.as_deref().unwrap_or_default()
    }
}

/// A user/password pair recovered from an encrypted credential blob.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: SecretString,
}

impl Credentials {
    /// Split `"user:pass"` at the first `:`.
    ///
    /// Returns `None` when there is no separator.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (user, password) = raw.split_once(':')?;
        Some(Self {
            user: user.to_owned(),
            password: SecretString::from(password.to_owned()),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn payload_omits_empty_groups() {
        let payload = TokenPayload {
            u: "alice".to_owned(),
            g: None,
            t: 1_700_000_000,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"u":"alice","t":1700000000}"#);
        assert!(payload.groups().is_empty());
    }

    #[test]
    fn payload_field_order_is_u_g_t() {
        let payload = TokenPayload {
            u: "carol".to_owned(),
            g: Some(vec!["dev".to_owned()]),
            t: 42,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"u":"carol","g":["dev"],"t":42}"#);
    }

    #[test]
    fn credentials_split_at_first_colon() {
        let creds = Credentials::parse("bob:se:cret").unwrap();
        assert_eq!(creds.user, "bob");
        assert_eq!(creds.password.expose_secret(), "se:cret");

        assert!(Credentials::parse("no-separator").is_none());
    }

    #[test]
    fn acl_selects_list_by_action() {
        let pkg = PackageAccess {
            name: "pkg".to_owned(),
            access: vec!["$all".to_owned()],
            publish: vec!["$authenticated".to_owned()],
        };

        assert_eq!(pkg.acl(PackageAction::Access), &["$all"]);
        assert_eq!(pkg.acl(PackageAction::Publish), &["$authenticated"]);
        assert_eq!(PackageAction::Publish.to_string(), "publish");
    }
}
