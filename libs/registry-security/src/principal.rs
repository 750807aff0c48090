use secrecy::SecretString;

use crate::groups::{ANONYMOUS_MARKERS, AUTHENTICATED_MARKERS, is_synthetic};

/// `Principal` is the resolved identity attached to a registry request.
///
/// Built by the credential middlewares (or the auth service directly) and
/// carried through the request lifecycle. Package rules are evaluated against
/// [`Principal::groups`], which always contains the synthetic markers that
/// apply to the principal.
///
/// Serialize-only: a principal is built through [`Principal::anonymous`] or
/// [`Principal::authenticated`] so its groups always carry the markers.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Principal {
    /// User name. `None` for anonymous callers.
    name: Option<String>,
    /// Effective groups: real groups followed by synthetic markers, deduplicated.
    groups: Vec<String>,
    /// Groups granted by a provider. Never contains synthetic markers.
    real_groups: Vec<String>,
    /// Diagnostic message recorded when credential resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Raw bearer token the principal was decoded from. Never serialized.
    #[serde(skip)]
    token: Option<SecretString>,
}

impl Principal {
    /// Create an anonymous principal.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            name: None,
            groups: ANONYMOUS_MARKERS.iter().map(|g| (*g).to_owned()).collect(),
            real_groups: Vec::new(),
            error: None,
            token: None,
        }
    }

    /// Create an authenticated principal from the groups a provider granted.
    ///
    /// Synthetic markers supplied by the provider are dropped from
    /// `real_groups`; the canonical markers are appended to `groups`.
    #[must_use]
    pub fn authenticated(name: impl Into<String>, real_groups: Vec<String>) -> Self {
        let real_groups: Vec<String> = real_groups
            .into_iter()
            .filter(|g| !is_synthetic(g))
            .collect();

        let mut groups: Vec<String> =
            Vec::with_capacity(real_groups.len() + AUTHENTICATED_MARKERS.len());
        for group in real_groups
            .iter()
            .map(String::as_str)
            .chain(AUTHENTICATED_MARKERS.iter().copied())
        {
            if !groups.iter().any(|g| g == group) {
                groups.push(group.to_owned());
            }
        }

        Self {
            name: Some(name.into()),
            groups,
            real_groups,
            error: None,
            token: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[must_use]
    pub fn real_groups(&self) -> &[String] {
        &self.real_groups
    }

    /// Returns `true` if any of `acl` is one of this principal's groups.
    #[must_use]
    pub fn in_any_group<'a, I>(&self, acl: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        acl.into_iter().any(|g| self.groups.contains(g))
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Record why credential resolution failed.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Attach the raw token the principal was decoded from.
    pub fn set_token(&mut self, token: impl Into<SecretString>) {
        self.token = Some(token.into());
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}
