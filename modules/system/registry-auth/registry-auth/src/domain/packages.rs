//! Config-backed package access rules.

use glob::Pattern;
use registry_auth_sdk::{PackageAccess, PackageSpecProvider};

use super::error::DomainError;
use crate::config::PackageRule;

/// Looks up package ACLs in the configured rule list. First match wins.
pub struct ConfigPackageSpecs {
    rules: Vec<(Pattern, PackageAccess)>,
}

impl ConfigPackageSpecs {
    /// Compile the configured rules.
    ///
    /// # Errors
    ///
    /// `InvalidPackagePattern` if a pattern is not a valid glob.
    pub fn from_rules(rules: &[PackageRule]) -> Result<Self, DomainError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = Pattern::new(&rule.pattern).map_err(|e| {
                    DomainError::InvalidPackagePattern {
                        pattern: rule.pattern.clone(),
                        reason: e.msg.to_owned(),
                    }
                })?;
                let access = PackageAccess {
                    name: String::new(),
                    access: rule.access.clone(),
                    publish: rule.publish.clone(),
                };
                Ok((pattern, access))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self { rules })
    }
}

impl PackageSpecProvider for ConfigPackageSpecs {
    fn get_package_spec(&self, name: &str) -> PackageAccess {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(name))
            .map(|(_, access)| access.clone())
            .unwrap_or_default()
    }
}
