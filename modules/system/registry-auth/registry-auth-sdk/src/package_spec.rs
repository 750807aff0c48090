//! Package access-rule lookup.

use crate::models::PackageAccess;

/// Supplies the access-control lists for a package.
///
/// The auth service fills in [`PackageAccess::name`] itself, so
/// implementations may leave it empty. Packages with no matching rule
/// should yield empty lists, which the deny-all provider rejects.
pub trait PackageSpecProvider: Send + Sync {
    fn get_package_spec(&self, name: &str) -> PackageAccess;
}
