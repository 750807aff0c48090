//! Synthetic group markers.
//!
//! These pseudo-groups are added to every principal so package rules can
//! address broad policy tiers without naming users. The `@` and bare forms
//! are legacy spellings still found in older registry configs.

pub const ALL: &str = "$all";
pub const ANONYMOUS: &str = "$anonymous";
pub const AUTHENTICATED: &str = "$authenticated";

pub const LEGACY_ALL: &str = "@all";
pub const LEGACY_ANONYMOUS: &str = "@anonymous";
pub const LEGACY_AUTHENTICATED: &str = "@authenticated";
pub const BARE_ALL: &str = "all";

/// Markers carried by every anonymous principal, in order.
pub const ANONYMOUS_MARKERS: &[&str] = &[ALL, ANONYMOUS, LEGACY_ALL, LEGACY_ANONYMOUS, BARE_ALL];

/// Markers appended after the real groups of an authenticated principal.
pub const AUTHENTICATED_MARKERS: &[&str] = &[
    ALL,
    AUTHENTICATED,
    LEGACY_ALL,
    LEGACY_AUTHENTICATED,
    BARE_ALL,
];

/// Returns `true` if `group` is one of the synthetic markers.
#[must_use]
pub fn is_synthetic(group: &str) -> bool {
    ANONYMOUS_MARKERS.contains(&group) || AUTHENTICATED_MARKERS.contains(&group)
}
