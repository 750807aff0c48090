#![allow(clippy::unwrap_used, clippy::expect_used)]

use registry_security::Principal;
use registry_security::groups::{self, ANONYMOUS_MARKERS, AUTHENTICATED_MARKERS};

#[test]
fn anonymous_never_carries_a_personal_name() {
    let p = Principal::anonymous();

    for group in p.groups() {
        assert!(
            groups::is_synthetic(group),
            "anonymous principal carries non-synthetic group {group}"
        );
    }
    assert_eq!(p.groups().len(), ANONYMOUS_MARKERS.len());
}

#[test]
fn authenticated_user_with_own_group() {
    // The static credential list grants the user name as the only real group.
    let p = Principal::authenticated("alice", vec!["alice".to_owned()]);

    assert!(p.groups().iter().any(|g| g == "alice"));
    assert!(p.groups().iter().any(|g| g == groups::ALL));
    assert!(p.groups().iter().any(|g| g == groups::AUTHENTICATED));
    assert!(!p.groups().iter().any(|g| g == groups::ANONYMOUS));
    assert_eq!(p.groups().len(), 1 + AUTHENTICATED_MARKERS.len());
}

#[test]
fn markers_are_synthetic() {
    for marker in ANONYMOUS_MARKERS.iter().chain(AUTHENTICATED_MARKERS) {
        assert!(groups::is_synthetic(marker));
    }
    assert!(!groups::is_synthetic("dev"));
}
