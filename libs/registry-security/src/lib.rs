#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod groups;
pub mod principal;

pub use principal::Principal;
