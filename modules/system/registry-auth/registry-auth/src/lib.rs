//! Registry Auth Module
//!
//! Decides who the caller of a package registry is and what they may do.
//! The [`domain::Service`] runs an ordered chain of capability providers
//! (a static credential list first, configured plugins next, a deny-all
//! fallback last) and owns the signed-token codec and the credential cipher.
//! The [`api::rest`] layer extracts credentials from requests and attaches
//! the resolved principal.
//!
//! The service implements [`registry_auth_sdk::RegistryAuthClient`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;

pub use config::RegistryAuthConfig;
pub use domain::Service;
