//! Registry Auth SDK
//!
//! This crate provides the public API for the `registry_auth` module:
//!
//! - [`RegistryAuthClient`] - Public API trait for consumers (middlewares, handlers)
//! - [`AuthProvider`] - Provider contract consulted by the authorization chain
//! - [`PackageSpecProvider`] - Package access-rule lookup collaborator
//! - [`PackageAccess`], [`TokenPayload`], [`Credentials`] - Models
//! - [`RegistryAuthError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use registry_auth_sdk::RegistryAuthClient;
//!
//! let principal = auth.authenticate("alice", "pw").await?;
//! auth.allow_publish("left-pad", &principal).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod package_spec;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::RegistryAuthClient;
pub use error::RegistryAuthError;
pub use models::{Credentials, PackageAccess, PackageAction, TokenPayload};
pub use package_spec::PackageSpecProvider;
pub use plugin_api::{AuthProvider, Capabilities, Capability};
pub use registry_security::Principal;
