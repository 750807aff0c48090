//! Domain layer for the registry auth module.

pub mod builtin;
pub mod chain;
pub mod cipher;
mod client;
pub mod error;
pub mod packages;
pub mod service;
pub mod token;

pub use chain::ProviderChain;
pub use cipher::CredentialCipher;
pub use error::DomainError;
pub use packages::ConfigPackageSpecs;
pub use service::Service;
pub use token::TokenCodec;
