//! Server configuration: a YAML file overlaid with `REGISTRY_AUTH_` variables.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use registry_auth::RegistryAuthConfig;
use serde::Deserialize;

/// Environment prefix. Nested keys use `__`, e.g. `REGISTRY_AUTH_AUTH__SECRET`.
pub const ENV_PREFIX: &str = "REGISTRY_AUTH_";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4873;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: RegistryAuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load from `path` (if any), then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is missing, or if the file or an override
    /// does not match the schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> anyhow::Result<Self> {
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }
}
