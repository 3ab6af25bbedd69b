//! Startup configuration read from the environment.
//!
//! Everything environment-dependent is read once into `ResolverConfig` and
//! passed along explicitly. `from_lookup` takes the variable source as a
//! closure so tests never have to mutate the process environment.

use crate::host::HostEnvironment;
use crate::table::CategoryResolver;
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

/// Path to a department table that replaces the built-in one.
pub const TABLE_ENV: &str = "DEPTCAT_TABLE";
/// Label applied by consumers when a department is unknown.
pub const FALLBACK_ENV: &str = "DEPTCAT_FALLBACK";
/// `shared` to publish into the process namespace, `detached` (default) otherwise.
pub const HOST_ENV: &str = "DEPTCAT_HOST";

pub const DEFAULT_FALLBACK_LABEL: &str = "Uncategorized";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum HostMode {
    #[default]
    Detached,
    Shared,
}

impl HostMode {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "detached" | "none" => Ok(HostMode::Detached),
            "shared" => Ok(HostMode::Shared),
            other => bail!("{HOST_ENV} must be 'shared' or 'detached', got '{other}'"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolverConfig {
    pub table_path: Option<PathBuf>,
    pub fallback_label: String,
    pub host_mode: HostMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            host_mode: HostMode::default(),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(path) = non_empty(TABLE_ENV) {
            config.table_path = Some(PathBuf::from(path));
        }
        if let Some(label) = non_empty(FALLBACK_ENV) {
            config.fallback_label = label;
        }
        if let Some(mode) = non_empty(HOST_ENV) {
            config.host_mode = HostMode::parse(mode.trim())?;
        }
        Ok(config)
    }

    /// Construct the resolver named by this config (built-in table unless overridden).
    pub fn load_resolver(&self) -> Result<CategoryResolver> {
        match &self.table_path {
            Some(path) => CategoryResolver::load(path)
                .with_context(|| format!("loading table from {TABLE_ENV}={}", path.display())),
            None => CategoryResolver::builtin(),
        }
    }

    /// Host capability implied by `host_mode`.
    pub fn host_environment(&self) -> HostEnvironment {
        match self.host_mode {
            HostMode::Detached => HostEnvironment::Detached,
            HostMode::Shared => HostEnvironment::process(),
        }
    }
}
