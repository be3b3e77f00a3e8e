//! Configuration management for `notepub.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `[site]`   | Site metadata (title, description, language)    |
//! | `[remote]` | Note store endpoint and developer token         |
//! | `[store]`  | Mirror data directory and site output directory |
//! | `[sync]`   | Page size and convergence count slack           |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Clippings"
//!
//! [remote]
//! endpoint = "https://notes.example.com/api"
//! token = "S=s1:U=1234:E=..."
//!
//! [store]
//! data = "data"
//! output = "public"
//!
//! [sync]
//! page_size = 49
//! ```

pub mod defaults;
mod error;
mod remote;
mod site;
mod store;
mod sync;

pub use error::ConfigError;
pub use remote::RemoteSection;
pub use site::SiteSection;
pub use store::StoreSection;
pub use sync::SyncSection;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing notepub.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Project root directory (usually set via CLI `--root`)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub site: SiteSection,

    /// Remote note store access
    #[serde(default)]
    pub remote: RemoteSection,

    /// Mirror and output paths
    #[serde(default)]
    pub store: StoreSection,

    /// Sync engine tuning
    #[serde(default)]
    pub sync: SyncSection,
}

impl AppConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Apply CLI overrides and resolve all paths against the project root.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = Self::normalize_path(&root);

        Self::update_option(&mut self.store.data, cli.data.as_ref());
        Self::update_option(&mut self.store.output, cli.output.as_ref());

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.store.data = Self::normalize_path(&root.join(&self.store.data));
        self.store.output = Self::normalize_path(&root.join(&self.store.output));
        self.root = root;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command.
    ///
    /// Remote access fields are only required by commands that talk to the
    /// remote store (`collect` / `refresh`).
    pub fn validate(&self, needs_remote: bool) -> Result<()> {
        if needs_remote {
            if self.remote.endpoint.is_empty() {
                bail!(ConfigError::Validation(
                    "[remote.endpoint] is required for collect/refresh".into()
                ));
            }
            if !self.remote.endpoint.starts_with("http") {
                bail!(ConfigError::Validation(
                    "[remote.endpoint] must start with http:// or https://".into()
                ));
            }
            if self.remote.token.is_empty() {
                bail!(ConfigError::Validation(
                    "[remote.token] is required for collect/refresh".into()
                ));
            }
        }

        if self.sync.page_size == 0 {
            bail!(ConfigError::Validation(
                "[sync.page_size] must be greater than zero".into()
            ));
        }

        Ok(())
    }

    /// Mirror data directory (absolute after `update_with_cli`).
    pub fn data_dir(&self) -> &Path {
        &self.store.data
    }

    /// Rendered site output directory (absolute after `update_with_cli`).
    pub fn output_dir(&self) -> &Path {
        &self.store.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.sync.page_size, 49);
        assert_eq!(config.sync.count_slack, 1);
        assert_eq!(config.store.data, PathBuf::from("data"));
        assert_eq!(config.store.output, PathBuf::from("public"));
        assert_eq!(config.site.title, "notepub");
    }

    #[test]
    fn test_parse_full() {
        let toml = r#"
            [site]
            title = "Clippings"
            description = "stuff I clipped"

            [remote]
            endpoint = "https://notes.example.com/api"
            token = "secret"

            [store]
            data = "mirror"
            output = "out"

            [sync]
            page_size = 10
            count_slack = 0
        "#;
        let config = AppConfig::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Clippings");
        assert_eq!(config.remote.endpoint, "https://notes.example.com/api");
        assert_eq!(config.store.data, PathBuf::from("mirror"));
        assert_eq!(config.sync.page_size, 10);
        assert_eq!(config.sync.count_slack, 0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
            [site]
            titel = "typo"
        "#;
        assert!(AppConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_validate_requires_remote_for_collect() {
        let config = AppConfig::default();
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err());

        let mut config = AppConfig::default();
        config.remote.endpoint = "https://notes.example.com/api".into();
        config.remote.token = "secret".into();
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = AppConfig::default();
        config.sync.page_size = 0;
        assert!(config.validate(false).is_err());
    }
}
