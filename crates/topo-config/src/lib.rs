//! # topo-config
//!
//! Layered configuration loading for topo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TOPO_*` prefix, `__` as separator)
//! 2. Project-level `.topo/config.toml`
//! 3. User-level `~/.config/topo/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `TOPO_REPO__OWNER` -> `repo.owner`,
//! `TOPO_EXTRACTOR__TIMEOUT_SECS` -> `extractor.timeout_secs`, etc.
//!
//! In CI, `GITHUB_TOKEN` and `GITHUB_REPOSITORY` fill `github.token`,
//! `repo.owner` and `repo.name` when they are not configured explicitly.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use topo_config::TopoConfig;
//!
//! let config = TopoConfig::load_with_dotenv(Path::new(".")).expect("config");
//! println!("snapshots live at <app>/{}", config.layout.snapshot_path);
//! ```

mod classify;
mod error;
mod extractor;
mod layout;
mod repo;
mod theme;

pub use classify::{ClassifyConfig, ClassifyRule};
pub use error::ConfigError;
pub use extractor::{ExtractorConfig, FILE_PLACEHOLDER};
pub use layout::LayoutConfig;
pub use repo::{GithubConfig, RepoConfig};
pub use theme::{CategoryStyle, EdgeStyle, NodeShape, ThemeConfig, ThemeVariables};

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TopoConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub repo: RepoConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

impl TopoConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Does NOT call `dotenvy` -- use [`TopoConfig::load_with_dotenv`] if you
    /// need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value fails
    /// validation.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = Self::figment(project_root).extract()?;
        config.fill_from_ci_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `<project_root>/.env`, if present.
    ///
    /// # Errors
    ///
    /// Same as [`TopoConfig::load`].
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load(project_root)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".topo").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TOPO_").split("__"))
    }

    /// Fill unset CI-provided values (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`).
    pub fn fill_from_ci_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.github.token.is_empty() {
            if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
                self.github.token = token;
            }
        }
        if !self.repo.is_configured() {
            if let Some(slug) = lookup("GITHUB_REPOSITORY") {
                if let Some((owner, name)) = slug.split_once('/') {
                    if self.repo.owner.is_empty() {
                        self.repo.owner = owner.to_string();
                    }
                    if self.repo.name.is_empty() {
                        self.repo.name = name.to_string();
                    }
                }
            }
        }
    }

    /// Check values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extractor.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extractor.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.theme.has_valid_direction() {
            return Err(ConfigError::InvalidValue {
                field: "theme.direction".to_string(),
                reason: format!(
                    "'{}' is not one of LR, RL, TB, TD, BT",
                    self.theme.direction
                ),
            });
        }
        if let Some(rule) = self
            .classify
            .effective_rules()
            .find(|rule| rule.pattern.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "classify.rules".to_string(),
                reason: format!("empty pattern for category '{}'", rule.category),
            });
        }
        if self.layout.definition_file.contains('/') {
            return Err(ConfigError::InvalidValue {
                field: "layout.definition_file".to_string(),
                reason: "must be a file name, not a path".to_string(),
            });
        }
        Ok(())
    }

    /// Error unless repository coordinates are set (needed for source links).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the `repo` section.
    pub fn require_repo(&self) -> Result<&RepoConfig, ConfigError> {
        if self.repo.is_configured() {
            Ok(&self.repo)
        } else {
            Err(ConfigError::NotConfigured {
                section: "repo".to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("topo").join("config.toml"))
    }
}
