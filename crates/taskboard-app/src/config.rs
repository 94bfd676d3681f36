use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::seed::{SeedData, sample_data};

const CONFIG_DIR: &str = ".taskboard";
const CONFIG_FILE: &str = "config.toml";

/// Top-level project configuration loaded from `.taskboard/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// `[dashboard]` section.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// `[auth]` section.
    #[serde(default)]
    pub auth: AuthConfig,
    /// `[seed]` section.
    #[serde(default)]
    pub seed: SeedConfig,
    /// Directory the configuration was read from; relative seed paths resolve here.
    #[serde(skip)]
    root: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load configuration from the nearest ancestor of `start` that holds a `.taskboard`
    /// directory. Falls back to defaults when none exists.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let start = start.as_ref();
        for dir in start.ancestors() {
            if dir.join(CONFIG_DIR).is_dir() {
                return Self::from_dir(dir);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a known project directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self {
                root: Some(dir.to_path_buf()),
                ..Self::default()
            });
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        config.root = Some(dir.to_path_buf());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dashboard.recent_limit == 0 {
            bail!("dashboard.recent_limit must be greater than zero");
        }
        if self.auth.username.trim().is_empty() {
            bail!("auth.username must not be empty");
        }
        Ok(())
    }

    /// Seed file path after resolving it against the project directory.
    #[must_use]
    pub fn seed_path(&self) -> Option<PathBuf> {
        let path = self.seed.path.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        Some(self.root.as_ref().map_or_else(|| path.clone(), |root| root.join(path)))
    }

    /// Dataset for a new session: the configured seed file, or the built-in sample.
    pub fn load_seed(&self) -> Result<SeedData> {
        match self.seed_path() {
            Some(path) => SeedData::from_json_file(&path)
                .with_context(|| format!("failed to load seed data from {}", path.display())),
            None => Ok(sample_data()),
        }
    }
}

/// Dashboard presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Number of tasks in the recent list.
    #[serde(default = "DashboardConfig::default_recent_limit")]
    pub recent_limit: usize,
}

impl DashboardConfig {
    const fn default_recent_limit() -> usize {
        5
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: Self::default_recent_limit(),
        }
    }
}

/// Credentials accepted by the mock login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Accepted login name. Must not be blank.
    #[serde(default = "AuthConfig::default_username")]
    pub username: String,
    /// Accepted password.
    #[serde(default = "AuthConfig::default_password")]
    pub password: String,
}

impl AuthConfig {
    fn default_username() -> String {
        "john_doe".into()
    }

    fn default_password() -> String {
        "password123".into()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: Self::default_username(),
            password: Self::default_password(),
        }
    }
}

/// Where the session's data comes from.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    /// JSON seed file. The built-in sample is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
