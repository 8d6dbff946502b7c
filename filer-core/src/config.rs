//! src/config.rs
//! ============================================================================
//! # Config: User Settings Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config directory using
//! the [`directories`](https://docs.rs/directories) crate.
//!
//! ## Features
//! - XDG-compliant config discovery (Linux, macOS, Windows)
//! - Every field optional: missing keys fall back to defaults
//! - Async load/save for smooth integration with Tokio
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! let panes = config.open_panes(&LocalFilesystem, home.clone(), home)?;
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

use crate::{
    error::CoreResult,
    fs::{dir_scanner::FilesystemProvider, object_info::DEFAULT_DATE_FORMAT},
    logging::LoggingConfig,
    model::{
        dual_pane::{DualPaneController, LayoutMode},
        fs_state::PaneState,
        sort::{SortDirection, SortKey},
    },
};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "filer";
const APPLICATION: &str = "Filer";
const CONFIG_FILE: &str = "config.toml";

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_hidden: bool,

    /// Sort applied to freshly opened panes.
    pub default_sort: SortKey,

    pub default_direction: SortDirection,

    pub layout: LayoutMode,

    /// `chrono` strftime pattern for the modified column.
    pub date_format: String,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: false,
            default_sort: SortKey::Name,
            default_direction: SortDirection::Ascending,
            layout: LayoutMode::Dual,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the app config dir, or returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/Filer/config.toml`
    /// (Linux), or equivalent on Windows/macOS. A missing file is not
    /// created.
    pub async fn load() -> anyhow::Result<Self> {
        Self::load_or_default(&Self::config_path()?).await
    }

    /// Like [`Config::load_from`], but a missing file gives defaults.
    /// Failing to check for the file (e.g. permissions) is an error.
    pub async fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let exists = TokioFs::try_exists(path)
            .await
            .with_context(|| format!("Failed to check config file: {}", path.display()))?;

        if exists {
            Self::load_from(path).await
        } else {
            info!("No config file found at {}, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        info!("Loading config from {}", path.display());

        let text = TokioFs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Saves config to the app config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        TokioFs::write(path, toml_str)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// A pane at `cwd` carrying the configured sort and hidden-file filter.
    /// Nothing is listed yet.
    #[must_use]
    pub fn pane_defaults(&self, cwd: PathBuf) -> PaneState {
        PaneState::new(cwd)
            .with_sort(self.default_sort, self.default_direction)
            .with_show_hidden(self.show_hidden)
    }

    /// Open both panes and apply the configured layout.
    ///
    /// # Errors
    /// The provider's error for either starting directory.
    pub fn open_panes(
        &self,
        provider: &dyn FilesystemProvider,
        left: PathBuf,
        right: PathBuf,
    ) -> CoreResult<DualPaneController> {
        let mut left_pane = self.pane_defaults(left);
        left_pane.refresh(provider)?;

        let mut right_pane = self.pane_defaults(right);
        right_pane.refresh(provider)?;

        Ok(DualPaneController::new(left_pane, right_pane).with_layout(self.layout))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.date_format.is_empty() {
            bail!("date_format must not be empty");
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("date_format is not a valid strftime pattern: {:?}", self.date_format);
        }

        self.logging.validate()
    }
}
