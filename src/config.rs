//! Configuration file handling.
//!
//! The configuration file is stored at `$SALES_HOME/config.json` and holds the URL of the Google
//! Sheet that the sales export lives in, along with brand display names that extend or replace
//! the built-in table.

use crate::model::BrandNames;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "sales";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SALES_HOME` and from there it loads `$SALES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    /// Whether `config_file` exists on disk. A default config is never written back.
    persisted: bool,
}

impl Config {
    /// Creates the home directory if needed and writes an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the sales home, e.g. `$HOME/sales`
    /// - `sheet_url` - The URL of the Google Sheet holding the sales export, may be empty.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, sheet_url: &str) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the sales home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "The config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile {
            sheet_url: sheet_url.trim().to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            persisted: true,
        })
    }

    /// This will
    /// - validate that `sales_home` exists and that the config file exists
    /// - load and validate the config file
    pub async fn load(sales_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = sales_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The sales home directory is missing, run 'sales init' to create it")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            persisted: true,
        })
    }

    /// Loads the config if `$SALES_HOME/config.json` exists, otherwise uses default settings that
    /// are held in memory only. This lets reports run against `--input` or `--sample` without
    /// `sales init`.
    pub async fn load_or_default(sales_home: impl Into<PathBuf>) -> Result<Self> {
        let root = sales_home.into();
        if root.join(CONFIG_JSON).is_file() {
            return Self::load(root).await;
        }
        debug!(
            "No config file in '{}', using default settings",
            root.display()
        );
        Ok(Self {
            config_path: root.join(CONFIG_JSON),
            root,
            config_file: ConfigFile::default(),
            persisted: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether this config was loaded from, or written to, disk.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// The configured sheet URL, `None` when it is empty.
    pub fn sheet_url(&self) -> Option<&str> {
        Some(self.config_file.sheet_url.as_str()).filter(|s| !s.is_empty())
    }

    /// The built-in brand names with the overrides from the config file applied.
    pub fn brand_names(&self) -> BrandNames {
        BrandNames::with_overrides(&self.config_file.brand_names)
    }

    /// Saves `sheet_url` as the configured sheet after it was fetched successfully. Does nothing
    /// when the URL is unchanged or when there is no config file to write to.
    pub async fn remember_sheet_url(&mut self, sheet_url: &str) -> Result<()> {
        let sheet_url = sheet_url.trim();
        if self.config_file.sheet_url == sheet_url {
            return Ok(());
        }
        if !self.persisted {
            debug!("Not remembering the sheet URL because there is no config file");
            return Ok(());
        }
        self.config_file.sheet_url = sheet_url.to_string();
        self.config_file
            .save(&self.config_path)
            .await
            .context("Unable to save the sheet URL to the config file")?;
        debug!("Saved the sheet URL to '{}'", self.config_path.display());
        Ok(())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit#gid=0",
///   "brand_names": {
///     "abc": "ABC Label"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the Google Sheet holding the sales export. Empty when not configured.
    #[serde(default)]
    sheet_url: String,

    /// Brand code to display name, applied on top of the built-in table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    brand_names: BTreeMap<String, String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            brand_names: BTreeMap::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or is not a config for this app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
