//! # Guide Configuration Module
//!
//! ## Purpose
//! Holds the user-selectable settings of the guide (where the guide lives,
//! which language and theme are active, how verbose logging is) and persists
//! them in `guide_config.json`. The configuration is passed explicitly into
//! `GuideLoader`; there is no process-wide mutable "current language".
//!
//! ## Configuration Format
//! ```json
//! {
//!   "guide_root": "src/assets/guide",
//!   "language": "ru",
//!   "default_language": null,
//!   "theme": null,
//!   "log_level": "info"
//! }
//! ```
//! `default_language: null` means "use the TOC default", `theme: null` means
//! "use the TOC `settings.theme`".
//!
//! ## Usage Pattern
//! ```rust,ignore
//! use thermokinetics_guide::guide_config::GuideConfigManager;
//!
//! let mut manager = GuideConfigManager::new();
//! manager.set_language("en")?;
//! let config = manager.get_config().clone();
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "guide_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// directory with `toc.json`, `themes/` and the content documents
    pub guide_root: PathBuf,
    /// language requested by the user
    pub language: String,
    /// overrides the TOC `default_language` when set
    #[serde(default)]
    pub default_language: Option<String>,
    /// overrides the TOC `settings.theme` when set
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Level used until the configuration file has been read.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for GuideConfig {
    /// Sample guide shipped with the crate, Russian UI, TOC defaults for the rest.
    fn default() -> Self {
        Self {
            guide_root: PathBuf::from("src/assets/guide"),
            language: "ru".to_string(),
            default_language: None,
            theme: None,
            log_level: default_log_level(),
        }
    }
}

impl GuideConfig {
    /// Configuration for a guide stored under `guide_root`, other fields default.
    pub fn with_root(guide_root: impl Into<PathBuf>) -> Self {
        Self {
            guide_root: guide_root.into(),
            ..Default::default()
        }
    }

    pub fn toc_path(&self) -> PathBuf {
        self.guide_root.join("toc.json")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.guide_root.join("themes")
    }
}

/// Loads, updates and persists `GuideConfig`.
///
/// # Fields
/// * `config` - current configuration
/// * `config_file` - where the configuration is saved
#[derive(Debug, Clone)]
pub struct GuideConfigManager {
    config: GuideConfig,
    config_file: PathBuf,
}

impl GuideConfigManager {
    /// Reads `guide_config.json` from the current directory, defaults when it is
    /// absent or unreadable.
    pub fn new() -> Self {
        Self::with_config_file(CONFIG_FILE_NAME)
    }

    /// Same as `new` for a custom configuration file path.
    pub fn with_config_file(config_file: impl AsRef<Path>) -> Self {
        let config_file = config_file.as_ref().to_path_buf();
        let config = match Self::load_config(&config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Could not read '{}' ({}), using default guide configuration",
                    config_file.display(),
                    e
                );
                GuideConfig::default()
            }
        };
        Self {
            config,
            config_file,
        }
    }

    fn load_config(config_file: &Path) -> Result<GuideConfig, Box<dyn std::error::Error>> {
        if config_file.exists() {
            let content = fs::read_to_string(config_file)?;
            let config: GuideConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(GuideConfig::default())
        }
    }

    /// Writes the current configuration to the config file.
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("Saved guide configuration to '{}'", self.config_file.display());
        Ok(())
    }

    pub fn get_config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Switches the guide directory. The directory must contain `toc.json`.
    ///
    /// # Returns
    /// * `Ok(())` - the root was updated and saved
    /// * `Err(Box<dyn std::error::Error>)` - `toc.json` is missing or saving failed
    pub fn set_guide_root(&mut self, root: &str) -> Result<(), Box<dyn std::error::Error>> {
        let toc = Path::new(root).join("toc.json");
        if !toc.exists() {
            return Err(format!("File does not exist: {}", toc.display()).into());
        }
        self.config.guide_root = PathBuf::from(root);
        self.save_config()
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), Box<dyn std::error::Error>> {
        let language = language.trim();
        if language.is_empty() {
            return Err("Language code must not be empty".into());
        }
        self.config.language = language.to_string();
        self.save_config()
    }

    /// Selects a theme by name; `None` returns to the TOC theme. The theme file
    /// must exist under `<guide_root>/themes/`.
    pub fn set_theme(&mut self, theme: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(name) = theme {
            let path = self.config.themes_dir().join(format!("{}.json", name));
            if !path.exists() {
                return Err(format!("File does not exist: {}", path.display()).into());
            }
        }
        self.config.theme = theme.map(str::to_string);
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.config.log_level = level.to_string();
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.config = GuideConfig::default();
        self.save_config()
    }
}

impl Default for GuideConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
