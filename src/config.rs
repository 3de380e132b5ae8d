//! Overlay configuration loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::{FloatbarError, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "FLOATBAR_CONFIG";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "floatbar.toml";

/// Overlay configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloatbarConfig {
    /// Placeholder text shown in the empty search input
    pub placeholder: String,
    /// Whether the intro overlay is shown at startup
    pub show_intro: bool,
    /// Delay between the intro's dismissing key and its dismissal callback
    pub intro_dismiss_delay_ms: u64,
    /// Default lifetime of a toast
    pub toast_duration_ms: u64,
    /// How long before removal a toast starts fading out
    pub toast_fade_lead_ms: u64,
    /// How long the dictation hint stays up
    pub hint_duration_ms: u64,
    /// Optional JSON file with a static result set
    pub results_file: Option<PathBuf>,
    /// Optional toast raised once the intro is gone
    pub welcome_toast: Option<String>,
}

impl Default for FloatbarConfig {
    fn default() -> Self {
        Self {
            placeholder: "Ask ChatGPT".to_string(),
            show_intro: true,
            intro_dismiss_delay_ms: 500,
            toast_duration_ms: 5000,
            toast_fade_lead_ms: 300,
            hint_duration_ms: 3000,
            results_file: None,
            welcome_toast: None,
        }
    }
}

impl FloatbarConfig {
    /// Load configuration from the default location or return defaults.
    ///
    /// A missing file is not an error. A malformed file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FloatbarError::Config(e.to_string()))
    }

    /// Config file path: `$FLOATBAR_CONFIG`, else the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Data directory for logs.
    pub fn data_dir() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("floatbar"))
    }

    pub fn intro_dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.intro_dismiss_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn toast_fade_lead(&self) -> Duration {
        Duration::from_millis(self.toast_fade_lead_ms)
    }

    pub fn hint_duration(&self) -> Duration {
        Duration::from_millis(self.hint_duration_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "floatbar", "floatbar")
}
