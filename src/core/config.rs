// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frontend settings
//!
//! Stored as TOML. Every field has a default, so an empty file (or no file at
//! all) is a valid configuration.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::config::{LoadFailurePolicy, Settings};
//!
//! let settings = Settings::from_toml_str(r#"
//!     load_failure = "return_to_menu"
//!
//!     [video]
//!     refresh_rate = 50.0
//! "#).unwrap();
//!
//! assert_eq!(settings.load_failure, LoadFailurePolicy::ReturnToMenu);
//! assert_eq!(settings.video.refresh_rate, 50.0);
//! assert_eq!(settings.history.size, 100);
//! ```

use super::error::{ConfigError, Result};
use super::history::DEFAULT_HISTORY_FILE;
use super::input::{DpadEmulation, MAX_PADS};
use super::platform::DefaultPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default number of history records
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Default refresh rate used by the menu throttle
pub const DEFAULT_REFRESH_RATE: f64 = 59.95;

/// What to do after content fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Show the menu again
    ReturnToMenu,
    /// Terminate with a non-zero exit status
    #[default]
    Exit,
}

/// History settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History file; defaults to a file next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_history_size")]
    pub size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: DEFAULT_HISTORY_SIZE,
        }
    }
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
        }
    }
}

fn default_refresh_rate() -> f64 {
    DEFAULT_REFRESH_RATE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Dpad emulation mode per port
    #[serde(default = "default_dpad_emulation")]
    pub dpad_emulation: Vec<DpadEmulation>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dpad_emulation: default_dpad_emulation(),
        }
    }
}

fn default_dpad_emulation() -> Vec<DpadEmulation> {
    vec![DpadEmulation::LeftStick]
}

/// Directories handed to the core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savefile_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savestate_dir: Option<PathBuf>,

    /// Where zipped content is extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_dir: Option<PathBuf>,
}

/// Frontend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Libretro core library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_path: Option<PathBuf>,

    /// Browser start directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_directory: Option<PathBuf>,

    #[serde(default)]
    pub load_failure: LoadFailurePolicy,

    /// Show the "Loading ..." notification
    #[serde(default = "true_fn")]
    pub info_draw: bool,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub video: VideoConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    /// File these settings were loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn true_fn() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            core_path: None,
            browser_directory: None,
            load_failure: LoadFailurePolicy::default(),
            info_draw: true,
            history: HistoryConfig::default(),
            video: VideoConfig::default(),
            input: InputConfig::default(),
            paths: PathsConfig::default(),
            config_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a file
    ///
    /// A missing file yields the defaults. `config_path` is set either way.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut settings = match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config {} not found, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };

        settings.config_path = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Write settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.video.refresh_rate.is_finite() && self.video.refresh_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "video.refresh_rate",
                reason: format!("must be positive, got {}", self.video.refresh_rate),
            });
        }

        if self.input.dpad_emulation.len() > MAX_PADS {
            return Err(ConfigError::InvalidValue {
                key: "input.dpad_emulation",
                reason: format!(
                    "{} entries, at most {} ports are supported",
                    self.input.dpad_emulation.len(),
                    MAX_PADS
                ),
            });
        }

        Ok(())
    }

    /// Fill unset directories from the platform defaults
    pub fn apply_platform_defaults(&mut self, defaults: &DefaultPaths) {
        if self.browser_directory.is_none() {
            self.browser_directory = Some(defaults.filebrowser_startup_dir.clone());
        }
        if self.paths.savefile_dir.is_none() {
            self.paths.savefile_dir = Some(defaults.sram_dir.clone());
        }
        if self.paths.savestate_dir.is_none() {
            self.paths.savestate_dir = Some(defaults.savestate_dir.clone());
        }
        if self.config_path.is_none() {
            self.config_path = Some(defaults.config_path.clone());
        }
    }

    /// History file location
    ///
    /// The configured path, or [`DEFAULT_HISTORY_FILE`] next to the config.
    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history.path {
            return path.clone();
        }

        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(|dir| dir.join(DEFAULT_HISTORY_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE))
    }

    /// Menu frame budget in milliseconds (`750 / refresh_rate`)
    pub fn menu_frame_budget_ms(&self) -> f64 {
        750.0 / self.video.refresh_rate
    }
}
