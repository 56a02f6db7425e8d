// Copyright 2026 Daniel Pelikan
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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bluetooth::constants::{DEFAULT_ADAPTER_PATH, DEFAULT_LOCAL_NAME};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object path of the Bluetooth adapter to advertise on.
    pub adapter_path: String,

    /// Advertising settings.
    pub advertising: AdvertisingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvertisingConfig {
    /// Device name broadcast in the advertisement.
    pub local_name: String,

    /// Include the adapter's tx power level in the advertisement.
    pub include_tx_power: bool,
}

impl Default for AdvertisingConfig {
    fn default() -> Self {
        Self {
            local_name: DEFAULT_LOCAL_NAME.to_string(),
            include_tx_power: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adapter_path: DEFAULT_ADAPTER_PATH.to_string(),
            advertising: AdvertisingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ble-beacon");

        std::fs::create_dir_all(&config_dir)?;

        Self::load_from(&config_dir.join("config.toml"))
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(config_path, content)?;
            Ok(config)
        }
    }
}
