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
//! Handles loading and saving bridge settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bridge::DEFAULT_CHANNEL;
use crate::platform::UserResponse;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BT_PERMISSION_BRIDGE_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bridge channel settings.
    pub bridge: BridgeConfig,

    /// Simulated platform settings.
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Channel name the endpoint answers on.
    pub channel: String,

    /// Capacity of the broker command queue.
    pub queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            queue_depth: 32,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// SDK level the simulated OS reports.
    pub sdk_version: u32,

    /// Whether the permission starts out granted.
    pub already_granted: bool,

    /// How the simulated user answers prompts.
    pub user_response: UserResponse,

    /// Delay before the simulated user answers, in milliseconds.
    pub response_delay_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            sdk_version: 33,
            already_granted: false,
            user_response: UserResponse::Allow,
            response_delay_ms: 500,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bt-permission-bridge")
            .join("config.toml")
    }

    /// Load configuration from the default location or create it.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            return Self::from_toml(&content);
        }

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
