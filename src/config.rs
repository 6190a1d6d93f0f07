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
//! Handles loading and saving application settings and device credentials.

use anyhow::{Context, Result};
use bluer::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::DEFAULT_DISCONNECT_DELAY;
use crate::device::{CredentialSource, DeviceCredentials};

const APP_DIR: &str = "tuyable-bridge";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device session settings.
    pub session: SessionConfig,

    /// Transport settings.
    pub transport: TransportConfig,

    /// Known devices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<DeviceCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a lost link may stay down before the device reads as
    /// disconnected, in milliseconds.
    pub disconnect_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            disconnect_delay_ms: DEFAULT_DISCONNECT_DELAY.as_millis() as u64,
        }
    }
}

impl SessionConfig {
    pub fn disconnect_delay(&self) -> Duration {
        Duration::from_millis(self.disconnect_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Simulated round trip of the loopback transport in milliseconds.
    pub loopback_latency_ms: u64,

    /// Datapoints the loopback transport refuses to write.
    pub loopback_read_only: Vec<u8>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            loopback_latency_ms: 50,
            loopback_read_only: Vec::new(),
        }
    }
}

impl TransportConfig {
    pub fn loopback_latency(&self) -> Duration {
        Duration::from_millis(self.loopback_latency_ms)
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, writing a default file there if none exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Invalid config {}", path.display()))
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl CredentialSource for Config {
    fn credentials(&self, address: &Address) -> Option<DeviceCredentials> {
        self.devices.as_slice().credentials(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::parse_address;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[session]
disconnect_delay_ms = 2500

[transport]
loopback_read_only = [17]

[[devices]]
address = "DC:23:4D:7B:E1:CE"
uuid = "xmbmd29e724c403a"
local_key = "0123456789abcdef"
device_id = "bf2d2eox9j31au8q"
category = "szjqr"
product_id = "ltak7e1p"
device_name = "Fingerbot Plus"
"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.session.disconnect_delay(), Duration::from_secs(10));
        assert_eq!(config.transport.loopback_latency(), Duration::from_millis(50));
        assert!(config.devices.is_empty());
        assert!(config.transport.loopback_read_only.is_empty());
    }

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.session.disconnect_delay_ms, 2500);
        assert_eq!(config.transport.loopback_latency_ms, 50);
        assert_eq!(config.transport.loopback_read_only, vec![17]);
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].product_model, "");
    }

    #[test]
    fn test_credential_lookup_ignores_case() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let address = parse_address("dc-23-4d-7b-e1-ce").unwrap();
        let creds = config.credentials(&address).unwrap();
        assert_eq!(creds.device_id, "bf2d2eox9j31au8q");

        let other = parse_address("DC:23:4D:7B:E1:CF").unwrap();
        assert!(config.credentials(&other).is_none());
    }

    #[test]
    fn test_load_writes_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let mut changed = config;
        changed.session.disconnect_delay_ms = 1000;
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "session = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
