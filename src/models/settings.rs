// Network Config - Settings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Tool settings: rule file locations, helper programs and write behaviour.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::CONFIG_DIR_NAME;

/// Default udev naming rules file.
pub const NET_RULES_PATH: &str = "/etc/udev/rules.d/70-persistent-net.rules";

/// Default udev driver assignment rules file.
pub const DRIVERS_RULES_PATH: &str = "/etc/udev/rules.d/79-network-drivers.rules";

/// Settings file name inside the configuration directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// udev naming rules file.
    #[serde(default = "default_net_rules_path")]
    pub net_rules_path: PathBuf,

    /// udev driver assignment rules file.
    #[serde(default = "default_drivers_rules_path")]
    pub drivers_rules_path: PathBuf,

    /// Program used to bring an interface down.
    #[serde(default = "default_ifdown_command")]
    pub ifdown_command: String,

    /// udevadm program.
    #[serde(default = "default_udevadm_command")]
    pub udevadm_command: String,

    /// Unattended installation: no bring-down and no settling.
    #[serde(default)]
    pub autoinst: bool,

    /// Pause after refreshing udev, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// sysfs network class directory.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// Directory holding the ifcfg-* interface files.
    #[serde(default = "default_sysconfig_dir")]
    pub sysconfig_dir: PathBuf,

    /// Static host name table.
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_net_rules_path() -> PathBuf {
    PathBuf::from(NET_RULES_PATH)
}

fn default_drivers_rules_path() -> PathBuf {
    PathBuf::from(DRIVERS_RULES_PATH)
}

fn default_ifdown_command() -> String {
    "/sbin/ifdown".to_string()
}

fn default_udevadm_command() -> String {
    "/usr/bin/udevadm".to_string()
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys/class/net")
}

fn default_sysconfig_dir() -> PathBuf {
    PathBuf::from("/etc/sysconfig/network")
}

fn default_hosts_file() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            net_rules_path: default_net_rules_path(),
            drivers_rules_path: default_drivers_rules_path(),
            ifdown_command: default_ifdown_command(),
            udevadm_command: default_udevadm_command(),
            autoinst: false,
            settle_delay_ms: default_settle_delay_ms(),
            sysfs_root: default_sysfs_root(),
            sysconfig_dir: default_sysconfig_dir(),
            hosts_file: default_hosts_file(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from_file(&path) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::error!("Failed to load settings from {:?}: {}", path, e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Load settings from TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to TOML file with restrictive permissions (0600).
    pub fn save_to_file(&self, path: &Path) -> Result<(), super::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
