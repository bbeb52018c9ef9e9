// Network Config - Local Storage
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Snapshot storage for network configurations.
//!
//! A snapshot is the JSON form of a [`Config`] plus the schema version it
//! was written with and the time it was taken. Snapshots written by an
//! older minor version load fine; a different major version, or a newer
//! minor one, is refused.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::models::{Config, ConfigSource, Error, Result, CONFIG_DIR_NAME};

/// Schema version written into new snapshots.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

/// Snapshot file name inside the configuration directory.
pub const SNAPSHOT_FILE_NAME: &str = "config.json";

/// Stored configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: String,
    pub saved_at: DateTime<Utc>,
    pub config: Config,
}

impl Snapshot {
    pub fn new(config: Config) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            config,
        }
    }

    /// Major version must match, minor can be lower or equal.
    pub fn is_compatible(&self) -> bool {
        match (
            Version::parse(&self.schema_version),
            Version::parse(SNAPSHOT_SCHEMA_VERSION),
        ) {
            (Ok(found), Ok(current)) => {
                found.major == current.major && found.minor <= current.minor
            }
            _ => false,
        }
    }
}

/// Snapshot store in the user's configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
    snapshot_file: PathBuf,
}

impl ConfigStore {
    /// Store in the default configuration directory.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Self::with_config_dir(config_dir)
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            snapshot_file: config_dir.join(SNAPSHOT_FILE_NAME),
            config_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn snapshot_file(&self) -> &Path {
        &self.snapshot_file
    }

    pub fn exists(&self) -> bool {
        self.snapshot_file.exists()
    }

    /// Write `config` as the current snapshot (0600).
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| Error::ConfigWriteFailed(format!("{:?}: {}", self.config_dir, e)))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.config_dir, fs::Permissions::from_mode(0o700));
        }

        let file = File::create(&self.snapshot_file)
            .map_err(|e| Error::ConfigWriteFailed(format!("{:?}: {}", self.snapshot_file, e)))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.snapshot_file, fs::Permissions::from_mode(0o600));
        }

        let snapshot = Snapshot::new(config.clone());
        serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
            .map_err(|e| Error::ConfigWriteFailed(e.to_string()))?;

        info!(
            "Saved snapshot with {} interfaces to {:?}",
            config.interfaces.len(),
            self.snapshot_file
        );
        Ok(())
    }

    /// Read the current snapshot, if any.
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        if !self.exists() {
            debug!("No snapshot at {:?}", self.snapshot_file);
            return Ok(None);
        }

        let file = File::open(&self.snapshot_file)
            .map_err(|e| Error::ConfigReadFailed(format!("{:?}: {}", self.snapshot_file, e)))?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;

        if !snapshot.is_compatible() {
            error!(
                "Snapshot schema {} is not compatible with {}",
                snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION
            );
            return Err(Error::SchemaMismatch {
                expected: SNAPSHOT_SCHEMA_VERSION.to_string(),
                found: snapshot.schema_version,
            });
        }
        Ok(Some(snapshot))
    }

    /// Read the stored configuration, if any.
    pub fn load(&self) -> Result<Option<Config>> {
        Ok(self.load_snapshot()?.map(|snapshot| {
            let mut config = snapshot.config;
            config.source = ConfigSource::Snapshot;
            config
        }))
    }

    /// Delete the snapshot. Missing snapshots are not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.snapshot_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectionConfig, Interface, RenamingMechanism};

    fn config() -> Config {
        let mut config = Config::default();
        config.interfaces.push(Interface::physical("eth0")).unwrap();
        config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec!["eth0".into()]))
            .unwrap();
        config
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().join("network-config"));
        assert!(store.load().unwrap().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().join("network-config"));

        let mut original = config();
        original
            .rename_interface(Some("eth0"), "lan0", RenamingMechanism::Mac)
            .unwrap();
        store.save(&original).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.source, ConfigSource::Snapshot);
        assert_eq!(loaded.interfaces.by_name("lan0").unwrap().old_name(), "eth0");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(store.snapshot_file()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        store.clear().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_incompatible_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().to_path_buf());

        let mut snapshot = Snapshot::new(config());
        snapshot.schema_version = "2.0.0".into();
        fs::write(store.snapshot_file(), serde_json::to_string(&snapshot).unwrap()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_schema_compatibility() {
        let mut snapshot = Snapshot::new(Config::default());
        assert!(snapshot.is_compatible());
        snapshot.schema_version = "1.5.0".into();
        assert!(!snapshot.is_compatible());
        snapshot.schema_version = "garbage".into();
        assert!(!snapshot.is_compatible());
    }

    #[test]
    fn test_snapshot_with_duplicate_interfaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().to_path_buf());

        let mut value = serde_json::to_value(Snapshot::new(config())).unwrap();
        let interfaces = value["config"]["interfaces"].as_array_mut().unwrap();
        let first = interfaces[0].clone();
        interfaces.push(first);
        fs::write(store.snapshot_file(), value.to_string()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::ConfigParseFailed(_)));
        assert!(err.to_string().contains("Interface already exists: eth0"));
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().to_path_buf());
        fs::write(store.snapshot_file(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(Error::ConfigParseFailed(_))));
    }
}
