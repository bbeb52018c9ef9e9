// Network Config - Configuration Registry
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Registry of loaded configurations.
//!
//! Components that need to share one loaded configuration should pass a
//! [`ConfigRegistry`] around. For independent call sites that cannot, a
//! process-wide registry is exposed through [`Config::add`],
//! [`Config::find`], [`Config::with_mut`] and [`Config::reset`]. Entries
//! live until `reset`.
//!
//! The process-wide registry uses a Mutex. Lock poisoning is handled by
//! recovering the inner value, as in the settings store.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::config::Config;

/// Configurations keyed by an arbitrary identifier.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: HashMap<String, Config>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration, replacing any previous one with that id.
    pub fn add(&mut self, id: impl Into<String>, config: Config) {
        let id = id.into();
        debug!("Registering configuration '{}'", id);
        self.configs.insert(id, config);
    }

    pub fn find(&self, id: &str) -> Option<&Config> {
        self.configs.get(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Config> {
        self.configs.get_mut(id)
    }

    /// Remove every entry.
    pub fn reset(&mut self) {
        self.configs.clear();
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

static REGISTRY: Lazy<Mutex<ConfigRegistry>> = Lazy::new(|| Mutex::new(ConfigRegistry::new()));

fn registry() -> MutexGuard<'static, ConfigRegistry> {
    match REGISTRY.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Config registry lock poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl Config {
    /// Register a configuration in the process-wide registry.
    pub fn add(id: impl Into<String>, config: Config) {
        registry().add(id, config);
    }

    /// Copy of the configuration registered under `id`.
    ///
    /// Changes to the copy are not seen by other callers; use
    /// [`Config::with_mut`] to change the registered configuration.
    pub fn find(id: &str) -> Option<Config> {
        registry().find(id).cloned()
    }

    /// Run `f` on the configuration registered under `id`, in place.
    ///
    /// The registry stays locked while `f` runs, so `f` must not call
    /// back into `Config::add`, `find`, `with_mut` or `reset`.
    pub fn with_mut<T>(id: &str, f: impl FnOnce(&mut Config) -> T) -> Option<T> {
        registry().find_mut(id).map(f)
    }

    /// Clear the process-wide registry.
    pub fn reset() {
        registry().reset();
    }
}
