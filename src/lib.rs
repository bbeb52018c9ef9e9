// Network Config - Library
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Config
//!
//! Network interface configuration for Linux.
//!
//! - [`models`]: interfaces, connection configs, routing, DNS and the
//!   [`Config`] aggregate that keeps them consistent across renames and
//!   deletions
//! - [`udev`]: naming and driver rules
//! - [`sysconfig`]: ifcfg reader and the [`InterfacesWriter`]
//! - [`hardware`]: sysfs hardware detection
//! - [`storage`]: configuration snapshots

pub mod hardware;
pub mod models;
pub mod storage;
pub mod sysconfig;
pub mod system;
pub mod udev;

pub use hardware::{HardwareLookup, SysfsHardware};
pub use models::{Config, Error, Result, Settings};
pub use storage::ConfigStore;
pub use sysconfig::{ConfigReader, InterfacesWriter};
pub use system::{CommandRunner, SystemRunner};
pub use udev::{RuleStore, UdevRule};

/// Human-readable application name.
pub const APP_NAME: &str = "Network Config";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
