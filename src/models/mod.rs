// Network Config - Data Model
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Configuration Model
//!
//! Pure data types and the configuration aggregate:
//!
//! - **Interface**: physical or virtual network devices
//! - **ConnectionConfig**: how an interface is brought up
//! - **Routing** / **Dns** / **Driver**: network-wide settings
//! - **Config**: the aggregate keeping all of the above consistent
//! - **Settings**: where rules live and how they are applied
//!
//! ## Design Principles
//!
//! 1. **Name-keyed**: entities reference interfaces by name, never by pointer
//! 2. **Single point of mutation**: cascades live in `Config`
//! 3. **Serializable**: all types serialize for snapshots and settings

pub mod config;
pub mod connection;
pub mod connections;
pub mod dns;
pub mod driver;
pub mod error;
pub mod interface;
pub mod interfaces;
pub mod ip;
pub mod registry;
pub mod routing;
pub mod settings;
pub mod validation;

// Re-export main types for convenience
pub use config::{Config, ConfigSource};
pub use connection::{
    BondingConfig, BootProtocol, BridgeConfig, ConnectionConfig, ConnectionKind, ConnectionType,
    Startmode, TunnelOwner, VlanConfig, WirelessConfig,
};
pub use connections::ConnectionConfigsCollection;
pub use dns::{DhcpHostname, Dns};
pub use driver::Driver;
pub use error::{Error, Result};
pub use interface::{Hwinfo, Interface, InterfaceKind, PhysicalInfo, RenamingMechanism};
pub use interfaces::InterfacesCollection;
pub use ip::{IpAddress, IpConfig};
pub use registry::ConfigRegistry;
pub use routing::{Route, Routing, RoutingTable};
pub use settings::Settings;

/// Configuration directory name (under XDG_CONFIG_HOME).
pub const CONFIG_DIR_NAME: &str = "network-config";
