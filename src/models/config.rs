// Network Config - Configuration Aggregate
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! The network configuration aggregate.
//!
//! A [`Config`] owns interfaces, connection configs, routing, DNS and
//! drivers. Entities reference each other by interface name only, so the
//! mutation operations here are the single place where renames and
//! deletions are propagated:
//! - `rename_interface` rewrites every reference to the old name
//! - `delete_interface` drops references and cascades to VLANs on top
//! - `add_or_update_connection_config` creates the interface it binds to

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::connection::ConnectionConfig;
use super::connections::ConnectionConfigsCollection;
use super::dns::{DhcpHostname, Dns};
use super::driver::Driver;
use super::error::{Error, Result};
use super::interface::{Interface, RenamingMechanism};
use super::interfaces::InterfacesCollection;
use super::routing::Routing;
use super::validation::validate_interface_name;

/// Backend a configuration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// ifcfg-style interface files.
    #[default]
    Sysconfig,
    /// NetworkManager.
    NetworkManager,
    /// Unattended installation profile.
    Autoinst,
    /// A stored snapshot.
    Snapshot,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sysconfig => "sysconfig",
            Self::NetworkManager => "network_manager",
            Self::Autoinst => "autoinst",
            Self::Snapshot => "snapshot",
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub interfaces: InterfacesCollection,
    #[serde(default)]
    pub connections: ConnectionConfigsCollection,
    #[serde(default)]
    pub routing: Routing,
    #[serde(default)]
    pub dns: Dns,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub source: ConfigSource,
}

/// Drivers and provenance do not take part in equality.
impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.interfaces == other.interfaces
            && self.connections == other.connections
            && self.routing == other.routing
            && self.dns == other.dns
    }
}

impl Config {
    pub fn new(
        interfaces: InterfacesCollection,
        connections: ConnectionConfigsCollection,
        routing: Routing,
        dns: Dns,
        drivers: Vec<Driver>,
        source: ConfigSource,
    ) -> Self {
        Self {
            interfaces,
            connections,
            routing,
            dns,
            drivers,
            source,
        }
    }

    /// Independent deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Rename an interface and every reference to it.
    ///
    /// With no `old_name` only the renaming mechanism of the interface
    /// already called `new_name` is updated.
    pub fn rename_interface(
        &mut self,
        old_name: Option<&str>,
        new_name: &str,
        mechanism: RenamingMechanism,
    ) -> Result<()> {
        validate_interface_name(new_name)?;

        let Some(old_name) = old_name.filter(|n| !n.is_empty()) else {
            let iface = self
                .interfaces
                .by_name_mut(new_name)
                .ok_or_else(|| Error::InterfaceNotFound(new_name.to_string()))?;
            debug!(
                "Setting renaming mechanism of {} to '{}'",
                new_name,
                mechanism.as_str()
            );
            iface.renaming_mechanism = mechanism;
            return Ok(());
        };

        if old_name != new_name && self.interfaces.contains(new_name) {
            return Err(Error::InterfaceAlreadyExists(new_name.to_string()));
        }

        let iface = self
            .interfaces
            .by_name_mut(old_name)
            .ok_or_else(|| Error::InterfaceNotFound(old_name.to_string()))?;
        iface.rename(new_name, mechanism);

        let mut updated = 0;
        for conn in self.connections.iter_mut() {
            if conn.rename_references(old_name, new_name) {
                updated += 1;
            }
        }

        if self.dns.dhcp_hostname.is_interface(old_name) {
            self.dns.dhcp_hostname = DhcpHostname::Interface(new_name.to_string());
        }

        info!(
            "Renamed {} to {} ({} connection config(s) updated)",
            old_name, new_name, updated
        );
        Ok(())
    }

    /// Delete an interface and its configuration.
    ///
    /// The interface record itself is only removed when it cannot exist
    /// without configuration: virtual interfaces and physical interfaces
    /// whose hardware is gone. References from bridges, bonds and the
    /// DHCP host name are dropped, and VLANs on top are deleted as well.
    pub fn delete_interface(&mut self, name: &str) {
        let mut visited = HashSet::new();
        self.delete_interface_cascade(name, &mut visited);
    }

    fn delete_interface_cascade(&mut self, name: &str, visited: &mut HashSet<String>) {
        if !visited.insert(name.to_string()) {
            warn!("Interface {} already deleted in this cascade, skipping", name);
            return;
        }

        let removable = self
            .interfaces
            .by_name(name)
            .map(|iface| iface.is_virtual() || !iface.is_present());
        match removable {
            Some(true) => {
                self.interfaces.remove(name);
                info!("Deleted interface {}", name);
            }
            Some(false) => debug!("Keeping present physical interface {}", name),
            None => debug!("Interface {} not found, cleaning up references only", name),
        }

        let removed = self.connections.remove_by_interface(name);
        if !removed.is_empty() {
            debug!("Removed {} connection config(s) for {}", removed.len(), name);
        }

        let mut dependent_vlans = Vec::new();
        for conn in self.connections.iter_mut() {
            if conn.remove_member(name) {
                debug!("Removed {} from {}", name, conn.name);
            }
            if conn.parent_device() == Some(name) {
                dependent_vlans.push(conn.interface.clone());
            }
        }

        if self.dns.dhcp_hostname.is_interface(name) {
            self.dns.dhcp_hostname = DhcpHostname::None;
        }

        for vlan in dependent_vlans {
            info!("Deleting VLAN {} on top of {}", vlan, name);
            self.delete_interface_cascade(&vlan, visited);
        }
    }

    /// Insert or replace a connection config by name.
    ///
    /// Creates the interface the config binds to when it does not exist
    /// yet: virtual for virtual connection types, physical otherwise.
    pub fn add_or_update_connection_config(&mut self, conn: ConnectionConfig) -> Result<()> {
        if conn.name.is_empty() {
            return Err(Error::InvalidConnection(format!(
                "config for '{}' has no name",
                conn.interface
            )));
        }
        self.check_dependency_cycle(&conn)?;

        if !conn.interface.is_empty() && !self.interfaces.contains(&conn.interface) {
            let iface = if conn.is_virtual() {
                Interface::virtual_interface(conn.interface.clone(), Some(conn.connection_type()))
            } else {
                Interface::physical(conn.interface.clone())
            };
            info!("Adding interface {} for connection {}", conn.interface, conn.name);
            self.interfaces.push(iface)?;
        }

        if self.connections.add_or_update(conn).is_some() {
            debug!("Replaced existing connection config");
        }
        Ok(())
    }

    /// Remove a connection config by name. Its interface is kept.
    pub fn delete_connection_config(&mut self, name: &str) -> Result<ConnectionConfig> {
        let removed = self
            .connections
            .remove_by_name(name)
            .ok_or_else(|| Error::ConnectionNotFound(name.to_string()))?;
        info!("Deleted connection config {}", name);
        Ok(removed)
    }

    /// Reject a config whose dependencies lead back to its own interface.
    fn check_dependency_cycle(&self, conn: &ConnectionConfig) -> Result<()> {
        if conn.interface.is_empty() {
            return Ok(());
        }

        let mut pending: Vec<String> = conn.dependencies().into_iter().map(String::from).collect();
        let mut seen = HashSet::new();
        while let Some(name) = pending.pop() {
            if name == conn.interface {
                return Err(Error::DependencyCycle(format!(
                    "{} depends on itself",
                    conn.interface
                )));
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            // The config being replaced must not count
            let deps = self
                .connections
                .iter()
                .filter(|c| c.name != conn.name && c.interface == name)
                .flat_map(|c| c.dependencies())
                .map(String::from);
            pending.extend(deps);
        }
        Ok(())
    }

    /// Insert or replace a driver by name, keeping its position.
    pub fn add_or_update_driver(&mut self, driver: Driver) {
        match self.drivers.iter().position(|d| d.name == driver.name) {
            Some(index) => self.drivers[index] = driver,
            None => self.drivers.push(driver),
        }
    }

    /// Drivers relevant to an interface: the ones its hardware reports and
    /// its custom driver.
    pub fn drivers_for_interface(&self, name: &str) -> Vec<&Driver> {
        let Some(iface) = self.interfaces.by_name(name) else {
            return Vec::new();
        };

        let mut names: Vec<&str> = iface
            .hardware()
            .map(|hw| hw.drivers.iter().map(String::as_str).collect())
            .unwrap_or_default();
        if let Some(custom) = iface.custom_driver() {
            names.push(custom);
        }

        self.drivers
            .iter()
            .filter(|d| names.contains(&d.name.as_str()))
            .collect()
    }

    /// Whether some connection config binds to the interface.
    pub fn configured_interface(&self, name: &str) -> bool {
        !name.is_empty() && self.connections.by_interface(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::connection::ConnectionType;
    use crate::models::interface::{Hwinfo, InterfaceKind};
    use crate::models::routing::{Route, RoutingTable};

    fn eth0() -> Interface {
        Interface::with_hardware(
            "eth0",
            Hwinfo {
                name: "Ethernet Card 0".into(),
                mac: Some("01:23:45:67:89:ab".into()),
                drivers: vec!["virtio_net".into()],
                ..Default::default()
            },
        )
    }

    fn config_with(interfaces: Vec<Interface>, connections: Vec<ConnectionConfig>) -> Config {
        Config::new(
            InterfacesCollection::from_interfaces(interfaces).unwrap(),
            ConnectionConfigsCollection::new(connections),
            Routing::new(vec![
                RoutingTable::new(vec![Route::default()]),
                RoutingTable::new(vec![Route::default()]),
            ]),
            Dns::default(),
            vec![Driver::new("virtio_net", "csum=1")],
            ConfigSource::Sysconfig,
        )
    }

    fn config() -> Config {
        config_with(vec![eth0()], vec![ConnectionConfig::ethernet("eth0")])
    }

    #[test]
    fn test_copy_is_equal_and_independent() {
        let original = config();
        let mut copy = original.copy();
        assert_eq!(copy, original);

        copy.routing.tables.clear();
        copy.interfaces.push(Interface::physical("eth1")).unwrap();
        copy.connections.iter_mut().next().unwrap().interface = "eth1".into();

        assert_eq!(original.routing.tables.len(), 2);
        assert_eq!(original.interfaces.len(), 1);
        assert_eq!(original.connections.by_name("eth0").unwrap().interface, "eth0");
        assert_ne!(copy, original);
    }

    #[test]
    fn test_equality_ignores_drivers_and_source() {
        let original = config();
        let mut copy = original.copy();
        copy.drivers.clear();
        copy.source = ConfigSource::Snapshot;
        assert_eq!(copy, original);

        copy.routing.forward_ipv4 = !original.routing.forward_ipv4;
        assert_ne!(copy, original);

        let mut copy = original.copy();
        copy.dns.hostname = Some("dummy".into());
        assert_ne!(copy, original);
    }

    #[test]
    fn test_rename_interface() {
        let mut config = config();
        config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap();

        let eth1 = config.interfaces.by_name("eth1").unwrap();
        assert_eq!(eth1.renaming_mechanism, RenamingMechanism::Mac);
        assert!(config.interfaces.by_name("eth0").is_none());
        assert!(config.connections.by_interface("eth1").is_some());
    }

    #[test]
    fn test_rename_twice() {
        let mut config = config();
        config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap();
        config
            .rename_interface(Some("eth1"), "eth2", RenamingMechanism::BusId)
            .unwrap();

        let eth2 = config.interfaces.by_name("eth2").unwrap();
        assert_eq!(eth2.renaming_mechanism, RenamingMechanism::BusId);
        assert_eq!(eth2.old_name(), "eth0");
        assert!(config.connections.by_interface("eth2").is_some());
    }

    #[test]
    fn test_rename_without_old_name_sets_mechanism_only() {
        let mut config = config();
        config
            .rename_interface(None, "eth0", RenamingMechanism::Mac)
            .unwrap();

        let eth0 = config.interfaces.by_name("eth0").unwrap();
        assert_eq!(eth0.renaming_mechanism, RenamingMechanism::Mac);
        assert!(!eth0.is_renamed());
    }

    #[test]
    fn test_rename_errors() {
        let mut config = config_with(
            vec![eth0(), Interface::physical("eth1")],
            vec![ConnectionConfig::ethernet("eth0")],
        );
        let err = config
            .rename_interface(Some("eth9"), "eth5", RenamingMechanism::Mac)
            .unwrap_err();
        assert!(err.is_not_found());

        let err = config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap_err();
        assert!(matches!(err, Error::InterfaceAlreadyExists(_)));

        let err = config
            .rename_interface(Some("eth0"), "bad name", RenamingMechanism::Mac)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterfaceName(_)));
    }

    #[test]
    fn test_rename_updates_dhcp_hostname() {
        let mut config = config();
        config.dns.dhcp_hostname = DhcpHostname::Interface("eth0".into());
        config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap();
        assert_eq!(config.dns.dhcp_hostname, DhcpHostname::Interface("eth1".into()));

        let mut config = config_with(vec![eth0()], vec![]);
        config.dns.dhcp_hostname = DhcpHostname::Any;
        config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap();
        assert_eq!(config.dns.dhcp_hostname, DhcpHostname::Any);
    }

    #[test]
    fn test_rename_updates_bridge_bond_and_vlan() {
        let mut config = config_with(
            vec![
                eth0(),
                Interface::virtual_interface("br0", Some(ConnectionType::Bridge)),
                Interface::virtual_interface("bond0", Some(ConnectionType::Bonding)),
                Interface::virtual_interface("vlan0", Some(ConnectionType::Vlan)),
            ],
            vec![
                ConnectionConfig::ethernet("eth0"),
                ConnectionConfig::bridge("br0", vec!["eth0".into()]),
                ConnectionConfig::bonding("bond0", vec!["eth0".into()]),
                ConnectionConfig::vlan("vlan0", "eth0"),
            ],
        );

        config
            .rename_interface(Some("eth0"), "eth1", RenamingMechanism::Mac)
            .unwrap();

        assert_eq!(config.connections.by_name("br0").unwrap().ports().unwrap(), ["eth1"]);
        assert_eq!(config.connections.by_name("bond0").unwrap().slaves().unwrap(), ["eth1"]);
        assert_eq!(
            config.connections.by_name("vlan0").unwrap().parent_device(),
            Some("eth1")
        );
    }

    #[test]
    fn test_add_connection_config() {
        let mut config = config();
        let eth2 = ConnectionConfig::ethernet("eth2");
        config.add_or_update_connection_config(eth2.clone()).unwrap();

        assert_eq!(config.connections.by_name("eth2"), Some(&eth2));
        assert!(config.interfaces.by_name("eth2").unwrap().is_physical());
    }

    #[test]
    fn test_add_bridge_creates_virtual_interface() {
        let mut config = config();
        config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec!["eth0".into()]))
            .unwrap();

        assert_eq!(config.interfaces.names(), vec!["eth0", "br0"]);
        assert_eq!(
            config.interfaces.by_name("br0").unwrap().kind,
            InterfaceKind::Virtual {
                connection_type: Some(ConnectionType::Bridge)
            }
        );
        assert_eq!(config.connections.names(), vec!["eth0", "br0"]);
    }

    #[test]
    fn test_update_connection_config_does_not_add_interface() {
        let mut config = config();
        config
            .interfaces
            .push(Interface::virtual_interface("br0", None))
            .unwrap();
        config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec![]))
            .unwrap();
        config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec!["eth0".into()]))
            .unwrap();

        assert_eq!(config.interfaces.len(), 2);
        assert_eq!(config.connections.len(), 2);
        assert_eq!(config.connections.by_name("br0").unwrap().ports().unwrap(), ["eth0"]);
    }

    #[test]
    fn test_add_connection_config_rejects_cycles() {
        let mut config = config();
        config
            .add_or_update_connection_config(ConnectionConfig::vlan("vlan1", "vlan2"))
            .unwrap();
        let err = config
            .add_or_update_connection_config(ConnectionConfig::vlan("vlan2", "vlan1"))
            .unwrap_err();
        assert!(matches!(err, Error::DependencyCycle(_)));

        let err = config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec!["br0".into()]))
            .unwrap_err();
        assert!(matches!(err, Error::DependencyCycle(_)));

        // Replacing vlan1 itself is not a cycle
        config
            .add_or_update_connection_config(ConnectionConfig::vlan("vlan1", "eth0"))
            .unwrap();
    }

    #[test]
    fn test_add_connection_config_requires_name() {
        let mut config = config();
        let mut conn = ConnectionConfig::ethernet("eth1");
        conn.name.clear();
        let err = config.add_or_update_connection_config(conn).unwrap_err();
        assert!(matches!(err, Error::InvalidConnection(_)));
        assert!(!config.interfaces.contains("eth1"));
    }

    #[test]
    fn test_delete_connection_config() {
        let mut config = config();
        config
            .add_or_update_connection_config(ConnectionConfig::bridge("br0", vec!["eth0".into()]))
            .unwrap();

        let removed = config.delete_connection_config("br0").unwrap();
        assert_eq!(removed.interface, "br0");
        assert!(config.connections.by_name("br0").is_none());
        assert!(config.interfaces.contains("br0"));

        let err = config.delete_connection_config("br0").unwrap_err();
        assert!(matches!(err, Error::ConnectionNotFound(ref name) if name == "br0"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_virtual_interface() {
        let mut config = config_with(
            vec![eth0(), Interface::virtual_interface("br0", None)],
            vec![
                ConnectionConfig::ethernet("eth0"),
                ConnectionConfig::bridge("br0", vec![]),
            ],
        );
        config.delete_interface("br0");
        assert_eq!(config.interfaces.names(), vec!["eth0"]);
        assert_eq!(config.connections.names(), vec!["eth0"]);
    }

    #[test]
    fn test_delete_present_physical_interface_keeps_record() {
        let mut config = config_with(
            vec![eth0(), Interface::virtual_interface("br0", None)],
            vec![
                ConnectionConfig::ethernet("eth0"),
                ConnectionConfig::bridge("br0", vec![]),
            ],
        );
        config.delete_interface("eth0");
        assert_eq!(config.interfaces.names(), vec!["eth0", "br0"]);
        assert_eq!(config.connections.names(), vec!["br0"]);
    }

    #[test]
    fn test_delete_missing_physical_interface() {
        let mut config = config_with(
            vec![Interface::physical("eth0"), Interface::virtual_interface("br0", None)],
            vec![ConnectionConfig::ethernet("eth0")],
        );
        config.delete_interface("eth0");
        assert_eq!(config.interfaces.names(), vec!["br0"]);
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_delete_removes_bridge_port_and_bond_slave() {
        let mut config = config_with(
            vec![
                eth0(),
                Interface::virtual_interface("br0", None),
                Interface::virtual_interface("bond0", None),
            ],
            vec![
                ConnectionConfig::ethernet("eth0"),
                ConnectionConfig::bridge("br0", vec!["eth0".into()]),
                ConnectionConfig::bonding("bond0", vec!["eth0".into()]),
            ],
        );
        config.delete_interface("eth0");

        assert!(config.connections.by_name("br0").unwrap().ports().unwrap().is_empty());
        assert!(config.connections.by_name("bond0").unwrap().slaves().unwrap().is_empty());
        assert_eq!(config.interfaces.len(), 3);
    }

    #[test]
    fn test_delete_cascades_to_vlans() {
        let mut config = config_with(
            vec![
                Interface::physical("eth0"),
                Interface::virtual_interface("vlan0", None),
                Interface::virtual_interface("vlan1", None),
            ],
            vec![
                ConnectionConfig::ethernet("eth0"),
                ConnectionConfig::vlan("vlan0", "eth0"),
                ConnectionConfig::vlan("vlan1", "vlan0"),
            ],
        );
        config.delete_interface("eth0");
        assert!(config.interfaces.is_empty());
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_delete_terminates_on_cycle() {
        let mut config = config_with(
            vec![
                Interface::virtual_interface("vlan1", None),
                Interface::virtual_interface("vlan2", None),
            ],
            vec![
                ConnectionConfig::vlan("vlan1", "vlan2"),
                ConnectionConfig::vlan("vlan2", "vlan1"),
            ],
        );
        config.delete_interface("vlan1");
        assert!(config.interfaces.is_empty());
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_delete_resets_dhcp_hostname() {
        let mut config = config();
        config.dns.dhcp_hostname = DhcpHostname::Interface("eth0".into());
        config.delete_interface("eth0");
        assert_eq!(config.dns.dhcp_hostname, DhcpHostname::None);
    }

    #[test]
    fn test_add_or_update_driver() {
        let mut config = config();
        config.add_or_update_driver(Driver::new("e1000", ""));
        assert_eq!(
            config.drivers,
            vec![Driver::new("virtio_net", "csum=1"), Driver::new("e1000", "")]
        );

        config.add_or_update_driver(Driver::new("virtio_net", "csum=0"));
        assert_eq!(config.drivers[0], Driver::new("virtio_net", "csum=0"));
        assert_eq!(config.drivers.len(), 2);
    }

    #[test]
    fn test_drivers_for_interface() {
        let mut config = config();
        config.add_or_update_driver(Driver::new("e1000", ""));
        config.add_or_update_driver(Driver::new("custom", ""));

        let names: Vec<_> = config
            .drivers_for_interface("eth0")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["virtio_net"]);

        config
            .interfaces
            .by_name_mut("eth0")
            .unwrap()
            .set_custom_driver(Some("custom".into()));
        let names: Vec<_> = config
            .drivers_for_interface("eth0")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["virtio_net", "custom"]);
        assert!(config.drivers_for_interface("eth9").is_empty());
    }

    #[test]
    fn test_configured_interface() {
        let config = config();
        assert!(config.configured_interface("eth0"));
        assert!(!config.configured_interface("eth9"));
        assert!(!config.configured_interface(""));
    }
}
