// Network Config - Connection Configs
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Connection configuration model.
//!
//! A connection config describes how one interface is brought up:
//! - Boot protocol and start mode
//! - Primary IP address and aliases
//! - Type-specific settings (bridge ports, bond slaves, VLAN parent, ...)
//!
//! The set of connection types is closed. Each type maps to its default
//! settings through [`ConnectionType::new_config`].

use serde::{Deserialize, Serialize};

use super::ip::IpConfig;

/// Connection type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Ethernet,
    Wireless,
    Infiniband,
    Bridge,
    Bonding,
    Vlan,
    Dummy,
    Tun,
    Tap,
}

impl ConnectionType {
    /// All connection types.
    pub const ALL: [ConnectionType; 9] = [
        Self::Ethernet,
        Self::Wireless,
        Self::Infiniband,
        Self::Bridge,
        Self::Bonding,
        Self::Vlan,
        Self::Dummy,
        Self::Tun,
        Self::Tap,
    ];

    /// Short name used by interface configuration files.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Ethernet => "eth",
            Self::Wireless => "wlan",
            Self::Infiniband => "ib",
            Self::Bridge => "br",
            Self::Bonding => "bond",
            Self::Vlan => "vlan",
            Self::Dummy => "dummy",
            Self::Tun => "tun",
            Self::Tap => "tap",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.short_name() == name)
    }

    /// Whether interfaces of this type only exist through configuration.
    pub fn is_virtual(&self) -> bool {
        !matches!(self, Self::Ethernet | Self::Wireless | Self::Infiniband)
    }

    /// Default type-specific settings for this type.
    pub fn new_config(&self) -> ConnectionKind {
        match self {
            Self::Ethernet => ConnectionKind::Ethernet,
            Self::Wireless => ConnectionKind::Wireless(WirelessConfig::default()),
            Self::Infiniband => ConnectionKind::Infiniband {
                ipoib_mode: None,
            },
            Self::Bridge => ConnectionKind::Bridge(BridgeConfig::default()),
            Self::Bonding => ConnectionKind::Bonding(BondingConfig::default()),
            Self::Vlan => ConnectionKind::Vlan(VlanConfig::default()),
            Self::Dummy => ConnectionKind::Dummy,
            Self::Tun => ConnectionKind::Tun(TunnelOwner::default()),
            Self::Tap => ConnectionKind::Tap(TunnelOwner::default()),
        }
    }
}

/// How addresses are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BootProtocol {
    #[default]
    Static,
    Dhcp,
    Dhcp4,
    Dhcp6,
    DhcpAutoip,
    Autoip,
    None,
    Ibft,
}

impl BootProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dhcp => "dhcp",
            Self::Dhcp4 => "dhcp4",
            Self::Dhcp6 => "dhcp6",
            Self::DhcpAutoip => "dhcp+autoip",
            Self::Autoip => "autoip",
            Self::None => "none",
            Self::Ibft => "ibft",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        [
            Self::Static,
            Self::Dhcp,
            Self::Dhcp4,
            Self::Dhcp6,
            Self::DhcpAutoip,
            Self::Autoip,
            Self::None,
            Self::Ibft,
        ]
        .into_iter()
        .find(|p| p.as_str() == name)
    }

    pub fn is_dhcp(&self) -> bool {
        matches!(self, Self::Dhcp | Self::Dhcp4 | Self::Dhcp6 | Self::DhcpAutoip)
    }
}

/// When a connection is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Startmode {
    /// At boot.
    Auto,
    /// When the device appears.
    Hotplug,
    /// Never shut down (root on network storage).
    Nfsroot,
    /// Never.
    Off,
    /// On request.
    #[default]
    Manual,
    /// On cable plug, with a priority among competing interfaces.
    Ifplugd {
        #[serde(default)]
        priority: u32,
    },
}

impl Startmode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Hotplug => "hotplug",
            Self::Nfsroot => "nfsroot",
            Self::Off => "off",
            Self::Manual => "manual",
            Self::Ifplugd { .. } => "ifplugd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            // "onboot" and "boot" are legacy spellings of "auto"
            "auto" | "onboot" | "boot" => Some(Self::Auto),
            "hotplug" => Some(Self::Hotplug),
            "nfsroot" => Some(Self::Nfsroot),
            "off" => Some(Self::Off),
            "manual" => Some(Self::Manual),
            "ifplugd" => Some(Self::Ifplugd { priority: 0 }),
            _ => None,
        }
    }
}

/// Bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Member interface names, in order.
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub stp: bool,
    #[serde(default)]
    pub forward_delay: u32,
}

/// Bonding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BondingConfig {
    /// Member interface names, in order.
    #[serde(default)]
    pub slaves: Vec<String>,
    /// Bonding driver options (e.g., "mode=active-backup miimon=100").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub options: String,
}

/// VLAN settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VlanConfig {
    /// Interface carrying the tagged traffic.
    #[serde(default)]
    pub parent_device: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

/// Wireless settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WirelessConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,
}

/// Owner of a tun/tap device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TunnelOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Type-specific connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionKind {
    Ethernet,
    Wireless(WirelessConfig),
    Infiniband {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ipoib_mode: Option<String>,
    },
    Bridge(BridgeConfig),
    Bonding(BondingConfig),
    Vlan(VlanConfig),
    Dummy,
    Tun(TunnelOwner),
    Tap(TunnelOwner),
}

impl ConnectionKind {
    pub fn connection_type(&self) -> ConnectionType {
        match self {
            Self::Ethernet => ConnectionType::Ethernet,
            Self::Wireless(_) => ConnectionType::Wireless,
            Self::Infiniband { .. } => ConnectionType::Infiniband,
            Self::Bridge(_) => ConnectionType::Bridge,
            Self::Bonding(_) => ConnectionType::Bonding,
            Self::Vlan(_) => ConnectionType::Vlan,
            Self::Dummy => ConnectionType::Dummy,
            Self::Tun(_) => ConnectionType::Tun,
            Self::Tap(_) => ConnectionType::Tap,
        }
    }
}

/// Configuration of one network connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Config identifier.
    pub name: String,
    /// Interface this config binds to.
    pub interface: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub bootproto: BootProtocol,
    /// Primary address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpConfig>,
    /// Secondary addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_aliases: Vec<IpConfig>,
    #[serde(default)]
    pub startmode: Startmode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Link-layer address override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lladdress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethtool_options: Option<String>,
    #[serde(flatten)]
    pub kind: ConnectionKind,
}

impl ConnectionConfig {
    /// Create a config of the given type with default settings.
    pub fn new(
        name: impl Into<String>,
        interface: impl Into<String>,
        connection_type: ConnectionType,
    ) -> Self {
        Self {
            name: name.into(),
            interface: interface.into(),
            description: String::new(),
            bootproto: BootProtocol::default(),
            ip: None,
            ip_aliases: Vec::new(),
            startmode: Startmode::default(),
            firewall_zone: None,
            hostname: None,
            lladdress: None,
            ethtool_options: None,
            kind: connection_type.new_config(),
        }
    }

    /// Ethernet config named after its interface.
    pub fn ethernet(interface: impl Into<String>) -> Self {
        let interface = interface.into();
        Self::new(interface.clone(), interface, ConnectionType::Ethernet)
    }

    /// Bridge config named after its interface.
    pub fn bridge(interface: impl Into<String>, ports: Vec<String>) -> Self {
        let interface = interface.into();
        let mut conn = Self::new(interface.clone(), interface, ConnectionType::Bridge);
        conn.kind = ConnectionKind::Bridge(BridgeConfig {
            ports,
            ..Default::default()
        });
        conn
    }

    /// Bonding config named after its interface.
    pub fn bonding(interface: impl Into<String>, slaves: Vec<String>) -> Self {
        let interface = interface.into();
        let mut conn = Self::new(interface.clone(), interface, ConnectionType::Bonding);
        conn.kind = ConnectionKind::Bonding(BondingConfig {
            slaves,
            options: String::new(),
        });
        conn
    }

    /// VLAN config named after its interface.
    pub fn vlan(interface: impl Into<String>, parent_device: impl Into<String>) -> Self {
        let interface = interface.into();
        let mut conn = Self::new(interface.clone(), interface, ConnectionType::Vlan);
        conn.kind = ConnectionKind::Vlan(VlanConfig {
            parent_device: parent_device.into(),
            vlan_id: None,
        });
        conn
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.kind.connection_type()
    }

    pub fn is_virtual(&self) -> bool {
        self.connection_type().is_virtual()
    }

    /// Bridge ports, if this is a bridge.
    pub fn ports(&self) -> Option<&[String]> {
        match &self.kind {
            ConnectionKind::Bridge(bridge) => Some(&bridge.ports),
            _ => None,
        }
    }

    /// Bond slaves, if this is a bond.
    pub fn slaves(&self) -> Option<&[String]> {
        match &self.kind {
            ConnectionKind::Bonding(bond) => Some(&bond.slaves),
            _ => None,
        }
    }

    /// VLAN parent device, if this is a VLAN with a parent set.
    pub fn parent_device(&self) -> Option<&str> {
        match &self.kind {
            ConnectionKind::Vlan(vlan) if !vlan.parent_device.is_empty() => {
                Some(&vlan.parent_device)
            }
            _ => None,
        }
    }

    /// Interface names this config depends on.
    pub fn dependencies(&self) -> Vec<&str> {
        match &self.kind {
            ConnectionKind::Bridge(bridge) => bridge.ports.iter().map(String::as_str).collect(),
            ConnectionKind::Bonding(bond) => bond.slaves.iter().map(String::as_str).collect(),
            ConnectionKind::Vlan(_) => self.parent_device().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Replace every reference to `old` with `new`.
    ///
    /// Covers the bound interface, bridge ports, bond slaves and the VLAN
    /// parent. Returns whether anything changed.
    pub fn rename_references(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        if self.interface == old {
            self.interface = new.to_string();
            changed = true;
        }
        let members = match &mut self.kind {
            ConnectionKind::Bridge(bridge) => Some(&mut bridge.ports),
            ConnectionKind::Bonding(bond) => Some(&mut bond.slaves),
            ConnectionKind::Vlan(vlan) => {
                if vlan.parent_device == old {
                    vlan.parent_device = new.to_string();
                    changed = true;
                }
                None
            }
            _ => None,
        };
        if let Some(members) = members {
            for member in members.iter_mut().filter(|m| m.as_str() == old) {
                *member = new.to_string();
                changed = true;
            }
        }
        changed
    }

    /// Drop `name` from bridge ports or bond slaves.
    pub fn remove_member(&mut self, name: &str) -> bool {
        let members = match &mut self.kind {
            ConnectionKind::Bridge(bridge) => &mut bridge.ports,
            ConnectionKind::Bonding(bond) => &mut bond.slaves,
            _ => return false,
        };
        let before = members.len();
        members.retain(|m| m != name);
        members.len() != before
    }

    /// All addresses, primary first.
    pub fn all_ips(&self) -> Vec<&IpConfig> {
        self.ip.iter().chain(self.ip_aliases.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_table() {
        for connection_type in ConnectionType::ALL {
            assert_eq!(
                ConnectionType::from_short_name(connection_type.short_name()),
                Some(connection_type)
            );
            assert_eq!(connection_type.new_config().connection_type(), connection_type);
        }
        assert_eq!(ConnectionType::from_short_name("ppp"), None);
    }

    #[test]
    fn test_virtual_types() {
        assert!(!ConnectionType::Ethernet.is_virtual());
        assert!(!ConnectionType::Wireless.is_virtual());
        assert!(ConnectionType::Bridge.is_virtual());
        assert!(ConnectionType::Vlan.is_virtual());
        assert!(ConnectionType::Tap.is_virtual());
    }

    #[test]
    fn test_bootproto_names() {
        assert_eq!(BootProtocol::from_name("DHCP"), Some(BootProtocol::Dhcp));
        assert_eq!(BootProtocol::from_name("dhcp+autoip"), Some(BootProtocol::DhcpAutoip));
        assert_eq!(BootProtocol::from_name("bogus"), None);
        assert!(BootProtocol::Dhcp4.is_dhcp());
        assert!(!BootProtocol::Static.is_dhcp());
    }

    #[test]
    fn test_startmode_names() {
        assert_eq!(Startmode::from_name("onboot"), Some(Startmode::Auto));
        assert_eq!(
            Startmode::from_name("ifplugd"),
            Some(Startmode::Ifplugd { priority: 0 })
        );
        assert_eq!(Startmode::from_name("bogus"), None);
    }

    #[test]
    fn test_rename_references_in_bridge() {
        let mut br0 = ConnectionConfig::bridge("br0", vec!["eth0".into(), "eth1".into()]);
        assert!(br0.rename_references("eth0", "eth5"));
        assert_eq!(br0.ports().unwrap(), ["eth5", "eth1"]);
        assert!(!br0.rename_references("eth9", "eth10"));
    }

    #[test]
    fn test_rename_references_in_vlan() {
        let mut vlan = ConnectionConfig::vlan("vlan100", "eth0");
        vlan.rename_references("eth0", "eth1");
        assert_eq!(vlan.parent_device(), Some("eth1"));
        assert_eq!(vlan.interface, "vlan100");
    }

    #[test]
    fn test_remove_member() {
        let mut bond0 = ConnectionConfig::bonding("bond0", vec!["eth0".into(), "eth1".into()]);
        assert!(bond0.remove_member("eth0"));
        assert_eq!(bond0.slaves().unwrap(), ["eth1"]);

        let mut eth0 = ConnectionConfig::ethernet("eth0");
        assert!(!eth0.remove_member("eth1"));
    }

    #[test]
    fn test_dependencies() {
        let vlan = ConnectionConfig::vlan("vlan100", "");
        assert!(vlan.dependencies().is_empty());

        let bond0 = ConnectionConfig::bonding("bond0", vec!["eth0".into()]);
        assert_eq!(bond0.dependencies(), vec!["eth0"]);
    }
}
