// Network Config - Sysconfig Reader
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Reading of ifcfg-style interface files into a [`Config`].
//!
//! Each `ifcfg-<name>` file is a list of shell-style `KEY='value'`
//! assignments. An [`InterfaceFile`] holds those fields and turns them into
//! a typed [`ConnectionConfig`]; [`ConfigReader`] combines the files with
//! the detected hardware into a full configuration.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, warn};

use crate::hardware::HardwareLookup;
use crate::models::validation::validate_vlan_id;
use crate::models::{
    BootProtocol, BridgeConfig, BondingConfig, Config, ConfigSource, ConnectionConfig,
    ConnectionConfigsCollection, ConnectionKind, ConnectionType, Dns, Driver, Interface,
    InterfacesCollection, IpAddress, IpConfig, Result, Routing, Startmode, TunnelOwner,
    VlanConfig, WirelessConfig,
};

/// Prefix of interface configuration file names.
pub const IFCFG_PREFIX: &str = "ifcfg-";

/// Suffixes of files left behind by editors and package managers.
const IGNORED_SUFFIXES: [&str; 6] = ["~", ".bak", ".orig", ".rpmnew", ".rpmsave", ".old"];

/// Fields of one interface configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceFile {
    pub interface: String,
    fields: BTreeMap<String, String>,
}

impl InterfaceFile {
    pub fn new(interface: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            interface: interface.into(),
            fields,
        }
    }

    /// Parse `KEY=value` lines. Comments and malformed lines are skipped.
    pub fn parse(interface: impl Into<String>, content: &str) -> Self {
        let fields = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return None;
                }
                Some((key.to_string(), unquote(value.trim()).to_string()))
            })
            .collect();
        Self::new(interface, fields)
    }

    /// Load `<dir>/ifcfg-<interface>`.
    pub fn load(path: &Path) -> Result<Self> {
        let interface = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let interface = interface
            .strip_prefix(IFCFG_PREFIX)
            .unwrap_or(&interface)
            .to_string();
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(interface, &content))
    }

    /// Load every interface file in `dir`, except loopback and backups.
    pub fn load_all(dir: &Path) -> Result<Vec<Self>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(interface) = name.strip_prefix(IFCFG_PREFIX) else {
                continue;
            };
            if interface.is_empty()
                || interface == "lo"
                || IGNORED_SUFFIXES.iter().any(|s| interface.ends_with(s))
            {
                continue;
            }
            files.push(Self::load(&entry.path())?);
        }
        files.sort_by(|a, b| a.interface.cmp(&b.interface));
        debug!("Loaded {} interface files from {:?}", files.len(), dir);
        Ok(files)
    }

    /// Value of `key`, if set and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Values of `base` and every `base<suffix>` key, keyed by suffix.
    pub fn suffixed(&self, base: &str) -> BTreeMap<&str, &str> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .filter_map(|(k, v)| Some((k.strip_prefix(base)?, v.as_str())))
            .collect()
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_yes)
    }

    /// Connection type implied by the fields present.
    pub fn connection_type(&self) -> ConnectionType {
        if self.flag("BONDING_MASTER") {
            return ConnectionType::Bonding;
        }
        if self.flag("BRIDGE") {
            return ConnectionType::Bridge;
        }
        if self.get("ETHERDEVICE").is_some() {
            return ConnectionType::Vlan;
        }
        match self.get("TUNNEL") {
            Some("tun") => return ConnectionType::Tun,
            Some("tap") => return ConnectionType::Tap,
            _ => {}
        }
        if self.fields.keys().any(|k| k.starts_with("WIRELESS")) {
            return ConnectionType::Wireless;
        }
        if let Some(t) = self.get("INTERFACETYPE").and_then(ConnectionType::from_short_name) {
            return t;
        }
        if self.interface.starts_with("ib") {
            return ConnectionType::Infiniband;
        }
        ConnectionType::Ethernet
    }

    /// Build the connection config described by this file.
    pub fn connection_config(&self, hosts: &Hosts) -> ConnectionConfig {
        let mut conn = ConnectionConfig::new(&self.interface, &self.interface, self.connection_type());

        let bootproto = self.get("BOOTPROTO").unwrap_or("static");
        conn.bootproto = BootProtocol::from_name(bootproto).unwrap_or_else(|| {
            warn!("{}: unknown BOOTPROTO '{}', using static", self.interface, bootproto);
            BootProtocol::Static
        });

        let startmode = self.get("STARTMODE").unwrap_or("manual");
        conn.startmode = match Startmode::from_name(startmode) {
            Some(Startmode::Ifplugd { .. }) => Startmode::Ifplugd {
                priority: self
                    .get("IFPLUGD_PRIORITY")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
            },
            Some(mode) => mode,
            None => {
                warn!("{}: unknown STARTMODE '{}', using manual", self.interface, startmode);
                Startmode::Manual
            }
        };

        conn.description = self.get("NAME").unwrap_or_default().to_string();
        conn.lladdress = self.get("LLADDR").map(str::to_string);
        conn.ethtool_options = self.get("ETHTOOL_OPTIONS").map(str::to_string);
        conn.firewall_zone = self.get("ZONE").map(str::to_string);

        let (primary, aliases): (Vec<IpConfig>, Vec<IpConfig>) =
            self.all_ips().into_iter().partition(IpConfig::is_primary);
        conn.ip = primary.into_iter().next();
        conn.ip_aliases = aliases;
        conn.hostname = conn
            .ip
            .as_ref()
            .and_then(|ip| hosts.names(&ip.address.address).first().cloned());

        conn.kind = self.connection_kind(conn.connection_type());
        conn
    }

    fn all_ips(&self) -> Vec<IpConfig> {
        let prefixlens = self.suffixed("PREFIXLEN");
        let netmasks = self.suffixed("NETMASK");
        let labels = self.suffixed("LABEL");
        let remotes = self.suffixed("REMOTE_IPADDR");
        let broadcasts = self.suffixed("BROADCAST");

        self.suffixed("IPADDR")
            .into_iter()
            .filter_map(|(id, value)| {
                let mut address: IpAddress = match value.parse() {
                    Ok(address) => address,
                    Err(e) => {
                        warn!("{}: skipping IPADDR{}: {}", self.interface, id, e);
                        return None;
                    }
                };
                if !address.has_prefix() {
                    if let Some(netmask) = netmasks.get(id) {
                        if let Err(e) = address.set_netmask(netmask) {
                            warn!("{}: ignoring NETMASK{}: {}", self.interface, id, e);
                        }
                    }
                    if let Some(prefix) = prefixlens.get(id).and_then(|p| p.parse().ok()) {
                        address.prefix = Some(prefix);
                    }
                }

                let mut ip = IpConfig::new(address).with_id(id);
                ip.label = labels.get(id).map(|l| l.to_string());
                ip.remote_address = remotes.get(id).and_then(|r| r.parse().ok());
                ip.broadcast = broadcasts.get(id).and_then(|b| b.parse().ok());
                Some(ip)
            })
            .collect()
    }

    fn connection_kind(&self, connection_type: ConnectionType) -> ConnectionKind {
        let owned = |key: &str| self.get(key).map(str::to_string);

        match connection_type {
            ConnectionType::Bridge => ConnectionKind::Bridge(BridgeConfig {
                ports: self
                    .get("BRIDGE_PORTS")
                    .map(|p| p.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                stp: self.flag("BRIDGE_STP"),
                forward_delay: self
                    .get("BRIDGE_FORWARDDELAY")
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(0),
            }),
            ConnectionType::Bonding => {
                let mut slaves: Vec<(&str, &str)> =
                    self.suffixed("BONDING_SLAVE").into_iter().collect();
                slaves.sort_by_key(|(suffix, _)| {
                    suffix.trim_start_matches('_').parse::<u32>().unwrap_or(u32::MAX)
                });
                ConnectionKind::Bonding(BondingConfig {
                    slaves: slaves.into_iter().map(|(_, s)| s.to_string()).collect(),
                    options: self.get("BONDING_MODULE_OPTS").unwrap_or_default().to_string(),
                })
            }
            ConnectionType::Vlan => ConnectionKind::Vlan(VlanConfig {
                parent_device: self.get("ETHERDEVICE").unwrap_or_default().to_string(),
                vlan_id: self
                    .get("VLAN_ID")
                    .and_then(|id| id.parse().ok())
                    .and_then(|id| validate_vlan_id(id).ok()),
            }),
            ConnectionType::Wireless => ConnectionKind::Wireless(WirelessConfig {
                essid: owned("WIRELESS_ESSID"),
                mode: owned("WIRELESS_MODE"),
                auth_mode: owned("WIRELESS_AUTH_MODE"),
            }),
            ConnectionType::Tun | ConnectionType::Tap => {
                let owner = TunnelOwner {
                    owner: owned("TUNNEL_SET_OWNER"),
                    group: owned("TUNNEL_SET_GROUP"),
                };
                if connection_type == ConnectionType::Tun {
                    ConnectionKind::Tun(owner)
                } else {
                    ConnectionKind::Tap(owner)
                }
            }
            ConnectionType::Infiniband => ConnectionKind::Infiniband {
                ipoib_mode: owned("IPOIB_MODE"),
            },
            ConnectionType::Ethernet | ConnectionType::Dummy => connection_type.new_config(),
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

fn is_yes(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "yes" | "on" | "true" | "1")
}

/// Static host name table (`/etc/hosts`).
#[derive(Debug, Clone, Default)]
pub struct Hosts {
    names: HashMap<IpAddr, Vec<String>>,
}

impl Hosts {
    pub fn parse(content: &str) -> Self {
        let mut names: HashMap<IpAddr, Vec<String>> = HashMap::new();
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or_default();
            let mut tokens = line.split_whitespace();
            let Some(address) = tokens.next().and_then(|a| a.parse::<IpAddr>().ok()) else {
                continue;
            };
            names
                .entry(address)
                .or_default()
                .extend(tokens.map(str::to_string));
        }
        Self { names }
    }

    /// Load a hosts file; a missing file yields an empty table.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!("No hosts table at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn names(&self, address: &IpAddr) -> &[String] {
        self.names.get(address).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Builds a [`Config`] from interface files and detected hardware.
pub struct ConfigReader<H: HardwareLookup> {
    hardware: H,
    hosts: Hosts,
    discovered: Vec<Interface>,
    routing: Routing,
    dns: Dns,
    drivers: Vec<Driver>,
}

impl<H: HardwareLookup> ConfigReader<H> {
    pub fn new(hardware: H) -> Self {
        Self {
            hardware,
            hosts: Hosts::default(),
            discovered: Vec::new(),
            routing: Routing::default(),
            dns: Dns::default(),
            drivers: Vec::new(),
        }
    }

    pub fn with_hosts(mut self, hosts: Hosts) -> Self {
        self.hosts = hosts;
        self
    }

    /// Interfaces found on the system, included even when unconfigured.
    pub fn with_discovered(mut self, interfaces: Vec<Interface>) -> Self {
        self.discovered = interfaces;
        self
    }

    pub fn with_routing(mut self, routing: Routing) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_dns(mut self, dns: Dns) -> Self {
        self.dns = dns;
        self
    }

    pub fn with_drivers(mut self, drivers: Vec<Driver>) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn read(self, files: &[InterfaceFile]) -> Result<Config> {
        let mut interfaces = InterfacesCollection::new();
        for iface in self.discovered {
            if interfaces.contains(&iface.name) {
                warn!("Interface '{}' detected twice, keeping the first", iface.name);
                continue;
            }
            interfaces.push(iface)?;
        }

        let mut config = Config::new(
            interfaces,
            ConnectionConfigsCollection::default(),
            self.routing,
            self.dns,
            self.drivers,
            ConfigSource::Sysconfig,
        );

        for file in files {
            let conn = file.connection_config(&self.hosts);
            if !config.interfaces.contains(&conn.interface) {
                let iface = if conn.is_virtual() {
                    Interface::virtual_interface(&conn.interface, Some(conn.connection_type()))
                } else {
                    match self.hardware.hardware(&conn.interface) {
                        Some(hw) => Interface::with_hardware(&conn.interface, hw),
                        None => Interface::physical(&conn.interface),
                    }
                };
                config.interfaces.push(iface)?;
            }
            config.add_or_update_connection_config(conn)?;
        }

        debug!(
            "Read {} interfaces and {} connection configs",
            config.interfaces.len(),
            config.connections.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hwinfo;

    fn file(interface: &str, content: &str) -> InterfaceFile {
        InterfaceFile::parse(interface, content)
    }

    #[test]
    fn test_parse_fields() {
        let f = file(
            "eth0",
            "# comment\nBOOTPROTO='dhcp'\nSTARTMODE=\"auto\"\nNAME=Ethernet Card 0\nbogus line\nEMPTY=''\n",
        );
        assert_eq!(f.get("BOOTPROTO"), Some("dhcp"));
        assert_eq!(f.get("STARTMODE"), Some("auto"));
        assert_eq!(f.get("NAME"), Some("Ethernet Card 0"));
        assert_eq!(f.get("EMPTY"), None);

        let conn = f.connection_config(&Hosts::default());
        assert_eq!(conn.bootproto, BootProtocol::Dhcp);
        assert_eq!(conn.startmode, Startmode::Auto);
        assert_eq!(conn.description, "Ethernet Card 0");
        assert_eq!(conn.connection_type(), ConnectionType::Ethernet);
    }

    #[test]
    fn test_defaults_and_unknown_values() {
        let conn = file("eth0", "BOOTPROTO='weird'\n").connection_config(&Hosts::default());
        assert_eq!(conn.bootproto, BootProtocol::Static);
        assert_eq!(conn.startmode, Startmode::Manual);
    }

    #[test]
    fn test_ifplugd_priority() {
        let conn = file("eth0", "STARTMODE='ifplugd'\nIFPLUGD_PRIORITY='50'\n")
            .connection_config(&Hosts::default());
        assert_eq!(conn.startmode, Startmode::Ifplugd { priority: 50 });
    }

    #[test]
    fn test_addresses() {
        let f = file(
            "eth0",
            "IPADDR='192.168.122.1/24'\n\
             IPADDR_0='10.0.0.2'\nNETMASK_0='255.255.0.0'\nLABEL_0='virt'\n\
             IPADDR_1='10.0.0.3'\nPREFIXLEN_1='8'\nBROADCAST_1='10.255.255.255'\n\
             IPADDR_2='not-an-ip'\n",
        );
        let hosts = Hosts::parse("192.168.122.1  foo.example.com foo # local\n");
        let conn = f.connection_config(&hosts);

        let ip = conn.ip.as_ref().unwrap();
        assert_eq!(ip.address.to_string(), "192.168.122.1/24");
        assert_eq!(conn.hostname.as_deref(), Some("foo.example.com"));

        assert_eq!(conn.ip_aliases.len(), 2);
        assert_eq!(conn.ip_aliases[0].id, "_0");
        assert_eq!(conn.ip_aliases[0].address.prefix, Some(16));
        assert_eq!(conn.ip_aliases[0].label.as_deref(), Some("virt"));
        assert_eq!(conn.ip_aliases[1].address.prefix, Some(8));
        assert!(conn.ip_aliases[1].broadcast.is_some());
    }

    #[test]
    fn test_type_detection() {
        let cases = [
            ("bond0", "BONDING_MASTER='yes'\n", ConnectionType::Bonding),
            ("br0", "BRIDGE='yes'\n", ConnectionType::Bridge),
            ("eth0.100", "ETHERDEVICE='eth0'\n", ConnectionType::Vlan),
            ("tun0", "TUNNEL='tun'\n", ConnectionType::Tun),
            ("tap0", "TUNNEL='tap'\n", ConnectionType::Tap),
            ("wlan0", "WIRELESS_ESSID='home'\n", ConnectionType::Wireless),
            ("dummy0", "INTERFACETYPE='dummy'\n", ConnectionType::Dummy),
            ("ib0", "", ConnectionType::Infiniband),
            ("eth0", "", ConnectionType::Ethernet),
        ];
        for (name, content, expected) in cases {
            assert_eq!(file(name, content).connection_type(), expected, "{}", name);
        }
    }

    #[test]
    fn test_type_specific_fields() {
        let hosts = Hosts::default();

        let br = file("br0", "BRIDGE='yes'\nBRIDGE_PORTS='eth0 eth1'\nBRIDGE_STP='on'\nBRIDGE_FORWARDDELAY='15'\n")
            .connection_config(&hosts);
        assert_eq!(
            br.kind,
            ConnectionKind::Bridge(BridgeConfig {
                ports: vec!["eth0".into(), "eth1".into()],
                stp: true,
                forward_delay: 15,
            })
        );

        let bond = file(
            "bond0",
            "BONDING_MASTER='yes'\nBONDING_SLAVE_10='eth2'\nBONDING_SLAVE_2='eth1'\nBONDING_SLAVE_0='eth0'\nBONDING_MODULE_OPTS='mode=active-backup'\n",
        )
        .connection_config(&hosts);
        assert_eq!(bond.slaves().unwrap(), &["eth0", "eth1", "eth2"]);

        let vlan = file("eth0.100", "ETHERDEVICE='eth0'\nVLAN_ID='100'\n").connection_config(&hosts);
        assert_eq!(vlan.parent_device(), Some("eth0"));
        assert_eq!(
            vlan.kind,
            ConnectionKind::Vlan(VlanConfig {
                parent_device: "eth0".into(),
                vlan_id: Some(100)
            })
        );

        let tap = file("tap0", "TUNNEL='tap'\nTUNNEL_SET_OWNER='nobody'\n").connection_config(&hosts);
        assert_eq!(
            tap.kind,
            ConnectionKind::Tap(TunnelOwner {
                owner: Some("nobody".into()),
                group: None
            })
        );
    }

    #[test]
    fn test_load_all_skips_loopback_and_backups() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ifcfg-eth0", "ifcfg-lo", "ifcfg-eth0.bak", "ifcfg-br0", "ifroute-eth0"] {
            fs::write(dir.path().join(name), "BOOTPROTO='dhcp'\n").unwrap();
        }
        let files = InterfaceFile::load_all(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.interface.as_str()).collect();
        assert_eq!(names, vec!["br0", "eth0"]);
    }

    #[test]
    fn test_config_reader() {
        let mut hardware = HashMap::new();
        hardware.insert(
            "eth1".to_string(),
            Hwinfo {
                mac: Some("01:23:45:67:89:ab".into()),
                ..Default::default()
            },
        );

        let files = vec![
            file("eth1", "BOOTPROTO='dhcp'\n"),
            file("br0", "BRIDGE='yes'\nBRIDGE_PORTS='eth0 eth1'\n"),
            file("eth0.10", "ETHERDEVICE='eth0'\n"),
        ];
        let config = ConfigReader::new(hardware)
            .with_discovered(vec![Interface::physical("eth0")])
            .read(&files)
            .unwrap();

        assert_eq!(config.interfaces.names(), vec!["eth0", "eth1", "br0", "eth0.10"]);
        assert_eq!(config.interfaces.by_name("eth1").unwrap().mac(), Some("01:23:45:67:89:ab"));
        assert!(config.interfaces.by_name("br0").unwrap().is_virtual());
        assert!(config.interfaces.by_name("eth0.10").unwrap().is_virtual());
        assert_eq!(config.connections.len(), 3);
        assert!(config.configured_interface("eth1"));
        assert!(!config.configured_interface("eth0"));
        assert_eq!(config.source, ConfigSource::Sysconfig);
    }
}
