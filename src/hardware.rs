// Network Config - Hardware Detection
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Network hardware detection.
//!
//! Reads `/sys/class/net` to describe the devices present on the system.
//! A device with a `device` link is backed by hardware; anything else
//! (bridges, bonds, tunnels) is virtual.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::validation::validate_mac_address;
use crate::models::{ConnectionType, Hwinfo, Interface};

/// Source of hardware descriptors, keyed by kernel interface name.
pub trait HardwareLookup {
    fn hardware(&self, name: &str) -> Option<Hwinfo>;
}

impl HardwareLookup for HashMap<String, Hwinfo> {
    fn hardware(&self, name: &str) -> Option<Hwinfo> {
        self.get(name).cloned()
    }
}

/// sysfs-backed hardware lookup.
#[derive(Debug, Clone)]
pub struct SysfsHardware {
    root: PathBuf,
}

impl Default for SysfsHardware {
    fn default() -> Self {
        Self::new("/sys/class/net")
    }
}

impl SysfsHardware {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All interfaces except loopback, in natural name order.
    pub fn detect_interfaces(&self) -> Vec<Interface> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {:?}: {}", self.root, e);
                return Vec::new();
            }
        };

        let mut interfaces: Vec<Interface> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if name == "lo" {
                    return None;
                }
                let iface = match self.hardware(&name) {
                    Some(hw) => Interface::with_hardware(&name, hw),
                    None => {
                        Interface::virtual_interface(&name, virtual_type(&entry.path()))
                    }
                };
                Some(iface)
            })
            .collect();

        interfaces.sort_by(|a, b| natural_sort_key(&a.name).cmp(&natural_sort_key(&b.name)));
        debug!("Detected {} interfaces under {:?}", interfaces.len(), self.root);
        interfaces
    }
}

impl HardwareLookup for SysfsHardware {
    fn hardware(&self, name: &str) -> Option<Hwinfo> {
        let path = self.root.join(name);
        let device = path.join("device");
        let device_target = fs::read_link(&device).ok()?;

        let drivers: Vec<String> = link_name(&device.join("driver")).into_iter().collect();

        Some(Hwinfo {
            name: drivers
                .first()
                .map(|d| format!("{} device", d))
                .unwrap_or_else(|| name.to_string()),
            busid: device_target
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            mac: read_attr(&path, "address").and_then(|mac| {
                validate_mac_address(&mac)
                    .ok()
                    .filter(|m| m != "00:00:00:00:00:00")
            }),
            dev_port: read_attr(&path, "dev_port"),
            modalias: read_attr(&device, "modalias"),
            drivers,
        })
    }
}

/// Trimmed content of a sysfs attribute, if present and non-empty.
fn read_attr(dir: &Path, attr: &str) -> Option<String> {
    let value = fs::read_to_string(dir.join(attr)).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn link_name(link: &Path) -> Option<String> {
    let target = fs::read_link(link).ok()?;
    Some(target.file_name()?.to_string_lossy().to_string())
}

/// Type of a virtual interface from its sysfs directory layout.
fn virtual_type(path: &Path) -> Option<ConnectionType> {
    if path.join("bridge").exists() {
        Some(ConnectionType::Bridge)
    } else if path.join("bonding").exists() {
        Some(ConnectionType::Bonding)
    } else if path.join("tun_flags").exists() {
        // IFF_TUN is 0x0001, IFF_TAP 0x0002
        let flags = read_attr(path, "tun_flags")
            .and_then(|f| u32::from_str_radix(f.trim_start_matches("0x"), 16).ok())
            .unwrap_or(0);
        if flags & 0x0002 != 0 {
            Some(ConnectionType::Tap)
        } else {
            Some(ConnectionType::Tun)
        }
    } else {
        None
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortChunk {
    Text(String),
    Number(u64),
}

/// Sort key ordering embedded numbers by value ("eth2" before "eth10").
fn natural_sort_key(s: &str) -> Vec<SortChunk> {
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                chunks.push(SortChunk::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(SortChunk::Number(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !text.is_empty() {
        chunks.push(SortChunk::Text(text));
    }
    if !digits.is_empty() {
        chunks.push(SortChunk::Number(digits.parse().unwrap_or(u64::MAX)));
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn fake_device(root: &Path, devices: &Path, name: &str, busid: &str, mac: &str) {
        use std::os::unix::fs::symlink;

        let dev = devices.join(busid);
        fs::create_dir_all(&dev).unwrap();
        fs::write(dev.join("modalias"), "pci:v00008086d000015B8\n").unwrap();
        let driver = devices.join("drivers").join("e1000e");
        fs::create_dir_all(&driver).unwrap();
        symlink(&driver, dev.join("driver")).unwrap();

        let iface = root.join(name);
        fs::create_dir_all(&iface).unwrap();
        fs::write(iface.join("address"), format!("{}\n", mac)).unwrap();
        fs::write(iface.join("dev_port"), "0\n").unwrap();
        symlink(&dev, iface.join("device")).unwrap();
    }

    #[test]
    fn test_natural_sort_key() {
        let mut names = vec!["eth10", "eth2", "enp3s0", "br0", "eth1"];
        names.sort_by_key(|n| natural_sort_key(n));
        assert_eq!(names, vec!["br0", "enp3s0", "eth1", "eth2", "eth10"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_sysfs_hardware() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("class/net");
        let devices = dir.path().join("devices");
        fake_device(&root, &devices, "eth0", "0000:00:1c.0", "01:23:45:67:89:AB");

        let hw = SysfsHardware::new(&root).hardware("eth0").unwrap();
        assert_eq!(hw.busid.as_deref(), Some("0000:00:1c.0"));
        assert_eq!(hw.mac.as_deref(), Some("01:23:45:67:89:ab"));
        assert_eq!(hw.dev_port.as_deref(), Some("0"));
        assert_eq!(hw.modalias.as_deref(), Some("pci:v00008086d000015B8"));
        assert_eq!(hw.drivers, vec!["e1000e".to_string()]);

        assert!(SysfsHardware::new(&root).hardware("eth9").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_interfaces() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("class/net");
        let devices = dir.path().join("devices");
        fake_device(&root, &devices, "eth10", "0000:00:1d.0", "01:23:45:67:89:ac");
        fake_device(&root, &devices, "eth2", "0000:00:1c.0", "01:23:45:67:89:ab");
        fs::create_dir_all(root.join("lo")).unwrap();
        fs::create_dir_all(root.join("br0").join("bridge")).unwrap();
        fs::create_dir_all(root.join("tap0")).unwrap();
        fs::write(root.join("tap0").join("tun_flags"), "0x1002\n").unwrap();

        let interfaces = SysfsHardware::new(&root).detect_interfaces();
        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["br0", "eth2", "eth10", "tap0"]);

        assert!(interfaces[0].is_virtual());
        assert_eq!(
            interfaces[0].kind,
            crate::models::InterfaceKind::Virtual {
                connection_type: Some(ConnectionType::Bridge)
            }
        );
        assert!(interfaces[1].is_physical() && interfaces[1].is_present());
        assert_eq!(
            interfaces[3].kind,
            crate::models::InterfaceKind::Virtual {
                connection_type: Some(ConnectionType::Tap)
            }
        );
    }

    #[test]
    fn test_map_lookup() {
        let mut map = HashMap::new();
        map.insert("eth0".to_string(), Hwinfo::default());
        assert!(map.hardware("eth0").is_some());
        assert!(map.hardware("eth1").is_none());
    }
}
