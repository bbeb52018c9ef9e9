// Network Config - Interface Model
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Network interface records.
//!
//! An interface is either physical (backed by hardware and optionally
//! bound to a custom driver) or virtual (a bridge, bond, VLAN, ... that
//! only exists through configuration).

use serde::{Deserialize, Serialize};
use tracing::info;

use super::connection::ConnectionType;

/// How the interface name was derived from the kernel-assigned one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenamingMechanism {
    /// Kernel name is kept.
    #[default]
    None,
    /// Name is pinned to the MAC address.
    Mac,
    /// Name is pinned to the bus location and device port.
    BusId,
    /// Name is set by some other tool.
    Custom,
}

impl RenamingMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mac => "mac",
            Self::BusId => "bus_id",
            Self::Custom => "custom",
        }
    }

    /// Parse a mechanism name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "mac" => Some(Self::Mac),
            "bus_id" | "busid" => Some(Self::BusId),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Whether this mechanism is persisted as a udev naming rule.
    pub fn has_udev_rule(&self) -> bool {
        matches!(self, Self::Mac | Self::BusId)
    }
}

/// Hardware descriptor of a physical interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Hwinfo {
    /// Human-readable device name (e.g., "Ethernet Card 0").
    #[serde(default)]
    pub name: String,
    /// Kernel device path component (e.g., "0000:00:1c.0").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busid: Option<String>,
    /// Permanent MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Device port on multi-port cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_port: Option<String>,
    /// Kernel module alias of the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalias: Option<String>,
    /// Drivers the device is (or can be) bound to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<String>,
}

/// Physical interface data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhysicalInfo {
    /// Hardware descriptor; absent when the device is not present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hwinfo>,
    /// Driver override taking precedence over auto-detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_driver: Option<String>,
}

/// Physical or virtual interface data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InterfaceKind {
    Physical(PhysicalInfo),
    Virtual {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        connection_type: Option<ConnectionType>,
    },
}

/// A network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Kernel-visible device name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// How `name` was derived.
    #[serde(default)]
    pub renaming_mechanism: RenamingMechanism,
    /// Kernel-assigned name before the first rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    old_name: Option<String>,
    /// Physical or virtual data.
    #[serde(flatten)]
    pub kind: InterfaceKind,
}

impl Interface {
    /// Create a physical interface without hardware information.
    pub fn physical(name: impl Into<String>) -> Self {
        Self::with_kind(name, InterfaceKind::Physical(PhysicalInfo::default()))
    }

    /// Create a physical interface backed by the given hardware.
    pub fn with_hardware(name: impl Into<String>, hardware: Hwinfo) -> Self {
        Self::with_kind(
            name,
            InterfaceKind::Physical(PhysicalInfo {
                hardware: Some(hardware),
                custom_driver: None,
            }),
        )
    }

    /// Create a virtual interface.
    pub fn virtual_interface(name: impl Into<String>, connection_type: Option<ConnectionType>) -> Self {
        Self::with_kind(name, InterfaceKind::Virtual { connection_type })
    }

    fn with_kind(name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            renaming_mechanism: RenamingMechanism::None,
            old_name: None,
            kind,
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(self.kind, InterfaceKind::Physical(_))
    }

    pub fn is_virtual(&self) -> bool {
        !self.is_physical()
    }

    /// Whether the interface exists on the running system.
    ///
    /// Virtual interfaces always count as present; physical ones only
    /// when a hardware descriptor was found.
    pub fn is_present(&self) -> bool {
        match &self.kind {
            InterfaceKind::Physical(info) => info.hardware.is_some(),
            InterfaceKind::Virtual { .. } => true,
        }
    }

    pub fn hardware(&self) -> Option<&Hwinfo> {
        match &self.kind {
            InterfaceKind::Physical(info) => info.hardware.as_ref(),
            InterfaceKind::Virtual { .. } => None,
        }
    }

    pub fn custom_driver(&self) -> Option<&str> {
        match &self.kind {
            InterfaceKind::Physical(info) => info.custom_driver.as_deref(),
            InterfaceKind::Virtual { .. } => None,
        }
    }

    /// Set the driver override. Ignored for virtual interfaces.
    pub fn set_custom_driver(&mut self, driver: Option<String>) {
        if let InterfaceKind::Physical(info) = &mut self.kind {
            info.custom_driver = driver;
        }
    }

    pub fn mac(&self) -> Option<&str> {
        self.hardware().and_then(|hw| hw.mac.as_deref())
    }

    pub fn modalias(&self) -> Option<&str> {
        self.hardware().and_then(|hw| hw.modalias.as_deref())
    }

    /// The kernel-assigned name, or the current one if never renamed.
    pub fn old_name(&self) -> &str {
        self.old_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether the current name differs from the kernel-assigned one.
    pub fn is_renamed(&self) -> bool {
        self.old_name.as_deref().is_some_and(|old| old != self.name)
    }

    /// Rename the interface.
    ///
    /// The first kernel name is kept across repeated renames so a single
    /// rule keyed on the real origin replaces any earlier one.
    pub fn rename(&mut self, new_name: impl Into<String>, mechanism: RenamingMechanism) {
        let new_name = new_name.into();
        info!(
            "Renaming interface '{}' to '{}' using '{}'",
            self.name,
            new_name,
            mechanism.as_str()
        );
        if self.old_name.is_none() && self.name != new_name {
            self.old_name = Some(self.name.clone());
        }
        self.name = new_name;
        self.renaming_mechanism = mechanism;
    }
}
