// Network Config - DNS Settings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Host name resolution settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Which interface may set the host name from DHCP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DhcpHostname {
    /// Any interface may set it.
    Any,
    /// No interface sets it.
    #[default]
    None,
    /// Only the named interface sets it.
    Interface(String),
}

impl DhcpHostname {
    /// Whether this points at the given interface.
    pub fn is_interface(&self, name: &str) -> bool {
        matches!(self, Self::Interface(iface) if iface == name)
    }
}

impl fmt::Display for DhcpHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, ":any"),
            Self::None => write!(f, ":none"),
            Self::Interface(name) => write!(f, "{}", name),
        }
    }
}

/// DNS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dns {
    /// Static host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Name servers, in resolution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<IpAddr>,
    /// Search domains.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub searchlist: Vec<String>,
    /// resolv.conf update policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolv_conf_policy: Option<String>,
    /// Source of the DHCP-provided host name.
    #[serde(default)]
    pub dhcp_hostname: DhcpHostname,
}
