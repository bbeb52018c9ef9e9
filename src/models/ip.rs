// Network Config - IP Addressing
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! IP address and per-connection IP configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use super::error::{Error, Result};
use super::validation::{validate_cidr, validate_ip};

/// IP address with an optional prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    /// IP address.
    pub address: IpAddr,
    /// Prefix length (e.g., 24 for /24).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<u8>,
}

impl IpAddress {
    pub fn new(address: IpAddr, prefix: Option<u8>) -> Self {
        Self { address, prefix }
    }

    /// Whether a prefix length is known.
    pub fn has_prefix(&self) -> bool {
        self.prefix.is_some()
    }

    /// Set the prefix from a dotted IPv4 netmask ("255.255.255.0").
    pub fn set_netmask(&mut self, netmask: &str) -> Result<()> {
        let mask = Ipv4Addr::from_str(netmask.trim())
            .map_err(|_| Error::InvalidIpAddress(format!("Invalid netmask: {}", netmask)))?;
        let bits = u32::from(mask);
        // Contiguous masks only
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(Error::InvalidIpAddress(format!(
                "Non-contiguous netmask: {}",
                netmask
            )));
        }
        self.prefix = Some(bits.leading_ones() as u8);
        Ok(())
    }
}

impl FromStr for IpAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains('/') {
            let (address, prefix) = validate_cidr(s)?;
            Ok(Self::new(address, Some(prefix)))
        } else {
            Ok(Self::new(validate_ip(s)?, None))
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}/{}", self.address, prefix),
            None => write!(f, "{}", self.address),
        }
    }
}

/// One address assigned to a connection.
///
/// The primary address has an empty `id`; aliases carry the suffix used
/// to tell them apart (`IPADDR_1` has id `"_1"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpConfig {
    pub address: IpAddress,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<IpAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<IpAddress>,
}

impl IpConfig {
    pub fn new(address: IpAddress) -> Self {
        Self {
            address,
            id: String::new(),
            label: None,
            remote_address: None,
            broadcast: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_primary(&self) -> bool {
        self.id.is_empty()
    }
}
