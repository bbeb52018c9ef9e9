// Network Config - Validation Utilities
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Input validation utilities for interfaces and connection configs.

use std::net::IpAddr;
use std::str::FromStr;

use super::error::{Error, Result};

/// Maximum length of a kernel interface name (IFNAMSIZ - 1).
pub const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Validate an IP address string (v4 or v6).
pub fn validate_ip(s: &str) -> Result<IpAddr> {
    IpAddr::from_str(s).map_err(|_| Error::InvalidIpAddress(s.to_string()))
}

/// Validate a CIDR notation (e.g., "192.168.1.0/24").
pub fn validate_cidr(s: &str) -> Result<(IpAddr, u8)> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 {
        return Err(Error::InvalidIpAddress(format!(
            "Invalid CIDR notation: {}",
            s
        )));
    }

    let ip = validate_ip(parts[0])?;
    let prefix = validate_prefix(&ip, parts[1])?;
    Ok((ip, prefix))
}

/// Validate a prefix length for the given address family.
pub fn validate_prefix(ip: &IpAddr, s: &str) -> Result<u8> {
    let prefix: u8 = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidIpAddress(format!("Invalid prefix: {}", s)))?;

    let max_prefix = if ip.is_ipv4() { 32 } else { 128 };
    if prefix > max_prefix {
        return Err(Error::InvalidIpAddress(format!(
            "Prefix {} exceeds maximum {} for address type",
            prefix, max_prefix
        )));
    }
    Ok(prefix)
}

/// Validate a MAC address string.
///
/// Returns the address in the lowercase colon form the kernel reports in
/// sysfs, which is also what udev compares `ATTR{address}` against.
pub fn validate_mac_address(s: &str) -> Result<String> {
    // Accept formats: aa:bb:cc:dd:ee:ff or AA-BB-CC-DD-EE-FF
    let normalized = s.trim().replace('-', ":").to_lowercase();
    let parts: Vec<&str> = normalized.split(':').collect();

    if parts.len() != 6 {
        return Err(Error::InvalidMacAddress(s.to_string()));
    }

    for part in &parts {
        if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidMacAddress(s.to_string()));
        }
    }

    Ok(normalized)
}

/// Validate a kernel network interface name.
pub fn validate_interface_name(s: &str) -> Result<&str> {
    if s.is_empty() || s.len() > MAX_INTERFACE_NAME_LEN {
        return Err(Error::InvalidInterfaceName(format!(
            "Interface name must be 1-{} characters: {}",
            MAX_INTERFACE_NAME_LEN, s
        )));
    }

    if s == "." || s == ".." {
        return Err(Error::InvalidInterfaceName(s.to_string()));
    }

    if s
        .chars()
        .any(|c| c == '/' || c == ':' || c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidInterfaceName(format!(
            "Invalid characters in interface name: {}",
            s
        )));
    }

    Ok(s)
}

/// Validate a VLAN ID.
pub fn validate_vlan_id(id: u16) -> Result<u16> {
    if id == 0 || id > 4094 {
        return Err(Error::ValidationFailed(format!(
            "VLAN ID must be 1-4094: {}",
            id
        )));
    }
    Ok(id)
}
