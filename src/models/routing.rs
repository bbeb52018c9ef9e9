// Network Config - Routing
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Routing tables and global forwarding settings.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::ip::IpAddress;

/// A single route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Route {
    /// Destination network (None = default route).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<IpAddress>,
    /// Gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    /// Outgoing interface name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Extra options passed through verbatim (e.g., "metric 100").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub options: String,
}

impl Route {
    pub fn is_default(&self) -> bool {
        self.destination.is_none()
    }
}

/// An ordered set of routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoutingTable {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }
}

/// Network-wide routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Routing {
    #[serde(default)]
    pub tables: Vec<RoutingTable>,
    #[serde(default)]
    pub forward_ipv4: bool,
    #[serde(default)]
    pub forward_ipv6: bool,
}

impl Routing {
    pub fn new(tables: Vec<RoutingTable>) -> Self {
        Self {
            tables,
            forward_ipv4: false,
            forward_ipv6: false,
        }
    }

    /// All routes, in table order and then in-table order.
    pub fn routes(&self) -> Vec<&Route> {
        self.tables.iter().flat_map(|t| t.routes.iter()).collect()
    }

    /// The default route, if any table has one.
    pub fn default_route(&self) -> Option<&Route> {
        self.tables
            .iter()
            .flat_map(|t| t.routes.iter())
            .find(|r| r.is_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_via(interface: &str) -> Route {
        Route {
            destination: Some("10.0.0.0/8".parse().unwrap()),
            interface: Some(interface.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_routes_from_all_tables() {
        let routing = Routing::new(vec![
            RoutingTable::new(vec![route_via("eth0"), route_via("eth1")]),
            RoutingTable::new(vec![route_via("eth2")]),
        ]);

        let interfaces: Vec<_> = routing
            .routes()
            .iter()
            .map(|r| r.interface.clone().unwrap())
            .collect();
        assert_eq!(interfaces, vec!["eth0", "eth1", "eth2"]);
    }

    #[test]
    fn test_default_route() {
        let mut routing = Routing::new(vec![RoutingTable::new(vec![route_via("eth0")])]);
        assert!(routing.default_route().is_none());

        routing.tables.push(RoutingTable::new(vec![Route {
            gateway: Some("192.168.1.1".parse().unwrap()),
            ..Default::default()
        }]));
        assert!(routing.default_route().is_some());
    }
}
