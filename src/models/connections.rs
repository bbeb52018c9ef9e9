// Network Config - Connection Configs Collection
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Ordered collection of connection configs, keyed by config name.

use serde::{Deserialize, Serialize};

use super::connection::ConnectionConfig;

/// Ordered collection of connection configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ConnectionConfigsCollection {
    connections: Vec<ConnectionConfig>,
}

impl ConnectionConfigsCollection {
    pub fn new(connections: Vec<ConnectionConfig>) -> Self {
        Self { connections }
    }

    pub fn by_name(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.iter().find(|c| c.name == name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut ConnectionConfig> {
        self.connections.iter_mut().find(|c| c.name == name)
    }

    /// The config bound to the given interface.
    pub fn by_interface(&self, interface: &str) -> Option<&ConnectionConfig> {
        self.connections.iter().find(|c| c.interface == interface)
    }

    /// Insert or replace by name. A replaced config keeps its position.
    ///
    /// Returns the config that was replaced, if any.
    pub fn add_or_update(&mut self, conn: ConnectionConfig) -> Option<ConnectionConfig> {
        match self.connections.iter().position(|c| c.name == conn.name) {
            Some(index) => Some(std::mem::replace(&mut self.connections[index], conn)),
            None => {
                self.connections.push(conn);
                None
            }
        }
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<ConnectionConfig> {
        let index = self.connections.iter().position(|c| c.name == name)?;
        Some(self.connections.remove(index))
    }

    /// Remove every config bound to the given interface.
    pub fn remove_by_interface(&mut self, interface: &str) -> Vec<ConnectionConfig> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.interface == interface);
        self.connections = kept;
        removed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConnectionConfig> {
        self.connections.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ConnectionConfig> {
        self.connections.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.connections.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn to_vec(&self) -> Vec<ConnectionConfig> {
        self.connections.clone()
    }
}

impl<'a> IntoIterator for &'a ConnectionConfigsCollection {
    type Item = &'a ConnectionConfig;
    type IntoIter = std::slice::Iter<'a, ConnectionConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.connections.iter()
    }
}
