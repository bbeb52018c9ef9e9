// Network Config - Interfaces Collection
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Ordered, name-indexed collection of interfaces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::{Error, Result};
use super::interface::Interface;

/// Ordered collection of interfaces with unique names.
///
/// Deserialization goes through [`InterfacesCollection::from_interfaces`],
/// so a snapshot with duplicated names is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "Vec<Interface>", into = "Vec<Interface>")]
pub struct InterfacesCollection {
    interfaces: Vec<Interface>,
}

impl InterfacesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicated names.
    pub fn from_interfaces(interfaces: Vec<Interface>) -> Result<Self> {
        let mut collection = Self::new();
        for iface in interfaces {
            collection.push(iface)?;
        }
        Ok(collection)
    }

    /// Append an interface. Names must be unique.
    pub fn push(&mut self, iface: Interface) -> Result<()> {
        if self.contains(&iface.name) {
            return Err(Error::InterfaceAlreadyExists(iface.name));
        }
        self.interfaces.push(iface);
        Ok(())
    }

    pub fn by_name(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Renames must go through `Config::rename_interface` to keep names unique.
    pub(crate) fn by_name_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.interfaces.iter_mut().find(|i| i.name == name)
    }

    /// Find an interface by its kernel-assigned name.
    pub fn by_old_name(&self, old_name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.old_name() == old_name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// Remove and return the interface with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Interface> {
        let index = self.interfaces.iter().position(|i| i.name == name)?;
        Some(self.interfaces.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interface> {
        self.interfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    /// Current and kernel-assigned names of every interface.
    pub fn known_names(&self) -> BTreeSet<&str> {
        self.interfaces
            .iter()
            .flat_map(|i| [i.name.as_str(), i.old_name()])
            .collect()
    }

    pub fn physical(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|i| i.is_physical())
    }

    pub fn virtual_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|i| i.is_virtual())
    }

    /// First `count` unused names of the form `<prefix><n>`.
    pub fn free_names(&self, prefix: &str, count: usize) -> Vec<String> {
        let known = self.known_names();
        (0..)
            .map(|n| format!("{}{}", prefix, n))
            .filter(|name| !known.contains(name.as_str()))
            .take(count)
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Interface> {
        self.interfaces.clone()
    }
}

impl TryFrom<Vec<Interface>> for InterfacesCollection {
    type Error = Error;

    fn try_from(interfaces: Vec<Interface>) -> Result<Self> {
        Self::from_interfaces(interfaces)
    }
}

impl From<InterfacesCollection> for Vec<Interface> {
    fn from(collection: InterfacesCollection) -> Self {
        collection.interfaces
    }
}

impl<'a> IntoIterator for &'a InterfacesCollection {
    type Item = &'a Interface;
    type IntoIter = std::slice::Iter<'a, Interface>;

    fn into_iter(self) -> Self::IntoIter {
        self.interfaces.iter()
    }
}
