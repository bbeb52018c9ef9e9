// Network Config - Kernel Drivers
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Kernel module used by a network interface, plus its load options.

use serde::{Deserialize, Serialize};

/// A kernel driver with its module options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Module name (e.g., "virtio_net").
    pub name: String,
    /// Free-form module options (e.g., "csum=1").
    #[serde(default)]
    pub options: String,
}

impl Driver {
    pub fn new(name: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
        }
    }
}
