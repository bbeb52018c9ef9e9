// Network Config - Sysconfig Backend
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! ifcfg-style configuration backend.

pub mod interfaces_writer;
pub mod reader;

pub use interfaces_writer::InterfacesWriter;
pub use reader::{ConfigReader, Hosts, InterfaceFile};
