// Network Config - Udev Rules
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! udev rules for persistent interface names and driver assignment.

pub mod rule;
pub mod store;

pub use rule::{Operator, UdevRule, UdevRulePart};
pub use store::{FileRuleStore, MemoryRuleStore, RuleStore};
