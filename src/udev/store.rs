// Network Config - Udev Rules
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Persistence of udev rule files.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::rule::UdevRule;
use crate::models::{Error, Result};

const FILE_HEADER: &str = "# This file was automatically generated by network-config.\n\
# Manual changes to rules matching configured interfaces will be overwritten.\n";

/// Source and sink of a list of udev rules.
pub trait RuleStore {
    fn read_all(&self) -> Result<Vec<UdevRule>>;
    fn write_all(&self, rules: &[UdevRule]) -> Result<()>;
}

/// Rules file on disk, one rule per line.
#[derive(Debug, Clone)]
pub struct FileRuleStore {
    path: PathBuf,
}

impl FileRuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rules".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

impl RuleStore for FileRuleStore {
    /// A missing file reads as no rules. Comments and blank lines are
    /// skipped; continued lines are grouped into one rule, and lines that
    /// do not parse are kept as opaque rules.
    fn read_all(&self) -> Result<Vec<UdevRule>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No rules file at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::RulesReadFailed {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let mut rules = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for line in content.lines() {
            if pending.is_empty() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
            }
            pending.push(line);
            if !line.trim_end().ends_with('\\') {
                rules.push(UdevRule::from_lines(&pending));
                pending.clear();
            }
        }
        if !pending.is_empty() {
            rules.push(UdevRule::from_lines(&pending));
        }

        debug!("Read {} rules from {:?}", rules.len(), self.path);
        Ok(rules)
    }

    /// Replace the file contents atomically.
    fn write_all(&self, rules: &[UdevRule]) -> Result<()> {
        let mut content = String::from(FILE_HEADER);
        for rule in rules {
            content.push('\n');
            content.push_str(&rule.to_string());
        }
        content.push('\n');

        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let temp = self.temp_path();
            fs::write(&temp, &content)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&temp, fs::Permissions::from_mode(0o644))?;
            }
            fs::rename(&temp, &self.path)
        };

        write().map_err(|e| Error::rules_write_failed(self.path.display().to_string(), e.to_string()))?;
        debug!("Wrote {} rules to {:?}", rules.len(), self.path);
        Ok(())
    }
}

/// In-memory store, used when no file should be touched.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RefCell<Vec<UdevRule>>,
    writes: Cell<usize>,
}

impl MemoryRuleStore {
    pub fn new(rules: Vec<UdevRule>) -> Self {
        Self {
            rules: RefCell::new(rules),
            writes: Cell::new(0),
        }
    }

    pub fn rules(&self) -> Vec<UdevRule> {
        self.rules.borrow().clone()
    }

    /// Number of completed `write_all` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl RuleStore for MemoryRuleStore {
    fn read_all(&self) -> Result<Vec<UdevRule>> {
        Ok(self.rules())
    }

    fn write_all(&self, rules: &[UdevRule]) -> Result<()> {
        *self.rules.borrow_mut() = rules.to_vec();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
