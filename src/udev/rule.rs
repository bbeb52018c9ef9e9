// Network Config - Udev Rules
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! udev rule model.
//!
//! A rule is an ordered list of `KEY<op>"value"` clauses separated by
//! commas. Naming rules match a network device by MAC address or by bus
//! location and assign it a `NAME`; driver rules rewrite the `MODALIAS`
//! of a device so a given kernel module is picked.
//!
//! Parsing keeps every clause, including the ones this crate never writes,
//! so rules written by other tools survive a read/write cycle unchanged.
//! Rules spread over continuation lines, and lines that do not parse at
//! all, keep their original text and are printed back verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::models::{Error, RenamingMechanism, Result};

static CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?P<key>[A-Za-z_][A-Za-z0-9_]*(?:\{[^}]*\})?)\s*(?P<op>==|!=|\+=|-=|:=|=)\s*"(?P<value>(?:[^"\\]|\\.)*)"\s*$"#,
    )
    .expect("clause regex is valid")
});

/// Clause operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Match,
    /// `!=`
    NotMatch,
    /// `=`
    Assign,
    /// `+=`
    Append,
    /// `-=`
    Remove,
    /// `:=`
    AssignFinal,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "==",
            Self::NotMatch => "!=",
            Self::Assign => "=",
            Self::Append => "+=",
            Self::Remove => "-=",
            Self::AssignFinal => ":=",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Match),
            "!=" => Some(Self::NotMatch),
            "=" => Some(Self::Assign),
            "+=" => Some(Self::Append),
            "-=" => Some(Self::Remove),
            ":=" => Some(Self::AssignFinal),
            _ => None,
        }
    }
}

/// One `KEY<op>"value"` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdevRulePart {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

impl UdevRulePart {
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for UdevRulePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.key, self.operator.as_str(), self.value)
    }
}

impl FromStr for UdevRulePart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = CLAUSE_RE
            .captures(s)
            .ok_or_else(|| Error::InvalidUdevRule(format!("malformed clause: {}", s.trim())))?;
        let operator = Operator::from_symbol(&caps["op"])
            .ok_or_else(|| Error::InvalidUdevRule(format!("unknown operator in: {}", s.trim())))?;
        Ok(Self::new(&caps["key"], operator, &caps["value"]))
    }
}

/// A udev rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdevRule {
    parts: Vec<UdevRulePart>,
    /// Source text printed instead of the clauses.
    raw: Option<String>,
}

impl UdevRule {
    pub fn new(parts: Vec<UdevRulePart>) -> Self {
        Self { parts, raw: None }
    }

    /// Rule kept as opaque text. It matches no device and no modalias.
    pub fn opaque(text: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            raw: Some(text.into()),
        }
    }

    /// Build a rule from the physical lines of a rules file.
    ///
    /// Every line but the last ends with a `\` continuation. A single
    /// line that parses is normalized like [`str::parse`] does. Anything
    /// else keeps its source text: continued rules still expose their
    /// clauses, unparsable ones become [`UdevRule::opaque`].
    pub fn from_lines(lines: &[&str]) -> Self {
        let text = lines.join("\n");
        let joined = lines
            .iter()
            .map(|line| {
                let line = line.trim_end();
                line.strip_suffix('\\').unwrap_or(line).trim()
            })
            .collect::<Vec<_>>()
            .join(" ");

        match joined.parse::<UdevRule>() {
            Ok(rule) if lines.len() == 1 => rule,
            Ok(rule) => Self {
                parts: rule.parts,
                raw: Some(text),
            },
            Err(e) => {
                warn!("Keeping unrecognized udev rule as is ({}): {}", e, text.trim());
                Self::opaque(text.trim())
            }
        }
    }

    /// Whether the rule is kept only as text.
    pub fn is_opaque(&self) -> bool {
        self.parts.is_empty()
    }

    /// Clauses shared by every naming rule.
    fn naming_base() -> Vec<UdevRulePart> {
        vec![
            UdevRulePart::new("SUBSYSTEM", Operator::Match, "net"),
            UdevRulePart::new("ACTION", Operator::Match, "add"),
            UdevRulePart::new("DRIVERS", Operator::Match, "?*"),
            // Ethernet devices only
            UdevRulePart::new("ATTR{type}", Operator::Match, "1"),
        ]
    }

    /// Naming rule matching on the MAC address.
    pub fn new_mac_based_rename(name: &str, mac: &str) -> Self {
        let mut parts = Self::naming_base();
        parts.push(UdevRulePart::new("ATTR{dev_id}", Operator::Match, "0x0"));
        parts.push(UdevRulePart::new("ATTR{address}", Operator::Match, mac));
        parts.push(UdevRulePart::new("NAME", Operator::Assign, name));
        Self::new(parts)
    }

    /// Naming rule matching on the bus location and device port.
    pub fn new_bus_id_based_rename(name: &str, bus_id: &str, dev_port: Option<&str>) -> Self {
        let mut parts = Self::naming_base();
        parts.push(UdevRulePart::new("KERNELS", Operator::Match, bus_id));
        if let Some(dev_port) = dev_port {
            parts.push(UdevRulePart::new("ATTR{dev_port}", Operator::Match, dev_port));
        }
        parts.push(UdevRulePart::new("NAME", Operator::Assign, name));
        Self::new(parts)
    }

    /// Driver rule binding a modalias to a kernel module.
    pub fn new_driver_assignment(modalias: &str, driver: &str) -> Self {
        Self::new(vec![
            UdevRulePart::new("ENV{MODALIAS}", Operator::Match, modalias),
            UdevRulePart::new("ENV{MODALIAS}", Operator::Assign, driver),
        ])
    }

    pub fn parts(&self) -> &[UdevRulePart] {
        &self.parts
    }

    /// Value of the first clause with the given key and operator.
    pub fn part_value_for(&self, key: &str, operator: Operator) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| p.key == key && p.operator == operator)
            .map(|p| p.value.as_str())
    }

    /// Interface name assigned by the rule.
    pub fn device(&self) -> Option<&str> {
        self.part_value_for("NAME", Operator::Assign)
    }

    pub fn mac(&self) -> Option<&str> {
        self.part_value_for("ATTR{address}", Operator::Match)
    }

    pub fn bus_id(&self) -> Option<&str> {
        self.part_value_for("KERNELS", Operator::Match)
    }

    pub fn dev_port(&self) -> Option<&str> {
        self.part_value_for("ATTR{dev_port}", Operator::Match)
    }

    /// Modalias matched by a driver rule.
    pub fn original_modalias(&self) -> Option<&str> {
        self.part_value_for("ENV{MODALIAS}", Operator::Match)
    }

    /// Module assigned by a driver rule.
    pub fn driver(&self) -> Option<&str> {
        self.part_value_for("ENV{MODALIAS}", Operator::Assign)
    }

    /// How a naming rule identifies the device.
    pub fn mechanism(&self) -> Option<RenamingMechanism> {
        if self.mac().is_some() {
            Some(RenamingMechanism::Mac)
        } else if self.bus_id().is_some() {
            Some(RenamingMechanism::BusId)
        } else {
            None
        }
    }

    /// Whether both rules match the same hardware.
    pub fn same_device(&self, other: &UdevRule) -> bool {
        match (self.mac(), other.mac()) {
            (Some(a), Some(b)) => return a.eq_ignore_ascii_case(b),
            (Some(_), None) | (None, Some(_)) => return false,
            (None, None) => {}
        }
        match (self.bus_id(), other.bus_id()) {
            (Some(a), Some(b)) => a == b && self.dev_port() == other.dev_port(),
            _ => false,
        }
    }
}

impl fmt::Display for UdevRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(raw) = &self.raw {
            return f.write_str(raw);
        }
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl FromStr for UdevRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = split_clauses(s)
            .into_iter()
            .map(|clause| clause.parse::<UdevRulePart>())
            .collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            return Err(Error::InvalidUdevRule("empty rule".to_string()));
        }
        Ok(Self::new(parts))
    }
}

/// Split a rule line on commas that are not inside a quoted value.
fn split_clauses(line: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                clauses.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    clauses.push(&line[start..]);

    clauses.into_iter().filter(|c| !c.trim().is_empty()).collect()
}
