// Network Config - Error Types
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shared error types for the network configuration library.

use thiserror::Error;

/// Result type alias for network configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for network configuration operations.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================
    // Interface Errors
    // ========================================
    #[error("Interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Interface already exists: {0}")]
    InterfaceAlreadyExists(String),

    #[error("Dependency cycle between virtual interfaces: {0}")]
    DependencyCycle(String),

    // ========================================
    // Connection Errors
    // ========================================
    #[error("Connection config not found: {0}")]
    ConnectionNotFound(String),

    #[error("Invalid connection config: {0}")]
    InvalidConnection(String),

    // ========================================
    // Udev Rule Errors
    // ========================================
    #[error("Invalid udev rule: {0}")]
    InvalidUdevRule(String),

    #[error("Failed to read rules from {path}: {reason}")]
    RulesReadFailed { path: String, reason: String },

    #[error("Failed to write rules to {path}: {reason}")]
    RulesWriteFailed { path: String, reason: String },

    // ========================================
    // Validation Errors
    // ========================================
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Invalid interface name: {0}")]
    InvalidInterfaceName(String),

    // ========================================
    // Command Errors
    // ========================================
    #[error("Command failed: {command} - {reason}")]
    CommandFailed { command: String, reason: String },

    // ========================================
    // Storage Errors
    // ========================================
    #[error("Failed to read configuration: {0}")]
    ConfigReadFailed(String),

    #[error("Failed to write configuration: {0}")]
    ConfigWriteFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    #[error("Snapshot schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    // ========================================
    // System Errors
    // ========================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================
    // Generic Errors
    // ========================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new command failed error.
    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a new rules write error.
    pub fn rules_write_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RulesWriteFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InterfaceNotFound(_) | Self::ConnectionNotFound(_))
    }

    /// Check if this error came from an external program.
    pub fn is_command_error(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

// Convert from toml serialize errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWriteFailed(err.to_string())
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}
