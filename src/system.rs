// Network Config - System Commands
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Execution of external programs (ifdown, udevadm).

use std::process::Command;
use tracing::debug;

use crate::models::{Error, Result};

/// Runs an external program to completion.
pub trait CommandRunner {
    /// Run `program` with `args`. A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs programs on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let command_line = format_command(program, args);
        debug!("Executing: {}", command_line);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::command_failed(&command_line, e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match (output.status.code(), stderr.trim()) {
            (Some(code), "") => format!("exit status {}", code),
            (Some(code), msg) => format!("exit status {}: {}", code, msg),
            (None, _) => "terminated by signal".to_string(),
        };
        Err(Error::command_failed(command_line, reason))
    }
}

/// Command line as it would be typed in a shell, for logs and errors.
pub fn format_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
