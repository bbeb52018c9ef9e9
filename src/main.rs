// Network Config - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network Config
//!
//! Command line front end: inspect the configuration, rename or delete
//! interfaces, and apply interface names as udev rules.

use std::env;
use std::process::ExitCode;

use network_config::models::{Config, RenamingMechanism};
use network_config::sysconfig::{Hosts, InterfaceFile};
use network_config::{
    ConfigReader, ConfigStore, InterfacesWriter, Result, Settings, SysfsHardware, APP_NAME,
    VERSION,
};

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS] <COMMAND>",
        env::args().next().unwrap_or_else(|| "network-config".to_string())
    );
    println!();
    println!("Commands:");
    println!("  show                        Show interfaces and connection configs");
    println!("  rename OLD NEW [mac|bus_id] Rename an interface (default: mac)");
    println!("  delete NAME                 Delete an interface and its configuration");
    println!("  apply                       Write udev rules and refresh devices");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message and exit");
    println!("  -v, --version    Show version information and exit");
    println!("  -d, --debug      Enable debug logging");
    println!("      --autoinst   Unattended mode: no ifdown, no settling");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG         Set log level (trace, debug, info, warn, error)");
}

/// Stored snapshot, or the system configuration when there is none.
fn load_config(settings: &Settings, store: &ConfigStore) -> Result<Config> {
    if let Some(config) = store.load()? {
        tracing::debug!("Using snapshot {:?}", store.snapshot_file());
        return Ok(config);
    }

    let hardware = SysfsHardware::new(&settings.sysfs_root);
    let files = if settings.sysconfig_dir.is_dir() {
        InterfaceFile::load_all(&settings.sysconfig_dir)?
    } else {
        Vec::new()
    };
    ConfigReader::new(hardware.clone())
        .with_discovered(hardware.detect_interfaces())
        .with_hosts(Hosts::load(&settings.hosts_file))
        .read(&files)
}

fn show(config: &Config) {
    println!("Interfaces:");
    for iface in config.interfaces.iter() {
        let kind = if iface.is_virtual() { "virtual" } else { "physical" };
        let mut line = format!("  {:<12} {:<9}", iface.name, kind);
        if let Some(mac) = iface.mac() {
            line.push_str(&format!(" {}", mac));
        }
        if iface.is_renamed() {
            line.push_str(&format!(
                " (was {}, by {})",
                iface.old_name(),
                iface.renaming_mechanism.as_str()
            ));
        }
        println!("{}", line);
    }

    println!("Connections:");
    for conn in config.connections.iter() {
        println!(
            "  {:<12} {:<12} {:<6} {}",
            conn.name,
            conn.interface,
            conn.connection_type().short_name(),
            conn.bootproto.as_str()
        );
    }
}

fn run(command: &[String], settings: &Settings) -> Result<()> {
    let store = ConfigStore::new();
    let mut config = load_config(settings, &store)?;

    match command {
        [cmd] if cmd == "show" => show(&config),
        [cmd, old, new, rest @ ..] if cmd == "rename" && rest.len() <= 1 => {
            let mechanism = match rest.first() {
                Some(name) => RenamingMechanism::from_name(name).ok_or_else(|| {
                    network_config::Error::ValidationFailed(format!(
                        "Unknown renaming mechanism: {}",
                        name
                    ))
                })?,
                None => RenamingMechanism::Mac,
            };
            config.rename_interface(Some(old.as_str()), new, mechanism)?;
            store.save(&config)?;
            println!("Renamed {} to {}. Run 'apply' to write udev rules.", old, new);
        }
        [cmd, name] if cmd == "delete" => {
            config.delete_interface(name);
            store.save(&config)?;
            println!("Deleted {}.", name);
        }
        [cmd] if cmd == "apply" => {
            InterfacesWriter::from_settings(settings).write(&config.interfaces)?;
            println!("Wrote udev rules for {} interfaces.", config.interfaces.len());
        }
        _ => {
            return Err(network_config::Error::ValidationFailed(format!(
                "Invalid command: {}",
                command.join(" ")
            )))
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut debug_mode = false;
    let mut autoinst = false;
    let mut command = Vec::new();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            "-d" | "--debug" => debug_mode = true,
            "--autoinst" => autoinst = true,
            _ => {
                if arg.starts_with('-') {
                    eprintln!("Unknown option: {}", arg);
                    eprintln!("Try '--help' for more information.");
                    return ExitCode::FAILURE;
                }
                command.push(arg.clone());
            }
        }
    }

    let mut settings = Settings::load_or_default();
    settings.autoinst |= autoinst;

    let log_level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        settings.log_level.parse().unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    if command.is_empty() {
        print_help();
        return ExitCode::FAILURE;
    }

    match run(&command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
