// Network Config - Interfaces Writer
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Persists interface names and driver overrides as udev rules.
//!
//! A write runs in a fixed order:
//! 1. renamed interfaces are brought down (skipped during autoinstallation)
//! 2. naming rules are merged and written
//! 3. driver rules are merged and written
//! 4. udev reloads its rules and re-triggers net devices
//! 5. outside autoinstallation, udev settles and the writer pauses

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::{Interface, InterfacesCollection, RenamingMechanism, Result, Settings};
use crate::system::{format_command, CommandRunner, SystemRunner};
use crate::udev::{FileRuleStore, RuleStore, UdevRule};

/// Writes the udev side of an interfaces collection.
pub struct InterfacesWriter<R, N, D> {
    runner: R,
    naming_rules: N,
    driver_rules: D,
    autoinst: bool,
    settle_delay: Duration,
    ifdown_command: String,
    udevadm_command: String,
}

impl InterfacesWriter<SystemRunner, FileRuleStore, FileRuleStore> {
    /// Writer acting on the host, as described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            SystemRunner::new(),
            FileRuleStore::new(&settings.net_rules_path),
            FileRuleStore::new(&settings.drivers_rules_path),
        )
        .with_autoinst(settings.autoinst)
        .with_settle_delay(settings.settle_delay())
        .with_commands(&settings.ifdown_command, &settings.udevadm_command)
    }
}

impl<R: CommandRunner, N: RuleStore, D: RuleStore> InterfacesWriter<R, N, D> {
    pub fn new(runner: R, naming_rules: N, driver_rules: D) -> Self {
        let defaults = Settings::default();
        Self {
            runner,
            naming_rules,
            driver_rules,
            autoinst: defaults.autoinst,
            settle_delay: defaults.settle_delay(),
            ifdown_command: defaults.ifdown_command,
            udevadm_command: defaults.udevadm_command,
        }
    }

    pub fn with_autoinst(mut self, autoinst: bool) -> Self {
        self.autoinst = autoinst;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_commands(mut self, ifdown: &str, udevadm: &str) -> Self {
        self.ifdown_command = ifdown.to_string();
        self.udevadm_command = udevadm.to_string();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn naming_rules(&self) -> &N {
        &self.naming_rules
    }

    pub fn driver_rules(&self) -> &D {
        &self.driver_rules
    }

    /// Write the rules for `interfaces` and refresh udev.
    ///
    /// Bring-down failures are logged and ignored. Rule and udev
    /// failures are returned; rules already written stay in place.
    pub fn write(&self, interfaces: &InterfacesCollection) -> Result<()> {
        if !self.autoinst {
            self.set_down_renamed(interfaces);
        }
        self.update_naming_rules(interfaces)?;
        self.update_driver_rules(interfaces)?;
        self.refresh_udev()
    }

    fn set_down_renamed(&self, interfaces: &InterfacesCollection) {
        for iface in interfaces.iter().filter(|i| i.is_renamed()) {
            info!("Setting down {} before renaming it to {}", iface.old_name(), iface.name);
            if let Err(e) = self.runner.run(&self.ifdown_command, &[iface.old_name()]) {
                warn!("Could not set down {}: {}", iface.old_name(), e);
            }
        }
    }

    fn update_naming_rules(&self, interfaces: &InterfacesCollection) -> Result<()> {
        let generated: Vec<UdevRule> = interfaces.iter().filter_map(renaming_rule_for).collect();
        let known_names = interfaces.known_names();

        let mut rules: Vec<UdevRule> = self
            .naming_rules
            .read_all()?
            .into_iter()
            .filter(|rule| {
                let known = rule.device().is_some_and(|d| known_names.contains(d));
                let replaced = generated.iter().any(|g| g.same_device(rule));
                if known || replaced {
                    debug!("Replacing naming rule: {}", rule);
                }
                !known && !replaced
            })
            .collect();
        rules.extend(generated);

        self.naming_rules.write_all(&rules)
    }

    fn update_driver_rules(&self, interfaces: &InterfacesCollection) -> Result<()> {
        let mut rules = self.driver_rules.read_all()?;

        for iface in interfaces.iter() {
            let Some(driver) = iface.custom_driver() else {
                continue;
            };
            let Some(modalias) = iface.modalias() else {
                warn!("No modalias for {}, cannot bind it to {}", iface.name, driver);
                continue;
            };

            let rule = UdevRule::new_driver_assignment(modalias, driver);
            match rules
                .iter_mut()
                .find(|r| r.original_modalias() == Some(modalias))
            {
                Some(current) => *current = rule,
                None => rules.push(rule),
            }
        }

        self.driver_rules.write_all(&rules)
    }

    fn refresh_udev(&self) -> Result<()> {
        self.udevadm(&["control", "--reload"])?;
        self.udevadm(&["trigger", "--subsystem-match=net", "--action=add"])?;

        if !self.autoinst {
            self.udevadm(&["settle"])?;
            if !self.settle_delay.is_zero() {
                debug!("Waiting {:?} for devices to settle", self.settle_delay);
                std::thread::sleep(self.settle_delay);
            }
        }
        Ok(())
    }

    fn udevadm(&self, args: &[&str]) -> Result<()> {
        debug!("Running {}", format_command(&self.udevadm_command, args));
        self.runner.run(&self.udevadm_command, args)
    }
}

/// Naming rule keeping the interface's current name, if it has one.
fn renaming_rule_for(iface: &Interface) -> Option<UdevRule> {
    if !iface.renaming_mechanism.has_udev_rule() {
        return None;
    }
    let Some(hardware) = iface.hardware() else {
        warn!("No hardware information for {}, not writing a naming rule", iface.name);
        return None;
    };

    let rule = match iface.renaming_mechanism {
        RenamingMechanism::Mac => hardware
            .mac
            .as_deref()
            .map(|mac| UdevRule::new_mac_based_rename(&iface.name, mac)),
        RenamingMechanism::BusId => hardware.busid.as_deref().map(|busid| {
            UdevRule::new_bus_id_based_rename(&iface.name, busid, hardware.dev_port.as_deref())
        }),
        RenamingMechanism::None | RenamingMechanism::Custom => None,
    };
    if rule.is_none() {
        warn!(
            "Missing {} for {}, not writing a naming rule",
            iface.renaming_mechanism.as_str(),
            iface.name
        );
    }
    rule
}
