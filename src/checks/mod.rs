//! Validation check modules.
//!
//! Checks are organized by what they look at:
//! - Artifacts: boot loader and configuration file presence
//! - Syntax: directive keys in the configuration file
//!
//! Checks run in the order of [`CheckKind::ALL`]. Each one assumes the files
//! verified by the checks before it exist, so the first failure ends the run
//! and the remaining checks are reported as skipped.

pub mod artifacts;
pub mod syntax;

use crate::{Check, CheckCategory};

/// The checks performed on an installation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// EFI-001
    BootFiles,
    /// CFG-001
    ConfigPresent,
    /// CFG-002
    ConfigSyntax,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [
        CheckKind::BootFiles,
        CheckKind::ConfigPresent,
        CheckKind::ConfigSyntax,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CheckKind::BootFiles => "EFI-001",
            CheckKind::ConfigPresent => "CFG-001",
            CheckKind::ConfigSyntax => "CFG-002",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::BootFiles => "EFI Boot Loader Present",
            CheckKind::ConfigPresent => "Configuration File Present",
            CheckKind::ConfigSyntax => "Configuration Syntax",
        }
    }

    pub fn category(self) -> CheckCategory {
        match self {
            CheckKind::BootFiles => CheckCategory::Boot,
            CheckKind::ConfigPresent | CheckKind::ConfigSyntax => CheckCategory::Config,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CheckKind::BootFiles => "Check for efi/boot/boot.efi or efi/boot/bootX64.efi",
            CheckKind::ConfigPresent => "Check for efi/boot/.MLUL-Live-USB",
            CheckKind::ConfigSyntax => "Check that every directive uses a recognized key",
        }
    }

    /// Build an unexecuted [`Check`] for this kind
    pub fn describe(self) -> Check {
        Check {
            id: self.id().to_string(),
            name: self.name().to_string(),
            category: self.category(),
            description: self.description().to_string(),
            result: None,
        }
    }
}

/// Get all registered checks
pub fn get_all_checks() -> Vec<Check> {
    CheckKind::ALL.iter().map(|kind| kind.describe()).collect()
}

/// Get checks for a specific category
pub fn get_checks_by_category(category: CheckCategory) -> Vec<Check> {
    CheckKind::ALL
        .iter()
        .filter(|kind| kind.category() == category)
        .map(|kind| kind.describe())
        .collect()
}
