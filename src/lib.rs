//! verify-install library
//!
//! Validates an Enterprise live-USB installation: the EFI boot loader that
//! Intel Macs start from, and the `.MLUL-Live-USB` configuration file that
//! tells it which distribution to boot.
//!
//! Two checks run in sequence:
//! - Boot artifacts: `efi/boot/boot.efi` or `efi/boot/bootX64.efi`, plus the
//!   configuration file at `efi/boot/.MLUL-Live-USB`
//! - Configuration syntax: every directive must start with a recognized key
//!
//! # Example
//!
//! ```no_run
//! use verify_install::validate;
//!
//! let result = validate("/media/usb");
//! println!("{}", result.message());
//! std::process::exit(i32::from(result.exit_code()));
//! ```

pub mod checks;
pub mod cli;
pub mod engine;
pub mod version;

use checks::syntax::{AllowedKeySet, BlankLinePolicy, Diagnostic};
use cli::args::Args;
use engine::result::{ValidationReport, ValidationResult};
use engine::validator::InstallationValidator;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Re-exports for public API
pub use engine::result::{InvalidReason, ResultSummary};
pub use engine::validator::InstallationValidator as Validator;

/// Check result indicating the outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Check passed successfully
    Pass { message: String, duration_ms: u64 },
    /// Check failed
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check was not run because an earlier check failed
    Skip { reason: String },
}

impl CheckResult {
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckResult::Fail { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Check category for grouping related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// EFI boot loader files
    Boot,
    /// The `.MLUL-Live-USB` configuration file
    Config,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Boot => write!(f, "Boot"),
            CheckCategory::Config => write!(f, "Config"),
        }
    }
}

/// A validation check with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Unique identifier (e.g., "EFI-001")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Check category
    pub category: CheckCategory,
    /// Description of what this check validates
    pub description: String,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
}

/// Error types for verify-install operations.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The configuration file exists but could not be opened or read
    #[error("cannot read configuration file {}: {source}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Report serialization failed
    #[cfg(feature = "json")]
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The requested output format was compiled out
    #[error("output format '{0}' is not enabled in this build")]
    FormatUnavailable(String),
}

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Installation root, usually the mount point of the USB stick
    pub root: PathBuf,
    /// Keys accepted at the start of a configuration line
    pub allowed_keys: AllowedKeySet,
    /// How blank configuration lines are judged
    pub blank_lines: BlankLinePolicy,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            root: PathBuf::from("."),
            allowed_keys: AllowedKeySet::default(),
            blank_lines: BlankLinePolicy::default(),
        }
    }
}

impl VerifyConfig {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Self {
        let blank_lines = if args.legacy_blank_lines {
            BlankLinePolicy::Legacy
        } else {
            BlankLinePolicy::Allow
        };

        VerifyConfig {
            root: args.root.clone(),
            allowed_keys: AllowedKeySet::default(),
            blank_lines,
        }
    }
}

/// Validate the installation rooted at `root` with default settings.
///
/// Syntax diagnostics are collected but not printed; use [`run_validation`]
/// to observe them as they are found.
pub fn validate(root: impl AsRef<Path>) -> ValidationResult {
    InstallationValidator::new(root.as_ref()).validate()
}

/// Run every check and build a full report.
///
/// `on_diagnostic` is called for each configuration syntax error in file
/// order, as soon as the offending line is read.
pub fn run_validation<F>(config: &VerifyConfig, on_diagnostic: F) -> ValidationReport
where
    F: FnMut(&Diagnostic),
{
    InstallationValidator::from_config(config).run(on_diagnostic)
}
