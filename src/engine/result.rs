//! Result aggregation and reporting.
//!
//! Collects check results into a report and derives the overall verdict.

use crate::checks::syntax::Diagnostic;
use crate::{Check, CheckResult};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Message printed for a valid installation.
pub const VALID_MESSAGE: &str = "The installation is valid. All's good. :)";

/// Why an installation was judged invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Neither boot loader binary exists
    MissingBootFiles,
    /// The configuration file does not exist
    MissingConfig,
    /// The configuration file uses unrecognized keys
    BadConfig,
    /// The configuration file exists but cannot be read
    UnreadableConfig,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::MissingBootFiles => write!(f, "EFI boot files not present"),
            InvalidReason::MissingConfig => write!(f, "no configuration file present"),
            InvalidReason::BadConfig => write!(f, "the configuration file is bad"),
            InvalidReason::UnreadableConfig => {
                write!(f, "the configuration file could not be read")
            }
        }
    }
}

/// Overall verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    reason: Option<InvalidReason>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: InvalidReason) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        self.reason
    }

    /// Process exit code: 0 when valid, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.valid {
            0
        } else {
            1
        }
    }

    /// The one-line summary shown to the user
    pub fn message(&self) -> String {
        match self.reason {
            None => VALID_MESSAGE.to_string(),
            Some(reason) => format!("The installation is invalid: {}", reason),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

/// Validation report containing all check results
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub root: PathBuf,
    pub result: ValidationResult,
    pub checks: Vec<Check>,
    pub diagnostics: Vec<Diagnostic>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for check in &self.checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Skip { .. }) | None => {
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Get only failed checks
    pub fn failures(&self) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| c.result.as_ref().is_some_and(CheckResult::is_fail))
            .collect()
    }
}

/// Result aggregator for collecting check results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<Check>,
    diagnostics: Vec<Diagnostic>,
    verdict: Option<InvalidReason>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn add_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Record the first failure; later calls keep the original reason
    pub fn fail(&mut self, reason: InvalidReason) {
        self.verdict.get_or_insert(reason);
    }

    /// The reason recorded so far, if any check failed
    pub fn failure(&self) -> Option<InvalidReason> {
        self.verdict
    }

    /// Create final validation report
    pub fn into_report(self, root: PathBuf, total_duration_ms: u64) -> ValidationReport {
        let result = match self.verdict {
            Some(reason) => ValidationResult::invalid(reason),
            None => ValidationResult::valid(),
        };

        ValidationReport {
            root,
            result,
            checks: self.checks,
            diagnostics: self.diagnostics,
            total_duration_ms,
        }
    }
}
