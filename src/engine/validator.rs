//! Installation validator.
//!
//! Runs the checks of [`CheckKind::ALL`] in order against one installation
//! root. Checks are fail-fast: once one fails, the rest are recorded as
//! skipped, since each depends on the files the previous one found. Inside
//! the syntax check, every line is still examined.
//!
//! The validator only reads from the filesystem. Running it twice on an
//! unchanged tree yields the same verdict.

use crate::checks::artifacts::{self, FileExistence, BOOT_LOADER_PATHS, CONFIG_PATH};
use crate::checks::syntax::{self, AllowedKeySet, BlankLinePolicy, Diagnostic};
use crate::checks::CheckKind;
use crate::engine::result::{InvalidReason, ResultAggregator, ValidationReport, ValidationResult};
use crate::{CheckResult, VerifyConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a single check plus the verdict it implies
struct Outcome {
    result: CheckResult,
    failure: Option<InvalidReason>,
}

impl Outcome {
    fn pass(message: String, start: Instant) -> Self {
        Outcome {
            result: CheckResult::Pass {
                message,
                duration_ms: elapsed_ms(start),
            },
            failure: None,
        }
    }

    fn fail(reason: InvalidReason, details: String, start: Instant) -> Self {
        Outcome {
            result: CheckResult::Fail {
                message: reason.to_string(),
                details,
                duration_ms: elapsed_ms(start),
            },
            failure: Some(reason),
        }
    }
}

/// Validates one installation root.
#[derive(Debug, Clone)]
pub struct InstallationValidator {
    root: PathBuf,
    allowed_keys: AllowedKeySet,
    blank_lines: BlankLinePolicy,
}

impl InstallationValidator {
    /// Create a validator with the default key set and blank-line policy
    pub fn new(root: impl Into<PathBuf>) -> Self {
        InstallationValidator {
            root: root.into(),
            allowed_keys: AllowedKeySet::default(),
            blank_lines: BlankLinePolicy::default(),
        }
    }

    pub fn from_config(config: &VerifyConfig) -> Self {
        InstallationValidator {
            root: config.root.clone(),
            allowed_keys: config.allowed_keys,
            blank_lines: config.blank_lines,
        }
    }

    pub fn with_blank_lines(mut self, blank_lines: BlankLinePolicy) -> Self {
        self.blank_lines = blank_lines;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run all checks and return only the verdict
    pub fn validate(&self) -> ValidationResult {
        self.run(|_| {}).result
    }

    /// Run all checks and build a report.
    ///
    /// `on_diagnostic` receives each configuration syntax error as it is found.
    pub fn run<F>(&self, mut on_diagnostic: F) -> ValidationReport
    where
        F: FnMut(&Diagnostic),
    {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new();

        debug!(root = %self.root.display(), "validating installation");

        for kind in CheckKind::ALL {
            let mut check = kind.describe();

            if let Some(reason) = aggregator.failure() {
                check.result = Some(CheckResult::Skip {
                    reason: format!("not run: {}", reason),
                });
                aggregator.add_result(check);
                continue;
            }

            let outcome = match kind {
                CheckKind::BootFiles => self.check_boot_files(),
                CheckKind::ConfigPresent => self.check_config_present(),
                CheckKind::ConfigSyntax => {
                    self.check_config_syntax(&mut aggregator, &mut on_diagnostic)
                }
            };

            if let Some(reason) = outcome.failure {
                aggregator.fail(reason);
            }
            check.result = Some(outcome.result);
            aggregator.add_result(check);
        }

        let report = aggregator.into_report(self.root.clone(), elapsed_ms(start));
        info!(
            root = %self.root.display(),
            valid = report.result.is_valid(),
            "validation finished"
        );
        report
    }

    /// EFI-001
    fn check_boot_files(&self) -> Outcome {
        let start = Instant::now();

        match artifacts::find_boot_loader(&self.root) {
            Some(path) => Outcome::pass(format!("found {}", relative(&self.root, &path)), start),
            None => Outcome::fail(
                InvalidReason::MissingBootFiles,
                format!("expected {}", BOOT_LOADER_PATHS.join(" or ")),
                start,
            ),
        }
    }

    /// CFG-001
    fn check_config_present(&self) -> Outcome {
        let start = Instant::now();
        let path = artifacts::config_path(&self.root);

        match FileExistence::probe(&path) {
            FileExistence::Present => Outcome::pass(format!("found {}", CONFIG_PATH), start),
            FileExistence::Absent => Outcome::fail(
                InvalidReason::MissingConfig,
                format!("expected {}", CONFIG_PATH),
                start,
            ),
            FileExistence::Inaccessible(e) => {
                warn!(path = %path.display(), error = %e, "cannot inspect configuration file");
                Outcome::fail(InvalidReason::UnreadableConfig, e.to_string(), start)
            }
        }
    }

    /// CFG-002
    fn check_config_syntax<F>(
        &self,
        aggregator: &mut ResultAggregator,
        on_diagnostic: &mut F,
    ) -> Outcome
    where
        F: FnMut(&Diagnostic),
    {
        let start = Instant::now();
        let path = artifacts::config_path(&self.root);

        let report = match syntax::check_syntax(
            &path,
            &self.allowed_keys,
            self.blank_lines,
            &mut *on_diagnostic,
        ) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "configuration file unreadable");
                return Outcome::fail(InvalidReason::UnreadableConfig, e.to_string(), start);
            }
        };

        if report.is_valid() {
            return Outcome::pass(
                format!("{} lines checked, all keys recognized", report.lines),
                start,
            );
        }

        let details = report
            .diagnostics
            .iter()
            .map(|d| format!("line {}: \"{}\"", d.line, d.key))
            .collect::<Vec<_>>()
            .join("; ");
        let outcome = Outcome::fail(InvalidReason::BadConfig, details, start);
        aggregator.add_diagnostics(report.diagnostics);
        outcome
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
