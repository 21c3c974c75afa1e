//! Output formatting for verify-install.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! The terminal formatter always ends with the one-line verdict. Syntax
//! diagnostics are not part of its output: in text mode they are printed as
//! they are found, before the report. JSON and JUnit embed them instead.

use crate::checks::get_all_checks;
use crate::cli::args::OutputFormat;
use crate::engine::result::ValidationReport;
use crate::{CheckResult, VerifyError};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> Result<String, VerifyError>;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool) -> Self {
        TerminalFormatter { color, verbose }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_tag(&self, result: Option<&CheckResult>) -> String {
        match result {
            Some(CheckResult::Pass { .. }) => self.colorize("[PASS]", "32"),
            Some(CheckResult::Fail { .. }) => self.colorize("[FAIL]", "31"),
            Some(CheckResult::Skip { .. }) => self.colorize("[SKIP]", "90"),
            None => self.colorize("[----]", "90"),
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String, VerifyError> {
        let mut output = String::new();

        if self.verbose {
            output.push_str(&format!("Installation root: {}\n", report.root.display()));

            for check in &report.checks {
                let message = match &check.result {
                    Some(CheckResult::Pass { message, duration_ms }) => {
                        format!("{} ({}ms)", message, duration_ms)
                    }
                    Some(CheckResult::Fail {
                        message,
                        details,
                        duration_ms,
                    }) => format!("{} - {} ({}ms)", message, details, duration_ms),
                    Some(CheckResult::Skip { reason }) => reason.clone(),
                    None => "not executed".to_string(),
                };

                output.push_str(&format!(
                    "  {} {} {}: {}\n",
                    self.status_tag(check.result.as_ref()),
                    check.id,
                    check.name,
                    message
                ));
            }

            let summary = report.summary();
            output.push_str(&format!(
                "SUMMARY: {} passed, {} failed, {} skipped\n\n",
                summary.passed, summary.failed, summary.skipped
            ));
        }

        output.push_str(&report.result.message());
        Ok(output)
    }
}

/// JSON formatter
#[cfg(feature = "json")]
pub struct JsonFormatter {
    pretty: bool,
}

#[cfg(feature = "json")]
#[derive(serde::Serialize)]
struct JsonDocument<'a> {
    root: &'a std::path::Path,
    valid: bool,
    reason: Option<crate::InvalidReason>,
    message: String,
    summary: crate::ResultSummary,
    checks: &'a [crate::Check],
    diagnostics: &'a [crate::checks::syntax::Diagnostic],
    total_duration_ms: u64,
}

#[cfg(feature = "json")]
impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

#[cfg(feature = "json")]
impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String, VerifyError> {
        let document = JsonDocument {
            root: &report.root,
            valid: report.result.is_valid(),
            reason: report.result.reason(),
            message: report.result.message(),
            summary: report.summary(),
            checks: &report.checks,
            diagnostics: &report.diagnostics,
            total_duration_ms: report.total_duration_ms,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }
}

/// JUnit XML formatter
#[cfg(feature = "junit")]
#[derive(Default)]
pub struct JunitFormatter;

#[cfg(feature = "junit")]
impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

#[cfg(feature = "junit")]
impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String, VerifyError> {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        let time = report.total_duration_ms as f64 / 1000.0;
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, summary.failed, summary.skipped, time
        ));
        output.push_str(&format!(
            "  <testsuite name=\"verify-install\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, summary.failed, summary.skipped, time
        ));

        for check in &report.checks {
            let duration_ms = match &check.result {
                Some(CheckResult::Pass { duration_ms, .. })
                | Some(CheckResult::Fail { duration_ms, .. }) => *duration_ms,
                _ => 0,
            };

            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"verify-install.{}\" time=\"{:.3}\"",
                Self::escape_xml(&check.id),
                check.category.to_string().to_lowercase(),
                duration_ms as f64 / 1000.0
            ));

            match &check.result {
                Some(CheckResult::Pass { message, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <system-out>{}</system-out>\n",
                        Self::escape_xml(message)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Fail { message, details, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <failure message=\"{}\">{}</failure>\n",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Skip { reason }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <skipped message=\"{}\" />\n",
                        Self::escape_xml(reason)
                    ));
                    output.push_str("    </testcase>\n");
                }
                None => {
                    output.push_str(" />\n");
                }
            }
        }

        if !report.diagnostics.is_empty() {
            let lines: Vec<String> = report
                .diagnostics
                .iter()
                .map(|d| Self::escape_xml(&d.to_string()))
                .collect();
            output.push_str(&format!(
                "    <system-out>{}</system-out>\n",
                lines.join("\n")
            ));
        }

        output.push_str("  </testsuite>\n");
        output.push_str("</testsuites>");
        Ok(output)
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
) -> Result<Box<dyn OutputFormatter>, VerifyError> {
    match format {
        OutputFormat::Text => Ok(Box::new(TerminalFormatter::new(color, verbose))),
        #[cfg(feature = "json")]
        OutputFormat::Json => Ok(Box::new(JsonFormatter::new(true))),
        #[cfg(feature = "junit")]
        OutputFormat::Junit => Ok(Box::new(JunitFormatter::new())),
        #[allow(unreachable_patterns)]
        other => Err(VerifyError::FormatUnavailable(
            format!("{:?}", other).to_lowercase(),
        )),
    }
}

/// Render the list of checks for the `list` command
pub fn format_check_list() -> String {
    let mut output = String::from("Available checks:\n");
    for check in get_all_checks() {
        output.push_str(&format!(
            "  {:<8} {} - {}\n",
            check.id, check.name, check.description
        ));
    }
    output
}
