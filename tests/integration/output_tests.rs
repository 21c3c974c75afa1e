//! Output formatting tests.
//!
//! Tests for terminal, JSON, and JUnit XML output formatters.

use std::path::PathBuf;
use verify_install::checks::syntax::Diagnostic;
use verify_install::checks::CheckKind;
use verify_install::cli::args::OutputFormat;
use verify_install::cli::output::{get_formatter, OutputFormatter, TerminalFormatter};
use verify_install::engine::result::{ResultAggregator, ValidationReport};
use verify_install::{Check, CheckResult, InvalidReason};

fn executed(kind: CheckKind, result: CheckResult) -> Check {
    Check {
        result: Some(result),
        ..kind.describe()
    }
}

fn create_bad_config_report() -> ValidationReport {
    let mut aggregator = ResultAggregator::new();
    aggregator.add_result(executed(
        CheckKind::BootFiles,
        CheckResult::Pass {
            message: "found efi/boot/boot.efi".to_string(),
            duration_ms: 1,
        },
    ));
    aggregator.add_result(executed(
        CheckKind::ConfigPresent,
        CheckResult::Pass {
            message: "found efi/boot/.MLUL-Live-USB".to_string(),
            duration_ms: 1,
        },
    ));
    aggregator.add_result(executed(
        CheckKind::ConfigSyntax,
        CheckResult::Fail {
            message: "the configuration file is bad".to_string(),
            details: "line 4: \"bogus\"".to_string(),
            duration_ms: 2,
        },
    ));
    aggregator.add_diagnostics(vec![Diagnostic {
        line: 4,
        key: "bogus".to_string(),
    }]);
    aggregator.fail(InvalidReason::BadConfig);
    aggregator.into_report(PathBuf::from("/media/usb"), 4)
}

fn create_valid_report() -> ValidationReport {
    let mut aggregator = ResultAggregator::new();
    for kind in CheckKind::ALL {
        aggregator.add_result(executed(
            kind,
            CheckResult::Pass {
                message: "ok".to_string(),
                duration_ms: 0,
            },
        ));
    }
    aggregator.into_report(PathBuf::from("/media/usb"), 0)
}

#[test]
fn test_terminal_plain_is_single_line() {
    let formatter = TerminalFormatter::new(true, false);
    let output = formatter.format(&create_valid_report()).unwrap();
    assert_eq!(output, "The installation is valid. All's good. :)");

    let output = formatter.format(&create_bad_config_report()).unwrap();
    assert_eq!(
        output,
        "The installation is invalid: the configuration file is bad"
    );
}

#[test]
fn test_terminal_verbose_without_color() {
    let formatter = TerminalFormatter::new(false, true);
    let output = formatter.format(&create_bad_config_report()).unwrap();

    assert!(output.starts_with("Installation root: /media/usb\n"));
    assert!(output.contains("  [PASS] EFI-001 EFI Boot Loader Present: found efi/boot/boot.efi (1ms)"));
    assert!(output.contains(
        "  [FAIL] CFG-002 Configuration Syntax: the configuration file is bad - line 4: \"bogus\" (2ms)"
    ));
    assert!(output.contains("SUMMARY: 2 passed, 1 failed, 0 skipped"));
    assert!(!output.contains("\x1b["));
    assert!(output.ends_with("The installation is invalid: the configuration file is bad"));
}

#[test]
fn test_terminal_verbose_color_only_on_tags() {
    let formatter = TerminalFormatter::new(true, true);
    let output = formatter.format(&create_bad_config_report()).unwrap();

    assert!(output.contains("\x1b[32m[PASS]\x1b[0m"));
    assert!(output.contains("\x1b[31m[FAIL]\x1b[0m"));
    let last = output.lines().last().unwrap();
    assert!(!last.contains("\x1b["));
}

#[test]
fn test_get_formatter_text() {
    let formatter = get_formatter(OutputFormat::Text, false, false).unwrap();
    let output = formatter.format(&create_valid_report()).unwrap();
    assert_eq!(output, "The installation is valid. All's good. :)");
}

#[cfg(feature = "json")]
#[test]
fn test_json_document() {
    let formatter = get_formatter(OutputFormat::Json, false, false).unwrap();
    let output = formatter.format(&create_bad_config_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["root"], "/media/usb");
    assert_eq!(value["valid"], false);
    assert_eq!(value["reason"], "bad_config");
    assert_eq!(
        value["message"],
        "The installation is invalid: the configuration file is bad"
    );
    assert_eq!(value["summary"]["passed"], 2);
    assert_eq!(value["summary"]["failed"], 1);
    assert_eq!(value["checks"][2]["id"], "CFG-002");
    assert_eq!(value["checks"][2]["category"], "config");
    assert_eq!(value["checks"][2]["result"]["status"], "fail");
    assert_eq!(value["diagnostics"][0]["line"], 4);
    assert_eq!(value["diagnostics"][0]["key"], "bogus");
}

#[cfg(feature = "json")]
#[test]
fn test_json_valid_has_null_reason() {
    let formatter = get_formatter(OutputFormat::Json, false, false).unwrap();
    let output = formatter.format(&create_valid_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["valid"], true);
    assert!(value["reason"].is_null());
    assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[cfg(feature = "junit")]
#[test]
fn test_junit_document() {
    let formatter = get_formatter(OutputFormat::Junit, false, false).unwrap();
    let output = formatter.format(&create_bad_config_report()).unwrap();

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuites tests=\"3\" failures=\"1\" errors=\"0\" skipped=\"0\""));
    assert!(output.contains("classname=\"verify-install.boot\""));
    assert!(output.contains(
        "<failure message=\"the configuration file is bad\">line 4: &quot;bogus&quot;</failure>"
    ));
    assert!(output.contains(
        "<system-out>Syntax error on line 4: key &quot;bogus&quot; is not valid</system-out>"
    ));
    assert!(output.ends_with("</testsuites>"));
}
