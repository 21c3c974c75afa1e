//! Validation run tests.
//!
//! Covers the verdicts for each way an installation can be broken, and the
//! per-line behavior of the configuration syntax check.

use crate::fixtures::{InstallTree, BOGUS_LINE_CONFIG, CONFIG_PATH, VALID_CONFIG};
use verify_install::checks::syntax::{check_syntax, AllowedKeySet, BlankLinePolicy, Diagnostic};
use verify_install::engine::result::ValidationResult;
use verify_install::{run_validation, validate, CheckResult, InvalidReason, VerifyConfig};

fn config_for(tree: &InstallTree) -> VerifyConfig {
    VerifyConfig {
        root: tree.root().to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_missing_boot_files_regardless_of_config() {
    let configs = [None, Some(VALID_CONFIG), Some(BOGUS_LINE_CONFIG), Some("")];

    for config in configs {
        let tree = match config {
            Some(content) => InstallTree::empty().config(content),
            None => InstallTree::empty(),
        };

        let result = validate(tree.root());
        assert!(!result.is_valid());
        assert_eq!(result.reason(), Some(InvalidReason::MissingBootFiles));
        assert_eq!(
            result.message(),
            "The installation is invalid: EFI boot files not present"
        );
    }
}

#[test]
fn test_nonexistent_root_is_missing_boot_files() {
    let tree = InstallTree::empty();
    let result = validate(tree.root().join("unmounted"));
    assert_eq!(result.reason(), Some(InvalidReason::MissingBootFiles));
}

#[test]
fn test_either_boot_loader_is_enough() {
    for name in ["boot.efi", "bootX64.efi"] {
        let tree = InstallTree::empty().boot_loader(name).config(VALID_CONFIG);
        assert!(validate(tree.root()).is_valid(), "{} alone should pass", name);
    }
}

#[test]
fn test_missing_config() {
    let tree = InstallTree::empty().boot_loader("bootX64.efi");
    let result = validate(tree.root());
    assert_eq!(result.reason(), Some(InvalidReason::MissingConfig));
    assert_eq!(
        result.message(),
        "The installation is invalid: no configuration file present"
    );
}

#[test]
fn test_comments_and_valid_keys_pass_without_diagnostics() {
    let tree = InstallTree::with_config("# Enterprise\nfamily Debian\n#kernel old\nkernel /live/vmlinuz\n");
    let path = tree.root().join(CONFIG_PATH);

    let mut streamed = Vec::new();
    let report = check_syntax(
        &path,
        &AllowedKeySet::default(),
        BlankLinePolicy::Allow,
        |d| streamed.push(d.clone()),
    )
    .unwrap();

    assert!(report.is_valid());
    assert!(streamed.is_empty());
}

#[test]
fn test_foo_bar_reported_once_and_later_lines_checked() {
    let tree = InstallTree::with_config("family Ubuntu\nfoo bar\nkernel /casper/vmlinuz\nnope\n");
    let path = tree.root().join(CONFIG_PATH);

    let mut streamed = Vec::new();
    let report = check_syntax(
        &path,
        &AllowedKeySet::default(),
        BlankLinePolicy::Allow,
        |d| streamed.push(d.clone()),
    )
    .unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.lines, 4);
    let foo: Vec<&Diagnostic> = report.diagnostics.iter().filter(|d| d.key == "foo").collect();
    assert_eq!(foo.len(), 1);
    assert_eq!(foo[0].line, 2);
    // The line after "foo bar" is still read; the bad key on line 4 proves it
    assert_eq!(report.diagnostics.last().map(|d| d.line), Some(4));
    assert_eq!(streamed, report.diagnostics);
}

#[test]
fn test_bogus_line_scenario() {
    let tree = InstallTree::with_config(BOGUS_LINE_CONFIG);

    let mut streamed = Vec::new();
    let report = run_validation(&config_for(&tree), |d| streamed.push(d.to_string()));

    assert_eq!(
        streamed,
        vec!["Syntax error on line 4: key \"bogus\" is not valid".to_string()]
    );
    assert_eq!(report.result.reason(), Some(InvalidReason::BadConfig));
    assert_eq!(report.result.exit_code(), 1);
    assert_eq!(
        report.result.message(),
        "The installation is invalid: the configuration file is bad"
    );
}

#[test]
fn test_all_keys_scenario() {
    let tree = InstallTree::with_config(VALID_CONFIG);
    let result = validate(tree.root());

    assert_eq!(result, ValidationResult::valid());
    assert_eq!(result.exit_code(), 0);
    assert_eq!(result.message(), "The installation is valid. All's good. :)");
}

#[test]
fn test_validate_is_idempotent() {
    let trees = [
        InstallTree::empty(),
        InstallTree::empty().boot_loader("boot.efi"),
        InstallTree::with_config(BOGUS_LINE_CONFIG),
        InstallTree::with_config(VALID_CONFIG),
    ];

    for tree in &trees {
        assert_eq!(validate(tree.root()), validate(tree.root()));
    }
}

#[test]
fn test_verdict_follows_filesystem_changes() {
    let tree = InstallTree::with_config(VALID_CONFIG);
    assert!(validate(tree.root()).is_valid());

    let tree = tree.remove("efi/boot/boot.efi");
    assert_eq!(
        validate(tree.root()).reason(),
        Some(InvalidReason::MissingBootFiles)
    );
}

#[test]
fn test_blank_line_policies() {
    let tree = InstallTree::with_config("family Ubuntu\n\nroot /dev/sda1\n");

    let lenient = run_validation(&config_for(&tree), |_| {});
    assert!(lenient.result.is_valid());

    let legacy = VerifyConfig {
        blank_lines: BlankLinePolicy::Legacy,
        ..config_for(&tree)
    };
    let mut streamed = Vec::new();
    let strict = run_validation(&legacy, |d| streamed.push(d.to_string()));
    assert_eq!(strict.result.reason(), Some(InvalidReason::BadConfig));
    assert_eq!(
        streamed,
        vec!["Syntax error on line 2: key \"\" is not valid".to_string()]
    );
}

#[test]
fn test_report_records_skipped_checks() {
    let tree = InstallTree::empty().boot_loader("boot.efi");
    let report = run_validation(&config_for(&tree), |_| {});

    let ids: Vec<&str> = report.checks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["EFI-001", "CFG-001", "CFG-002"]);
    assert!(matches!(report.checks[0].result, Some(CheckResult::Pass { .. })));
    assert!(matches!(report.checks[1].result, Some(CheckResult::Fail { .. })));
    match &report.checks[2].result {
        Some(CheckResult::Skip { reason }) => {
            assert_eq!(reason, "not run: no configuration file present");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_config_is_its_own_reason() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let tree = InstallTree::with_config(VALID_CONFIG);
    let path = tree.root().join(CONFIG_PATH);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    // root ignores file modes; nothing to observe in that case
    if fs::File::open(&path).is_ok() {
        return;
    }

    let result = validate(tree.root());
    assert_eq!(result.reason(), Some(InvalidReason::UnreadableConfig));
    assert_eq!(
        result.message(),
        "The installation is invalid: the configuration file could not be read"
    );
}
