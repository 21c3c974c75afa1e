//! Configuration syntax check (CFG-002).
//!
//! The configuration file holds one directive per line, `<key> <value...>`.
//! Only the key is validated; values are passed to the boot loader as-is.
//! Lines whose key starts with `#` are comments.
//!
//! Every line is checked even after a bad one is found, so a single run
//! reports all offending lines.

use crate::VerifyError;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Keys understood by the Enterprise boot loader.
pub const DEFAULT_KEYS: &[&str] = &["family", "kernel", "initrd", "root"];

/// Fixed set of keys a directive may start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedKeySet {
    keys: &'static [&'static str],
}

impl AllowedKeySet {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        AllowedKeySet { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key)
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }
}

impl Default for AllowedKeySet {
    fn default() -> Self {
        AllowedKeySet::new(DEFAULT_KEYS)
    }
}

/// How lines with no content are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankLinePolicy {
    /// Empty or whitespace-only lines are accepted
    #[default]
    Allow,
    /// The empty key is looked up like any other and rejected
    Legacy,
}

/// One configuration line split into its key and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDirective<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> ConfigDirective<'a> {
    /// Split at the first space. A line without one is all key.
    pub fn parse(line: &'a str) -> Self {
        match line.split_once(' ') {
            Some((key, value)) => ConfigDirective { key, value },
            None => ConfigDirective { key: line, value: "" },
        }
    }

    pub fn is_comment(&self) -> bool {
        self.key.starts_with('#')
    }
}

/// A line whose key is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub key: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error on line {}: key \"{}\" is not valid",
            self.line, self.key
        )
    }
}

/// Outcome of checking a whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntaxReport {
    /// Number of lines read
    pub lines: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyntaxReport {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Return the offending key if `line` is not an acceptable directive.
pub fn offending_key<'a>(
    line: &'a str,
    allowed: &AllowedKeySet,
    blank_lines: BlankLinePolicy,
) -> Option<&'a str> {
    if blank_lines == BlankLinePolicy::Allow && line.trim().is_empty() {
        return None;
    }

    let directive = ConfigDirective::parse(line);
    if directive.is_comment() || allowed.contains(directive.key) {
        None
    } else {
        Some(directive.key)
    }
}

/// Check every line produced by `reader`.
///
/// `on_diagnostic` sees each diagnostic as soon as its line is read. The
/// final line does not need a terminator; `\n` and `\r\n` are both stripped.
/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn check_lines<R, F>(
    mut reader: R,
    allowed: &AllowedKeySet,
    blank_lines: BlankLinePolicy,
    mut on_diagnostic: F,
) -> io::Result<SyntaxReport>
where
    R: BufRead,
    F: FnMut(&Diagnostic),
{
    let mut report = SyntaxReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        report.lines += 1;

        let text = String::from_utf8_lossy(strip_terminator(&buf));
        if let Some(key) = offending_key(&text, allowed, blank_lines) {
            let diagnostic = Diagnostic {
                line: report.lines,
                key: key.to_string(),
            };
            on_diagnostic(&diagnostic);
            report.diagnostics.push(diagnostic);
        }
    }

    Ok(report)
}

/// Check the configuration file at `path`.
///
/// Failing to open or read the file is an error, never a verdict.
pub fn check_syntax<F>(
    path: &Path,
    allowed: &AllowedKeySet,
    blank_lines: BlankLinePolicy,
    on_diagnostic: F,
) -> Result<SyntaxReport, VerifyError>
where
    F: FnMut(&Diagnostic),
{
    let unreadable = |source: io::Error| VerifyError::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let report = check_lines(BufReader::new(file), allowed, blank_lines, on_diagnostic)
        .map_err(unreadable)?;

    debug!(
        path = %path.display(),
        lines = report.lines,
        errors = report.diagnostics.len(),
        "configuration syntax checked"
    );
    Ok(report)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
