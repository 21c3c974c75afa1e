//! Build script for verify-install.
//!
//! Records version information from git and the toolchain so that
//! `verify-install version` can identify the binary on a USB stick.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!(
        "cargo:rustc-env=VERIFY_INSTALL_TARGET={}",
        env::var("TARGET").unwrap_or_else(|_| "unknown".to_string())
    );

    if let Some(hash) = command_output("git", &["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=VERIFY_INSTALL_GIT_HASH={}", hash);
    }

    if let Some(date) = command_output("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]) {
        println!("cargo:rustc-env=VERIFY_INSTALL_BUILD_DATE={}", date);
    }

    // "rustc 1.75.0 (..." -> "1.75.0"
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = command_output(&rustc, &["--version"])
        .and_then(|s| s.split_whitespace().nth(1).map(|v| v.to_string()))
    {
        println!("cargo:rustc-env=VERIFY_INSTALL_RUSTC_VERSION={}", version);
    }
}

/// Run a command and return its trimmed stdout, if it succeeded
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}
