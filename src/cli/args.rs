//! Command line arguments for verify-install.
//!
//! With no arguments the tool runs the `check` command against the current
//! directory, which is expected to be the root of the USB stick.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command to execute
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Validate the installation (default)
    #[default]
    Check,
    /// List the checks performed
    List,
    /// Print build information
    Version,
}

/// Output format selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI pipelines that build USB images
    Junit,
}

/// Parsed command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "verify-install",
    version,
    about = "Verify that an Enterprise live-USB installation has its EFI boot files and a valid configuration"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Installation root (mount point of the USB stick)
    #[arg(long, global = true, env = "VERIFY_INSTALL_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "VERIFY_INSTALL_FORMAT",
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,

    /// List every check and its outcome; log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored status tags (also set by NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Report blank configuration lines as invalid keys
    #[arg(long, global = true)]
    pub legacy_blank_lines: bool,
}

impl Args {
    /// The command to run, `check` when none was given
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Whether color output is wanted, honoring NO_COLOR
    pub fn color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
