//! Version and build information.
//!
//! Provides version, git commit, and build metadata.

use std::fmt;

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    pub rustc_version: Option<&'static str>,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "verify-install {}", self.version)?;

        if let Some(commit) = self.commit {
            writeln!(f, "Commit: {}", commit)?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {}", date)?;
        }

        write!(f, "Target: {}", self.target)?;

        if let Some(rustc) = self.rustc_version {
            write!(f, "\nRustc: {}", rustc)?;
        }

        Ok(())
    }
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("VERIFY_INSTALL_GIT_HASH"),
        build_date: option_env!("VERIFY_INSTALL_BUILD_DATE"),
        target: option_env!("VERIFY_INSTALL_TARGET").unwrap_or(std::env::consts::ARCH),
        rustc_version: option_env!("VERIFY_INSTALL_RUSTC_VERSION"),
    }
}
