//! Boot artifact checks (EFI-001, CFG-001).
//!
//! Locates the files the Enterprise boot loader needs on the installation
//! volume. Paths are relative to the installation root and every probe goes
//! back to the filesystem; nothing is cached between queries.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Boot loader binaries the firmware may start, in lookup order.
pub const BOOT_LOADER_PATHS: [&str; 2] = ["efi/boot/boot.efi", "efi/boot/bootX64.efi"];

/// Location of the Enterprise configuration file.
pub const CONFIG_PATH: &str = "efi/boot/.MLUL-Live-USB";

/// Outcome of probing a single path.
#[derive(Debug)]
pub enum FileExistence {
    /// A regular file is present
    Present,
    /// Nothing is there, or it is not a regular file
    Absent,
    /// The path could not be inspected (permissions, I/O failure)
    Inaccessible(io::Error),
}

impl FileExistence {
    /// Probe `path` on the filesystem.
    pub fn probe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => FileExistence::Present,
            Ok(_) => FileExistence::Absent,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                FileExistence::Absent
            }
            Err(e) => FileExistence::Inaccessible(e),
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, FileExistence::Present)
    }
}

/// Find the first boot loader present under `root`.
///
/// A loader that cannot be inspected counts as missing; the reason is logged.
pub fn find_boot_loader(root: &Path) -> Option<PathBuf> {
    for relative in BOOT_LOADER_PATHS {
        let path = root.join(relative);
        match FileExistence::probe(&path) {
            FileExistence::Present => {
                debug!(path = %path.display(), "boot loader found");
                return Some(path);
            }
            FileExistence::Absent => {
                debug!(path = %path.display(), "boot loader absent");
            }
            FileExistence::Inaccessible(e) => {
                warn!(path = %path.display(), error = %e, "cannot inspect boot loader, treating as absent");
            }
        }
    }
    None
}

/// Path of the configuration file under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_PATH)
}
