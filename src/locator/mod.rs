//! Discovery of the `Rscript` executable.
//!
//! Resolution is repeated on every call so an R installed or removed between
//! invocations is observed. Nothing here is cached.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{BridgeError, Result},
    platform::Platform,
};

pub const DEFAULT_WINDOWS_ROOT: &str = r"C:\Program Files\R";

const RSCRIPT_UNIX: &str = "Rscript";
const RSCRIPT_WINDOWS: &str = "Rscript.exe";

#[derive(Debug, Clone)]
pub struct EngineLocator {
    pub platform: Platform,
    /// Directory containing `Rscript` on Unix-like hosts, or the
    /// installation root to scan on Windows.
    pub override_dir: Option<PathBuf>,
    /// Where versioned R installs live on Windows.
    pub windows_root: PathBuf,
}

impl EngineLocator {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            override_dir: None,
            windows_root: PathBuf::from(DEFAULT_WINDOWS_ROOT),
        }
    }

    pub fn with_override(mut self, dir: Option<PathBuf>) -> Self {
        self.override_dir = dir;
        self
    }

    pub fn with_windows_root(mut self, root: PathBuf) -> Self {
        self.windows_root = root;
        self
    }

    pub fn locate(&self) -> Result<PathBuf> {
        let path = match self.platform {
            Platform::Win => self.locate_windows()?,
            Platform::Lin | Platform::Mac => self.locate_unix()?,
        };
        debug!(platform = %self.platform, path = %path.display(), "resolved Rscript");
        Ok(path)
    }

    /// The override, when given, replaces the installation root; either way
    /// the newest version directory under it is used.
    fn locate_windows(&self) -> Result<PathBuf> {
        let root = self.override_dir.as_ref().unwrap_or(&self.windows_root);
        let not_found = || BridgeError::EngineNotFound { path: root.clone() };
        if !root.is_dir() {
            return Err(not_found());
        }
        let newest = latest_entry(root).ok_or_else(not_found)?;
        // The composed path is not checked for existence.
        Ok(root.join(newest).join("bin").join(RSCRIPT_WINDOWS))
    }

    fn locate_unix(&self) -> Result<PathBuf> {
        match &self.override_dir {
            Some(dir) => {
                let candidate = dir.join(RSCRIPT_UNIX);
                if candidate.is_file() {
                    Ok(candidate)
                } else {
                    Err(BridgeError::EngineNotFound { path: dir.clone() })
                }
            }
            None => which::which(RSCRIPT_UNIX).map_err(|e| {
                debug!(error = %e, "Rscript not on PATH");
                BridgeError::EngineNotFound {
                    path: PathBuf::from(RSCRIPT_UNIX),
                }
            }),
        }
    }
}

/// Lexicographically last entry name under `root`, taken as the newest version.
fn latest_entry(root: &Path) -> Option<std::ffi::OsString> {
    let read_dir = fs::read_dir(root).ok()?;
    read_dir.filter_map(|e| e.ok().map(|e| e.file_name())).max()
}
