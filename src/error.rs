//! Error taxonomy surfaced to callers of the bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while locating R, building a call, or running it.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No usable `Rscript` could be resolved.
    #[error("R engine not found (tried: {})", path.display())]
    EngineNotFound { path: PathBuf },

    /// R ran but printed nothing on stdout.
    #[error("R script execution failed: {diagnostic}")]
    ScriptExecution { diagnostic: String },

    #[error("script file not found: {}", path.display())]
    ScriptNotFound { path: PathBuf },

    /// Missing or malformed call parameters; raised before any process is spawned.
    #[error("invalid call: {0}")]
    Validation(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl BridgeError {
    pub fn script_execution(diagnostic: impl Into<String>) -> Self {
        Self::ScriptExecution {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True when the failure points at the environment rather than the R code.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::EngineNotFound { .. } | Self::UnsupportedPlatform(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
