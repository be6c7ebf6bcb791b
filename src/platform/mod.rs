//! Host platform classification.

use std::{fmt, str::FromStr};

use crate::error::BridgeError;

/// The three platform families the locator and parser distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Win,
    Lin,
    Mac,
}

impl Platform {
    /// Classify an OS identifier as reported by `std::env::consts::OS`.
    /// Anything that is neither Windows nor Linux/BSD counts as `Mac`.
    pub fn classify(os: &str) -> Self {
        match os {
            "windows" => Self::Win,
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Lin,
            _ => Self::Mac,
        }
    }

    pub fn current() -> Self {
        Self::classify(std::env::consts::OS)
    }

    pub fn line_separator(self) -> &'static str {
        match self {
            Self::Win => "\r\n",
            Self::Lin | Self::Mac => "\n",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lin => "lin",
            Self::Mac => "mac",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "windows" => Ok(Self::Win),
            "lin" | "linux" => Ok(Self::Lin),
            "mac" | "macos" | "darwin" => Ok(Self::Mac),
            other => Err(BridgeError::UnsupportedPlatform(other.to_string())),
        }
    }
}
