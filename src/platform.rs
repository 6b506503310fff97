//! Host platform detection and solver binary naming.

use std::fmt;

use log::{info, warn};

use crate::error::{MultirunError, Result};

/// Operating system the solver will run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    /// Known OS with no solver build (Windows)
    Unsupported(String),
    /// Unrecognized OS; treated as Linux
    UnknownFallback(String),
}

impl Platform {
    /// Resolve the platform of the running process
    pub fn detect() -> Self {
        let platform = Self::from_os(std::env::consts::OS);
        info!("Resolved platform: {}", platform);
        platform
    }

    /// Map an OS identifier as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Unsupported(os.to_string()),
            other => Platform::UnknownFallback(other.to_string()),
        }
    }

    /// Reject platforms with no solver build.
    ///
    /// An unrecognized OS passes with a warning and uses the Linux binary.
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Platform::Linux | Platform::MacOs => Ok(()),
            Platform::UnknownFallback(os) => {
                warn!("Unknown OS '{}'; proceeding assuming Linux", os);
                Ok(())
            }
            Platform::Unsupported(os) => Err(MultirunError::UnsupportedPlatform(format!(
                "{} (only Linux and macOS solver builds exist)",
                os
            ))),
        }
    }

    /// File suffix of the solver build for this platform
    pub fn binary_suffix(&self) -> Result<&'static str> {
        match self {
            Platform::Linux | Platform::UnknownFallback(_) => Ok("linux"),
            Platform::MacOs => Ok("mac"),
            Platform::Unsupported(os) => Err(MultirunError::UnsupportedPlatform(os.clone())),
        }
    }

    /// Solver binary name, e.g. `DupLoss-2.linux`
    pub fn binary_name(&self, solver: &str) -> Result<String> {
        Ok(format!("{}.{}", solver, self.binary_suffix()?))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Platform::UnknownFallback(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Unsupported(os) => write!(f, "{} (unsupported)", os),
            Platform::UnknownFallback(os) => write!(f, "{} (assuming linux)", os),
        }
    }
}
