//! Scan invocation
//!
//! The actual scanning is done by an external binary. This module describes
//! what to ask of it ([`ScanProfile`]) and the seam through which the
//! pipeline asks ([`ScanExecutor`]).

pub mod nmap;

use crate::config::ReportConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use nmap::{build_nmap_args, NmapExecutor};

/// Named bundle of scanner options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    /// Service/version detection only
    Quick,
    /// Default scripts, service/version detection and OS detection
    Full,
}

impl ScanProfile {
    /// Scanner flags implied by the profile, timing excluded
    pub fn nmap_flags(&self) -> &'static [&'static str] {
        match self {
            ScanProfile::Quick => &["-sV"],
            ScanProfile::Full => &["-sC", "-sV", "-O"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanProfile::Quick => "quick",
            ScanProfile::Full => "full",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScanProfile::Quick => "Top 1000 ports with service detection",
            ScanProfile::Full => "Default scripts, service and OS detection",
        }
    }
}

impl fmt::Display for ScanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScanProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(ScanProfile::Quick),
            "full" => Ok(ScanProfile::Full),
            _ => Err(format!("Unknown scan profile: {}", s)),
        }
    }
}

/// Runs a scan and leaves its XML result document at `output`.
///
/// Implementations return only once the document is complete; the returned
/// path is `output` itself so calls can be chained.
#[async_trait]
pub trait ScanExecutor: Send + Sync {
    async fn execute_scan(&self, config: &ReportConfig, output: &Path) -> crate::Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("quick".parse::<ScanProfile>().unwrap(), ScanProfile::Quick);
        assert_eq!("FULL".parse::<ScanProfile>().unwrap(), ScanProfile::Full);
        assert!("stealth".parse::<ScanProfile>().is_err());
    }

    #[test]
    fn test_profile_flags() {
        assert_eq!(ScanProfile::Quick.nmap_flags(), &["-sV"]);
        assert_eq!(ScanProfile::Full.nmap_flags(), &["-sC", "-sV", "-O"]);
    }

    #[test]
    fn test_profile_display_round_trips() {
        for profile in [ScanProfile::Quick, ScanProfile::Full] {
            assert_eq!(profile.to_string().parse::<ScanProfile>().unwrap(), profile);
        }
    }
}
