//! Configuration module for recon-report

use crate::scanner::ScanProfile;
use crate::utils::target_parser::parse_targets;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest nmap timing template (`-T5`, insane)
pub const MAX_TIMING: u8 = 5;

/// Name of the per-user config file looked up in the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".recon-report.toml";

/// Options for one scan-and-report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Hosts, IP addresses or CIDR ranges handed to the scanner
    pub targets: Vec<String>,

    /// Scan profile
    pub profile: ScanProfile,

    /// Add a UDP scan next to the TCP scan (much slower)
    pub udp: bool,

    /// Timing template (0-5)
    pub timing: u8,

    /// Minimum packet rate; 0 leaves the scanner default
    pub rate: u64,

    /// Base directory; each run gets a timestamped subdirectory
    pub output_directory: PathBuf,

    /// Path to the nmap binary
    pub nmap_path: String,

    /// Kill the scan after this many seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            profile: ScanProfile::Quick,
            udp: false,
            timing: 4, // Aggressive, same as the usual -T4
            rate: 0,
            output_directory: PathBuf::from("reports"),
            nmap_path: "nmap".to_string(),
            timeout_secs: None,
        }
    }
}

impl ReportConfig {
    /// Create a configuration for the given targets
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: ScanProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_udp(mut self, udp: bool) -> Self {
        self.udp = udp;
        self
    }

    pub fn with_timing(mut self, timing: u8) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_rate(mut self, rate: u64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_output_directory<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_directory = dir.into();
        self
    }

    pub fn with_nmap_path<S: Into<String>>(mut self, path: S) -> Self {
        self.nmap_path = path.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Scan timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            crate::ReportError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ReportConfig = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `~/.recon-report.toml` if present, defaults otherwise
    pub fn load_default_config() -> crate::Result<Self> {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let config_path = home_dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            let config = Self::from_toml_file(&config_path)?;
            info!("Loaded config from {}", config_path.display());
            return Ok(config);
        }

        Ok(Self::default())
    }

    /// Validate everything the scanner needs before it is started
    pub fn validate(&self) -> crate::Result<()> {
        if self.targets.is_empty() {
            return Err(crate::ReportError::Config(
                "At least one target is required".to_string(),
            ));
        }

        if self.timing > MAX_TIMING {
            return Err(crate::ReportError::Config(format!(
                "Timing level must be between 0 and {}, got {}",
                MAX_TIMING, self.timing
            )));
        }

        if self.nmap_path.trim().is_empty() {
            return Err(crate::ReportError::Config(
                "nmap path cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(crate::ReportError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        parse_targets(&self.targets)?;

        Ok(())
    }
}
