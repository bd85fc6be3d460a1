//! Report artifacts: run directory layout, CSV and HTML rendering

pub mod csv_writer;
pub mod html;

pub use csv_writer::{write_csv, write_csv_to};
pub use html::render_html;

use crate::Result;
use chrono::{DateTime, Utc};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the raw scanner document inside a run directory
pub const XML_FILE: &str = "scan.xml";
/// File name of the CSV export
pub const CSV_FILE: &str = "results.csv";
/// File name of the HTML report
pub const HTML_FILE: &str = "report.html";

/// Directory name format for a run, in UTC
pub const RUN_DIR_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Paths of everything one run produces
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifacts {
    pub run_dir: PathBuf,
    pub xml: PathBuf,
    pub csv: PathBuf,
    pub html: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl ReportArtifacts {
    /// Layout for a run started at `started_at`, without touching the disk
    pub fn layout(base_dir: &Path, started_at: DateTime<Utc>) -> Self {
        let run_dir = base_dir.join(started_at.format(RUN_DIR_FORMAT).to_string());
        Self {
            xml: run_dir.join(XML_FILE),
            csv: run_dir.join(CSV_FILE),
            html: run_dir.join(HTML_FILE),
            run_dir,
            started_at,
        }
    }

    /// Create the run directory (and any missing parents)
    pub fn create(base_dir: &Path, started_at: DateTime<Utc>) -> Result<Self> {
        let artifacts = Self::layout(base_dir, started_at);
        fs::create_dir_all(&artifacts.run_dir)?;
        debug!("Created run directory {}", artifacts.run_dir.display());
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_layout_uses_utc_timestamp() {
        let started = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        let artifacts = ReportArtifacts::layout(Path::new("reports"), started);

        assert_eq!(artifacts.run_dir, PathBuf::from("reports/20260309_070501"));
        assert_eq!(artifacts.xml, PathBuf::from("reports/20260309_070501/scan.xml"));
        assert_eq!(artifacts.csv, PathBuf::from("reports/20260309_070501/results.csv"));
        assert_eq!(artifacts.html, PathBuf::from("reports/20260309_070501/report.html"));
    }

    #[test]
    fn test_create_makes_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("a").join("b");
        let artifacts = ReportArtifacts::create(&base, Utc::now()).unwrap();
        assert!(artifacts.run_dir.is_dir());
        assert!(!artifacts.xml.exists());
    }
}
