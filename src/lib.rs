//! recon-report - run nmap, keep the XML, get CSV and HTML reports
//!
//! The scan itself is delegated to the nmap binary. This crate builds its
//! command line, flattens the XML result into port records and renders them.

pub mod config;
pub mod error;
pub mod extractor;
pub mod output;
pub mod pipeline;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::ReportConfig;
pub use error::ReportError;
pub use extractor::{extract_records, parse_records, PortRecord, ReportSummary};
pub use output::ReportArtifacts;
pub use pipeline::{ReportPipeline, ReportRun};
pub use scanner::{NmapExecutor, ScanExecutor, ScanProfile};

pub type Result<T> = std::result::Result<T, ReportError>;
