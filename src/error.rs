//! Error handling for recon-report
//!
//! Every failure in the pipeline is fatal for the run. Missing optional data
//! inside an otherwise well-formed scan document is not an error and never
//! reaches this module.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for report generation
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Malformed scan document: {0}")]
    MalformedInput(String),

    #[error("Scan document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

impl ReportError {
    /// Whether the error came from the scanner process itself
    pub fn is_external(&self) -> bool {
        matches!(self, ReportError::ExternalTool(_))
    }
}

impl From<quick_xml::Error> for ReportError {
    fn from(e: quick_xml::Error) -> Self {
        ReportError::MalformedInput(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ReportError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ReportError::MalformedInput(format!("invalid attribute: {}", e))
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(e: toml::de::Error) -> Self {
        ReportError::Config(format!("Failed to parse TOML: {}", e))
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        ReportError::Output(format!("CSV write failed: {}", e))
    }
}

impl From<tokio::time::error::Elapsed> for ReportError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        ReportError::ExternalTool("scan timed out".to_string())
    }
}
