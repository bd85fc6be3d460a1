use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Address used when a host carries no usable address
pub const UNKNOWN_IP: &str = "unknown";

/// One row per (host, port) pair found in a scan document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub ip: String,
    pub port: String,
    #[serde(rename = "proto")]
    pub protocol: String,
    pub state: String,
    pub service: String,
    pub product: String,
    pub version: String,
}

/// Counts shown in the report header and the completion message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    /// Distinct `ip` values
    pub hosts: usize,
    /// Number of records
    pub entries: usize,
}

impl ReportSummary {
    pub fn from_records(records: &[PortRecord]) -> Self {
        let hosts: HashSet<&str> = records.iter().map(|r| r.ip.as_str()).collect();
        Self {
            hosts: hosts.len(),
            entries: records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}
