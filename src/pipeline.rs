//! One scan-and-report run: scan, extract, render

use crate::config::ReportConfig;
use crate::extractor::{extract_records, PortRecord, ReportSummary};
use crate::output::{render_html, write_csv, ReportArtifacts};
use crate::scanner::ScanExecutor;
use crate::{ReportError, Result};
use chrono::Utc;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub artifacts: ReportArtifacts,
    pub records: Vec<PortRecord>,
    pub summary: ReportSummary,
}

/// Runs the scanner, then the extractor, then both renderers.
///
/// Each step starts only after the previous one finished; the first error
/// ends the run and no later artifact is written.
pub struct ReportPipeline<E: ScanExecutor> {
    config: ReportConfig,
    executor: E,
}

impl<E: ScanExecutor> ReportPipeline<E> {
    pub fn new(config: ReportConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Scan the configured targets and write all three artifacts
    pub async fn run(&self) -> Result<ReportRun> {
        self.config.validate()?;

        let artifacts = ReportArtifacts::create(&self.config.output_directory, Utc::now())?;

        let xml_path = match self.executor.execute_scan(&self.config, &artifacts.xml).await {
            Ok(path) => path,
            Err(e) => {
                // Only succeeds when the scanner left nothing behind
                if fs::remove_dir(&artifacts.run_dir).is_ok() {
                    debug!("Removed empty run directory {}", artifacts.run_dir.display());
                }
                return Err(e);
            }
        };

        self.render(artifacts, &xml_path)
    }

    /// Build the reports from a scan document produced earlier.
    ///
    /// The document is copied into a fresh run directory so the run looks
    /// the same as one that invoked the scanner.
    pub fn render_existing(&self, xml_path: &Path) -> Result<ReportRun> {
        if !xml_path.is_file() {
            return Err(ReportError::NotFound(xml_path.to_path_buf()));
        }

        let artifacts = ReportArtifacts::create(&self.config.output_directory, Utc::now())?;
        fs::copy(xml_path, &artifacts.xml)?;
        info!("Rendering existing scan document {}", xml_path.display());

        let xml = artifacts.xml.clone();
        self.render(artifacts, &xml)
    }

    fn render(&self, artifacts: ReportArtifacts, xml_path: &Path) -> Result<ReportRun> {
        let records = extract_records(xml_path)?;
        let summary = ReportSummary::from_records(&records);

        if summary.is_empty() {
            warn!("Scan document contains no port entries");
        }

        write_csv(&records, &artifacts.csv)?;
        debug!("Wrote {}", artifacts.csv.display());

        let html = render_html(&records, &self.config.targets, artifacts.started_at);
        fs::write(&artifacts.html, html).map_err(|e| {
            ReportError::Output(format!("Cannot write {}: {}", artifacts.html.display(), e))
        })?;
        debug!("Wrote {}", artifacts.html.display());

        info!(
            "Report complete: {} host(s), {} entries",
            summary.hosts, summary.entries
        );

        Ok(ReportRun {
            artifacts,
            records,
            summary,
        })
    }
}
