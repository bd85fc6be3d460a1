//! Nmap integration - builds the command line and runs the scan

use super::ScanExecutor;
use crate::config::ReportConfig;
use crate::{ReportError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;

/// Build the nmap argument list for a run.
///
/// Order: profile flags, timing, UDP, minimum rate, XML output, targets.
pub fn build_nmap_args(config: &ReportConfig, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = config
        .profile
        .nmap_flags()
        .iter()
        .map(|flag| flag.to_string())
        .collect();

    args.push(format!("-T{}", config.timing));

    if config.udp {
        args.push("-sU".to_string());
    }

    if config.rate > 0 {
        args.push("--min-rate".to_string());
        args.push(config.rate.to_string());
    }

    args.push("-oX".to_string());
    args.push(output.to_string_lossy().into_owned());

    args.extend(config.targets.iter().cloned());
    args
}

/// Runs the nmap binary named in the configuration
#[derive(Debug, Clone, Default)]
pub struct NmapExecutor;

impl NmapExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Check that the binary can be started at all
    pub async fn is_available(nmap_path: &str) -> bool {
        Command::new(nmap_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ScanExecutor for NmapExecutor {
    async fn execute_scan(&self, config: &ReportConfig, output: &Path) -> Result<PathBuf> {
        let args = build_nmap_args(config, output);
        info!(
            "Starting {} scan of {} target(s)",
            config.profile,
            config.targets.len()
        );
        debug!("Executing {} with args: {:?}", config.nmap_path, args);

        if config.udp {
            warn!("UDP scanning enabled; expect the scan to take considerably longer");
        }

        let mut cmd = Command::new(&config.nmap_path);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_time = Instant::now();
        let run = cmd.output();
        let result = match config.timeout() {
            Some(limit) => timeout(limit, run).await?,
            None => run.await,
        };

        let output_data = result.map_err(|e| {
            ReportError::ExternalTool(format!("Failed to execute {}: {}", config.nmap_path, e))
        })?;

        let stdout = String::from_utf8_lossy(&output_data.stdout);
        if !stdout.trim().is_empty() {
            debug!("nmap output:\n{}", stdout.trim_end());
        }

        if !output_data.status.success() {
            let stderr = String::from_utf8_lossy(&output_data.stderr);
            let code = output_data
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(ReportError::ExternalTool(format!(
                "{} exited with status {}: {}",
                config.nmap_path,
                code,
                stderr.trim()
            )));
        }

        info!(
            "Scan finished in {:.2}s, results in {}",
            start_time.elapsed().as_secs_f64(),
            output.display()
        );

        Ok(output.to_path_buf())
    }
}
