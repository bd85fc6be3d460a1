use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use recon_report::{
    config::MAX_TIMING,
    utils::{
        format_duration,
        target_parser::{parse_targets, total_addresses},
    },
    NmapExecutor, ReportConfig, ReportPipeline, ReportRun, ScanProfile,
};

const PERMISSION_NOTE: &str = "Note: Only scan systems you own or have permission to test.";

fn build_cli() -> Command {
    Command::new("recon-report")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Nmap wrapper that outputs HTML + CSV reports")
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .help("Target(s) or CIDR (e.g., 192.168.1.10 or 10.0.0.0/24)")
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("PROFILE")
                .help("Scan profile: quick (service detection) or full (scripts, service, OS) [default: quick]")
                .value_parser(["quick", "full"]),
        )
        .arg(
            Arg::new("udp")
                .long("udp")
                .help("Include UDP scan (considerably slower)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .value_name("LEVEL")
                .help("Nmap timing template T0-T5 [default: 4]")
                .value_parser(["0", "1", "2", "3", "4", "5"]),
        )
        .arg(
            Arg::new("rate")
                .long("rate")
                .value_name("PPS")
                .help("Pass --min-rate packets/sec to nmap (0 = off)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("outdir")
                .short('o')
                .long("outdir")
                .value_name("DIR")
                .help("Output directory [default: reports]"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML config file (default: ~/.recon-report.toml if present)"),
        )
        .arg(
            Arg::new("nmap-path")
                .long("nmap-path")
                .value_name("PATH")
                .help("Path to the nmap binary [default: nmap]"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Kill the scan if it runs longer than this")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("from-xml")
                .long("from-xml")
                .value_name("FILE")
                .help("Skip scanning and build the reports from an existing nmap XML file"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
}

/// Config file first, then every flag given on the command line on top
fn build_config(matches: &ArgMatches) -> anyhow::Result<ReportConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ReportConfig::from_toml_file(path)?,
        None => ReportConfig::load_default_config()?,
    };

    if let Some(targets) = matches.get_many::<String>("targets") {
        config.targets = targets.cloned().collect();
    }

    if let Some(profile) = matches.get_one::<String>("profile") {
        config.profile = profile.parse::<ScanProfile>().map_err(anyhow::Error::msg)?;
    }

    if matches.get_flag("udp") {
        config.udp = true;
    }

    if let Some(timing) = matches.get_one::<String>("timing") {
        config.timing = timing
            .parse::<u8>()
            .with_context(|| format!("timing must be 0-{}", MAX_TIMING))?;
    }

    if let Some(rate) = matches.get_one::<u64>("rate") {
        config.rate = *rate;
    }

    if let Some(outdir) = matches.get_one::<String>("outdir") {
        config.output_directory = PathBuf::from(outdir);
    }

    if let Some(nmap_path) = matches.get_one::<String>("nmap-path") {
        config.nmap_path = nmap_path.clone();
    }

    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout_secs = Some(*timeout);
    }

    Ok(config)
}

fn scan_spinner(config: &ReportConfig) -> anyhow::Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")?);
    spinner.set_message(format!(
        "Running {} scan against {} target(s)...",
        config.profile,
        config.targets.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

fn print_summary(report: &ReportRun, elapsed: Duration) {
    println!("{} {}", "✔".bright_green().bold(), "Done".bright_green().bold());
    println!("  HTML : {}", report.artifacts.html.display().to_string().bright_cyan());
    println!("  CSV  : {}", report.artifacts.csv.display().to_string().bright_cyan());
    println!("  XML  : {}", report.artifacts.xml.display());
    println!(
        "  {} host(s), {} entries in {}",
        report.summary.hosts.to_string().bright_white().bold(),
        report.summary.entries.to_string().bright_white().bold(),
        format_duration(elapsed)
    );
    println!("{}", PERMISSION_NOTE.bright_yellow());
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = build_config(matches)?;
    let start = Instant::now();

    let report = if let Some(xml) = matches.get_one::<String>("from-xml") {
        let pipeline = ReportPipeline::new(config, NmapExecutor::new());
        pipeline
            .render_existing(Path::new(xml))
            .with_context(|| format!("failed to build reports from {}", xml))?
    } else {
        config.validate()?;

        if !NmapExecutor::is_available(&config.nmap_path).await {
            bail!(
                "'{}' could not be started; install nmap or pass --nmap-path",
                config.nmap_path
            );
        }

        let parsed = parse_targets(&config.targets)?;
        let scope = match total_addresses(&parsed) {
            Some(count) => format!(" ({} address(es))", count),
            None => String::new(),
        };
        println!(
            "{} {}{}",
            "[~] Targets:".bright_blue(),
            config.targets.join(", ").bright_cyan().bold(),
            scope
        );
        println!(
            "{} {} (-T{}{}) - {}",
            "[~] Profile:".bright_blue(),
            config.profile.to_string().bright_white().bold(),
            config.timing,
            if config.udp { ", UDP" } else { "" },
            config.profile.description()
        );
        if config.udp {
            println!("{}", "[!] UDP scanning is enabled, this can take a while".bright_yellow());
        }

        let spinner = scan_spinner(&config)?;
        let pipeline = ReportPipeline::new(config, NmapExecutor::new());
        let result = pipeline.run().await;
        spinner.finish_and_clear();
        result.context("scan failed")?
    };

    print_summary(&report, start.elapsed());
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();
    if matches.get_flag("no-color") {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&matches).await {
        eprintln!("{} {:#}", "[!] Error:".bright_red().bold(), e);
        process::exit(1);
    }
}
