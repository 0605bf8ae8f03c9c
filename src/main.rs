//! Device Fingerprint CLI
//!
//! Computes the fingerprint of the local machine or of a recorded signal record.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use device_fingerprint::{
    collector::HostEnvironment,
    config::{Config, SignalConfig},
    core::{hash_record, is_canonical, FingerprintOptions, Fingerprinter},
    signals::{SignalKind, SignalRecord},
    SIGNAL_DECLARATION, VERSION,
};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fingerprint")]
#[command(version = VERSION)]
#[command(about = "Cookie-less device identification from host signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect signals from this machine and print its fingerprint
    Generate {
        /// Signals to collect (comma-separated names, or all)
        #[arg(long)]
        signals: Option<String>,

        /// Per-probe timeout in milliseconds (0 disables)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Also print the collected signal record
        #[arg(long)]
        show_record: bool,

        /// Also print which signals were unavailable
        #[arg(long)]
        report: bool,

        /// Print fingerprint, record and report as one JSON object
        #[arg(long)]
        json: bool,
    },

    /// Print the fingerprint of a signal record JSON file
    Hash {
        /// Record file, or - for stdin
        file: PathBuf,
    },

    /// Display which signals are collected
    Signals,

    /// Show configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            signals,
            timeout_ms,
            show_record,
            report,
            json,
        } => cmd_generate(signals, timeout_ms, show_record, report, json).await,
        Commands::Hash { file } => cmd_hash(file).await,
        Commands::Signals => cmd_signals(),
        Commands::Config { init } => cmd_config(init),
    }
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load configuration, using defaults");
        Config::default()
    })
}

async fn cmd_generate(
    signals: Option<String>,
    timeout_ms: Option<u64>,
    show_record: bool,
    show_report: bool,
    json: bool,
) -> Result<()> {
    let mut config = load_config();

    if let Some(csv) = signals {
        config.signals = SignalConfig::from_csv(&csv)?;
        if !config.signals.any_enabled() {
            bail!("At least one signal must be enabled");
        }
    }
    if let Some(ms) = timeout_ms {
        config.probe_timeout_ms = ms;
    }

    let fingerprinter = Fingerprinter::new(HostEnvironment::new())
        .with_options(FingerprintOptions::from(&config));
    let result = fingerprinter.generate_with_report().await?;

    if json {
        let output = serde_json::json!({
            "fingerprint": result.fingerprint,
            "record": result.record,
            "report": result.report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", result.fingerprint);

    if show_record {
        println!();
        println!("{}", serde_json::to_string_pretty(&result.record)?);
    }

    if show_report {
        let enabled: Vec<String> = fingerprinter
            .options()
            .signals
            .enabled()
            .iter()
            .map(|kind| kind.to_string())
            .collect();

        println!();
        println!("Enabled signals: {}", enabled.join(", "));
        println!(
            "Present in record: {}/{}",
            result.record.present_count(),
            SignalKind::ALL.len()
        );
        println!();
        println!("{}", result.report.summary());
    }

    Ok(())
}

async fn cmd_hash(file: PathBuf) -> Result<()> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Could not read record from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Could not read {file:?}"))?
    };

    let record: SignalRecord =
        serde_json::from_str(&content).context("File is not a signal record")?;
    if !is_canonical(&record, content.as_bytes())? {
        tracing::warn!(
            "record is not in canonical form; hashing its re-serialized form, not the file bytes"
        );
    }
    println!("{}", hash_record(&record)?);

    Ok(())
}

fn cmd_signals() -> Result<()> {
    let config = load_config();

    println!("{SIGNAL_DECLARATION}");
    println!("Signals (in record order):");
    for kind in SignalKind::ALL {
        println!(
            "  {:<14} {:<9} {}",
            kind.key(),
            if config.signals.is_enabled(kind) {
                "enabled"
            } else {
                "disabled"
            },
            kind.description()
        );
    }

    Ok(())
}

fn cmd_config(init: bool) -> Result<()> {
    let path = Config::config_path();

    if init {
        if path.exists() {
            println!("Config file already exists: {path:?}");
        } else {
            Config::default().save()?;
            println!("Wrote default config to {path:?}");
        }
        println!();
    }

    let config = Config::load()?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
