//! EMG reflex analysis command line
//!
//! # Usage
//!
//! ```bash
//! # Print recording parameters of each session
//! emg-reflex summary day1.json day2.json
//!
//! # Binned M-wave / H-reflex curve across sessions, channel 0
//! emg-reflex curve day1.json day2.json --channel 0
//!
//! # All channels as JSON for a plotting tool
//! emg-reflex curve day1.json day2.json --json
//!
//! # Recordings with a suspected H-reflex
//! emg-reflex detect day1.json --threshold 0.25
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use emg_reflex::{AnalysisConfig, ConfigLoader, Dataset, Session};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// M-wave and H-reflex analysis of stimulation EMG sessions
#[derive(Parser, Debug)]
#[command(name = "emg-reflex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Configuration file (defaults to config.toml, config/local.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print session recording parameters
    Summary {
        #[arg(required = true)]
        sessions: Vec<PathBuf>,
    },

    /// Binned reflex curve across sessions
    Curve {
        #[arg(required = true)]
        sessions: Vec<PathBuf>,

        /// Channel to report; all channels when omitted
        #[arg(long)]
        channel: Option<usize>,

        /// Stimulus voltage bin size (V), overriding the configuration
        #[arg(long)]
        bin_size: Option<f64>,

        /// Custom channel names, comma separated
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List recordings with a suspected H-reflex
    Detect {
        session: PathBuf,

        /// Peak-to-peak threshold (mV), overriding the configuration
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_paths(vec![path.clone()]),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("loading configuration")?;
    info!(?config, "configuration loaded");

    match cli.command {
        Commands::Summary { sessions } => {
            for path in sessions {
                let session = open_session(&path, &config)?;
                println!("{}\n", session.parameters_summary()?);
            }
        }
        Commands::Curve {
            sessions,
            channel,
            bin_size,
            names,
            json,
        } => {
            let sessions = sessions
                .iter()
                .map(|path| open_session(path, &config))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let mut dataset = Dataset::new(sessions, &config)?;
            if let Some(bin_size) = bin_size {
                dataset.set_bin_size(bin_size)?;
            }
            print_curves(&dataset, channel, &names, json)?;
        }
        Commands::Detect { session, threshold } => {
            let session = open_session(&session, &config)?;
            let set = session.suspected_h_reflexes(None, threshold)?;
            for channel in &set.channels {
                for trace in &channel.traces {
                    println!("{}\t{:.3} V", channel.label, trace.stimulus_v);
                }
            }
            info!(count = set.trace_count(), "suspected H-reflex traces");
        }
    }

    Ok(())
}

fn open_session(path: &Path, config: &AnalysisConfig) -> anyhow::Result<Session> {
    Session::open(path, config).with_context(|| format!("loading session {}", path.display()))
}

fn print_curves(
    dataset: &Dataset,
    channel: Option<usize>,
    names: &[String],
    json: bool,
) -> anyhow::Result<()> {
    // a label mismatch is already logged where the labels are resolved
    let mut set = dataset.reflex_curves(Some(names))?;
    if let Some(channel) = channel {
        if channel >= set.curves.len() {
            anyhow::bail!(
                "channel {channel} is out of range ({} channels recorded)",
                set.curves.len()
            );
        }
        set.curves = vec![set.curves.swap_remove(channel)];
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    for curve in &set.curves {
        println!("# {} (bin {} V)", curve.label, set.bin_size);
        println!("voltage\tm_mean\tm_std\th_mean\th_std\tn");
        for point in &curve.points {
            let (v, m_mean, m_std, h_mean, h_std) = point.as_tuple();
            println!(
                "{v:.3}\t{m_mean:.4}\t{m_std:.4}\t{h_mean:.4}\t{h_std:.4}\t{}",
                point.stats.m_wave.count
            );
        }
    }
    Ok(())
}
