//! Phenoscope CLI - vegetation phenology from daily NDVI tables

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use phenoscope_algorithms::phenology::{
    phenology_events, rolling_baseline_matrices, sample_events, season_metrics,
    BaselineAlignment, DayWindow, EventOutcome, PhenologyParams,
};
use phenoscope_core::io::{read_ndvi_csv, write_baselines_csv, write_events_csv, write_metrics_csv};
use phenoscope_core::{NdviMatrix, Sample};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "phenoscope")]
#[command(author, version, about = "Vegetation phenology from daily NDVI", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions and sample validity of an NDVI table
    Info {
        /// Input NDVI CSV (365 daily rows, one column per sample)
        input: PathBuf,
    },
    /// Season start, peak, end, rates and integrals per sample
    Metrics {
        /// Input NDVI CSV
        input: PathBuf,
        /// Output metrics CSV
        output: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Valley, baseline-crossing and derivative events with pairwise metrics
    Events {
        /// Input NDVI CSV
        input: PathBuf,
        /// Output events CSV
        output: PathBuf,
        /// Only process this sample
        #[arg(short, long)]
        sample: Option<String>,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Export forward and backward rolling baselines
    Baselines {
        /// Input NDVI CSV
        input: PathBuf,
        /// Output CSV for the forward baseline
        forward: PathBuf,
        /// Output CSV for the backward baseline
        backward: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Detector settings shared by the processing commands
#[derive(Args)]
struct ParamArgs {
    /// JSON file with detector parameters (missing fields use defaults)
    #[arg(short, long)]
    params: Option<PathBuf>,
    /// Season start window as AFTER,BEFORE (exclusive)
    #[arg(long, value_parser = parse_window)]
    start_window: Option<DayWindow>,
    /// Season end window as AFTER,BEFORE (exclusive)
    #[arg(long, value_parser = parse_window)]
    end_window: Option<DayWindow>,
    /// Local extremum order for valley detection
    #[arg(short = 'k', long)]
    order: Option<usize>,
    /// Forward baseline alignment: trailing, centered
    #[arg(short, long)]
    alignment: Option<String>,
    /// Calendar date of the first row (YYYY-MM-DD)
    #[arg(long)]
    origin: Option<NaiveDate>,
    /// Percentile for the peak vigor count
    #[arg(long)]
    vigor_percentile: Option<f64>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<PhenologyParams> {
        let mut params = match &self.params {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read params file {}", path.display()))?;
                serde_json::from_str(&text).context("Failed to parse params file")?
            }
            None => PhenologyParams::default(),
        };

        if let Some(w) = self.start_window {
            params.start_window = w;
        }
        if let Some(w) = self.end_window {
            params.end_window = w;
        }
        if let Some(k) = self.order {
            params.extremum_order = k;
        }
        if let Some(a) = &self.alignment {
            params.alignment = parse_alignment(a)?;
        }
        if let Some(origin) = self.origin {
            params.origin = origin;
        }
        if let Some(p) = self.vigor_percentile {
            params.vigor_percentile = p;
        }

        params
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid parameters: {}", e))?;
        Ok(params)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_matrix(path: &Path) -> Result<NdviMatrix> {
    let pb = spinner("Reading NDVI table...");
    let matrix = read_ndvi_csv(path)
        .with_context(|| format!("Failed to read NDVI table {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} days x {} samples", matrix.days(), matrix.n_samples());
    Ok(matrix)
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_window(s: &str) -> std::result::Result<DayWindow, String> {
    let (after, before) = s
        .split_once(',')
        .ok_or_else(|| format!("expected AFTER,BEFORE, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid day '{}': {}", v, e))
    };
    Ok(DayWindow::new(parse(after)?, parse(before)?))
}

fn parse_alignment(s: &str) -> Result<BaselineAlignment> {
    match s.to_lowercase().as_str() {
        "trailing" | "right" => Ok(BaselineAlignment::Trailing),
        "centered" | "center" => Ok(BaselineAlignment::Centered),
        _ => anyhow::bail!("Unknown alignment: {}. Use trailing or centered.", s),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let matrix = read_matrix(&input)?;
            let samples = matrix.samples();
            let valid = samples.iter().filter(|s| s.is_valid()).count();

            println!("File: {}", input.display());
            println!("Dimensions: {} days x {} samples", matrix.days(), matrix.n_samples());
            println!("Valid samples: {}", valid);
            println!("Invalid samples: {}", samples.len() - valid);
            for sample in &samples {
                match sample {
                    Sample::Valid(s) => println!(
                        "  {:<20} mean {:.4}, {} defined days",
                        s.name,
                        s.mean,
                        s.defined_days()
                    ),
                    Sample::Invalid(s) => println!("  {:<20} skipped: {}", s.name, s.reason),
                }
            }
        }

        Commands::Metrics {
            input,
            output,
            params,
        } => {
            let params = params.resolve()?;
            let matrix = read_matrix(&input)?;

            let start = Instant::now();
            let table = season_metrics(&matrix, &params).context("Failed to compute season metrics")?;
            let elapsed = start.elapsed();

            info!("{} of {} samples have a bounded season", table.defined_count(), table.len());
            write_metrics_csv(&table, &output).context("Failed to write metrics table")?;
            done("Season metrics", &output, elapsed);
        }

        Commands::Events {
            input,
            output,
            sample,
            params,
        } => {
            let params = params.resolve()?;
            let matrix = read_matrix(&input)?;
            let start = Instant::now();

            match sample {
                Some(name) => {
                    let index = matrix.sample_index(&name)?;
                    let series = match matrix.sample(index) {
                        Sample::Valid(series) => series,
                        Sample::Invalid(s) => anyhow::bail!("Sample {} skipped: {}", s.name, s.reason),
                    };
                    let table = sample_events(&series, &params)
                        .with_context(|| format!("Event detection failed for sample {}", name))?;
                    let elapsed = start.elapsed();

                    write_events_csv([(name.as_str(), &table)], &output)
                        .context("Failed to write events table")?;
                    done("Events", &output, elapsed);
                }
                None => {
                    let results = phenology_events(&matrix, &params).context("Failed to detect events")?;
                    let elapsed = start.elapsed();

                    for r in &results {
                        if let EventOutcome::Failed(e) = &r.outcome {
                            warn!("{}: {}", r.sample_id, e);
                        }
                    }

                    let tables = results
                        .iter()
                        .filter_map(|r| r.table().map(|t| (r.sample_id.as_str(), t)));
                    write_events_csv(tables, &output).context("Failed to write events table")?;
                    done("Events", &output, elapsed);
                }
            }
        }

        Commands::Baselines {
            input,
            forward,
            backward,
            params,
        } => {
            let params = params.resolve()?;
            let matrix = read_matrix(&input)?;

            let start = Instant::now();
            let baselines =
                rolling_baseline_matrices(&matrix, &params).context("Failed to build baselines")?;
            let elapsed = start.elapsed();

            let missing = baselines.windows.iter().filter(|w| w.is_none()).count();
            if missing > 0 {
                info!("{} samples have no baseline window", missing);
            }

            let pb = spinner("Writing baselines...");
            write_baselines_csv(matrix.sample_names(), baselines.forward.view(), &forward)
                .context("Failed to write forward baseline")?;
            write_baselines_csv(matrix.sample_names(), baselines.backward.view(), &backward)
                .context("Failed to write backward baseline")?;
            pb.finish_and_clear();

            done("Forward baseline", &forward, elapsed);
            done("Backward baseline", &backward, elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("110,200").unwrap(), DayWindow::new(110, 200));
        assert_eq!(parse_window(" 250 , 360 ").unwrap(), DayWindow::new(250, 360));
        assert!(parse_window("110").is_err());
        assert!(parse_window("a,200").is_err());
    }

    #[test]
    fn test_parse_alignment() {
        assert_eq!(parse_alignment("Centered").unwrap(), BaselineAlignment::Centered);
        assert_eq!(parse_alignment("trailing").unwrap(), BaselineAlignment::Trailing);
        assert!(parse_alignment("left").is_err());
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "phenoscope",
            "metrics",
            "in.csv",
            "out.csv",
            "--start-window",
            "100,190",
            "-k",
            "5",
            "--origin",
            "2022-01-01",
        ])
        .unwrap();

        let Commands::Metrics { params, .. } = cli.command else {
            panic!("expected metrics command");
        };
        let resolved = params.resolve().unwrap();
        assert_eq!(resolved.start_window, DayWindow::new(100, 190));
        assert_eq!(resolved.extremum_order, 5);
        assert_eq!(resolved.origin, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(resolved.end_window, PhenologyParams::default().end_window);
    }
}
