use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use parkhaus_config::ParkhausConfig;
use parkhaus_core::time::SystemClock;
use parkhaus_engine::engine::{LotRuntime, ScenarioReport, StressSummary};
use parkhaus_engine::{run_demo_mode, run_replay_mode, run_stress_mode};
use parkhaus_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser, Debug)]
#[command(name = "parkhaus", version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/parkhaus.yaml plus the environment overlay
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print Prometheus metrics after the command finishes
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the built-in demo session
    Demo,
    /// Replay a YAML scenario file
    Replay(ReplayArgs),
    /// Hammer one lot from many threads with random traffic
    Stress(StressArgs),
    /// Build the configured lot and print free/total slots per level
    Layout,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(short, long)]
    pub scenario: PathBuf,
    /// Expected transcript digest (hex); the run fails if it differs
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StressArgs {
    #[arg(long)]
    pub threads: Option<u32>,
    #[arg(long)]
    pub vehicles: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ParkhausConfig::load_from_path(path),
        None => ParkhausConfig::load(),
    }
    .context("Failed to load configuration")?;

    EventLogger::init(&config.telemetry.log_level);
    let metrics = Arc::new(MetricsRecorder::new().context("Failed to create metrics registry")?);

    match cli.command {
        Commands::Demo => print_report(&run_demo_mode(&config, Arc::clone(&metrics))?),
        Commands::Replay(args) => {
            let report = run_replay_mode(
                &config,
                &args.scenario,
                args.validate_hash.as_deref(),
                Arc::clone(&metrics),
            )
            .with_context(|| format!("Replay of {} failed", args.scenario.display()))?;
            print_report(&report);
        }
        Commands::Stress(args) => {
            if let Some(threads) = args.threads {
                config.stress.threads = threads.max(1);
            }
            if let Some(vehicles) = args.vehicles {
                config.stress.vehicles = vehicles;
            }
            if let Some(seed) = args.seed {
                config.stress.seed = seed;
            }
            let summary = run_stress_mode(&config, Arc::clone(&metrics)).await?;
            print_summary(&summary);
            anyhow::ensure!(
                summary.is_balanced(),
                "active sessions ({}) do not match parked - unparked",
                summary.still_parked
            );
        }
        Commands::Layout => {
            for line in layout_lines(&config, Arc::clone(&metrics))? {
                println!("{line}");
            }
        }
    }

    if cli.metrics || config.telemetry.print_metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    info!("Done");
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    println!("scenario: {}", report.name);
    for line in &report.transcript {
        println!("  {line}");
    }
    println!(
        "parked={} rejected={} unparked={} revenue={:.2}",
        report.parked, report.rejected, report.unparked, report.revenue
    );
    println!("digest: {}", report.digest);
}

fn print_summary(summary: &StressSummary) {
    println!(
        "parked={} rejected={} unparked={} still_parked={} revenue={:.2}",
        summary.parked, summary.rejected, summary.unparked, summary.still_parked, summary.revenue
    );
}

/// Builds the configured lot and describes every level's free and total
/// slots per vehicle type.
fn layout_lines(
    config: &ParkhausConfig,
    metrics: Arc<MetricsRecorder>,
) -> anyhow::Result<Vec<String>> {
    let runtime = LotRuntime::from_config(config, Arc::new(SystemClock), metrics)?;
    let lot = runtime.lot();
    let mut lines = vec![format!(
        "strategy={} fee_policy={}",
        lot.strategy_name(),
        lot.fee_policy_name()
    )];

    let availability = lot.availability();
    for level in lot.levels() {
        let counts = availability
            .iter()
            .filter(|a| a.level_id == level.id())
            .map(|a| format!("{}={}/{}", a.vehicle_type, a.free, a.capacity))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("  {} (level {}): {counts}", level.name(), level.id()));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_replay_with_global_flags() {
        let cli = Cli::try_parse_from([
            "parkhaus",
            "replay",
            "--scenario",
            "scenarios/demo.yaml",
            "--validate-hash",
            "abc",
            "--metrics",
        ])
        .unwrap();
        assert!(cli.metrics);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.scenario, PathBuf::from("scenarios/demo.yaml"));
                assert_eq!(args.validate_hash.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn stress_overrides_are_optional() {
        let cli = Cli::try_parse_from(["parkhaus", "stress", "--threads", "3"]).unwrap();
        match cli.command {
            Commands::Stress(args) => {
                assert_eq!(args.threads, Some(3));
                assert_eq!(args.vehicles, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn replay_requires_scenario() {
        assert!(Cli::try_parse_from(["parkhaus", "replay"]).is_err());
    }

    #[test]
    fn layout_reports_free_and_total_slots() {
        let metrics = Arc::new(MetricsRecorder::new().unwrap());
        let lines = layout_lines(&ParkhausConfig::default(), metrics).unwrap();
        assert_eq!(lines[0], "strategy=nearest fee_policy=hourly");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  ground (level "));
        assert!(lines[1].ends_with("car=10/10 bike=6/6 truck=2/2"));
        assert!(lines[2].ends_with("car=10/10 bike=4/4 truck=0/0"));
    }
}
