/*!
# Runtime Modes

Entry points shared by every frontend: the built-in demo, scenario replay
and the concurrent stress run. Each mode builds its own lot from the
given configuration and reports through the caller's `MetricsRecorder`.
*/

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, Instrument};

use parkhaus_config::ParkhausConfig;
use parkhaus_core::time::ManualClock;
use parkhaus_telemetry::MetricsRecorder;

use crate::engine::{run_stress, EngineError, LotRuntime, Scenario, ScenarioReport, StressSummary};

/// Runs the built-in demo scenario.
#[instrument(level = "info", name = "run_demo_mode", skip_all)]
pub fn run_demo_mode(
    config: &ParkhausConfig,
    metrics: Arc<MetricsRecorder>,
) -> Result<ScenarioReport, EngineError> {
    Scenario::demo().run(config, metrics)
}

/// Replays a YAML scenario file.
///
/// * `expected_digest`, when given, must match the transcript digest or the
///   run fails with [`EngineError::DigestMismatch`].
#[instrument(level = "info", name = "run_replay_mode", skip(config, metrics))]
pub fn run_replay_mode<P: AsRef<Path> + std::fmt::Debug>(
    config: &ParkhausConfig,
    scenario_path: P,
    expected_digest: Option<&str>,
    metrics: Arc<MetricsRecorder>,
) -> Result<ScenarioReport, EngineError> {
    let scenario = Scenario::load(&scenario_path)?;
    info!(name = %scenario.name, steps = scenario.steps.len(), "Replaying scenario");
    let report = scenario.run(config, metrics)?;
    if let Some(expected) = expected_digest {
        report.validate_digest(expected)?;
        info!("Scenario digest verified");
    }
    Ok(report)
}

/// Runs the stress test described by `config.stress` on a manual clock.
#[instrument(level = "info", name = "run_stress_mode", skip_all)]
pub async fn run_stress_mode(
    config: &ParkhausConfig,
    metrics: Arc<MetricsRecorder>,
) -> Result<StressSummary, EngineError> {
    let clock = ManualClock::at_epoch();
    let runtime = Arc::new(LotRuntime::from_config(
        config,
        Arc::new(clock.clone()),
        metrics,
    )?);

    let stress = &config.stress;
    info!(
        threads = stress.threads,
        vehicles = stress.vehicles,
        seed = stress.seed,
        "Starting stress run"
    );
    run_stress(runtime, clock, stress.threads, stress.vehicles, stress.seed)
        .instrument(tracing::info_span!("stress_workers"))
        .await
}
