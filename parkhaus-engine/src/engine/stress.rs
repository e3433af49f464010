//! ## parkhaus-engine::engine::stress
//! **Concurrent randomized load against one shared lot**
//!
//! Each worker runs on the blocking pool with its own seeded RNG, parks
//! random vehicles and checks out roughly every other one after advancing
//! the shared manual clock. Whatever is still parked at the end must match
//! `parked - unparked` exactly.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

use parkhaus_core::prelude::*;

use super::{EngineError, LotRuntime};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StressSummary {
    pub parked: u64,
    pub rejected: u64,
    pub unparked: u64,
    pub revenue: f64,
    pub still_parked: usize,
}

impl StressSummary {
    fn merge(&mut self, other: StressSummary) {
        self.parked += other.parked;
        self.rejected += other.rejected;
        self.unparked += other.unparked;
        self.revenue += other.revenue;
    }

    /// Sessions opened minus sessions closed equals what is still parked.
    pub fn is_balanced(&self) -> bool {
        self.parked.saturating_sub(self.unparked) == self.still_parked as u64
    }
}

/// Spreads `vehicles` park attempts over `threads` workers.
///
/// `clock` must be the manual clock the runtime was built with; workers
/// advance it before checking vehicles out.
#[instrument(level = "info", name = "stress_run", skip(runtime, clock))]
pub async fn run_stress(
    runtime: Arc<LotRuntime>,
    clock: ManualClock,
    threads: u32,
    vehicles: usize,
    seed: u64,
) -> Result<StressSummary, EngineError> {
    let threads = threads.max(1) as usize;
    let per_worker = vehicles.div_ceil(threads);

    let mut handles = Vec::with_capacity(threads);
    for worker in 0..threads {
        let runtime = Arc::clone(&runtime);
        let clock = clock.clone();
        let quota = per_worker.min(vehicles.saturating_sub(worker * per_worker));
        let worker_seed = seed.wrapping_add(worker as u64);
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(&runtime, &clock, worker, quota, worker_seed)
        }));
    }

    let mut summary = StressSummary::default();
    for handle in handles {
        summary.merge(handle.await??);
    }
    summary.still_parked = runtime.lot().active_count();

    if summary.is_balanced() {
        info!(
            parked = summary.parked,
            rejected = summary.rejected,
            unparked = summary.unparked,
            revenue = summary.revenue,
            "Stress run finished"
        );
    } else {
        warn!(?summary, "Active sessions do not match park/unpark counts");
    }
    Ok(summary)
}

fn run_worker(
    runtime: &LotRuntime,
    clock: &ManualClock,
    worker: usize,
    quota: usize,
    seed: u64,
) -> Result<StressSummary, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = StressSummary::default();

    for n in 0..quota {
        let vehicle_type = VehicleType::ALL[rng.random_range(0..VehicleType::ALL.len())];
        let plate = format!("W{worker}-{n}");
        let ticket = match runtime.park(vehicle_type, &plate) {
            Ok(ticket) => ticket,
            Err(ParkingError::NoAvailability { .. }) => {
                summary.rejected += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        summary.parked += 1;

        if rng.random_bool(0.5) {
            clock.advance_minutes(rng.random_range(1..=240));
            let receipt = runtime.unpark(&ticket)?;
            summary.unparked += 1;
            summary.revenue += receipt.fee;
        }
    }
    Ok(summary)
}
