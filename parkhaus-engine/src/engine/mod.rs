mod error;
mod runtime;
mod scenario;
mod stress;

pub use self::{
    error::EngineError,
    runtime::LotRuntime,
    scenario::{Scenario, ScenarioReport, Step},
    stress::{run_stress, StressSummary},
};

pub mod prelude {
    pub use super::{EngineError, LotRuntime, Scenario, ScenarioReport, Step, StressSummary};
}
