pub mod engine;
pub mod runtime;

// Re-export the mode functions so frontends can simply do:
pub use runtime::{run_demo_mode, run_replay_mode, run_stress_mode};
