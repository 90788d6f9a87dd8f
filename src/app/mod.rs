pub mod runner;

pub use runner::{execute, run_batch, RunOptions, RunOutcome};
