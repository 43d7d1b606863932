//! Batch execution: run a projector over a plan and tally the results.

/// Progress observers.
pub mod progress;
/// Per-view, per-ring and per-batch tallies.
pub mod report;
/// The batch driver.
pub mod runner;
