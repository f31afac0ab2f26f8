//! Population dynamics for the tape chemistry.
//!
//! Two weighted populations, machines and tapes, interact through
//! reactions. Every generation runs the same cycle:
//!
//! ```text
//! ┌────────┐   ┌───────┐   ┌───────┐   ┌───────┐   ┌───────┐
//! │ sample │──▶│ react │──▶│ decay │──▶│ renew │──▶│ prune │
//! └────────┘   └───────┘   └───────┘   └───────┘   └───────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tapesoup::sim::{simulate, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     generations: 10,
//!     ..Default::default()
//! };
//! let summary = simulate(&config, |snapshot| {
//!     assert!(snapshot.tapes.values().all(|&w| w >= 1.0));
//! })?;
//! assert!(summary.generations_completed <= 10);
//! # Ok::<(), tapesoup::ConfigError>(())
//! ```

mod config;
mod evolution;
mod population;
mod snapshot;

pub use config::{MachineSeed, MachineSource, SimulationConfig, TapeSeed};
pub use evolution::{Evolution, OFFSPRING_WEIGHT, PRUNE_THRESHOLD, StepOutcome, simulate};
pub use population::{Entity, Population};
pub use snapshot::{Exhausted, GenerationSnapshot, ReactionStats, RunSummary, Termination};
