// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tapesoup: an artificial chemistry of bit-string machines and tapes.
//!
//! Tapes are short circular bit strings. Any tape can be decoded into a
//! machine: a two-state transducer with a head and a tail landmark pattern.
//! Machines rewrite the stretch of a tape between their landmarks, and the
//! rewritten tape decodes into a new machine. Weighted populations of both
//! evolve under sampling, decay, renewal, and pruning.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Evolution (generation loop)     │
//! ├─────────────────────────────────────┤
//! │   Population<Machine> │ Population<Tape>
//! ├─────────────────────────────────────┤
//! │   Tape │ Machine │ rewrite          │
//! └─────────────────────────────────────┘
//! ```

pub mod chem;
pub mod error;
pub mod sim;

pub use chem::{Machine, Tape};
pub use error::{ConfigError, LoadError, ReactionFailure, ReactionResult};
pub use sim::{Evolution, Population, SimulationConfig};
