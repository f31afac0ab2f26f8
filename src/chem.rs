//! Bit-level chemistry: tapes, machines, and the reactions between them.
//!
//! A tape is both data and genome. Decoding a tape yields a machine, and a
//! machine rewriting a tape yields a new tape, which in turn decodes into a
//! new machine.
//!
//! ```text
//!   Tape ──decode──▶ Machine
//!    ▲                  │
//!    └────rewrite───────┘
//! ```

mod machine;
mod rewrite;
mod tape;

pub use machine::{INITIAL_STATE, Machine, PATTERN_BITS};
pub use rewrite::{locate_span, rewrite, rewrite_exact, rewrite_with};
pub use tape::{DEFAULT_WIDTH, MAX_WIDTH, Tape};
