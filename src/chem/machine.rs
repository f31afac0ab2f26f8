//! Two-state rewriting machines encoded in 16 bits.
//!
//! The encoding packs four nibbles, most significant first:
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┐
//! │ output   │ state    │ head     │ tail     │
//! │ 15..12   │ 11..8    │ 7..4     │ 3..0     │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! The output and state tables are indexed by `(bit << 1) | state`, with
//! key 0 stored in the most significant bit of the nibble.

// Nibbles are masked before narrowing
#![allow(clippy::cast_possible_truncation)]

use crate::chem::tape::Tape;
use std::fmt;

/// Length in bits of the head and tail landmark patterns.
pub const PATTERN_BITS: u32 = 4;

/// State every machine starts a reaction in.
pub const INITIAL_STATE: u8 = 1;

/// Tape positions read for each field when decoding a tape into a machine.
const OUTPUT_POSITIONS: [usize; 4] = [0, 2, 4, 6];
const STATE_POSITIONS: [usize; 4] = [1, 3, 5, 7];
const HEAD_POSITIONS: [usize; 4] = [8, 10, 12, 14];
const TAIL_POSITIONS: [usize; 4] = [9, 11, 13, 15];

/// A finite transducer with two landmark patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Machine {
    output_table: u8,
    state_table: u8,
    head: u8,
    tail: u8,
}

impl Machine {
    /// Unpack a machine from its 16-bit encoding.
    #[must_use]
    pub fn from_encoding(encoding: u16) -> Self {
        let nibble = |shift: u16| ((encoding >> shift) & 0xF) as u8;
        Self {
            output_table: nibble(12),
            state_table: nibble(8),
            head: nibble(4),
            tail: nibble(0),
        }
    }

    /// Decode a machine from interleaved tape positions.
    ///
    /// Positions past the tape width wrap around, so narrow tapes reuse
    /// their own bits for the head and tail fields.
    #[must_use]
    pub fn from_tape(tape: &Tape) -> Self {
        let field = |positions: [usize; 4]| {
            positions
                .iter()
                .fold(0u8, |acc, &pos| (acc << 1) | tape.bit_from_left(pos))
        };
        Self {
            output_table: field(OUTPUT_POSITIONS),
            state_table: field(STATE_POSITIONS),
            head: field(HEAD_POSITIONS),
            tail: field(TAIL_POSITIONS),
        }
    }

    /// Pack this machine back into 16 bits.
    #[must_use]
    pub fn encoding(&self) -> u16 {
        (u16::from(self.output_table) << 12)
            | (u16::from(self.state_table) << 8)
            | (u16::from(self.head) << 4)
            | u16::from(self.tail)
    }

    /// Output table nibble.
    #[must_use]
    pub fn output_table(&self) -> u8 {
        self.output_table
    }

    /// State transition table nibble.
    #[must_use]
    pub fn state_table(&self) -> u8 {
        self.state_table
    }

    /// Pattern marking where a reaction begins.
    #[must_use]
    pub fn head(&self) -> u8 {
        self.head
    }

    /// Pattern marking where a reaction ends.
    #[must_use]
    pub fn tail(&self) -> u8 {
        self.tail
    }

    /// Output bit and next state for reading `bit` in `state`.
    #[must_use]
    pub fn transition(&self, bit: u8, state: u8) -> (u8, u8) {
        let key = ((bit & 1) << 1) | (state & 1);
        let output = (self.output_table >> (3 - key)) & 1;
        let next = (self.state_table >> (3 - key)) & 1;
        (output, next)
    }
}

impl From<u16> for Machine {
    fn from(encoding: u16) -> Self {
        Self::from_encoding(encoding)
    }
}

impl From<&Tape> for Machine {
    fn from(tape: &Tape) -> Self {
        Self::from_tape(tape)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.encoding())
    }
}
