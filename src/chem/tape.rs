//! Fixed-width circular bit tapes.
//!
//! A tape is read "from the left": position 0 is the most significant bit
//! of the `width`-bit value. All positions wrap modulo the width, so any
//! index is valid.

// Bit positions are reduced modulo the width before narrowing
#![allow(clippy::cast_possible_truncation)]

use crate::error::ConfigError;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Width used when none is given.
pub const DEFAULT_WIDTH: u32 = 7;

/// Widest supported tape (one machine word).
pub const MAX_WIDTH: u32 = 64;

/// An immutable circular bit vector.
///
/// Identity is the bit value alone: two tapes with the same value compare
/// equal even if their widths differ.
#[derive(Debug, Clone, Copy)]
pub struct Tape {
    value: u64,
    width: u32,
}

impl Tape {
    /// Create a tape, keeping only the low `width` bits of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWidth`] if `width` is 0 or exceeds
    /// [`MAX_WIDTH`].
    pub fn new(value: u64, width: u32) -> Result<Self, ConfigError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(ConfigError::InvalidWidth {
                width,
                min: 1,
                max: MAX_WIDTH,
            });
        }
        Ok(Self {
            value: value & mask(width),
            width,
        })
    }

    /// Create a tape of [`DEFAULT_WIDTH`] bits.
    #[must_use]
    pub fn from_value(value: u64) -> Self {
        Self {
            value: value & mask(DEFAULT_WIDTH),
            width: DEFAULT_WIDTH,
        }
    }

    /// The tape contents, always below `2^width`.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of bits on the tape.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bit at circular position `i`, counted from the most significant end.
    #[must_use]
    pub fn bit_from_left(&self, i: usize) -> u8 {
        let shift = self.shift_for(i);
        ((self.value >> shift) & 1) as u8
    }

    /// A copy of this tape with position `i` set to `bit`.
    #[must_use]
    pub fn with_bit_from_left(&self, i: usize, bit: u8) -> Self {
        let shift = self.shift_for(i);
        let cleared = self.value & !(1u64 << shift);
        Self {
            value: cleared | (u64::from(bit & 1) << shift),
            width: self.width,
        }
    }

    /// Find the first circular offset at or after `start` where the
    /// `pattern_bits`-bit `pattern` (most significant bit first) occurs.
    ///
    /// Matches may wrap past the end of the tape. Every offset is tried
    /// once. Returns `None` if nothing matches, or if `pattern_bits` is
    /// zero or wider than the tape.
    #[must_use]
    pub fn search(&self, pattern: u64, pattern_bits: u32, start: usize) -> Option<usize> {
        if pattern_bits == 0 || pattern_bits > self.width {
            return None;
        }
        let width = self.width as usize;
        let bits = pattern_bits as usize;
        let start = start % width;

        (start..start + width)
            .map(|i| i % width)
            .find(|&i| {
                (0..bits).all(|j| {
                    let wanted = ((pattern >> (bits - j - 1)) & 1) as u8;
                    self.bit_from_left(i + j) == wanted
                })
            })
    }

    /// Number of hex digits used when displaying this tape.
    #[must_use]
    pub fn hex_digits(&self) -> usize {
        self.width.div_ceil(4) as usize
    }

    fn shift_for(&self, i: usize) -> u32 {
        let pos = (i % self.width as usize) as u32;
        self.width - pos - 1
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::from_value(1)
    }
}

impl PartialEq for Tape {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tape {}

impl Hash for Tape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0digits$x}", self.value, digits = self.hex_digits())
    }
}

/// Low `width` bits set.
fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_to_width() {
        let tape = Tape::new(0xFF, 7).unwrap();
        assert_eq!(tape.value(), 0x7F);
        assert_eq!(Tape::from_value(0x181).value(), 0x01);
        assert_eq!(Tape::new(u64::MAX, 64).unwrap().value(), u64::MAX);
    }

    #[test]
    fn test_rejects_bad_width() {
        assert!(Tape::new(1, 0).is_err());
        assert!(Tape::new(1, 65).is_err());
    }

    #[test]
    fn test_bit_from_left_wraps() {
        // 0b0001001
        let tape = Tape::from_value(9);
        let bits: Vec<u8> = (0..7).map(|i| tape.bit_from_left(i)).collect();
        assert_eq!(bits, vec![0, 0, 0, 1, 0, 0, 1]);
        assert_eq!(tape.bit_from_left(10), tape.bit_from_left(3));
        assert_eq!(tape.bit_from_left(13), 1);
    }

    #[test]
    fn test_with_bit_from_left() {
        let tape = Tape::from_value(0);
        let set = tape.with_bit_from_left(0, 1);
        assert_eq!(set.value(), 0b100_0000);
        let set = set.with_bit_from_left(13, 1);
        assert_eq!(set.value(), 0b100_0001);
        let cleared = set.with_bit_from_left(0, 0);
        assert_eq!(cleared.value(), 1);
        assert_eq!(cleared.width(), 7);
    }

    #[test]
    fn test_search_plain_match() {
        let tape = Tape::from_value(0b000_1001);
        assert_eq!(tape.search(0b1001, 4, 0), Some(3));
    }

    #[test]
    fn test_search_match_spans_wrap_point() {
        // Bits 1000100: 1001 only occurs at offsets 4,5,6,0.
        let tape = Tape::from_value(0b100_0100);
        assert_eq!(tape.search(0b1001, 4, 0), Some(4));

        // Bits 0100011: 1101 only occurs at offsets 5,6,0,1.
        let tape = Tape::from_value(0b010_0011);
        assert_eq!(tape.search(0b1101, 4, 0), Some(5));
    }

    #[test]
    fn test_search_start_index_wraps() {
        // Bits 0001000: 0001 only at offset 0, found again after wrapping.
        let tape = Tape::from_value(0b000_1000);
        assert_eq!(tape.search(0b0001, 4, 1), Some(0));
        assert_eq!(tape.search(0b0001, 4, 8), Some(0));
    }

    #[test]
    fn test_search_huge_start_index() {
        let tape = Tape::from_value(0b000_1000);
        assert_eq!(tape.search(0b0001, 4, usize::MAX - 2), Some(0));
        assert_eq!(tape.search(0b1000, 4, usize::MAX), Some(3));
    }

    #[test]
    fn test_search_not_found() {
        let tape = Tape::from_value(0);
        assert_eq!(tape.search(0b0001, 4, 0), None);
        assert_eq!(tape.search(0, 0, 0), None);
        assert_eq!(tape.search(0, 8, 0), None);
    }

    #[test]
    fn test_equality_ignores_width() {
        let narrow = Tape::new(5, 7).unwrap();
        let wide = Tape::new(5, 16).unwrap();
        assert_eq!(narrow, wide);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Tape::from_value(5).to_string(), "05");
        assert_eq!(Tape::new(0xABC, 12).unwrap().to_string(), "abc");
        assert_eq!(Tape::new(1, 9).unwrap().to_string(), "001");
    }
}
