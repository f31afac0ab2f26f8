//! Running a machine against a tape.
//!
//! A reaction locates the machine's head pattern, then the tail pattern
//! after it, and feeds every bit in between (head inclusive, tail
//! exclusive, wrapping around the tape) through the transducer. Each
//! output bit replaces the bit it was computed from.

use crate::chem::machine::{INITIAL_STATE, Machine, PATTERN_BITS};
use crate::chem::tape::Tape;
use crate::error::{ReactionFailure, ReactionResult};
use rand::Rng;

/// Rewrite `tape` with `machine`, flipping each output bit with
/// probability `noise_rate`.
///
/// One random draw is taken per rewritten bit when `noise_rate` is
/// positive; none otherwise.
///
/// # Errors
///
/// Returns a [`ReactionFailure`] when the landmarks cannot be placed.
pub fn rewrite<R: Rng>(
    machine: &Machine,
    tape: &Tape,
    noise_rate: f64,
    rng: &mut R,
) -> ReactionResult<Tape> {
    rewrite_with(machine, tape, || {
        noise_rate > 0.0 && rng.r#gen::<f64>() < noise_rate
    })
}

/// Rewrite `tape` with `machine` without any transcription noise.
///
/// # Errors
///
/// Returns a [`ReactionFailure`] when the landmarks cannot be placed.
pub fn rewrite_exact(machine: &Machine, tape: &Tape) -> ReactionResult<Tape> {
    rewrite_with(machine, tape, || false)
}

/// Rewrite `tape` with `machine`, asking `flip` once per rewritten bit
/// whether to invert it.
///
/// # Errors
///
/// Returns a [`ReactionFailure`] when the landmarks cannot be placed.
pub fn rewrite_with<F>(machine: &Machine, tape: &Tape, mut flip: F) -> ReactionResult<Tape>
where
    F: FnMut() -> bool,
{
    let (head, end) = locate_span(machine, tape)?;

    let mut state = INITIAL_STATE;
    let mut result = *tape;
    for pos in head..end {
        let (mut output, next) = machine.transition(tape.bit_from_left(pos), state);
        state = next;
        if flip() {
            output ^= 1;
        }
        result = result.with_bit_from_left(pos, output);
    }

    Ok(result)
}

/// Find the half-open span `[head, end)` a reaction rewrites.
///
/// `end` may exceed the tape width when the span wraps; callers rely on
/// circular addressing to fold it back.
///
/// # Errors
///
/// Returns the reason no span exists.
pub fn locate_span(machine: &Machine, tape: &Tape) -> ReactionResult<(usize, usize)> {
    let head = tape
        .search(u64::from(machine.head()), PATTERN_BITS, 0)
        .ok_or(ReactionFailure::NoHead)?;
    let tail = tape
        .search(u64::from(machine.tail()), PATTERN_BITS, head + 1)
        .ok_or(ReactionFailure::NoTail)?;

    if tail == head {
        return Err(ReactionFailure::DegenerateSpan);
    }

    let end = if tail < head {
        tail + tape.width() as usize
    } else {
        tail
    };
    Ok((head, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn machine(encoding: u16) -> Machine {
        Machine::from_encoding(encoding)
    }

    #[test]
    fn test_identity_reaction_on_seed_tape() {
        // 0x1002 on 0000001: head 0000 at 0, tail 0010 at 4, outputs all zero.
        let tape = Tape::from_value(1);
        assert_eq!(locate_span(&machine(0x1002), &tape), Ok((0, 4)));
        let result = rewrite_exact(&machine(0x1002), &tape).unwrap();
        assert_eq!(result.value(), 1);
    }

    #[test]
    fn test_constant_output_fills_span() {
        // Bits 0001000: head 0001 at 0, tail 1000 at 3.
        let tape = Tape::from_value(0b000_1000);
        let result = rewrite_exact(&machine(0xF018), &tape).unwrap();
        assert_eq!(result.value(), 0b111_1000);
        assert_eq!(result.width(), 7);
    }

    #[test]
    fn test_span_wraps_when_tail_precedes_head() {
        // Head 1000 at 3, tail 0001 found at 0 after wrapping: span 3..7.
        let tape = Tape::from_value(0b000_1000);
        assert_eq!(locate_span(&machine(0xF081), &tape), Ok((3, 7)));
        let result = rewrite_exact(&machine(0xF081), &tape).unwrap();
        assert_eq!(result.value(), 0b000_1111);
    }

    #[test]
    fn test_state_drives_output() {
        // Output = state, and state becomes 0 after every read.
        // Only the first rewritten bit sees the initial state 1.
        let tape = Tape::from_value(0b000_1000);
        let result = rewrite_exact(&machine(0x5018), &tape).unwrap();
        assert_eq!(result.value(), 0b100_1000);
    }

    #[test]
    fn test_missing_head() {
        let tape = Tape::from_value(3);
        assert_eq!(
            rewrite_exact(&machine(0x1442), &tape),
            Err(ReactionFailure::NoHead)
        );
    }

    #[test]
    fn test_missing_tail() {
        let tape = Tape::from_value(0b000_1000);
        assert_eq!(
            rewrite_exact(&machine(0x001F), &tape),
            Err(ReactionFailure::NoTail)
        );
    }

    #[test]
    fn test_tail_equal_to_head() {
        // 0001 occurs once, so the tail search wraps back onto the head.
        let tape = Tape::from_value(0b000_1000);
        assert_eq!(
            rewrite_exact(&machine(0x0011), &tape),
            Err(ReactionFailure::DegenerateSpan)
        );
    }

    #[test]
    fn test_zero_noise_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tape = Tape::from_value(0b000_1000);
        let first = rewrite(&machine(0xC018), &tape, 0.0, &mut rng).unwrap();
        for _ in 0..20 {
            let again = rewrite(&machine(0xC018), &tape, 0.0, &mut rng).unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_full_noise_flips_every_output() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tape = Tape::from_value(0b000_1000);
        let result = rewrite(&machine(0xF018), &tape, 1.0, &mut rng).unwrap();
        assert_eq!(result.value(), 0b000_1000);
    }

    #[test]
    fn test_scripted_flips() {
        let tape = Tape::from_value(0b000_1000);
        let mut script = [true, false, true].into_iter();
        let result =
            rewrite_with(&machine(0xF018), &tape, || script.next().unwrap_or(false)).unwrap();
        assert_eq!(result.value(), 0b010_1000);
    }
}
