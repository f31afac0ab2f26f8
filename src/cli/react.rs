//! Single-reaction and decode commands.

use super::CliError;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tapesoup::chem::{Machine, Tape, locate_span, rewrite};

/// Execute the react command.
///
/// # Errors
///
/// Returns an error if the width or noise rate is invalid.
pub(crate) fn execute(
    machine: u16,
    tape: u64,
    width: u32,
    noise: f64,
    seed: Option<u64>,
) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&noise) {
        return Err(CliError::new(format!("noise must be within [0, 1], got {noise}")));
    }
    let machine = Machine::from_encoding(machine);
    let tape = Tape::new(tape, width)?;
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    println!("Machine {machine}: head {:04b}, tail {:04b}", machine.head(), machine.tail());
    println!("Tape    {tape} ({})", bit_string(&tape));

    match rewrite(&machine, &tape, noise, &mut rng) {
        Ok(product) => {
            if let Ok((head, end)) = locate_span(&machine, &tape) {
                println!("Span    {head}..{end} (mod {width})");
            }
            println!("Result  {product} ({})", bit_string(&product));
            println!("Decodes to machine {}", Machine::from_tape(&product));
        }
        Err(reason) => println!("No reaction: {reason}"),
    }

    Ok(())
}

/// Execute the decode command.
///
/// # Errors
///
/// Returns an error if the width is invalid.
pub(crate) fn decode(tape: u64, width: u32) -> Result<(), CliError> {
    let tape = Tape::new(tape, width)?;
    let machine = Machine::from_tape(&tape);

    println!("Tape {tape} ({}) decodes to machine {machine}", bit_string(&tape));
    println!("  output table {:04b}", machine.output_table());
    println!("  state table  {:04b}", machine.state_table());
    println!("  head         {:04b}", machine.head());
    println!("  tail         {:04b}", machine.tail());

    Ok(())
}

/// Tape bits from the left, as `0`/`1` characters.
fn bit_string(tape: &Tape) -> String {
    (0..tape.width() as usize)
        .map(|i| if tape.bit_from_left(i) == 1 { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string() {
        assert_eq!(bit_string(&Tape::from_value(9)), "0001001");
    }

    #[test]
    fn test_rejects_bad_noise() {
        assert!(execute(0x1002, 1, 7, 1.5, Some(1)).is_err());
    }
}
