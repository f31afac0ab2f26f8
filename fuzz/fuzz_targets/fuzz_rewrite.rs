#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tapesoup::chem::{Machine, Tape, locate_span, rewrite, rewrite_exact};

/// Structured input for reaction fuzzing.
#[derive(Arbitrary, Debug)]
struct ReactionInput {
    /// Machine encoding.
    machine: u16,
    /// Raw tape value (masked by the width).
    tape: u64,
    /// Tape width selector.
    width: u8,
    /// Noise rate selector, scaled into [0, 1].
    noise: u8,
    /// RNG seed for noise.
    seed: u64,
}

fuzz_target!(|input: ReactionInput| {
    let width = u32::from(input.width % 64) + 1;
    let Ok(tape) = Tape::new(input.tape, width) else {
        return;
    };
    let machine = Machine::from_encoding(input.machine);
    let noise = f64::from(input.noise) / 255.0;
    let mut rng = SmallRng::seed_from_u64(input.seed);

    let exact = rewrite_exact(&machine, &tape);
    let noisy = rewrite(&machine, &tape, noise, &mut rng);

    // Noise never changes whether a reaction happens.
    assert_eq!(exact.is_ok(), noisy.is_ok());

    if let Ok(product) = noisy {
        assert_eq!(product.width(), width);
        if width < 64 {
            assert!(product.value() < (1u64 << width));
        }
        let (head, end) = locate_span(&machine, &tape).expect("span exists for a reaction");
        assert!(head < end);
        assert!(end - head < width as usize);

        // Decoding always yields a valid machine.
        let child = Machine::from_tape(&product);
        assert_eq!(Machine::from_encoding(child.encoding()), child);
    }
});
