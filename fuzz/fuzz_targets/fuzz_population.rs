#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tapesoup::Tape;
use tapesoup::sim::Population;

/// One population operation.
#[derive(Arbitrary, Debug)]
enum Op {
    /// Add weight to a tape.
    Add { value: u8, amount: u16 },
    /// Decay every weight by `rate / 255`.
    Decay { rate: u8 },
    /// Remove tapes below unit weight.
    Prune,
    /// Draw a sample.
    Sample { k: u8 },
}

/// Structured input for population fuzzing.
#[derive(Arbitrary, Debug)]
struct PopulationInput {
    /// RNG seed for sampling.
    seed: u64,
    /// Operations to apply in order.
    ops: Vec<Op>,
}

fuzz_target!(|input: PopulationInput| {
    let mut pop: Population<Tape> = Population::new();
    let mut rng = SmallRng::seed_from_u64(input.seed);

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Add { value, amount } => {
                pop.add(Tape::from_value(u64::from(value)), f64::from(amount));
            }
            Op::Decay { rate } => pop.decay(f64::from(rate) / 255.0),
            Op::Prune => {
                pop.prune(1.0);
                assert!(pop.entries().all(|(_, w)| w >= 1.0));
            }
            Op::Sample { k } => {
                let picks = pop.sample(usize::from(k), &mut rng);
                assert!(picks.len() <= usize::from(k));
                if pop.total_weight() >= 1.0 {
                    assert_eq!(picks.len(), usize::from(k));
                }
                assert!(picks.iter().all(|t| pop.weight(t).is_some()));
            }
        }
        assert!(pop.entries().all(|(_, w)| w >= 0.0));
    }
});
