//! Generational loop over the machine and tape populations.
//!
//! Each generation samples machine/tape pairs, reacts them, decays both
//! populations, adds the offspring, and prunes anything below unit weight.
//! Decay applies only to entities that existed before the generation's
//! offspring are added.

use crate::chem::{Machine, Tape, rewrite};
use crate::error::ConfigError;
use crate::sim::config::{SimulationConfig, check_weight};
use crate::sim::population::Population;
use crate::sim::snapshot::{Exhausted, GenerationSnapshot, ReactionStats, RunSummary, Termination};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

/// Weight below which entities die at the end of a generation.
pub const PRUNE_THRESHOLD: f64 = 1.0;

/// Weight each offspring contributes.
pub const OFFSPRING_WEIGHT: f64 = 1.0;

/// Result of advancing one generation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A generation ran; here is its final state.
    Advanced(GenerationSnapshot),
    /// The run is over; no generation ran.
    Halted(Termination),
}

/// A running simulation.
///
/// Owns both populations and the random source. Nothing is shared between
/// instances, so separate simulations are independent and, for a fixed
/// seed, reproducible.
#[derive(Debug, Clone)]
pub struct Evolution<R: Rng> {
    config: SimulationConfig,
    machines: Population<Machine>,
    tapes: Population<Tape>,
    generation: usize,
    totals: ReactionStats,
    rng: R,
}

impl Evolution<SmallRng> {
    /// Start a simulation seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Evolution<R> {
    /// Start a simulation drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let machines = config.machine_population()?;
        let tapes = config.tape_population()?;
        Ok(Self::assemble(config, machines, tapes, rng))
    }

    /// Start a simulation from explicit populations, ignoring the seeds in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, if any weight is
    /// not positive and finite, or if a tape's width differs from
    /// `config.tape_width`.
    pub fn with_populations(
        config: SimulationConfig,
        machines: Population<Machine>,
        tapes: Population<Tape>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let check = SimulationConfig {
            initial_machines: Vec::new(),
            initial_tapes: Vec::new(),
            ..config.clone()
        };
        check.validate()?;

        for (machine, weight) in machines.entries() {
            check_weight(machine, weight)?;
        }
        for (tape, weight) in tapes.entries() {
            check_weight(tape, weight)?;
            if tape.width() != config.tape_width {
                return Err(ConfigError::WidthMismatch {
                    entity: tape.to_string(),
                    width: tape.width(),
                    expected: config.tape_width,
                });
            }
        }

        Ok(Self::assemble(config, machines, tapes, rng))
    }

    fn assemble(
        config: SimulationConfig,
        machines: Population<Machine>,
        tapes: Population<Tape>,
        rng: R,
    ) -> Self {
        Self {
            config,
            machines,
            tapes,
            generation: 0,
            totals: ReactionStats::default(),
            rng,
        }
    }

    /// Index of the next generation to run.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current machine population.
    #[must_use]
    pub fn machines(&self) -> &Population<Machine> {
        &self.machines
    }

    /// Current tape population.
    #[must_use]
    pub fn tapes(&self) -> &Population<Tape> {
        &self.tapes
    }

    /// Parameters this simulation was started with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Reaction counts across every generation so far.
    #[must_use]
    pub fn totals(&self) -> ReactionStats {
        self.totals
    }

    /// Why the simulation cannot advance, or `None` if it can.
    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        if self.generation >= self.config.generations {
            return Some(Termination::Completed);
        }
        let which = match (self.machines.is_empty(), self.tapes.is_empty()) {
            (false, false) => return None,
            (true, false) => Exhausted::Machines,
            (false, true) => Exhausted::Tapes,
            (true, true) => Exhausted::Both,
        };
        Some(Termination::Exhausted {
            generation: self.generation,
            which,
        })
    }

    /// Run one generation.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(termination) = self.termination() {
            return StepOutcome::Halted(termination);
        }

        let count = self.config.reactions_per_generation;
        let machine_sample = self.machines.sample(count, &mut self.rng);
        let tape_sample = self.tapes.sample(count, &mut self.rng);

        let mut stats = ReactionStats::default();
        let mut offspring = Vec::with_capacity(count);
        for (machine, tape) in machine_sample.iter().zip(&tape_sample) {
            let outcome = rewrite(machine, tape, self.config.noise_rate, &mut self.rng);
            stats.record(&outcome);
            match outcome {
                Ok(product) => offspring.push(product),
                Err(reason) => trace!(machine = %machine, tape = %tape, %reason, "no reaction"),
            }
        }

        self.machines.decay(self.config.machine_death_rate);
        self.tapes.decay(self.config.tape_death_rate);

        for tape in offspring {
            self.machines.add(Machine::from_tape(&tape), OFFSPRING_WEIGHT);
            self.tapes.add(tape, OFFSPRING_WEIGHT);
        }

        let machines_died = self.machines.prune(PRUNE_THRESHOLD);
        let tapes_died = self.tapes.prune(PRUNE_THRESHOLD);

        debug!(
            generation = self.generation,
            succeeded = stats.succeeded,
            failed = stats.failed(),
            machines = self.machines.len(),
            tapes = self.tapes.len(),
            machines_died,
            tapes_died,
            "generation complete"
        );

        let snapshot = GenerationSnapshot {
            generation: self.generation,
            machines: self.machines.labelled(),
            tapes: self.tapes.labelled(),
            reactions: stats,
        };
        self.totals.merge(&stats);
        self.generation += 1;

        StepOutcome::Advanced(snapshot)
    }

    /// Run until the generation limit or until a population empties,
    /// passing each generation's snapshot to `on_generation`.
    pub fn run<F>(&mut self, mut on_generation: F) -> RunSummary
    where
        F: FnMut(&GenerationSnapshot),
    {
        let start = std::time::Instant::now();
        info!(
            generations = self.config.generations,
            reactions = self.config.reactions_per_generation,
            machines = self.machines.len(),
            tapes = self.tapes.len(),
            "starting simulation"
        );

        let termination = loop {
            match self.step() {
                StepOutcome::Advanced(snapshot) => on_generation(&snapshot),
                StepOutcome::Halted(termination) => break termination,
            }
        };

        match termination {
            Termination::Completed => info!(generations = self.generation, "simulation complete"),
            Termination::Exhausted { generation, which } => {
                info!(generation, ?which, "population exhausted");
            }
        }

        RunSummary {
            generations_completed: self.generation,
            termination,
            reactions: self.totals,
            final_machines: self.machines.len(),
            final_tapes: self.tapes.len(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        }
    }
}

/// Validate `config`, run it to completion with a seeded RNG, and report
/// every generation to `on_generation`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn simulate<F>(config: &SimulationConfig, on_generation: F) -> Result<RunSummary, ConfigError>
where
    F: FnMut(&GenerationSnapshot),
{
    let mut evolution = Evolution::new(config.clone())?;
    Ok(evolution.run(on_generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::{MachineSeed, MachineSource, TapeSeed};

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            generations: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_runs_to_generation_limit() {
        let mut evolution = Evolution::new(small_config()).unwrap();
        let mut seen = Vec::new();
        let summary = evolution.run(|s| seen.push(s.generation));

        assert!(summary.generations_completed <= 20);
        assert_eq!(seen.len(), summary.generations_completed);
        assert!(seen.iter().enumerate().all(|(i, &g)| i == g));
        if summary.termination == Termination::Completed {
            assert_eq!(summary.generations_completed, 20);
        }
    }

    #[test]
    fn test_step_after_completion_halts() {
        let config = SimulationConfig {
            generations: 1,
            ..Default::default()
        };
        let mut evolution = Evolution::new(config).unwrap();
        assert!(matches!(evolution.step(), StepOutcome::Advanced(_)));
        assert_eq!(
            evolution.step(),
            StepOutcome::Halted(Termination::Completed)
        );
        assert_eq!(evolution.generation(), 1);
    }

    #[test]
    fn test_empty_population_halts_immediately() {
        let config = SimulationConfig {
            initial_tapes: Vec::new(),
            ..Default::default()
        };
        let mut evolution = Evolution::new(config).unwrap();
        let summary = evolution.run(|_| panic!("no generation should run"));

        assert_eq!(summary.generations_completed, 0);
        assert_eq!(
            summary.termination,
            Termination::Exhausted {
                generation: 0,
                which: Exhausted::Tapes
            }
        );
    }

    #[test]
    fn test_barren_chemistry_dies_out() {
        // 0x001F needs a tail of 1111, which never appears on tape 1.
        // Nothing reacts, so both populations only decay.
        let config = SimulationConfig {
            machine_death_rate: 0.5,
            tape_death_rate: 0.5,
            generations: 50,
            initial_machines: vec![MachineSeed {
                source: MachineSource::Encoding(0x001F),
                weight: 8.0,
            }],
            initial_tapes: vec![TapeSeed {
                value: 1,
                weight: 8.0,
            }],
            ..Default::default()
        };
        let mut evolution = Evolution::new(config).unwrap();
        let summary = evolution.run(|_| {});

        // 8 -> 4 -> 2 -> 1 -> 0.5 (pruned after the fourth generation)
        assert_eq!(summary.generations_completed, 4);
        assert_eq!(
            summary.termination,
            Termination::Exhausted {
                generation: 4,
                which: Exhausted::Both
            }
        );
        assert_eq!(summary.reactions.succeeded, 0);
        assert_eq!(summary.reactions.attempted, summary.reactions.failed());
    }

    #[test]
    fn test_offspring_added_after_decay() {
        // 0x1002 leaves tape 1 unchanged and decodes back to itself, so
        // every generation adds exactly `reactions` offspring to both.
        let config = SimulationConfig {
            noise_rate: 0.0,
            machine_death_rate: 0.5,
            tape_death_rate: 0.5,
            reactions_per_generation: 4,
            generations: 1,
            initial_machines: vec![MachineSeed {
                source: MachineSource::Encoding(0x1002),
                weight: 10.0,
            }],
            initial_tapes: vec![TapeSeed {
                value: 1,
                weight: 10.0,
            }],
            ..Default::default()
        };
        let mut evolution = Evolution::new(config).unwrap();
        let StepOutcome::Advanced(snapshot) = evolution.step() else {
            panic!("generation should run");
        };

        assert_eq!(snapshot.reactions.succeeded, 4);
        assert!((snapshot.machines["1002"] - 9.0).abs() < 1e-12);
        assert!((snapshot.tapes["01"] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        simulate(&small_config(), |s| a.push(s.clone())).unwrap();
        simulate(&small_config(), |s| b.push(s.clone())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            machine_death_rate: 2.0,
            ..Default::default()
        };
        assert!(Evolution::new(config).is_err());
    }

    #[test]
    fn test_with_populations() {
        let machines: Population<Machine> =
            [(Machine::from_encoding(0x1002), 5.0)].into_iter().collect();
        let tapes: Population<Tape> = [(Tape::from_value(1), 5.0)].into_iter().collect();
        let evolution = Evolution::with_populations(
            small_config(),
            machines,
            tapes,
            SmallRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(evolution.machines().len(), 1);
        assert_eq!(evolution.tapes().len(), 1);
        assert!(evolution.termination().is_none());
    }

    #[test]
    fn test_with_populations_rejects_bad_weights() {
        for weight in [f64::NAN, -5.0, 0.0, f64::INFINITY] {
            let machines: Population<Machine> =
                [(Machine::from_encoding(0x1002), weight)].into_iter().collect();
            let tapes: Population<Tape> = [(Tape::from_value(1), 5.0)].into_iter().collect();
            let result = Evolution::with_populations(
                small_config(),
                machines,
                tapes,
                SmallRng::seed_from_u64(3),
            );
            assert!(
                matches!(result, Err(ConfigError::InvalidSeedWeight { .. })),
                "weight {weight} accepted"
            );
        }
    }

    #[test]
    fn test_with_populations_rejects_mixed_widths() {
        let machines: Population<Machine> =
            [(Machine::from_encoding(0x1002), 5.0)].into_iter().collect();
        let tapes: Population<Tape> = [(Tape::new(1, 16).unwrap(), 5.0)].into_iter().collect();
        let result = Evolution::with_populations(
            small_config(),
            machines,
            tapes,
            SmallRng::seed_from_u64(3),
        );
        assert!(matches!(
            result,
            Err(ConfigError::WidthMismatch {
                width: 16,
                expected: 7,
                ..
            })
        ));
    }
}
