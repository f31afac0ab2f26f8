//! Simulation parameters and initial populations.

use crate::chem::{MAX_WIDTH, Machine, PATTERN_BITS, Tape};
use crate::error::{ConfigError, LoadError};
use crate::sim::population::{Entity, Population};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a seeded machine comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineSource {
    /// A literal 16-bit encoding.
    Encoding(u16),
    /// The machine decoded from a tape with this value.
    Tape(u64),
}

/// An initial machine and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineSeed {
    /// How to build the machine.
    pub source: MachineSource,
    /// Initial abundance.
    pub weight: f64,
}

/// An initial tape and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapeSeed {
    /// Tape value, masked to the configured width.
    pub value: u64,
    /// Initial abundance.
    pub weight: f64,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Probability of flipping each rewritten bit.
    pub noise_rate: f64,
    /// Fraction of machine weight lost each generation.
    pub machine_death_rate: f64,
    /// Fraction of tape weight lost each generation.
    pub tape_death_rate: f64,
    /// Machine/tape pairs sampled for reaction each generation.
    pub reactions_per_generation: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Bit width of every tape in the run.
    pub tape_width: u32,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Starting machines.
    pub initial_machines: Vec<MachineSeed>,
    /// Starting tapes.
    pub initial_tapes: Vec<TapeSeed>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            noise_rate: 0.01,
            machine_death_rate: 0.1,
            tape_death_rate: 0.1,
            reactions_per_generation: 10,
            generations: 100,
            tape_width: 7,
            seed: 42,
            initial_machines: vec![
                MachineSeed {
                    source: MachineSource::Tape(1),
                    weight: 50.0,
                },
                MachineSeed {
                    source: MachineSource::Tape(9),
                    weight: 50.0,
                },
            ],
            initial_tapes: vec![
                TapeSeed {
                    value: 1,
                    weight: 40.0,
                },
                TapeSeed {
                    value: 3,
                    weight: 50.0,
                },
                TapeSeed {
                    value: 5,
                    weight: 20.0,
                },
            ],
        }
    }
}

impl SimulationConfig {
    /// Read a JSON configuration file. Missing fields take default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an invalid simulation.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("noise_rate", self.noise_rate)?;
        check_rate("machine_death_rate", self.machine_death_rate)?;
        check_rate("tape_death_rate", self.tape_death_rate)?;

        if self.reactions_per_generation == 0 {
            return Err(ConfigError::ZeroCount("reactions_per_generation"));
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroCount("generations"));
        }
        if !(PATTERN_BITS..=MAX_WIDTH).contains(&self.tape_width) {
            return Err(ConfigError::InvalidWidth {
                width: self.tape_width,
                min: PATTERN_BITS,
                max: MAX_WIDTH,
            });
        }

        for seed in &self.initial_machines {
            let machine = self.seed_machine(seed.source)?;
            check_weight(&machine, seed.weight)?;
        }
        for seed in &self.initial_tapes {
            let tape = Tape::new(seed.value, self.tape_width)?;
            check_weight(&tape, seed.weight)?;
        }

        Ok(())
    }

    /// Build the starting machine population.
    ///
    /// # Errors
    ///
    /// Returns an error if the tape width is invalid.
    pub fn machine_population(&self) -> Result<Population<Machine>, ConfigError> {
        let mut population = Population::new();
        for seed in &self.initial_machines {
            population.add(self.seed_machine(seed.source)?, seed.weight);
        }
        Ok(population)
    }

    /// Build the starting tape population.
    ///
    /// # Errors
    ///
    /// Returns an error if the tape width is invalid.
    pub fn tape_population(&self) -> Result<Population<Tape>, ConfigError> {
        let mut population = Population::new();
        for seed in &self.initial_tapes {
            population.add(Tape::new(seed.value, self.tape_width)?, seed.weight);
        }
        Ok(population)
    }

    fn seed_machine(&self, source: MachineSource) -> Result<Machine, ConfigError> {
        Ok(match source {
            MachineSource::Encoding(encoding) => Machine::from_encoding(encoding),
            MachineSource::Tape(value) => Machine::from_tape(&Tape::new(value, self.tape_width)?),
        })
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange { name, value })
    }
}

pub(super) fn check_weight<E: Entity>(entity: &E, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSeedWeight {
            entity: entity.label(),
            weight,
        })
    }
}
