//! Run command implementation.

use super::output::{CSV_HEADER, JsonRun, format_csv, format_summary, format_text};
use super::{CliError, OutputFormat};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tapesoup::sim::{Evolution, GenerationSnapshot, SimulationConfig};

/// Simulation parameters that can be set from the command line.
#[derive(Args, Debug, Clone)]
pub(crate) struct RunOptions {
    /// JSON configuration file (default: built-in configuration)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Reactions per generation
    #[arg(short, long)]
    reactions: Option<usize>,

    /// Probability of flipping each rewritten bit
    #[arg(long)]
    noise: Option<f64>,

    /// Fraction of machine weight lost per generation
    #[arg(long)]
    machine_death: Option<f64>,

    /// Fraction of tape weight lost per generation
    #[arg(long)]
    tape_death: Option<f64>,
}

impl RunOptions {
    /// Resolve the configuration: file (or default), then flag overrides.
    fn resolve(&self) -> Result<SimulationConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path).map_err(|e| {
                CliError::new(format!("Failed to load {}: {e}", path.display()))
            })?,
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(reactions) = self.reactions {
            config.reactions_per_generation = reactions;
        }
        if let Some(noise) = self.noise {
            config.noise_rate = noise;
        }
        if let Some(rate) = self.machine_death {
            config.machine_death_rate = rate;
        }
        if let Some(rate) = self.tape_death {
            config.tape_death_rate = rate;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
pub(crate) fn execute(
    options: &RunOptions,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = options.resolve()?;
    let mut evolution = Evolution::new(config.clone())?;

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(config.generations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    if format == OutputFormat::Csv {
        println!("{CSV_HEADER}");
    }

    let mut history: Vec<GenerationSnapshot> = Vec::new();
    let summary = evolution.run(|snapshot| {
        let emit = || match format {
            OutputFormat::Text => print!("{}", format_text(snapshot)),
            OutputFormat::Csv => print!("{}", format_csv(snapshot)),
            OutputFormat::Json => {}
        };
        match &pb {
            Some(pb) => {
                pb.suspend(emit);
                pb.inc(1);
            }
            None => emit(),
        }
        if format == OutputFormat::Json {
            history.push(snapshot.clone());
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_summary(&summary));
        }
        OutputFormat::Json => {
            let document = JsonRun {
                config: &config,
                generations: &history,
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Csv => {}
    }

    Ok(())
}
