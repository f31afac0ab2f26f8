//! Tapesoup CLI - run and inspect tape chemistry simulations.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Tapesoup - an artificial chemistry of bit-string machines and tapes
#[derive(Parser, Debug)]
#[command(name = "tapesoup")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation and print every generation
    Run {
        /// Parameter overrides
        #[command(flatten)]
        options: cli::run::RunOptions,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// React one machine with one tape
    React {
        /// Machine encoding in hex (e.g. f018)
        #[arg(value_parser = cli::parse_hex_u16)]
        machine: u16,

        /// Tape value in hex (e.g. 08)
        #[arg(value_parser = cli::parse_hex_u64)]
        tape: u64,

        /// Tape width in bits
        #[arg(short, long, default_value = "7")]
        width: u32,

        /// Probability of flipping each rewritten bit
        #[arg(short, long, default_value = "0")]
        noise: f64,

        /// Random seed for noise (default: random)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show the machine a tape decodes into
    Decode {
        /// Tape value in hex
        #[arg(value_parser = cli::parse_hex_u64)]
        tape: u64,

        /// Tape width in bits
        #[arg(short, long, default_value = "7")]
        width: u32,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            options,
            format,
            progress,
        } => cli::run::execute(&options, format, progress),

        Commands::React {
            machine,
            tape,
            width,
            noise,
            seed,
        } => cli::react::execute(machine, tape, width, noise, seed),

        Commands::Decode { tape, width } => cli::react::decode(tape, width),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
