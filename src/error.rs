//! Error types for the tape chemistry.

use std::fmt;

/// Why a machine failed to react with a tape.
///
/// Failure is an ordinary outcome of a reaction, not a fault: the pair
/// simply produces no offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionFailure {
    /// The machine's head pattern does not occur anywhere on the tape.
    NoHead,
    /// The tail pattern does not occur on the tape.
    NoTail,
    /// The only tail match is the head match itself, leaving an empty span.
    DegenerateSpan,
}

impl fmt::Display for ReactionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionFailure::NoHead => write!(f, "head pattern not found on tape"),
            ReactionFailure::NoTail => write!(f, "tail pattern not found on tape"),
            ReactionFailure::DegenerateSpan => write!(f, "tail match coincides with head match"),
        }
    }
}

impl std::error::Error for ReactionFailure {}

/// Result type for a single reaction.
pub type ReactionResult<T> = Result<T, ReactionFailure>;

/// Rejected simulation or tape parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probability-like rate was outside `[0, 1]` or not finite.
    RateOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The value supplied.
        value: f64,
    },
    /// Tape width outside the supported range.
    InvalidWidth {
        /// The width supplied.
        width: u32,
        /// Smallest accepted width.
        min: u32,
        /// Largest accepted width.
        max: u32,
    },
    /// A count that must be positive was zero.
    ZeroCount(&'static str),
    /// An initial population weight was not a positive finite number.
    InvalidSeedWeight {
        /// Display label of the seeded entity.
        entity: String,
        /// The weight supplied.
        weight: f64,
    },
    /// A tape's width differs from the configured tape width.
    WidthMismatch {
        /// Display label of the tape.
        entity: String,
        /// The tape's width.
        width: u32,
        /// The configured width.
        expected: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RateOutOfRange { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            ConfigError::InvalidWidth { width, min, max } => {
                write!(f, "tape width must be within {min}..={max}, got {width}")
            }
            ConfigError::ZeroCount(name) => write!(f, "{name} must be positive"),
            ConfigError::InvalidSeedWeight { entity, weight } => {
                write!(f, "initial weight of {entity} must be positive and finite, got {weight}")
            }
            ConfigError::WidthMismatch {
                entity,
                width,
                expected,
            } => {
                write!(f, "tape {entity} is {width} bits wide, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to load a configuration file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a valid configuration document.
    Parse(serde_json::Error),
    /// The document parsed but describes an invalid simulation.
    Invalid(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {e}"),
            LoadError::Parse(e) => write!(f, "parse error: {e}"),
            LoadError::Invalid(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        Self::Invalid(e)
    }
}
