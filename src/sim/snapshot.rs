//! Per-generation records handed to observers.

use crate::error::{ReactionFailure, ReactionResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reaction outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReactionStats {
    /// Machine/tape pairs that were tried.
    pub attempted: usize,
    /// Reactions that produced a tape.
    pub succeeded: usize,
    /// Failures because the head pattern was missing.
    pub no_head: usize,
    /// Failures because the tail pattern was missing.
    pub no_tail: usize,
    /// Failures because tail and head coincided.
    pub degenerate: usize,
}

impl ReactionStats {
    /// Count one reaction outcome.
    pub fn record<T>(&mut self, outcome: &ReactionResult<T>) {
        self.attempted += 1;
        match outcome {
            Ok(_) => self.succeeded += 1,
            Err(ReactionFailure::NoHead) => self.no_head += 1,
            Err(ReactionFailure::NoTail) => self.no_tail += 1,
            Err(ReactionFailure::DegenerateSpan) => self.degenerate += 1,
        }
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: &Self) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.no_head += other.no_head;
        self.no_tail += other.no_tail;
        self.degenerate += other.degenerate;
    }

    /// Number of failed reactions of any kind.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.no_head + self.no_tail + self.degenerate
    }
}

/// Population state at the end of one generation.
///
/// Entities are keyed by their hex labels: four digits for machines, one
/// digit per four tape bits for tapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSnapshot {
    /// Zero-based generation index.
    pub generation: usize,
    /// Machine label to weight.
    pub machines: BTreeMap<String, f64>,
    /// Tape label to weight.
    pub tapes: BTreeMap<String, f64>,
    /// What happened during this generation's reactions.
    pub reactions: ReactionStats,
}

/// Which population ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhausted {
    /// No machines remain.
    Machines,
    /// No tapes remain.
    Tapes,
    /// Neither population has members.
    Both,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every configured generation ran.
    Completed,
    /// A population emptied before the generation limit.
    Exhausted {
        /// Generation that could not start.
        generation: usize,
        /// The empty population(s).
        which: Exhausted,
    },
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Generations that ran to completion.
    pub generations_completed: usize,
    /// Why the run stopped.
    pub termination: Termination,
    /// Reaction counts across all generations.
    pub reactions: ReactionStats,
    /// Distinct machines alive at the end.
    pub final_machines: usize,
    /// Distinct tapes alive at the end.
    pub final_tapes: usize,
    /// Wall-clock duration in seconds.
    pub elapsed_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut stats = ReactionStats::default();
        stats.record(&Ok::<(), _>(()));
        stats.record::<()>(&Err(ReactionFailure::NoHead));
        stats.record::<()>(&Err(ReactionFailure::DegenerateSpan));

        assert_eq!(stats.attempted, 3);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed(), 2);

        let mut total = ReactionStats::default();
        total.merge(&stats);
        total.merge(&stats);
        assert_eq!(total.attempted, 6);
        assert_eq!(total.no_head, 2);
        assert_eq!(total.degenerate, 2);
    }

    #[test]
    fn test_termination_serializes() {
        let t = Termination::Exhausted {
            generation: 3,
            which: Exhausted::Tapes,
        };
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"exhausted":{"generation":3,"which":"tapes"}}"#);
        assert_eq!(
            serde_json::to_string(&Termination::Completed).unwrap(),
            r#""completed""#
        );
    }
}
