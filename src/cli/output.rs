//! Output formatting utilities for CLI.

use serde::Serialize;
use tapesoup::sim::{GenerationSnapshot, RunSummary, SimulationConfig, Termination};

/// JSON document for a whole run.
#[derive(Debug, Serialize)]
pub(super) struct JsonRun<'a> {
    /// Parameters the run used.
    pub(super) config: &'a SimulationConfig,
    /// Every generation in order.
    pub(super) generations: &'a [GenerationSnapshot],
    /// How the run ended.
    pub(super) summary: &'a RunSummary,
}

/// Format one generation as human-readable text.
pub(super) fn format_text(snapshot: &GenerationSnapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!("---- Generation {} ----\n", snapshot.generation));
    for (label, weight) in &snapshot.machines {
        output.push_str(&format!("M{label} population={weight:.3}\n"));
    }
    for (label, weight) in &snapshot.tapes {
        output.push_str(&format!("T{label} population={weight:.3}\n"));
    }
    let r = &snapshot.reactions;
    output.push_str(&format!(
        "  reactions: {}/{} ok (no head {}, no tail {}, degenerate {})\n",
        r.succeeded, r.attempted, r.no_head, r.no_tail, r.degenerate
    ));

    output
}

/// Header row for the CSV time series.
pub(super) const CSV_HEADER: &str = "generation,kind,entity,weight";

/// Format one generation as CSV rows (no header).
pub(super) fn format_csv(snapshot: &GenerationSnapshot) -> String {
    let mut output = String::new();

    for (label, weight) in &snapshot.machines {
        output.push_str(&format!("{},machine,{label},{weight}\n", snapshot.generation));
    }
    for (label, weight) in &snapshot.tapes {
        output.push_str(&format!("{},tape,{label},{weight}\n", snapshot.generation));
    }

    output
}

/// Format the end-of-run summary.
pub(super) fn format_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str("Simulation Summary\n");
    output.push_str("========================================\n");
    match summary.termination {
        Termination::Completed => output.push_str(&format!(
            "  Ended: all {} generations ran\n",
            summary.generations_completed
        )),
        Termination::Exhausted { generation, which } => output.push_str(&format!(
            "  Ended: {which:?} exhausted before generation {generation}\n"
        )),
    }
    let r = &summary.reactions;
    output.push_str(&format!(
        "  Reactions: {} attempted, {} succeeded, {} failed\n",
        r.attempted,
        r.succeeded,
        r.failed()
    ));
    output.push_str(&format!(
        "  Survivors: {} machines, {} tapes\n",
        summary.final_machines, summary.final_tapes
    ));
    output.push_str(&format!("  Elapsed: {:.3}s\n", summary.elapsed_seconds));

    output
}
