//! Progress and report logging for the engine binary.
//!
//! The engine draws nothing. What a plotting front end would show (causal
//! layers, dense vs. sparse cones, the energy source and its reach) is
//! emitted as structured `tracing` events instead.

use std::collections::BTreeSet;

use spacetime_core::analysis::{CausalStructureReport, CurvatureReport, EnergyReport, Report};
use spacetime_core::growth::StepOutcome;
use spacetime_core::runner::StepCallback;
use spacetime_graph::CausalGraph;
use spacetime_types::EventId;
use tracing::{debug, info};

/// Step callback that logs growth progress every `interval` steps.
pub struct ProgressLogger {
    /// Steps between progress lines; 0 disables them.
    interval: u64,
    /// Progress lines emitted so far.
    emitted: u64,
}

impl ProgressLogger {
    /// Log every `interval` steps.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            emitted: 0,
        }
    }

    /// Number of progress lines emitted.
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl StepCallback for ProgressLogger {
    fn on_step(&mut self, step: u64, outcome: &StepOutcome, graph: &CausalGraph) {
        if let Some(created) = outcome.created() {
            if created.massive {
                debug!(step, event = %created.id, energy = created.energy.value(), "massive event");
            }
        }
        if self.interval == 0 || step.checked_rem(self.interval) != Some(0) {
            return;
        }
        self.emitted = self.emitted.saturating_add(1);
        info!(
            step,
            events = graph.event_count(),
            edges = graph.edge_count(),
            "Growth progress"
        );
    }
}

/// Render a set of event ids as a space-separated list, e.g. `e0 e3 e7`.
pub fn format_ids(ids: &BTreeSet<EventId>) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Log a finished report.
pub fn log_report(report: &Report) {
    match report {
        Report::Graph(structure) => log_structure(structure),
        Report::Curvature(curvature) => log_curvature(curvature),
        Report::Energy(energy) => log_energy(energy),
    }
}

fn log_structure(report: &CausalStructureReport) {
    info!(
        origin = %report.origin,
        events = report.event_count,
        edges = report.edge_count,
        max_depth = report.max_depth(),
        unreachable = report.unreachable.len(),
        "Causal structure"
    );
    for (depth, size) in report.layer_sizes() {
        info!(depth, events = size, "Causal layer");
    }
}

fn log_curvature(report: &CurvatureReport) {
    info!(
        cone_depth = report.cone_depth,
        densest = %report.densest,
        densest_density = report.densest_density,
        dense_cone_size = report.dense_cone.len(),
        sparsest = %report.sparsest,
        sparsest_density = report.sparsest_density,
        sparse_cone_size = report.sparse_cone.len(),
        overlap = report.overlap(),
        "Curved causal cones"
    );
    debug!(cone = %format_ids(&report.dense_cone), "Dense cone");
    debug!(cone = %format_ids(&report.sparse_cone), "Sparse cone");
}

fn log_energy(report: &EnergyReport) {
    info!(
        cone_depth = report.cone_depth,
        source = %report.source,
        energy = report.energy.value(),
        cone_size = report.cone.len(),
        "Energy source"
    );
    debug!(cone = %format_ids(&report.cone), "Energy cone");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use spacetime_core::CausalUniverse;
    use spacetime_core::runner::run_universe;

    use super::*;

    #[test]
    fn ids_render_in_order() {
        let ids = BTreeSet::from([EventId::new(7), EventId::new(0), EventId::new(3)]);
        assert_eq!(format_ids(&ids), "e0 e3 e7");
        assert_eq!(format_ids(&BTreeSet::new()), "");
    }

    #[test]
    fn progress_logged_on_interval() {
        let mut universe = CausalUniverse::new(1, 1.0, SmallRng::seed_from_u64(5)).unwrap();
        let mut progress = ProgressLogger::new(10);
        run_universe(&mut universe, 35, &mut progress).unwrap();
        assert_eq!(progress.emitted(), 3);
    }

    #[test]
    fn zero_interval_disables_progress() {
        let mut universe = CausalUniverse::new(1, 1.0, SmallRng::seed_from_u64(5)).unwrap();
        let mut progress = ProgressLogger::new(0);
        run_universe(&mut universe, 20, &mut progress).unwrap();
        assert_eq!(progress.emitted(), 0);
    }
}
