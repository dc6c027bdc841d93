//! Run loop with per-step callbacks and structured logging.
//!
//! [`run_universe`] wraps [`CausalUniverse::grow_step`] the way a driver
//! would: it executes a fixed number of sequential steps, hands every
//! outcome to a [`StepCallback`] (for progress display or live inspection),
//! and logs the run boundaries. There is no early exit; a run is exactly the
//! requested number of steps unless a step fails.

use rand::Rng;
use spacetime_graph::CausalGraph;
use tracing::{info, warn};

use crate::growth::StepOutcome;
use crate::universe::{CausalUniverse, RunSummary, UniverseError};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A growth step failed.
    #[error("step {step} failed: {source}")]
    Step {
        /// 1-based index of the failing step.
        step: u64,
        /// The underlying universe error.
        source: UniverseError,
    },
}

/// Callback invoked after each growth step completes.
///
/// Receives the 1-based step number, the step's outcome, and the graph as it
/// stands after the step.
pub trait StepCallback {
    /// Called after a step completes successfully.
    fn on_step(&mut self, step: u64, outcome: &StepOutcome, graph: &CausalGraph);
}

/// A no-op step callback.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _step: u64, _outcome: &StepOutcome, _graph: &CausalGraph) {}
}

/// Run `steps` growth steps, notifying `callback` after each one.
///
/// # Errors
///
/// Returns [`RunnerError::Step`] for the first step that fails; earlier
/// steps remain applied.
pub fn run_universe<R: Rng>(
    universe: &mut CausalUniverse<R>,
    steps: u64,
    callback: &mut dyn StepCallback,
) -> Result<RunSummary, RunnerError> {
    info!(
        steps,
        base_causes = universe.base_causes(),
        energy_strength = universe.energy_strength(),
        creation_probability = universe.policy().creation_probability,
        massive_probability = universe.policy().massive_probability,
        "Run starting"
    );

    let mut summary = RunSummary::default();
    for step in 1..=steps {
        let outcome = universe
            .grow_step()
            .map_err(|source| RunnerError::Step { step, source })?;
        summary.record(&outcome);
        callback.on_step(step, &outcome, universe.graph());
    }
    summary.event_count = universe.event_count();

    Ok(summary)
}

/// Log the end-of-run totals.
pub fn log_run_end(summary: &RunSummary) {
    if summary.steps == 0 {
        warn!("Run ended with no steps executed");
        return;
    }
    info!(
        steps = summary.steps,
        events_created = summary.events_created,
        massive_events = summary.massive_events,
        edges_added = summary.edges_added,
        event_count = summary.event_count,
        "Run ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use spacetime_types::EventId;

    use super::*;

    /// Records the event count seen after every step.
    #[derive(Default)]
    struct CountRecorder {
        counts: Vec<usize>,
        steps: Vec<u64>,
    }

    impl StepCallback for CountRecorder {
        fn on_step(&mut self, step: u64, _outcome: &StepOutcome, graph: &CausalGraph) {
            self.steps.push(step);
            self.counts.push(graph.event_count());
        }
    }

    #[test]
    fn callback_sees_every_step_in_order() {
        let mut universe = CausalUniverse::new(1, 1.0, SmallRng::seed_from_u64(13)).unwrap();
        let mut recorder = CountRecorder::default();
        let summary = run_universe(&mut universe, 40, &mut recorder).unwrap();

        assert_eq!(summary.steps, 40);
        assert_eq!(recorder.steps, (1..=40).collect::<Vec<u64>>());
        assert!(recorder.counts.is_sorted());
        assert_eq!(recorder.counts.last().copied(), Some(universe.event_count()));
    }

    #[test]
    fn runner_matches_plain_run() {
        let mut via_runner = CausalUniverse::new(2, 1.5, SmallRng::seed_from_u64(77)).unwrap();
        let mut via_run = CausalUniverse::new(2, 1.5, SmallRng::seed_from_u64(77)).unwrap();

        let a = run_universe(&mut via_runner, 80, &mut NoOpCallback).unwrap();
        let b = via_run.run(80).unwrap();

        assert_eq!(a, b);
        assert_eq!(via_runner.graph(), via_run.graph());
    }

    #[test]
    fn zero_step_run_leaves_origin_only() {
        let mut universe = CausalUniverse::new(1, 1.0, SmallRng::seed_from_u64(1)).unwrap();
        let summary = run_universe(&mut universe, 0, &mut NoOpCallback).unwrap();
        log_run_end(&summary);
        assert_eq!(summary.event_count, 1);
        assert_eq!(universe.event_ids().collect::<Vec<_>>(), vec![EventId::ORIGIN]);
    }
}
