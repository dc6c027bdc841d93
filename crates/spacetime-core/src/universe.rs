//! The causal universe engine: initialization, growth, and queries.
//!
//! A [`CausalUniverse`] owns the [`CausalGraph`] (event registry, energy map,
//! adjacency), its configuration, and an injected random source. Each call to
//! [`CausalUniverse::grow_step`] advances the universe by one tick:
//!
//! 1. With `creation_probability`, an event happens; otherwise nothing changes.
//! 2. Its energy is 1.0, or, with `massive_probability`, a uniformly chosen
//!    multiplier times the energy strength.
//! 3. Every older event gets the weight `(1 + density) * energy`.
//! 4. `min(base_causes + floor(mean weight), older count)` causes are drawn
//!    with replacement, proportionally to weight, and deduplicated.
//! 5. The event is appended and each distinct cause gains it as a successor.
//!
//! All random draws for a step happen before the graph is touched, so a
//! failing step leaves the universe unchanged.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use spacetime_graph::selection::{cause_count, choose_causes, distinct_causes, selection_weight};
use spacetime_graph::{CausalGraph, GraphError, traversal};
use spacetime_types::{Energy, EnergyError, EventId};
use tracing::debug;

use crate::config::UniverseConfig;
use crate::growth::{CreatedEvent, GrowthPolicy, StepOutcome};

/// Errors that can occur while building or growing a universe.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// Construction parameters are out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// A graph operation failed.
    #[error("graph error: {source}")]
    Graph {
        /// The underlying graph error.
        #[from]
        source: GraphError,
    },

    /// An energy value could not be formed.
    #[error("energy error: {source}")]
    Energy {
        /// The underlying energy error.
        #[from]
        source: EnergyError,
    },
}

/// Totals accumulated over a sequence of growth steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed.
    pub steps: u64,
    /// Steps that created an event.
    pub events_created: u64,
    /// Created events that took the massive branch.
    pub massive_events: u64,
    /// Causal edges added.
    pub edges_added: u64,
    /// Events in the universe after the last step.
    pub event_count: usize,
}

impl RunSummary {
    /// Fold one step's outcome into the totals.
    pub fn record(&mut self, outcome: &StepOutcome) {
        self.steps = self.steps.saturating_add(1);
        if let Some(created) = outcome.created() {
            self.events_created = self.events_created.saturating_add(1);
            if created.massive {
                self.massive_events = self.massive_events.saturating_add(1);
            }
            let edges = u64::try_from(created.causes.len()).unwrap_or(u64::MAX);
            self.edges_added = self.edges_added.saturating_add(edges);
        }
    }
}

/// A growing causal universe driven by the random source `R`.
#[derive(Debug, Clone)]
pub struct CausalUniverse<R> {
    /// Events, energies, and causal edges.
    graph: CausalGraph,
    /// Minimum number of causes drawn per new event.
    base_causes: u32,
    /// Scale applied to massive-event multipliers.
    energy_strength: f64,
    /// Creation and massiveness probabilities.
    policy: GrowthPolicy,
    /// Injected random source.
    rng: R,
}

impl<R: Rng> CausalUniverse<R> {
    /// Create a universe holding only the origin event (energy 1.0), using the
    /// default [`GrowthPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidConfiguration`] if `base_causes` is 0
    /// or `energy_strength` is not a finite positive number.
    pub fn new(base_causes: u32, energy_strength: f64, rng: R) -> Result<Self, UniverseError> {
        Self::with_policy(base_causes, energy_strength, GrowthPolicy::default(), rng)
    }

    /// Create a universe with an explicit growth policy.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidConfiguration`] if any parameter or
    /// the policy is out of range.
    pub fn with_policy(
        base_causes: u32,
        energy_strength: f64,
        policy: GrowthPolicy,
        rng: R,
    ) -> Result<Self, UniverseError> {
        if base_causes < 1 {
            return Err(UniverseError::InvalidConfiguration {
                reason: "base_causes must be at least 1".to_owned(),
            });
        }
        if !energy_strength.is_finite() || energy_strength <= 0.0 {
            return Err(UniverseError::InvalidConfiguration {
                reason: format!("energy_strength must be finite and positive, got {energy_strength}"),
            });
        }
        policy
            .validate()
            .map_err(|reason| UniverseError::InvalidConfiguration { reason })?;

        debug!(base_causes, energy_strength, "universe initialized");

        Ok(Self {
            graph: CausalGraph::with_origin(Energy::BASE),
            base_causes,
            energy_strength,
            policy,
            rng,
        })
    }

    /// Create a universe from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::InvalidConfiguration`] if the configuration
    /// is out of range.
    pub fn from_config(config: &UniverseConfig, rng: R) -> Result<Self, UniverseError> {
        Self::with_policy(
            config.universe.base_causes,
            config.universe.energy_strength,
            config.growth.clone(),
            rng,
        )
    }

    // -------------------------------------------------------------------
    // Growth
    // -------------------------------------------------------------------

    /// Advance the universe by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError`] if the event cannot be created or wired.
    /// The universe is unchanged when a draw fails.
    pub fn grow_step(&mut self) -> Result<StepOutcome, UniverseError> {
        if !self.rng.random_bool(self.policy.creation_probability) {
            return Ok(StepOutcome::Quiet);
        }

        let (energy, massive) = self.roll_energy()?;

        // Every existing event is older than the one about to be created.
        let (older, weights): (Vec<EventId>, Vec<f64>) = self
            .graph
            .energies()
            .map(|(id, energy)| (id, selection_weight(self.graph.local_density(id), energy)))
            .unzip();

        let causes = if older.is_empty() {
            BTreeSet::new()
        } else {
            let draws = cause_count(self.base_causes, &weights);
            distinct_causes(&choose_causes(&mut self.rng, &older, &weights, draws)?)
        };

        let id = self.graph.add_event(energy)?;
        for &cause in &causes {
            self.graph.add_edge(cause, id)?;
        }

        debug!(
            event = %id,
            energy = energy.value(),
            massive,
            causes = causes.len(),
            "event created"
        );

        Ok(StepOutcome::Created(CreatedEvent {
            id,
            energy,
            massive,
            causes: causes.into_iter().collect(),
        }))
    }

    /// Invoke [`grow_step`](Self::grow_step) exactly `steps` times.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first step error.
    pub fn run(&mut self, steps: u64) -> Result<RunSummary, UniverseError> {
        let mut summary = RunSummary::default();
        for _ in 0..steps {
            let outcome = self.grow_step()?;
            summary.record(&outcome);
        }
        summary.event_count = self.graph.event_count();
        Ok(summary)
    }

    /// Decide the new event's energy and whether it is massive.
    fn roll_energy(&mut self) -> Result<(Energy, bool), UniverseError> {
        if !self.rng.random_bool(self.policy.massive_probability) {
            return Ok((Energy::BASE, false));
        }
        let multiplier = self
            .policy
            .massive_multipliers
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| UniverseError::InvalidConfiguration {
                reason: "massive_multipliers must not be empty".to_owned(),
            })?;
        let energy = Energy::new(multiplier * self.energy_strength)?;
        Ok((energy, true))
    }
}

impl<R> CausalUniverse<R> {
    // -------------------------------------------------------------------
    // Read-only accessors
    // -------------------------------------------------------------------

    /// The underlying causal graph.
    pub const fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    /// All event ids in creation order.
    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.graph.event_ids()
    }

    /// Number of events created so far, origin included.
    pub fn event_count(&self) -> usize {
        self.graph.event_count()
    }

    /// Energy of an event, if it exists.
    pub fn energy(&self, id: EventId) -> Option<Energy> {
        self.graph.energy(id)
    }

    /// Direct effects of an event; empty for unknown events.
    pub fn successors(&self, id: EventId) -> &[EventId] {
        self.graph.successors(id)
    }

    /// Number of direct effects of an event; 0 for unknown events.
    pub fn local_density(&self, id: EventId) -> usize {
        self.graph.local_density(id)
    }

    /// Minimum forward hop count from `start` to `end`, or `None` if `end`
    /// is not causally reachable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEvent`] if either event was never created.
    pub fn causal_distance(&self, start: EventId, end: EventId) -> Result<Option<u32>, GraphError> {
        traversal::causal_distance(&self.graph, start, end)
    }

    /// Events reachable from `origin` within `depth` hops, origin included.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEvent`] if `origin` was never created.
    pub fn light_cone(&self, origin: EventId, depth: u32) -> Result<BTreeSet<EventId>, GraphError> {
        traversal::light_cone(&self.graph, origin, depth)
    }

    /// Minimum causes drawn per new event.
    pub const fn base_causes(&self) -> u32 {
        self.base_causes
    }

    /// Scale applied to massive-event multipliers.
    pub const fn energy_strength(&self) -> f64 {
        self.energy_strength
    }

    /// The active growth policy.
    pub const fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }
}
