//! The causal graph: events as nodes, cause -> effect links as directed edges.
//!
//! Events live in an arena indexed by their dense [`EventId`]. Each record
//! holds the event's fixed [`Energy`] and its ordered list of successors
//! (effects). Because ids are assigned in creation order and edges may only
//! point from an older event to a newer one, the graph is acyclic by
//! construction and needs no reference counting or back-pointers.

use spacetime_types::{Energy, EventId};
use tracing::trace;

use crate::error::GraphError;
use crate::traversal::CausalStructure;

/// Per-event storage inside the arena.
#[derive(Debug, Clone, PartialEq)]
struct EventRecord {
    /// Energy fixed at creation.
    energy: Energy,
    /// Effects of this event, in the order they were wired.
    successors: Vec<EventId>,
}

/// Append-only causal graph over densely numbered events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CausalGraph {
    /// Event arena; the position of a record is its id.
    events: Vec<EventRecord>,
    /// Total number of recorded edges.
    edge_count: usize,
}

impl CausalGraph {
    /// Create an empty graph with no events.
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            edge_count: 0,
        }
    }

    /// Create a graph holding only the origin event with the given energy.
    pub fn with_origin(energy: Energy) -> Self {
        Self {
            events: vec![EventRecord {
                energy,
                successors: Vec::new(),
            }],
            edge_count: 0,
        }
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Append a new event and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CapacityExhausted`] if the id space is full.
    pub fn add_event(&mut self, energy: Energy) -> Result<EventId, GraphError> {
        let id = match self.latest() {
            Some(last) => last.next().ok_or(GraphError::CapacityExhausted)?,
            None => EventId::ORIGIN,
        };
        self.events.push(EventRecord {
            energy,
            successors: Vec::new(),
        });
        trace!(event = %id, energy = energy.value(), "event created");
        Ok(id)
    }

    /// Record `effect` as a successor of `cause`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownEvent`] if either endpoint does not
    /// exist, or [`GraphError::BackwardEdge`] unless `cause < effect`.
    pub fn add_edge(&mut self, cause: EventId, effect: EventId) -> Result<(), GraphError> {
        if !self.contains(effect) {
            return Err(GraphError::UnknownEvent(effect));
        }
        if cause >= effect {
            return Err(GraphError::BackwardEdge { cause, effect });
        }
        let record = self
            .record_mut(cause)
            .ok_or(GraphError::UnknownEvent(cause))?;
        record.successors.push(effect);
        self.edge_count = self
            .edge_count
            .checked_add(1)
            .ok_or(GraphError::ArithmeticOverflow)?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Whether the event exists in this graph.
    pub fn contains(&self, id: EventId) -> bool {
        self.record(id).is_some()
    }

    /// Total number of events created so far.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Total number of causal edges recorded so far.
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All event ids in creation order.
    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        (0..self.events.len()).filter_map(EventId::from_index)
    }

    /// The most recently created event.
    pub fn latest(&self) -> Option<EventId> {
        self.events
            .len()
            .checked_sub(1)
            .and_then(EventId::from_index)
    }

    /// Energy of an event, if it exists.
    pub fn energy(&self, id: EventId) -> Option<Energy> {
        self.record(id).map(|record| record.energy)
    }

    /// Iterate `(id, energy)` pairs in creation order.
    pub fn energies(&self) -> impl Iterator<Item = (EventId, Energy)> + '_ {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(index, record)| EventId::from_index(index).map(|id| (id, record.energy)))
    }

    /// Successors (direct effects) of an event.
    ///
    /// An event that has caused nothing, or that does not exist, yields an
    /// empty slice.
    pub fn successors(&self, id: EventId) -> &[EventId] {
        match self.record(id) {
            Some(record) => &record.successors,
            None => &[],
        }
    }

    /// Local density: the number of direct effects an event has so far.
    ///
    /// Unknown events have density 0.
    pub fn local_density(&self, id: EventId) -> usize {
        self.successors(id).len()
    }

    /// Iterate every recorded edge as `(cause, effect)`.
    pub fn edges(&self) -> impl Iterator<Item = (EventId, EventId)> + '_ {
        self.event_ids()
            .flat_map(move |cause| self.successors(cause).iter().map(move |&effect| (cause, effect)))
    }

    fn record(&self, id: EventId) -> Option<&EventRecord> {
        id.as_index().and_then(|index| self.events.get(index))
    }

    fn record_mut(&mut self, id: EventId) -> Option<&mut EventRecord> {
        id.as_index().and_then(|index| self.events.get_mut(index))
    }
}

impl CausalStructure for CausalGraph {
    fn contains(&self, id: EventId) -> bool {
        Self::contains(self, id)
    }

    fn successors(&self, id: EventId) -> &[EventId] {
        Self::successors(self, id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn energy(value: f64) -> Energy {
        Energy::new(value).unwrap()
    }

    /// Origin plus three events: 0 -> 1, 0 -> 2, 1 -> 3.
    fn make_small_graph() -> CausalGraph {
        let mut graph = CausalGraph::with_origin(Energy::BASE);
        let e1 = graph.add_event(Energy::BASE).unwrap();
        let e2 = graph.add_event(energy(5.0)).unwrap();
        let e3 = graph.add_event(Energy::BASE).unwrap();
        graph.add_edge(EventId::ORIGIN, e1).unwrap();
        graph.add_edge(EventId::ORIGIN, e2).unwrap();
        graph.add_edge(e1, e3).unwrap();
        graph
    }

    #[test]
    fn origin_graph_has_one_event_and_no_edges() {
        let graph = CausalGraph::with_origin(Energy::BASE);
        assert_eq!(graph.event_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.latest(), Some(EventId::ORIGIN));
        assert_eq!(graph.local_density(EventId::ORIGIN), 0);
    }

    #[test]
    fn first_event_of_empty_graph_is_origin() {
        let mut graph = CausalGraph::new();
        assert_eq!(graph.latest(), None);
        assert_eq!(graph.add_event(Energy::BASE).unwrap(), EventId::ORIGIN);
        assert_eq!(graph.add_event(Energy::BASE).unwrap(), EventId::new(1));
        assert_eq!(graph.latest(), Some(EventId::new(1)));
    }

    #[test]
    fn ids_are_dense_and_sequential() {
        let graph = make_small_graph();
        let ids: Vec<u64> = graph.event_ids().map(EventId::into_inner).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(graph.latest(), Some(EventId::new(3)));
    }

    #[test]
    fn successors_keep_insertion_order() {
        let graph = make_small_graph();
        assert_eq!(
            graph.successors(EventId::ORIGIN),
            &[EventId::new(1), EventId::new(2)]
        );
        assert_eq!(graph.local_density(EventId::ORIGIN), 2);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn unknown_event_has_no_successors() {
        let graph = make_small_graph();
        assert!(graph.successors(EventId::new(99)).is_empty());
        assert_eq!(graph.local_density(EventId::new(99)), 0);
        assert_eq!(graph.energy(EventId::new(99)), None);
    }

    #[test]
    fn energy_is_stored_per_event() {
        let graph = make_small_graph();
        assert_eq!(graph.energy(EventId::new(2)), Some(energy(5.0)));
        let massive: Vec<EventId> = graph
            .energies()
            .filter(|(_, e)| e.value() > 1.0)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(massive, vec![EventId::new(2)]);
    }

    #[test]
    fn backward_and_self_edges_rejected() {
        let mut graph = make_small_graph();
        let back = graph.add_edge(EventId::new(3), EventId::new(1));
        assert!(matches!(back, Err(GraphError::BackwardEdge { .. })));
        let self_loop = graph.add_edge(EventId::new(2), EventId::new(2));
        assert!(matches!(self_loop, Err(GraphError::BackwardEdge { .. })));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn edge_to_missing_event_rejected() {
        let mut graph = make_small_graph();
        let result = graph.add_edge(EventId::ORIGIN, EventId::new(10));
        assert_eq!(result, Err(GraphError::UnknownEvent(EventId::new(10))));
    }

    #[test]
    fn edges_iterate_forward_only() {
        let graph = make_small_graph();
        let edges: Vec<(EventId, EventId)> = graph.edges().collect();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|(cause, effect)| cause < effect));
    }
}
