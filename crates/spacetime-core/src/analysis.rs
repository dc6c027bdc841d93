//! Derived geometry reports over a grown causal graph.
//!
//! Three views, each a pure function of the graph:
//!
//! - **Causal structure**: hop depth of every event below the origin, the
//!   emergent "time" coordinate.
//! - **Curvature**: the densest and the sparsest event with their light
//!   cones. Dense regions reach further in the same number of hops, which is
//!   the curvature-like asymmetry the model is after.
//! - **Energy**: the most massive event and its light cone.
//!
//! Ties are broken towards the oldest event (lowest id).

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use spacetime_graph::{CausalGraph, GraphError, distances_from, light_cone};
use spacetime_types::{Energy, EventId};

/// Which report to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Causal depth of every event from the origin.
    #[default]
    Graph,
    /// Densest vs. sparsest event light cones.
    Curvature,
    /// Most massive event and its light cone.
    Energy,
}

/// Causal depth of every event measured from one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CausalStructureReport {
    /// The event depths are measured from.
    pub origin: EventId,
    /// Hop depth of each reachable event.
    pub depths: BTreeMap<EventId, u32>,
    /// Events not causally reachable from the origin.
    pub unreachable: Vec<EventId>,
    /// Total events in the graph.
    pub event_count: usize,
    /// Total causal edges in the graph.
    pub edge_count: usize,
}

impl CausalStructureReport {
    /// Greatest depth reached (0 for a lone origin).
    pub fn max_depth(&self) -> u32 {
        self.depths.values().copied().max().unwrap_or(0)
    }

    /// Number of events at each depth, shallowest first.
    pub fn layer_sizes(&self) -> BTreeMap<u32, usize> {
        let mut layers = BTreeMap::new();
        for &depth in self.depths.values() {
            let count: &mut usize = layers.entry(depth).or_default();
            *count = count.saturating_add(1);
        }
        layers
    }
}

/// Light cones of the densest and sparsest events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurvatureReport {
    /// Hop bound used for both cones.
    pub cone_depth: u32,
    /// Event with the most direct effects.
    pub densest: EventId,
    /// Its local density.
    pub densest_density: usize,
    /// Light cone of the densest event.
    pub dense_cone: BTreeSet<EventId>,
    /// Event with the fewest direct effects.
    pub sparsest: EventId,
    /// Its local density.
    pub sparsest_density: usize,
    /// Light cone of the sparsest event.
    pub sparse_cone: BTreeSet<EventId>,
}

impl CurvatureReport {
    /// Events lying in both cones.
    pub fn overlap(&self) -> usize {
        self.dense_cone.intersection(&self.sparse_cone).count()
    }
}

/// Light cone of the most massive event.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    /// Hop bound used for the cone.
    pub cone_depth: u32,
    /// Event with the highest energy.
    pub source: EventId,
    /// Its energy.
    pub energy: Energy,
    /// Its light cone.
    pub cone: BTreeSet<EventId>,
}

/// Any one of the three reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// See [`CausalStructureReport`].
    Graph(CausalStructureReport),
    /// See [`CurvatureReport`].
    Curvature(CurvatureReport),
    /// See [`EnergyReport`].
    Energy(EnergyReport),
}

/// Produce the report selected by `mode`.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] if the graph has no events.
pub fn analyze(graph: &CausalGraph, mode: AnalysisMode, cone_depth: u32) -> Result<Report, GraphError> {
    match mode {
        AnalysisMode::Graph => causal_structure(graph, EventId::ORIGIN).map(Report::Graph),
        AnalysisMode::Curvature => curvature(graph, cone_depth).map(Report::Curvature),
        AnalysisMode::Energy => energy_source(graph, cone_depth).map(Report::Energy),
    }
}

/// Causal depth of every event below `origin`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownEvent`] if `origin` does not exist.
pub fn causal_structure(graph: &CausalGraph, origin: EventId) -> Result<CausalStructureReport, GraphError> {
    let depths = distances_from(graph, origin)?;
    let unreachable = graph
        .event_ids()
        .filter(|id| !depths.contains_key(id))
        .collect();
    Ok(CausalStructureReport {
        origin,
        depths,
        unreachable,
        event_count: graph.event_count(),
        edge_count: graph.edge_count(),
    })
}

/// Compare the light cones of the densest and the sparsest event.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] if the graph has no events.
pub fn curvature(graph: &CausalGraph, cone_depth: u32) -> Result<CurvatureReport, GraphError> {
    let mut ids = graph.event_ids();
    let first = ids.next().ok_or(GraphError::EmptyGraph)?;
    let first_density = graph.local_density(first);

    let (mut densest, mut densest_density) = (first, first_density);
    let (mut sparsest, mut sparsest_density) = (first, first_density);
    for id in ids {
        let density = graph.local_density(id);
        if density > densest_density {
            densest = id;
            densest_density = density;
        }
        if density < sparsest_density {
            sparsest = id;
            sparsest_density = density;
        }
    }

    Ok(CurvatureReport {
        cone_depth,
        densest,
        densest_density,
        dense_cone: light_cone(graph, densest, cone_depth)?,
        sparsest,
        sparsest_density,
        sparse_cone: light_cone(graph, sparsest, cone_depth)?,
    })
}

/// Locate the most massive event and its light cone.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] if the graph has no events.
pub fn energy_source(graph: &CausalGraph, cone_depth: u32) -> Result<EnergyReport, GraphError> {
    let (source, energy) = graph
        .energies()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .ok_or(GraphError::EmptyGraph)?;

    Ok(EnergyReport {
        cone_depth,
        source,
        energy,
        cone: light_cone(graph, source, cone_depth)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EventId {
        EventId::new(raw)
    }

    /// 0 -> {1, 2, 3}, 1 -> 4, 2 -> 4, 4 -> 5; event 3 has energy 10,
    /// event 5 has energy 10 too (tie goes to 3).
    fn make_graph() -> CausalGraph {
        let mut graph = CausalGraph::with_origin(Energy::BASE);
        let ten = Energy::new(10.0).unwrap();
        for energy in [Energy::BASE, Energy::BASE, ten, Energy::BASE, ten] {
            graph.add_event(energy).unwrap();
        }
        for (from, to) in [(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (4, 5)] {
            graph.add_edge(id(from), id(to)).unwrap();
        }
        graph
    }

    #[test]
    fn structure_reports_depth_layers() {
        let graph = make_graph();
        let report = causal_structure(&graph, EventId::ORIGIN).unwrap();
        assert_eq!(report.max_depth(), 3);
        assert!(report.unreachable.is_empty());
        assert_eq!(
            report.layer_sizes(),
            BTreeMap::from([(0, 1), (1, 3), (2, 1), (3, 1)])
        );
        assert_eq!(report.edge_count, 6);
    }

    #[test]
    fn structure_from_inner_event_lists_unreachable() {
        let graph = make_graph();
        let report = causal_structure(&graph, id(2)).unwrap();
        assert_eq!(report.unreachable, vec![id(0), id(1), id(3)]);
    }

    #[test]
    fn curvature_picks_extremes_with_oldest_tie_break() {
        let graph = make_graph();
        let report = curvature(&graph, 6).unwrap();
        assert_eq!(report.densest, EventId::ORIGIN);
        assert_eq!(report.densest_density, 3);
        // Events 3 and 5 both have no effects; 3 is older.
        assert_eq!(report.sparsest, id(3));
        assert_eq!(report.sparsest_density, 0);
        assert_eq!(report.dense_cone.len(), 6);
        assert_eq!(report.sparse_cone, BTreeSet::from([id(3)]));
        assert_eq!(report.overlap(), 1);
    }

    #[test]
    fn curvature_cone_respects_depth() {
        let graph = make_graph();
        let report = curvature(&graph, 1).unwrap();
        assert_eq!(report.dense_cone, BTreeSet::from([id(0), id(1), id(2), id(3)]));
    }

    #[test]
    fn energy_source_prefers_oldest_of_equals() {
        let graph = make_graph();
        let report = energy_source(&graph, 6).unwrap();
        assert_eq!(report.source, id(3));
        assert_eq!(report.energy.value(), 10.0);
        assert_eq!(report.cone, BTreeSet::from([id(3)]));
    }

    #[test]
    fn empty_graph_is_an_error() {
        let graph = CausalGraph::new();
        assert_eq!(curvature(&graph, 6), Err(GraphError::EmptyGraph));
        assert_eq!(energy_source(&graph, 6), Err(GraphError::EmptyGraph));
    }

    #[test]
    fn analyze_dispatches_on_mode() {
        let graph = make_graph();
        assert!(matches!(
            analyze(&graph, AnalysisMode::Graph, 6).unwrap(),
            Report::Graph(_)
        ));
        assert!(matches!(
            analyze(&graph, AnalysisMode::Curvature, 6).unwrap(),
            Report::Curvature(_)
        ));
        assert!(matches!(
            analyze(&graph, AnalysisMode::Energy, 6).unwrap(),
            Report::Energy(_)
        ));
    }
}
