//! Breadth-first queries over causal structure.
//!
//! Every routine here follows edges forward only (cause -> effect) and keeps
//! a visited set, so it terminates and returns minimal hop counts on any
//! finite graph, including graphs with cycles. The routines are generic over
//! [`CausalStructure`] and do not rely on the forward-only growth policy of
//! [`CausalGraph`](crate::CausalGraph).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use spacetime_types::EventId;

use crate::error::GraphError;

/// Read-only view of a directed graph of events.
pub trait CausalStructure {
    /// Whether the event exists.
    fn contains(&self, id: EventId) -> bool;

    /// Direct successors of an event; empty for unknown events.
    fn successors(&self, id: EventId) -> &[EventId];
}

/// Minimum number of forward hops from `start` to `end`.
///
/// Returns `Ok(Some(0))` when `start == end` and `Ok(None)` when `end` is not
/// causally reachable from `start`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownEvent`] if either endpoint does not exist.
pub fn causal_distance<S>(graph: &S, start: EventId, end: EventId) -> Result<Option<u32>, GraphError>
where
    S: CausalStructure + ?Sized,
{
    ensure_known(graph, start)?;
    ensure_known(graph, end)?;

    if start == end {
        return Ok(Some(0));
    }

    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back((start, 0_u32));

    while let Some((node, dist)) = queue.pop_front() {
        let next_dist = dist.checked_add(1).ok_or(GraphError::ArithmeticOverflow)?;
        for &next in graph.successors(node) {
            if next == end {
                return Ok(Some(next_dist));
            }
            if visited.insert(next) {
                queue.push_back((next, next_dist));
            }
        }
    }

    Ok(None)
}

/// Events reachable from `origin` within `depth` forward hops.
///
/// The origin itself is always included (distance 0), so a depth of 0
/// yields exactly `{origin}`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownEvent`] if `origin` does not exist.
pub fn light_cone<S>(graph: &S, origin: EventId, depth: u32) -> Result<BTreeSet<EventId>, GraphError>
where
    S: CausalStructure + ?Sized,
{
    ensure_known(graph, origin)?;

    let mut cone = BTreeSet::new();
    let mut queue = VecDeque::new();
    cone.insert(origin);
    queue.push_back((origin, 0_u32));

    while let Some((node, dist)) = queue.pop_front() {
        if dist >= depth {
            continue;
        }
        let next_dist = dist.checked_add(1).ok_or(GraphError::ArithmeticOverflow)?;
        for &next in graph.successors(node) {
            if cone.insert(next) {
                queue.push_back((next, next_dist));
            }
        }
    }

    Ok(cone)
}

/// Hop distance from `origin` to every event reachable from it.
///
/// Unreachable events are absent from the map. This is one BFS instead of a
/// [`causal_distance`] call per target.
///
/// # Errors
///
/// Returns [`GraphError::UnknownEvent`] if `origin` does not exist.
pub fn distances_from<S>(graph: &S, origin: EventId) -> Result<BTreeMap<EventId, u32>, GraphError>
where
    S: CausalStructure + ?Sized,
{
    ensure_known(graph, origin)?;

    let mut distances = BTreeMap::new();
    let mut queue = VecDeque::new();
    distances.insert(origin, 0_u32);
    queue.push_back((origin, 0_u32));

    while let Some((node, dist)) = queue.pop_front() {
        let next_dist = dist.checked_add(1).ok_or(GraphError::ArithmeticOverflow)?;
        for &next in graph.successors(node) {
            if let std::collections::btree_map::Entry::Vacant(slot) = distances.entry(next) {
                slot.insert(next_dist);
                queue.push_back((next, next_dist));
            }
        }
    }

    Ok(distances)
}

fn ensure_known<S>(graph: &S, id: EventId) -> Result<(), GraphError>
where
    S: CausalStructure + ?Sized,
{
    if graph.contains(id) {
        Ok(())
    } else {
        Err(GraphError::UnknownEvent(id))
    }
}
