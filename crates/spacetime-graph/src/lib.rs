//! Causal event graph for the toy universe.
//!
//! This crate models the universe's combinatorial structure: events as
//! nodes of a directed acyclic graph, causal links as forward edges, and the
//! derived geometry (causal distance, light cones, local density) computed
//! purely from graph traversal.
//!
//! # Modules
//!
//! - [`causal_graph`] -- [`CausalGraph`], the append-only event arena with
//!   per-event energy and ordered successor lists.
//! - [`error`] -- Error types for graph operations.
//! - [`selection`] -- Selection weights, cause counts, and weighted sampling
//!   with replacement.
//! - [`traversal`] -- Forward breadth-first queries over any
//!   [`CausalStructure`].

pub mod causal_graph;
pub mod error;
pub mod selection;
pub mod traversal;

pub use causal_graph::CausalGraph;
pub use error::GraphError;
pub use traversal::{CausalStructure, causal_distance, distances_from, light_cone};
