//! Error types for the `spacetime-graph` crate.
//!
//! All fallible graph operations return [`GraphError`].

use spacetime_types::EventId;

/// Errors that can occur during causal-graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The event was never created in this graph.
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),

    /// An edge would point backwards (or sideways) in creation order.
    #[error("causal edge {cause} -> {effect} does not point forward in creation order")]
    BackwardEdge {
        /// The would-be cause.
        cause: EventId,
        /// The would-be effect.
        effect: EventId,
    },

    /// The graph holds no events, so there is nothing to rank or explore.
    #[error("graph has no events")]
    EmptyGraph,

    /// Candidate weights cannot drive a weighted draw.
    #[error("invalid selection weights: {reason}")]
    InvalidWeights {
        /// Explanation of what is wrong with the weights.
        reason: String,
    },

    /// The event identifier space is exhausted.
    #[error("event capacity exhausted")]
    CapacityExhausted,

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in graph calculation")]
    ArithmeticOverflow,
}
