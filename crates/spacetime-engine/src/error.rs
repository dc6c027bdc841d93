//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run, and reporting.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: spacetime_core::config::ConfigError,
    },

    /// Universe construction failed.
    #[error("universe error: {source}")]
    Universe {
        /// The underlying universe error.
        #[from]
        source: spacetime_core::UniverseError,
    },

    /// The run failed part-way.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: spacetime_core::runner::RunnerError,
    },

    /// Post-run analysis failed.
    #[error("analysis error: {source}")]
    Analysis {
        /// The underlying graph error.
        #[from]
        source: spacetime_graph::GraphError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
