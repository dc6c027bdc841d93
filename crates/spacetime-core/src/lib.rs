//! Growth engine and run orchestration for the causal toy universe.
//!
//! This crate owns the step function that grows the causal graph one event
//! at a time, the configuration that parameterizes it, and the derived
//! reports computed once a run is over.
//!
//! # Modules
//!
//! - [`analysis`] -- Causal-structure, curvature, and energy reports.
//! - [`config`] -- Configuration loading from `spacetime-config.yaml` into
//!   strongly-typed structs.
//! - [`growth`] -- [`GrowthPolicy`] and per-step [`StepOutcome`].
//! - [`runner`] -- Fixed-length run loop with [`StepCallback`] hooks.
//! - [`universe`] -- [`CausalUniverse`], the engine itself.
//!
//! [`GrowthPolicy`]: growth::GrowthPolicy
//! [`StepOutcome`]: growth::StepOutcome
//! [`StepCallback`]: runner::StepCallback
//! [`CausalUniverse`]: universe::CausalUniverse

pub mod analysis;
pub mod config;
pub mod growth;
pub mod runner;
pub mod universe;

pub use universe::{CausalUniverse, RunSummary, UniverseError};
