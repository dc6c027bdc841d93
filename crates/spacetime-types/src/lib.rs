//! Shared type definitions for the causal toy universe.
//!
//! # Modules
//!
//! - [`ids`] -- [`EventId`], the dense creation-ordered event identifier
//! - [`energy`] -- [`Energy`], the validated per-event mass-like scalar

pub mod energy;
pub mod ids;

pub use energy::{Energy, EnergyError};
pub use ids::EventId;
