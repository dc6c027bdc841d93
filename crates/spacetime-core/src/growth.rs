//! Growth policy: the probabilities that shape each growth step.
//!
//! A growth step first decides whether an event happens at all, then whether
//! the new event is ordinary or massive, then (for massive events) which
//! multiplier scales its energy. The defaults reproduce the canonical toy
//! universe: 60% creation chance, 10% massive chance, multipliers
//! `{2, 5, 10}`.

use serde::Deserialize;
use spacetime_types::{Energy, EventId};

/// Probabilities and multipliers driving event creation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrowthPolicy {
    /// Chance that a step creates an event.
    #[serde(default = "default_creation_probability")]
    pub creation_probability: f64,

    /// Chance that a created event is massive.
    #[serde(default = "default_massive_probability")]
    pub massive_probability: f64,

    /// Multipliers a massive event's energy is drawn from (uniformly), before
    /// scaling by the universe's energy strength.
    #[serde(default = "default_massive_multipliers")]
    pub massive_multipliers: Vec<f64>,
}

impl GrowthPolicy {
    /// Check that every probability lies in `[0, 1]` and every multiplier is
    /// finite and positive.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        check_probability("creation_probability", self.creation_probability)?;
        check_probability("massive_probability", self.massive_probability)?;

        if self.massive_multipliers.is_empty() {
            return Err("massive_multipliers must not be empty".to_owned());
        }
        if let Some(bad) = self
            .massive_multipliers
            .iter()
            .find(|m| !m.is_finite() || **m <= 0.0)
        {
            return Err(format!("massive multiplier must be finite and positive, got {bad}"));
        }
        Ok(())
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            creation_probability: default_creation_probability(),
            massive_probability: default_massive_probability(),
            massive_multipliers: default_massive_multipliers(),
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be within [0, 1], got {value}"))
    }
}

/// What a single growth step did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No event was created this step.
    Quiet,
    /// One event was created and wired to its causes.
    Created(CreatedEvent),
}

impl StepOutcome {
    /// The created event, if any.
    pub const fn created(&self) -> Option<&CreatedEvent> {
        match self {
            Self::Quiet => None,
            Self::Created(event) => Some(event),
        }
    }
}

/// Details of an event created during a growth step.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedEvent {
    /// The new event's id.
    pub id: EventId,
    /// Its fixed energy.
    pub energy: Energy,
    /// Whether the massive branch fired for it.
    pub massive: bool,
    /// Distinct causes wired to it, ascending by id.
    pub causes: Vec<EventId>,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_creation_probability() -> f64 {
    0.6
}

const fn default_massive_probability() -> f64 {
    0.1
}

fn default_massive_multipliers() -> Vec<f64> {
    vec![2.0, 5.0, 10.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = GrowthPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.massive_multipliers, vec![2.0, 5.0, 10.0]);
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let policy = GrowthPolicy {
            creation_probability: 1.5,
            ..GrowthPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = GrowthPolicy {
            massive_probability: -0.1,
            ..GrowthPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = GrowthPolicy {
            creation_probability: f64::NAN,
            ..GrowthPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn bad_multipliers_rejected() {
        let empty = GrowthPolicy {
            massive_multipliers: Vec::new(),
            ..GrowthPolicy::default()
        };
        assert!(empty.validate().is_err());

        let negative = GrowthPolicy {
            massive_multipliers: vec![2.0, -5.0],
            ..GrowthPolicy::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn quiet_outcome_has_no_event() {
        assert!(StepOutcome::Quiet.created().is_none());
    }
}
