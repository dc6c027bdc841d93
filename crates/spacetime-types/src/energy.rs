//! Per-event energy, the mass-like term that biases cause selection.
//!
//! Energy is fixed when an event is created. It is always a finite value
//! strictly greater than zero, which keeps every selection weight positive.

use serde::Deserialize;

/// Errors raised when constructing an [`Energy`] value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnergyError {
    /// The value was zero or negative.
    #[error("energy must be positive, got {0}")]
    NotPositive(f64),

    /// The value was NaN or infinite.
    #[error("energy must be finite, got {0}")]
    NotFinite(f64),
}

/// A strictly positive, finite energy value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "f64")]
pub struct Energy(f64);

impl Energy {
    /// Energy of an ordinary event (and of the origin).
    pub const BASE: Self = Self(1.0);

    /// Validate and wrap a raw energy value.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::NotFinite`] for NaN or infinities, and
    /// [`EnergyError::NotPositive`] for values `<= 0`.
    pub fn new(value: f64) -> Result<Self, EnergyError> {
        if !value.is_finite() {
            return Err(EnergyError::NotFinite(value));
        }
        if value <= 0.0 {
            return Err(EnergyError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Return the raw value.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Multiply by a factor, re-validating the product.
    ///
    /// # Errors
    ///
    /// Returns an [`EnergyError`] if the product is not finite and positive.
    pub fn scaled(self, factor: f64) -> Result<Self, EnergyError> {
        Self::new(self.0 * factor)
    }
}

impl Default for Energy {
    fn default() -> Self {
        Self::BASE
    }
}

impl TryFrom<f64> for Energy {
    type Error = EnergyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl core::fmt::Display for Energy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(Energy::new(0.0), Err(EnergyError::NotPositive(0.0)));
        assert!(matches!(Energy::new(-2.5), Err(EnergyError::NotPositive(_))));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(Energy::new(f64::NAN), Err(EnergyError::NotFinite(_))));
        assert!(matches!(Energy::new(f64::INFINITY), Err(EnergyError::NotFinite(_))));
    }

    #[test]
    fn scaled_multiplies() {
        let e = Energy::BASE.scaled(5.0).ok();
        assert_eq!(e.map(Energy::value), Some(5.0));
        assert!(Energy::BASE.scaled(0.0).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Energy, _> = serde_json::from_str("2.0");
        assert!(ok.is_ok());
        let bad: Result<Energy, _> = serde_json::from_str("-1.0");
        assert!(bad.is_err());
    }
}
