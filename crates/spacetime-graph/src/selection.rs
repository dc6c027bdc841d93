//! Density- and energy-weighted cause selection.
//!
//! When a new event is wired into the graph, every older event competes to be
//! one of its causes. An event's pull grows with the number of effects it
//! already has (local density) and with its energy, much like preferential
//! attachment with a mass term:
//!
//! ```text
//! weight(e) = (1 + out_degree(e)) * energy(e)
//! ```
//!
//! Causes are drawn with replacement from a [`WeightedIndex`] and then
//! deduplicated, so a cause drawn twice still contributes a single edge.
//! Apart from the caller's random source, every routine here is pure.

use std::collections::BTreeSet;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use spacetime_types::{Energy, EventId};

use crate::error::GraphError;

/// Selection weight of a candidate cause.
///
/// Always strictly positive, since energy is positive and the density term
/// is at least 1.
pub fn selection_weight(out_degree: usize, energy: Energy) -> f64 {
    // Out-degrees stay far below 2^52, where f64 is exact.
    #[allow(clippy::cast_precision_loss)]
    let density = out_degree as f64;
    (1.0 + density) * energy.value()
}

/// Number of draws for one growth step.
///
/// `min(base_causes + floor(mean(weights)), weights.len())`. Returns 0 when
/// there are no candidates.
///
/// The mean is the exact sum divided by the count, rounded once to the
/// nearest `f64`. A plain running sum can land a hair either side of a whole
/// number and shift the floor by one.
pub fn cause_count(base_causes: u32, weights: &[f64]) -> usize {
    if weights.is_empty() {
        return 0;
    }

    // Weights are positive, so the floored mean is a non-negative whole
    // number; float-to-int `as` saturates on the (unreachable) huge case.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let extra = floored_mean(weights) as usize;

    usize::try_from(base_causes)
        .unwrap_or(usize::MAX)
        .saturating_add(extra)
        .min(weights.len())
}

// ---------------------------------------------------------------------------
// Exact mean
// ---------------------------------------------------------------------------

/// Exact sum of `f64` values held as non-overlapping partials of increasing
/// magnitude (Shewchuk's algorithm).
#[derive(Debug, Clone, Default)]
struct ExactSum {
    partials: Vec<f64>,
}

impl ExactSum {
    fn add(&mut self, value: f64) {
        let mut carry = value;
        let mut kept = Vec::with_capacity(self.partials.len().saturating_add(1));
        for &partial in &self.partials {
            let (hi, lo) = two_sum(carry, partial);
            if lo != 0.0 {
                kept.push(lo);
            }
            carry = hi;
        }
        kept.push(carry);
        self.partials = kept;
    }

    /// Close approximation of the sum.
    fn approximate(&self) -> f64 {
        self.partials.iter().rev().sum()
    }

    /// Sign of the exact sum, carried by its largest non-zero partial.
    fn sign(&self) -> core::cmp::Ordering {
        self.partials
            .iter()
            .rev()
            .find(|partial| **partial != 0.0)
            .map_or(core::cmp::Ordering::Equal, |partial| {
                if partial.is_sign_positive() {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Less
                }
            })
    }
}

/// `hi + lo == a + b` exactly, with `hi` the rounded sum.
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let hi = a + b;
    let lo = if a.abs() >= b.abs() {
        b - (hi - a)
    } else {
        a - (hi - b)
    };
    (hi, lo)
}

/// `floor(mean(weights))`, where the mean is rounded once from the exact sum.
fn floored_mean(weights: &[f64]) -> f64 {
    let mut sum = ExactSum::default();
    for &weight in weights {
        sum.add(weight);
    }

    #[allow(clippy::cast_precision_loss)]
    let count = weights.len() as f64;
    let estimate = (sum.approximate() / count).floor();
    // Every f64 at or above 2^52 is already a whole number.
    if estimate >= 4_503_599_627_370_496.0 {
        return estimate;
    }

    // The estimate is off by at most one either way.
    for candidate in [estimate + 1.0, estimate] {
        if rounded_mean_reaches(&sum, count, candidate) {
            return candidate;
        }
    }
    estimate - 1.0
}

/// Whether `sum / count`, rounded to nearest-even, is at least `whole`.
///
/// That holds when the exact mean lies above the midpoint between `whole`
/// and the next `f64` below it, or on the midpoint when `whole` is even.
fn rounded_mean_reaches(sum: &ExactSum, count: f64, whole: f64) -> bool {
    if whole <= 0.0 {
        return true;
    }
    let below = f64::from_bits(whole.to_bits().saturating_sub(1));
    let half_gap = (whole - below) / 2.0;

    // sum - count * (whole - half_gap), with every term exact.
    let product = count * whole;
    let mut diff = sum.clone();
    diff.add(-product);
    diff.add(-count.mul_add(whole, -product));
    diff.add(count * half_gap);

    match diff.sign() {
        core::cmp::Ordering::Greater => true,
        core::cmp::Ordering::Less => false,
        core::cmp::Ordering::Equal => whole.to_bits() & 1 == 0,
    }
}

/// Draw `draws` candidates with replacement, proportionally to `weights`.
///
/// The returned list keeps draw order and may contain repeats.
///
/// # Errors
///
/// Returns [`GraphError::InvalidWeights`] if the candidate and weight lists
/// differ in length, or if the weights cannot form a distribution (empty,
/// negative, non-finite, or all zero).
pub fn choose_causes<R>(
    rng: &mut R,
    candidates: &[EventId],
    weights: &[f64],
    draws: usize,
) -> Result<Vec<EventId>, GraphError>
where
    R: Rng + ?Sized,
{
    if candidates.len() != weights.len() {
        return Err(GraphError::InvalidWeights {
            reason: format!(
                "{} candidates but {} weights",
                candidates.len(),
                weights.len()
            ),
        });
    }
    if draws == 0 {
        return Ok(Vec::new());
    }

    let distribution =
        WeightedIndex::<f64>::new(weights).map_err(|err| GraphError::InvalidWeights {
            reason: err.to_string(),
        })?;

    (0..draws)
        .map(|_| {
            let index = distribution.sample(&mut *rng);
            candidates
                .get(index)
                .copied()
                .ok_or_else(|| GraphError::InvalidWeights {
                    reason: format!("sampled index {index} out of range"),
                })
        })
        .collect()
}

/// Collapse repeated draws into the set of distinct causes, ascending by id.
pub fn distinct_causes(draws: &[EventId]) -> BTreeSet<EventId> {
    draws.iter().copied().collect()
}
