//! Action-selection policies.
//!
//! A policy maps the population's Q-values (and current states) to one
//! sampled joint action per batch member, drawing entropy only from the
//! member's own stream. Policies are interchangeable strategy values
//! behind the [`Policy`] trait; the driver never sees their internals.
//!
//! | Policy | Exploration | Entropy use |
//! |--------|-------------|-------------|
//! | [`EpsilonGreedy`] | uniform random with probability ε | per-member draws |
//! | [`Boltzmann`] | softmax over Q at temperature τ | per-member draws |
//! | [`RegularizedLeader`] | argmax of softmax-regularized Q | none |

mod boltzmann;
mod greedy;
mod leader;

pub use boltzmann::*;
pub use greedy::*;
pub use leader::*;

use crate::Action;
use crate::Entropy;
use crate::Probability;
use crate::Utility;
use crate::agents::Population;
use crate::error::Result;
use crate::stream::Streams;
use ndarray::Array2;
use ndarray::ArrayView1;

/// The pluggable action-selection contract.
pub trait Policy: Send + Sync {
    /// Sample one action per (batch member, player).
    ///
    /// Member `b` must consume entropy exclusively from stream `b`, in a
    /// fixed per-player order, so batch members stay independent and
    /// reproducible.
    fn select(&self, agents: &Population, streams: &mut Streams) -> Result<Array2<Action>>;

    /// Eager shape validation against the population dimensions.
    fn validate(&self, _batch: usize, _players: usize) -> Result<()> {
        Ok(())
    }

    /// Called once per round before selection; annealed policies update
    /// their exploration parameters here.
    fn anneal(&mut self, _round: usize, _horizon: usize) {}
}

/// Argmax over a Q-row prefix, first occurrence on ties.
pub(crate) fn argmax(row: ArrayView1<Utility>) -> usize {
    let mut best = 0;
    let mut top = row[0];
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > top {
            best = i;
            top = v;
        }
    }
    best
}

/// Numerically stable softmax of a Q-row prefix at temperature `tau`.
/// The per-row maximum is subtracted before exponentiating so large
/// Q-values never overflow.
pub(crate) fn softmax(row: ArrayView1<Utility>, tau: Entropy) -> Vec<Probability> {
    let top = row.iter().cloned().fold(Utility::NEG_INFINITY, Utility::max);
    let mut weights = row
        .iter()
        .map(|&v| ((v - top) / tau).exp())
        .collect::<Vec<Probability>>();
    let z = weights.iter().sum::<Probability>();
    weights.iter_mut().for_each(|w| *w /= z);
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn argmax_breaks_ties_low() {
        let row = arr1(&[1.0, 3.0, 3.0, 0.0]);
        assert!(argmax(row.view()) == 1);
    }

    #[test]
    fn softmax_is_stable_at_scale() {
        let row = arr1(&[1e4, 1e4 + 1.0, 0.0]);
        let probs = softmax(row.view(), 1.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.iter().sum::<Probability>() - 1.0).abs() < 1e-5);
        assert!(probs[1] > probs[0]);
    }
}
