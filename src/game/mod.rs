//! The game contract and the shipped catalog.
//!
//! A game is a payoff function over joint actions (plus a transition
//! function for stateful games), pure in its inputs and fixed parameters.
//! The simulation driver depends only on the [`Game`] trait, never on a
//! concrete game's internals, so new games plug in without touching the
//! engine.
//!
//! # Catalog
//!
//! | Game | Players | Actions | Stateful | Rewards |
//! |------|---------|---------|----------|---------|
//! | [`BraessAugmented`] | n | 3 routes | no | -travel time |
//! | [`BraessInitial`] | n | 2 routes | no | -travel time |
//! | [`TwoRoute`] | n | 2 routes | no | -travel time |
//! | [`Pigou`] | n | 2 routes | no | -travel time |
//! | [`Pigou3`] | n | 3 routes | no | -travel time |
//! | [`Minority`] | n | 2 | no | 0/1 |
//! | [`MinoritySym`] | n | 2 | no | ±(1 - 2f) |
//! | [`ElFarol`] | n | 2 | no | -cost |
//! | [`Duopoly`] | 2 | price grid | yes | profit |
//! | [`PrisonersDilemma`] | 2 | 2 | yes | payoff matrix |
//! | [`PopulationGame`] | n | 2 | no | adoption utility |
//! | [`PublicGoods`] | n | contribution grid | no | 1 - c + pot |

mod dilemma;
mod duopoly;
mod goods;
mod minority;
mod population;
mod routing;
mod spec;

pub use dilemma::*;
pub use duopoly::*;
pub use goods::*;
pub use minority::*;
pub use population::*;
pub use routing::*;
pub use spec::*;

use crate::Action;
use crate::State;
use crate::Utility;
use crate::error::Result;
use ndarray::Array2;
use ndarray::ArrayView2;

/// One round's worth of game output for the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Per-player rewards, shape `(batch, n_players)`.
    pub rewards: Array2<Utility>,
    /// Next state per player, shape `(batch, n_players)`.
    /// `None` for stateless games; the driver then holds states at zero.
    pub next_states: Option<Array2<State>>,
    /// Per-action utility table, shape `(batch, width)`, for games where
    /// every player taking action `a` sees the same utility (travel times,
    /// bar attendance). Recorded into the trajectory for the plotting layer.
    pub utilities: Option<Array2<Utility>>,
}

/// The pluggable game contract.
///
/// `payoff` must be a pure function of its inputs and the fixed
/// [`GameSpec`]: no hidden mutable state, no implicit randomness. A
/// stochastic game would take an explicit stream argument; nothing in the
/// shipped catalog needs one.
pub trait Game: Send + Sync {
    fn spec(&self) -> &GameSpec;

    /// Batch payoffs (and next states, for stateful games) for a batch of
    /// joint actions. Fails with `InvalidAction` on out-of-range entries.
    fn payoff(&self, actions: ArrayView2<Action>, states: ArrayView2<State>) -> Result<Step>;
}

/// Reject non-finite game parameters at construction time.
pub(crate) fn finite(name: &'static str, value: Utility) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(crate::error::Error::InvalidParameter {
            name,
            value,
            domain: "a finite real",
        })
    }
}

/// Whole-batch action occupancy tally, shape `(batch, width)`.
///
/// One pass over the joint action array; congestion games derive their
/// edge loads from this instead of re-counting per member.
pub fn occupancy(actions: ArrayView2<Action>, width: usize) -> Array2<usize> {
    let mut counts = Array2::<usize>::zeros((actions.nrows(), width));
    for ((b, _), &a) in actions.indexed_iter() {
        counts[[b, a]] += 1;
    }
    counts
}

/// Gather per-player rewards from a per-member utility table:
/// `rewards[b, p] = table[b, actions[b, p]]`.
pub(crate) fn gather(actions: ArrayView2<Action>, table: &Array2<Utility>) -> Array2<Utility> {
    let mut rewards = Array2::<Utility>::zeros(actions.raw_dim());
    for ((b, p), &a) in actions.indexed_iter() {
        rewards[[b, p]] = table[[b, a]];
    }
    rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn occupancy_counts_per_member() {
        let actions = arr2(&[[0, 1, 1], [2, 2, 2]]);
        let counts = occupancy(actions.view(), 3);
        assert!(counts == arr2(&[[1, 2, 0], [0, 0, 3]]));
    }

    #[test]
    fn gather_reads_member_rows() {
        let actions = arr2(&[[0, 1], [1, 1]]);
        let table = arr2(&[[-1.0, -2.0], [-3.0, -4.0]]);
        let rewards = gather(actions.view(), &table);
        assert!(rewards == arr2(&[[-1.0, -2.0], [-4.0, -4.0]]));
    }
}
