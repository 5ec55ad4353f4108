//! Q-value update rules.
//!
//! A rule revises the population's Q-tables from one round of observed
//! rewards. Rules are interchangeable strategy values behind the
//! [`UpdateRule`] trait: the driver always hands over the same
//! (actions, rewards, next states) triple and expects tables of identical
//! shape back, so variants swap in without touching the loop.

mod bellman;

pub use bellman::*;

use crate::Action;
use crate::State;
use crate::Utility;
use crate::agents::Population;
use crate::error::Result;
use ndarray::Array2;

/// The pluggable Q-update contract.
pub trait UpdateRule: Send + Sync {
    /// Apply one round of updates in place.
    ///
    /// Returns the summed |belief update| across the whole batch, the
    /// convergence signal the driver's early-stop window watches.
    fn update(
        &self,
        agents: &mut Population,
        actions: &Array2<Action>,
        rewards: &Array2<Utility>,
        next_states: &Array2<State>,
    ) -> Result<Utility>;

    /// Eager shape validation against the population dimensions.
    fn validate(&self, _batch: usize, _players: usize) -> Result<()> {
        Ok(())
    }
}
