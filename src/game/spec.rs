use crate::Action;
use crate::error::Error;
use crate::error::Result;
use ndarray::ArrayView2;
use serde::Deserialize;
use serde::Serialize;

/// Per-player action cardinalities.
///
/// Every game in the shipped catalog is uniform, but the engine itself
/// supports heterogeneous action sets: arrays are padded to the widest
/// player and every reduction runs over the valid prefix only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    Uniform(usize),
    PerPlayer(Vec<usize>),
}

/// Immutable description of one game instance's structure.
///
/// Created once per simulation configuration, shared read-only across all
/// batch members and rounds. Family-specific parameters (edge costs,
/// multipliers, price grids) live on the concrete game value, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSpec {
    n_players: usize,
    n_states: usize,
    actions: Cardinality,
}

impl GameSpec {
    /// A spec where every player shares the same action count.
    pub fn uniform(n_players: usize, n_actions: usize, n_states: usize) -> Result<Self> {
        if n_players == 0 || n_actions == 0 || n_states == 0 {
            return Err(Error::ConfigMismatch(format!(
                "degenerate spec: {} players, {} actions, {} states",
                n_players, n_actions, n_states
            )));
        }
        Ok(Self {
            n_players,
            n_states,
            actions: Cardinality::Uniform(n_actions),
        })
    }

    /// A spec with one action count per player.
    pub fn heterogeneous(counts: Vec<usize>, n_states: usize) -> Result<Self> {
        if counts.is_empty() || n_states == 0 || counts.iter().any(|&k| k == 0) {
            return Err(Error::ConfigMismatch(
                "heterogeneous spec requires nonzero state and action counts".to_string(),
            ));
        }
        Ok(Self {
            n_players: counts.len(),
            n_states,
            actions: Cardinality::PerPlayer(counts),
        })
    }

    pub fn n_players(&self) -> usize {
        self.n_players
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Valid action count for one player.
    pub fn actions(&self, player: usize) -> usize {
        match &self.actions {
            Cardinality::Uniform(k) => *k,
            Cardinality::PerPlayer(ks) => ks[player],
        }
    }

    /// Width of the padded action axis, i.e. the widest player.
    pub fn width(&self) -> usize {
        match &self.actions {
            Cardinality::Uniform(k) => *k,
            Cardinality::PerPlayer(ks) => ks.iter().copied().max().unwrap_or(0),
        }
    }

    /// Stateless games use a single dummy state.
    pub fn stateless(&self) -> bool {
        self.n_states == 1
    }

    /// Validate a joint action array against this spec.
    ///
    /// Shape must be `(batch, n_players)` and every entry must index into
    /// its player's valid range. Violations are contract errors, never
    /// silently clamped.
    pub fn check_actions(&self, actions: ArrayView2<Action>) -> Result<()> {
        if actions.ncols() != self.n_players {
            return Err(Error::ConfigMismatch(format!(
                "joint actions have {} columns for a {}-player game",
                actions.ncols(),
                self.n_players
            )));
        }
        for ((_, p), &a) in actions.indexed_iter() {
            let bound = self.actions(p);
            if a >= bound {
                return Err(Error::InvalidAction {
                    player: p,
                    action: a,
                    bound,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn uniform_accessors() {
        let spec = GameSpec::uniform(4, 3, 1).unwrap();
        assert!(spec.n_players() == 4);
        assert!(spec.actions(2) == 3);
        assert!(spec.width() == 3);
        assert!(spec.stateless());
    }

    #[test]
    fn heterogeneous_width_is_max() {
        let spec = GameSpec::heterogeneous(vec![2, 5, 3], 1).unwrap();
        assert!(spec.actions(0) == 2);
        assert!(spec.actions(1) == 5);
        assert!(spec.width() == 5);
    }

    #[test]
    fn degenerate_specs_rejected() {
        assert!(GameSpec::uniform(0, 2, 1).is_err());
        assert!(GameSpec::uniform(2, 0, 1).is_err());
        assert!(GameSpec::heterogeneous(vec![], 1).is_err());
        assert!(GameSpec::heterogeneous(vec![2, 0], 1).is_err());
    }

    #[test]
    fn out_of_range_action_detected() {
        let spec = GameSpec::heterogeneous(vec![2, 3], 1).unwrap();
        assert!(spec.check_actions(arr2(&[[1, 2]]).view()).is_ok());
        match spec.check_actions(arr2(&[[2, 0]]).view()) {
            Err(Error::InvalidAction { player: 0, action: 2, bound: 2 }) => {}
            other => panic!("expected InvalidAction, got {:?}", other),
        }
    }

    #[test]
    fn wrong_player_count_detected() {
        let spec = GameSpec::uniform(2, 2, 1).unwrap();
        assert!(matches!(
            spec.check_actions(arr2(&[[0, 0, 0]]).view()),
            Err(Error::ConfigMismatch(_))
        ));
    }
}
