//! The repeated prisoner's dilemma.

use super::Game;
use super::GameSpec;
use super::Step;
use super::finite;
use crate::Action;
use crate::State;
use crate::Utility;
use crate::error::Result;
use ndarray::Array2;
use ndarray::ArrayView2;

/// Two players, actions 0 = cooperate and 1 = defect, full payoff
/// quadruple: `temptation` for unilateral defection, `reward` for mutual
/// cooperation, `punishment` for mutual defection, `sucker` for
/// unilateral cooperation.
///
/// The game is stateful: both players observe `a1 + a2` from the previous
/// round (0 = both cooperated, 1 = mixed, 2 = both defected), which lets
/// state-conditioned policies express reactive strategies.
#[derive(Debug, Clone)]
pub struct PrisonersDilemma {
    spec: GameSpec,
    temptation: Utility,
    reward: Utility,
    punishment: Utility,
    sucker: Utility,
}

impl PrisonersDilemma {
    pub fn new(
        temptation: Utility,
        reward: Utility,
        punishment: Utility,
        sucker: Utility,
    ) -> Result<Self> {
        finite("temptation", temptation)?;
        finite("reward", reward)?;
        finite("punishment", punishment)?;
        finite("sucker", sucker)?;
        Ok(Self {
            spec: GameSpec::uniform(2, 2, 3)?,
            temptation,
            reward,
            punishment,
            sucker,
        })
    }

    /// The classic (5, 3, 1, 0) matrix.
    pub fn classic() -> Self {
        Self::new(5.0, 3.0, 1.0, 0.0).expect("classic matrix is finite")
    }
}

impl Game for PrisonersDilemma {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let batch = actions.nrows();
        let mut rewards = Array2::<Utility>::zeros((batch, 2));
        let mut states = Array2::<State>::zeros((batch, 2));
        for b in 0..batch {
            let (a1, a2) = (actions[[b, 0]], actions[[b, 1]]);
            let (r1, r2) = match (a1, a2) {
                (0, 0) => (self.reward, self.reward),
                (0, 1) => (self.sucker, self.temptation),
                (1, 0) => (self.temptation, self.sucker),
                (1, 1) => (self.punishment, self.punishment),
                _ => unreachable!("checked against a 2-action spec"),
            };
            rewards[[b, 0]] = r1;
            rewards[[b, 1]] = r2;
            states[[b, 0]] = a1 + a2;
            states[[b, 1]] = a1 + a2;
        }
        Ok(Step {
            rewards,
            next_states: Some(states),
            utilities: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn classic_matrix() {
        let game = PrisonersDilemma::classic();
        let actions = arr2(&[[0, 0], [0, 1], [1, 0], [1, 1]]);
        let states = Array2::<State>::zeros((4, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!(step.rewards == arr2(&[[3.0, 3.0], [0.0, 5.0], [5.0, 0.0], [1.0, 1.0]]));
    }

    #[test]
    fn state_is_sum_of_actions() {
        let game = PrisonersDilemma::classic();
        let actions = arr2(&[[0, 0], [1, 0], [1, 1]]);
        let states = Array2::<State>::zeros((3, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!(step.next_states.unwrap() == arr2(&[[0, 0], [1, 1], [2, 2]]));
    }
}
