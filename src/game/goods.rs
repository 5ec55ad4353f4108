//! The public goods game on a discrete contribution grid.

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

/// Each player contributes `a / n_actions` of its unit endowment; the
/// pot multiplies the `beta`-curved contributions and is returned to
/// everyone. `beta` bends the marginal value of intermediate
/// contribution levels.
#[derive(Debug, Clone)]
pub struct PublicGoods {
    spec: GameSpec,
    multiplier: Utility,
    beta: Utility,
}

impl PublicGoods {
    pub fn new(n_agents: usize, n_actions: usize, multiplier: Utility, beta: Utility) -> Result<Self> {
        finite("multiplier", multiplier)?;
        finite("beta", beta)?;
        Ok(Self {
            spec: GameSpec::uniform(n_agents, n_actions, 1)?,
            multiplier,
            beta,
        })
    }
}

impl Game for PublicGoods {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let width = self.spec.width() as Utility;
        let batch = actions.nrows();
        let mut rewards = Array2::<Utility>::zeros(actions.raw_dim());
        let mut table = Array2::<Utility>::zeros((batch, self.spec.width()));
        for b in 0..batch {
            let pot = actions
                .row(b)
                .iter()
                .map(|&a| (a as Utility / width).powf(self.beta))
                .sum::<Utility>()
                * self.multiplier;
            for (p, &a) in actions.row(b).iter().enumerate() {
                rewards[[b, p]] = 1.0 - a as Utility / width + pot;
            }
            for a in 0..self.spec.width() {
                table[[b, a]] = 1.0 - a as Utility / width + pot;
            }
        }
        Ok(Step {
            rewards,
            next_states: None,
            utilities: Some(table),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn pot_returns_to_everyone() {
        // 2 players, 2 contribution levels, multiplier 1, beta 1:
        // contributions [0, 1/2] => pot = 0.5
        let game = PublicGoods::new(2, 2, 1.0, 1.0).unwrap();
        let actions = arr2(&[[0, 1]]);
        let states = Array2::<State>::zeros((1, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!((step.rewards[[0, 0]] - 1.5).abs() < 1e-6);
        assert!((step.rewards[[0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn free_riding_pays_more() {
        let game = PublicGoods::new(3, 4, 1.5, 1.0).unwrap();
        let actions = arr2(&[[0, 2, 2]]);
        let states = Array2::<State>::zeros((1, 3));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!(step.rewards[[0, 0]] > step.rewards[[0, 1]]);
    }
}
