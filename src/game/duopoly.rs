//! Duopoly pricing on a discrete price grid.

use super::Game;
use super::GameSpec;
use super::Step;
use crate::Action;
use crate::State;
use crate::Utility;
use crate::error::Result;
use ndarray::Array2;
use ndarray::ArrayView2;

/// Two firms post prices `a / n_prices` on a unit demand curve; the
/// cheaper firm takes the whole market at margin `(1 - p) * p`, a tie
/// splits the demand `(1 - p) / 2` each.
///
/// Each firm's next state is its rival's posted price index, so the game
/// is naturally played as a reactive, state-conditioned repeated game.
#[derive(Debug, Clone)]
pub struct Duopoly {
    spec: GameSpec,
}

impl Duopoly {
    pub fn new(n_prices: usize) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(2, n_prices, n_prices)?,
        })
    }

    fn price(&self, a: Action) -> Utility {
        a as Utility / self.spec.actions(0) as Utility
    }
}

impl Game for Duopoly {
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
            let (p1, p2) = (self.price(a1), self.price(a2));
            let (r1, r2) = if p1 < p2 {
                ((1.0 - p1) * p1, 0.0)
            } else if p1 == p2 {
                let split = 0.5 * (1.0 - p1);
                (split, split)
            } else {
                (0.0, (1.0 - p2) * p2)
            };
            rewards[[b, 0]] = r1;
            rewards[[b, 1]] = r2;
            states[[b, 0]] = a2;
            states[[b, 1]] = a1;
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
    fn undercutting_takes_the_market() {
        let game = Duopoly::new(10).unwrap();
        let actions = arr2(&[[4, 6]]);
        let states = Array2::<State>::zeros((1, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!((step.rewards[[0, 0]] - 0.6 * 0.4).abs() < 1e-6);
        assert!(step.rewards[[0, 1]] == 0.0);
    }

    #[test]
    fn tie_splits_demand() {
        let game = Duopoly::new(10).unwrap();
        let actions = arr2(&[[5, 5]]);
        let states = Array2::<State>::zeros((1, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!((step.rewards[[0, 0]] - 0.25).abs() < 1e-6);
        assert!(step.rewards[[0, 0]] == step.rewards[[0, 1]]);
    }

    #[test]
    fn next_state_is_rival_price() {
        let game = Duopoly::new(10).unwrap();
        let actions = arr2(&[[4, 6]]);
        let states = Array2::<State>::zeros((1, 2));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        assert!(step.next_states.unwrap() == arr2(&[[6, 4]]));
    }
}
