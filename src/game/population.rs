//! The two-technology population game from "Catastrophe by Design in
//! Population Games" (https://doi.org/10.1145/3583782).

use super::Game;
use super::GameSpec;
use super::Step;
use super::finite;
use super::gather;
use super::occupancy;
use crate::Action;
use crate::State;
use crate::Utility;
use crate::error::Result;
use ndarray::Array2;
use ndarray::ArrayView2;

/// Action 0 adopts the weak (taxed) technology, action 1 the strong one.
/// Each side's utility scales with its own adoption share through
/// `v * (f * k)^(exponent - 1)`, and the weak side additionally pays
/// `cost`.
#[derive(Debug, Clone)]
pub struct PopulationGame {
    spec: GameSpec,
    v: Utility,
    k: Utility,
    exponent: Utility,
    cost: Utility,
}

impl PopulationGame {
    pub fn new(
        n_agents: usize,
        v: Utility,
        k: Utility,
        exponent: Utility,
        cost: Utility,
    ) -> Result<Self> {
        finite("v", v)?;
        finite("k", k)?;
        finite("exponent", exponent)?;
        finite("cost", cost)?;
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
            v,
            k,
            exponent,
            cost,
        })
    }
}

impl Game for PopulationGame {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            let weak = row[0] as Utility / n;
            let strong = row[1] as Utility / n;
            table[[b, 0]] = self.v * (weak * self.k).powf(self.exponent - 1.0) - self.cost;
            table[[b, 1]] = self.v * (strong * self.k).powf(self.exponent - 1.0);
        }
        Ok(Step {
            rewards: gather(actions, &table),
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
    fn adoption_shares_drive_utility() {
        // v = 2, k = 1, exponent = 2: utility is linear in own share.
        let game = PopulationGame::new(4, 2.0, 1.0, 2.0, 0.5).unwrap();
        let actions = arr2(&[[0, 0, 0, 1]]);
        let states = Array2::<State>::zeros((1, 4));
        let step = game.payoff(actions.view(), states.view()).unwrap();
        // weak share 0.75: 2(0.75) - 0.5 = 1.0; strong share 0.25: 0.5
        assert!((step.rewards[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((step.rewards[[0, 3]] - 0.5).abs() < 1e-6);
    }
}
