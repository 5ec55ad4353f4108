//! Minority-style coordination games.

use super::Game;
use super::GameSpec;
use super::Step;
use super::gather;
use super::occupancy;
use crate::Action;
use crate::State;
use crate::Utility;
use crate::error::Error;
use crate::error::Result;
use ndarray::Array2;
use ndarray::ArrayView2;

fn threshold(value: Utility) -> Result<Utility> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name: "threshold",
            value,
            domain: "[0, 1]",
        })
    }
}

/// The threshold minority game: the group below the population threshold
/// wins a unit payoff, the majority gets nothing.
#[derive(Debug, Clone)]
pub struct Minority {
    spec: GameSpec,
    threshold: Utility,
}

impl Minority {
    pub fn new(n_agents: usize, thresh: Utility) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
            threshold: threshold(thresh)?,
        })
    }
}

impl Game for Minority {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            if n * self.threshold >= row[0] as Utility {
                table[[b, 0]] = 1.0;
            } else {
                table[[b, 1]] = 1.0;
            }
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// The symmetric minority variant: each side's payoff is `1 - 2f` where
/// `f` is its own occupancy fraction, so the minority side is positive
/// and the majority side negative by the same margin.
#[derive(Debug, Clone)]
pub struct MinoritySym {
    spec: GameSpec,
}

impl MinoritySym {
    pub fn new(n_agents: usize) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
        })
    }
}

impl Game for MinoritySym {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            let fa = row[0] as Utility / n;
            table[[b, 0]] = 1.0 - 2.0 * fa;
            table[[b, 1]] = 1.0 - 2.0 * (1.0 - fa);
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// The El Farol bar game.
///
/// Action 0 stays home at unit cost; action 1 goes to the bar, which is
/// worth going to only while attendance stays below the threshold.
/// Rewards keep the catalog's cost convention (negated table).
#[derive(Debug, Clone)]
pub struct ElFarol {
    spec: GameSpec,
    threshold: Utility,
}

impl ElFarol {
    pub fn new(n_agents: usize, thresh: Utility) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
            threshold: threshold(thresh)?,
        })
    }
}

impl Game for ElFarol {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            let pct = row[1] as Utility / n;
            let bar = if pct > self.threshold {
                2.0 - 4.0 * pct
            } else {
                4.0 * pct - 2.0
            };
            table[[b, 0]] = -1.0;
            table[[b, 1]] = -bar;
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

    fn zeros(batch: usize, players: usize) -> Array2<State> {
        Array2::zeros((batch, players))
    }

    #[test]
    fn minority_side_wins() {
        let game = Minority::new(4, 0.5).unwrap();
        let actions = arr2(&[[0, 1, 1, 1]]);
        let step = game.payoff(actions.view(), zeros(1, 4).view()).unwrap();
        assert!(step.rewards[[0, 0]] == 1.0);
        assert!(step.rewards[[0, 1]] == 0.0);
    }

    #[test]
    fn symmetric_minority_balances() {
        let game = MinoritySym::new(4).unwrap();
        let actions = arr2(&[[0, 1, 1, 1]]);
        let step = game.payoff(actions.view(), zeros(1, 4).view()).unwrap();
        // f_a = 1/4: side a earns 0.5, side b earns -0.5
        assert!((step.rewards[[0, 0]] - 0.5).abs() < 1e-6);
        assert!((step.rewards[[0, 1]] - -0.5).abs() < 1e-6);
    }

    #[test]
    fn el_farol_cost_table() {
        let game = ElFarol::new(4, 0.5).unwrap();
        let actions = arr2(&[[1, 1, 1, 0]]);
        let step = game.payoff(actions.view(), zeros(1, 4).view()).unwrap();
        // 75% attendance over the 0.5 threshold: bar term 2 - 4(0.75) = -1
        assert!((step.rewards[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((step.rewards[[0, 3]] - -1.0).abs() < 1e-6);
    }

    #[test]
    fn threshold_domain_enforced() {
        assert!(matches!(
            Minority::new(4, 1.5),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            ElFarol::new(4, -0.1),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
