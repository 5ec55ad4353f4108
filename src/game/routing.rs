//! Congestion/routing games.
//!
//! Rewards are negative travel times, so the Q-learning dynamics minimize
//! congestion cost. Edge loads come from one whole-batch occupancy tally;
//! each member's per-route cost table is then built from its load row and
//! rewards are gathered by each player's chosen route.

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

/// The Braess network with the added shortcut link.
///
/// Routes: 0 = up, 1 = down, 2 = cross (up-link, shortcut, down-link).
/// At the Nash equilibrium every player crosses and the average travel
/// time is 2, while the optimum of 1.5 splits evenly over up/down and
/// ignores the shortcut entirely. `cost` is the shortcut's own travel
/// time, 0 in the classic paradox.
#[derive(Debug, Clone)]
pub struct BraessAugmented {
    spec: GameSpec,
    cost: Utility,
}

impl BraessAugmented {
    pub fn new(n_agents: usize, cost: Utility) -> Result<Self> {
        finite("cost", cost)?;
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 3, 1)?,
            cost,
        })
    }
}

impl Game for BraessAugmented {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 3);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 3));
        for (b, row) in counts.outer_iter().enumerate() {
            let up = row[0] as Utility;
            let down = row[1] as Utility;
            let cross = row[2] as Utility;
            let first = 1.0 + (up + cross) / n;
            let second = 1.0 + (down + cross) / n;
            table[[b, 0]] = -first;
            table[[b, 1]] = -second;
            table[[b, 2]] = -((up + cross) / n + (down + cross) / n + self.cost);
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// The Braess network without the shortcut.
///
/// Two parallel routes; the Nash equilibrium and the optimum coincide at
/// an average travel time of 1.5 with players split evenly.
#[derive(Debug, Clone)]
pub struct BraessInitial {
    spec: GameSpec,
}

impl BraessInitial {
    pub fn new(n_agents: usize) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
        })
    }
}

impl Game for BraessInitial {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            table[[b, 0]] = -(1.0 + row[0] as Utility / n);
            table[[b, 1]] = -(1.0 + row[1] as Utility / n);
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// A two-route game whose `cost` parameter slides the network between a
/// Pigou-like extreme and one where the equilibrium is optimal.
///
/// Route 0 costs `load + cost`, route 1 costs `(1 - load) + (1 - cost)`.
#[derive(Debug, Clone)]
pub struct TwoRoute {
    spec: GameSpec,
    cost: Utility,
}

impl TwoRoute {
    pub fn new(n_agents: usize, cost: Utility) -> Result<Self> {
        finite("cost", cost)?;
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
            cost,
        })
    }
}

impl Game for TwoRoute {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            let up = row[0] as Utility / n;
            table[[b, 0]] = -(up + self.cost);
            table[[b, 1]] = -((1.0 - up) + (1.0 - self.cost));
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// The Pigou network: one route with fixed cost, one whose cost equals
/// the fraction of players taking it. The classic game fixes `cost` at 1.
#[derive(Debug, Clone)]
pub struct Pigou {
    spec: GameSpec,
    cost: Utility,
}

impl Pigou {
    pub fn new(n_agents: usize, cost: Utility) -> Result<Self> {
        finite("cost", cost)?;
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 2, 1)?,
            cost,
        })
    }
}

impl Game for Pigou {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 2);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 2));
        for (b, row) in counts.outer_iter().enumerate() {
            table[[b, 0]] = -self.cost;
            table[[b, 1]] = -(row[1] as Utility / n);
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}

/// A three-route Pigou variant: one load-proportional route and two
/// fixed unit-cost routes.
#[derive(Debug, Clone)]
pub struct Pigou3 {
    spec: GameSpec,
}

impl Pigou3 {
    pub fn new(n_agents: usize) -> Result<Self> {
        Ok(Self {
            spec: GameSpec::uniform(n_agents, 3, 1)?,
        })
    }
}

impl Game for Pigou3 {
    fn spec(&self) -> &GameSpec {
        &self.spec
    }

    fn payoff(&self, actions: ArrayView2<Action>, _: ArrayView2<State>) -> Result<Step> {
        self.spec.check_actions(actions)?;
        let n = self.spec.n_players() as Utility;
        let counts = occupancy(actions, 3);
        let mut table = Array2::<Utility>::zeros((actions.nrows(), 3));
        for (b, row) in counts.outer_iter().enumerate() {
            table[[b, 0]] = -(row[0] as Utility / n);
            table[[b, 1]] = -1.0;
            table[[b, 2]] = -1.0;
        }
        Ok(Step {
            rewards: gather(actions, &table),
            next_states: None,
            utilities: Some(table),
        })
    }
}
