use super::Policy;
use super::argmax;
use crate::Action;
use crate::Probability;
use crate::agents::Population;
use crate::error::Error;
use crate::error::Result;
use crate::schedule::Schedule;
use crate::stream::Streams;
use ndarray::Array2;
use ndarray::s;
use rand::Rng;

/// How the exploit branch resolves equal-valued actions.
///
/// `First` (lowest index) keeps runs reproducible without extra entropy
/// and is the default; `Random` draws uniformly among the tied actions
/// from the member's stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    First,
    Random,
}

/// Epsilon-greedy selection.
///
/// With probability ε the member explores uniformly over its valid
/// actions; otherwise it exploits the argmax of its current state's
/// Q-row. ε is a per-(member, player) array, never shared mutable state,
/// and may be annealed between rounds by a [`Schedule`].
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: Array2<Probability>,
    tie: TieBreak,
    schedule: Schedule,
}

impl EpsilonGreedy {
    /// The same exploration rate for every member and player.
    pub fn uniform(batch: usize, players: usize, epsilon: Probability) -> Result<Self> {
        Self::per_member(Array2::from_elem((batch, players), epsilon))
    }

    /// Per-(member, player) exploration rates.
    pub fn per_member(epsilon: Array2<Probability>) -> Result<Self> {
        match epsilon.iter().find(|e| !(0.0..=1.0).contains(*e)) {
            Some(&value) => Err(Error::InvalidParameter {
                name: "epsilon",
                value,
                domain: "[0, 1]",
            }),
            None => Ok(Self {
                epsilon,
                tie: TieBreak::default(),
                schedule: Schedule::Constant,
            }),
        }
    }

    pub fn with_tie(mut self, tie: TieBreak) -> Self {
        self.tie = tie;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn epsilon(&self) -> &Array2<Probability> {
        &self.epsilon
    }
}

impl Policy for EpsilonGreedy {
    fn select(&self, agents: &Population, streams: &mut Streams) -> Result<Array2<Action>> {
        self.validate(agents.batch(), agents.spec().n_players())?;
        let spec = agents.spec();
        let q = agents.q();
        let mut actions = Array2::<Action>::zeros((agents.batch(), spec.n_players()));
        for b in 0..agents.batch() {
            let rng = streams.member(b);
            for p in 0..spec.n_players() {
                let k = spec.actions(p);
                let row = q.slice(s![b, p, agents.state(b, p), ..k]);
                let roll = rng.random::<Probability>();
                actions[[b, p]] = if roll < self.epsilon[[b, p]] {
                    rng.random_range(0..k)
                } else {
                    match self.tie {
                        TieBreak::First => argmax(row),
                        TieBreak::Random => {
                            let top = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                            let ties = row
                                .iter()
                                .enumerate()
                                .filter(|&(_, &v)| v == top)
                                .map(|(a, _)| a)
                                .collect::<Vec<_>>();
                            ties[rng.random_range(0..ties.len())]
                        }
                    }
                };
            }
        }
        Ok(actions)
    }

    fn validate(&self, batch: usize, players: usize) -> Result<()> {
        if self.epsilon.dim() != (batch, players) {
            return Err(Error::ConfigMismatch(format!(
                "epsilon shape {:?} for a ({}, {}) population",
                self.epsilon.dim(),
                batch,
                players
            )));
        }
        Ok(())
    }

    fn anneal(&mut self, round: usize, horizon: usize) {
        if let Some(value) = self.schedule.at(round, horizon) {
            self.epsilon.fill(value);
        }
    }
}
