//! The time-stepping simulation driver.
//!
//! `INITIALIZED → RUNNING → (select → evaluate → update → record) →
//! COMPLETED | FAILED`. Rounds are strictly sequential (round `t + 1`'s
//! selection reads round `t`'s updated Q-tables) while everything inside
//! a round advances the whole batch through array-wide operations. A
//! failing round leaves the driver in `FAILED` with every previously
//! recorded round intact and inspectable.

use crate::RUN_LOG_INTERVAL;
use crate::Utility;
use crate::agents::Population;
use crate::config::RunConfig;
use crate::error::Error;
use crate::error::Result;
use crate::game::Game;
use crate::game::occupancy;
use crate::policy::Policy;
use crate::stream::Streams;
use crate::trajectory::Round;
use crate::trajectory::Trajectory;
use crate::update::UpdateRule;

/// Driver lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Initialized,
    Running,
    Completed,
    Failed,
}

/// One batched simulation: a game, a population, a policy, an update
/// rule, and the streams that feed them.
///
/// All cross-component shape agreements are checked at construction, so
/// a malformed setup dies with `ConfigMismatch` before the first round.
pub struct Simulation<G, P, U> {
    game: G,
    policy: P,
    rule: U,
    agents: Population,
    streams: Streams,
    config: RunConfig,
    status: Status,
    trajectory: Trajectory,
}

impl<G, P, U> Simulation<G, P, U>
where
    G: Game,
    P: Policy,
    U: UpdateRule,
{
    pub fn new(
        game: G,
        agents: Population,
        policy: P,
        rule: U,
        streams: Streams,
        config: RunConfig,
    ) -> Result<Self> {
        if config.batch == 0 || config.rounds == 0 {
            return Err(Error::ConfigMismatch(format!(
                "degenerate run: batch {}, rounds {}",
                config.batch, config.rounds
            )));
        }
        if agents.spec() != game.spec() {
            return Err(Error::ConfigMismatch(format!(
                "population built for {:?} but game is {:?}",
                agents.spec(),
                game.spec()
            )));
        }
        if agents.batch() != config.batch {
            return Err(Error::ConfigMismatch(format!(
                "population batch {} against configured batch {}",
                agents.batch(),
                config.batch
            )));
        }
        if streams.len() != config.batch {
            return Err(Error::ConfigMismatch(format!(
                "{} streams for a batch of {}",
                streams.len(),
                config.batch
            )));
        }
        let players = game.spec().n_players();
        policy.validate(config.batch, players)?;
        rule.validate(config.batch, players)?;
        Ok(Self {
            game,
            policy,
            rule,
            agents,
            streams,
            config,
            status: Status::Initialized,
            trajectory: Trajectory::default(),
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn agents(&self) -> &Population {
        &self.agents
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// Run until the horizon, early convergence, or failure.
    pub fn run(&mut self) -> Result<()> {
        if self.status != Status::Initialized {
            return Err(Error::ConfigMismatch(format!(
                "simulation already ran to {:?}",
                self.status
            )));
        }
        self.status = Status::Running;
        log::info!(
            "running {} rounds, batch of {}, {} players",
            self.config.rounds,
            self.config.batch,
            self.agents.spec().n_players(),
        );
        let entries = (self.config.batch * self.agents.spec().n_players()) as Utility;
        let mut quiet = 0usize;
        for t in 0..self.config.rounds {
            let delta = match self.round(t) {
                Ok(delta) => delta,
                Err(e) => {
                    self.status = Status::Failed;
                    log::warn!("round {} failed: {}", t, e);
                    return Err(e);
                }
            };
            if (t + 1) % RUN_LOG_INTERVAL == 0 {
                log::debug!("round {:>8} mean |update| {:.3e}", t + 1, delta / entries);
            }
            if let Some(convergence) = self.config.convergence {
                quiet = if delta / entries < convergence.tolerance {
                    quiet + 1
                } else {
                    0
                };
                if quiet >= convergence.window {
                    log::info!("converged after {} rounds", t + 1);
                    break;
                }
            }
        }
        self.status = Status::Completed;
        Ok(())
    }

    /// One round: select, evaluate, update, record.
    fn round(&mut self, t: usize) -> Result<Utility> {
        self.policy.anneal(t, self.config.rounds);
        let actions = self.policy.select(&self.agents, &mut self.streams)?;
        let step = self
            .game
            .payoff(actions.view(), self.agents.states().view())?;
        let next = match step.next_states {
            Some(next) => next,
            None => self.agents.states().clone(),
        };
        let delta = self
            .rule
            .update(&mut self.agents, &actions, &step.rewards, &next)?;
        self.agents.set_states(next)?;
        let counts = occupancy(actions.view(), self.agents.spec().width());
        self.trajectory.push(Round {
            occupancy: counts,
            rewards: step.rewards,
            utilities: step.utilities,
            q: self.config.record_q.then(|| self.agents.q().clone()),
            actions,
            delta,
        });
        Ok(delta)
    }
}
