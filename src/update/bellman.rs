use super::UpdateRule;
use crate::Action;
use crate::State;
use crate::Utility;
use crate::agents::Population;
use crate::error::Error;
use crate::error::Result;
use crate::stream::Streams;
use ndarray::Array2;
use ndarray::s;
use rand::Rng;

/// The one-step Bellman update for Q-learning.
///
/// For each (member, player):
///
/// ```text
/// Q[s, a] += alpha * (r + gamma * max Q[s', ·] - Q[s, a])
/// ```
///
/// Only the entry addressed by the chosen action moves. The selective
/// update is what makes this Q-learning rather than a full-table
/// smoother, and the tests pin it down bit-for-bit. Learning rates and
/// discounts are per-(member, player) arrays; stateless repeated games
/// conventionally run with `gamma = 0`.
#[derive(Debug, Clone)]
pub struct Bellman {
    alpha: Array2<Utility>,
    gamma: Array2<Utility>,
}

impl Bellman {
    /// The same learning rate and discount everywhere.
    pub fn uniform(batch: usize, players: usize, alpha: Utility, gamma: Utility) -> Result<Self> {
        Self::per_member(
            Array2::from_elem((batch, players), alpha),
            Array2::from_elem((batch, players), gamma),
        )
    }

    /// Per-(member, player) learning rates and discounts.
    pub fn per_member(alpha: Array2<Utility>, gamma: Array2<Utility>) -> Result<Self> {
        if alpha.dim() != gamma.dim() {
            return Err(Error::ConfigMismatch(format!(
                "alpha shape {:?} against gamma shape {:?}",
                alpha.dim(),
                gamma.dim()
            )));
        }
        if let Some(&value) = alpha.iter().find(|a| !(0.0..=1.0).contains(*a) || **a == 0.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                value,
                domain: "(0, 1]",
            });
        }
        if let Some(&value) = gamma.iter().find(|g| !(0.0..=1.0).contains(*g)) {
            return Err(Error::InvalidParameter {
                name: "gamma",
                value,
                domain: "[0, 1]",
            });
        }
        Ok(Self { alpha, gamma })
    }

    /// Learning rates drawn uniformly from `(0, 1]` per (member, player),
    /// one draw sequence per member stream.
    pub fn seeded_uniform(
        batch: usize,
        players: usize,
        gamma: Utility,
        streams: &mut Streams,
    ) -> Result<Self> {
        let mut alpha = Array2::<Utility>::zeros((batch, players));
        for b in 0..batch {
            let rng = streams.member(b);
            for p in 0..players {
                alpha[[b, p]] = 1.0 - rng.random::<Utility>();
            }
        }
        Self::per_member(alpha, Array2::from_elem((batch, players), gamma))
    }
}

impl UpdateRule for Bellman {
    fn update(
        &self,
        agents: &mut Population,
        actions: &Array2<Action>,
        rewards: &Array2<Utility>,
        next_states: &Array2<State>,
    ) -> Result<Utility> {
        let batch = agents.batch();
        let players = agents.spec().n_players();
        self.validate(batch, players)?;
        let spec = agents.spec().clone();
        let states = agents.states().clone();
        let q = agents.q_mut();
        let mut total = 0.0;
        for b in 0..batch {
            for p in 0..players {
                let k = spec.actions(p);
                let (s, a) = (states[[b, p]], actions[[b, p]]);
                let ahead = q
                    .slice(s![b, p, next_states[[b, p]], ..k])
                    .iter()
                    .cloned()
                    .fold(Utility::NEG_INFINITY, Utility::max);
                let held = q[[b, p, s, a]];
                let delta =
                    self.alpha[[b, p]] * (rewards[[b, p]] + self.gamma[[b, p]] * ahead - held);
                q[[b, p, s, a]] = held + delta;
                total += delta.abs();
            }
        }
        Ok(total)
    }

    fn validate(&self, batch: usize, players: usize) -> Result<()> {
        if self.alpha.dim() != (batch, players) {
            return Err(Error::ConfigMismatch(format!(
                "alpha shape {:?} for a ({}, {}) population",
                self.alpha.dim(),
                batch,
                players
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::QInit;
    use crate::game::GameSpec;

    fn population(batch: usize, players: usize, states: usize, width: usize) -> Population {
        let spec = GameSpec::uniform(players, width, states).unwrap();
        let mut streams = Streams::split(17, batch);
        Population::new(spec, batch, QInit::default(), &mut streams).unwrap()
    }

    #[test]
    fn touches_only_the_chosen_entry() {
        let mut streams = Streams::split(99, 1);
        let rule = Bellman::uniform(2, 3, 0.5, 0.9).unwrap();
        for trial in 0..64 {
            let mut pop = population(2, 3, 2, 4);
            let before = pop.q().clone();
            let rng = streams.member(0);
            let actions =
                Array2::from_shape_fn((2, 3), |_| rng.random_range(0..4usize));
            let rewards = Array2::from_shape_fn((2, 3), |_| rng.random::<Utility>() - 0.5);
            let next = Array2::from_shape_fn((2, 3), |_| rng.random_range(0..2usize));
            rule.update(&mut pop, &actions, &rewards, &next).unwrap();
            for ((b, p, s, a), &value) in pop.q().indexed_iter() {
                let chosen = s == pop.states()[[b, p]] && a == actions[[b, p]];
                if !chosen {
                    assert!(
                        value.to_bits() == before[[b, p, s, a]].to_bits(),
                        "trial {} moved untouched entry ({},{},{},{})",
                        trial,
                        b,
                        p,
                        s,
                        a
                    );
                }
            }
        }
    }

    #[test]
    fn update_equation_by_hand() {
        let spec = GameSpec::uniform(1, 2, 1).unwrap();
        let mut streams = Streams::split(0, 1);
        let mut pop =
            Population::new(spec, 1, QInit::Vector(vec![0.5, 1.0]), &mut streams).unwrap();
        let rule = Bellman::uniform(1, 1, 0.1, 0.9).unwrap();
        let actions = Array2::from_elem((1, 1), 0);
        let rewards = Array2::from_elem((1, 1), 2.0);
        let next = Array2::from_elem((1, 1), 0);
        let total = rule.update(&mut pop, &actions, &rewards, &next).unwrap();
        // delta = 0.1 * (2 + 0.9 * 1.0 - 0.5) = 0.24
        assert!((pop.q()[[0, 0, 0, 0]] - 0.74).abs() < 1e-6);
        assert!((pop.q()[[0, 0, 0, 1]] - 1.0).abs() < 1e-6);
        assert!((total - 0.24).abs() < 1e-6);
    }

    #[test]
    fn zero_gamma_ignores_lookahead() {
        let spec = GameSpec::uniform(1, 1, 1).unwrap();
        let mut streams = Streams::split(0, 1);
        let mut pop =
            Population::new(spec, 1, QInit::Vector(vec![0.0]), &mut streams).unwrap();
        let rule = Bellman::uniform(1, 1, 1.0, 0.0).unwrap();
        let actions = Array2::from_elem((1, 1), 0);
        let rewards = Array2::from_elem((1, 1), -3.0);
        let next = Array2::from_elem((1, 1), 0);
        rule.update(&mut pop, &actions, &rewards, &next).unwrap();
        // alpha = 1, gamma = 0: the entry becomes the reward itself
        assert!((pop.q()[[0, 0, 0, 0]] - -3.0).abs() < 1e-6);
    }

    #[test]
    fn parameter_domains_enforced() {
        assert!(matches!(
            Bellman::uniform(1, 1, 0.0, 0.0),
            Err(Error::InvalidParameter { name: "alpha", .. })
        ));
        assert!(matches!(
            Bellman::uniform(1, 1, 1.5, 0.0),
            Err(Error::InvalidParameter { name: "alpha", .. })
        ));
        assert!(matches!(
            Bellman::uniform(1, 1, 0.5, 1.1),
            Err(Error::InvalidParameter { name: "gamma", .. })
        ));
        assert!(Bellman::uniform(1, 1, 1.0, 1.0).is_ok());
    }

    #[test]
    fn seeded_alphas_are_valid_and_reproducible() {
        let mut a = Streams::split(5, 2);
        let mut b = Streams::split(5, 2);
        let x = Bellman::seeded_uniform(2, 3, 0.0, &mut a).unwrap();
        let y = Bellman::seeded_uniform(2, 3, 0.0, &mut b).unwrap();
        assert!(x.alpha == y.alpha);
        assert!(x.alpha.iter().all(|&v| 0.0 < v && v <= 1.0));
    }
}
