use super::Policy;
use super::softmax;
use crate::Action;
use crate::Entropy;
use crate::agents::Population;
use crate::error::Error;
use crate::error::Result;
use crate::stream::Streams;
use ndarray::Array2;
use ndarray::s;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Boltzmann (softmax) selection.
///
/// Actions are drawn proportionally to `exp(Q / τ)`. Temperature
/// approaching 0 approaches argmax selection; large temperatures
/// approach the uniform distribution. τ must be strictly positive; a
/// non-positive temperature has no defined distribution and fails at
/// construction rather than blowing up mid-run.
#[derive(Debug, Clone)]
pub struct Boltzmann {
    temperature: Array2<Entropy>,
}

impl Boltzmann {
    /// The same temperature for every member and player.
    pub fn uniform(batch: usize, players: usize, temperature: Entropy) -> Result<Self> {
        Self::per_member(Array2::from_elem((batch, players), temperature))
    }

    /// Per-(member, player) temperatures.
    pub fn per_member(temperature: Array2<Entropy>) -> Result<Self> {
        match temperature.iter().find(|t| !(**t > 0.0) || !t.is_finite()) {
            Some(&value) => Err(Error::InvalidParameter {
                name: "temperature",
                value,
                domain: "(0, inf)",
            }),
            None => Ok(Self { temperature }),
        }
    }
}

impl Policy for Boltzmann {
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
                let weights = softmax(row, self.temperature[[b, p]]);
                let dist = WeightedIndex::new(&weights).expect("softmax weights sum to one");
                actions[[b, p]] = dist.sample(rng);
            }
        }
        Ok(actions)
    }

    fn validate(&self, batch: usize, players: usize) -> Result<()> {
        if self.temperature.dim() != (batch, players) {
            return Err(Error::ConfigMismatch(format!(
                "temperature shape {:?} for a ({}, {}) population",
                self.temperature.dim(),
                batch,
                players
            )));
        }
        Ok(())
    }
}
