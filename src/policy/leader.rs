use super::Policy;
use super::argmax;
use super::softmax;
use crate::Action;
use crate::Entropy;
use crate::Utility;
use crate::agents::Population;
use crate::error::Error;
use crate::error::Result;
use crate::stream::Streams;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::s;

/// Follow-the-regularized-leader selection.
///
/// Takes the argmax of `Q - softmax(Q / τ)`: the softmax term penalizes
/// actions the current beliefs already concentrate on, which keeps the
/// leader from locking in prematurely. Fully deterministic: consumes no
/// entropy from the streams.
#[derive(Debug, Clone)]
pub struct RegularizedLeader {
    temperature: Array2<Entropy>,
}

impl RegularizedLeader {
    pub fn uniform(batch: usize, players: usize, temperature: Entropy) -> Result<Self> {
        Self::per_member(Array2::from_elem((batch, players), temperature))
    }

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

impl Policy for RegularizedLeader {
    fn select(&self, agents: &Population, _: &mut Streams) -> Result<Array2<Action>> {
        self.validate(agents.batch(), agents.spec().n_players())?;
        let spec = agents.spec();
        let q = agents.q();
        let mut actions = Array2::<Action>::zeros((agents.batch(), spec.n_players()));
        for b in 0..agents.batch() {
            for p in 0..spec.n_players() {
                let k = spec.actions(p);
                let row = q.slice(s![b, p, agents.state(b, p), ..k]);
                let regularizer = softmax(row, self.temperature[[b, p]]);
                let regularized = Array1::<Utility>::from_iter(
                    row.iter().zip(regularizer.iter()).map(|(&v, &r)| v - r),
                );
                actions[[b, p]] = argmax(regularized.view());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::QInit;
    use crate::game::GameSpec;

    #[test]
    fn deterministic_and_regularized() {
        let spec = GameSpec::uniform(1, 2, 1).unwrap();
        let mut streams = Streams::split(3, 1);
        // Q = [1.0, 0.9] at tau = 1: softmax ~ [0.525, 0.475], so the
        // regularized values are [0.475, 0.425] and action 0 still leads.
        let pop = Population::new(spec, 1, QInit::Vector(vec![1.0, 0.9]), &mut streams).unwrap();
        let policy = RegularizedLeader::uniform(1, 1, 1.0).unwrap();
        let first = policy.select(&pop, &mut streams).unwrap();
        let second = policy.select(&pop, &mut streams).unwrap();
        assert!(first == second);
        assert!(first[[0, 0]] == 0);
    }

    #[test]
    fn regularizer_can_flip_a_narrow_lead() {
        let spec = GameSpec::uniform(1, 2, 1).unwrap();
        let mut streams = Streams::split(3, 1);
        // Q = [1.00, 0.98] at low tau: softmax ~ [1, 0] pushes the raw
        // leader below the runner-up.
        let pop = Population::new(spec, 1, QInit::Vector(vec![1.0, 0.98]), &mut streams).unwrap();
        let policy = RegularizedLeader::uniform(1, 1, 0.005).unwrap();
        let actions = policy.select(&pop, &mut streams).unwrap();
        assert!(actions[[0, 0]] == 1);
    }

    #[test]
    fn non_positive_temperature_rejected() {
        assert!(matches!(
            RegularizedLeader::uniform(1, 1, 0.0),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
