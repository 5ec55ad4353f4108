use crate::DECAY_HORIZON_DIVISOR;
use crate::Probability;

/// Annealing schedules for exploration parameters.
///
/// Applied between rounds by the policy's `anneal` hook; the core update
/// semantics never see them. The decay constant is `horizon / 8`, so an
/// annealed run spends its early eighth exploring and the rest converging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// Leave the parameter wherever it was set.
    Constant,
    /// `end + (start − end) · exp(−t / (horizon / 8))`.
    ExponentialDecay { start: Probability, end: Probability },
}

impl Schedule {
    /// The scheduled value at round `t` of a run with the given horizon.
    /// `None` for `Constant`, which never overrides the parameter.
    pub fn at(&self, t: usize, horizon: usize) -> Option<Probability> {
        match self {
            Self::Constant => None,
            Self::ExponentialDecay { start, end } => {
                let decay = horizon as Probability / DECAY_HORIZON_DIVISOR;
                Some(end + (start - end) * (-(t as Probability) / decay).exp())
            }
        }
    }
}
