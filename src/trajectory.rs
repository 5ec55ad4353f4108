//! The recorded output of a simulation run.
//!
//! One [`Round`] per simulation round, append-only, serializable. This is
//! the sole contract the external plotting/analysis layer consumes:
//! welfare-over-time, action-distribution-over-time, and Q-value views
//! are all reconstructible from here without re-running anything.

use crate::Action;
use crate::Utility;
use crate::error::Result;
use ndarray::Array2;
use ndarray::Array4;
use ndarray::Axis;
use serde::Deserialize;
use serde::Serialize;

/// Welfare reductions over a round's reward rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Welfare {
    /// Mean reward per player.
    Average,
    /// Worst-off player.
    Min,
    /// Best-off player.
    Max,
}

/// One round's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Joint actions taken, shape `(batch, n_players)`.
    pub actions: Array2<Action>,
    /// Per-player rewards, shape `(batch, n_players)`.
    pub rewards: Array2<Utility>,
    /// Per-action utility table where the game exposes one, `(batch, width)`.
    pub utilities: Option<Array2<Utility>>,
    /// Action occupancy counts, shape `(batch, width)`.
    pub occupancy: Array2<usize>,
    /// Summed |belief update| across the batch this round.
    pub delta: Utility,
    /// Opt-in Q-table snapshot, shape `(batch, n_players, n_states, width)`.
    pub q: Option<Array4<Utility>>,
}

/// Append-only sequence of per-round snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    rounds: Vec<Round>,
}

impl Trajectory {
    pub(crate) fn push(&mut self, round: Round) {
        self.rounds.push(round);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Per-round, per-member welfare, shape `(rounds, batch)`.
    pub fn welfare(&self, kind: Welfare) -> Array2<Utility> {
        let batch = self.rounds.first().map_or(0, |r| r.rewards.nrows());
        let mut welfare = Array2::<Utility>::zeros((self.rounds.len(), batch));
        for (t, round) in self.rounds.iter().enumerate() {
            for (b, row) in round.rewards.axis_iter(Axis(0)).enumerate() {
                welfare[[t, b]] = match kind {
                    Welfare::Average => row.sum() / row.len() as Utility,
                    Welfare::Min => row.iter().cloned().fold(Utility::INFINITY, Utility::min),
                    Welfare::Max => row.iter().cloned().fold(Utility::NEG_INFINITY, Utility::max),
                };
            }
        }
        welfare
    }

    /// Whole-run divergence scan over rewards and any Q snapshots.
    /// Non-finite values signal a configuration problem worth inspecting,
    /// not an engine fault; the scan is cheap enough to run post-hoc on
    /// every trajectory.
    pub fn is_finite(&self) -> bool {
        self.rounds.iter().all(|round| {
            round.rewards.iter().all(|v| v.is_finite())
                && round
                    .q
                    .as_ref()
                    .is_none_or(|q| q.iter().all(|v| v.is_finite()))
        })
    }

    /// Serialize for the external plotting layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn round(rewards: Array2<Utility>) -> Round {
        let occupancy = Array2::zeros((rewards.nrows(), 2));
        Round {
            actions: Array2::zeros(rewards.raw_dim()),
            occupancy,
            rewards,
            utilities: None,
            delta: 0.0,
            q: None,
        }
    }

    #[test]
    fn welfare_reductions() {
        let mut trajectory = Trajectory::default();
        trajectory.push(round(arr2(&[[1.0, 3.0], [2.0, 2.0]])));
        let average = trajectory.welfare(Welfare::Average);
        let min = trajectory.welfare(Welfare::Min);
        let max = trajectory.welfare(Welfare::Max);
        assert!(average == arr2(&[[2.0, 2.0]]));
        assert!(min == arr2(&[[1.0, 2.0]]));
        assert!(max == arr2(&[[3.0, 2.0]]));
    }

    #[test]
    fn finiteness_scan() {
        let mut trajectory = Trajectory::default();
        trajectory.push(round(arr2(&[[1.0, 2.0]])));
        assert!(trajectory.is_finite());
        trajectory.push(round(arr2(&[[1.0, Utility::NAN]])));
        assert!(!trajectory.is_finite());
    }

    #[test]
    fn json_round_trip() {
        let mut trajectory = Trajectory::default();
        trajectory.push(round(arr2(&[[1.0, 2.0]])));
        let json = trajectory.to_json().unwrap();
        let back: Trajectory = serde_json::from_str(&json).unwrap();
        assert!(back == trajectory);
    }
}
