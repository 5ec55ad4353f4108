//! The agent population state: the array-shaped container behind every run.
//!
//! All learned state lives here as one `(batch, player, state, action)`
//! Q-table plus one `(batch, player)` state row per member. Batch members
//! never read or write each other's slice; every mutation below operates
//! member-row by member-row, which is the invariant that lets independent
//! experiments share one simulation loop.

use crate::QINIT_MAX;
use crate::QINIT_MIN;
use crate::State;
use crate::Utility;
use crate::error::Error;
use crate::error::Result;
use crate::game::GameSpec;
use crate::stream::Streams;
use ndarray::Array2;
use ndarray::Array4;
use rand::Rng;

/// Q-table initialization schemes.
///
/// `Uniform` draws from the member streams so initialization is as
/// reproducible and batch-isolated as everything else; the diagonal
/// schemes seed beliefs that agree (or deliberately disagree) with the
/// state index, which the original experiments used to probe basins of
/// attraction.
#[derive(Debug, Clone)]
pub enum QInit {
    /// Every entry set to the same value.
    Constant(Utility),
    /// Independent uniform draws in `[min, max)` per entry.
    Uniform { min: Utility, max: Utility },
    /// One value per action, broadcast over batch, players, and states.
    Vector(Vec<Utility>),
    /// `-1` where action == state, `-2` elsewhere. Requires the state
    /// and action sets to have equal size.
    Aligned,
    /// `-1` where action == state - 1 (mod width), `-2` elsewhere.
    Misaligned,
    /// A full explicit table, shape-checked against the population.
    Explicit(Array4<Utility>),
}

impl Default for QInit {
    fn default() -> Self {
        Self::Uniform {
            min: QINIT_MIN,
            max: QINIT_MAX,
        }
    }
}

/// Q-tables, current states, and the spec they must agree with.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    spec: GameSpec,
    q: Array4<Utility>,
    states: Array2<State>,
}

impl Population {
    /// Allocate and initialize a population of `batch` independent members.
    pub fn new(spec: GameSpec, batch: usize, init: QInit, streams: &mut Streams) -> Result<Self> {
        if batch == 0 {
            return Err(Error::ConfigMismatch("batch size must be positive".to_string()));
        }
        if streams.len() != batch {
            return Err(Error::ConfigMismatch(format!(
                "{} streams for a batch of {}",
                streams.len(),
                batch
            )));
        }
        let shape = (batch, spec.n_players(), spec.n_states(), spec.width());
        let q = match init {
            QInit::Constant(v) => {
                if !v.is_finite() {
                    return Err(Error::InvalidParameter {
                        name: "qinit",
                        value: v,
                        domain: "a finite real",
                    });
                }
                Array4::from_elem(shape, v)
            }
            QInit::Uniform { min, max } => {
                if !(min < max) || !min.is_finite() || !max.is_finite() {
                    return Err(Error::InvalidParameter {
                        name: "qinit range",
                        value: max - min,
                        domain: "finite min < max",
                    });
                }
                let mut q = Array4::zeros(shape);
                for b in 0..batch {
                    let rng = streams.member(b);
                    for v in q.index_axis_mut(ndarray::Axis(0), b).iter_mut() {
                        *v = min + (max - min) * rng.random::<Utility>();
                    }
                }
                q
            }
            QInit::Vector(values) => {
                if values.len() != spec.width() {
                    return Err(Error::ConfigMismatch(format!(
                        "{} initial values for {} actions",
                        values.len(),
                        spec.width()
                    )));
                }
                Array4::from_shape_fn(shape, |(_, _, _, a)| values[a])
            }
            QInit::Aligned => {
                if spec.n_states() != spec.width() {
                    return Err(Error::ConfigMismatch(format!(
                        "aligned init needs square state/action sets, got {}x{}",
                        spec.n_states(),
                        spec.width()
                    )));
                }
                Array4::from_shape_fn(shape, |(_, _, s, a)| if a == s { -1.0 } else { -2.0 })
            }
            QInit::Misaligned => {
                if spec.n_states() != spec.width() {
                    return Err(Error::ConfigMismatch(format!(
                        "misaligned init needs square state/action sets, got {}x{}",
                        spec.n_states(),
                        spec.width()
                    )));
                }
                let k = spec.width();
                Array4::from_shape_fn(shape, |(_, _, s, a)| {
                    if a == (s + k - 1) % k { -1.0 } else { -2.0 }
                })
            }
            QInit::Explicit(q) => {
                if q.dim() != shape {
                    return Err(Error::ConfigMismatch(format!(
                        "explicit Q shape {:?} does not match {:?}",
                        q.dim(),
                        shape
                    )));
                }
                q
            }
        };
        Ok(Self {
            states: Array2::zeros((batch, spec.n_players())),
            spec,
            q,
        })
    }

    pub fn spec(&self) -> &GameSpec {
        &self.spec
    }

    pub fn batch(&self) -> usize {
        self.q.dim().0
    }

    pub fn q(&self) -> &Array4<Utility> {
        &self.q
    }

    pub(crate) fn q_mut(&mut self) -> &mut Array4<Utility> {
        &mut self.q
    }

    pub fn states(&self) -> &Array2<State> {
        &self.states
    }

    pub fn state(&self, b: usize, p: usize) -> State {
        self.states[[b, p]]
    }

    /// Replace current states with the game's transition output.
    pub(crate) fn set_states(&mut self, states: Array2<State>) -> Result<()> {
        if states.dim() != self.states.dim() {
            return Err(Error::ConfigMismatch(format!(
                "state array shape {:?} does not match {:?}",
                states.dim(),
                self.states.dim()
            )));
        }
        if let Some(&s) = states.iter().find(|&&s| s >= self.spec.n_states()) {
            return Err(Error::ConfigMismatch(format!(
                "game produced state {} outside {} states",
                s,
                self.spec.n_states()
            )));
        }
        self.states = states;
        Ok(())
    }

    /// Cheap post-hoc divergence check over every Q entry.
    pub fn is_finite(&self) -> bool {
        self.q.iter().all(|v| v.is_finite())
    }

    /// Average each player's Q-table with its `neighborhood` ring
    /// predecessors along the player axis, within each batch member.
    ///
    /// `neighborhood = 1` is the identity; the ring never crosses the
    /// batch axis.
    pub fn average_neighbors(&mut self, neighborhood: usize) -> Result<()> {
        let n = self.spec.n_players();
        if neighborhood == 0 || neighborhood > n {
            return Err(Error::InvalidParameter {
                name: "neighborhood",
                value: neighborhood as f32,
                domain: "1..=n_players",
            });
        }
        let (batch, _, s, a) = self.q.dim();
        let mut mixed = Array4::<Utility>::zeros((batch, n, s, a));
        for i in 0..neighborhood {
            for p in 0..n {
                let from = (p + n - i) % n;
                let source = self.q.slice(ndarray::s![.., from, .., ..]).to_owned();
                let mut target = mixed.slice_mut(ndarray::s![.., p, .., ..]);
                target += &source;
            }
        }
        mixed /= neighborhood as Utility;
        self.q = mixed;
        Ok(())
    }
}
