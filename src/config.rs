//! Validated parameter bundles, one per game family.
//!
//! Each structure enumerates exactly the parameters its family needs and
//! rejects unknown or missing fields at deserialization time: a sweep
//! config with a typo'd field name dies with `ConfigMismatch` before any
//! simulation round runs, never silently. `build`-style methods produce
//! the validated game values the driver consumes.

use crate::CONVERGENCE_TOLERANCE;
use crate::CONVERGENCE_WINDOW;
use crate::Utility;
use crate::error::Result;
use crate::game::BraessAugmented;
use crate::game::BraessInitial;
use crate::game::Duopoly;
use crate::game::ElFarol;
use crate::game::Minority;
use crate::game::MinoritySym;
use crate::game::Pigou;
use crate::game::Pigou3;
use crate::game::PopulationGame;
use crate::game::PrisonersDilemma;
use crate::game::PublicGoods;
use crate::game::TwoRoute;
use serde::Deserialize;
use serde::Serialize;

/// Parse any config bundle from JSON, mapping serde rejection (unknown
/// fields, missing fields, wrong types) into `ConfigMismatch`.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}

/// Routing/congestion game family: Braess networks, Pigou networks, and
/// the parameterized two-route game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    pub n_agents: usize,
    pub cost: Utility,
}

impl RoutingConfig {
    pub fn braess_augmented(&self) -> Result<BraessAugmented> {
        BraessAugmented::new(self.n_agents, self.cost)
    }
    pub fn braess_initial(&self) -> Result<BraessInitial> {
        BraessInitial::new(self.n_agents)
    }
    pub fn two_route(&self) -> Result<TwoRoute> {
        TwoRoute::new(self.n_agents, self.cost)
    }
    pub fn pigou(&self) -> Result<Pigou> {
        Pigou::new(self.n_agents, self.cost)
    }
    pub fn pigou3(&self) -> Result<Pigou3> {
        Pigou3::new(self.n_agents)
    }
}

/// Minority game family, including the El Farol bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinorityConfig {
    pub n_agents: usize,
    pub threshold: Utility,
}

impl MinorityConfig {
    pub fn minority(&self) -> Result<Minority> {
        Minority::new(self.n_agents, self.threshold)
    }
    pub fn symmetric(&self) -> Result<MinoritySym> {
        MinoritySym::new(self.n_agents)
    }
    pub fn el_farol(&self) -> Result<ElFarol> {
        ElFarol::new(self.n_agents, self.threshold)
    }
}

/// Duopoly pricing on a discrete grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuopolyConfig {
    pub n_prices: usize,
}

impl DuopolyConfig {
    pub fn duopoly(&self) -> Result<Duopoly> {
        Duopoly::new(self.n_prices)
    }
}

/// Prisoner's dilemma payoff quadruple. Defaults to the classic
/// (5, 3, 1, 0) matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrisonersDilemmaConfig {
    pub temptation: Utility,
    pub reward: Utility,
    pub punishment: Utility,
    pub sucker: Utility,
}

impl Default for PrisonersDilemmaConfig {
    fn default() -> Self {
        Self {
            temptation: 5.0,
            reward: 3.0,
            punishment: 1.0,
            sucker: 0.0,
        }
    }
}

impl PrisonersDilemmaConfig {
    pub fn dilemma(&self) -> Result<PrisonersDilemma> {
        PrisonersDilemma::new(self.temptation, self.reward, self.punishment, self.sucker)
    }
}

/// The two-technology population game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopulationConfig {
    pub n_agents: usize,
    pub v: Utility,
    pub k: Utility,
    pub exponent: Utility,
    pub cost: Utility,
}

impl PopulationConfig {
    pub fn population(&self) -> Result<PopulationGame> {
        PopulationGame::new(self.n_agents, self.v, self.k, self.exponent, self.cost)
    }
}

/// Public goods game over a discrete contribution grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicGoodsConfig {
    pub n_agents: usize,
    pub n_actions: usize,
    pub multiplier: Utility,
    pub beta: Utility,
}

impl PublicGoodsConfig {
    pub fn public_goods(&self) -> Result<PublicGoods> {
        PublicGoods::new(self.n_agents, self.n_actions, self.multiplier, self.beta)
    }
}

/// Early-stop criterion: a full window of consecutive rounds whose mean
/// per-entry |belief update| stays under the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Convergence {
    pub window: usize,
    pub tolerance: Utility,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            window: CONVERGENCE_WINDOW,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}

/// Driver-level run parameters, shared across game families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Number of independent simulation instances advanced together.
    pub batch: usize,
    /// Round horizon.
    pub rounds: usize,
    /// Record a Q-table snapshot every round. Costly; off by default.
    #[serde(default)]
    pub record_q: bool,
    /// Optional early termination.
    #[serde(default)]
    pub convergence: Option<Convergence>,
}

impl RunConfig {
    pub fn new(batch: usize, rounds: usize) -> Self {
        Self {
            batch,
            rounds,
            record_q: false,
            convergence: None,
        }
    }

    pub fn with_snapshots(mut self) -> Self {
        self.record_q = true;
        self
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = Some(convergence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_multiplier_fails_before_any_round() {
        let json = r#"{"n_agents": 8, "n_actions": 4, "beta": 1.0}"#;
        assert!(matches!(
            from_json::<PublicGoodsConfig>(json),
            Err(Error::ConfigMismatch(_))
        ));
    }

    #[test]
    fn unknown_field_rejected() {
        let json = r#"{"n_agents": 8, "cost": 0.0, "shortcut": true}"#;
        assert!(matches!(
            from_json::<RoutingConfig>(json),
            Err(Error::ConfigMismatch(_))
        ));
    }

    #[test]
    fn well_formed_config_builds_its_game() {
        let json = r#"{"n_agents": 8, "n_actions": 4, "multiplier": 1.5, "beta": 1.0}"#;
        let config = from_json::<PublicGoodsConfig>(json).unwrap();
        assert!(config.public_goods().is_ok());
    }

    #[test]
    fn config_round_trip() {
        let config = RoutingConfig { n_agents: 100, cost: 0.25 };
        let json = serde_json::to_string(&config).unwrap();
        assert!(from_json::<RoutingConfig>(&json).unwrap() == config);
    }

    #[test]
    fn run_config_defaults() {
        let config = from_json::<RunConfig>(r#"{"batch": 4, "rounds": 100}"#).unwrap();
        assert!(!config.record_q);
        assert!(config.convergence.is_none());
    }
}
