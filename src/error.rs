use crate::Action;

/// Engine errors, raised synchronously at the point of violation.
///
/// The engine never clamps a malformed parameter or retries a failed
/// round: a silently "fixed" input would corrupt the statistical result
/// the simulation exists to produce.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An action index outside its player's valid range reached the engine.
    #[error("invalid action {action} for player {player} with {bound} actions")]
    InvalidAction {
        player: usize,
        action: Action,
        bound: usize,
    },
    /// A learning parameter outside its valid domain.
    #[error("invalid parameter {name} = {value}, expected {domain}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        domain: &'static str,
    },
    /// A configuration object or population shape disagrees with its game.
    #[error("configuration mismatch: {0}")]
    ConfigMismatch(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigMismatch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
