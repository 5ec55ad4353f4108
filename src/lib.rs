//! Vectorized Q-learning dynamics in repeated games.
//!
//! A fixed game (routing network, minority game, duopoly, public goods, ...)
//! is combined with a per-agent action-selection policy and a Q-value update
//! rule, then advanced over a batch of independent simulation instances with
//! whole-array operations. Batch members never share state, so parameter
//! sweeps and Monte Carlo repetitions ride along the batch axis for free.
//!
//! The crate is a library: plotting, persistence, and sweep orchestration
//! live downstream and consume the [`trajectory::Trajectory`] contract.

pub mod agents;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod policy;
pub mod schedule;
pub mod stream;
#[cfg(feature = "harness")]
pub mod sweep;
pub mod trajectory;
pub mod update;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Rewards, Q-table entries, and expected values.
pub type Utility = f32;
/// Sampling weights and exploration rates.
pub type Probability = f32;
/// Temperature parameters for softmax policies.
pub type Entropy = f32;
/// Index into a player's action set.
pub type Action = usize;
/// Index into a game's finite state set.
pub type State = usize;

// ============================================================================
// EXPLORATION SCHEDULES
// ============================================================================
/// Divisor applied to the run horizon to obtain the exponential decay
/// constant of annealed exploration rates.
pub const DECAY_HORIZON_DIVISOR: f32 = 8.0;

// ============================================================================
// Q-TABLE INITIALIZATION
// ============================================================================
/// Lower bound of the default uniform random Q initialization.
pub const QINIT_MIN: Utility = 0.0;
/// Upper bound of the default uniform random Q initialization.
pub const QINIT_MAX: Utility = 1.0;

// ============================================================================
// SIMULATION DRIVER
// ============================================================================
/// Rounds between progress log messages during long runs.
pub const RUN_LOG_INTERVAL: usize = 1024;
/// Default number of consecutive quiet rounds before early termination.
pub const CONVERGENCE_WINDOW: usize = 64;
/// Default per-entry mean |belief update| below which a round counts as quiet.
pub const CONVERGENCE_TOLERANCE: Utility = 1e-4;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "harness")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
