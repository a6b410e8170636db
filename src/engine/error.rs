//! Configuration errors reported before a machine starts.

use thiserror::Error;

/// Errors that prevent a state machine from running.
///
/// These are detected synchronously, before any worker exists. None of them
/// is worth retrying until the machine has been reconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Initial state not specified. Call set_initial_state(state) before run")]
    NoInitialState,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition table is incomplete, no transition for: {}", missing.join(", "))]
    IncompleteTransitionTable { missing: Vec<String> },

    #[error("Machine has already been started. Call reset() before running it again")]
    AlreadyStarted,

    #[error("Machine is still running. Close its input channel before reset()")]
    StillRunning,

    #[error("No async runtime available. Call run() from within a Tokio runtime")]
    NoRuntime,
}
