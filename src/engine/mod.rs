//! The engine: transition table, validation and the run loop.
//!
//! A [`StateMachine`] is configured synchronously, validated inside `run`,
//! and then driven by a single Tokio task that:
//!
//! 1. waits until the caller has read the previous state,
//! 2. takes the next event from the input channel,
//! 3. applies the transition bound to the current state,
//! 4. records any transition error and, when tracing, a trace record,
//! 5. publishes the new state on the output channel.
//!
//! Closing the input channel ends the run.

mod error;
mod machine;
mod table;
mod transition;
mod worker;

pub use error::ConfigError;
pub use machine::{Phase, StateMachine, Step, Termination};
pub use table::TransitionTable;
pub use transition::{Transition, TransitionError, TransitionFn, TransitionResult};
