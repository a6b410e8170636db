//! Lockstep: an embeddable finite state machine engine.
//!
//! A machine is a set of states, an initial state and one transition function
//! per state. Running it spawns a single worker that consumes events from a
//! channel and publishes the resulting states on another, one state per
//! event, never running ahead of the caller.
//!
//! # Core Concepts
//!
//! - **State**: Small comparable identifiers via the `State` trait
//! - **Event**: Opaque caller payloads wrapped in `Event<T>`
//! - **Transition**: Per-state functions returning the next state, possibly
//!   with an error
//! - **Trace**: Optional per-event records handed to a `TraceSink`
//!
//! # Example
//!
//! ```rust
//! use lockstep::builder::{event_table, StateMachineBuilder};
//! use lockstep::core::Event;
//! use lockstep::state_enum;
//! use tokio::sync::mpsc;
//!
//! state_enum! {
//!     enum Turnstile {
//!         Locked,
//!         Unlocked,
//!         Broken,
//!     }
//!     error: [Broken]
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut machine = StateMachineBuilder::new()
//!     .initial(Turnstile::Locked)
//!     .states([Turnstile::Locked, Turnstile::Unlocked])
//!     .transition(
//!         Turnstile::Locked,
//!         event_table([("coin", Turnstile::Unlocked), ("push", Turnstile::Locked)], Turnstile::Broken),
//!     )
//!     .transition(
//!         Turnstile::Unlocked,
//!         event_table([("coin", Turnstile::Unlocked), ("push", Turnstile::Locked)], Turnstile::Broken),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let (events, input) = mpsc::channel(1);
//! let mut states = machine.run(input).unwrap();
//!
//! events.send(Event("coin")).await.unwrap();
//! assert_eq!(states.recv().await, Some(Turnstile::Unlocked));
//! events.send(Event("push")).await.unwrap();
//! assert_eq!(states.recv().await, Some(Turnstile::Locked));
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use config::RunConfig;
pub use crate::core::{Event, State, StateId, TraceLog, TraceRecord, TraceSink, TracingSink};
pub use engine::{
    ConfigError, Phase, StateMachine, Step, Termination, Transition, TransitionError,
    TransitionResult,
};
