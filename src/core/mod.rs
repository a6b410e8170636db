//! Core state machine types.
//!
//! This module contains the data model shared by every part of the engine:
//! - States via the `State` trait (and the ready-made `StateId`)
//! - The `Event` wrapper around caller payloads
//! - Trace records and the sinks that receive them

mod event;
mod state;
mod trace;

pub use event::Event;
pub use state::{State, StateId};
pub use trace::{TraceLog, TraceRecord, TraceSink, TracingSink};
