//! Core State trait for machine states.
//!
//! States are small opaque identifiers. The engine compares them, hashes
//! them into its transition table, and hands them back to the caller; it
//! never looks inside.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the worker publishes a copy of every state it adopts
/// - `Eq` + `Hash`: states key the transition table
/// - `Debug`: states show up in trace records and logs
/// - `Serialize` + `Deserialize`: trace records are serializable
///
/// # Reserved sentinels
///
/// Two kinds of states have special meaning to the engine:
///
/// - *unknown* (`is_unknown`): never a legal operating state. A machine whose
///   initial state is unknown refuses to run.
/// - *error* (`is_error`): what a transition returns when it cannot handle an
///   event. Purely informational to the engine; failed transitions are
///   adopted like any other.
///
/// # Example
///
/// ```rust
/// use lockstep::core::State;
/// use serde::{Deserialize, Serialize};
/// use std::borrow::Cow;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Jammed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> Cow<'_, str> {
///         match self {
///             Self::Open => "Open".into(),
///             Self::Closed => "Closed".into(),
///             Self::Jammed => "Jammed".into(),
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// assert!(Door::Jammed.is_error());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> Cow<'_, str>;

    /// Check if this is a final (terminal) state.
    ///
    /// Combined with the machine's own final-state set when deciding whether
    /// a run halts on this state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Check if this is the unknown sentinel.
    ///
    /// Default implementation returns `false`.
    fn is_unknown(&self) -> bool {
        false
    }
}

/// Integer state identifier with the reserved sentinels built in.
///
/// Handy when states are numbered rather than named:
///
/// ```rust
/// use lockstep::core::{State, StateId};
///
/// const FIRST: StateId = StateId::new(1);
///
/// assert!(StateId::UNKNOWN.is_unknown());
/// assert!(StateId::ERROR.is_error());
/// assert_eq!(FIRST.name(), "q1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl StateId {
    /// No state configured. Never a legal operating state.
    pub const UNKNOWN: StateId = StateId(0);

    /// Transition failure.
    pub const ERROR: StateId = StateId(u32::MAX);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl State for StateId {
    fn name(&self) -> Cow<'_, str> {
        match *self {
            Self::UNKNOWN => Cow::Borrowed("UNKNOWN"),
            Self::ERROR => Cow::Borrowed("ERROR"),
            Self(id) => Cow::Owned(format!("q{id}")),
        }
    }

    fn is_error(&self) -> bool {
        *self == Self::ERROR
    }

    fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl From<u32> for StateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
