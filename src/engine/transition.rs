//! Per-state transition functions.

use crate::core::{Event, State};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Result of executing a transition.
///
/// A failed transition still names the state to adopt; failures are data,
/// not control flow.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionResult<S: State> {
    /// Transition succeeded, move to new state
    Success(S),

    /// Transition could not handle the event
    Failed { state: S, error: TransitionError },
}

impl<S: State> TransitionResult<S> {
    pub fn to(state: S) -> Self {
        Self::Success(state)
    }

    pub fn fail(state: S, error: TransitionError) -> Self {
        Self::Failed { state, error }
    }

    /// Shorthand for the common "event outside my domain" failure.
    pub fn unrecognized<T: Debug>(state: S, event: &Event<T>) -> Self {
        Self::Failed {
            state,
            error: TransitionError::UnrecognizedEvent {
                event: format!("{:?}", event.payload()),
            },
        }
    }

    pub fn state(&self) -> &S {
        match self {
            Self::Success(state) | Self::Failed { state, .. } => state,
        }
    }

    pub fn error(&self) -> Option<&TransitionError> {
        match self {
            Self::Success(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn into_parts(self) -> (S, Option<TransitionError>) {
        match self {
            Self::Success(state) => (state, None),
            Self::Failed { state, error } => (state, Some(error)),
        }
    }
}

impl<S: State> From<S> for TransitionResult<S> {
    fn from(state: S) -> Self {
        Self::Success(state)
    }
}

/// Errors reported by transition functions
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("Unrecognized event {event}")]
    UnrecognizedEvent { event: String },

    #[error("No transition available from state '{from}'")]
    NoTransition { from: String },

    #[error("Transition rejected: {0}")]
    Rejected(String),
}

/// Type alias for the boxed transition function.
pub type TransitionFn<S, T> = Arc<dyn Fn(&Event<T>) -> TransitionResult<S> + Send + Sync>;

/// The function bound to one state of the machine.
///
/// It behaves as if it closes over the state it is bound to: the engine only
/// passes the event. Use [`Transition::bound`] when the function wants the
/// state handed to it explicitly.
pub struct Transition<S: State, T> {
    func: TransitionFn<S, T>,
}

impl<S: State, T> Transition<S, T> {
    /// Create a fallible transition.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Event<T>) -> TransitionResult<S> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Create a transition that never fails.
    pub fn total<F>(func: F) -> Self
    where
        F: Fn(&Event<T>) -> S + Send + Sync + 'static,
    {
        Self::new(move |event| TransitionResult::Success(func(event)))
    }

    /// Create a transition from a `(state, event)` function, closing over
    /// `state`.
    pub fn bound<F>(state: S, func: F) -> Self
    where
        F: Fn(&S, &Event<T>) -> TransitionResult<S> + Send + Sync + 'static,
    {
        Self::new(move |event| func(&state, event))
    }

    /// Create a transition that ignores the event and always moves to `to`.
    pub fn constant(to: S) -> Self {
        Self::new(move |_| TransitionResult::Success(to.clone()))
    }

    pub fn apply(&self, event: &Event<T>) -> TransitionResult<S> {
        (self.func)(event)
    }
}

impl<S: State, T> Clone for Transition<S, T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<S: State, T> Debug for Transition<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;

    const Q0: StateId = StateId::new(1);
    const Q1: StateId = StateId::new(2);

    #[test]
    fn total_transition_always_succeeds() {
        let transition: Transition<StateId, u8> =
            Transition::total(|e| if *e.payload() > 5 { Q1 } else { Q0 });

        assert_eq!(transition.apply(&Event(9)), TransitionResult::Success(Q1));
        assert_eq!(transition.apply(&Event(1)), TransitionResult::Success(Q0));
    }

    #[test]
    fn bound_transition_sees_its_state() {
        let transition: Transition<StateId, u32> = Transition::bound(Q1, |state, e| {
            TransitionResult::to(StateId::new(state.id() + e.payload()))
        });

        assert_eq!(transition.apply(&Event(3)).state(), &StateId::new(5));
    }

    #[test]
    fn constant_transition_ignores_event() {
        let transition: Transition<StateId, &str> = Transition::constant(Q1);
        assert_eq!(transition.apply(&Event("anything")).state(), &Q1);
    }

    #[test]
    fn unrecognized_formats_the_payload() {
        let result = TransitionResult::unrecognized(StateId::ERROR, &Event('x'));

        assert_eq!(result.state(), &StateId::ERROR);
        assert_eq!(
            result.error().map(ToString::to_string),
            Some("Unrecognized event 'x'".to_string())
        );
    }

    #[test]
    fn into_parts_splits_state_and_error() {
        let (state, error) = TransitionResult::to(Q0).into_parts();
        assert_eq!(state, Q0);
        assert!(error.is_none());

        let (state, error) =
            TransitionResult::fail(Q1, TransitionError::Rejected("busy".into())).into_parts();
        assert_eq!(state, Q1);
        assert_eq!(error, Some(TransitionError::Rejected("busy".into())));
    }

    #[test]
    fn clones_share_the_function() {
        let transition: Transition<StateId, ()> = Transition::constant(Q1);
        let cloned = transition.clone();
        assert_eq!(cloned.apply(&Event(())), transition.apply(&Event(())));
    }
}
