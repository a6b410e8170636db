//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder, the `state_enum!` macro and a few
//! ready-made transition shapes.

pub mod machine;
pub mod macros;

pub use machine::StateMachineBuilder;

use crate::core::{Event, State};
use crate::engine::{Transition, TransitionResult};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Create a transition from an event → state lookup table.
///
/// Events missing from the table move the machine to `error_state` and
/// report [`TransitionError::UnrecognizedEvent`](crate::engine::TransitionError::UnrecognizedEvent).
///
/// # Example
///
/// ```
/// use lockstep::builder::event_table;
/// use lockstep::core::Event;
/// use lockstep::state_enum;
///
/// state_enum! {
///     enum Gate {
///         Locked,
///         Unlocked,
///         Fault,
///     }
///     error: [Fault]
/// }
///
/// let locked = event_table([("coin", Gate::Unlocked), ("push", Gate::Locked)], Gate::Fault);
///
/// assert_eq!(locked.apply(&Event("coin")).state(), &Gate::Unlocked);
/// assert_eq!(locked.apply(&Event("kick")).state(), &Gate::Fault);
/// assert!(locked.apply(&Event("kick")).error().is_some());
/// ```
pub fn event_table<S, T, I>(pairs: I, error_state: S) -> Transition<S, T>
where
    S: State,
    T: Eq + Hash + Debug + Send + Sync + 'static,
    I: IntoIterator<Item = (T, S)>,
{
    let table: HashMap<T, S> = pairs.into_iter().collect();
    Transition::new(move |event: &Event<T>| match table.get(event.payload()) {
        Some(state) => TransitionResult::Success(state.clone()),
        None => TransitionResult::unrecognized(error_state.clone(), event),
    })
}

/// Create a transition that stays in `state` on every event.
pub fn self_loop<S: State, T>(state: S) -> Transition<S, T> {
    Transition::constant(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;
    use crate::engine::TransitionError;

    const Q0: StateId = StateId::new(1);
    const Q1: StateId = StateId::new(2);

    #[test]
    fn event_table_maps_known_events() {
        let transition = event_table([('a', Q0), ('b', Q1)], StateId::ERROR);

        assert_eq!(transition.apply(&Event('a')), TransitionResult::Success(Q0));
        assert_eq!(transition.apply(&Event('b')), TransitionResult::Success(Q1));
    }

    #[test]
    fn event_table_rejects_unknown_events() {
        let transition = event_table([('a', Q0)], StateId::ERROR);

        assert_eq!(
            transition.apply(&Event('z')),
            TransitionResult::Failed {
                state: StateId::ERROR,
                error: TransitionError::UnrecognizedEvent {
                    event: "'z'".to_string()
                },
            }
        );
    }

    #[test]
    fn self_loop_never_moves() {
        let transition = self_loop::<StateId, u8>(Q1);
        assert_eq!(transition.apply(&Event(4)).state(), &Q1);
    }
}
