//! Builder for constructing state machines.

use crate::config::RunConfig;
use crate::core::{Event, State, TraceSink};
use crate::engine::{ConfigError, StateMachine, Transition, TransitionResult};
use std::fmt::Debug;
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// `build` runs the same validation as `StateMachine::run`, so a built
/// machine is ready to run.
pub struct StateMachineBuilder<S: State, T> {
    machine: StateMachine<S, T>,
}

impl<S: State, T: Debug + Send + 'static> StateMachineBuilder<S, T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.machine.set_initial_state(state);
        self
    }

    pub fn state(mut self, state: S) -> Self {
        self.machine.add_state(state);
        self
    }

    /// Add multiple states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        for state in states {
            self.machine.add_state(state);
        }
        self
    }

    pub fn final_state(mut self, state: S) -> Self {
        self.machine.add_final_state(state);
        self
    }

    pub fn event(mut self, event: impl Into<Event<T>>) -> Self {
        self.machine.add_event(event.into());
        self
    }

    /// Bind a pre-built transition to `state`.
    pub fn transition(mut self, state: S, transition: Transition<S, T>) -> Self {
        self.machine.set_transition(state, transition);
        self
    }

    /// Bind a closure to `state`.
    pub fn on<F>(mut self, state: S, func: F) -> Self
    where
        F: Fn(&Event<T>) -> TransitionResult<S> + Send + Sync + 'static,
    {
        self.machine.on(state, func);
        self
    }

    pub fn trace(self, enabled: bool) -> Self {
        self.machine.set_trace(enabled);
        self
    }

    pub fn trace_sink<K>(mut self, sink: K) -> Self
    where
        K: TraceSink<S, T> + 'static,
    {
        self.machine.set_trace_sink(sink);
        self
    }

    pub fn halt_on_final(mut self, enabled: bool) -> Self {
        self.machine.set_halt_on_final(enabled);
        self
    }

    pub fn config(mut self, config: RunConfig) -> Self {
        self.machine.apply_config(&config);
        self
    }

    /// Build the state machine.
    /// Returns the first configuration problem found, if any.
    pub fn build(self) -> Result<StateMachine<S, T>, ConfigError> {
        if let Validation::Failure(errors) = self.machine.validate() {
            if let Some(first) = errors.iter().next() {
                return Err(first.clone());
            }
        }
        Ok(self.machine)
    }
}

impl<S: State, T: Debug + Send + 'static> Default for StateMachineBuilder<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TraceLog;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
        final: [Complete]
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<TestState, ()>::new().build();

        assert!(matches!(result, Err(ConfigError::NoInitialState)));
    }

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::<TestState, ()>::new()
            .initial(TestState::Initial)
            .build();

        assert!(matches!(result, Err(ConfigError::NoStates)));
    }

    #[test]
    fn builder_requires_transitions() {
        let result = StateMachineBuilder::<TestState, ()>::new()
            .initial(TestState::Initial)
            .state(TestState::Initial)
            .build();

        assert!(matches!(result, Err(ConfigError::NoTransitions)));
    }

    #[test]
    fn builder_requires_complete_table() {
        let result = StateMachineBuilder::<TestState, ()>::new()
            .initial(TestState::Initial)
            .states([TestState::Initial, TestState::Processing])
            .transition(TestState::Initial, Transition::constant(TestState::Processing))
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::IncompleteTransitionTable { missing }) if missing == vec!["Processing"]
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::<TestState, char>::new()
            .initial(TestState::Initial)
            .states([TestState::Initial, TestState::Processing, TestState::Complete])
            .final_state(TestState::Complete)
            .event('a')
            .event(Event('b'))
            .transition(TestState::Initial, Transition::constant(TestState::Processing))
            .on(TestState::Processing, |e| match e.payload() {
                'b' => TransitionResult::to(TestState::Complete),
                _ => TransitionResult::to(TestState::Processing),
            })
            .transition(TestState::Complete, Transition::constant(TestState::Complete))
            .trace(true)
            .trace_sink(TraceLog::new())
            .halt_on_final(true)
            .build()
            .unwrap();

        assert_eq!(machine.initial_state(), Some(&TestState::Initial));
        assert_eq!(machine.states().len(), 3);
        assert_eq!(machine.events(), &[Event('a'), Event('b')]);
        assert_eq!(machine.transitions().len(), 3);
        assert!(machine.trace());
        assert!(machine.halts_on_final());
    }

    #[test]
    fn config_sets_run_options() {
        let machine = StateMachineBuilder::<TestState, ()>::new()
            .initial(TestState::Initial)
            .state(TestState::Initial)
            .transition(TestState::Initial, Transition::constant(TestState::Initial))
            .config(RunConfig::default().trace(true))
            .build()
            .unwrap();

        assert!(machine.trace());
        assert!(!machine.halts_on_final());
    }
}
