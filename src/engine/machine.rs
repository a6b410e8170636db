//! State machine configuration, validation and the `run` entry points.

use super::error::ConfigError;
use super::table::TransitionTable;
use super::transition::{Transition, TransitionError, TransitionResult};
use super::worker::Worker;
use crate::config::RunConfig;
use crate::core::{Event, State, TraceSink, TracingSink};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// Where a machine is in its own lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase<S: State> {
    /// Not started, or reset after a run
    Idle,

    /// A worker is consuming events
    Running,

    /// The worker has stopped; the machine must be reset before running again
    Terminated(Termination<S>),
}

/// Why a run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Termination<S: State> {
    /// The caller closed the input channel
    InputClosed,

    /// A final state was published while halting on final states
    FinalState(S),

    /// The caller dropped the output receiver
    OutputDropped,

    /// A transition function or the trace sink panicked
    Panicked,

    /// The worker task was cancelled, e.g. by runtime shutdown
    Cancelled,
}

/// One published step of a detailed run: the adopted state and the error
/// reported by the transition that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<S: State> {
    pub state: S,
    pub error: Option<TransitionError>,
}

impl<S: State> Step<S> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Whether `state` is terminal, either by its own definition or because it
/// is listed among `final_states`.
pub(crate) fn is_final<S: State>(state: &S, final_states: &[S]) -> bool {
    state.is_final() || final_states.contains(state)
}

/// State written by the worker and read by the caller.
pub(crate) struct Shared<S: State> {
    pub(crate) current: RwLock<Option<S>>,
    pub(crate) last_error: RwLock<Option<TransitionError>>,
    pub(crate) trace: AtomicBool,
    pub(crate) processed: AtomicU64,
    pub(crate) phase: RwLock<Phase<S>>,
}

impl<S: State> Shared<S> {
    fn new() -> Self {
        Self {
            current: RwLock::new(None),
            last_error: RwLock::new(None),
            trace: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            phase: RwLock::new(Phase::Idle),
        }
    }
}

/// Finite state machine driven by events over a channel.
///
/// Configure it with states, an initial state and one transition per state,
/// then call [`run`](Self::run). The machine validates its configuration,
/// spawns a single worker task and returns the channel on which the worker
/// publishes one state per event, in lock-step with the caller.
///
/// # Example
///
/// ```rust
/// use lockstep::core::{Event, StateId};
/// use lockstep::engine::{StateMachine, Transition};
/// use tokio::sync::mpsc;
///
/// const OFF: StateId = StateId::new(1);
/// const ON: StateId = StateId::new(2);
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut machine: StateMachine<StateId, ()> = StateMachine::new();
/// machine.add_state(OFF);
/// machine.add_state(ON);
/// machine.set_initial_state(OFF);
/// machine.set_transition(OFF, Transition::constant(ON));
/// machine.set_transition(ON, Transition::constant(OFF));
///
/// let (events, input) = mpsc::channel(1);
/// let mut states = machine.run(input).unwrap();
///
/// events.send(Event(())).await.unwrap();
/// assert_eq!(states.recv().await, Some(ON));
/// events.send(Event(())).await.unwrap();
/// assert_eq!(states.recv().await, Some(OFF));
///
/// drop(events);
/// assert_eq!(states.recv().await, None);
/// # }
/// ```
pub struct StateMachine<S: State, T> {
    states: Vec<S>,
    final_states: Vec<S>,
    events: Vec<Event<T>>,
    initial: Option<S>,
    table: TransitionTable<S, T>,
    halt_on_final: bool,
    sink: Arc<dyn TraceSink<S, T>>,
    shared: Arc<Shared<S>>,
    run_id: Option<Uuid>,
    worker: Option<JoinHandle<Termination<S>>>,
}

impl<S: State, T: Debug + Send + 'static> StateMachine<S, T> {
    /// Create an empty, unconfigured machine.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            final_states: Vec::new(),
            events: Vec::new(),
            initial: None,
            table: TransitionTable::new(),
            halt_on_final: false,
            sink: Arc::new(TracingSink),
            shared: Arc::new(Shared::new()),
            run_id: None,
            worker: None,
        }
    }
}

impl<S: State, T: Debug + Send + 'static> Default for StateMachine<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Send + 'static> StateMachine<S, T> {
    /// Apply run options.
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.apply_config(&config);
        self
    }

    pub fn apply_config(&mut self, config: &RunConfig) {
        self.set_trace(config.trace);
        self.halt_on_final = config.halt_on_final;
    }

    pub fn add_state(&mut self, state: S) {
        self.states.push(state);
    }

    pub fn add_final_state(&mut self, state: S) {
        self.final_states.push(state);
    }

    /// Record an event the machine is expected to handle. Informational only.
    pub fn add_event(&mut self, event: Event<T>) {
        self.events.push(event);
    }

    pub fn set_initial_state(&mut self, state: S) {
        self.initial = Some(state);
    }

    /// Register or overwrite the transition bound to `state`.
    ///
    /// A running worker keeps the table it started with.
    pub fn set_transition(&mut self, state: S, transition: Transition<S, T>) {
        self.table.insert(state, transition);
    }

    /// Shorthand for `set_transition(state, Transition::new(func))`.
    pub fn on<F>(&mut self, state: S, func: F)
    where
        F: Fn(&Event<T>) -> TransitionResult<S> + Send + Sync + 'static,
    {
        self.set_transition(state, Transition::new(func));
    }

    /// Turn trace records on or off. Takes effect on the next processed
    /// event, including while running.
    pub fn set_trace(&self, enabled: bool) {
        self.shared.trace.store(enabled, Ordering::Release);
    }

    /// Replace the default [`TracingSink`].
    pub fn set_trace_sink<K>(&mut self, sink: K)
    where
        K: TraceSink<S, T> + 'static,
    {
        self.sink = Arc::new(sink);
    }

    /// Close the output channel once a final state has been published.
    pub fn set_halt_on_final(&mut self, enabled: bool) {
        self.halt_on_final = enabled;
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn final_states(&self) -> &[S] {
        &self.final_states
    }

    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn initial_state(&self) -> Option<&S> {
        self.initial.as_ref()
    }

    pub fn transitions(&self) -> &TransitionTable<S, T> {
        &self.table
    }

    pub fn trace(&self) -> bool {
        self.shared.trace.load(Ordering::Acquire)
    }

    pub fn halts_on_final(&self) -> bool {
        self.halt_on_final
    }

    /// Whether `state` is terminal, either by its own definition or because
    /// it was added as a final state.
    pub fn is_final_state(&self, state: &S) -> bool {
        is_final(state, &self.final_states)
    }

    /// State adopted after the last processed event, or the initial state of
    /// a run that has not processed anything yet. `None` before the first run.
    pub fn current_state(&self) -> Option<S> {
        self.shared.current.read().clone()
    }

    /// Last error reported by a transition. Overwritten, never accumulated.
    pub fn last_error(&self) -> Option<TransitionError> {
        self.shared.last_error.read().clone()
    }

    /// Events processed by the current (or last) run.
    pub fn processed(&self) -> u64 {
        self.shared.processed.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> Phase<S> {
        self.shared.phase.read().clone()
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.shared.phase.read(), Phase::Running)
    }

    /// Identifier of the current (or last) run, as carried by trace records.
    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Check the configuration, accumulating every problem found.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

        let initial = self.initial.as_ref().filter(|s| !s.is_unknown());
        checks.push(match initial {
            Some(_) => Validation::success(()),
            None => Validation::fail(ConfigError::NoInitialState),
        });

        checks.push(if self.states.is_empty() {
            Validation::fail(ConfigError::NoStates)
        } else {
            Validation::success(())
        });

        checks.push(if self.table.is_empty() {
            Validation::fail(ConfigError::NoTransitions)
        } else {
            Validation::success(())
        });

        if !self.table.is_empty() {
            let required = initial
                .into_iter()
                .chain(self.states.iter())
                .chain(self.final_states.iter());
            let missing = self.table.missing(required);
            checks.push(if missing.is_empty() {
                Validation::success(())
            } else {
                Validation::fail(ConfigError::IncompleteTransitionTable {
                    missing: missing.iter().map(|s| s.name().into_owned()).collect(),
                })
            });
        }

        checks.push(match *self.shared.phase.read() {
            Phase::Idle => Validation::success(()),
            _ => Validation::fail(ConfigError::AlreadyStarted),
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate and start the machine.
    ///
    /// Returns the channel on which the worker publishes one state per event.
    /// The output channel closes when `input` is closed, or when a final
    /// state has been published if the machine halts on final states.
    ///
    /// Must be called from within a Tokio runtime. On error nothing is
    /// started and the machine is left exactly as it was.
    pub fn run(
        &mut self,
        input: mpsc::Receiver<Event<T>>,
    ) -> Result<mpsc::Receiver<S>, ConfigError> {
        self.start(input, |state, _| state)
    }

    /// Like [`run`](Self::run), but every published [`Step`] also carries
    /// the error of the transition that produced it.
    pub fn run_detailed(
        &mut self,
        input: mpsc::Receiver<Event<T>>,
    ) -> Result<mpsc::Receiver<Step<S>>, ConfigError> {
        self.start(input, |state, error| Step { state, error })
    }

    fn start<O, F>(
        &mut self,
        input: mpsc::Receiver<Event<T>>,
        wrap: F,
    ) -> Result<mpsc::Receiver<O>, ConfigError>
    where
        O: Send + 'static,
        F: Fn(S, Option<TransitionError>) -> O + Send + 'static,
    {
        if let Validation::Failure(errors) = self.validate() {
            if let Some(first) = errors.iter().next() {
                return Err(first.clone());
            }
        }
        let initial = self
            .initial
            .clone()
            .ok_or(ConfigError::NoInitialState)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let run_id = Uuid::new_v4();
        let (output, states) = mpsc::channel(1);

        *self.shared.current.write() = Some(initial.clone());
        self.shared.processed.store(0, Ordering::Release);
        *self.shared.phase.write() = Phase::Running;

        let worker = Worker {
            run_id,
            current: initial,
            table: Arc::new(self.table.clone()),
            final_states: self.final_states.clone(),
            halt_on_final: self.halt_on_final,
            sink: Arc::clone(&self.sink),
            shared: Arc::clone(&self.shared),
        };
        let span = tracing::debug_span!("fsm_run", %run_id);
        self.worker = Some(runtime.spawn(worker.run(input, output, wrap).instrument(span)));
        self.run_id = Some(run_id);

        Ok(states)
    }

    /// Wait for the worker to stop and report why it did.
    ///
    /// Returns `None` if the machine was never started.
    pub async fn wait(&mut self) -> Option<Termination<S>> {
        if let Some(worker) = self.worker.take() {
            match worker.await {
                Ok(termination) => return Some(termination),
                Err(error) => {
                    tracing::error!(%error, "worker did not finish");
                    let termination = if error.is_panic() {
                        Termination::Panicked
                    } else {
                        Termination::Cancelled
                    };
                    *self.shared.phase.write() = Phase::Terminated(termination.clone());
                    return Some(termination);
                }
            }
        }
        match self.phase() {
            Phase::Terminated(termination) => Some(termination),
            _ => None,
        }
    }

    /// Return a stopped machine to `Idle`: the current state goes back to the
    /// initial state and the last error is cleared.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let busy = self.is_running()
            && self
                .worker
                .as_ref()
                .is_some_and(|worker| !worker.is_finished());
        if busy {
            return Err(ConfigError::StillRunning);
        }

        self.worker = None;
        *self.shared.current.write() = self.initial.clone();
        *self.shared.last_error.write() = None;
        self.shared.processed.store(0, Ordering::Release);
        *self.shared.phase.write() = Phase::Idle;
        Ok(())
    }
}
