//! The task that drives one run of a machine.

use super::machine::{is_final, Phase, Shared, Termination};
use super::table::TransitionTable;
use super::transition::{TransitionError, TransitionResult};
use crate::core::{Event, State, TraceRecord, TraceSink};
use chrono::Utc;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};
use uuid::Uuid;

/// Everything one run owns. Built by `StateMachine::run`, consumed by
/// [`Worker::run`].
pub(crate) struct Worker<S: State, T> {
    pub(crate) run_id: Uuid,
    pub(crate) current: S,
    pub(crate) table: Arc<TransitionTable<S, T>>,
    pub(crate) final_states: Vec<S>,
    pub(crate) halt_on_final: bool,
    pub(crate) sink: Arc<dyn TraceSink<S, T>>,
    pub(crate) shared: Arc<Shared<S>>,
}

impl<S: State, T: Send + 'static> Worker<S, T> {
    /// Consume events until the input closes, the output is dropped, a
    /// transition panics, or (when halting on final states) a final state has
    /// been published.
    ///
    /// Each iteration first reserves the single output slot, which only frees
    /// up once the caller has read the previous state, so no event is taken
    /// from the input before the state it follows has been observed.
    pub(crate) async fn run<O, F>(
        mut self,
        mut input: mpsc::Receiver<Event<T>>,
        output: mpsc::Sender<O>,
        wrap: F,
    ) -> Termination<S>
    where
        O: Send + 'static,
        F: Fn(S, Option<TransitionError>) -> O + Send + 'static,
    {
        debug!(initial = %self.current.name(), "worker started");

        let termination = loop {
            let Ok(permit) = output.reserve().await else {
                break Termination::OutputDropped;
            };

            let event = tokio::select! {
                biased;
                _ = output.closed() => break Termination::OutputDropped,
                event = input.recv() => match event {
                    Some(event) => event,
                    None => break Termination::InputClosed,
                },
            };

            let (next, error) = match panic::catch_unwind(AssertUnwindSafe(|| self.step(event))) {
                Ok(step) => step,
                Err(payload) => {
                    error!(
                        from = %self.current.name(),
                        panic = %panic_message(&*payload),
                        "transition panicked"
                    );
                    break Termination::Panicked;
                }
            };
            permit.send(wrap(next.clone(), error));

            if self.halt_on_final && is_final(&next, &self.final_states) {
                break Termination::FinalState(next);
            }
        };

        *self.shared.phase.write() = Phase::Terminated(termination.clone());
        debug!(
            reason = ?termination,
            processed = self.shared.processed.load(Ordering::Acquire),
            "worker stopped"
        );
        termination
    }

    /// Apply one event: dispatch, adopt, record the error, trace.
    fn step(&mut self, event: Event<T>) -> (S, Option<TransitionError>) {
        let from = self.current.clone();
        let result = match self.table.get(&from) {
            Some(transition) => transition.apply(&event),
            None => TransitionResult::fail(
                from.clone(),
                TransitionError::NoTransition {
                    from: from.name().into_owned(),
                },
            ),
        };
        let (to, error) = result.into_parts();
        let seq = self.shared.processed.fetch_add(1, Ordering::AcqRel) + 1;

        *self.shared.current.write() = Some(to.clone());
        if let Some(error) = &error {
            debug!(seq, from = %from.name(), to = %to.name(), %error, "transition failed");
            *self.shared.last_error.write() = Some(error.clone());
        }

        if self.shared.trace.load(Ordering::Acquire) {
            self.sink.record(&TraceRecord {
                run_id: self.run_id,
                seq,
                from,
                event,
                to: to.clone(),
                error: error.as_ref().map(ToString::to_string),
                timestamp: Utc::now(),
            });
        }

        self.current = to.clone();
        (to, error)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
