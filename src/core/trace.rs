//! Trace records and the sinks that receive them.
//!
//! When tracing is on, the worker produces one [`TraceRecord`] per processed
//! event and hands it to a [`TraceSink`] before publishing the new state.
//! What happens to the record afterwards is up to the sink.

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single processed event.
///
/// Fields appear in causal order: the state before the event, the event
/// itself, the state adopted afterwards.
#[derive(Clone, Debug, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct TraceRecord<S: State, T> {
    /// Run that produced this record
    pub run_id: Uuid,
    /// Position of the event within its run, starting at 1
    pub seq: u64,
    /// State before the event
    pub from: S,
    /// The raw event
    pub event: Event<T>,
    /// State adopted after the event
    pub to: S,
    /// Message of the transition error, if the transition failed
    pub error: Option<String>,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl<S: State, T> TraceRecord<S, T> {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Destination for trace records.
///
/// Sinks are called from the worker task, synchronously, before the state is
/// published. Keep them fast.
pub trait TraceSink<S: State, T>: Send + Sync {
    fn record(&self, record: &TraceRecord<S, T>);
}

/// Default sink: emits every record as a `tracing` event under the
/// `lockstep::trace` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl<S: State, T: Debug> TraceSink<S, T> for TracingSink {
    fn record(&self, record: &TraceRecord<S, T>) {
        match &record.error {
            None => tracing::info!(
                target: "lockstep::trace",
                run_id = %record.run_id,
                seq = record.seq,
                from = %record.from.name(),
                event = ?record.event.payload(),
                to = %record.to.name(),
                "transition"
            ),
            Some(error) => tracing::info!(
                target: "lockstep::trace",
                run_id = %record.run_id,
                seq = record.seq,
                from = %record.from.name(),
                event = ?record.event.payload(),
                to = %record.to.name(),
                error = %error,
                "transition failed"
            ),
        }
    }
}

/// In-memory sink that keeps every record it receives.
///
/// Clones share the same buffer, so one handle can be given to the machine
/// and another kept for inspection.
///
/// # Example
///
/// ```rust
/// use lockstep::core::{Event, StateId, TraceLog, TraceRecord, TraceSink};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let log: TraceLog<StateId, char> = TraceLog::new();
/// log.record(&TraceRecord {
///     run_id: Uuid::new_v4(),
///     seq: 1,
///     from: StateId::new(1),
///     event: Event::new('2'),
///     to: StateId::new(3),
///     error: None,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.len(), 1);
/// assert_eq!(log.get_path(), vec![StateId::new(1), StateId::new(3)]);
/// ```
pub struct TraceLog<S: State, T> {
    records: Arc<RwLock<Vec<TraceRecord<S, T>>>>,
}

impl<S: State, T> TraceLog<S, T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Get the path of states traversed.
    ///
    /// The `from` state of the first record, then the `to` state of every
    /// record in order. Empty when nothing was recorded.
    pub fn get_path(&self) -> Vec<S> {
        let records = self.records.read();
        let mut path = Vec::with_capacity(records.len() + 1);
        if let Some(first) = records.first() {
            path.push(first.from.clone());
        }
        path.extend(records.iter().map(|r| r.to.clone()));
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let records = self.records.read();
        match (records.first(), records.last()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }
}

impl<S: State, T: Clone> TraceLog<S, T> {
    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<TraceRecord<S, T>> {
        self.records.read().clone()
    }
}

impl<S: State, T> Clone for TraceLog<S, T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S: State, T> Default for TraceLog<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Clone + Send + Sync> TraceSink<S, T> for TraceLog<S, T> {
    fn record(&self, record: &TraceRecord<S, T>) {
        self.records.write().push(record.clone());
    }
}
