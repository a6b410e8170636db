//! Mapping from each state to its transition function.

use super::transition::Transition;
use crate::core::State;
use std::collections::HashMap;

/// Transition table: one transition per state, last write wins.
pub struct TransitionTable<S: State, T> {
    entries: HashMap<S, Transition<S, T>>,
}

impl<S: State, T> TransitionTable<S, T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register or overwrite the transition bound to `state`.
    ///
    /// Returns the transition previously bound, if any.
    pub fn insert(&mut self, state: S, transition: Transition<S, T>) -> Option<Transition<S, T>> {
        self.entries.insert(state, transition)
    }

    pub fn get(&self, state: &S) -> Option<&Transition<S, T>> {
        self.entries.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.entries.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.keys()
    }

    /// States among `required` with no entry, deduplicated, in first-seen
    /// order.
    pub fn missing<'a, I>(&self, required: I) -> Vec<S>
    where
        I: IntoIterator<Item = &'a S>,
    {
        let mut missing: Vec<S> = Vec::new();
        for state in required {
            if !self.contains(state) && !missing.contains(state) {
                missing.push(state.clone());
            }
        }
        missing
    }
}

impl<S: State, T> Clone for TransitionTable<S, T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S: State, T> Default for TransitionTable<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T> std::fmt::Debug for TransitionTable<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.states()).finish()
    }
}
