//! Event wrapper carried into transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A caller-defined stimulus that drives one transition.
///
/// The engine never inspects the payload; it only moves it from the input
/// channel into the transition bound to the current state, and formats it
/// with `Debug` when tracing is on.
///
/// # Example
///
/// ```rust
/// use lockstep::core::Event;
///
/// let event = Event::new('7');
/// assert_eq!(*event.payload(), '7');
///
/// let event: Event<char> = '3'.into();
/// assert_eq!(event.into_inner(), '3');
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event<T>(pub T);

impl<T> Event<T> {
    pub fn new(payload: T) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Event<T> {
    fn from(payload: T) -> Self {
        Self(payload)
    }
}

impl<T: fmt::Display> fmt::Display for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_is_transparent() {
        let event = Event::new(42u8);
        assert_eq!(*event.payload(), 42);
        assert_eq!(event.to_string(), "42");
        assert_eq!(event.into_inner(), 42);
    }

    #[test]
    fn event_serializes_as_payload() {
        let json = serde_json::to_string(&Event::new("coin")).unwrap();
        assert_eq!(json, "\"coin\"");
    }
}
