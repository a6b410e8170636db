//! Run configuration.
//!
//! Knobs that change how a machine runs, as opposed to what it computes.
//! Deserializable so hosts can keep them next to the rest of their settings.

use serde::{Deserialize, Serialize};

/// Options applied to a machine before it runs.
///
/// Every field has a default, so partial documents are accepted:
///
/// ```rust
/// use lockstep::RunConfig;
///
/// let config = RunConfig::from_json(r#"{ "trace": true }"#).unwrap();
/// assert!(config.trace);
/// assert!(!config.halt_on_final);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Emit a trace record for every processed event
    pub trace: bool,

    /// Stop the run, closing the output channel, once a final state has been
    /// published
    pub halt_on_final: bool,
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    pub fn halt_on_final(mut self, enabled: bool) -> Self {
        self.halt_on_final = enabled;
        self
    }
}
