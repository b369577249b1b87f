//! Intent — the typed result of interpreting one raw model response.
//!
//! An Intent is produced once per turn by the interpreter and consumed
//! once by the dispatcher. It is never persisted.

use serde::{Deserialize, Serialize};

/// What the model asked us to do this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// A structured action call: name + parameters.
    ActionCall { name: String, params: ActionParams },

    /// A free-text answer to show the user as-is.
    DirectAnswer { text: String },

    /// Nothing recognizable was found; the raw text is echoed verbatim.
    Unparseable { raw: String },
}

/// Parameters attached to an action call.
///
/// A brace-delimited region that fails to parse as JSON still counts as a
/// recognized action — `Malformed` carries that fact to the dispatcher so
/// the failure is reported against the action name rather than swallowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionParams {
    /// A parsed JSON object (possibly empty).
    Object(serde_json::Map<String, serde_json::Value>),

    /// A parameter region was present but was not valid JSON.
    Malformed,
}

impl ActionParams {
    /// An empty parameter object.
    pub fn empty() -> Self {
        ActionParams::Object(serde_json::Map::new())
    }
}

impl Intent {
    /// Convenience constructor for an action call.
    pub fn action(name: impl Into<String>, params: ActionParams) -> Self {
        Intent::ActionCall {
            name: name.into(),
            params,
        }
    }

    /// Convenience constructor for a direct answer.
    pub fn answer(text: impl Into<String>) -> Self {
        Intent::DirectAnswer { text: text.into() }
    }
}
