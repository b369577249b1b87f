//! Intent extraction and action dispatch for stockchat.
//!
//! The "hard part" of the system lives here: turning an unreliable model's
//! raw text into a validated, side-effecting inventory operation — or a
//! plain answer — without ever crashing a turn.
//!
//! - [`interpreter`]: layered-fallback parsing of raw model output
//! - [`dispatcher`]: schema validation + dispatch against the store
//! - [`prompt`]: the per-turn prompt template
//! - [`turn`]: the retrieve → prompt → complete → interpret → dispatch cycle

pub mod dispatcher;
pub mod interpreter;
pub mod prompt;
pub mod turn;

// Scripted collaborators for tests (used by this crate and the CLI's
// integration tests).
pub mod test_helpers;

pub use dispatcher::Dispatcher;
pub use interpreter::interpret;
pub use turn::ChatTurn;
