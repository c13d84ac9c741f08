//! The agent controller — the heart of Archivist.
//!
//! One user turn runs a cyclic state machine:
//!
//! 1. **AwaitModel** — send the full history to the model
//! 2. **DispatchTools** — execute any requested tool calls
//! 3. **GradeOutput** — filter retrieval output through the relevance grader
//! 4. loop back to the model until it answers without requesting tools
//!
//! Every appended message is persisted before it is reported on the
//! turn's event stream, so a resumed thread continues from exactly
//! what a front end has already rendered.

pub mod controller;
pub mod grader;
pub mod turn_event;

#[cfg(test)]
mod test_helpers;

pub use controller::{AgentController, ControllerConfig};
pub use grader::{RelevanceGrader, Verdict};
pub use turn_event::TurnEvent;
