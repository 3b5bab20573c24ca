//! The clarification dialogue: aggregate, turns, phases, and the
//! termination policy engine.

mod conversation;
mod engine;
mod phase;
mod turn;

pub use conversation::{AskOutcome, Conversation, RecordOutcome, DEFAULT_TURN_BUDGET};
pub use engine::{DialogueEngine, Verdict};
pub use phase::DialoguePhase;
pub use turn::Turn;
