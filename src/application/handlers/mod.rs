//! Application handlers: one per entry-point operation.

mod begin_triage;
mod get_conversation;
mod submit_answer;

pub use begin_triage::{BeginOutcome, BeginTriageCommand, BeginTriageError, BeginTriageHandler};
pub use get_conversation::{GetConversationError, GetConversationHandler};
pub use submit_answer::{
    AnswerOutcome, SubmitAnswerCommand, SubmitAnswerError, SubmitAnswerHandler,
};
