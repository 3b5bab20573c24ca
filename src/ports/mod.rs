//! Ports: interfaces to external collaborators.
//!
//! The domain reaches the text oracle, the scheduling oracle, and the
//! conversation store only through these traits. Adapters implement
//! them; application handlers consume them as `Arc<dyn _>`.

mod conversation_store;
mod scheduling;
mod text_oracle;

pub use conversation_store::{ConversationStore, StoreError};
pub use scheduling::{SchedulingError, SchedulingOracle, Slot};
pub use text_oracle::{
    DialogueContext, FollowUpQuestion, IssueDigest, OpeningMessage, OracleError, SentimentReading,
    TextOracle, UrgencyReading,
};
