//! Adapters: implementations of the ports against real backends, plus
//! mocks for tests.

pub mod ai;
pub mod calendar;
pub mod http;
pub mod storage;

pub use ai::{MockOracleError, MockTextOracle, OpenAiConfig, OpenAiTextOracle, OracleCall};
pub use calendar::{
    CreatedEventRecord, GoogleCalendarConfig, GoogleCalendarOracle, MockSchedulingError,
    MockSchedulingOracle,
};
pub use storage::{FileConversationStore, InMemoryConversationStore};
