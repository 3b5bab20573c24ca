//! Text oracle adapters: the OpenAI-backed implementation and a mock.

mod mock_oracle;
mod openai_oracle;
pub mod prompts;

pub use mock_oracle::{MockOracleError, MockTextOracle, OracleCall};
pub use openai_oracle::{OpenAiConfig, OpenAiTextOracle};
