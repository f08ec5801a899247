//! LLM Backend abstraction layer.
//!
//! - OpenAI-compatible HTTP backend
//! - Mock backend for testing

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError, ReplyFormat, Usage};
