//! Tutor Agent - AI feedback for the Mailcraft lesson
//!
//! Provides:
//! - Trait-based LLM backends (OpenAI-compatible, mock)
//! - The two tutor tasks: the mystery reply and the tone check
//! - A tagged outcome so callers always see whether content is generated or canned
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             TutorService                │
//! │  (deadline, fallbacks, backend choice)  │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ LlmBackend  │       │ Prompts and │
//! │ (OpenAI/    │       │ canned      │
//! │  Mock)      │       │ feedback    │
//! └─────────────┘       └─────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod outcome;
pub mod prompt;
pub mod service;

// Re-export main types for convenience
pub use backend::traits::{
    CompletionRequest, CompletionResponse, LlmBackend, LlmError, ReplyFormat, Usage,
};
pub use backend::{MockBackend, OpenAiBackend};
pub use config::TutorConfig;
pub use outcome::{DegradedReason, TutorOutcome};
pub use prompt::TutorTask;
pub use service::{ServiceError, TutorService};
