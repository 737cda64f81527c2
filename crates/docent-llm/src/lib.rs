//! Language model client abstraction for Docent.
//!
//! This crate provides a unified interface for language model providers with
//! support for function calling, shaped after the Gemini `generateContent`
//! API but provider-agnostic at the trait boundary.
//!
//! # Architecture
//!
//! The core abstraction is the [`LanguageBackend`] trait. The orchestrator
//! only ever talks to this trait, so any provider (or the [`MockBackend`])
//! can stand in.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  LanguageBackend trait                  │
//! │  - generate() -> GenerationResponse    │
//! └─────────────────────────────────────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!     ┌─────────┐         ┌─────────┐
//!     │ Gemini  │         │  Mock   │
//!     └─────────┘         └─────────┘
//! ```

pub mod backend;
pub mod error;
pub mod gemini;
pub mod types;

pub use backend::{LanguageBackend, MockBackend, MockReply, SharedBackend, with_retry};
pub use error::{LlmError, Result, is_retryable};
pub use types::{
    FinishReason, FunctionCall, FunctionDeclaration, GenerationRequest, GenerationResponse,
    Message, Part, Role, TokenUsage,
};

pub use gemini::{GeminiBackend, GeminiConfig, create_shared_backend};
