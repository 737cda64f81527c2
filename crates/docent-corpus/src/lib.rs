//! Document corpus access for Docent.
//!
//! This crate is the knowledge-retrieval collaborator: three read operations
//! of increasing depth (listing → outline → full content) behind the
//! [`DocumentStore`] trait, with an HTTP implementation against the corpus
//! REST API and an in-memory implementation for tests and offline use.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{CorpusError, Result};
pub use memory::MemoryDocumentStore;
pub use store::{CorpusConfig, DocumentStore, HttpDocumentStore, SharedStore};
pub use types::Document;
