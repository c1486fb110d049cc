//! Extraction Orchestrator
//!
//! The core of the pipeline: builds a deterministic prompt around the
//! recognized text, calls the AI completion endpoint, parses the returned
//! JSON strictly, and validates it field by field against the invoice
//! schema. Arithmetic consistency is the model's job and is deliberately
//! never re-checked here; only structure is guaranteed.

mod client;
mod error;
mod prompt;
mod schema;
mod service;

pub use client::{CerebrasClient, CompletionClient};
pub use error::ExtractError;
pub use schema::parse_invoice;
pub use service::ExtractionService;
