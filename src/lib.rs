//! AI-backed landing page section generation
//!
//! This crate is the core of a small backend service: a free-text brief is
//! sent to a hosted model, which drafts three landing-page sections (Hero,
//! About, Contact) as markup strings. A two-pass extractor recovers the
//! three section bodies from the unstructured reply, and a Postgres store
//! keeps the single current generated record plus any manually saved ones.
//!
//! ## Architecture
//!
//! ```text
//! Brief → Prompt Template → LLM → Raw Text → Extractor → SectionRecord → Store
//! ```
//!
//! The HTTP boundary lives in the `web-server` crate; this crate defines no
//! routes.

// LLM client abstraction
pub mod agentic;

// Core modules
pub mod error;
pub mod extractor;
pub mod generator;
pub mod models;

// Persistence
pub mod database;

// Re-exports for convenience
pub use agentic::{LlmClient, OpenRouterClient};
pub use database::{DatabaseConfig, DatabaseManager, SectionRepository, SectionStore};
pub use error::SectionsError;
pub use extractor::{extract_sections, EXPECTED_SECTIONS};
pub use generator::SectionGenerator;
pub use models::{SectionItem, SectionRecord, StoredSectionRecord};
