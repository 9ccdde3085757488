//! Business logic and port (trait) definitions for Dnya.
//!
//! This crate defines the repository, hashing, token, LLM, and retrieval
//! traits that the infrastructure layer implements, plus the services built
//! on them: authentication, context assembly, generation, and the turn
//! pipeline. It depends only on `dnya-types` -- never on `dnya-infra` or any
//! database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod retrieval;
