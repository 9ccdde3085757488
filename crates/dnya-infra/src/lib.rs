//! Infrastructure layer for Dnya.
//!
//! Contains implementations of the ports defined in `dnya-core`: SQLite
//! storage, Argon2id/JWT credentials, the OpenAI-compatible completion
//! provider, and the embedding and Pinecone retrieval clients. Also loads
//! configuration.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod retrieval;
pub mod sqlite;
