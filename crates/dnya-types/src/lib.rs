//! Shared domain types for Dnya.
//!
//! This crate contains the core domain types used across the chat backend:
//! users, chat profiles, messages, retrieval snippets, LLM request shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
pub mod user;
