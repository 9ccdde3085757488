//! Conversation handling for Dnya.
//!
//! - `MessageRepository` / `ChatUserRepository`: persistence ports
//! - `ContextAssembler`: recent history plus best-effort similarity context
//! - `SessionRegistry`: bounded in-memory conversation sessions
//! - `TurnPipeline`: the end-to-end handling of one inbound message
//! - `ChatProfileService`: chat profile and consent records

pub mod best_effort;
pub mod context;
pub mod pipeline;
pub mod profile;
pub mod repository;
pub mod session;
