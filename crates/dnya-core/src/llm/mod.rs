//! LLM provider abstractions and the generation path for Dnya.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `GenerationOrchestrator`: primary session-backed call with a single-shot fallback
//! - `TurnPromptBuilder`: assembles the context-enhanced prompt for a turn

pub mod box_provider;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
