//! Prompt construction for a conversational turn.
//!
//! The primary path sends [`SESSION_PREAMBLE`] as the system prompt, then the
//! session dialogue, then the turn prompt built by [`TurnPromptBuilder`].
//! The fallback path sends only the turn prompt.

use dnya_types::chat::Message;
use dnya_types::retrieval::SimilarSnippet;

/// System prompt for the session-backed generation path.
pub const SESSION_PREAMBLE: &str = "You are Dnya, a helpful and context-aware assistant. \
What follows is an ongoing conversation between you and one human user. \
Keep track of what they have told you and stay consistent with it.";

const PERSONA: &str = "You're the user's warm, playful best friend. Keep it short, real and friendly. \
Be helpful first; a bit of light teasing is fine when the mood allows, but never be rude or arrogant.\n\
Bring up earlier messages or preferences only when they fit naturally.";

const CLOSING: &str = "Answer like a close friend would: brief and warm, with a fun tone only when it fits. \
Never sound robotic or formal.";

/// Builds the context-enhanced prompt for a single turn.
///
/// Layout:
/// ```text
/// {persona}
///
/// Here's your recent chat:
/// You: ...
/// AI: ...
///
/// Some past things the user mentioned (if needed):
/// - ...
///
/// Now the user asked:
/// "{input}"
///
/// {closing}
/// ```
pub struct TurnPromptBuilder;

impl TurnPromptBuilder {
    /// Build the prompt for `input` from `user_id`'s recent history and any
    /// similar snippets recalled from the index.
    ///
    /// The snippet section is omitted entirely when `snippets` is empty.
    pub fn build(
        user_id: &str,
        history: &[Message],
        snippets: &[SimilarSnippet],
        input: &str,
    ) -> String {
        let mut sections = Vec::with_capacity(5);

        sections.push(PERSONA.to_string());

        let transcript: Vec<String> = history
            .iter()
            .map(|m| {
                let speaker = if m.sender_id == user_id { "You" } else { "AI" };
                format!("{speaker}: {}", m.content)
            })
            .collect();
        sections.push(format!("Here's your recent chat:\n{}", transcript.join("\n")));

        if !snippets.is_empty() {
            let lines: Vec<String> = snippets.iter().map(|s| format!("- {}", s.text)).collect();
            sections.push(format!(
                "Some past things the user mentioned (if needed):\n{}",
                lines.join("\n")
            ));
        }

        sections.push(format!("Now the user asked:\n\"{input}\""));
        sections.push(CLOSING.to_string());

        sections.join("\n\n")
    }
}
