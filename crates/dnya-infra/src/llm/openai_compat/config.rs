//! Configuration and per-provider defaults for OpenAI-compatible providers.

use dnya_types::llm::ProviderCapabilities;
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "gemini").
    pub provider_name: String,
    /// Base URL for the API.
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Google Gemini through its OpenAI-compatible endpoint.
///
/// 1M context, 64K output.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 1_000_000,
            max_output_tokens: 65_536,
        },
    }
}

/// OpenAI. 128K context, 16K output.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Default base URL for a named provider; unknown names use Gemini's.
pub fn base_url_for(provider_name: &str) -> &'static str {
    match provider_name {
        "openai" => OPENAI_BASE_URL,
        _ => GEMINI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults(SecretString::from("key".to_string()), "gemini-2.5-flash");
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.capabilities.max_context_tokens, 1_000_000);
    }

    #[test]
    fn test_base_url_for_unknown_provider() {
        assert_eq!(base_url_for("openai"), OPENAI_BASE_URL);
        assert_eq!(base_url_for("local"), GEMINI_BASE_URL);
    }
}
