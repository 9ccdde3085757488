//! Completion provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait defined
//! in `dnya-core`, plus a factory ([`create_provider`]) that builds it from
//! the `[llm]` section of the config.
//!
//! [`LlmProvider`]: dnya_core::llm::provider::LlmProvider

pub mod openai_compat;

use dnya_core::llm::box_provider::BoxLlmProvider;
use dnya_types::config::LlmConfig;
use dnya_types::llm::ModelSettings;
use secrecy::SecretString;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{self as oai_config, OpenAiCompatConfig};

/// Build the provider for one generation path.
///
/// `settings.model` becomes the provider's default model. An explicit
/// `base_url` wins over the provider's well-known endpoint.
pub fn create_provider(
    config: &LlmConfig,
    settings: &ModelSettings,
    api_key: SecretString,
) -> BoxLlmProvider {
    let mut oai = match config.provider.as_str() {
        "openai" => oai_config::openai_defaults(api_key, &settings.model),
        _ => oai_config::gemini_defaults(api_key, &settings.model),
    };
    if let Some(base_url) = &config.base_url {
        oai = OpenAiCompatConfig {
            base_url: base_url.clone(),
            ..oai
        };
    }
    tracing::debug!(
        provider = %oai.provider_name,
        model = %oai.model,
        base_url = %oai.base_url,
        max_context_tokens = oai.capabilities.max_context_tokens,
        max_output_tokens = oai.capabilities.max_output_tokens,
        "completion provider configured"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("test-key".to_string())
    }

    #[test]
    fn test_create_provider_defaults_to_gemini() {
        let config = LlmConfig::default();
        let provider = create_provider(&config, &config.primary, key());
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_openai() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, &config.fallback, key());
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.capabilities().max_context_tokens, 128_000);
    }

    #[test]
    fn test_create_provider_with_base_url() {
        let config = LlmConfig {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, &config.primary, key());
        assert_eq!(provider.name(), "gemini");
    }
}
