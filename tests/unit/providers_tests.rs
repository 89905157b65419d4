/*!
 * Tests for provider construction from configuration
 */

use adsync::app_config::{Config, TranslationProvider};
use adsync::errors::ProviderError;
use adsync::providers;

#[test]
fn test_fromConfig_withEachProvider_shouldBuildMatchingClient() {
    let cases = [
        (TranslationProvider::Gemini, "gemini"),
        (TranslationProvider::OpenAI, "openai"),
        (TranslationProvider::Anthropic, "anthropic"),
        (TranslationProvider::Ollama, "ollama"),
    ];

    for (provider, expected_name) in cases {
        let mut config = Config::default();
        config.provider = provider;
        config.active_provider_config_mut().api_key = "test-key".to_string();

        let client = providers::from_config(&config).unwrap();

        assert_eq!(client.name(), expected_name);
    }
}

#[test]
fn test_fromConfig_withHostedProviderAndNoKey_shouldFail() {
    let config = Config::default();

    let result = providers::from_config(&config);

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
}

#[test]
fn test_fromConfig_withOllamaAndNoKey_shouldSucceed() {
    let mut config = Config::default();
    config.provider = TranslationProvider::Ollama;

    assert!(providers::from_config(&config).is_ok());
}
