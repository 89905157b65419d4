/*!
 * Tests for application configuration functionality
 */

use adsync::app_config::{Config, ConfigOverrides, LogLevel, TranslationProvider};
use adsync::errors::ConfigError;

use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.provider, TranslationProvider::Gemini);
    assert_eq!(config.get_model(), "gemini-2.5-flash");
    assert_eq!(config.get_endpoint(), "https://generativelanguage.googleapis.com/v1beta");
    assert_eq!(config.proofreading.fallback_score, 85);
    assert_eq!(config.proofreading.fallback_feedback, "Auto-approved");
    assert_eq!(
        config.default_system_prompt,
        "You are a professional translator specializing in marketing copy."
    );
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validateProvider_withHostedProviderAndNoKey_shouldRequireKey() {
    let mut config = Config::default();

    for provider in [
        TranslationProvider::Gemini,
        TranslationProvider::OpenAI,
        TranslationProvider::Anthropic,
    ] {
        config.provider = provider.clone();
        assert_eq!(
            config.validate_provider(),
            Err(ConfigError::MissingApiKey(provider.display_name().to_string()))
        );
    }

    config.provider = TranslationProvider::Ollama;
    assert!(config.validate_provider().is_ok());
}

#[test]
fn test_validateProvider_withKeyOnActiveProvider_shouldPass() {
    let mut config = Config::default();
    config.provider = TranslationProvider::OpenAI;
    config.active_provider_config_mut().api_key = "sk-test".to_string();

    assert!(config.validate_provider().is_ok());
    assert_eq!(config.get_api_key(), "sk-test");
}

#[test]
fn test_validate_withFallbackScoreAbove100_shouldFail() {
    let mut config = Config::default();
    config.proofreading.fallback_score = 101;

    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("adsync.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.provider, TranslationProvider::Gemini);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("adsync.json");
    std::fs::write(
        &path,
        r#"{
            "provider": "ollama",
            "available_providers": [
                { "type": "ollama", "model": "mistral", "endpoint": "http://gpu-box:11434" }
            ]
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.provider, TranslationProvider::Ollama);
    assert_eq!(config.get_model(), "mistral");
    assert_eq!(config.get_endpoint(), "http://gpu-box:11434");
    assert_eq!(config.proofreading.fallback_score, 85);
    assert!(config.validate_provider().is_ok());
}

#[test]
fn test_save_thenLoad_shouldKeepValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("adsync.json");
    let mut config = Config::default();
    config.database_path = "/tmp/ads.db".to_string();
    config.active_provider_config_mut().model = "gemini-2.5-pro".to_string();

    config.save(&path).unwrap();
    let loaded = Config::load_or_create(&path).unwrap();

    assert_eq!(loaded.database_path, "/tmp/ads.db");
    assert_eq!(loaded.get_model(), "gemini-2.5-pro");
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("adsync.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_applyOverrides_withProviderModelAndKey_shouldTargetSelectedProvider() {
    let mut config = Config::default();

    config.apply_overrides(ConfigOverrides {
        provider: Some(TranslationProvider::OpenAI),
        model: Some("gpt-4o".to_string()),
        api_key: Some("sk-cli".to_string()),
        ..Default::default()
    });

    assert_eq!(config.provider, TranslationProvider::OpenAI);
    assert_eq!(config.get_model(), "gpt-4o");
    assert_eq!(config.get_api_key(), "sk-cli");
    let gemini = config.get_provider_config(&TranslationProvider::Gemini).unwrap();
    assert_eq!(gemini.api_key, "");
    assert!(config.validate_provider().is_ok());
}

#[test]
fn test_applyOverrides_withBlankApiKey_shouldKeepFileKey() {
    let mut config = Config::default();
    config.active_provider_config_mut().api_key = "from-file".to_string();

    config.apply_overrides(ConfigOverrides {
        api_key: Some("   ".to_string()),
        ..Default::default()
    });

    assert_eq!(config.get_api_key(), "from-file");
}

#[test]
fn test_applyOverrides_withDatabaseAndLogLevel_shouldReplaceThem() {
    let dir = common::create_temp_dir().unwrap();
    let db_path = common::database_path(dir.path());
    let mut config = Config::default();

    config.apply_overrides(ConfigOverrides {
        database_path: Some(db_path.clone()),
        log_level: Some(LogLevel::Debug),
        ..Default::default()
    });

    assert_eq!(config.resolve_database_path().unwrap(), db_path);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_applyOverrides_withNothing_shouldLeaveConfigUntouched() {
    let mut config = Config::default();

    config.apply_overrides(ConfigOverrides::default());

    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        serde_json::to_value(Config::default()).unwrap()
    );
}
