/*!
 * Configuration tests: defaults, JSON round-trips, validation and the skip
 * list matching rules.
 */

use std::str::FromStr;

use mdxlate::app_config::{Config, ProviderConfig, SkipConfig, TranslationProvider};

#[test]
fn default_config_has_sensible_values() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.input_dir, "markdowns");
    assert_eq!(config.output_dir, "output");
    assert_eq!(config.segmentation.max_tokens, 1024);
    assert_eq!(config.translation.provider, TranslationProvider::LangLink);
    assert!(config.translation.fallback_provider.is_none());
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);

    let langlink = config
        .translation
        .get_provider_config(&TranslationProvider::LangLink)
        .expect("default config must carry a langlink entry");
    assert_eq!(langlink.concurrent_requests, 4);
    assert_eq!(langlink.poll_interval_ms, 5000);
    assert_eq!(langlink.max_polls, 60);
}

#[test]
fn config_round_trips_through_json() {
    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.segmentation.max_tokens = 2048;
    config.skip.files.push("TOC.md".to_string());

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.target_language, "ja");
    assert_eq!(parsed.segmentation.max_tokens, 2048);
    assert_eq!(parsed.skip.files, vec!["TOC.md".to_string()]);
    assert_eq!(parsed.translation.provider, TranslationProvider::LangLink);
}

#[test]
fn minimal_json_fills_in_defaults() {
    let json = r#"{
        "source_language": "en",
        "target_language": "ja",
        "translation": {
            "provider": "mock",
            "available_providers": [{"type": "mock"}]
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.input_dir, "markdowns");
    assert_eq!(config.output_dir, "output");
    assert_eq!(config.segmentation.max_tokens, 1024);
    assert_eq!(config.translation.provider, TranslationProvider::Mock);
    config.validate().unwrap();
}

#[test]
fn validation_rejects_empty_languages_and_zero_ceiling() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config.translation.available_providers = vec![ProviderConfig::new(TranslationProvider::Mock)];
    config.validate().unwrap();

    let mut bad = config.clone();
    bad.source_language = "  ".to_string();
    assert!(bad.validate().is_err());

    let mut bad = config.clone();
    bad.target_language = String::new();
    assert!(bad.validate().is_err());

    let mut bad = config.clone();
    bad.segmentation.max_tokens = 0;
    assert!(bad.validate().is_err());

    let mut bad = config;
    bad.translation.common.retry_count = 0;
    assert!(bad.validate().is_err());
}

#[test]
fn validation_requires_langlink_workflow_settings() {
    // The default langlink entry has no app_id or output_node.
    let config = Config::default();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.available_providers[0].app_id = "wf-123".to_string();
    assert!(config.validate().is_err(), "output_node is still missing");

    config.translation.available_providers[0].output_node = "Translator".to_string();
    config.validate().unwrap();
}

#[test]
fn validation_covers_the_fallback_provider() {
    let mut config = Config::default();
    config.translation.available_providers[0].app_id = "wf-123".to_string();
    config.translation.available_providers[0].output_node = "Translator".to_string();

    // Fallback names a provider with no configuration entry.
    config.translation.fallback_provider = Some(TranslationProvider::Mock);
    assert!(config.validate().is_err());

    config
        .translation
        .available_providers
        .push(ProviderConfig::new(TranslationProvider::Mock));
    config.validate().unwrap();
}

#[test]
fn provider_parses_and_displays_lowercase_names() {
    assert_eq!(TranslationProvider::from_str("langlink").unwrap(), TranslationProvider::LangLink);
    assert_eq!(TranslationProvider::from_str("Mock").unwrap(), TranslationProvider::Mock);
    assert!(TranslationProvider::from_str("deepl").is_err());

    assert_eq!(TranslationProvider::LangLink.to_string(), "langlink");
    assert_eq!(TranslationProvider::Mock.display_name(), "Mock");
}

#[test]
fn skip_list_matches_exact_files_and_globs() {
    let skip = SkipConfig {
        files: vec!["TOC.md".to_string()],
        patterns: vec![
            "releases/**".to_string(),
            "**/_index.md".to_string(),
            "*.generated.md".to_string(),
        ],
    };

    assert!(skip.is_skipped("TOC.md"));
    assert!(!skip.is_skipped("guide/TOC.md"));

    assert!(skip.is_skipped("releases/v1.0/notes.md"));
    assert!(skip.is_skipped("_index.md"));
    assert!(skip.is_skipped("deeply/nested/_index.md"));
    assert!(skip.is_skipped("api.generated.md"));
    assert!(!skip.is_skipped("guide/api.generated.md"));

    assert!(!skip.is_skipped("guide/overview.md"));
}
