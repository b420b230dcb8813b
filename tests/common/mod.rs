/*!
 * Common test utilities shared by unit and integration tests.
 */

use mdxlate::app_config::{Config, ProviderConfig, TranslationProvider};
use mdxlate::app_controller::Controller;
use mdxlate::glossary::GlossaryMatcher;
use mdxlate::providers::mock::{MockProvider, MockRequest};
use mdxlate::translation::{ProviderClient, TranslationService};

/// Build a config wired to the mock provider with fast retries
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config
        .translation
        .available_providers
        .push(ProviderConfig::new(TranslationProvider::Mock));
    config.translation.common.retry_backoff_ms = 1;
    config
}

/// Service around a specific mock provider, with fast retries
pub fn service_with(provider: MockProvider) -> TranslationService {
    TranslationService::with_client(ProviderClient::Mock(provider), 3, 1)
}

/// Service around an echoing mock provider
pub fn echo_service() -> TranslationService {
    service_with(MockProvider::working())
}

/// Controller over prebuilt services with an empty glossary
pub fn controller_with(
    config: Config,
    primary: TranslationService,
    fallback: Option<TranslationService>,
) -> Controller {
    Controller::with_services(config, GlossaryMatcher::empty(), primary, fallback)
        .expect("Failed to build controller")
}

/// Mock response generator simulating an English-to-French translation of the
/// fixture documents used by the pipeline tests
pub fn pseudo_french(request: &MockRequest) -> String {
    request
        .text
        .replace("# Title", "# Titre")
        .replace("Hello world.", "Bonjour le monde.")
        .replace("Intro paragraph", "Paragraphe d'introduction")
}

/// Mock response generator that loses every level-2 heading, simulating a
/// provider that drops structure
pub fn drop_subheadings(request: &MockRequest) -> String {
    request
        .text
        .lines()
        .filter(|line| !line.starts_with("## "))
        .collect::<Vec<_>>()
        .join("\n")
}
