/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which owns a provider
 * client and wraps every call in the bounded retry budget. A call that keeps
 * failing past the budget surfaces as `TranslationError::RetriesExhausted`,
 * which is fatal for the document being translated but never for the batch.
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{debug, warn};

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::langlink::{LangLink, WorkflowRequest};
use crate::providers::mock::{MockProvider, MockRequest};

/// The concrete provider client behind a translation service
#[derive(Debug)]
pub enum ProviderClient {
    /// LangLink workflow API client
    LangLink(LangLink),
    /// In-process mock client
    Mock(MockProvider),
}

impl ProviderClient {
    async fn translate(
        &self,
        text: &str,
        glossary: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError> {
        match self {
            Self::LangLink(client) => {
                let request = WorkflowRequest {
                    content: text.to_string(),
                    glossary: glossary.clone(),
                };
                let response = client.complete(request).await?;
                Ok(LangLink::extract_text(&response))
            }
            Self::Mock(client) => {
                let request = MockRequest {
                    text: text.to_string(),
                    glossary: glossary.clone(),
                };
                let response = client.complete(request).await?;
                Ok(MockProvider::extract_text(&response))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self {
            Self::LangLink(client) => client.test_connection().await,
            Self::Mock(client) => client.test_connection().await,
        }
    }
}

/// Translation service wrapping one provider with bounded retry
#[derive(Clone)]
pub struct TranslationService {
    client: Arc<ProviderClient>,
    /// Attempts per call before giving up
    retry_count: u32,
    /// Base backoff between attempts, doubled per attempt
    retry_backoff_ms: u64,
    /// Concurrency cap for segment dispatch
    max_concurrent_requests: usize,
}

impl TranslationService {
    /// Build a service for the given provider from the translation config
    pub fn from_config(
        config: &TranslationConfig,
        provider: &TranslationProvider,
    ) -> Result<Self> {
        let provider_config = config
            .get_provider_config(provider)
            .ok_or_else(|| anyhow!("No configuration for provider: {}", provider))?;

        let client = match provider {
            TranslationProvider::LangLink => ProviderClient::LangLink(LangLink::new(
                &provider_config.endpoint,
                &provider_config.app_id,
                &provider_config.resolved_access_key(),
                &provider_config.resolved_access_secret(),
                &provider_config.resolved_user(),
                &provider_config.output_node,
                provider_config.strip_prefix.clone(),
                provider_config.poll_interval_ms,
                provider_config.max_polls,
                provider_config.timeout_secs,
            )?),
            TranslationProvider::Mock => ProviderClient::Mock(MockProvider::working()),
        };

        Ok(Self {
            client: Arc::new(client),
            retry_count: config.common.retry_count,
            retry_backoff_ms: config.common.retry_backoff_ms,
            max_concurrent_requests: provider_config.concurrent_requests,
        })
    }

    /// Build a service around an existing client (used by tests)
    pub fn with_client(client: ProviderClient, retry_count: u32, retry_backoff_ms: u64) -> Self {
        Self {
            client: Arc::new(client),
            retry_count,
            retry_backoff_ms,
            max_concurrent_requests: 4,
        }
    }

    /// Concurrency cap for segment dispatch
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Translate one span of text, retrying up to the configured budget
    pub async fn translate_text(
        &self,
        text: &str,
        glossary: &BTreeMap<String, String>,
    ) -> Result<String, TranslationError> {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_count {
            if attempt > 1 {
                let backoff_ms = self.retry_backoff_ms * (1u64 << (attempt - 2));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            match self.client.translate(text, glossary).await {
                Ok(result) => {
                    debug!("Translation call succeeded on attempt {}", attempt);
                    return Ok(result);
                }
                Err(e) => {
                    warn!(
                        "Translation attempt {}/{} failed: {}",
                        attempt, self.retry_count, e
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(TranslationError::RetriesExhausted {
            attempts: self.retry_count,
            last_error,
        })
    }

    /// Test the connection to the underlying provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }
}
