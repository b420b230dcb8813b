/*!
 * LangLink workflow client.
 *
 * LangLink applications run a server-side translation workflow asynchronously:
 * the client submits an input, receives a run id, and polls a debug endpoint
 * until the run's node outputs appear. The translated text is picked out of
 * the node list by an opaque response selector (`output_node`), a detail of
 * the remote application's own pipeline that is configuration here, not logic.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// LangLink client for one configured application
#[derive(Debug)]
pub struct LangLink {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the LangLink API
    base_url: String,
    /// Application identifier of the translation workflow
    app_id: String,
    /// Access key credential
    access_key: String,
    /// Access secret credential
    access_secret: String,
    /// User identifier credential
    user: String,
    /// Response selector: the workflow node whose output is the translation
    output_node: String,
    /// Optional literal prefix injected by the workflow prompt, stripped from output
    strip_prefix: Option<String>,
    /// Delay between result polls
    poll_interval: Duration,
    /// Maximum number of result polls per run
    max_polls: u32,
}

/// Translation request for a LangLink workflow
#[derive(Debug, Clone)]
pub struct WorkflowRequest {
    /// The text to translate
    pub content: String,
    /// Glossary subset for this document, passed to every segment call
    pub glossary: BTreeMap<String, String>,
}

/// Translation response from a LangLink workflow
#[derive(Debug, Clone)]
pub struct WorkflowResponse {
    /// The translated text
    pub output: String,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    input: SubmitInput<'a>,
}

#[derive(Serialize)]
struct SubmitInput<'a> {
    content: &'a str,
    /// The workflow expects the glossary as a JSON string, not an object
    glossary: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct DebugResponse {
    #[serde(default)]
    debug: Vec<DebugNode>,
}

#[derive(Deserialize)]
struct DebugNode {
    block: String,
    #[serde(default)]
    output: String,
}

impl LangLink {
    /// Create a new LangLink client
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_url: &str,
        app_id: &str,
        access_key: &str,
        access_secret: &str,
        user: &str,
        output_node: &str,
        strip_prefix: Option<String>,
        poll_interval_ms: u64,
        max_polls: u32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            access_key: access_key.to_string(),
            access_secret: access_secret.to_string(),
            user: user.to_string(),
            output_node: output_node.to_string(),
            strip_prefix,
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_polls,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Content-Type", "application/json")
            .header("x-langlink-access-key", &self.access_key)
            .header("x-langlink-access-secret", &self.access_secret)
            .header("x-langlink-user", &self.user)
    }

    /// Submit a workflow run and return its id
    async fn submit(&self, request: &WorkflowRequest) -> Result<String, ProviderError> {
        let url = format!("{}/applications/{}/async", self.base_url, self.app_id);
        let glossary = serde_json::to_string(&request.glossary)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let body = SubmitBody { input: SubmitInput { content: &request.content, glossary } };

        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(submitted.id)
    }

    /// Fetch the node outputs of a run; empty until the workflow finishes
    async fn fetch_outputs(&self, run_id: &str) -> Result<Vec<DebugNode>, ProviderError> {
        let url = format!("{}/applications/{}/debug/{}", self.base_url, self.app_id, run_id);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let debug: DebugResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(debug.debug)
    }

    /// Poll for a run's result until the poll budget is spent
    async fn await_result(&self, run_id: &str) -> Result<String, ProviderError> {
        for poll in 0..self.max_polls {
            if poll > 0 {
                tokio::time::sleep(self.poll_interval).await;
            }

            let nodes = self.fetch_outputs(run_id).await?;
            if nodes.is_empty() {
                continue;
            }

            let node = nodes
                .into_iter()
                .find(|node| node.block == self.output_node)
                .ok_or_else(|| ProviderError::MissingOutputNode {
                    selector: self.output_node.clone(),
                })?;
            return Ok(self.clean_output(node.output));
        }

        Err(ProviderError::PollBudgetExceeded { polls: self.max_polls })
    }

    /// Strip the configured workflow banner prefix, if any
    fn clean_output(&self, output: String) -> String {
        match &self.strip_prefix {
            Some(prefix) => match output.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.to_string(),
                None => output,
            },
            None => output,
        }
    }
}

#[async_trait]
impl Provider for LangLink {
    type Request = WorkflowRequest;
    type Response = WorkflowResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let run_id = self.submit(&request).await?;
        let output = self.await_result(&run_id).await?;
        Ok(WorkflowResponse { output })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.authorized(self.client.get(&self.base_url))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.output.clone()
    }
}
