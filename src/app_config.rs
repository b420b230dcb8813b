use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Root directory with the Markdown sources
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Root directory for translated output (input paths are mirrored under it)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Segmentation config
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Translation config
    pub translation: TranslationConfig,

    /// Glossary config
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Optional variables file for `{{{ .path }}}` substitution
    #[serde(default)]
    pub variables_file: Option<String>,

    /// Files excluded from translation
    #[serde(default)]
    pub skip: SkipConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: LangLink workflow API
    #[default]
    LangLink,
    // @provider: In-process mock (tests and dry runs)
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::LangLink => "LangLink",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::LangLink => "langlink".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "langlink" => Ok(Self::LangLink),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Service URL
    #[serde(default = "default_langlink_endpoint")]
    pub endpoint: String,

    // @field: Workflow application id
    #[serde(default = "String::new")]
    pub app_id: String,

    // @field: Access key (falls back to LANGLINK_ACCESS_KEY)
    #[serde(default = "String::new")]
    pub access_key: String,

    // @field: Access secret (falls back to LANGLINK_ACCESS_SECRET)
    #[serde(default = "String::new")]
    pub access_secret: String,

    // @field: API user (falls back to LANGLINK_USER)
    #[serde(default = "String::new")]
    pub user: String,

    // @field: Response selector: workflow node carrying the translated text
    #[serde(default = "String::new")]
    pub output_node: String,

    // @field: Workflow banner prefix to strip from outputs
    #[serde(default)]
    pub strip_prefix: Option<String>,

    // @field: Max concurrent segment requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Poll interval while awaiting a workflow result
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    // @field: Poll budget per workflow run
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    // @field: Timeout seconds per HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            endpoint: default_langlink_endpoint(),
            app_id: String::new(),
            access_key: String::new(),
            access_secret: String::new(),
            user: String::new(),
            output_node: String::new(),
            strip_prefix: None,
            concurrent_requests: default_concurrent_requests(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            timeout_secs: default_timeout_secs(),
        }
    }

    // @returns: Access key from config or environment
    pub fn resolved_access_key(&self) -> String {
        resolve_credential(&self.access_key, "LANGLINK_ACCESS_KEY")
    }

    // @returns: Access secret from config or environment
    pub fn resolved_access_secret(&self) -> String {
        resolve_credential(&self.access_secret, "LANGLINK_ACCESS_SECRET")
    }

    // @returns: User from config or environment
    pub fn resolved_user(&self) -> String {
        resolve_credential(&self.user, "LANGLINK_USER")
    }
}

fn resolve_credential(configured: &str, env_var: &str) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    std::env::var(env_var).unwrap_or_default()
}

/// Settings shared by all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommonTranslationConfig {
    /// Number of attempts before a segment's translation is declared failed
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds between attempts (doubles per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for CommonTranslationConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Active provider
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Provider tried for a document whose primary translation fails
    #[serde(default)]
    pub fallback_provider: Option<TranslationProvider>,

    /// Configured providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common retry settings
    #[serde(default)]
    pub common: CommonTranslationConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            fallback_provider: None,
            available_providers: vec![ProviderConfig::new(TranslationProvider::LangLink)],
            common: CommonTranslationConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Find the configuration entry for a provider
    pub fn get_provider_config(&self, provider: &TranslationProvider) -> Option<&ProviderConfig> {
        let wanted = provider.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == wanted)
    }
}

/// Segmenter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    /// Maximum tokens per translatable segment
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self { max_tokens: default_max_tokens() }
    }
}

/// Glossary source configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GlossaryConfig {
    /// URL of a raw Markdown glossary table
    #[serde(default)]
    pub url: Option<String>,

    /// Local path of a Markdown glossary table
    #[serde(default)]
    pub path: Option<String>,
}

/// Files excluded from translation
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SkipConfig {
    /// Exact relative paths (from the input root) to skip
    #[serde(default)]
    pub files: Vec<String>,

    /// Glob patterns to skip; `*` matches within a path component, `**` across
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SkipConfig {
    /// Whether a relative path is excluded by the skip lists
    pub fn is_skipped(&self, relative_path: &str) -> bool {
        let normalized = relative_path.replace('\\', "/");
        if self.files.iter().any(|f| f == &normalized) {
            return true;
        }
        self.patterns.iter().any(|pattern| glob_matches(pattern, &normalized))
    }
}

/// Match a `*`/`**` glob against a normalized relative path
fn glob_matches(pattern: &str, path: &str) -> bool {
    let mut regex = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    // `**/` also matches an empty leading path
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        regex.push_str("(?:.*/)?");
                    } else {
                        regex.push_str(".*");
                    }
                } else {
                    regex.push_str("[^/]*");
                }
            }
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');

    regex::Regex::new(&regex).map(|re| re.is_match(path)).unwrap_or(false)
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal progress output
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "zh".to_string(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            segmentation: SegmentationConfig::default(),
            translation: TranslationConfig::default(),
            glossary: GlossaryConfig::default(),
            variables_file: None,
            skip: SkipConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language cannot be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }
        if self.segmentation.max_tokens == 0 {
            return Err(anyhow!("Token ceiling must be greater than zero"));
        }

        for provider in [Some(&self.translation.provider), self.translation.fallback_provider.as_ref()]
            .into_iter()
            .flatten()
        {
            let config = self
                .translation
                .get_provider_config(provider)
                .ok_or_else(|| anyhow!("No configuration for provider: {}", provider))?;

            if *provider == TranslationProvider::LangLink {
                if config.app_id.trim().is_empty() {
                    return Err(anyhow!("LangLink provider requires an app_id"));
                }
                if config.output_node.trim().is_empty() {
                    return Err(anyhow!("LangLink provider requires an output_node selector"));
                }
            }
        }

        if self.translation.common.retry_count == 0 {
            return Err(anyhow!("Retry count must be at least 1"));
        }

        Ok(())
    }
}

// Default value functions
fn default_input_dir() -> String {
    "markdowns".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_max_tokens() -> usize {
    1024
}

fn default_langlink_endpoint() -> String {
    "https://langlink.pingcap.net/langlink-api".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_max_polls() -> u32 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}
