use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::provider::CompletionProvider;
use crate::providers::MiniMaxProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.minimax.io/v1";
pub const DEFAULT_MODEL: &str = "MiniMax-M2.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote completion settings, read once at startup.
///
/// A missing or blank credential is a valid configuration: it selects the template-only
/// mode and no provider is built.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub group_id: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            group_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    pub fn with_group_id(mut self, group_id: Option<String>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn credential(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    pub fn group_id(&self) -> Option<&str> {
        non_blank(self.group_id.as_deref())
    }

    /// First four characters followed by a mask, for log lines.
    pub fn masked_credential(&self) -> Option<String> {
        self.credential().map(|key| {
            let visible: String = key.chars().take(4).collect();
            format!("{visible}****")
        })
    }

    /// Build the remote provider, or `None` when no credential is configured.
    pub fn build_provider(&self) -> Option<Arc<dyn CompletionProvider>> {
        let api_key = self.credential()?;

        let provider = MiniMaxProvider::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_group_id(self.group_id().map(str::to_string))
            .with_timeout(self.timeout);

        Some(Arc::new(provider))
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.masked_credential())
            .field("group_id", &self.group_id)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
