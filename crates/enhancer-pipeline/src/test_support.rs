use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;

use enhancer_llm::{CompletionProvider, FragmentStream, LLMError};

pub const MOCK_MODEL: &str = "mock-model";

/// Canned provider behaviour.
pub enum Script {
    Complete(String),
    Fail,
    /// `None` items surface as transport errors.
    Stream(Vec<Option<String>>),
    /// The stream opens but never yields.
    Pending,
}

pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> LLMError {
        LLMError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn model(&self) -> &str {
        MOCK_MODEL
    }

    async fn complete(&self, _system: &str, _user: &str) -> enhancer_llm::provider::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Complete(text) => Ok(text.clone()),
            Script::Stream(items) => Ok(items.iter().flatten().cloned().collect()),
            Script::Fail | Script::Pending => Err(Self::unavailable()),
        }
    }

    async fn complete_stream(
        &self,
        _system: &str,
        _user: &str,
    ) -> enhancer_llm::provider::Result<FragmentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Complete(text) => Ok(Box::pin(stream::iter(vec![Ok(text.clone())]))),
            Script::Fail => Err(Self::unavailable()),
            Script::Stream(items) => {
                let items: Vec<_> = items
                    .iter()
                    .map(|item| {
                        item.clone()
                            .ok_or_else(|| LLMError::Stream("connection reset".to_string()))
                    })
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Script::Pending => Ok(Box::pin(stream::pending())),
        }
    }
}
