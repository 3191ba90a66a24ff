use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use enhancer_core::{
    build_user_message, generate_template, EnhanceError, EnhancementPath, EnhancementRequest,
    EnhancementResult, StreamEvent, TemplateReason, SYSTEM_INSTRUCTION,
};
use enhancer_llm::CompletionProvider;

use crate::config::PipelineConfig;
use crate::stream::handler::{consume_fragment_stream, emit, emit_template_chunks, RemoteOutcome};

pub type Result<T> = std::result::Result<T, EnhanceError>;

const INPUT_PREVIEW_CHARS: usize = 50;

/// Turns an enhancement request into a structured prompt, remotely when a provider is
/// configured and from the local template otherwise.
pub struct Enhancer {
    provider: Option<Arc<dyn CompletionProvider>>,
    config: PipelineConfig,
}

impl Enhancer {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self {
            provider,
            config: PipelineConfig::default(),
        }
    }

    pub fn template_only() -> Self {
        Self::new(None)
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_deref().map(|provider| provider.model())
    }

    /// Produce a complete result in one shot. Never fails: any remote error falls back to
    /// the template.
    pub async fn enhance(&self, request: &EnhancementRequest, request_id: &str) -> EnhancementResult {
        log_request(request, request_id);

        let Some(provider) = self.provider.as_ref() else {
            log::info!("[{}] No API key configured, using template", request_id);
            return template_result(request, TemplateReason::NotConfigured);
        };

        let user_message = build_user_message(request);
        match provider.complete(SYSTEM_INSTRUCTION, &user_message).await {
            Ok(content) => {
                log::info!(
                    "[{}] {} returned {} chars",
                    request_id,
                    provider.model(),
                    content.len()
                );
                let path = EnhancementPath::Remote {
                    model: provider.model().to_string(),
                };
                EnhancementResult::assemble(content, &path)
            }
            Err(error) => {
                log::warn!(
                    "[{}] {} call failed, falling back to template: {}",
                    request_id,
                    provider.model(),
                    error
                );
                template_result(request, TemplateReason::RemoteFailed)
            }
        }
    }

    /// Produce the result incrementally on `event_tx`.
    ///
    /// Emits at least one status event before any chunk, then chunks whose concatenation is
    /// the final `optimized_prompt`, then exactly one `Complete`. Returns
    /// [`EnhanceError::Cancelled`] without a terminal event when `cancel_token` fires or the
    /// receiver is dropped.
    pub async fn enhance_stream(
        &self,
        request: &EnhancementRequest,
        request_id: &str,
        event_tx: mpsc::Sender<StreamEvent>,
        cancel_token: CancellationToken,
    ) -> Result<EnhancementResult> {
        log_request(request, request_id);
        emit(&event_tx, StreamEvent::status("Analyzing intent...")).await?;

        let (optimized_prompt, path) = match self.provider.as_ref() {
            Some(provider) => {
                self.stream_remote(provider.as_ref(), request, request_id, &event_tx, &cancel_token)
                    .await?
            }
            None => {
                emit(&event_tx, StreamEvent::status("Generating template...")).await?;
                let text = generate_template(request.input(), request.mode());
                emit_template_chunks(&text, &event_tx, &cancel_token, self.config.token_delay)
                    .await?;
                (text, EnhancementPath::Template(TemplateReason::NotConfigured))
            }
        };

        emit(&event_tx, StreamEvent::status("Calculating quality score...")).await?;
        let result = EnhancementResult::assemble(optimized_prompt, &path);

        log::info!(
            "[{}] Stream finished via {}: score {:.1}",
            request_id,
            path.label(),
            result.score.final_score()
        );
        emit(&event_tx, StreamEvent::Complete(result.clone())).await?;

        Ok(result)
    }

    async fn stream_remote(
        &self,
        provider: &dyn CompletionProvider,
        request: &EnhancementRequest,
        request_id: &str,
        event_tx: &mpsc::Sender<StreamEvent>,
        cancel_token: &CancellationToken,
    ) -> Result<(String, EnhancementPath)> {
        emit(
            event_tx,
            StreamEvent::status(format!("Calling {}...", provider.model())),
        )
        .await?;

        let user_message = build_user_message(request);
        let opened = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return Err(EnhanceError::Cancelled),
            opened = provider.complete_stream(SYSTEM_INSTRUCTION, &user_message) => opened,
        };

        let failure = match opened {
            Ok(fragments) => {
                emit(event_tx, StreamEvent::status("Streaming response...")).await?;
                match consume_fragment_stream(fragments, event_tx, cancel_token, request_id)
                    .await?
                {
                    RemoteOutcome::Delivered(text) => {
                        let path = EnhancementPath::Remote {
                            model: provider.model().to_string(),
                        };
                        return Ok((text, path));
                    }
                    RemoteOutcome::Failed(error) => error,
                }
            }
            Err(error) => error,
        };

        log::warn!(
            "[{}] {} stream failed before any content, falling back to template: {}",
            request_id,
            provider.model(),
            failure
        );
        emit(event_tx, StreamEvent::status("Using template fallback...")).await?;
        let text = generate_template(request.input(), request.mode());
        emit_template_chunks(&text, event_tx, cancel_token, self.config.token_delay).await?;

        Ok((text, EnhancementPath::Template(TemplateReason::RemoteFailed)))
    }
}

fn template_result(request: &EnhancementRequest, reason: TemplateReason) -> EnhancementResult {
    let text = generate_template(request.input(), request.mode());
    EnhancementResult::assemble(text, &EnhancementPath::Template(reason))
}

fn log_request(request: &EnhancementRequest, request_id: &str) {
    let preview: String = request.input().chars().take(INPUT_PREVIEW_CHARS).collect();
    log::info!(
        "[{}] Enhancing prompt (mode: {}): {}",
        request_id,
        request.mode(),
        preview
    );
}
