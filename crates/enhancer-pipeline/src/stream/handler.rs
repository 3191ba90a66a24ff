use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use enhancer_core::{EnhanceError, StreamEvent};
use enhancer_llm::{FragmentStream, LLMError};

/// Result of draining the remote fragment stream.
#[derive(Debug)]
pub enum RemoteOutcome {
    /// Text whose fragments were all forwarded as chunk events.
    Delivered(String),
    /// Nothing was forwarded; the caller should fall back.
    Failed(LLMError),
}

/// Send one event. A closed channel means the consumer went away.
pub async fn emit(
    event_tx: &mpsc::Sender<StreamEvent>,
    event: StreamEvent,
) -> Result<(), EnhanceError> {
    event_tx
        .send(event)
        .await
        .map_err(|_| EnhanceError::Cancelled)
}

/// Forward remote fragments as chunk events in arrival order.
///
/// A transport error before the first fragment reports [`RemoteOutcome::Failed`]. After
/// the first fragment the text already forwarded is kept, so the chunks always add up to
/// the returned text.
pub async fn consume_fragment_stream(
    mut stream: FragmentStream,
    event_tx: &mpsc::Sender<StreamEvent>,
    cancel_token: &CancellationToken,
    request_id: &str,
) -> Result<RemoteOutcome, EnhanceError> {
    let mut content = String::new();
    let mut fragment_count = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return Err(EnhanceError::Cancelled),
            next = stream.next() => next,
        };

        match next {
            None => break,
            Some(Ok(fragment)) => {
                if fragment.is_empty() {
                    continue;
                }
                fragment_count += 1;
                content.push_str(&fragment);
                emit(event_tx, StreamEvent::chunk(fragment)).await?;
            }
            Some(Err(error)) if content.is_empty() => {
                return Ok(RemoteOutcome::Failed(error));
            }
            Some(Err(error)) => {
                log::warn!(
                    "[{}] Remote stream broke after {} fragments, keeping delivered text: {}",
                    request_id,
                    fragment_count,
                    error
                );
                break;
            }
        }
    }

    if content.is_empty() {
        return Ok(RemoteOutcome::Failed(LLMError::EmptyResponse));
    }

    log::debug!(
        "[{}] Remote stream completed: {} fragments, {} chars",
        request_id,
        fragment_count,
        content.len()
    );
    Ok(RemoteOutcome::Delivered(content))
}

/// Replay `text` as chunk events, one whitespace-delimited token at a time.
pub async fn emit_template_chunks(
    text: &str,
    event_tx: &mpsc::Sender<StreamEvent>,
    cancel_token: &CancellationToken,
    token_delay: Duration,
) -> Result<(), EnhanceError> {
    for (index, token) in whitespace_tokens(text).into_iter().enumerate() {
        if cancel_token.is_cancelled() {
            return Err(EnhanceError::Cancelled);
        }

        if index > 0 && !token_delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => return Err(EnhanceError::Cancelled),
                _ = tokio::time::sleep(token_delay) => {}
            }
        }

        emit(event_tx, StreamEvent::chunk(token)).await?;
    }

    Ok(())
}

/// Split `text` into tokens that each end with their trailing whitespace.
///
/// Leading whitespace stays attached to the first token, so concatenating the tokens
/// reproduces `text` exactly.
pub fn whitespace_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut seen_word = false;
    let mut in_whitespace = false;

    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_whitespace = true;
            continue;
        }

        if in_whitespace && seen_word {
            tokens.push(&text[start..index]);
            start = index;
        }
        in_whitespace = false;
        seen_word = true;
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn fragments(items: Vec<Result<&'static str, &'static str>>) -> FragmentStream {
        Box::pin(stream::iter(items.into_iter().map(|item| {
            item.map(str::to_string)
                .map_err(|message| LLMError::Stream(message.to_string()))
        })))
    }

    async fn drain(mut rx: mpsc::Receiver<StreamEvent>) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    fn chunk_text(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Chunk { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn tokens_keep_trailing_whitespace() {
        assert_eq!(
            whitespace_tokens("# CONTEXTO\nUsuário  solicitou: x"),
            vec!["# ", "CONTEXTO\n", "Usuário  ", "solicitou: ", "x"]
        );
    }

    #[test]
    fn tokens_reassemble_to_original() {
        for text in ["", "   ", "  lead", "trail  ", "a\n\n b\tc ", "ção é ok"] {
            assert_eq!(whitespace_tokens(text).concat(), text, "text: {text:?}");
        }
        assert!(whitespace_tokens("").is_empty());
        assert_eq!(whitespace_tokens("  lead"), vec!["  lead"]);
    }

    #[tokio::test]
    async fn forwards_fragments_in_order() {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let outcome = consume_fragment_stream(
            fragments(vec![Ok("# OBJ"), Ok(""), Ok("ETIVO\n"), Ok("done")]),
            &tx,
            &cancel,
            "req",
        )
        .await
        .unwrap();
        drop(tx);

        match outcome {
            RemoteOutcome::Delivered(text) => assert_eq!(text, "# OBJETIVO\ndone"),
            other => panic!("expected Delivered, got {other:?}"),
        }
        let events = drain(rx).await;
        assert_eq!(events.len(), 3);
        assert_eq!(chunk_text(&events), "# OBJETIVO\ndone");
    }

    #[tokio::test]
    async fn error_before_first_fragment_fails() {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let outcome = consume_fragment_stream(fragments(vec![Err("reset")]), &tx, &cancel, "req")
            .await
            .unwrap();
        drop(tx);

        assert!(matches!(outcome, RemoteOutcome::Failed(LLMError::Stream(_))));
        assert!(drain(rx).await.is_empty());
    }

    #[tokio::test]
    async fn empty_stream_fails_with_empty_response() {
        let (tx, _rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let outcome = consume_fragment_stream(fragments(vec![]), &tx, &cancel, "req")
            .await
            .unwrap();

        assert!(matches!(outcome, RemoteOutcome::Failed(LLMError::EmptyResponse)));
    }

    #[tokio::test]
    async fn error_after_fragment_keeps_delivered_text() {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let outcome = consume_fragment_stream(
            fragments(vec![Ok("partial "), Err("reset"), Ok("lost")]),
            &tx,
            &cancel,
            "req",
        )
        .await
        .unwrap();
        drop(tx);

        match outcome {
            RemoteOutcome::Delivered(text) => assert_eq!(text, "partial "),
            other => panic!("expected Delivered, got {other:?}"),
        }
        assert_eq!(chunk_text(&drain(rx).await), "partial ");
    }

    #[tokio::test]
    async fn cancelled_token_stops_consumption() {
        let (tx, _rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let pending: FragmentStream = Box::pin(stream::pending());
        let result = consume_fragment_stream(pending, &tx, &cancel, "req").await;

        assert!(matches!(result, Err(EnhanceError::Cancelled)));
    }

    #[tokio::test]
    async fn template_chunks_reassemble_text() {
        let (tx, rx) = mpsc::channel(256);
        let cancel = CancellationToken::new();
        let text = enhancer_core::generate_template("build a CLI", "coding");

        emit_template_chunks(&text, &tx, &cancel, Duration::ZERO)
            .await
            .unwrap();
        drop(tx);

        assert_eq!(chunk_text(&drain(rx).await), text);
    }

    #[tokio::test]
    async fn template_chunks_stop_when_cancelled() {
        let (tx, _rx) = mpsc::channel(256);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = emit_template_chunks("a b c", &tx, &cancel, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(EnhanceError::Cancelled)));
    }

    #[tokio::test]
    async fn closed_channel_reports_cancelled() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let cancel = CancellationToken::new();

        let result = emit_template_chunks("a b", &tx, &cancel, Duration::ZERO).await;
        assert!(matches!(result, Err(EnhanceError::Cancelled)));
    }
}
