//! Shared SSE -> [`FragmentStream`] adapter.

use std::time::Duration;

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Response;

use crate::provider::{FragmentStream, LLMError};

/// What to do with one SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseAction {
    Emit(String),
    Skip,
    Finish,
}

/// Convert an SSE HTTP [`Response`] into a [`FragmentStream`].
///
/// `handler` receives each event's data payload. The stream ends on
/// [`SseAction::Finish`], at end of body, or after the first transport error, which is
/// yielded as [`LLMError::Stream`]. A gap longer than `idle_timeout` between events
/// yields [`LLMError::Timeout`] and ends the stream. Dropping the stream drops the
/// response body and releases the connection.
pub fn fragment_stream_from_sse<H>(
    response: Response,
    idle_timeout: Duration,
    mut handler: H,
) -> FragmentStream
where
    H: FnMut(&str) -> SseAction + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut events = Box::pin(response.bytes_stream().eventsource());

        loop {
            let next = match tokio::time::timeout(idle_timeout, events.next()).await {
                Ok(next) => next,
                Err(_) => {
                    yield Err(LLMError::Timeout(idle_timeout));
                    break;
                }
            };

            let Some(event) = next else {
                break;
            };

            match event {
                Ok(event) => match handler(event.data.as_str()) {
                    SseAction::Emit(fragment) => {
                        yield Ok(fragment);
                    }
                    SseAction::Skip => {}
                    SseAction::Finish => break,
                },
                Err(err) => {
                    yield Err(LLMError::Stream(err.to_string()));
                    break;
                }
            }
        }
    };

    Box::pin(stream)
}
