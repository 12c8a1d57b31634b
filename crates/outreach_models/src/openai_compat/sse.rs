//! Server-sent event decoding for streamed chat completions.

use crate::openai_compat::{ChatChunk, OpenAICompatError};
use futures_util::{Stream, StreamExt};
use tracing::{debug, trace};

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload
    Data(String),
    /// The `[DONE]` terminator
    Done,
}

/// Incremental line decoder for `text/event-stream` bodies.
///
/// Network chunks may split lines and multi-byte characters; bytes are held
/// back until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    /// Feeds raw bytes and returns every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(bytes);
        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let line = std::mem::take(&mut self.pending);
        parse_line(&line)
    }
}

fn parse_line(line: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload == "[DONE]" {
        Some(SseEvent::Done)
    } else if payload.is_empty() {
        None
    } else {
        Some(SseEvent::Data(payload.to_string()))
    }
}

/// Text carried by a chunk's first choice, and whether the choice finished.
pub fn chunk_text(chunk: &ChatChunk) -> (Option<String>, bool) {
    match chunk.choices.first() {
        Some(choice) => (
            choice.delta.content.clone().filter(|c| !c.is_empty()),
            choice.finish_reason.is_some(),
        ),
        None => (None, false),
    }
}

/// Turns a raw event-stream body into text fragments.
///
/// The stream ends after `[DONE]` or a chunk carrying a finish reason. A body
/// that stops before either yields a final [`OpenAICompatError::StreamInterrupted`].
pub fn text_fragments<S, B, E>(body: S) -> impl Stream<Item = Result<String, OpenAICompatError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::default();
        let mut finished = false;
        let body = body;
        futures_util::pin_mut!(body);

        'read: while let Some(chunk) = body.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(OpenAICompatError::Http(format!("Stream read failed: {}", e)));
                    return;
                }
            };
            for event in decoder.push(bytes.as_ref()) {
                match decode_event(event) {
                    Ok(Decoded::Text(text)) => yield Ok(text),
                    Ok(Decoded::Finished(text)) => {
                        if let Some(text) = text {
                            yield Ok(text);
                        }
                        finished = true;
                        break 'read;
                    }
                    Ok(Decoded::Nothing) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if !finished {
            let mut completed = false;
            match decoder.finish().map(decode_event) {
                Some(Ok(Decoded::Finished(text))) => {
                    if let Some(text) = text {
                        yield Ok(text);
                    }
                    completed = true;
                }
                Some(Ok(Decoded::Text(text))) => yield Ok(text),
                Some(Err(e)) => {
                    yield Err(e);
                    return;
                }
                Some(Ok(Decoded::Nothing)) | None => {}
            }
            if !completed {
                debug!("Event stream ended without completion marker");
                yield Err(OpenAICompatError::StreamInterrupted(
                    "body ended before the completion marker".to_string(),
                ));
            }
        }
    }
}

enum Decoded {
    Text(String),
    Finished(Option<String>),
    Nothing,
}

fn decode_event(event: SseEvent) -> Result<Decoded, OpenAICompatError> {
    match event {
        SseEvent::Done => Ok(Decoded::Finished(None)),
        SseEvent::Data(payload) => {
            trace!(payload = %payload, "Received stream chunk");
            let chunk: ChatChunk = serde_json::from_str(&payload).map_err(|e| {
                OpenAICompatError::ResponseParsing(format!("Invalid stream chunk: {}", e))
            })?;
            match chunk_text(&chunk) {
                (text, true) => Ok(Decoded::Finished(text)),
                (Some(text), false) => Ok(Decoded::Text(text)),
                (None, false) => Ok(Decoded::Nothing),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunk(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":{}}}}}]}}\n\n",
            serde_json::to_string(content).unwrap()
        )
    }

    async fn collect(parts: Vec<Vec<u8>>) -> Vec<Result<String, String>> {
        let body = stream::iter(parts.into_iter().map(Ok::<_, std::io::Error>));
        text_fragments(body)
            .map(|r| r.map_err(|e| e.to_string()))
            .collect()
            .await
    }

    #[test]
    fn test_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let events = decoder.push(b":1}\n\n: keep-alive\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
    }

    #[test]
    fn test_decoder_keeps_multibyte_characters_across_chunks() {
        let mut decoder = SseDecoder::default();
        let line = "data: café\n".as_bytes();
        let split = line.len() - 2;
        assert!(decoder.push(&line[..split]).is_empty());
        let events = decoder.push(&line[split..]);
        assert_eq!(events, vec![SseEvent::Data("café".to_string())]);
    }

    #[tokio::test]
    async fn test_fragments_until_done() {
        let body = format!("{}{}data: [DONE]\n\n", chunk("Mailbox "), chunk("full."));
        let mid = body.len() / 2;
        let parts = vec![body.as_bytes()[..mid].to_vec(), body.as_bytes()[mid..].to_vec()];

        let fragments = collect(parts).await;
        assert_eq!(
            fragments,
            vec![Ok("Mailbox ".to_string()), Ok("full.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_finish_reason_ends_stream() {
        let body = format!(
            "{}data: {{\"choices\":[{{\"delta\":{{}},\"finish_reason\":\"stop\"}}]}}\n\n{}",
            chunk("done"),
            chunk("ignored")
        );
        let fragments = collect(vec![body.into_bytes()]).await;
        assert_eq!(fragments, vec![Ok("done".to_string())]);
    }

    #[tokio::test]
    async fn test_truncated_body_is_an_error() {
        let fragments = collect(vec![chunk("half").into_bytes()]).await;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], Ok("half".to_string()));
        assert!(fragments[1].as_ref().unwrap_err().contains("Stream interrupted"));
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_an_error() {
        let fragments = collect(vec![b"data: {not json}\n".to_vec()]).await;
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].as_ref().unwrap_err().contains("Invalid stream chunk"));
    }
}
