use crate::conversation::ToolServerConfig;
use crate::conversation::messages::ConversationMessage;
use crate::error::Error;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::mpsc;

/// Channel of parsed message events; channel close is the terminal sentinel
pub type MessageStream = mpsc::Receiver<Result<ConversationMessage, Error>>;

/// Bounded configuration for one conversation with the assistant
#[derive(Debug, Clone)]
pub struct ConversationRequest {
    /// The rendered instruction prompt
    pub prompt: String,

    /// Maximum number of exchange turns the assistant may take
    pub max_turns: u32,

    /// Automation tool identifiers the assistant is allowed to invoke
    pub allowed_tools: Vec<String>,

    /// Optional inline tool-server configuration
    pub tool_server: Option<ToolServerConfig>,
}

/// Source of assistant message streams.
///
/// The trait is the seam between the pipeline and the external assistant
/// runtime: production code spawns the assistant CLI, tests feed a scripted
/// channel.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Opens a conversation and returns the receiving end of its message
    /// stream. The stream is finite, single-pass, and ends when the
    /// conversation does.
    async fn start(&self, request: ConversationRequest) -> Result<MessageStream, Error>;
}

/// Backend that spawns the assistant CLI in streaming JSON mode and parses
/// its stdout line by line into [`ConversationMessage`] events
#[derive(Debug, Clone)]
pub struct CliBackend {
    command: String,
}

impl CliBackend {
    /// Create a backend that invokes the given assistant command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for CliBackend {
    fn default() -> Self {
        Self::new("claude")
    }
}

#[async_trait]
impl AssistantBackend for CliBackend {
    async fn start(&self, request: ConversationRequest) -> Result<MessageStream, Error> {
        ::log::info!("Starting assistant process: {}", self.command);

        let mut command = tokio::process::Command::new(&self.command);
        command
            .arg("-p")
            .arg(&request.prompt)
            .arg("--output-format")
            .arg("stream-json")
            .arg("--verbose")
            .arg("--max-turns")
            .arg(request.max_turns.to_string());

        if !request.allowed_tools.is_empty() {
            command
                .arg("--allowed-tools")
                .arg(request.allowed_tools.join(","));
        }

        if let Some(tool_server) = &request.tool_server {
            command.arg("--mcp-config").arg(tool_server.to_mcp_json());
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If the producer task is dropped mid-stream, the child (and any
            // tool server it launched) must not outlive it
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| Error::Backend(format!("failed to spawn {}: {}", self.command, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Backend("assistant process has no stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Backend("assistant process has no stderr".to_string()))?;

        let (tx, rx) = mpsc::channel::<Result<ConversationMessage, Error>>(100);

        // Producer task: parse stdout lines into events and feed the channel.
        // Dropping the sender at the end closes the stream for the consumer.
        tokio::spawn(async move {
            let consumer_alive = forward_events(BufReader::new(stdout), &tx).await;

            if !consumer_alive {
                // The consumer stopped listening mid-stream; terminate the
                // assistant process instead of letting it run to completion.
                ::log::debug!("message stream consumer dropped, terminating assistant process");
                let _ = child.start_kill();
                let _ = child.wait().await;
                return;
            }

            // Stream ended; surface a non-zero exit as a conversation error
            // with whatever the process wrote to stderr.
            let mut stderr_text = String::new();
            let _ = stderr.read_to_string(&mut stderr_text).await;

            match child.wait().await {
                Ok(status) if status.success() => {
                    ::log::debug!("assistant process exited cleanly");
                }
                Ok(status) => {
                    let message = if stderr_text.trim().is_empty() {
                        format!("assistant process exited with {status}")
                    } else {
                        stderr_text.trim().to_string()
                    };
                    let _ = tx.send(Err(Error::conversation(message))).await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Err(Error::Backend(format!(
                            "failed waiting for assistant process: {e}"
                        ))))
                        .await;
                }
            }
        });

        Ok(rx)
    }
}

/// Parses one stdout line into an event.
///
/// Returns `None` for blank lines and for the non-JSON diagnostics the CLI
/// interleaves with the stream; those are skipped, not errors.
fn parse_stream_line(line: &str) -> Option<ConversationMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<ConversationMessage>(line) {
        Ok(message) => Some(message),
        Err(e) => {
            ::log::debug!("skipping unparseable stream line: {}", e);
            None
        }
    }
}

/// Forwards parsed events from `reader` into the channel until the reader
/// is exhausted. Returns `false` when the consumer dropped the stream, so
/// the caller can terminate the child instead of draining it.
async fn forward_events<R: AsyncBufRead + Unpin>(
    reader: R,
    tx: &mpsc::Sender<Result<ConversationMessage, Error>>,
) -> bool {
    let mut lines = reader.lines();

    loop {
        if tx.is_closed() {
            return false;
        }
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(message) = parse_stream_line(&line) {
                    if tx.send(Ok(message)).await.is_err() {
                        return false;
                    }
                }
            }
            Ok(None) => return true,
            Err(e) => {
                let _ = tx
                    .send(Err(Error::Backend(format!(
                        "failed reading assistant output: {e}"
                    ))))
                    .await;
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::driver::drive;
    use crate::conversation::messages::{ContentItem, MessageContent};

    #[test]
    fn test_parse_stream_line_accepts_valid_events() {
        let line = r#"{"type": "assistant", "message": {"content": [{"type": "text", "text": "hi"}]}}"#;
        let message = parse_stream_line(line).expect("valid event should parse");
        match message {
            ConversationMessage::Assistant { message } => match message.content {
                MessageContent::Items(items) => {
                    assert!(matches!(&items[0], ContentItem::Text { text } if text == "hi"));
                }
                other => panic!("expected items, got {other:?}"),
            },
            other => panic!("expected assistant message, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_stream_line_skips_noise() {
        assert!(parse_stream_line("").is_none());
        assert!(parse_stream_line("   ").is_none());
        assert!(parse_stream_line("Loading tools from tool server...").is_none());
        assert!(parse_stream_line("{not json").is_none());
        // Valid JSON that is not an object is noise too
        assert!(parse_stream_line("42").is_none());
    }

    #[test]
    fn test_parse_stream_line_trims_before_parsing() {
        let line = "  {\"type\": \"result\", \"is_error\": false}  ";
        assert!(matches!(
            parse_stream_line(line),
            Some(ConversationMessage::Result { .. })
        ));
    }

    #[tokio::test]
    async fn test_forward_events_skips_noise_and_forwards_valid_lines() {
        let input = b"diagnostic line\n\n{\"type\": \"assistant\", \"message\": {\"content\": \"chunk\"}}\n{not json\n{\"type\": \"result\", \"is_error\": false}\n";
        let (tx, mut rx) = mpsc::channel(100);

        let consumer_alive = forward_events(BufReader::new(&input[..]), &tx).await;
        drop(tx);

        assert!(consumer_alive);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event.unwrap());
        }
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ConversationMessage::Assistant { .. }));
        assert!(matches!(events[1], ConversationMessage::Result { .. }));
    }

    #[tokio::test]
    async fn test_forward_events_reports_dropped_consumer() {
        let input = b"{\"type\": \"result\", \"is_error\": false}\n";
        let (tx, rx) = mpsc::channel(100);
        drop(rx);

        let consumer_alive = forward_events(BufReader::new(&input[..]), &tx).await;
        assert!(!consumer_alive);
    }

    fn request() -> ConversationRequest {
        ConversationRequest {
            prompt: "ignored".to_string(),
            max_turns: 1,
            allowed_tools: Vec::new(),
            tool_server: None,
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_surfaces_as_conversation_error() {
        // `false` ignores its arguments, emits nothing and exits 1
        let backend = CliBackend::new("false");
        let stream = backend.start(request()).await.unwrap();
        let err = drive(stream).await.unwrap_err();
        match err {
            Error::Conversation { message, .. } => {
                assert!(message.contains("exited"), "unexpected message: {message}");
            }
            other => panic!("expected conversation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_noise_only_output_ends_cleanly() {
        // `echo` prints the CLI arguments (all unparseable) and exits 0
        let backend = CliBackend::new("echo");
        let stream = backend.start(request()).await.unwrap();
        let outcome = drive(stream).await.unwrap();
        assert_eq!(outcome.full_text, "");
        assert_eq!(outcome.messages_seen, 0);
    }
}
