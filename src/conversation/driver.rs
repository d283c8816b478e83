use crate::conversation::backend::MessageStream;
use crate::conversation::messages::{ContentItem, ConversationMessage, MessageContent};
use crate::error::Error;
use crate::prompt::{BROWSER_CLOSE, BROWSER_NAVIGATE, BROWSER_SNAPSHOT};

/// What a completed conversation produced
#[derive(Debug, Clone, Default)]
pub struct ConversationOutcome {
    /// All assistant text chunks concatenated in arrival order
    pub full_text: String,

    /// The last text chunk that looked like a structural page snapshot
    /// (best effort; may be absent)
    pub snapshot_data: Option<String>,

    /// Number of stream events consumed
    pub messages_seen: usize,

    /// Number of tool invocations observed
    pub tool_calls: usize,
}

/// Drives one conversation to completion.
///
/// A fixed read loop over the message stream: tool invocations are logged
/// for progress, text chunks accumulate into the transcript. There are no
/// retries and no branching on tool results; the loop ends when the stream
/// closes or yields an error, which is propagated unchanged apart from an
/// optional remediation hint for known tool-access failures.
pub async fn drive(mut stream: MessageStream) -> Result<ConversationOutcome, Error> {
    let mut outcome = ConversationOutcome::default();

    while let Some(event) = stream.recv().await {
        let message = match event {
            Ok(message) => message,
            Err(e) => return Err(attach_hint(e)),
        };
        outcome.messages_seen += 1;

        match message {
            ConversationMessage::Assistant { message } => match message.content {
                MessageContent::Text(text) => {
                    append_text(&mut outcome, &text);
                }
                MessageContent::Items(items) => {
                    for item in items {
                        match item {
                            ContentItem::ToolUse { name, .. } => {
                                outcome.tool_calls += 1;
                                log_tool_use(&name);
                            }
                            ContentItem::Text { text } => {
                                append_text(&mut outcome, &text);
                            }
                            ContentItem::Other => {}
                        }
                    }
                }
            },
            ConversationMessage::Result {
                subtype,
                result,
                is_error,
            } => {
                if is_error {
                    let message = result
                        .or(subtype)
                        .unwrap_or_else(|| "assistant reported an error result".to_string());
                    return Err(attach_hint(Error::conversation(message)));
                }
                ::log::debug!(
                    "conversation result: {}",
                    subtype.as_deref().unwrap_or("unknown")
                );
            }
            ConversationMessage::System { subtype } => {
                ::log::trace!("system event: {}", subtype.as_deref().unwrap_or("unknown"));
            }
            ConversationMessage::Other => {}
        }
    }

    ::log::info!(
        "Conversation complete: {} events, {} tool calls, {} chars of text",
        outcome.messages_seen,
        outcome.tool_calls,
        outcome.full_text.len()
    );

    Ok(outcome)
}

/// Appends a text chunk to the transcript and remembers it as the snapshot
/// candidate when it carries accessibility-tree markers. Last match wins.
fn append_text(outcome: &mut ConversationOutcome, text: &str) {
    outcome.full_text.push_str(text);
    if text.contains("role:") || text.contains("name:") {
        outcome.snapshot_data = Some(text.to_string());
    }
}

/// Logs a progress message for an observed tool invocation
fn log_tool_use(name: &str) {
    match name {
        BROWSER_NAVIGATE => ::log::info!("Navigating to page..."),
        BROWSER_SNAPSHOT => ::log::info!("Taking page snapshot..."),
        BROWSER_CLOSE => ::log::info!("Closing browser..."),
        other => ::log::info!("Assistant invoked tool: {}", other),
    }
}

/// Re-derives the remediation hint for conversation errors that arrived
/// without one (e.g. raw backend failures referencing a tool identifier)
fn attach_hint(error: Error) -> Error {
    match error {
        Error::Conversation {
            message,
            hint: None,
        } => Error::conversation(message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::messages::AssistantMessage;
    use tokio::sync::mpsc;

    fn assistant_text(text: &str) -> ConversationMessage {
        ConversationMessage::Assistant {
            message: AssistantMessage {
                content: MessageContent::Items(vec![ContentItem::Text {
                    text: text.to_string(),
                }]),
            },
        }
    }

    async fn drive_scripted(
        events: Vec<Result<ConversationMessage, Error>>,
    ) -> Result<ConversationOutcome, Error> {
        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(async move {
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        drive(rx).await
    }

    #[tokio::test]
    async fn test_text_accumulates_in_order() {
        let outcome = drive_scripted(vec![
            Ok(assistant_text("first ")),
            Ok(assistant_text("second ")),
            Ok(assistant_text("third")),
        ])
        .await
        .unwrap();
        assert_eq!(outcome.full_text, "first second third");
        assert_eq!(outcome.messages_seen, 3);
    }

    #[tokio::test]
    async fn test_string_content_accumulates_too() {
        let outcome = drive_scripted(vec![Ok(ConversationMessage::Assistant {
            message: AssistantMessage {
                content: MessageContent::Text("bare string".to_string()),
            },
        })])
        .await
        .unwrap();
        assert_eq!(outcome.full_text, "bare string");
    }

    #[tokio::test]
    async fn test_tool_calls_are_counted_not_accumulated() {
        let outcome = drive_scripted(vec![Ok(ConversationMessage::Assistant {
            message: AssistantMessage {
                content: MessageContent::Items(vec![
                    ContentItem::ToolUse {
                        name: BROWSER_NAVIGATE.to_string(),
                        input: serde_json::json!({"url": "https://example.com"}),
                    },
                    ContentItem::Text {
                        text: "done".to_string(),
                    },
                ]),
            },
        })])
        .await
        .unwrap();
        assert_eq!(outcome.tool_calls, 1);
        assert_eq!(outcome.full_text, "done");
    }

    #[tokio::test]
    async fn test_last_snapshot_chunk_wins() {
        let outcome = drive_scripted(vec![
            Ok(assistant_text("- role: button name: Submit\n")),
            Ok(assistant_text("analysis text\n")),
            Ok(assistant_text("- role: textbox name: Email\n")),
        ])
        .await
        .unwrap();
        assert_eq!(
            outcome.snapshot_data.as_deref(),
            Some("- role: textbox name: Email\n")
        );
    }

    #[tokio::test]
    async fn test_error_event_propagates_with_hint() {
        let err = drive_scripted(vec![
            Ok(assistant_text("partial")),
            Err(Error::Conversation {
                message: "tool mcp__playwright__browser_snapshot unavailable".to_string(),
                hint: None,
            }),
        ])
        .await
        .unwrap_err();
        match err {
            Error::Conversation { hint, .. } => assert!(hint.is_some()),
            other => panic!("expected conversation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_result_event_fails_the_conversation() {
        let err = drive_scripted(vec![Ok(ConversationMessage::Result {
            subtype: Some("error_max_turns".to_string()),
            result: None,
            is_error: true,
        })])
        .await
        .unwrap_err();
        match err {
            Error::Conversation { message, .. } => {
                assert_eq!(message, "error_max_turns");
            }
            other => panic!("expected conversation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_error_result_is_consumed() {
        let outcome = drive_scripted(vec![
            Ok(assistant_text("text")),
            Ok(ConversationMessage::Result {
                subtype: Some("success".to_string()),
                result: Some("summary".to_string()),
                is_error: false,
            }),
        ])
        .await
        .unwrap();
        assert_eq!(outcome.full_text, "text");
        assert_eq!(outcome.messages_seen, 2);
    }
}
