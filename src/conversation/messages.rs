use serde::Deserialize;

/// One event in the assistant's message stream.
///
/// The assistant runtime emits these one at a time as newline-delimited JSON.
/// Only `assistant` and `result` events carry information the pipeline acts
/// on; everything else is consumed and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationMessage {
    /// A turn produced by the assistant, carrying text and/or tool calls
    Assistant {
        /// The wrapped message payload
        message: AssistantMessage,
    },

    /// Terminal event summarizing the exchange
    Result {
        /// Result classification reported by the runtime
        #[serde(default)]
        subtype: Option<String>,

        /// Final result text, when present
        #[serde(default)]
        result: Option<String>,

        /// Whether the runtime reported the exchange as failed
        #[serde(default)]
        is_error: bool,
    },

    /// Runtime bookkeeping events (session init, tool registration, ...)
    System {
        /// Event classification
        #[serde(default)]
        subtype: Option<String>,
    },

    /// Any event kind this pipeline does not model
    #[serde(other)]
    Other,
}

/// Payload of an `assistant` event
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Either a bare string or an ordered list of content items
    pub content: MessageContent,
}

/// Assistant message content, which the runtime emits in two shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain string content
    Text(String),
    /// Ordered sequence of typed content items
    Items(Vec<ContentItem>),
}

/// One item of structured assistant content
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// A chunk of response text
    Text {
        /// The text itself
        text: String,
    },

    /// An invocation of a named automation tool
    ToolUse {
        /// Opaque tool identifier, e.g. `mcp__playwright__browser_navigate`
        name: String,

        /// JSON input payload passed to the tool
        #[serde(default)]
        input: serde_json::Value,
    },

    /// Content kinds this pipeline does not model
    #[serde(other)]
    Other,
}
