use thiserror::Error;

/// Errors surfaced by the generation pipeline.
///
/// An extraction that produced no code artifacts is deliberately NOT an
/// error; it is reported through [`crate::output::RunReport`] so the caller
/// can warn the operator instead of aborting.
#[derive(Debug, Error)]
pub enum Error {
    /// The markdown configuration is missing required fields
    #[error("markdown config is missing required field(s): {}", .missing.join(", "))]
    Configuration {
        /// Names of the absent fields
        missing: Vec<String>,
    },

    /// The assistant conversation failed mid-stream
    #[error("conversation failed: {message}{}", .hint.as_deref().map(|h| format!("\n{h}")).unwrap_or_default())]
    Conversation {
        /// The underlying failure message, propagated unchanged
        message: String,
        /// Optional remediation hint for known tool-access failures
        hint: Option<String>,
    },

    /// The assistant process could not be spawned or driven
    #[error("assistant backend error: {0}")]
    Backend(String),

    /// Directory creation or file write failure
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps a conversation failure, attaching a remediation hint when the
    /// message references a tool-server tool that was unavailable.
    pub fn conversation(message: impl Into<String>) -> Self {
        let message = message.into();
        let hint = if message.contains("mcp__playwright") {
            Some(
                "The Playwright tool server may not be configured. Make sure \
                 Chrome/Chromium is installed, or pass --inline-tool-server so \
                 the server is started automatically."
                    .to_string(),
            )
        } else {
            None
        };
        Error::Conversation { message, hint }
    }
}
