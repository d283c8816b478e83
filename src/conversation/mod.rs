pub mod backend;
pub mod driver;
pub mod messages;

pub use backend::{AssistantBackend, CliBackend, ConversationRequest, MessageStream};
pub use driver::{ConversationOutcome, drive};
pub use messages::{AssistantMessage, ContentItem, ConversationMessage, MessageContent};

use serde::{Deserialize, Serialize};

/// Inline configuration for the browser-automation tool server.
///
/// When supplied, the backend passes this to the assistant runtime so the
/// tool server is started on demand instead of relying on a pre-configured
/// installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerConfig {
    /// Command used to launch the tool server
    pub command: String,

    /// Arguments passed to the command
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolServerConfig {
    /// The headless Playwright tool server launched via npx
    pub fn playwright_headless() -> Self {
        Self {
            command: "npx".to_string(),
            args: vec!["@playwright/mcp@latest".to_string(), "--headless".to_string()],
        }
    }

    /// Renders the runtime's `mcpServers` configuration JSON
    pub fn to_mcp_json(&self) -> String {
        serde_json::json!({
            "mcpServers": {
                "playwright": {
                    "command": self.command,
                    "args": self.args,
                }
            }
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playwright_headless_mcp_json() {
        let json = ToolServerConfig::playwright_headless().to_mcp_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mcpServers"]["playwright"]["command"], "npx");
        assert_eq!(
            value["mcpServers"]["playwright"]["args"][1],
            "--headless"
        );
    }
}
