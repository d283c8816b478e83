// Re-export modules
pub mod config;
pub mod conversation;
pub mod error;
pub mod extract;
pub mod output;
pub mod prompt;

// Re-export commonly used types for convenience
pub use config::GenerationConfig;
pub use error::Error;
pub use extract::ExtractionResult;
pub use output::RunReport;

use conversation::{AssistantBackend, ConversationRequest, ToolServerConfig};
use std::path::PathBuf;

/// Main builder for one page-object generation run
///
/// Drives the pipeline sequentially: prompt rendering, one assistant
/// conversation, response extraction, file materialization. There is no
/// fan-out across pages within a run; concurrent runs targeting the same
/// page name race on the same files without locking.
pub struct Generator {
    config: GenerationConfig,
    output_root: PathBuf,
    max_turns: u32,
    allowed_tools: Vec<String>,
    tool_server: Option<ToolServerConfig>,
}

impl Generator {
    /// Create a new Generator for the given configuration
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            output_root: PathBuf::from("generated-auto"),
            max_turns: 10,
            allowed_tools: prompt::default_allowed_tools(),
            tool_server: None,
        }
    }

    /// Set the root directory artifacts are written under
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Set the maximum number of conversation turns
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Override the allow-list of automation tool identifiers
    pub fn with_allowed_tools(mut self, allowed_tools: Vec<String>) -> Self {
        self.allowed_tools = allowed_tools;
        self
    }

    /// Supply an inline tool-server configuration
    pub fn with_tool_server(mut self, tool_server: ToolServerConfig) -> Self {
        self.tool_server = Some(tool_server);
        self
    }

    /// Run the pipeline to completion and return what was written.
    ///
    /// An extraction that produced no code artifacts is logged as a warning
    /// and reported through the returned [`RunReport`], not raised as an
    /// error.
    pub async fn generate(self, backend: &dyn AssistantBackend) -> Result<RunReport, Error> {
        ::log::info!("Generating page object for: {}", self.config.page_name);
        ::log::info!("Target URL: {}", self.config.url);

        if url::Url::parse(&self.config.url).is_err() {
            ::log::warn!(
                "Configured URL does not parse as an absolute URL: {}",
                self.config.url
            );
        }

        let request = ConversationRequest {
            prompt: prompt::build_prompt(&self.config),
            max_turns: self.max_turns,
            allowed_tools: self.allowed_tools.clone(),
            tool_server: self.tool_server.clone(),
        };

        let stream = backend.start(request).await?;
        let outcome = conversation::drive(stream).await?;

        let mut result = extract::extract(&outcome.full_text);
        result.snapshot_data = outcome.snapshot_data;

        if result.is_empty() {
            ::log::warn!(
                "Assistant response contained no TypeScript code blocks; \
                 only the README will reference code artifacts"
            );
        }

        let report = output::materialize(&self.config, &result, &self.output_root).await?;

        ::log::info!(
            "Generation complete: {} file(s) in {}",
            report.written.len(),
            report.output_dir.display()
        );

        Ok(report)
    }
}
