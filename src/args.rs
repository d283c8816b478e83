use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pom-gen")]
#[command(about = "Generates Playwright Page Object Models by driving an AI assistant")]
#[command(version)]
pub struct Args {
    /// Path to the markdown configuration file (url, page_name, description)
    pub config: PathBuf,

    /// Root directory generated artifacts are written under
    #[arg(short, long, default_value = "generated-auto")]
    pub output_dir: PathBuf,

    /// Maximum number of conversation turns
    #[arg(long, default_value_t = 10)]
    pub max_turns: u32,

    /// Assistant command to invoke
    #[arg(long, default_value = "claude")]
    pub assistant_cmd: String,

    /// Pass the headless Playwright tool-server configuration inline instead
    /// of relying on a pre-configured installation
    #[arg(long)]
    pub inline_tool_server: bool,
}
