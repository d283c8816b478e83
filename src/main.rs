use clap::Parser;
use pom_gen::Generator;
use pom_gen::config::GenerationConfig;
use pom_gen::conversation::{CliBackend, ToolServerConfig};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), pom_gen::Error> {
    let config = GenerationConfig::from_file(&args.config).await?;

    ::log::info!("Loaded config from {}", args.config.display());

    // Allow the assistant command to be overridden by the environment, the
    // way the crawler honors WEBDRIVER_URL. This is resolved here once; core
    // logic never reads the environment.
    let command = match std::env::var("ASSISTANT_CMD") {
        Ok(cmd) if !cmd.is_empty() => cmd,
        _ => args.assistant_cmd,
    };
    let backend = CliBackend::new(command);

    let mut generator = Generator::new(config)
        .with_output_root(&args.output_dir)
        .with_max_turns(args.max_turns);

    if args.inline_tool_server {
        generator = generator.with_tool_server(ToolServerConfig::playwright_headless());
    }

    let report = generator.generate(&backend).await?;

    if report.is_code_missing() {
        ::log::warn!(
            "No TypeScript artifacts were generated; inspect the assistant \
             output and re-run"
        );
    }

    println!("Files saved in: {}", report.output_dir.display());
    for path in &report.written {
        println!("  {}", path.display());
    }

    Ok(())
}
