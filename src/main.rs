// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use post_agent::utils::logging::{format_error, format_warning};
use post_agent::{AgentError, Config, PostPipeline, Validator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "post_agent")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Research a topic on the web and draft a LinkedIn post with an LLM agent", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Research and write a post (default)
    Generate {
        /// Task for the agent; defaults to agent.task from the config
        #[arg(short, long)]
        task: Option<String>,

        /// Documents to fetch per research call
        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Run only the web research step and print the aggregated text
    Research {
        /// Topic to search for
        topic: String,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Print the effective configuration with credentials masked
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    post_agent::utils::logging::init_logger(cli.color, cli.verbose);

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", format_error(&describe(&e)));
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", format_warning("Interrupted"));
            ExitCode::from(130)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli.config)?;

    match cli.command.unwrap_or(Commands::Generate {
        task: None,
        limit: None,
    }) {
        Commands::Generate { task, limit } => {
            apply_limit(&mut config, limit)?;
            cmd_generate(config, task, cli.color).await?;
        }
        Commands::Research { topic, limit } => {
            apply_limit(&mut config, limit)?;
            cmd_research(config, &topic).await?;
        }
        Commands::Config => {
            cmd_config(config)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from: {}", path.display());

    let file = if path.exists() {
        Some(path)
    } else {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        None
    };

    Config::load(file).context("Failed to load configuration")
}

fn apply_limit(config: &mut Config, limit: Option<usize>) -> Result<()> {
    if let Some(limit) = limit {
        Validator::validate_limit(limit)?;
        config.research.limit = limit;
    }
    Ok(())
}

async fn cmd_generate(mut config: Config, task: Option<String>, color: bool) -> Result<()> {
    config.resolve_credentials_from_env(true)?;

    let task = task.unwrap_or_else(|| config.agent.task.clone());
    let pipeline = PostPipeline::from_config(&config)?.with_progress(color);

    info!(
        "Model {} (temperature {}), research limit {}",
        config.model.model, config.model.temperature, config.research.limit
    );

    let report = pipeline.run(&task).await?;

    println!("{}", report.post);
    Ok(())
}

async fn cmd_research(mut config: Config, topic: &str) -> Result<()> {
    config.resolve_credentials_from_env(false)?;

    let pipeline = PostPipeline::research_only(&config)?;
    let text = pipeline.research(topic).await?;

    if text.is_empty() {
        warn!("No documents found for \"{}\"", topic);
    }

    println!("{}", text);
    Ok(())
}

fn cmd_config(config: Config) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&config.redacted())
        .context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

/// One line naming the failing dependency and the reason.
fn describe(error: &anyhow::Error) -> String {
    match error.chain().find_map(|e| e.downcast_ref::<AgentError>()) {
        Some(agent_error) => format!("[{}] {}", agent_error.dependency(), agent_error),
        None => format!("{:#}", error),
    }
}
