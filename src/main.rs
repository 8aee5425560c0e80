use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail, eyre};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use reactloop::oracle::{ChatOracle, ScriptedChatClient, parse_decision};
use reactloop::{Action, History, ReasoningLoop, Role, RunReport, RunResult, ToolRegistry};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reactloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("reactloop.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run {
            query,
            script,
            max_steps,
            parse_retries,
            json,
        } => handle_run_command(query, script, *max_steps, *parse_retries, *json, config).await,
        Commands::Tools => handle_tools_command(),
        Commands::Parse { text, file } => handle_parse_command(text.as_deref(), file.as_deref()),
        Commands::Prompt { max_steps } => handle_prompt_command(*max_steps, config),
    }
}

async fn handle_run_command(
    query: &str,
    script: &Path,
    max_steps: Option<usize>,
    parse_retries: Option<u32>,
    json: bool,
    config: &Config,
) -> Result<()> {
    info!("Running query with script {}", script.display());

    let mut loop_config = config.loop_config()?;
    if let Some(steps) = max_steps {
        loop_config = loop_config.with_max_steps(steps);
    }
    if let Some(retries) = parse_retries {
        loop_config = loop_config.with_parse_retries(retries);
    }

    let client = ScriptedChatClient::from_yaml_file(script)
        .context(format!("Failed to load oracle script {}", script.display()))?;
    let oracle = Arc::new(ChatOracle::new(client));
    let registry = Arc::new(ToolRegistry::calculator());

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling run");
            ctrl_c.cancel();
        }
    });

    let reasoning = ReasoningLoop::with_config(oracle, registry, loop_config)?.with_cancellation(token);
    let report = reasoning.run(query).await.context("Run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_trace(&report.history);
        print_summary(&report);
    }

    match &report.result {
        RunResult::Success { .. } => Ok(()),
        RunResult::Aborted { reason } => Err(eyre!("Run aborted: {}", reason)),
    }
}

fn print_trace(history: &History) {
    for turn in history.steps() {
        match turn.role {
            Role::Oracle => {
                println!("{}", "Oracle:".cyan().bold());
                for line in turn.content.lines() {
                    println!("  {}", line);
                }
            }
            Role::ToolResult => {
                let tool = turn.tool.as_deref().unwrap_or("?");
                if turn.is_error {
                    println!("{} {}", format!("Observation [{}]:", tool).red(), turn.content);
                } else {
                    println!("{} {}", format!("Observation [{}]:", tool).green(), turn.content);
                }
            }
            Role::User => println!("{} {}", "Correction:".yellow(), turn.content),
            Role::System => {}
        }
    }
}

fn print_summary(report: &RunReport) {
    println!();
    match &report.result {
        RunResult::Success { answer } => println!("{} {}", "Answer:".green().bold(), answer),
        RunResult::Aborted { reason } => println!("{} {}", "Aborted:".red().bold(), reason),
    }
    if let Some(preference) = &report.preference {
        println!("{} {}", "Preference:".blue(), preference);
    }
    println!(
        "{}",
        format!(
            "{} oracle calls in {} ms",
            report.oracle_calls,
            report.elapsed().num_milliseconds()
        )
        .dimmed()
    );
}

fn handle_tools_command() -> Result<()> {
    let registry = ToolRegistry::calculator();
    println!("{}", "Available tools:".cyan());
    for tool in registry.describe_all() {
        println!("  {} - {}", tool.name.green(), tool.description);
    }
    Ok(())
}

fn handle_parse_command(text: Option<&str>, file: Option<&Path>) -> Result<()> {
    let raw = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => {
            fs::read_to_string(path).context(format!("Failed to read reply from {}", path.display()))?
        }
        (None, None) => bail!("Provide the reply text or --file"),
    };

    let decision = parse_decision(&raw)?;
    if !decision.rationale.is_empty() {
        println!("{} {}", "Thought:".cyan(), decision.rationale);
    }
    match &decision.action {
        Action::ToolCall { name, args } => println!("{} {}({})", "Tool call:".green(), name, args),
        Action::Finish { answer } => println!("{} {}", "Finish:".green(), answer),
    }
    if let Some(preference) = &decision.preference {
        println!("{} {}", "Preference:".blue(), preference);
    }
    Ok(())
}

fn handle_prompt_command(max_steps: Option<usize>, config: &Config) -> Result<()> {
    let mut loop_config = config.loop_config()?;
    if let Some(steps) = max_steps {
        loop_config = loop_config.with_max_steps(steps);
    }

    let registry = Arc::new(ToolRegistry::calculator());
    let oracle = Arc::new(ChatOracle::new(ScriptedChatClient::new(Vec::new())));
    let reasoning = ReasoningLoop::with_config(oracle, registry, loop_config)?;
    println!("{}", reasoning.system_prompt()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging before anything else reports
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
