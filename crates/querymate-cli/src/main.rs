//! QueryMate CLI - SQL & Excel questions from the terminal
//!
//! Talks to a running QueryMate server; `prompt` falls back to the built-in
//! template when the server can't be reached.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use api::{AskReply, AskResponse, QueryMateClient};
use config::Config;
use querymate::{DomainError, PromptTemplate, Question};

const ERROR_HINT: &str =
    "Please ensure your internet connection is stable and your API key is correct and valid.";

#[derive(Parser)]
#[command(name = "querymate")]
#[command(about = "QueryMate CLI - Ask SQL & Excel questions", long_about = None)]
#[command(version)]
struct Cli {
    /// Server URL (overrides the config file)
    #[arg(long, global = true, env = "QUERYMATE_URL")]
    url: Option<String>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question and print the answer
    Ask {
        /// Question text (will prompt if neither this nor --file is given)
        question: Option<String>,
        /// Read the question from a file
        #[arg(short, long)]
        file: Option<String>,
        /// Print only the answer markdown
        #[arg(long)]
        raw: bool,
    },

    /// Print the full prompt that would be sent for a question
    ///
    /// Uses the server's template; the built-in template is used with --local
    /// or when the server is unreachable.
    Prompt {
        /// Question text (will prompt if neither this nor --file is given)
        question: Option<String>,
        /// Read the question from a file
        #[arg(short, long)]
        file: Option<String>,
        /// Render with the built-in template without contacting the server
        #[arg(long)]
        local: bool,
    },

    /// Check the server
    Health,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the server URL
    SetUrl {
        /// e.g. http://127.0.0.1:8000
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let failed = match cli.command {
        Commands::Ask { question, file, raw } => cmd_ask(cli.url, question, file, raw).await,
        Commands::Prompt {
            question,
            file,
            local,
        } => cmd_prompt(cli.url, question, file, local).await,
        Commands::Health => cmd_health(cli.url).await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
    }?;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================
// Command Implementations
// ============================================
//
// Each command returns whether it ended in a failure the exit status should report.

async fn cmd_ask(
    url: Option<String>,
    question: Option<String>,
    file: Option<String>,
    raw: bool,
) -> Result<bool> {
    let text = read_question(question, file)?;

    // Same check the server makes, without the round trip
    if let Err(e @ DomainError::EmptyQuestion) = Question::parse(text.as_str()) {
        println!("{}", e.to_string().yellow());
        return Ok(false);
    }

    let config = Config::load()?;
    let base_url = config.resolve_base_url(url.as_deref());
    let client = QueryMateClient::new(&base_url, Duration::from_secs(config.timeout_secs))?;

    tracing::debug!(%base_url, chars = text.chars().count(), "Sending question");
    if !raw {
        eprintln!("{}", "Thinking...".dimmed());
    }

    let reply = client.ask(&text).await?;
    print!("{}", render_reply(&reply, raw));

    Ok(reply.is_failure())
}

async fn cmd_prompt(
    url: Option<String>,
    question: Option<String>,
    file: Option<String>,
    local: bool,
) -> Result<bool> {
    let text = read_question(question, file)?;
    let question = match Question::parse(text) {
        Ok(q) => q,
        Err(e) => bail!("{}", e),
    };

    let remote = if local {
        None
    } else {
        let config = Config::load()?;
        let base_url = config.resolve_base_url(url.as_deref());
        let client = QueryMateClient::new(&base_url, Duration::from_secs(config.timeout_secs))?;
        Some(client.prompt(question.as_str()).await)
    };

    println!("{}", resolve_prompt(remote, &question));
    Ok(false)
}

async fn cmd_health(url: Option<String>) -> Result<bool> {
    let config = Config::load()?;
    let base_url = config.resolve_base_url(url.as_deref());
    let client = QueryMateClient::new(&base_url, Duration::from_secs(config.timeout_secs))?;

    let health = client.health().await?;
    println!("{} {} (v{})", "Server:".bold(), health.status.green(), health.version);
    println!("{} {}", "Model:".bold(), health.model);
    if health.llm_configured {
        println!("{} {}", "Gemini:".bold(), "configured".green());
    } else {
        println!("{} {}", "Gemini:".bold(), "GEMINI_API_KEY not set".red());
    }

    Ok(false)
}

fn cmd_config(action: ConfigAction) -> Result<bool> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", "Configuration:".bold());
            println!("  Config file: {:?}", Config::config_path()?);
            println!("  Server URL:  {}", config.base_url);
            println!("  Timeout:     {}s", config.timeout_secs);
        }
        ConfigAction::SetUrl { url } => {
            let mut config = Config::load()?;
            config.set_base_url(&url)?;
            config.save()?;
            println!("{} Server URL set to {}", "✓".green(), config.base_url);
        }
    }

    Ok(false)
}

// ============================================
// Helpers
// ============================================

fn read_question(question: Option<String>, file: Option<String>) -> Result<String> {
    match (question, file) {
        (Some(_), Some(_)) => bail!("Pass the question as an argument or with --file, not both"),
        (Some(q), None) => Ok(q),
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("Failed to read question from {}", path))
        }
        (None, None) => Input::<String>::new()
            .with_prompt("Your Question")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read question"),
    }
}

/// Server-rendered prompt when available, otherwise the built-in template
fn resolve_prompt(remote: Option<Result<String>>, question: &Question) -> String {
    match remote {
        Some(Ok(prompt)) => prompt,
        Some(Err(e)) => {
            eprintln!(
                "{}",
                format!("{:#}; showing the built-in template instead", e).yellow()
            );
            PromptTemplate::sql_excel().render(question)
        }
        None => PromptTemplate::sql_excel().render(question),
    }
}

fn render_reply(reply: &AskReply, raw: bool) -> String {
    match reply {
        AskReply::Answered(AskResponse {
            status,
            answer,
            model,
            usage,
            ..
        }) if status == "answered" => {
            let answer = answer.as_deref().unwrap_or_default();
            if raw {
                return format!("{}\n", answer);
            }
            let mut out = format!("{}\n\n{}\n", "AI Assistant's Response:".bold().cyan(), answer);
            if let Some(usage) = usage {
                out.push_str(&format!(
                    "\n{}\n",
                    format!("{} · {} tokens", model, usage.total_tokens).dimmed()
                ));
            }
            out
        }
        AskReply::Answered(response) => {
            let notice = response.notice.as_deref().unwrap_or(
                "AI Assistant: I couldn't generate a response for that. Please try rephrasing.",
            );
            format!("{}\n", notice.yellow())
        }
        AskReply::Rejected(message) => format!("{}\n", message.yellow()),
        AskReply::Failed(message) => format!(
            "{}\n{}\n",
            format!("An error occurred: {}", message).red(),
            ERROR_HINT.blue()
        ),
        AskReply::Unavailable(message) => format!(
            "{}\n{}\n",
            message.red(),
            "Set GEMINI_API_KEY for the server and restart it.".yellow()
        ),
    }
}
