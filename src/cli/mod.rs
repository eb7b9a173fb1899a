//! Command-line interface parsing and startup
//!
//! This module parses arguments, loads configuration, prepares the audit log
//! directories and the model catalog, then hands the console to the chat loop.

pub mod model_list;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::model_list::list_models;
use crate::core::backends::builtin_catalog;
use crate::core::config::Config;
use crate::core::session::Session;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::AuditLogger;

const LOG_FILTER_ENV: &str = "MULTICHAT_LOG";

#[derive(Parser, Debug)]
#[command(name = "multichat")]
#[command(about = "Console chat with a switchable set of LLM providers")]
#[command(
    long_about = "multichat is a line-oriented console chat that keeps a bounded conversation \
history and lets you switch between OpenAI, Google, Anthropic, and DeepSeek models mid-session. \
Every turn is recorded in a daily transcript and every model call in a daily request/response log.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY      API key for openai models\n\
  GOOGLE_API_KEY      API key for google models\n\
  ANTHROPIC_API_KEY   API key for anthropic models\n\
  DEEPSEEK_API_KEY    API key for deepseek models\n\
  MULTICHAT_LOG       Diagnostic filter (falls back to RUST_LOG, default warn)\n\n\
Commands:\n\
  /models                         List available models\n\
  /model <provider> <model_name>  Switch models\n\
  /current                        Show the current model\n\
  /history_size <number>          Set the history window\n\
  /history_info                   Show history settings\n\
  /help                           Show help\n\
  /quit                           Exit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to start with
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model to start with
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Number of turns kept as context
    #[arg(long, global = true, value_name = "N")]
    pub history_size: Option<usize>,

    /// Directory for transcript and request/response logs
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat session (default)
    Chat,
    /// List every provider and model, then exit
    Models,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}

/// Priority: `--verbose` > `MULTICHAT_LOG` > `RUST_LOG` > warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("multichat=debug")
    } else {
        EnvFilter::try_from_env(LOG_FILTER_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Fold command-line overrides into the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(provider) = &args.provider {
        config.default_provider = Some(provider.clone());
    }
    if let Some(model) = &args.model {
        config.default_model = Some(model.clone());
    }
    if let Some(size) = args.history_size {
        config.history_size = Some(size);
    }
    if let Some(dir) = &args.log_dir {
        config.set_log_dir(dir.clone());
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    let options = config.session_options()?;

    // No request timeout: a model call runs until the provider answers or fails.
    let client = reqwest::Client::builder().build()?;
    let catalog = builtin_catalog(&client, &config.backend_settings())
        .map_err(|e| format!("Built-in model catalog is invalid: {e}"))?;
    if catalog.is_empty() {
        return Err("Built-in model catalog has no models".into());
    }

    if args.command == Some(Commands::Models) {
        list_models(&catalog);
        return Ok(());
    }

    let audit = AuditLogger::provision(config.log_dir()).map_err(|e| {
        format!(
            "Failed to prepare log directory {}: {e}",
            config.log_dir().display()
        )
    })?;
    let selection = catalog.resolve(config.provider(), config.model())?;
    let mut session = Session::new(Arc::new(catalog), selection, audit, options)?;

    tracing::info!(
        model = %session.selection(),
        limit = %session.conversation().limit(),
        log_dir = %session.audit().root().display(),
        "Starting chat session"
    );
    println!(
        "Type {}help for commands, {}quit to exit.",
        session.command_marker(),
        session.command_marker()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let reason = run_chat(&mut session, stdin, &mut stdout).await?;
    tracing::debug!(?reason, "Chat loop finished");
    Ok(())
}
