//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::backend::{backend_from_config, HttpBackend, SharedBackend};
use crate::cli::ask::run_ask;
use crate::core::config::data::{path_display, validate_backend_url, Config, ConfigKey};
use crate::core::constants::SAMPLE_QUERY;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_logging, LogTarget};

#[derive(Parser)]
#[command(name = "lexi", version)]
#[command(about = "A terminal client for a legal question-answering assistant")]
#[command(
    long_about = "Lexi sends legal questions to a question-answering service and shows the \
answer with the passages it relied on. Each citation names its source document and \
paragraph and can be opened in your browser.\n\n\
Without a configured backend, Lexi answers every query with a built-in sample.\n\n\
Environment Variables:\n\
  LEXI_BACKEND_URL  Backend base URL, overriding the configured one\n\
  LEXI_LOG          Log filter (falls back to RUST_LOG, then info)\n\n\
Controls:\n\
  Enter             Submit the query\n\
  Alt+Enter         Insert a new line\n\
  Ctrl+S            Insert the sample query\n\
  Tab               Move focus between the input and the citations\n\
  Up/Down           Select a citation (citations focused)\n\
  Enter or o        Open the selected citation\n\
  PageUp/PageDown   Scroll the answer\n\
  Ctrl+C or Esc     Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Backend base URL for this run (overrides configuration)
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive query screen (default)
    Chat,
    /// Ask a single question and print the answer without the full-screen UI
    Ask {
        /// The question to ask
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
        /// Open citation N (1-based) in the browser after answering
        #[arg(long, value_name = "N")]
        open: Option<usize>,
    },
    /// Print the sample query
    Sample,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

/// The backend for this run: the `--backend` flag wins over configuration.
fn resolve_backend(flag: Option<&str>, config: &Config) -> Result<SharedBackend, Box<dyn Error>> {
    let client = reqwest::Client::new();
    match flag.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => {
            validate_backend_url(url)?;
            Ok(Arc::new(HttpBackend::new(client, url)))
        }
        None => Ok(backend_from_config(config, client)),
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            let log = args.log.as_deref().or(config.log_file.as_deref());
            init_logging(&LogTarget::file_or(log, LogTarget::Off))?;
            let backend = resolve_backend(args.backend.as_deref(), &config)?;
            run_chat(&config, backend).await
        }
        Commands::Ask { query, open } => {
            let config = Config::load()?;
            let log = args.log.as_deref().or(config.log_file.as_deref());
            init_logging(&LogTarget::file_or(log, LogTarget::Stderr))?;
            let backend = resolve_backend(args.backend.as_deref(), &config)?;
            run_ask(query, open, backend).await
        }
        Commands::Sample => {
            println!("{SAMPLE_QUERY}");
            Ok(())
        }
        Commands::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let value = value.join(" ");
            let mut config = Config::load()?;
            config.set_value(key, &value)?;
            config.save()?;
            println!("✅ Set {} to: {}", key.as_str(), value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let key: ConfigKey = key.parse()?;
            let mut config = Config::load()?;
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("Config file: {}", path_display(Config::get_config_path()?));
            config.print_all();
            Ok(())
        }
    }
}
