use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

use tempnotes_core::config::{self, Config};
use tempnotes_core::note::NoteStore;
use tempnotes_core::tool::{ToolOutput, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "tempnotes",
    about = "A single persistent scratch note",
    version = tempnotes_core::VERSION,
)]
struct Cli {
    /// Config file (default: ~/.mcp_config/tempnotes.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current note
    Read,
    /// Replace the note
    Write {
        content: String,
    },
    /// Append to the note
    Append {
        content: String,
        /// Use a blank line instead of a --- separator
        #[arg(long)]
        no_separator: bool,
    },
    /// Empty the note
    Clear,
    /// Call a tool by name with a JSON object of arguments
    Call {
        tool: String,
        /// e.g. '{"content": "hello"}'
        args: Option<String>,
        /// Print the raw tool result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tool definitions as JSON
    Tools,
    /// Show config and note location
    Status,
    /// Write the config file and create the note directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries tool output only.
    let default_filter = if cli.verbose {
        "tempnotes=debug,tempnotes_core=debug"
    } else {
        "tempnotes=info,tempnotes_core=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let cfg = match cli.config.as_deref() {
        Some(path) => {
            let mut cfg = config::load_config(Some(path));
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        None => config::load_config_from_env(),
    };

    let ok = match cli.command {
        Commands::Read => cmd_call(&cfg, "read_note", json!({}), false).await?,
        Commands::Write { content } => {
            cmd_call(&cfg, "write_note", json!({ "content": content }), false).await?
        }
        Commands::Append {
            content,
            no_separator,
        } => {
            let args = json!({ "content": content, "include_separator": !no_separator });
            cmd_call(&cfg, "append_note", args, false).await?
        }
        Commands::Clear => cmd_call(&cfg, "clear_note", json!({}), false).await?,
        Commands::Call { tool, args, json } => {
            let args: serde_json::Value = match args {
                Some(raw) => serde_json::from_str(&raw)
                    .context("tool arguments must be a JSON object")?,
                None => json!({}),
            };
            cmd_call(&cfg, &tool, args, json).await?
        }
        Commands::Tools => cmd_tools(&cfg)?,
        Commands::Status => cmd_status(&cfg, cli.config)?,
        Commands::Init { force } => cmd_init(&cfg, cli.config, force).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ====== Commands ======

fn build_registry(cfg: &Config) -> ToolRegistry {
    let location = cfg.storage_location();
    debug!("Using note file {}", location.note_path().display());
    ToolRegistry::with_note_tools(Arc::new(NoteStore::new(location)))
}

/// Dispatch one tool call. Faults surface as errors; a recovered error prints
/// to stderr and returns `false`.
async fn cmd_call(cfg: &Config, tool: &str, args: serde_json::Value, as_json: bool) -> Result<bool> {
    let params: HashMap<String, serde_json::Value> =
        serde_json::from_value(args).context("tool arguments must be a JSON object")?;

    let registry = build_registry(cfg);
    let output = registry.execute(tool, params).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_output(&output)?;
    }

    Ok(!output.is_error)
}

fn print_output(output: &ToolOutput) -> Result<()> {
    let text = output.as_text();
    if output.is_error {
        eprintln!("{}", text);
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn cmd_tools(cfg: &Config) -> Result<bool> {
    let registry = build_registry(cfg);
    let defs = json!({ "tools": registry.get_definitions() });
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(true)
}

fn cmd_status(cfg: &Config, config_path: Option<PathBuf>) -> Result<bool> {
    let config_path = config_path.unwrap_or_else(config::get_config_path);
    let note_path = cfg.storage_location().note_path();

    println!(
        "tempnotes {} ({})\n",
        tempnotes_core::VERSION,
        tempnotes_core::GIT_HASH
    );
    println!(
        "Config: {} {}",
        config_path.display(),
        if config_path.exists() { "✓" } else { "✗" }
    );

    match std::fs::metadata(&note_path) {
        Ok(meta) => println!("Note: {} ✓ ({} bytes)", note_path.display(), meta.len()),
        Err(_) => println!("Note: {} ✗ (no note yet)", note_path.display()),
    }

    Ok(true)
}

async fn cmd_init(cfg: &Config, config_path: Option<PathBuf>, force: bool) -> Result<bool> {
    let path = config::init_config(cfg, config_path.as_deref(), force).await?;
    println!("✓ Wrote config to {}", path.display());
    println!("✓ Note file: {}", cfg.storage_location().note_path().display());
    Ok(true)
}
