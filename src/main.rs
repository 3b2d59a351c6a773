use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use licensed_sources::{
    config::Config,
    output::{print_result, OutputFormat},
    scan::run_sources,
    source::{load_sources, registry, skipped_sources},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const SOURCE_FAILED: u8 = 2;
}

#[derive(Parser)]
#[command(name = "licensed")]
#[command(
    author,
    version,
    about = "Enumerate project dependencies for license compliance checks"
)]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dependencies found by every enabled source
    List {
        /// Only run this source (short or full type, e.g. yarn or yarn/v1)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List registered source types
    ListSources,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "licensed_sources=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { source, format } => {
            let config = load_config(cli.config.as_deref())?;
            run_list(&config, source, &format)
        }
        Commands::ListSources => {
            let config = load_config(cli.config.as_deref())?;
            list_sources(&config);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            let config_path = cli.config.unwrap_or_else(Config::config_path);
            handle_config(&config_path, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run_list(config: &Config, source_filter: Option<String>, format: &str) -> Result<u8> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;

    let explicit = source_filter.is_some();
    let source_types = match source_filter {
        Some(query) => {
            let matched = registry::matching(&query);
            if matched.is_empty() {
                bail!(
                    "Unknown source: {}. Run 'licensed list-sources' to see available sources",
                    query
                );
            }
            matched
        }
        None => registry::list(),
    };

    let mut sources = load_sources(config, &source_types);
    if explicit {
        for source_type in skipped_sources(&source_types, &sources) {
            warn!(source = %source_type, "requested source was skipped");
            eprintln!(
                "Note: {} was skipped (switched off in config or not enabled for this project)",
                source_type
            );
        }
    }

    let result = run_sources(&mut sources);

    print_result(&result, format)?;

    if result.has_errors() {
        Ok(exit_codes::SOURCE_FAILED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn list_sources(config: &Config) {
    println!("Available sources:");
    println!();

    for source_type in registry::list() {
        let type_name = source_type.type_name();
        let configured = if config.source_enabled(&type_name) {
            "yes"
        } else {
            "no"
        };

        println!(
            "  {:<16} {:<24} [enabled in config: {}]",
            type_name,
            source_type.full_type(),
            configured
        );
    }
}

fn handle_config(config_path: &Path, init: bool, show_path: bool) -> Result<()> {
    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    match (init, config_path.exists()) {
        (true, true) => {
            println!("Leaving existing config untouched: {}", config_path.display());
        }
        (true, false) => {
            Config::default().save_to(config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
        (false, true) => {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            println!("# {}", config_path.display());
            print!("{}", content);
        }
        (false, false) => {
            println!(
                "No config at {} (create one with 'licensed config --init')",
                config_path.display()
            );
        }
    }

    Ok(())
}
