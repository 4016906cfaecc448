mod summary;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use photoreg::config::DEFAULT_CONFIG_FILE;
use photoreg::{Artifacts, Config, FlagPolicy, RunOptions};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`warn` when unset).
const LOG_ENV: &str = "PHOTOREG_LOG";

#[derive(Parser, Debug)]
#[command(name = "photoreg", version, about = "Photolysis reaction registry builder and cross-reference emitter")]
struct Cli {
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE, help = "Run configuration (TOML)")]
    config: PathBuf,
    #[arg(long, global = true, overrides_with = "no_color", help = "Force ANSI color output")]
    color: bool,
    #[arg(long, global = true, help = "Disable ANSI color output")]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the reaction registry.
    Registry {
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Regenerate input deck, linkage tables and documentation tables.
    Generate {
        #[arg(long, value_enum, help = "Override the configured flag policy")]
        policy: Option<FlagPolicy>,
        #[arg(long, value_parser = Artifacts::parse_list, help = "Comma-separated subset: deck, linkage, docs")]
        only: Option<Artifacts>,
        #[arg(long, help = "Assemble every artifact but write nothing")]
        dry_run: bool,
    },
    /// Build the registry and report database drift without writing anything.
    Check,
}

#[derive(Serialize)]
struct RegistryEntry<'a> {
    index: usize,
    label: &'a str,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let color = if cli.no_color { false } else { cli.color || io::stdout().is_terminal() };

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Registry { json } => print_registry(&config, json),
        Commands::Generate { policy, only, dry_run } => {
            let options = RunOptions { policy, artifacts: only.unwrap_or_default(), dry_run };
            generate(&config, options, color)
        }
        Commands::Check => {
            let options = RunOptions { dry_run: true, ..RunOptions::default() };
            generate(&config, options, color)
        }
    }
}

fn print_registry(config: &Config, json: bool) -> ExitCode {
    let registry = match photoreg::build_registry(config) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        let entries: Vec<RegistryEntry<'_>> =
            registry.entries().map(|(index, label)| RegistryEntry { index, label }).collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: failed to serialize registry: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (index, label) in registry.entries() {
            println!("{index:>3} {label}");
        }
    }
    ExitCode::SUCCESS
}

fn generate(config: &Config, options: RunOptions, color: bool) -> ExitCode {
    match photoreg::run(config, options) {
        Ok(outcome) => {
            summary::print_run(&outcome, options.dry_run, color);
            if outcome.failed() > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
