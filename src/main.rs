// src/main.rs - Spooler host: one printer, pages from the command line or a script
use clap::{Parser, Subcommand};
use spooler_rs::config::{self, Config};
use spooler_rs::session::{render, Outcome, Session};
use spooler_rs::{spawn_printer_task, OutputFormat, Printer};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

type BoxError = Box<dyn Error + Send + Sync + 'static>;

const DEFAULT_CONFIG: &str = "printer.toml";

#[derive(Debug, Parser)]
#[command(name = "spooler", version, about = "Ink-limited print queue simulator")]
struct Cli {
    /// Configuration file (defaults to ./printer.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Initial ink units, overriding the config file
    #[arg(long, allow_hyphen_values = true)]
    ink: Option<String>,

    /// Write outcomes as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print pages, one per argument
    Print { pages: Vec<String> },
    /// Run a command script from a file, or stdin when omitted
    Run { script: Option<PathBuf> },
}

fn load_config(cli: &Cli) -> Result<Config, BoxError> {
    let config = match cli.config.as_deref() {
        Some(path) => config::load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => config::load_config(DEFAULT_CONFIG)?,
        None => Config::default(),
    };
    Ok(config)
}

// Logs go to stderr; stdout carries printed pages only.
fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let cli_level = cli.log_level.as_deref().map(config::parse_log_level);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            // No config level to go by, so report the failure at the
            // requested level or INFO.
            init_logging(match cli_level {
                Some(Ok(level)) => level,
                _ => tracing::Level::INFO,
            });
            tracing::error!("Failed to load config: {}", e);
            tracing::error!("Please ensure the configuration file exists and is properly formatted");
            return Err(e);
        }
    };

    let level = match cli_level {
        Some(level) => level,
        None => config.logging.max_level(),
    };
    let level = match level {
        Ok(level) => level,
        Err(e) => {
            init_logging(tracing::Level::INFO);
            tracing::error!("Invalid log level: {}", e);
            return Err(e.into());
        }
    };
    init_logging(level);

    tracing::info!("Starting spooler v{}", env!("CARGO_PKG_VERSION"));

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    let printer = Printer::from_config_with_ink(&config.printer, cli.ink.as_deref()).map_err(|e| {
        tracing::error!("Failed to initialize printer: {}", e);
        e
    })?;

    match cli.command {
        CliCommand::Print { pages } => {
            let (handle, task) = spawn_printer_task(printer, 16);
            let printed = handle.print(pages).await?;
            let status = handle.status().await?;
            drop(handle);
            task.await?;

            let mut out = io::stdout().lock();
            render(&Outcome::Printed(printed), format, &mut out)?;
            if format == OutputFormat::Json {
                render(&Outcome::Status(status.clone()), format, &mut out)?;
            }
            if status.queued > 0 {
                tracing::info!("{} page(s) still queued", status.queued);
            }
        }
        CliCommand::Run { script } => {
            let executed = tokio::task::spawn_blocking(move || -> Result<usize, BoxError> {
                let mut session = Session::new(printer, format);
                let mut out = io::stdout().lock();
                let executed = match script {
                    Some(path) => {
                        tracing::info!("Running script {}", path.display());
                        session.run(BufReader::new(File::open(&path)?), &mut out)?
                    }
                    None => session.run(io::stdin().lock(), &mut out)?,
                };
                Ok(executed)
            })
            .await?
            .map_err(|e| {
                tracing::error!("Script failed: {}", e);
                e
            })?;
            tracing::info!("Executed {} command(s)", executed);
        }
    }

    Ok(())
}
