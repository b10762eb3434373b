//! Line-oriented command scripts driving a single printer.
//!
//! ```text
//! # comments and blank lines are skipped
//! print line1 line2 line3 line4 line5
//! has-ink
//! refill 3
//! print page1 page2
//! status
//! clear
//! ```
//!
//! Each whitespace-separated word after `print` is one page.

use crate::config::OutputFormat;
use crate::printer::{parse_ink, Printer, PrinterError, PrinterStatus};
use serde::Serialize;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Unexpected argument '{arg}' for '{command}'")]
    UnexpectedArgument { command: &'static str, arg: String },
    #[error(transparent)]
    Printer(#[from] PrinterError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Print(Vec<String>),
    Refill(u64),
    Clear,
    HasInk,
    Status,
}

impl Command {
    /// Parses one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let command = match name.to_ascii_lowercase().as_str() {
            "print" => Command::Print(words.map(str::to_string).collect()),
            "refill" => {
                let raw = words.next().ok_or(CommandError::MissingArgument("refill"))?;
                let amount = parse_ink(raw)?;
                no_more_args("refill", words)?;
                Command::Refill(amount)
            }
            "clear" => {
                no_more_args("clear", words)?;
                Command::Clear
            }
            "has-ink" => {
                no_more_args("has-ink", words)?;
                Command::HasInk
            }
            "status" => {
                no_more_args("status", words)?;
                Command::Status
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn no_more_args<'a>(
    command: &'static str,
    mut words: impl Iterator<Item = &'a str>,
) -> Result<(), CommandError> {
    match words.next() {
        Some(arg) => Err(CommandError::UnexpectedArgument {
            command,
            arg: arg.to_string(),
        }),
        None => Ok(()),
    }
}

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Printed(Vec<String>),
    Refilled { ink: u64 },
    Cleared(Vec<String>),
    HasInk(bool),
    Status(PrinterStatus),
}

/// Writes an outcome to `out` in the configured format.
pub fn render<W: Write>(outcome: &Outcome, format: OutputFormat, out: &mut W) -> Result<(), SessionError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Plain => match outcome {
            Outcome::Printed(pages) => {
                for page in pages {
                    writeln!(out, "{}", page)?;
                }
            }
            Outcome::Refilled { ink } => writeln!(out, "ink: {}", ink)?,
            Outcome::Cleared(pages) if pages.is_empty() => writeln!(out, "cleared:")?,
            Outcome::Cleared(pages) => writeln!(out, "cleared: {}", pages.join(" "))?,
            Outcome::HasInk(has_ink) => writeln!(out, "{}", has_ink)?,
            Outcome::Status(status) => writeln!(
                out,
                "{}: {:?}, ink {}, queued {}, printed {}, refilled {}",
                status.name, status.state, status.ink, status.queued, status.pages_printed, status.ink_refilled
            )?,
        },
    }
    Ok(())
}

pub struct Session {
    printer: Printer,
    format: OutputFormat,
}

impl Session {
    pub fn new(printer: Printer, format: OutputFormat) -> Self {
        Self { printer, format }
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    pub fn into_printer(self) -> Printer {
        self.printer
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let outcome = match command {
            Command::Print(pages) => Outcome::Printed(self.printer.print(pages)),
            Command::Refill(amount) => {
                self.printer.refill(amount)?;
                Outcome::Refilled { ink: self.printer.ink() }
            }
            Command::Clear => Outcome::Cleared(self.printer.clear()),
            Command::HasInk => Outcome::HasInk(self.printer.has_ink()),
            Command::Status => Outcome::Status(self.printer.status()),
        };
        Ok(outcome)
    }

    /// Runs a script, writing each outcome to `out`. Stops at the first bad
    /// line; commands before it have already taken effect.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<usize, SessionError> {
        let mut executed = 0;
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(source) => return Err(SessionError::Command { line: line_no, source }),
            };
            tracing::debug!(line = line_no, ?command, "Executing command");
            let outcome = self
                .execute(command)
                .map_err(|source| SessionError::Command { line: line_no, source })?;
            render(&outcome, self.format, out)?;
            executed += 1;
        }
        out.flush()?;
        Ok(executed)
    }
}
