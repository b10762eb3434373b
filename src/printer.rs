// src/printer.rs - Ink-limited printer draining a FIFO job queue
use crate::config::{ConfigError, PrinterConfig};
use crate::job_queue::JobQueue;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrinterError {
    #[error("Ink must be a non-negative integer, got '{0}'")]
    InvalidInk(String),
    #[error("Refilling {amount} units would overflow the ink counter (currently {ink})")]
    InkOverflow { ink: u64, amount: u64 },
    #[error("Printer task is no longer running")]
    ChannelClosed,
}

/// Validates an untyped ink amount, e.g. a command-line or script argument.
pub fn parse_ink(raw: &str) -> Result<u64, PrinterError> {
    let trimmed = raw.trim();
    // u64::from_str accepts a leading '+', which is still a plain integer.
    trimmed
        .parse::<u64>()
        .map_err(|_| PrinterError::InvalidInk(trimmed.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrinterState {
    /// Ink left; the next pass drains whatever is queued.
    Ready,
    /// Out of ink with a backlog waiting for a refill.
    Stalled,
    /// Out of ink, nothing queued.
    OutOfInk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterStatus {
    pub name: String,
    pub state: PrinterState,
    pub ink: u64,
    pub queued: usize,
    pub pages_printed: u64,
    pub ink_refilled: u64,
}

/// A printer with a finite ink supply. Every printed page costs exactly one
/// unit, whatever its content. Pages that cannot be printed stay queued, in
/// order, until the next [`Printer::print`] or [`Printer::clear`].
#[derive(Debug, Clone)]
pub struct Printer<T = String> {
    name: String,
    ink: u64,
    initial_ink: u64,
    ink_refilled: u64,
    pages_printed: u64,
    queue: JobQueue<T>,
}

impl<T> Printer<T> {
    pub fn new(ink: u64) -> Self {
        Self::with_name("printer", ink)
    }

    pub fn with_name(name: impl Into<String>, ink: u64) -> Self {
        let name = name.into();
        tracing::info!(printer = %name, ink, "Printer created");
        Self {
            name,
            ink,
            initial_ink: ink,
            ink_refilled: 0,
            pages_printed: 0,
            queue: JobQueue::new(),
        }
    }

    /// Builds a printer from configuration, validating the ink amount first.
    pub fn from_config(config: &PrinterConfig) -> Result<Self, ConfigError> {
        let ink = config.validate()?;
        Ok(Self::with_name(config.name.clone(), ink))
    }

    /// Like [`Printer::from_config`], but an untyped `ink_override` (e.g. a
    /// command-line value) replaces the configured ink when given.
    pub fn from_config_with_ink(
        config: &PrinterConfig,
        ink_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        match ink_override {
            Some(raw) => Ok(Self::with_name(config.name.clone(), parse_ink(raw)?)),
            None => Self::from_config(config),
        }
    }

    pub fn has_ink(&self) -> bool {
        self.ink > 0
    }

    /// Queues `pages` behind any existing backlog, then prints from the front
    /// until the queue is empty or the ink runs out. Returns the printed
    /// pages in the order they were printed.
    pub fn print<I>(&mut self, pages: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.queue.size();
        self.queue.extend(pages);
        tracing::debug!(
            printer = %self.name,
            submitted = self.queue.size() - before,
            backlog = before,
            "Pages queued"
        );

        let mut printed = Vec::with_capacity(self.queue.size().min(self.ink_budget()));
        while self.has_ink() {
            let Ok(page) = self.queue.pop() else {
                break;
            };
            self.ink -= 1;
            self.pages_printed += 1;
            tracing::debug!(printer = %self.name, ink = self.ink, "Page printed");
            printed.push(page);
        }

        if !self.queue.is_empty() {
            tracing::warn!(
                printer = %self.name,
                backlog = self.queue.size(),
                "Out of ink, pages left in queue"
            );
        }
        printed
    }

    pub fn refill(&mut self, amount: u64) -> Result<(), PrinterError> {
        let ink = self
            .ink
            .checked_add(amount)
            .ok_or(PrinterError::InkOverflow { ink: self.ink, amount })?;
        // Lifetime counter can only overflow after the ink counter does.
        self.ink_refilled = self.ink_refilled.saturating_add(amount);
        self.ink = ink;
        tracing::info!(printer = %self.name, amount, ink, "Printer refilled");
        Ok(())
    }

    /// Removes every queued page without printing it. Ink is not touched.
    pub fn clear(&mut self) -> Vec<T> {
        let discarded = self.queue.drain_all();
        tracing::info!(printer = %self.name, discarded = discarded.len(), "Print queue cleared");
        discarded
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ink(&self) -> u64 {
        self.ink
    }

    pub fn initial_ink(&self) -> u64 {
        self.initial_ink
    }

    pub fn ink_refilled(&self) -> u64 {
        self.ink_refilled
    }

    pub fn pages_printed(&self) -> u64 {
        self.pages_printed
    }

    /// Number of pages waiting to be printed.
    pub fn queued(&self) -> usize {
        self.queue.size()
    }

    /// Waiting pages, next-to-print first.
    pub fn backlog(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }

    pub fn state(&self) -> PrinterState {
        if self.has_ink() {
            PrinterState::Ready
        } else if self.queue.is_empty() {
            PrinterState::OutOfInk
        } else {
            PrinterState::Stalled
        }
    }

    pub fn status(&self) -> PrinterStatus {
        PrinterStatus {
            name: self.name.clone(),
            state: self.state(),
            ink: self.ink,
            queued: self.queue.size(),
            pages_printed: self.pages_printed,
            ink_refilled: self.ink_refilled,
        }
    }

    fn ink_budget(&self) -> usize {
        usize::try_from(self.ink).unwrap_or(usize::MAX)
    }
}
