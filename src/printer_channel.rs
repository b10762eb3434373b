//! Defines the messages between callers and the task that owns a printer.
//!
//! The task handles one request at a time, so a submission is queued and
//! drained before the next request is looked at.

use crate::printer::{Printer, PrinterError, PrinterStatus};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Represents a request sent to the printer task.
#[derive(Debug)]
pub enum PrinterRequest<T> {
    /// Queue pages and drain as far as the ink allows.
    Print {
        pages: Vec<T>,
        /// Receives the pages actually printed, in order.
        respond_to: oneshot::Sender<Vec<T>>,
    },
    Refill {
        amount: u64,
        respond_to: oneshot::Sender<Result<(), PrinterError>>,
    },
    /// Discard the backlog.
    Clear {
        respond_to: oneshot::Sender<Vec<T>>,
    },
    HasInk {
        respond_to: oneshot::Sender<bool>,
    },
    GetStatus {
        respond_to: oneshot::Sender<PrinterStatus>,
    },
}

/// Cloneable handle for submitting requests to a printer task.
#[derive(Debug)]
pub struct PrinterHandle<T> {
    tx: mpsc::Sender<PrinterRequest<T>>,
}

impl<T> Clone for PrinterHandle<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: Send + 'static> PrinterHandle<T> {
    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> PrinterRequest<T>,
    ) -> Result<R, PrinterError> {
        let (respond_to, rx) = oneshot::channel();
        self.tx
            .send(build(respond_to))
            .await
            .map_err(|_| PrinterError::ChannelClosed)?;
        rx.await.map_err(|_| PrinterError::ChannelClosed)
    }

    pub async fn print(&self, pages: Vec<T>) -> Result<Vec<T>, PrinterError> {
        self.request(|respond_to| PrinterRequest::Print { pages, respond_to }).await
    }

    pub async fn refill(&self, amount: u64) -> Result<(), PrinterError> {
        self.request(|respond_to| PrinterRequest::Refill { amount, respond_to })
            .await?
    }

    pub async fn clear(&self) -> Result<Vec<T>, PrinterError> {
        self.request(|respond_to| PrinterRequest::Clear { respond_to }).await
    }

    pub async fn has_ink(&self) -> Result<bool, PrinterError> {
        self.request(|respond_to| PrinterRequest::HasInk { respond_to }).await
    }

    pub async fn status(&self) -> Result<PrinterStatus, PrinterError> {
        self.request(|respond_to| PrinterRequest::GetStatus { respond_to }).await
    }
}

/// Moves `printer` into a background task and returns a handle to it.
/// The task exits, returning the printer, once every handle is dropped.
pub fn spawn_printer_task<T: Send + 'static>(
    printer: Printer<T>,
    buffer: usize,
) -> (PrinterHandle<T>, JoinHandle<Printer<T>>) {
    let (tx, mut rx) = mpsc::channel::<PrinterRequest<T>>(buffer);
    let task = tokio::spawn(async move {
        let mut printer = printer;
        while let Some(request) = rx.recv().await {
            match request {
                PrinterRequest::Print { pages, respond_to } => {
                    let _ = respond_to.send(printer.print(pages));
                }
                PrinterRequest::Refill { amount, respond_to } => {
                    let _ = respond_to.send(printer.refill(amount));
                }
                PrinterRequest::Clear { respond_to } => {
                    let _ = respond_to.send(printer.clear());
                }
                PrinterRequest::HasInk { respond_to } => {
                    let _ = respond_to.send(printer.has_ink());
                }
                PrinterRequest::GetStatus { respond_to } => {
                    let _ = respond_to.send(printer.status());
                }
            }
        }
        tracing::info!(printer = %printer.name(), "Printer task shutting down");
        printer
    });
    (PrinterHandle { tx }, task)
}
