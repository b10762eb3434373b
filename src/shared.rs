//! Printer shared between tasks.
//!
//! Each call holds the one lock for its whole duration, so a `print` from one
//! submitter (queue, then drain) never interleaves with another's.

use crate::printer::{Printer, PrinterError, PrinterStatus};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct SharedPrinter<T = String> {
    inner: Arc<Mutex<Printer<T>>>,
}

impl<T> Clone for SharedPrinter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedPrinter<T> {
    pub fn new(printer: Printer<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(printer)),
        }
    }

    pub async fn print(&self, pages: Vec<T>) -> Vec<T> {
        let mut printer = self.inner.lock().await;
        printer.print(pages)
    }

    pub async fn refill(&self, amount: u64) -> Result<(), PrinterError> {
        self.inner.lock().await.refill(amount)
    }

    pub async fn clear(&self) -> Vec<T> {
        self.inner.lock().await.clear()
    }

    pub async fn has_ink(&self) -> bool {
        self.inner.lock().await.has_ink()
    }

    pub async fn status(&self) -> PrinterStatus {
        self.inner.lock().await.status()
    }

    /// Runs `f` with exclusive access to the printer.
    pub async fn with_printer<R>(&self, f: impl FnOnce(&mut Printer<T>) -> R) -> R {
        let mut printer = self.inner.lock().await;
        f(&mut *printer)
    }
}
