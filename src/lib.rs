//! # spooler-rs
//!
//! A print spooler simulator: pages wait in a first-in-first-out
//! [`JobQueue`] and a [`Printer`] prints them in order, one ink unit per
//! page, until the ink runs out. Whatever is left stays queued for the next
//! pass or until it is cleared.
//!
//! ```
//! use spooler_rs::Printer;
//!
//! let mut printer = Printer::new(3);
//! let printed = printer.print(["a", "b", "c", "d", "e"].map(String::from));
//! assert_eq!(printed, ["a", "b", "c"]);
//! assert!(!printer.has_ink());
//!
//! printer.refill(3).unwrap();
//! assert_eq!(printer.print(["f", "g"].map(String::from)), ["d", "e", "f"]);
//! assert_eq!(printer.clear(), ["g"]);
//! ```
//!
//! [`SharedPrinter`] and [`printer_channel`] let several tasks submit to one
//! printer without interleaving their passes.

pub mod config;
pub mod job_queue;
pub mod printer;
pub mod printer_channel;
pub mod session;
pub mod shared;

pub use config::{Config, ConfigError, OutputFormat};
pub use job_queue::{JobQueue, QueueError};
pub use printer::{parse_ink, Printer, PrinterError, PrinterState, PrinterStatus};
pub use printer_channel::{spawn_printer_task, PrinterHandle, PrinterRequest};
pub use session::{Command, CommandError, Outcome, Session, SessionError};
pub use shared::SharedPrinter;
