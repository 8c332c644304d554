//! logrefs: links logging format-string placeholders to call arguments.
//!
//! This library counts the placeholders of SLF4J and Log4j format strings,
//! aligns them positionally with the call's arguments, and produces
//! absolute-coordinate references from each placeholder to its argument.

#![warn(missing_docs)]

pub mod align;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod placeholder;
pub mod resolve;
pub mod style;

/// Re-export common error types for convenience.
pub use error::{LogRefsError, Result};

/// Re-export the core API for convenience.
pub use align::{align, Alignment, Binding, Mismatch};
pub use placeholder::{
    count_placeholders, FormatString, PlaceholderCount, PlaceholderStatus, TextRange,
};
pub use resolve::{resolve_log_call, resolve_log_references, Argument, LogCall, Resolution};
pub use style::LoggerStyle;

/// logrefs version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
