//! Command-line interface for logrefs.
//!
//! This module handles argument parsing and output shapes only.
//! Resolution logic lives in the library modules.

use crate::ingest::LogCallSite;
use crate::placeholder::{PlaceholderCount, TextRange};
use crate::resolve::{LogArgumentReference, UnresolvedReason};
use crate::style::LoggerStyle;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// logrefs: link logging format-string placeholders to their arguments.
#[derive(Parser, Debug)]
#[command(name = "logrefs")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available logrefs commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Resolve placeholder references in Java logging calls.
    Refs {
        /// Java source file to scan.
        #[arg(short, long, required_unless_present = "glob", conflicts_with = "glob")]
        file: Option<std::path::PathBuf>,

        /// Glob pattern selecting Java files (e.g. "src/**/*.java").
        #[arg(short, long)]
        glob: Option<String>,

        /// JSON configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<std::path::PathBuf>,

        /// Style for calls whose logging library cannot be determined.
        #[arg(short, long, value_name = "STYLE")]
        style: Option<StyleArg>,

        /// Treat SLF4J calls as served by Log4j 2.
        #[arg(long)]
        log4j_bridge: bool,

        /// Also report calls that could not be resolved, with the reason.
        #[arg(long)]
        unresolved: bool,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Count the placeholders of a format string.
    Count {
        /// Logger style.
        #[arg(short, long, value_name = "STYLE")]
        style: StyleArg,

        /// Format string text (already unescaped).
        format: String,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Count placeholders, then bind them to the given arguments.
    Align {
        /// Logger style.
        #[arg(short, long, value_name = "STYLE")]
        style: StyleArg,

        /// Format string text (already unescaped).
        format: String,

        /// Call argument, repeatable, in call order.
        #[arg(short = 'a', long = "arg", value_name = "ARG")]
        args: Vec<String>,

        /// The last argument is a throwable.
        #[arg(short, long)]
        exception_tail: bool,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command asked for JSON output.
    pub fn json(&self) -> bool {
        match self {
            Commands::Refs { json, .. }
            | Commands::Count { json, .. }
            | Commands::Align { json, .. } => *json,
        }
    }
}

/// Logger style as accepted on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum StyleArg {
    /// SLF4J `{}` markers.
    Slf4j,
    /// Log4j 2 `{}` / `{N}` markers.
    Log4jOldStyle,
    /// Log4j printf conversions.
    Log4jFormattedStyle,
    /// SLF4J fluent API.
    Slf4jEqualPlaceholders,
    /// Log4j builder API.
    Log4jEqualPlaceholders,
}

impl StyleArg {
    /// Convert to the library style.
    pub fn to_logger_style(self) -> LoggerStyle {
        match self {
            StyleArg::Slf4j => LoggerStyle::Slf4j,
            StyleArg::Log4jOldStyle => LoggerStyle::Log4jOldStyle,
            StyleArg::Log4jFormattedStyle => LoggerStyle::Log4jFormattedStyle,
            StyleArg::Slf4jEqualPlaceholders => LoggerStyle::Slf4jEqualPlaceholders,
            StyleArg::Log4jEqualPlaceholders => LoggerStyle::Log4jEqualPlaceholders,
        }
    }
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (Io, Parse, ...).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a LogRefsError instance.
    pub fn from_error(error: &crate::LogRefsError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
            },
        }
    }
}

/// JSON shape of one scanned file.
#[derive(Serialize)]
pub struct FileReport {
    /// File path as given.
    pub path: String,
    /// Reported calls.
    pub calls: Vec<CallReport>,
}

/// JSON shape of one logging call.
#[derive(Serialize)]
pub struct CallReport {
    /// Line of the call (1-based).
    pub line: usize,
    /// Column of the call (0-based).
    pub column: usize,
    /// Logger receiver.
    pub receiver: String,
    /// Invoked method.
    pub method: String,
    /// Style used for counting and binding.
    pub style: LoggerStyle,
    /// Format-string source text.
    pub format: String,
    /// Resolved references; empty when unresolved.
    pub references: Vec<ReferenceReport>,
    /// Why the call was not resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<UnresolvedReason>,
}

/// JSON shape of one placeholder reference.
#[derive(Serialize)]
pub struct ReferenceReport {
    /// Placeholder text (`{}`, `%s`, ...).
    pub placeholder: String,
    /// Absolute placeholder range.
    pub placeholder_range: TextRange,
    /// 0-based argument index.
    pub argument_index: usize,
    /// Argument source text.
    pub argument: String,
    /// Absolute argument range.
    pub argument_range: TextRange,
}

impl ReferenceReport {
    /// Build from a resolved reference of `site`.
    pub fn new(site: &LogCallSite, reference: &LogArgumentReference) -> Self {
        Self {
            placeholder: placeholder_text(site, reference.placeholder).to_string(),
            placeholder_range: reference.placeholder,
            argument_index: reference.argument_index,
            argument: reference.argument_text.clone(),
            argument_range: reference.argument_range,
        }
    }
}

/// JSON shape of a placeholder count.
#[derive(Serialize)]
pub struct CountReport<'a> {
    /// Style used.
    pub style: LoggerStyle,
    /// Count result.
    #[serde(flatten)]
    pub count: &'a PlaceholderCount,
    /// Placeholder texts, parallel to `ranges`.
    pub placeholders: Vec<&'a str>,
}

/// Text of an absolute placeholder range, taken from the call's format text.
pub fn placeholder_text(site: &LogCallSite, range: TextRange) -> &str {
    let base = site.call.format.range.start;
    range
        .start
        .checked_sub(base)
        .zip(range.end.checked_sub(base))
        .and_then(|(start, end)| site.format_text.get(start..end))
        .unwrap_or("")
}
