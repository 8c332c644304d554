//! logrefs CLI binary
//!
//! This is the main entry point for the logrefs command-line interface.
//! The CLI is a thin adapter over the library APIs.

use logrefs::align::{align, Alignment};
use logrefs::cli::{
    CallReport, CliErrorPayload, CliSuccessPayload, Commands, CountReport, FileReport,
    ReferenceReport, StyleArg,
};
use logrefs::config::AnalysisConfig;
use logrefs::ingest::{ingest_file, ingest_glob, FileCalls};
use logrefs::placeholder::count_in_text;
use logrefs::resolve::{resolve_log_call, Resolution, UnresolvedReason};
use logrefs::{LogRefsError, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = logrefs::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    let json = cli.command.json();

    // Execute command
    let result = match cli.command {
        Commands::Refs {
            file,
            glob,
            config,
            style,
            log4j_bridge,
            unresolved,
            json,
        } => execute_refs(file, glob, config, style, log4j_bridge, unresolved, json),
        Commands::Count {
            style,
            format,
            json,
        } => execute_count(style, &format, json),
        Commands::Align {
            style,
            format,
            args,
            exception_tail,
            json,
        } => execute_align(style, &format, &args, exception_tail, json),
    };

    // Handle result
    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if json {
                match serde_json::to_string_pretty(&CliErrorPayload::from_error(&e)) {
                    Ok(payload) => println!("{}", payload),
                    Err(_) => eprintln!("Error: {}", e),
                }
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(1)
        }
    }
}

/// Execute the refs command.
///
/// 1. Builds the analysis config (file, then CLI overrides)
/// 2. Scans the requested Java files
/// 3. Resolves every call and renders the references
fn execute_refs(
    file: Option<PathBuf>,
    glob: Option<String>,
    config_path: Option<PathBuf>,
    style: Option<StyleArg>,
    log4j_bridge: bool,
    show_unresolved: bool,
    json: bool,
) -> Result<String> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::load(&path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(style) = style {
        config.default_style = Some(style.to_logger_style());
    }
    if log4j_bridge {
        config.log4j_bridge = true;
    }

    let files: Vec<FileCalls> = match (file, glob) {
        (Some(path), _) => vec![ingest_file(&path, &config)?],
        (None, Some(pattern)) => ingest_glob(&pattern, &config)?,
        (None, None) => {
            return Err(LogRefsError::Other(
                "Either --file or --glob is required".to_string(),
            ))
        }
    };

    let mut reports = Vec::with_capacity(files.len());
    let mut reference_count = 0;
    let mut resolved_calls = 0;

    for file_calls in &files {
        let mut calls = Vec::new();
        for site in &file_calls.sites {
            let (references, unresolved) = match resolve_log_call(&site.call) {
                Resolution::Resolved(references) => (references, None),
                Resolution::Unresolved(reason) => (Vec::new(), Some(reason)),
            };
            if unresolved.is_none() {
                resolved_calls += 1;
                reference_count += references.len();
            } else if !show_unresolved {
                continue;
            }
            calls.push(CallReport {
                line: site.line,
                column: site.column,
                receiver: site.receiver.clone(),
                method: site.method.clone(),
                style: site.call.style,
                format: site.format_text.clone(),
                references: references
                    .iter()
                    .map(|reference| ReferenceReport::new(site, reference))
                    .collect(),
                unresolved,
            });
        }
        reports.push(FileReport {
            path: file_calls.path.display().to_string(),
            calls,
        });
    }

    let message = format!(
        "{} reference(s) in {} resolved call(s) across {} file(s)",
        reference_count,
        resolved_calls,
        files.len()
    );

    if json {
        return render_json(message, &reports);
    }

    let mut lines = Vec::new();
    for report in &reports {
        for call in &report.calls {
            let location = format!("{}:{}:{}", report.path, call.line, call.column + 1);
            match call.unresolved {
                Some(reason) => lines.push(format!(
                    "{}: unresolved {}.{}(..): {}",
                    location, call.receiver, call.method, reason
                )),
                None => {
                    for reference in &call.references {
                        lines.push(format!(
                            "{}: {} -> {} (argument {})",
                            location,
                            reference.placeholder,
                            reference.argument,
                            reference.argument_index
                        ));
                    }
                }
            }
        }
    }
    lines.push(message);
    Ok(lines.join("\n"))
}

/// Execute the count command.
fn execute_count(style: StyleArg, format: &str, json: bool) -> Result<String> {
    let style = style.to_logger_style();
    let count = count_in_text(format, style);
    let placeholders: Vec<&str> = count
        .ranges
        .iter()
        .map(|range| range.slice(format).unwrap_or(""))
        .collect();

    let message = format!(
        "{} placeholder(s), status {}",
        count.count(),
        count.status.as_str()
    );

    if json {
        let report = CountReport {
            style,
            count: &count,
            placeholders,
        };
        return render_json(message, &report);
    }

    let mut lines = vec![message];
    for (range, text) in count.ranges.iter().zip(&placeholders) {
        lines.push(format!("{}..{} {}", range.start, range.end, text));
    }
    Ok(lines.join("\n"))
}

/// JSON shape of the align command.
#[derive(Serialize)]
struct AlignReport<'a> {
    aligned: bool,
    bindings: Vec<AlignedArgument<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unresolved: Option<UnresolvedReason>,
}

#[derive(Serialize)]
struct AlignedArgument<'a> {
    placeholder: &'a str,
    start: usize,
    end: usize,
    argument_index: usize,
    argument: &'a str,
}

/// Execute the align command.
fn execute_align(
    style: StyleArg,
    format: &str,
    args: &[String],
    exception_tail: bool,
    json: bool,
) -> Result<String> {
    let style = style.to_logger_style();
    let count = count_in_text(format, style);

    let outcome = if count.is_exact() {
        match align(&count.ranges, args, style, exception_tail) {
            Alignment::Aligned(bindings) => Ok(bindings),
            Alignment::NotAligned(mismatch) => Err(UnresolvedReason::Mismatch(mismatch)),
        }
    } else {
        Err(UnresolvedReason::Indeterminate(count.status))
    };

    let report = match &outcome {
        Ok(bindings) => AlignReport {
            aligned: true,
            bindings: bindings
                .iter()
                .map(|binding| AlignedArgument {
                    placeholder: binding.range.slice(format).unwrap_or(""),
                    start: binding.range.start,
                    end: binding.range.end,
                    argument_index: binding.argument_index,
                    argument: args[binding.argument_index].as_str(),
                })
                .collect(),
            unresolved: None,
        },
        Err(reason) => AlignReport {
            aligned: false,
            bindings: Vec::new(),
            unresolved: Some(*reason),
        },
    };

    let message = match report.unresolved {
        Some(reason) => format!("not aligned: {}", reason),
        None => format!("{} binding(s)", report.bindings.len()),
    };

    if json {
        return render_json(message, &report);
    }

    let mut lines = vec![message];
    for binding in &report.bindings {
        lines.push(format!(
            "{}..{} {} -> {} (argument {})",
            binding.start, binding.end, binding.placeholder, binding.argument, binding.argument_index
        ));
    }
    Ok(lines.join("\n"))
}

fn render_json<T: Serialize>(message: String, data: &T) -> Result<String> {
    let data = serde_json::to_value(data)
        .map_err(|err| LogRefsError::Other(format!("Failed to serialize output: {}", err)))?;
    serde_json::to_string_pretty(&CliSuccessPayload::with_data(message, data))
        .map_err(|err| LogRefsError::Other(format!("Failed to serialize output: {}", err)))
}
