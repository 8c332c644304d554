//! Placeholder-to-argument reference resolution.
//!
//! Takes one logging call as the call-site analysis saw it and produces the
//! cross references from each placeholder to the argument that fills it.
//!
//! # Architecture
//! - Counting: [`crate::placeholder::count_placeholders`]
//! - Pairing: [`crate::align::align`]
//! - Re-basing: relative placeholder ranges are shifted into absolute source
//!   coordinates using the literal's position inside its source text
//!
//! The caller always gets either a complete reference list or an
//! [`UnresolvedReason`]; expected input shapes never produce an error.

use crate::align::{align, Alignment, Mismatch};
use crate::placeholder::{count_placeholders, FormatString, PlaceholderStatus, TextRange};
use crate::style::LoggerStyle;
use serde::Serialize;
use std::fmt;

/// A call argument following the format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Absolute source span, when the host could locate the argument.
    pub range: Option<TextRange>,
    /// Source text of the argument expression.
    pub text: String,
}

impl Argument {
    /// An argument at a known location.
    pub fn new(text: impl Into<String>, range: TextRange) -> Self {
        Self {
            range: Some(range),
            text: text.into(),
        }
    }
}

/// A logging call, as seen by call-site analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCall {
    /// Logger style governing the call.
    pub style: LoggerStyle,
    /// The format-string argument.
    pub format: FormatString,
    /// Arguments after the format string, in call order.
    pub arguments: Vec<Argument>,
    /// Whether the final argument is a throwable.
    pub last_argument_is_exception: bool,
}

/// A resolved link from one placeholder to one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogArgumentReference {
    /// Placeholder range in absolute source coordinates.
    pub placeholder: TextRange,
    /// 0-based index of the bound argument.
    pub argument_index: usize,
    /// Absolute source span of the bound argument.
    pub argument_range: TextRange,
    /// Source text of the bound argument.
    pub argument_text: String,
}

/// Why a call produced no references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The logger style has no placeholder rules.
    UnsupportedStyle,
    /// The placeholder count could not be statically determined.
    Indeterminate(PlaceholderStatus),
    /// Placeholder and argument counts differ.
    Mismatch(Mismatch),
    /// The format expression has no readable source text.
    MissingSource,
    /// The literal value could not be located inside its source text.
    ValueNotInSource,
    /// A shifted placeholder range fell outside the format expression.
    RangeOutOfBounds,
    /// A bound argument has no source location.
    MissingArgumentLocation {
        /// Index of the argument.
        argument_index: usize,
    },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::UnsupportedStyle => write!(f, "unsupported logger style"),
            UnresolvedReason::Indeterminate(status) => {
                write!(f, "placeholder count is indeterminate ({})", status.as_str())
            }
            UnresolvedReason::Mismatch(Mismatch::TooFewArguments {
                placeholders,
                arguments,
            }) => write!(
                f,
                "{} placeholder(s) but only {} argument(s)",
                placeholders, arguments
            ),
            UnresolvedReason::Mismatch(Mismatch::TooManyArguments {
                placeholders,
                arguments,
            }) => write!(
                f,
                "{} argument(s) but only {} placeholder(s)",
                arguments, placeholders
            ),
            UnresolvedReason::Mismatch(Mismatch::UnsupportedStyle) => {
                write!(f, "unsupported logger style")
            }
            UnresolvedReason::MissingSource => write!(f, "format string has no source text"),
            UnresolvedReason::ValueNotInSource => {
                write!(f, "format string value does not appear verbatim in source")
            }
            UnresolvedReason::RangeOutOfBounds => {
                write!(f, "placeholder range falls outside the format string")
            }
            UnresolvedReason::MissingArgumentLocation { argument_index } => {
                write!(f, "argument {} has no source location", argument_index)
            }
        }
    }
}

/// Outcome of [`resolve_log_call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One reference per placeholder, in placeholder order.
    Resolved(Vec<LogArgumentReference>),
    /// No references.
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// The references, or `None` when unresolved.
    pub fn into_references(self) -> Option<Vec<LogArgumentReference>> {
        match self {
            Resolution::Resolved(references) => Some(references),
            Resolution::Unresolved(_) => None,
        }
    }

    /// The reason, when unresolved.
    pub fn reason(&self) -> Option<UnresolvedReason> {
        match self {
            Resolution::Resolved(_) => None,
            Resolution::Unresolved(reason) => Some(*reason),
        }
    }
}

/// Resolve the placeholder references of one logging call.
///
/// # Algorithm
/// 1. Reject unsupported styles and multi-part format strings
/// 2. Count placeholders; anything but an exact count stops here
/// 3. Align placeholders with usable arguments by position
/// 4. Locate the literal value inside its source text
/// 5. Shift every placeholder range into absolute coordinates
pub fn resolve_log_call(call: &LogCall) -> Resolution {
    match resolve_inner(call) {
        Ok(references) => Resolution::Resolved(references),
        Err(reason) => {
            log::debug!(
                "unresolved log call at {}..{}: {}",
                call.format.range.start,
                call.format.range.end,
                reason
            );
            Resolution::Unresolved(reason)
        }
    }
}

/// Resolve the placeholder references of one logging call, or `None`.
pub fn resolve_log_references(call: &LogCall) -> Option<Vec<LogArgumentReference>> {
    resolve_log_call(call).into_references()
}

fn resolve_inner(call: &LogCall) -> Result<Vec<LogArgumentReference>, UnresolvedReason> {
    if !call.style.is_supported() {
        return Err(UnresolvedReason::UnsupportedStyle);
    }
    if call.format.parts.len() > 1 {
        return Err(UnresolvedReason::Indeterminate(PlaceholderStatus::Partial));
    }

    let count = count_placeholders(&call.format, call.style);
    if !count.is_exact() {
        return Err(UnresolvedReason::Indeterminate(count.status));
    }

    let bindings = match align(
        &count.ranges,
        &call.arguments,
        call.style,
        call.last_argument_is_exception,
    ) {
        Alignment::Aligned(bindings) => bindings,
        Alignment::NotAligned(mismatch) => return Err(UnresolvedReason::Mismatch(mismatch)),
    };

    let source_text = call
        .format
        .source_text
        .as_deref()
        .ok_or(UnresolvedReason::MissingSource)?;
    let value = call.format.value().ok_or(UnresolvedReason::MissingSource)?;
    let offset = offset_in_text(source_text, value).ok_or(UnresolvedReason::ValueNotInSource)?;
    let base = call
        .format
        .range
        .start
        .checked_add(offset)
        .ok_or(UnresolvedReason::RangeOutOfBounds)?;

    let mut references = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let placeholder = binding
            .range
            .checked_shift_right(base)
            .filter(|range| call.format.range.contains_range(*range))
            .ok_or(UnresolvedReason::RangeOutOfBounds)?;

        let argument = &call.arguments[binding.argument_index];
        let argument_range = argument
            .range
            .ok_or(UnresolvedReason::MissingArgumentLocation {
                argument_index: binding.argument_index,
            })?;

        references.push(LogArgumentReference {
            placeholder,
            argument_index: binding.argument_index,
            argument_range,
            argument_text: argument.text.clone(),
        });
    }

    Ok(references)
}

/// Offset of `value` inside `source_text`, by plain substring search.
///
/// For a literal like `"a {}"` this is 1 (past the opening quote). Literals
/// whose escapes change the text (`"a\t{}"`) are not found.
pub fn offset_in_text(source_text: &str, value: &str) -> Option<usize> {
    source_text.find(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::FormatPart;

    fn call(format_source: &str, value: &str, args: &[&str], style: LoggerStyle) -> LogCall {
        // format starts at offset 10; arguments follow it separated by ", "
        let format = FormatString::literal(value, format_source, 10);
        let mut position = format.range.end;
        let arguments = args
            .iter()
            .map(|text| {
                position += 2;
                let range = TextRange::new(position, position + text.len());
                position = range.end;
                Argument::new(*text, range)
            })
            .collect();
        LogCall {
            style,
            format,
            arguments,
            last_argument_is_exception: false,
        }
    }

    #[test]
    fn test_resolves_absolute_ranges() {
        let call = call("\"a {} b {}\"", "a {} b {}", &["x", "y"], LoggerStyle::Slf4j);
        let refs = resolve_log_references(&call).unwrap();
        assert_eq!(refs.len(), 2);
        // literal at 10, quote at 10, value at 11, first marker at value+2
        assert_eq!(refs[0].placeholder, TextRange::new(13, 15));
        assert_eq!(refs[0].argument_text, "x");
        assert_eq!(refs[1].placeholder, TextRange::new(18, 20));
        assert_eq!(refs[1].argument_index, 1);
    }

    #[test]
    fn test_escape_sequences_prevent_location() {
        let call = call("\"a\\t{}\"", "a\t{}", &["x"], LoggerStyle::Slf4j);
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::ValueNotInSource)
        );
    }

    #[test]
    fn test_missing_source_text() {
        let mut call = call("\"{}\"", "{}", &["x"], LoggerStyle::Slf4j);
        call.format.source_text = None;
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::MissingSource)
        );
    }

    #[test]
    fn test_missing_argument_location() {
        let mut call = call("\"{}\"", "{}", &["x"], LoggerStyle::Slf4j);
        call.arguments[0].range = None;
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::MissingArgumentLocation { argument_index: 0 })
        );
    }

    #[test]
    fn test_unbound_exception_location_is_not_needed() {
        let mut call = call("\"{}\"", "{}", &["x", "e"], LoggerStyle::Slf4j);
        call.last_argument_is_exception = true;
        call.arguments[1].range = None;
        assert_eq!(resolve_log_references(&call).map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_inconsistent_format_range() {
        let mut call = call("\"{}\"", "{}", &["x"], LoggerStyle::Slf4j);
        call.format.range = TextRange::new(10, 11);
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::RangeOutOfBounds)
        );
    }

    #[test]
    fn test_multi_part_is_indeterminate() {
        let mut call = call("\"{}\"", "{}", &["x"], LoggerStyle::Slf4j);
        call.format.parts.push(FormatPart::Expression {
            range: TextRange::new(20, 25),
        });
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::Indeterminate(PlaceholderStatus::Partial))
        );
    }

    #[test]
    fn test_unsupported_style() {
        let call = call("\"{}\"", "{}", &["x"], LoggerStyle::Unsupported);
        assert_eq!(
            resolve_log_call(&call).reason(),
            Some(UnresolvedReason::UnsupportedStyle)
        );
    }

    #[test]
    fn test_reason_display() {
        let reason = UnresolvedReason::Mismatch(Mismatch::TooManyArguments {
            placeholders: 1,
            arguments: 3,
        });
        assert_eq!(reason.to_string(), "3 argument(s) but only 1 placeholder(s)");
    }
}
