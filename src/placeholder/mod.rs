//! Placeholder counting for log format strings.
//!
//! A format string is only countable when it is a single literal fragment.
//! Everything else (concatenations, variables, method calls) is reported as
//! [`PlaceholderStatus::Partial`] and never bound.
//!
//! # Key Concepts
//! - **Part**: one syntactic contributor to the format expression
//! - **Placeholder range**: byte range of one marker, relative to the literal value

pub mod braces;
pub mod printf;

use crate::style::{LoggerStyle, PlaceholderSyntax};
use serde::Serialize;

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TextRange {
    /// Byte offset of the first byte (inclusive).
    pub start: usize,
    /// Byte offset past the last byte (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Create a range. Callers keep `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {}..{}", start, end);
        Self { start, end }
    }

    /// Length in bytes; zero for an inverted range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Move the range right by `offset`, or `None` on overflow.
    pub fn checked_shift_right(&self, offset: usize) -> Option<TextRange> {
        Some(TextRange {
            start: self.start.checked_add(offset)?,
            end: self.end.checked_add(offset)?,
        })
    }

    /// Whether `other` lies entirely inside this range.
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slice `text` with this range, if it is in bounds and on char boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// One syntactic contributor to a format expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPart {
    /// Statically known text (the evaluated literal, escapes resolved).
    Literal {
        /// Evaluated text.
        value: String,
        /// Absolute source span of the literal.
        range: TextRange,
    },
    /// Anything whose text is not statically known.
    Expression {
        /// Absolute source span of the expression.
        range: TextRange,
    },
}

impl FormatPart {
    /// Evaluated text for literal parts.
    pub fn value(&self) -> Option<&str> {
        match self {
            FormatPart::Literal { value, .. } => Some(value),
            FormatPart::Expression { .. } => None,
        }
    }
}

/// The format-string argument of a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatString {
    /// Absolute source span of the whole format expression.
    pub range: TextRange,
    /// Source text of the expression as written, quotes and escapes included.
    pub source_text: Option<String>,
    /// Contributing fragments, in source order.
    pub parts: Vec<FormatPart>,
}

impl FormatString {
    /// A format string made of one literal.
    ///
    /// `source_text` is the literal as written (e.g. `"\"a {}\""`) and `start`
    /// its absolute offset.
    pub fn literal(value: &str, source_text: &str, start: usize) -> Self {
        let range = TextRange::new(start, start + source_text.len());
        Self {
            range,
            source_text: Some(source_text.to_string()),
            parts: vec![FormatPart::Literal {
                value: value.to_string(),
                range,
            }],
        }
    }

    /// The literal value when the expression is exactly one literal part.
    pub fn value(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [part] => part.value(),
            _ => None,
        }
    }
}

/// Outcome class of a placeholder count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStatus {
    /// The literal was fully scanned; the ranges are complete.
    Exactly,
    /// The count depends on text that is not statically known.
    Partial,
    /// The literal uses syntax the style does not accept.
    ErrorToParseString,
    /// There was nothing to count.
    Empty,
}

impl PlaceholderStatus {
    /// Convert to string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderStatus::Exactly => "exactly",
            PlaceholderStatus::Partial => "partial",
            PlaceholderStatus::ErrorToParseString => "error_to_parse_string",
            PlaceholderStatus::Empty => "empty",
        }
    }
}

/// Result of [`count_placeholders`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderCount {
    /// Outcome class.
    pub status: PlaceholderStatus,
    /// Placeholder ranges relative to the literal value, left to right.
    /// Only complete when `status` is [`PlaceholderStatus::Exactly`].
    pub ranges: Vec<TextRange>,
}

impl PlaceholderCount {
    /// A complete count.
    pub fn exactly(ranges: Vec<TextRange>) -> Self {
        Self {
            status: PlaceholderStatus::Exactly,
            ranges,
        }
    }

    /// A count that cannot be used for binding.
    pub fn indeterminate(status: PlaceholderStatus) -> Self {
        Self {
            status,
            ranges: Vec::new(),
        }
    }

    /// Number of placeholders found.
    pub fn count(&self) -> usize {
        self.ranges.len()
    }

    /// True when the count can be used for binding.
    pub fn is_exact(&self) -> bool {
        self.status == PlaceholderStatus::Exactly
    }
}

/// Count the placeholders of `format` under `style`.
///
/// # Rules
/// - no parts: [`PlaceholderStatus::Empty`]
/// - more than one part, or a non-literal part: [`PlaceholderStatus::Partial`]
/// - unsupported style: [`PlaceholderStatus::Partial`]
/// - otherwise the literal is scanned with the style's grammar
pub fn count_placeholders(format: &FormatString, style: LoggerStyle) -> PlaceholderCount {
    let value = match format.parts.as_slice() {
        [] => return PlaceholderCount::indeterminate(PlaceholderStatus::Empty),
        [FormatPart::Literal { value, .. }] => value,
        _ => return PlaceholderCount::indeterminate(PlaceholderStatus::Partial),
    };

    count_in_text(value, style)
}

/// Count the placeholders of a bare literal value under `style`.
pub fn count_in_text(text: &str, style: LoggerStyle) -> PlaceholderCount {
    match style.syntax() {
        Some(PlaceholderSyntax::Braces) => braces::scan(text, false),
        Some(PlaceholderSyntax::IndexedBraces) => braces::scan(text, true),
        Some(PlaceholderSyntax::Printf) => printf::scan(text),
        None => PlaceholderCount::indeterminate(PlaceholderStatus::Partial),
    }
}
