//! Positional binding of placeholders to call arguments.
//!
//! The Nth placeholder, left to right, binds to the Nth usable argument.
//! "Usable" drops a trailing throwable for the styles that exempt it.
//! Counts must match exactly; there are no partial bindings.

use crate::placeholder::TextRange;
use crate::style::LoggerStyle;
use serde::Serialize;

/// One placeholder paired with the argument that fills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// Placeholder range, relative to the literal value.
    pub range: TextRange,
    /// 0-based index into the call's argument list.
    pub argument_index: usize,
}

/// Why placeholders and arguments could not be paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// Fewer usable arguments than placeholders.
    TooFewArguments {
        /// Placeholder count.
        placeholders: usize,
        /// Usable argument count.
        arguments: usize,
    },
    /// More usable arguments than placeholders.
    TooManyArguments {
        /// Placeholder count.
        placeholders: usize,
        /// Usable argument count.
        arguments: usize,
    },
    /// The style has no binding rules.
    UnsupportedStyle,
}

/// Outcome of [`align`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    /// One binding per placeholder, in placeholder order.
    Aligned(Vec<Binding>),
    /// No bindings.
    NotAligned(Mismatch),
}

impl Alignment {
    /// The bindings, when aligned.
    pub fn bindings(&self) -> Option<&[Binding]> {
        match self {
            Alignment::Aligned(bindings) => Some(bindings),
            Alignment::NotAligned(_) => None,
        }
    }

    /// The mismatch, when not aligned.
    pub fn mismatch(&self) -> Option<Mismatch> {
        match self {
            Alignment::Aligned(_) => None,
            Alignment::NotAligned(mismatch) => Some(*mismatch),
        }
    }
}

/// Number of arguments available for placeholders.
pub fn usable_argument_count(
    argument_count: usize,
    style: LoggerStyle,
    last_argument_is_exception: bool,
) -> usize {
    if style.allows_exception_tail() && last_argument_is_exception {
        argument_count.saturating_sub(1)
    } else {
        argument_count
    }
}

/// Pair placeholder ranges with arguments by position.
///
/// `ranges` must come from an exact count. `last_argument_is_exception` is
/// the caller's judgement about the final argument's type.
pub fn align<A>(
    ranges: &[TextRange],
    arguments: &[A],
    style: LoggerStyle,
    last_argument_is_exception: bool,
) -> Alignment {
    if !style.is_supported() {
        return Alignment::NotAligned(Mismatch::UnsupportedStyle);
    }

    let placeholders = ranges.len();
    let usable = usable_argument_count(arguments.len(), style, last_argument_is_exception);

    if usable < placeholders {
        return Alignment::NotAligned(Mismatch::TooFewArguments {
            placeholders,
            arguments: usable,
        });
    }
    if usable > placeholders {
        return Alignment::NotAligned(Mismatch::TooManyArguments {
            placeholders,
            arguments: usable,
        });
    }

    Alignment::Aligned(
        ranges
            .iter()
            .enumerate()
            .map(|(argument_index, &range)| Binding {
                range,
                argument_index,
            })
            .collect(),
    )
}
