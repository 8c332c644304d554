//! Logger styles.
//!
//! A style fixes two things: which placeholder grammar the format string uses,
//! and whether a trailing throwable argument is exempt from binding.

use crate::error::LogRefsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder syntax and binding rules of a logging API convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggerStyle {
    /// SLF4J `{}` markers; a trailing throwable is not a parameter.
    Slf4j,
    /// Log4j 2 `{}` / `{N}` markers; a trailing throwable is not a parameter.
    Log4jOldStyle,
    /// Log4j formatter loggers and `printf`: `java.util.Formatter` conversions.
    Log4jFormattedStyle,
    /// SLF4J fluent API: every argument must fill a `{}`.
    Slf4jEqualPlaceholders,
    /// Log4j builder API: every argument must fill a `{}` / `{N}`.
    Log4jEqualPlaceholders,
    /// Not a logging convention we can reason about.
    Unsupported,
}

/// Grammar used to find placeholders in a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderSyntax {
    /// `{}` only.
    Braces,
    /// `{}` and `{N}`.
    IndexedBraces,
    /// printf conversions such as `%s` or `%08.3f`.
    Printf,
}

impl LoggerStyle {
    /// All supported styles, in declaration order.
    pub const SUPPORTED: [LoggerStyle; 5] = [
        LoggerStyle::Slf4j,
        LoggerStyle::Log4jOldStyle,
        LoggerStyle::Log4jFormattedStyle,
        LoggerStyle::Slf4jEqualPlaceholders,
        LoggerStyle::Log4jEqualPlaceholders,
    ];

    /// Convert to string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerStyle::Slf4j => "slf4j",
            LoggerStyle::Log4jOldStyle => "log4j_old_style",
            LoggerStyle::Log4jFormattedStyle => "log4j_formatted_style",
            LoggerStyle::Slf4jEqualPlaceholders => "slf4j_equal_placeholders",
            LoggerStyle::Log4jEqualPlaceholders => "log4j_equal_placeholders",
            LoggerStyle::Unsupported => "unsupported",
        }
    }

    /// Placeholder grammar, or `None` for [`LoggerStyle::Unsupported`].
    pub fn syntax(&self) -> Option<PlaceholderSyntax> {
        match self {
            LoggerStyle::Slf4j | LoggerStyle::Slf4jEqualPlaceholders => {
                Some(PlaceholderSyntax::Braces)
            }
            LoggerStyle::Log4jOldStyle | LoggerStyle::Log4jEqualPlaceholders => {
                Some(PlaceholderSyntax::IndexedBraces)
            }
            LoggerStyle::Log4jFormattedStyle => Some(PlaceholderSyntax::Printf),
            LoggerStyle::Unsupported => None,
        }
    }

    /// Whether a trailing throwable argument is excluded from binding.
    ///
    /// The equal-placeholder styles take their throwable through a separate
    /// builder call, so every argument they receive must fill a placeholder.
    pub fn allows_exception_tail(&self) -> bool {
        matches!(
            self,
            LoggerStyle::Slf4j | LoggerStyle::Log4jOldStyle | LoggerStyle::Log4jFormattedStyle
        )
    }

    /// Whether placeholders can be counted and bound at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, LoggerStyle::Unsupported)
    }
}

impl fmt::Display for LoggerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerStyle {
    type Err = LogRefsError;

    /// Accepts `slf4j`, `SLF4J`, `log4j-old-style`, `LOG4J_OLD_STYLE`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "slf4j" => Ok(LoggerStyle::Slf4j),
            "log4j_old_style" => Ok(LoggerStyle::Log4jOldStyle),
            "log4j_formatted_style" => Ok(LoggerStyle::Log4jFormattedStyle),
            "slf4j_equal_placeholders" => Ok(LoggerStyle::Slf4jEqualPlaceholders),
            "log4j_equal_placeholders" => Ok(LoggerStyle::Log4jEqualPlaceholders),
            "unsupported" => Ok(LoggerStyle::Unsupported),
            _ => Err(LogRefsError::UnknownStyle(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_tail_policy() {
        assert!(LoggerStyle::Slf4j.allows_exception_tail());
        assert!(LoggerStyle::Log4jOldStyle.allows_exception_tail());
        assert!(LoggerStyle::Log4jFormattedStyle.allows_exception_tail());
        assert!(!LoggerStyle::Slf4jEqualPlaceholders.allows_exception_tail());
        assert!(!LoggerStyle::Log4jEqualPlaceholders.allows_exception_tail());
        assert!(!LoggerStyle::Unsupported.allows_exception_tail());
    }

    #[test]
    fn test_parse_style_names() {
        for style in LoggerStyle::SUPPORTED {
            assert_eq!(style.as_str().parse::<LoggerStyle>().unwrap(), style);
        }
        assert_eq!(
            "LOG4J_FORMATTED_STYLE".parse::<LoggerStyle>().unwrap(),
            LoggerStyle::Log4jFormattedStyle
        );
        assert_eq!(
            "slf4j-equal-placeholders".parse::<LoggerStyle>().unwrap(),
            LoggerStyle::Slf4jEqualPlaceholders
        );
        assert!("jul".parse::<LoggerStyle>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&LoggerStyle::Log4jOldStyle).unwrap();
        assert_eq!(json, "\"log4j_old_style\"");
        let back: LoggerStyle = serde_json::from_str("\"slf4j\"").unwrap();
        assert_eq!(back, LoggerStyle::Slf4j);
    }

    #[test]
    fn test_unsupported_has_no_syntax() {
        assert_eq!(LoggerStyle::Unsupported.syntax(), None);
        assert_eq!(
            LoggerStyle::Log4jEqualPlaceholders.syntax(),
            Some(PlaceholderSyntax::IndexedBraces)
        );
    }
}
