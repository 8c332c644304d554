//! `java.util.Formatter` conversion scanner.
//!
//! Recognizes `%[flags][width][.precision]conversion`. `%%` and `%n` are
//! escapes and consume no argument. Explicit (`%2$s`) and relative (`%<s`)
//! indexing make positional binding meaningless, so they yield
//! [`PlaceholderStatus::Partial`].

use super::{PlaceholderCount, PlaceholderStatus, TextRange};

const FLAGS: &[u8] = b"-#+ 0,(";
const CONVERSIONS: &[u8] = b"bBhHsScCdoxXeEfgGaA";
const DATE_SUFFIXES: &[u8] = b"HIklMSLNpzZsQBbhAaCYyjmdeRTrDFc";

/// Scan `text` for printf conversions.
pub fn scan(text: &str) -> PlaceholderCount {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        match conversion_at(bytes, i) {
            Conversion::Argument(end) => {
                log::trace!("printf conversion at {}..{}", i, end);
                ranges.push(TextRange::new(i, end));
                i = end;
            }
            Conversion::Escape(end) => i = end,
            Conversion::Indexed => {
                return PlaceholderCount::indeterminate(PlaceholderStatus::Partial);
            }
            Conversion::Malformed => {
                log::trace!("malformed printf conversion at {}", i);
                return PlaceholderCount::indeterminate(PlaceholderStatus::ErrorToParseString);
            }
        }
    }

    PlaceholderCount::exactly(ranges)
}

enum Conversion {
    /// Consumes an argument; specifier ends at the offset.
    Argument(usize),
    /// `%%` or `%n`; specifier ends at the offset.
    Escape(usize),
    /// Explicit or relative argument index.
    Indexed,
    Malformed,
}

fn conversion_at(bytes: &[u8], percent: usize) -> Conversion {
    let mut j = percent + 1;

    if bytes.get(j) == Some(&b'<') {
        return Conversion::Indexed;
    }

    // `%N$` must be told apart from a width before flags are consumed.
    let digits_end = skip_digits(bytes, j);
    if digits_end > j && bytes.get(digits_end) == Some(&b'$') {
        return Conversion::Indexed;
    }

    let flags_start = j;
    while j < bytes.len() && FLAGS.contains(&bytes[j]) {
        j += 1;
    }
    let flags = &bytes[flags_start..j];
    let width_end = skip_digits(bytes, j);
    let has_width = width_end > j;
    j = width_end;
    let mut has_precision = false;
    if bytes.get(j) == Some(&b'.') {
        let precision_end = skip_digits(bytes, j + 1);
        if precision_end == j + 1 {
            return Conversion::Malformed;
        }
        has_precision = true;
        j = precision_end;
    }

    let Some(&conversion) = bytes.get(j) else {
        return Conversion::Malformed;
    };

    let end = match conversion {
        b'%' | b'n' if j == percent + 1 => return Conversion::Escape(j + 1),
        b'%' | b'n' => return Conversion::Malformed,
        b't' | b'T' => match bytes.get(j + 1) {
            Some(suffix) if DATE_SUFFIXES.contains(suffix) => j + 2,
            _ => return Conversion::Malformed,
        },
        c if CONVERSIONS.contains(&c) => j + 1,
        _ => return Conversion::Malformed,
    };

    if modifiers_fit(conversion, flags, has_width, has_precision) {
        Conversion::Argument(end)
    } else {
        Conversion::Malformed
    }
}

/// Whether flags, width and precision are legal for `conversion`.
///
/// Mirrors the `Formatter` checks: duplicate flags, `-`/`0` without a width,
/// `-` with `0`, `+` with space, flags outside the conversion's set and a
/// precision on integral, character or date conversions are all rejected.
fn modifiers_fit(conversion: u8, flags: &[u8], has_width: bool, has_precision: bool) -> bool {
    let has = |flag: u8| flags.contains(&flag);

    let duplicated = flags
        .iter()
        .enumerate()
        .any(|(i, flag)| flags[..i].contains(flag));
    if duplicated {
        return false;
    }
    if (has(b'-') || has(b'0')) && !has_width {
        return false;
    }
    if (has(b'-') && has(b'0')) || (has(b'+') && has(b' ')) {
        return false;
    }

    let conversion = conversion.to_ascii_lowercase();
    let allowed: &[u8] = match conversion {
        b'b' | b'h' | b'c' | b't' => b"-",
        b's' => b"-#",
        b'd' => b"-+ 0,(",
        b'o' | b'x' => b"-#+ 0(",
        b'e' => b"-#+ 0(",
        b'f' => b"-#+ 0,(",
        b'g' => b"-+ 0,(",
        b'a' => b"-#+ 0",
        _ => return false,
    };
    if !flags.iter().all(|flag| allowed.contains(flag)) {
        return false;
    }

    !(has_precision && matches!(conversion, b'c' | b'd' | b'o' | b'x' | b't'))
}

fn skip_digits(bytes: &[u8], mut j: usize) -> usize {
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    j
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<(usize, usize)> {
        let count = scan(text);
        assert_eq!(count.status, PlaceholderStatus::Exactly, "{}", text);
        count.ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn test_simple_conversions() {
        assert_eq!(spans("%s took %d ms"), vec![(0, 2), (8, 10)]);
    }

    #[test]
    fn test_escapes_are_not_placeholders() {
        assert_eq!(spans("100%% done%n"), Vec::<(usize, usize)>::new());
        assert_eq!(spans("%%%s"), vec![(2, 4)]);
    }

    #[test]
    fn test_flags_width_precision() {
        assert_eq!(spans("[%-10s] %08.3f %,d"), vec![(1, 6), (8, 14), (15, 18)]);
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(spans("at %tH:%TM"), vec![(3, 6), (7, 10)]);
        assert_eq!(scan("%tq").status, PlaceholderStatus::ErrorToParseString);
    }

    #[test]
    fn test_indexed_is_partial() {
        assert_eq!(scan("%2$s %1$s").status, PlaceholderStatus::Partial);
        assert_eq!(scan("%s %<s").status, PlaceholderStatus::Partial);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(scan("50%").status, PlaceholderStatus::ErrorToParseString);
        assert_eq!(scan("%q").status, PlaceholderStatus::ErrorToParseString);
        assert_eq!(scan("%.f").status, PlaceholderStatus::ErrorToParseString);
        assert_eq!(scan("100% %s").status, PlaceholderStatus::ErrorToParseString);
    }

    #[test]
    fn test_flags_must_fit_conversion() {
        for text in ["%-s", "%,s", "%#d", "%(s", "%0d", "%-05d", "%+ d", "%--5s", "%.2d", "%,tH"] {
            assert_eq!(
                scan(text).status,
                PlaceholderStatus::ErrorToParseString,
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_legal_modifiers_are_kept() {
        assert_eq!(
            spans("%-5s %#x %(,.2f %+d %5c %.3s %-8tH"),
            vec![(0, 4), (5, 8), (9, 15), (16, 19), (20, 23), (24, 28), (29, 34)]
        );
    }

    #[test]
    fn test_braces_are_plain_text() {
        assert_eq!(spans("{} %s"), vec![(3, 5)]);
    }
}
