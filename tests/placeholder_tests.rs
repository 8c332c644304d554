//! Placeholder counting and alignment tests.

use logrefs::placeholder::{count_in_text, FormatPart};
use logrefs::{
    align, count_placeholders, Alignment, FormatString, LoggerStyle, Mismatch, PlaceholderStatus,
    TextRange,
};

fn args(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("arg{}", i)).collect()
}

#[test]
fn test_k_markers_bind_k_arguments_in_order() {
    for k in 0..6 {
        let text = vec!["{}"; k].join(" - ");
        let count = count_in_text(&text, LoggerStyle::Slf4j);
        assert_eq!(count.status, PlaceholderStatus::Exactly);
        assert_eq!(count.count(), k);

        let alignment = align(&count.ranges, &args(k), LoggerStyle::Slf4j, false);
        let bindings = alignment.bindings().unwrap();
        assert_eq!(bindings.len(), k);
        for (i, binding) in bindings.iter().enumerate() {
            assert_eq!(binding.argument_index, i);
            assert_eq!(binding.range, count.ranges[i]);
        }
        assert!(bindings.windows(2).all(|w| w[0].range.end <= w[1].range.start));
    }
}

#[test]
fn test_trailing_exception_is_never_bound() {
    for k in 0..4 {
        let text = vec!["{}"; k].join(",");
        let count = count_in_text(&text, LoggerStyle::Slf4j);
        let alignment = align(&count.ranges, &args(k + 1), LoggerStyle::Slf4j, true);
        let bindings = alignment.bindings().unwrap();
        assert_eq!(bindings.len(), k);
        assert!(bindings.iter().all(|b| b.argument_index < k));
    }
}

#[test]
fn test_equal_placeholder_styles_have_no_exemption() {
    for style in [
        LoggerStyle::Slf4jEqualPlaceholders,
        LoggerStyle::Log4jEqualPlaceholders,
    ] {
        let count = count_in_text("{} and {}", style);
        assert_eq!(count.count(), 2);
        for exception in [false, true] {
            assert!(matches!(
                align(&count.ranges, &args(3), style, exception),
                Alignment::NotAligned(Mismatch::TooManyArguments { .. })
            ));
            assert!(matches!(
                align(&count.ranges, &args(1), style, exception),
                Alignment::NotAligned(Mismatch::TooFewArguments { .. })
            ));
        }
        assert!(align(&count.ranges, &args(2), style, true).bindings().is_some());
    }
}

#[test]
fn test_escaped_marker_not_counted() {
    let count = count_in_text("real {} escaped \\{}", LoggerStyle::Slf4j);
    assert_eq!(count.ranges, vec![TextRange::new(5, 7)]);

    let alignment = align(&count.ranges, &args(1), LoggerStyle::Slf4j, false);
    assert_eq!(alignment.bindings().map(|b| b.len()), Some(1));
    assert!(align(&count.ranges, &args(2), LoggerStyle::Slf4j, false)
        .bindings()
        .is_none());
}

#[test]
fn test_concatenation_is_always_indeterminate() {
    let format = FormatString {
        range: TextRange::new(0, 16),
        source_text: Some("\"{} \" + \"{}\"".to_string()),
        parts: vec![
            FormatPart::Literal {
                value: "{} ".to_string(),
                range: TextRange::new(0, 5),
            },
            FormatPart::Literal {
                value: "{}".to_string(),
                range: TextRange::new(8, 12),
            },
        ],
    };
    for style in LoggerStyle::SUPPORTED {
        let count = count_placeholders(&format, style);
        assert_eq!(count.status, PlaceholderStatus::Partial);
        assert!(count.ranges.is_empty());
    }
}

#[test]
fn test_log4j_indexed_markers() {
    let count = count_in_text("{0} then {1} then {}", LoggerStyle::Log4jOldStyle);
    assert_eq!(count.count(), 3);
    let slf4j = count_in_text("{0} then {1} then {}", LoggerStyle::Slf4j);
    assert_eq!(slf4j.count(), 1);
}

#[test]
fn test_formatted_style() {
    let count = count_in_text("%s took %5.2f%% of %d", LoggerStyle::Log4jFormattedStyle);
    assert_eq!(count.status, PlaceholderStatus::Exactly);
    assert_eq!(
        count.ranges,
        vec![
            TextRange::new(0, 2),
            TextRange::new(8, 13),
            TextRange::new(19, 21)
        ]
    );

    let alignment = align(
        &count.ranges,
        &args(4),
        LoggerStyle::Log4jFormattedStyle,
        true,
    );
    assert_eq!(alignment.bindings().map(|b| b.len()), Some(3));
}

#[test]
fn test_formatted_style_ignores_braces() {
    let count = count_in_text("{} {}", LoggerStyle::Log4jFormattedStyle);
    assert!(count.is_exact());
    assert_eq!(count.count(), 0);
}
