//! Java logging call-site extraction using tree-sitter-java.
//!
//! Finds SLF4J and Log4j 2 logging calls and turns each into a
//! [`LogCall`]: logger style, format-string parts, trailing arguments and
//! whether the last argument is a throwable.
//!
//! There is no type information here. Loggers are recognized by declared
//! type name (`*Logger`) or configured receiver names, the logging library by
//! imports, and throwables by type-name suffix or `catch` parameter.

use crate::config::{simple_type_name, AnalysisConfig};
use crate::error::{LogRefsError, Result};
use crate::placeholder::{FormatPart, FormatString, TextRange};
use crate::resolve::{Argument, LogCall};
use crate::style::LoggerStyle;
use ropey::Rope;
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::Node;

const LEVEL_METHODS: &[&str] = &["trace", "debug", "info", "warn", "error", "fatal"];

/// Builder steps allowed between the logger and a fluent `log(..)`.
const FLUENT_STEPS: &[&str] = &[
    "atTrace",
    "atDebug",
    "atInfo",
    "atWarn",
    "atError",
    "atFatal",
    "atLevel",
    "withThrowable",
    "withMarker",
    "withLocation",
    "setCause",
    "addMarker",
];

/// Builder steps that feed arguments outside the `log(..)` call.
const FLUENT_ARGUMENT_STEPS: &[&str] = &["addArgument", "addKeyValue", "setMessage"];

/// A logging call found in a Java file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogCallSite {
    /// The call, ready for resolution.
    pub call: LogCall,

    /// Invoked method (`info`, `printf`, `log`, ...).
    pub method: String,

    /// Logger receiver name (`log`, `LOGGER`, ...).
    pub receiver: String,

    /// Start byte offset of the whole call expression.
    pub byte_start: usize,

    /// End byte offset of the whole call expression.
    pub byte_end: usize,

    /// Line of the call (1-based).
    pub line: usize,

    /// Column of the call (0-based, in bytes).
    pub column: usize,

    /// Source text of the format-string argument.
    pub format_text: String,
}

/// Logging library behind a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFamily {
    /// `org.slf4j`
    Slf4j,
    /// `org.apache.logging.log4j`
    Log4j,
}

impl LoggerFamily {
    /// Family of a qualified name such as an import path or declared type.
    pub fn from_qualified_name(name: &str) -> Option<Self> {
        if name.starts_with("org.slf4j") {
            Some(LoggerFamily::Slf4j)
        } else if name.starts_with("org.apache.logging.log4j") {
            Some(LoggerFamily::Log4j)
        } else {
            None
        }
    }
}

/// Shape of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `log.info(fmt, ..)` or `log.log(Level.INFO, fmt, ..)`.
    Plain,
    /// `log.printf(Level.INFO, fmt, ..)`.
    Printf,
    /// `log.atInfo()...log(fmt, ..)`.
    Fluent,
}

/// Logger style for a call of `kind` on a logger of `family`.
pub fn style_for(
    family: LoggerFamily,
    kind: CallKind,
    formatter: bool,
    log4j_bridge: bool,
) -> LoggerStyle {
    match (family, kind) {
        (LoggerFamily::Slf4j, CallKind::Plain) if log4j_bridge => LoggerStyle::Log4jOldStyle,
        (LoggerFamily::Slf4j, CallKind::Plain) => LoggerStyle::Slf4j,
        (LoggerFamily::Slf4j, CallKind::Printf) => LoggerStyle::Unsupported,
        (LoggerFamily::Slf4j, CallKind::Fluent) => LoggerStyle::Slf4jEqualPlaceholders,
        (LoggerFamily::Log4j, CallKind::Plain) if formatter => LoggerStyle::Log4jFormattedStyle,
        (LoggerFamily::Log4j, CallKind::Plain) => LoggerStyle::Log4jOldStyle,
        (LoggerFamily::Log4j, CallKind::Printf) => LoggerStyle::Log4jFormattedStyle,
        (LoggerFamily::Log4j, CallKind::Fluent) => LoggerStyle::Log4jEqualPlaceholders,
    }
}

/// What a declared name stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeclKind {
    Logger {
        /// Declared type as written (`Logger`, `org.slf4j.Logger`).
        type_name: String,
        /// Initialized with `getFormatterLogger(..)`.
        formatter: bool,
    },
    Marker,
    Throwable,
    Other,
}

/// A name declared as a field, local, parameter or catch parameter.
#[derive(Debug, Clone)]
struct Declaration {
    /// Span of the node the name is visible in.
    scope: TextRange,
    kind: DeclKind,
}

/// Per-file facts gathered before call extraction.
struct FileContext<'a> {
    source: &'a [u8],
    config: &'a AnalysisConfig,
    /// First logging import, for names not imported individually.
    imported_family: Option<LoggerFamily>,
    /// Simple name -> family, from single-type imports.
    imports: HashMap<String, LoggerFamily>,
    declarations: HashMap<String, Vec<Declaration>>,
}

impl FileContext<'_> {
    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Innermost declaration of `name` visible at byte `at`.
    fn lookup(&self, name: &str, at: usize) -> Option<&DeclKind> {
        self.declarations
            .get(name)?
            .iter()
            .filter(|decl| decl.scope.start <= at && at < decl.scope.end)
            .min_by_key(|decl| decl.scope.len())
            .map(|decl| &decl.kind)
    }

    fn is_logger(&self, name: &str, at: usize) -> bool {
        match self.lookup(name, at) {
            Some(DeclKind::Logger { .. }) => true,
            Some(_) => false,
            None => self.config.logger_names.iter().any(|n| n == name),
        }
    }

    /// Logger name for a receiver expression (`log`, `this.log`).
    fn logger_receiver(&self, node: Node) -> Option<String> {
        let name = match node.kind() {
            "identifier" => self.text(node),
            "field_access" => self.text(node.child_by_field_name("field")?),
            _ => return None,
        };
        self.is_logger(name, node.start_byte())
            .then(|| name.to_string())
    }

    /// Logging library of a logger declared with `type_name`.
    ///
    /// A qualified type wins, then the import binding the simple name, then
    /// the first logging import of the file.
    fn family_of_type(&self, type_name: &str) -> Option<LoggerFamily> {
        LoggerFamily::from_qualified_name(type_name)
            .or_else(|| self.imports.get(simple_type_name(type_name)).copied())
            .or(self.imported_family)
    }
}

/// Extract logging calls from a Java source file.
///
/// Uses tree-sitter-java to parse the file, then:
/// - collects imports, logger declarations and throwable-typed names
/// - classifies every method invocation on a logger
/// - builds a [`LogCall`] for each recognized call
///
/// Calls whose logging library cannot be determined are skipped unless
/// `config.default_style` is set.
pub fn extract_java_log_calls(
    path: &Path,
    source: &[u8],
    config: &AnalysisConfig,
) -> Result<Vec<LogCallSite>> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_java::language())
        .map_err(|e| LogRefsError::Parse {
            file: path.to_path_buf(),
            message: format!("Failed to set Java language: {:?}", e),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| LogRefsError::Parse {
            file: path.to_path_buf(),
            message: "Parse failed - no tree returned".to_string(),
        })?;

    let rope = Rope::from_str(std::str::from_utf8(source)?);

    let mut ctx = FileContext {
        source,
        config,
        imported_family: None,
        imports: HashMap::new(),
        declarations: HashMap::new(),
    };
    collect_declarations(tree.root_node(), &mut ctx);

    let mut sites = Vec::new();
    collect_calls(tree.root_node(), &ctx, &rope, &mut sites);

    log::debug!(
        "{}: {} logging call(s), {} declared name(s)",
        path.display(),
        sites.len(),
        ctx.declarations.len()
    );

    Ok(sites)
}

/// Gather imports and logger, marker and throwable declarations.
fn collect_declarations(node: Node, ctx: &mut FileContext) {
    match node.kind() {
        "import_declaration" => {
            let path = ctx
                .text(node)
                .trim_start_matches("import")
                .trim()
                .trim_start_matches("static")
                .trim_end_matches(';')
                .trim()
                .to_string();
            if let Some(family) = LoggerFamily::from_qualified_name(&path) {
                if ctx.imported_family.is_none() {
                    ctx.imported_family = Some(family);
                }
                if let Some((_, simple)) = path.rsplit_once('.') {
                    if simple != "*" {
                        ctx.imports.insert(simple.to_string(), family);
                    }
                }
            }
        }
        "field_declaration" | "local_variable_declaration" => {
            if let (Some(type_node), Some(scope)) =
                (node.child_by_field_name("type"), node.parent())
            {
                let type_name = ctx.text(type_node).to_string();
                for child in node.named_children(&mut node.walk()) {
                    if child.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name_node) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let name = ctx.text(name_node).to_string();
                    let formatter = child
                        .child_by_field_name("value")
                        .is_some_and(|value| ctx.text(value).contains("getFormatterLogger"));
                    declare(ctx, node_range(scope), &type_name, name, formatter);
                }
            }
        }
        "formal_parameter" => {
            if let (Some(type_node), Some(name_node), Some(scope)) = (
                node.child_by_field_name("type"),
                declared_name(node),
                parameter_scope(node),
            ) {
                let type_name = ctx.text(type_node).to_string();
                let name = ctx.text(name_node).to_string();
                declare(ctx, node_range(scope), &type_name, name, false);
            }
        }
        "catch_formal_parameter" => {
            if let (Some(name_node), Some(clause)) = (declared_name(node), node.parent()) {
                let name = ctx.text(name_node).to_string();
                ctx.declarations.entry(name).or_default().push(Declaration {
                    scope: node_range(clause),
                    kind: DeclKind::Throwable,
                });
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_declarations(child, ctx);
    }
}

fn declare(
    ctx: &mut FileContext,
    scope: TextRange,
    type_name: &str,
    name: String,
    formatter: bool,
) {
    let simple = simple_type_name(type_name);
    let kind = if simple.ends_with("Marker") {
        DeclKind::Marker
    } else if simple.ends_with("Logger") {
        DeclKind::Logger {
            type_name: type_name.to_string(),
            formatter,
        }
    } else if ctx.config.is_exception_type(type_name) {
        DeclKind::Throwable
    } else {
        DeclKind::Other
    };
    ctx.declarations
        .entry(name)
        .or_default()
        .push(Declaration { scope, kind });
}

/// Name node of a parameter; tree-sitter-java leaves some unlabeled.
fn declared_name(node: Node) -> Option<Node> {
    node.child_by_field_name("name").or_else(|| {
        node.named_children(&mut node.walk())
            .filter(|n| n.kind() == "identifier")
            .last()
    })
}

/// Method, constructor or lambda a parameter belongs to.
fn parameter_scope(node: Node) -> Option<Node> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if matches!(
            ancestor.kind(),
            "method_declaration"
                | "constructor_declaration"
                | "compact_constructor_declaration"
                | "lambda_expression"
        ) {
            return Some(ancestor);
        }
        current = ancestor.parent();
    }
    None
}

/// Visit every method invocation, nested ones included.
fn collect_calls(node: Node, ctx: &FileContext, rope: &Rope, sites: &mut Vec<LogCallSite>) {
    if node.kind() == "method_invocation" {
        if let Some(site) = extract_call(node, ctx, rope) {
            sites.push(site);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls(child, ctx, rope, sites);
    }
}

/// Build a call site from a method invocation, if it is a logging call.
fn extract_call(node: Node, ctx: &FileContext, rope: &Rope) -> Option<LogCallSite> {
    let method = ctx.text(node.child_by_field_name("name")?).to_string();
    let object = node.child_by_field_name("object")?;
    let (kind, receiver) = classify(&method, object, ctx)?;

    let (family, formatter) = match ctx.lookup(&receiver, object.start_byte()) {
        Some(DeclKind::Logger {
            type_name,
            formatter,
        }) => (ctx.family_of_type(type_name), *formatter),
        _ => (ctx.family_of_type("Logger"), false),
    };
    let style = match family {
        Some(family) => style_for(family, kind, formatter, ctx.config.log4j_bridge),
        None => match ctx.config.default_style {
            Some(style) => style,
            None => {
                log::debug!(
                    "skipping {}.{}(..): logging library unknown",
                    receiver,
                    method
                );
                return None;
            }
        },
    };

    let arguments_node = node.child_by_field_name("arguments")?;
    let arguments: Vec<Node> = arguments_node
        .named_children(&mut arguments_node.walk())
        .filter(|n| !n.is_extra())
        .collect();

    let format_index = format_argument_index(&arguments, ctx)?;
    let format_node = arguments[format_index];
    let trailing = &arguments[format_index + 1..];

    let last_argument_is_exception = trailing
        .last()
        .is_some_and(|last| is_throwable(*last, ctx));

    let format_text = ctx.text(format_node).to_string();
    let mut parts = Vec::new();
    format_parts(format_node, ctx, &mut parts);

    let call = LogCall {
        style,
        format: FormatString {
            range: node_range(format_node),
            source_text: Some(format_text.clone()),
            parts,
        },
        arguments: trailing
            .iter()
            .map(|arg| Argument::new(ctx.text(*arg), node_range(*arg)))
            .collect(),
        last_argument_is_exception,
    };

    let byte_start = node.start_byte();
    let line = rope.byte_to_line(byte_start);
    let column = byte_start - rope.line_to_byte(line);

    Some(LogCallSite {
        call,
        method,
        receiver,
        byte_start,
        byte_end: node.end_byte(),
        line: line + 1,
        column,
        format_text,
    })
}

/// Call kind and logger name, or `None` for non-logging calls.
fn classify(method: &str, object: Node, ctx: &FileContext) -> Option<(CallKind, String)> {
    match method {
        "log" if object.kind() == "method_invocation" => {
            fluent_receiver(object, ctx).map(|receiver| (CallKind::Fluent, receiver))
        }
        "printf" => ctx
            .logger_receiver(object)
            .map(|receiver| (CallKind::Printf, receiver)),
        _ if method == "log" || LEVEL_METHODS.contains(&method) => ctx
            .logger_receiver(object)
            .map(|receiver| (CallKind::Plain, receiver)),
        _ => None,
    }
}

/// Walk a builder chain back to its logger.
fn fluent_receiver(mut node: Node, ctx: &FileContext) -> Option<String> {
    while node.kind() == "method_invocation" {
        let step = ctx.text(node.child_by_field_name("name")?);
        if FLUENT_ARGUMENT_STEPS.contains(&step) {
            log::debug!("skipping fluent call using {}(..)", step);
            return None;
        }
        if !FLUENT_STEPS.contains(&step) {
            return None;
        }
        node = node.child_by_field_name("object")?;
    }
    ctx.logger_receiver(node)
}

/// Index of the format string, past any leading `Level` or `Marker`.
fn format_argument_index(arguments: &[Node], ctx: &FileContext) -> Option<usize> {
    let mut index = 0;
    while index < 2 && index + 1 < arguments.len() && is_level_or_marker(arguments[index], ctx) {
        index += 1;
    }
    (index < arguments.len()).then_some(index)
}

fn is_level_or_marker(node: Node, ctx: &FileContext) -> bool {
    if node.kind() == "string_literal" {
        return false;
    }
    let text = ctx.text(node);
    let declared_marker = node.kind() == "identifier"
        && ctx.lookup(text, node.start_byte()) == Some(&DeclKind::Marker);
    if declared_marker || text.to_ascii_lowercase().contains("marker") {
        return true;
    }
    match node.kind() {
        "field_access" => node
            .child_by_field_name("object")
            .is_some_and(|object| ctx.text(object).ends_with("Level")),
        "identifier" => text.eq_ignore_ascii_case("level"),
        _ => false,
    }
}

/// Flatten a format expression into its contributing parts.
fn format_parts(node: Node, ctx: &FileContext, parts: &mut Vec<FormatPart>) {
    match node.kind() {
        "string_literal" => match literal_value(ctx.text(node)) {
            Some(value) => parts.push(FormatPart::Literal {
                value,
                range: node_range(node),
            }),
            None => parts.push(FormatPart::Expression {
                range: node_range(node),
            }),
        },
        "binary_expression"
            if node
                .child_by_field_name("operator")
                .is_some_and(|op| ctx.text(op) == "+") =>
        {
            if let (Some(left), Some(right)) = (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                format_parts(left, ctx, parts);
                format_parts(right, ctx, parts);
            }
        }
        "parenthesized_expression" => match node.named_child(0) {
            Some(inner) => format_parts(inner, ctx, parts),
            None => parts.push(FormatPart::Expression {
                range: node_range(node),
            }),
        },
        _ => parts.push(FormatPart::Expression {
            range: node_range(node),
        }),
    }
}

/// Whether a trailing argument is a throwable.
fn is_throwable(argument: Node, ctx: &FileContext) -> bool {
    match argument.kind() {
        "identifier" => {
            ctx.lookup(ctx.text(argument), argument.start_byte()) == Some(&DeclKind::Throwable)
        }
        "object_creation_expression" | "cast_expression" => argument
            .child_by_field_name("type")
            .is_some_and(|ty| ctx.config.is_exception_type(ctx.text(ty))),
        "parenthesized_expression" => argument
            .named_child(0)
            .is_some_and(|inner| is_throwable(inner, ctx)),
        _ => false,
    }
}

fn node_range(node: Node) -> TextRange {
    TextRange::new(node.start_byte(), node.end_byte())
}

/// Evaluate a Java string literal as written, quotes included.
///
/// Text blocks and literals with invalid escapes yield `None`.
pub fn literal_value(raw: &str) -> Option<String> {
    if raw.starts_with("\"\"\"") {
        return None;
    }
    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body)
}

fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            's' => out.push(' '),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'u' => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let mut code = 0u32;
                for _ in 0..4 {
                    code = code * 16 + chars.next()?.to_digit(16)?;
                }
                out.push(char::from_u32(code)?);
            }
            first @ '0'..='7' => {
                let max_digits = if first <= '3' { 3 } else { 2 };
                let mut code = first.to_digit(8)?;
                for _ in 1..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<LogCallSite> {
        extract_java_log_calls(
            Path::new("Test.java"),
            source.as_bytes(),
            &AnalysisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_literal_value() {
        assert_eq!(literal_value("\"a {}\"").as_deref(), Some("a {}"));
        assert_eq!(literal_value("\"tab\\there\"").as_deref(), Some("tab\there"));
        assert_eq!(literal_value("\"\\u0041\\101\\0\"").as_deref(), Some("AA\0"));
        assert_eq!(literal_value("\"bad \\q\""), None);
        assert_eq!(literal_value("\"\"\"\n  text\n  \"\"\""), None);
    }

    #[test]
    fn test_style_table() {
        assert_eq!(
            style_for(LoggerFamily::Slf4j, CallKind::Plain, false, false),
            LoggerStyle::Slf4j
        );
        assert_eq!(
            style_for(LoggerFamily::Slf4j, CallKind::Plain, false, true),
            LoggerStyle::Log4jOldStyle
        );
        assert_eq!(
            style_for(LoggerFamily::Log4j, CallKind::Plain, true, false),
            LoggerStyle::Log4jFormattedStyle
        );
        assert_eq!(
            style_for(LoggerFamily::Log4j, CallKind::Fluent, false, false),
            LoggerStyle::Log4jEqualPlaceholders
        );
        assert_eq!(
            style_for(LoggerFamily::Slf4j, CallKind::Printf, false, false),
            LoggerStyle::Unsupported
        );
    }

    #[test]
    fn test_extract_slf4j_call() {
        let source = r#"import org.slf4j.Logger;
class A {
    private static final Logger log = null;
    void f(String user) {
        log.info("hello {}", user);
    }
}
"#;
        let sites = extract(source);
        assert_eq!(sites.len(), 1);
        let site = &sites[0];
        assert_eq!(site.method, "info");
        assert_eq!(site.receiver, "log");
        assert_eq!(site.line, 5);
        assert_eq!(site.column, 8);
        assert_eq!(site.call.style, LoggerStyle::Slf4j);
        assert_eq!(site.call.format.value(), Some("hello {}"));
        assert_eq!(site.call.arguments.len(), 1);
        assert_eq!(site.call.arguments[0].text, "user");
        assert!(!site.call.last_argument_is_exception);
    }

    #[test]
    fn test_non_logger_receiver_ignored() {
        let source = r#"import org.slf4j.Logger;
class A {
    void f(java.util.List<String> items) {
        items.add("x {}");
        System.out.printf("%s", "y");
    }
}
"#;
        assert!(extract(source).is_empty());
    }

    #[test]
    fn test_unknown_family_skipped_without_default() {
        let source = r#"class A {
    void f() { log.info("x {}", 1); }
}
"#;
        assert!(extract(source).is_empty());

        let config = AnalysisConfig {
            default_style: Some(LoggerStyle::Slf4j),
            ..AnalysisConfig::default()
        };
        let sites =
            extract_java_log_calls(Path::new("A.java"), source.as_bytes(), &config).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].call.style, LoggerStyle::Slf4j);
    }

    #[test]
    fn test_catch_parameter_is_exception() {
        let source = r#"import org.slf4j.Logger;
class A {
    Logger log;
    void f() {
        try { g(); } catch (IllegalStateException | java.io.IOException e) {
            log.error("failed {}", "op", e);
        }
    }
}
"#;
        let sites = extract(source);
        assert_eq!(sites.len(), 1);
        assert!(sites[0].call.last_argument_is_exception);
    }
}
