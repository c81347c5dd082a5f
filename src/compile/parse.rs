//! Parser for javac's plain-text diagnostic output.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{Diagnostic, ErrorCode, Severity};

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<path>.+?):(?P<line>\d+): (?P<kind>error|warning): (?P<message>.*)$")
        .expect("javac header regex")
});

static GLOBAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<kind>error|warning): (?P<message>.*)$").expect("javac global regex"));

static TRAILER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+ (?:errors?|warnings?)(?: only showing .*)?|Note: .*)$")
        .expect("javac trailer regex")
});

static DOESNT_EXIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^package \S+ does not exist").expect("doesnt exist regex"));

/// First message line -> `compiler.err` key, first match wins.
const MESSAGE_KEYS: &[(&str, &str)] = &[
    (r"^incompatible types: ", "compiler.err.prob.found.req"),
    (r"^incomparable types: ", "compiler.err.incomparable.types"),
    (r"^missing return statement$", "compiler.err.missing.ret.stmt"),
    (r"^unreachable statement$", "compiler.err.unreachable.stmt"),
    (
        r"^variable \S+ might not have been initialized$",
        "compiler.err.var.might.not.have.been.initialized",
    ),
    (r" is already defined in ", "compiler.err.already.defined"),
    (
        r"^unreported exception \S+; must be caught or declared to be thrown$",
        "compiler.err.unreported.exception.need.to.catch.or.throw",
    ),
    (
        r" is not abstract and does not override abstract method ",
        "compiler.err.does.not.override.abstract",
    ),
    (
        r"^method does not override or implement a method from a supertype$",
        "compiler.err.method.does.not.override.superclass",
    ),
    (r" has private access in ", "compiler.err.report.access"),
    (
        r"^non-static (?:variable|method) .+ cannot be referenced from a static context$",
        "compiler.err.non-static.cant.be.ref",
    ),
    (
        r"^cannot assign a value to final variable ",
        "compiler.err.cant.assign.val.to.var",
    ),
    (
        r"^(?:method|constructor) .+ cannot be applied to given types;?$",
        "compiler.err.cant.apply.symbol",
    ),
    (
        r"^no suitable (?:method|constructor) found for ",
        "compiler.err.cant.apply.symbols",
    ),
    (
        r" is abstract; cannot be instantiated$",
        "compiler.err.abstract.cant.be.instantiated",
    ),
    (r"^cannot inherit from final ", "compiler.err.cant.inherit.from.final"),
    (
        r"^class \S+ is public, should be declared in a file named ",
        "compiler.err.class.public.should.be.in.file",
    ),
    (r"^duplicate class: ", "compiler.err.duplicate.class"),
    (
        r"^bad operand types? for (?:binary|unary) operator ",
        "compiler.err.operator.cant.be.applied.1",
    ),
    (r"^modifier .+ not allowed here$", "compiler.err.mod.not.allowed.here"),
    (r"^unclosed string literal$", "compiler.err.unclosed.str.lit"),
    (r"^unclosed comment$", "compiler.err.unclosed.comment"),
    (r"^reached end of file while parsing$", "compiler.err.premature.eof"),
    (r"^illegal start of expression$", "compiler.err.illegal.start.of.expr"),
    (r"^illegal start of type$", "compiler.err.illegal.start.of.type"),
    (r"^not a statement$", "compiler.err.not.stmt"),
    (r"^'else' without 'if'$", "compiler.err.else.without.if"),
    (
        r"^break outside switch or loop$",
        "compiler.err.break.outside.switch.loop",
    ),
    (r"^generic array creation$", "compiler.err.generic.array.creation"),
    (r"^.+ expected$", "compiler.err.expected"),
];

static KNOWN_MESSAGES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    MESSAGE_KEYS
        .iter()
        .map(|(pattern, key)| (Regex::new(pattern).expect("javac message regex"), *key))
        .collect()
});

/// Code assigned to errors whose message has no known shape
pub const UNCLASSIFIED: &str = "compiler.err.unclassified";

struct Block {
    severity: Severity,
    source: Option<PathBuf>,
    line: Option<u32>,
    lines: Vec<String>,
}

/// Split javac output into diagnostics, in the order they were printed.
pub fn parse_javac_output(output: &str) -> Vec<Diagnostic> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut open = false;

    for line in output.lines() {
        if let Some(caps) = HEADER.captures(line) {
            blocks.push(Block {
                severity: severity(&caps["kind"]),
                source: Some(PathBuf::from(&caps["path"])),
                line: caps["line"].parse().ok(),
                lines: vec![line.to_string()],
            });
            open = true;
        } else if let Some(caps) = GLOBAL.captures(line) {
            blocks.push(Block {
                severity: severity(&caps["kind"]),
                source: None,
                line: None,
                lines: vec![line.to_string()],
            });
            open = true;
        } else if TRAILER.is_match(line) {
            open = false;
        } else if open {
            if let Some(block) = blocks.last_mut() {
                block.lines.push(line.to_string());
            }
        }
    }

    blocks.into_iter().map(into_diagnostic).collect()
}

fn severity(kind: &str) -> Severity {
    if kind == "error" {
        Severity::Error
    } else {
        Severity::Warning
    }
}

fn into_diagnostic(block: Block) -> Diagnostic {
    let header_message = HEADER
        .captures(&block.lines[0])
        .or_else(|| GLOBAL.captures(&block.lines[0]))
        .map(|caps| caps["message"].to_string())
        .unwrap_or_default();

    // Drop the echoed source line and the caret below it.
    let detail_start = block
        .lines
        .iter()
        .position(|l| l.trim() == "^")
        .map(|caret| caret + 1)
        .unwrap_or(1);
    let mut message = header_message;
    for line in &block.lines[detail_start..] {
        message.push('\n');
        message.push_str(line);
    }

    Diagnostic {
        severity: block.severity,
        code: infer_code(&message),
        source: block.source,
        line: block.line,
        rendered: block.lines.join("\n"),
        message,
    }
}

/// Map an English javac message to its `compiler.err` key.
pub fn infer_code(message: &str) -> ErrorCode {
    if DOESNT_EXIST.is_match(message) {
        ErrorCode::DoesntExist
    } else if message.starts_with("cannot find symbol") {
        if message
            .lines()
            .any(|line| line.trim_start().starts_with("location:"))
        {
            ErrorCode::CantResolveLocation
        } else {
            ErrorCode::CantResolve
        }
    } else {
        let first = message.lines().next().unwrap_or_default();
        let key = KNOWN_MESSAGES
            .iter()
            .find(|(regex, _)| regex.is_match(first))
            .map_or(UNCLASSIFIED, |(_, key)| *key);
        ErrorCode::from_text(key)
    }
}
