//! Turns raw diagnostics into structured decodings.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use regex::Captures;
use serde::Serialize;

use super::patterns::{NamedPattern, PatternRegistry};
use super::timing::{NoopTimer, PatternTimer};
use super::{Diagnostic, ErrorCategory, Keyword};
use crate::error::Result;
use crate::name::{QualifiedName, SEPARATOR};

/// Structured facts extracted from one diagnostic by one pattern.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedDiagnostic {
    #[serde(skip)]
    pub diagnostic: Diagnostic,
    pub category: ErrorCategory,
    pub pattern: String,
    pub matched: String,
    pub keyword: Option<Keyword>,
    pub package: Option<QualifiedName>,
    pub symbol: Option<QualifiedName>,
    /// Fully qualified name of the missing type, when the message names it
    pub typename: Option<QualifiedName>,
    pub location: Option<QualifiedName>,
    pub location_kind: Option<Keyword>,
}

impl DecodedDiagnostic {
    /// Field listing in `name value` columns, skipping absent fields.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let mut show = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                let _ = writeln!(out, "  {:<20} {}", name, value);
            }
        };
        show("category", Some(self.category.to_string()));
        show("pattern", Some(self.pattern.clone()));
        show("keyword", self.keyword.map(|k| k.to_string()));
        show("package", self.package.as_ref().map(|n| n.to_string()));
        show("symbol", self.symbol.as_ref().map(|n| n.to_string()));
        show("typename", self.typename.as_ref().map(|n| n.to_string()));
        show("location", self.location.as_ref().map(|n| n.to_string()));
        out
    }
}

/// Dump a diagnostic and everything decoded from it.
pub fn dump(diagnostic: &Diagnostic, decodings: &[DecodedDiagnostic]) -> String {
    let mut out = format!("code {}\n{}\n", diagnostic.code, diagnostic.quoted());
    for (index, decoded) in decodings.iter().enumerate() {
        let _ = writeln!(out, "decoding #{}", index + 1);
        out.push_str(&decoded.describe());
    }
    out
}

/// Applies a [`PatternRegistry`] to diagnostics.
pub struct DiagnosticDecoder {
    registry: PatternRegistry,
    timer: Arc<dyn PatternTimer + Send + Sync>,
}

impl DiagnosticDecoder {
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            registry,
            timer: Arc::new(NoopTimer),
        }
    }

    /// Decoder over the built-in javac patterns.
    pub fn javac() -> Result<Self> {
        Ok(Self::new(PatternRegistry::javac()?))
    }

    pub fn with_timer(mut self, timer: Arc<dyn PatternTimer + Send + Sync>) -> Self {
        self.timer = timer;
        self
    }

    /// At most one decoding per category; first matching pattern wins.
    ///
    /// Each pattern is tried against the rendered form, then the bare message.
    pub fn decode(&self, diagnostic: &Diagnostic) -> Vec<DecodedDiagnostic> {
        let Some(categories) = self.registry.categories(&diagnostic.code) else {
            return Vec::new();
        };
        let texts = [diagnostic.rendered.as_str(), diagnostic.message.as_str()];

        let mut decodings = Vec::new();
        for (category, patterns) in categories {
            if let Some(decoded) = self.decode_category(diagnostic, &texts, *category, patterns) {
                decodings.push(decoded);
            }
        }
        decodings
    }

    fn decode_category(
        &self,
        diagnostic: &Diagnostic,
        texts: &[&str],
        category: ErrorCategory,
        patterns: &[NamedPattern],
    ) -> Option<DecodedDiagnostic> {
        for pattern in patterns {
            for text in texts {
                let started = Instant::now();
                let captures = pattern.regex.captures(text);
                self.timer.record(category, &pattern.name, started.elapsed());

                if let Some(decoded) = captures
                    .and_then(|caps| extract(diagnostic, category, &pattern.name, &caps))
                {
                    tracing::debug!(
                        "{}:{:?} decoded as {} / {}",
                        diagnostic
                            .source
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        diagnostic.line,
                        category,
                        pattern.name
                    );
                    return Some(decoded);
                }
            }
        }
        None
    }
}

fn extract(
    diagnostic: &Diagnostic,
    category: ErrorCategory,
    pattern: &str,
    caps: &Captures<'_>,
) -> Option<DecodedDiagnostic> {
    let group = |name: &str| caps.name(name).map(|m| m.as_str());

    let package = group("package").map(QualifiedName::parse);
    let mut symbol = group("symbol").map(QualifiedName::parse);
    let location = group("location").map(QualifiedName::parse);
    let location_kind = group("location_kind").and_then(Keyword::from_text);
    let mut typename = None;

    if let Some(imported) = group("imported") {
        // The imported name must continue the captured package by one segment.
        let package = package.as_ref()?;
        let rest = imported.strip_prefix(package.as_str())?;
        let rest = rest.strip_prefix(SEPARATOR)?;
        let segment = rest.split(SEPARATOR).next().filter(|s| !s.is_empty())?;
        let simple = QualifiedName::parse(segment);
        typename = Some(package.qualify(&simple));
        symbol = Some(simple);
    } else if location_kind == Some(Keyword::Package) {
        if let (Some(location), Some(symbol)) = (&location, &symbol) {
            typename = Some(location.qualify(symbol));
        }
    }

    Some(DecodedDiagnostic {
        diagnostic: diagnostic.clone(),
        category,
        pattern: pattern.to_string(),
        matched: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
        keyword: group("keyword").and_then(Keyword::from_text),
        package,
        symbol,
        typename,
        location,
        location_kind,
    })
}
