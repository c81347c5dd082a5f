//! Registry of categorized diagnostic text patterns.
//!
//! Patterns are grouped by error code, then by category, and tried in
//! registration order. Capture groups with the names below feed the fields of
//! a decoded diagnostic:
//!
//! - `keyword`: symbol kind word (`class`, `variable`)
//! - `symbol`: simple missing symbol
//! - `package`: package named by the message
//! - `imported`: full imported name; must start with `package` + `.`
//! - `location`: class or package the symbol was looked up in
//! - `location_kind`: `class` or `package`

use indexmap::IndexMap;
use regex::Regex;

use super::{ErrorCategory, ErrorCode};
use crate::error::{MinimizeError, Result};

/// One Java identifier
pub const IDENTIFIER_REGEX: &str =
    r"[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Sc}]*";

/// One or more identifiers joined by `.`
pub const PACKAGE_REGEX: &str = r"[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Sc}]*(?:\.[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Sc}]*)*";

pub const PATTERN_IMPORT: &str = "import";
pub const PATTERN_NO_CONTEXT: &str = "no context";
pub const PATTERN_CLASS_IN_CLASS: &str = "class in class";
pub const PATTERN_VARIABLE_IN_CLASS: &str = "variable in class";
pub const PATTERN_CLASS_IN_PACKAGE: &str = "class in package";

/// A compiled pattern and the name it is reported under
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub name: String,
    pub regex: Regex,
}

/// error code -> category -> ordered named patterns
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    codes: IndexMap<ErrorCode, IndexMap<ErrorCategory, Vec<NamedPattern>>>,
}

impl PatternRegistry {
    /// Registry without any pattern.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the patterns matching javac's English messages.
    pub fn javac() -> Result<Self> {
        Self::empty()
            .register(
                ErrorCode::DoesntExist,
                ErrorCategory::PackageDoesNotExist,
                PATTERN_IMPORT,
                &package_does_not_exist(Some(r"\bimport\s+")),
            )?
            .register(
                ErrorCode::DoesntExist,
                ErrorCategory::PackageDoesNotExist,
                PATTERN_NO_CONTEXT,
                &package_does_not_exist(None),
            )?
            .register(
                ErrorCode::CantResolveLocation,
                ErrorCategory::CannotFindSymbol,
                PATTERN_CLASS_IN_CLASS,
                &cannot_find_symbol("class", "class"),
            )?
            .register(
                ErrorCode::CantResolveLocation,
                ErrorCategory::CannotFindSymbol,
                PATTERN_VARIABLE_IN_CLASS,
                &cannot_find_symbol("variable", "class"),
            )?
            .register(
                ErrorCode::CantResolveLocation,
                ErrorCategory::CannotFindSymbol,
                PATTERN_CLASS_IN_PACKAGE,
                &cannot_find_symbol("class", "package"),
            )
    }

    /// Append a pattern to `code`/`category`; later registrations are tried later.
    pub fn register(
        mut self,
        code: ErrorCode,
        category: ErrorCategory,
        name: &str,
        pattern: &str,
    ) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| MinimizeError::ConfigError {
            message: format!("invalid pattern \"{}\": {}", name, e),
        })?;
        self.codes
            .entry(code)
            .or_default()
            .entry(category)
            .or_default()
            .push(NamedPattern {
                name: name.to_string(),
                regex,
            });
        Ok(self)
    }

    pub fn categories(
        &self,
        code: &ErrorCode,
    ) -> Option<&IndexMap<ErrorCategory, Vec<NamedPattern>>> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes
            .values()
            .flat_map(|categories| categories.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `package <P> does not exist`, optionally followed on a later line by a
/// context clause naming `<P>.<Symbol>`.
fn package_does_not_exist(context_prefix: Option<&str>) -> String {
    let mut regex = format!(
        r"\bpackage\s+(?P<package>{})\s+does\s+not\s+exist\b",
        PACKAGE_REGEX
    );
    if let Some(prefix) = context_prefix {
        regex.push_str(&format!(
            r"\s.*?{}(?P<imported>{})",
            prefix, PACKAGE_REGEX
        ));
    }
    regex
}

fn cannot_find_symbol(symbol_kind: &str, location_kind: &str) -> String {
    format!(
        r"\bcannot find symbol\s+symbol:\s+(?P<keyword>{})\s+(?P<symbol>{})\s+location:\s+(?P<location_kind>{})\s+(?P<location>{})",
        symbol_kind, IDENTIFIER_REGEX, location_kind, PACKAGE_REGEX
    )
}
