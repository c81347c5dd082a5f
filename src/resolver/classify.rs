use indexmap::{IndexMap, IndexSet};

use crate::diagnostics::decoder::dump;
use crate::diagnostics::{DecodedDiagnostic, ErrorCategory, ErrorCode};
use crate::error::{MinimizeError, Result};
use crate::name::QualifiedName;

/// What one file is missing, in diagnostic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNeeds {
    pub missing_symbols: IndexSet<QualifiedName>,
    pub missing_imports: IndexSet<QualifiedName>,
    /// simple symbol -> imported type; first writer wins
    pub imports_by_symbol: IndexMap<QualifiedName, QualifiedName>,
}

impl FileNeeds {
    pub fn is_empty(&self) -> bool {
        self.missing_symbols.is_empty() && self.missing_imports.is_empty()
    }

    /// Fold one decoding into the needs of its file.
    pub fn classify(&mut self, decoded: &DecodedDiagnostic) -> Result<()> {
        let code = &decoded.diagnostic.code;
        match (code, decoded.category) {
            (ErrorCode::DoesntExist, ErrorCategory::PackageDoesNotExist) => {
                match (&decoded.package, &decoded.symbol, &decoded.typename) {
                    (Some(_), Some(symbol), Some(typename)) => {
                        self.record_import(symbol, typename);
                        Ok(())
                    }
                    // Member access through an unimported type of the same package
                    (Some(package), None, None) => {
                        self.missing_symbols.insert(package.clone());
                        Ok(())
                    }
                    _ => Err(unmatched(decoded)),
                }
            }
            (ErrorCode::CantResolveLocation, ErrorCategory::CannotFindSymbol) => {
                let Some(symbol) = &decoded.symbol else {
                    return Err(unmatched(decoded));
                };
                if let Some(typename) = &decoded.typename {
                    self.record_import(symbol, typename);
                } else if self.imports_by_symbol.contains_key(symbol) {
                    tracing::debug!("{} is explained by a missing import", symbol);
                } else {
                    self.missing_symbols.insert(symbol.clone());
                }
                Ok(())
            }
            _ => Err(unmatched(decoded)),
        }
    }

    fn record_import(&mut self, symbol: &QualifiedName, typename: &QualifiedName) {
        match self.imports_by_symbol.get(symbol) {
            Some(previous) if previous != typename => {
                tracing::warn!("import collision for {}: {} vs {}", symbol, previous, typename);
            }
            Some(_) => {}
            None => {
                self.imports_by_symbol
                    .insert(symbol.clone(), typename.clone());
            }
        }
        self.missing_imports.insert(typename.clone());
    }
}

fn unmatched(decoded: &DecodedDiagnostic) -> MinimizeError {
    MinimizeError::UnmatchedDecoding {
        dump: dump(&decoded.diagnostic, std::slice::from_ref(decoded)),
    }
}
