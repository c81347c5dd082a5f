//! minimize-codebase: shrink a Java code base to what a seed set needs
//!
//! A run copies the files listed in `files.lst` (and the archives listed in
//! `dependencies.lst`) from the original tree into a destination folder,
//! compiles them, and turns the compiler's "cannot find symbol" and "package
//! does not exist" errors into candidate files and archives from the original
//! tree. Adding the candidates to the listings and running again converges on a
//! compilable subset.
//!
//! # Example
//!
//! ```ignore
//! use minimize_codebase::config::MinimizeConfig;
//! use minimize_codebase::minimizer::{Minimizer, MinimizerOptions};
//!
//! let outcome = Minimizer::new(MinimizerOptions {
//!     original: "/src/big-project".into(),
//!     destination: "/tmp/minimized".into(),
//!     config: MinimizeConfig::default(),
//!     harvest: false,
//!     profile_patterns: false,
//! })
//! .run()?;
//! print!("{}", minimize_codebase::report::render_text(&outcome));
//! ```

pub mod archive;
pub mod cli;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod listing;
pub mod minimizer;
pub mod name;
pub mod process;
pub mod report;
pub mod resolver;
pub mod stage;
pub mod tree;

// Re-export commonly used types
pub use archive::{ArchiveInspector, JavapInspector};
pub use cli::{Cli, OutputFormat};
pub use compile::{CompilationDriver, CompilationResult, CompileRequest, JavacDriver};
pub use config::MinimizeConfig;
pub use diagnostics::{Diagnostic, DiagnosticDecoder, ErrorCode, Severity};
pub use error::{MinimizeError, Result};
pub use minimizer::{Minimizer, MinimizerOptions, RunOutcome};
pub use name::QualifiedName;
pub use resolver::{Candidate, CandidateMap, CandidateResolver, Resolution, SearchContext};
