//! Common test utilities and fixtures for minimize-codebase integration tests
//!
//! This module provides:
//! - `TestTree` builder for an original tree plus a destination folder
//! - `ScriptedCompiler`, a compilation driver replaying canned javac output
//! - helpers rendering javac diagnostics in the compiler's own text format

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod test_tree;

pub use javac_text::*;
pub use scripted_compiler::ScriptedCompiler;
pub use test_tree::TestTree;
