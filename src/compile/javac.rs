//! Compilation through the `javac` command line tool.

use std::path::Path;
use std::time::Duration;

use super::{parse_javac_output, CompilationDriver, CompilationResult, CompileRequest};
use crate::error::{MinimizeError, Result};
use crate::process::run_tool;

/// Runs `javac` as a child process and parses its stderr
#[derive(Debug, Clone)]
pub struct JavacDriver {
    program: String,
    timeout: Duration,
}

impl JavacDriver {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Command line arguments for `request`, without the program name.
    pub fn arguments(request: &CompileRequest) -> Result<Vec<String>> {
        let mut args = vec![
            "-d".to_string(),
            display(&request.class_output),
            "-encoding".to_string(),
            "UTF-8".to_string(),
            "-Xmaxerrs".to_string(),
            "100000".to_string(),
        ];
        if !request.search_roots.is_empty() {
            args.push("-sourcepath".to_string());
            args.push(join(&request.search_roots)?);
        }
        if !request.archives.is_empty() {
            args.push("-classpath".to_string());
            args.push(join(&request.archives)?);
        }
        args.extend(request.options.iter().cloned());
        args.extend(request.files.iter().map(|f| display(f)));
        Ok(args)
    }
}

impl CompilationDriver for JavacDriver {
    fn compile(&self, request: &CompileRequest) -> Result<CompilationResult> {
        std::fs::create_dir_all(&request.class_output)
            .map_err(|e| MinimizeError::io(&request.class_output, e))?;

        let args = Self::arguments(request)?;
        tracing::info!(
            "compiling {} files with {} search roots and {} archives",
            request.files.len(),
            request.search_roots.len(),
            request.archives.len()
        );
        let output = run_tool(&self.program, &args, None, self.timeout)?;

        let diagnostics = parse_javac_output(&output.stderr);
        if !output.success && diagnostics.is_empty() {
            return Err(MinimizeError::ToolError {
                tool: self.program.clone(),
                message: format!(
                    "exit code {:?} without diagnostics: {}",
                    output.code,
                    output.stderr.trim()
                ),
            });
        }
        Ok(CompilationResult::from_diagnostics(output.success, diagnostics))
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn join(paths: &[std::path::PathBuf]) -> Result<String> {
    std::env::join_paths(paths)
        .map(|joined| joined.to_string_lossy().to_string())
        .map_err(|e| MinimizeError::ConfigError {
            message: format!("cannot join paths: {}", e),
        })
}
