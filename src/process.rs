//! Bounded subprocess execution for javac, javap and mvn.
//!
//! Every call builds a small current-thread tokio runtime, spawns the child
//! with `kill_on_drop`, and waits at most the given timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use crate::error::{MinimizeError, Result};

/// Captured output of a finished tool run
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` and wait for it to finish.
///
/// Spawn failures become [`MinimizeError::ToolError`], an expired timeout
/// becomes [`MinimizeError::ToolTimeout`]. A non-zero exit is not an error.
pub fn run_tool(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<ToolOutput> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| MinimizeError::ToolError {
            tool: program.to_string(),
            message: format!("Failed to start runtime: {}", e),
        })?;

    runtime.block_on(async {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!("running {} {}", program, args.join(" "));
        let child = cmd.spawn().map_err(|e| MinimizeError::ToolError {
            tool: program.to_string(),
            message: format!("Failed to execute {}: {}", program, e),
        })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| MinimizeError::ToolTimeout {
                tool: program.to_string(),
                secs: timeout.as_secs(),
            })?
            .map_err(|e| MinimizeError::ToolError {
                tool: program.to_string(),
                message: e.to_string(),
            })?;

        Ok::<_, MinimizeError>(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    })
}

/// Resolve a tool name through `PATH`; explicit paths are returned as given.
pub fn locate_tool(name: &str) -> String {
    if Path::new(name).components().count() > 1 {
        return name.to_string();
    }
    which::which(name)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| name.to_string())
}
