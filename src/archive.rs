//! Archive content inspection.

use std::path::Path;
use std::time::Duration;

use crate::name::QualifiedName;
use crate::process::run_tool;

/// Answers whether an archive defines a qualified name.
///
/// Implementations must treat every failure as "not defined".
pub trait ArchiveInspector: Sync {
    fn defines(&self, archive: &Path, name: &QualifiedName) -> bool;
}

impl<F> ArchiveInspector for F
where
    F: Fn(&Path, &QualifiedName) -> bool + Sync,
{
    fn defines(&self, archive: &Path, name: &QualifiedName) -> bool {
        self(archive, name)
    }
}

/// Asks `javap -cp <archive> <name>`; exit status 0 means defined.
#[derive(Debug, Clone)]
pub struct JavapInspector {
    program: String,
    timeout: Duration,
}

impl JavapInspector {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl ArchiveInspector for JavapInspector {
    fn defines(&self, archive: &Path, name: &QualifiedName) -> bool {
        let args = vec![
            "-cp".to_string(),
            archive.to_string_lossy().to_string(),
            name.to_string(),
        ];
        match run_tool(&self.program, &args, None, self.timeout) {
            Ok(output) => {
                tracing::debug!(
                    "{} {} in {}: {}",
                    self.program,
                    name,
                    archive.display(),
                    output.success
                );
                output.success
            }
            Err(e) => {
                tracing::warn!("inspecting {} for {}: {}", archive.display(), name, e);
                false
            }
        }
    }
}
