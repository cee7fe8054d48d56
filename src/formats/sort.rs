//! External VCF sort step
//!
//! Runs a bcftools-compatible `sort` subcommand over a finished VCF.
//! Any launch failure or nonzero exit is fatal for the run.

use crate::core::{OncoVcfError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default sort program
pub const DEFAULT_SORT_PROGRAM: &str = "bcftools";

/// External sort invocation: `<program> sort -O v -o <target> [extra_args] <input>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSorter {
    pub program: PathBuf,
    pub extra_args: Vec<String>,
}

impl Default for ExternalSorter {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_PROGRAM)
    }
}

impl ExternalSorter {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Target path for the sorted copy: `<stem>.sorted.vcf` next to `input`
    pub fn sorted_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.with_file_name(format!("{}.sorted.vcf", stem))
    }

    /// Sort `input` into `target`
    pub fn sort(&self, input: &Path, target: &Path) -> Result<()> {
        let program = self.program.display().to_string();
        log::info!("Sorting {:?} -> {:?} with {}", input, target, program);

        let output = Command::new(&self.program)
            .arg("sort")
            .args(["-O", "v", "-o"])
            .arg(target)
            .args(&self.extra_args)
            .arg(input)
            .output()
            .map_err(|e| OncoVcfError::ExternalSort {
                program: program.clone(),
                message: format!("could not launch: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OncoVcfError::ExternalSort {
                program,
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}
