//! External markup-to-HTML conversion.
//!
//! The [`Converter`] trait is the only seam between the site pipeline and the
//! tool that actually translates lecture markup into HTML: source text in,
//! HTML fragment out, or an error. The production implementation is
//! [`PandocConverter`], which shells out once per document.
//!
//! ## Working Files
//!
//! Pandoc reads and writes files, so each conversion writes
//! `_<name>.<ext>` into the work directory, asks the converter for
//! `_<name>.html`, and reads it back. Both files are removed on every exit
//! path, failures included.
//!
//! Working-file names derive from the job name alone, so two builds sharing a
//! work directory at the same time can clobber each other.

use crate::config::ConverterConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to run converter `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Converter `{program}` failed on {input} ({status}){}", format_stderr(.stderr))]
    Failed {
        program: String,
        input: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

/// One document to convert.
#[derive(Debug, Clone, Copy)]
pub struct ConversionJob<'a> {
    /// Unique name within a build, used for working-file names.
    pub name: &'a str,
    /// Preprocessed source text.
    pub source: &'a str,
    /// Source extension (without dot); converters may infer the input format from it.
    pub extension: &'a str,
}

/// Markup-to-HTML converter.
pub trait Converter {
    /// Convert one document, returning the HTML body fragment.
    fn convert(&self, job: &ConversionJob<'_>) -> Result<String, ConvertError>;
}

/// Converter backed by an external program with a pandoc-style command line:
/// `<program> <input> <args...> -o <output>`.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
}

impl PandocConverter {
    pub fn new(config: &ConverterConfig, work_dir: &Path) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            work_dir: work_dir.to_path_buf(),
        }
    }

    fn command_line(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut line = vec![input.display().to_string()];
        line.extend(self.args.iter().cloned());
        line.push("-o".to_string());
        line.push(output.display().to_string());
        line
    }
}

impl Converter for PandocConverter {
    fn convert(&self, job: &ConversionJob<'_>) -> Result<String, ConvertError> {
        fs::create_dir_all(&self.work_dir)?;
        let files = WorkingFiles {
            input: self.work_dir.join(format!("_{}.{}", job.name, job.extension)),
            output: self.work_dir.join(format!("_{}.html", job.name)),
        };
        fs::write(&files.input, job.source)?;

        let args = self.command_line(&files.input, &files.output);
        info!("{} {}", self.program, args.join(" "));

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                input: files.input.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        let bytes = fs::read(&files.output)?;
        debug!(bytes = bytes.len(), "converted {}", job.name);
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Working files of one conversion, removed when dropped.
struct WorkingFiles {
    input: PathBuf,
    output: PathBuf,
}

impl Drop for WorkingFiles {
    fn drop(&mut self) {
        for path in [&self.input, &self.output] {
            if path.exists()
                && let Err(e) = fs::remove_file(path)
            {
                debug!("could not remove working file {}: {e}", path.display());
            }
        }
    }
}
