//! Source tree scanning.
//!
//! Discovers lecture directories under the source root and the candidate
//! documents inside each one. Scanning only reads directory listings; document
//! contents are read later by the renderer.
//!
//! ## Directory Structure
//!
//! ```text
//! source/raw/                      # Source root
//! ├── config.toml                  # Site configuration (optional)
//! ├── img/                         # Shared images (optional)
//! ├── Lecture1/
//! │   └── l1_template.tex          # Single candidate → primary
//! ├── Lecture3/
//! │   ├── main.tex                 # Primary
//! │   ├── in-class-exercise.tex    # Exercise companion
//! │   ├── in-class-exercise-solution.tex
//! │   └── figures/                 # Subdirectories are ignored
//! ├── Lecture4/                    # Empty → skipped by the build
//! └── syllabus/                    # No lecture prefix → ignored
//! ```
//!
//! ## Ordering
//!
//! Lecture directories are returned in lexicographic order of their names;
//! candidates within a directory are ordered by file name. Both orders are
//! deterministic so repeated builds produce identical output.

use crate::config::SiteConfig;
use crate::naming::parse_lecture_name;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source root not found: {0}")]
    SourceNotFound(PathBuf),
}

/// One source file inside a lecture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCandidate {
    pub path: PathBuf,
    /// File name including extension, used for the ranking tie-break.
    pub file_name: String,
    /// Lowercase file stem, used for scoring and companion matching.
    pub stem: String,
}

impl DocumentCandidate {
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let stem = path.file_stem()?.to_string_lossy().to_lowercase();
        Some(Self {
            path: path.to_path_buf(),
            file_name,
            stem,
        })
    }
}

/// One lecture directory and its candidate documents.
#[derive(Debug, Clone)]
pub struct LectureUnit {
    /// Directory name; the lecture key in output filenames and the manifest.
    pub key: String,
    pub number: Option<String>,
    pub candidates: Vec<DocumentCandidate>,
}

impl LectureUnit {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Enumerate every lecture directory under `root`, in lexicographic order.
///
/// Directories with no candidate documents are included; deciding to skip
/// them is the caller's business.
pub fn scan(root: &Path, config: &SiteConfig) -> Result<Vec<LectureUnit>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::SourceNotFound(root.to_path_buf()));
    }

    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let name = p.file_name()?.to_string_lossy().into_owned();
            Some((name, p))
        })
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut units = Vec::new();
    for (name, dir) in dirs {
        let Some(parsed) = parse_lecture_name(&name, &config.lecture_prefix) else {
            continue;
        };
        let candidates = collect_candidates(&dir, config)?;
        units.push(LectureUnit {
            key: parsed.key,
            number: parsed.number,
            candidates,
        });
    }
    Ok(units)
}

/// Candidate documents directly inside `dir` (not recursive).
fn collect_candidates(dir: &Path, config: &SiteConfig) -> Result<Vec<DocumentCandidate>, ScanError> {
    let mut candidates: Vec<DocumentCandidate> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_document(p, config))
        .filter_map(|p| DocumentCandidate::from_path(&p))
        .collect();

    candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(candidates)
}

fn is_document(path: &Path, config: &SiteConfig) -> bool {
    if !path.is_file() {
        return false;
    }
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    if hidden {
        return false;
    }
    path.extension()
        .map(|e| config.is_document_extension(&e.to_string_lossy()))
        .unwrap_or(false)
}
