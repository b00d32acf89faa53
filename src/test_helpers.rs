//! Shared test utilities.
//!
//! Tree builders for lecture source directories, lookups into scan results
//! and build reports, and a tiny copy-through converter script for tests that
//! exercise the real process-backed converter.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = TempDir::new().unwrap();
//! write_lecture(src.path(), "Lecture3", &["main.tex", "in-class-exercise.tex"]);
//!
//! let report = build_with_converter(&MockConverter::new(), src.path(), out.path(), &config, false)?;
//! let lecture = find_lecture(&report, "Lecture3");
//! assert_eq!(source_name(&lecture.primary), "main.tex");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::assemble::{BuildReport, LectureBuild};
use crate::scan::LectureUnit;
use crate::types::RenderedPage;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `root/<name>/` with one small document per file name.
///
/// Each file's content mentions its own name so rendered pages differ.
pub fn write_lecture(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), format!("% {file}\nBody of {file}.\n")).unwrap();
    }
    dir
}

/// Create `root/<name>/<file>` with the given content.
pub fn write_lecture_doc(root: &Path, name: &str, file: &str, content: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
    dir
}

/// Write an executable script that copies its input (first argument) to the
/// path following `-o`, mimicking a pandoc command line.
#[cfg(unix)]
pub fn write_copy_converter(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-pandoc.sh");
    let script = r#"#!/bin/sh
input="$1"
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
cp "$input" "$out"
"#;
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a lecture unit by key. Panics if not found.
pub fn find_unit<'a>(units: &'a [LectureUnit], key: &str) -> &'a LectureUnit {
    units.iter().find(|u| u.key == key).unwrap_or_else(|| {
        panic!("lecture '{key}' not found. Available: {:?}", lecture_keys(units))
    })
}

/// Find a built lecture by key. Panics if not found.
pub fn find_lecture<'a>(report: &'a BuildReport, key: &str) -> &'a LectureBuild {
    report
        .lectures
        .iter()
        .find(|l| l.key == key)
        .unwrap_or_else(|| {
            let keys: Vec<&str> = report.lectures.iter().map(|l| l.key.as_str()).collect();
            panic!("lecture '{key}' not built. Built: {keys:?}")
        })
}

// =========================================================================
// Extractors
// =========================================================================

pub fn lecture_keys(units: &[LectureUnit]) -> Vec<&str> {
    units.iter().map(|u| u.key.as_str()).collect()
}

pub fn candidate_names(unit: &LectureUnit) -> Vec<&str> {
    unit.candidates.iter().map(|c| c.file_name.as_str()).collect()
}

/// Source file name of a rendered page.
pub fn source_name(page: &RenderedPage) -> String {
    page.source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse `lectures/resources.json` under an output root.
pub fn read_manifest(output_root: &Path) -> serde_json::Value {
    let content = fs::read_to_string(output_root.join("lectures/resources.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Every file under `root` with its bytes, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}
