//! Site assembly.
//!
//! Runs the whole build: scan the source root, classify every lecture
//! directory, render the selected documents, and write the stylesheet, image
//! tree, resource manifest and (optionally) the index page.
//!
//! ## Output Structure
//!
//! ```text
//! <out>/
//! ├── index.html                          # Only with --write-index
//! ├── assets/
//! │   └── style.css
//! └── lectures/
//!     ├── img/                            # Copied from <src>/<image_dir>, merged
//!     ├── resources.json                  # Lecture key → companion links
//!     ├── Lecture1.html
//!     ├── Lecture3.html
//!     ├── Lecture3_exercise.html
//!     └── Lecture3_exercise_solutions.html
//! ```
//!
//! Every build is a full rebuild: pages are rewritten from scratch and the
//! manifest is replaced. Lectures are processed one at a time in scan order,
//! and a converter failure aborts the build with whatever was already written
//! left in place.

use crate::classify::{self, CompanionRole, DocumentSelection, ScoredCandidate};
use crate::config::{self, ConfigError, SiteConfig};
use crate::convert::{Converter, PandocConverter};
use crate::generate::{self, GenerateError, PageRequest};
use crate::scan::{self, DocumentCandidate, LectureUnit, ScanError};
use crate::types::{IndexEntry, LectureResources, RenderedPage, ResourceManifest};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const LECTURES_DIR: &str = "lectures";
pub const ASSETS_DIR: &str = "assets";
/// Image directory inside `lectures/`, whatever the source directory is called.
pub const IMAGES_DIR: &str = "img";
pub const STYLESHEET_FILENAME: &str = "style.css";
pub const MANIFEST_FILENAME: &str = "resources.json";
pub const INDEX_FILENAME: &str = "index.html";

const EXERCISE_SUFFIX: &str = "_exercise";
const SOLUTION_SUFFIX: &str = "_exercise_solutions";
const EXERCISE_TITLE: &str = "In-class Exercise";
const SOLUTION_TITLE: &str = "In-class Exercise Solutions";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to generate page: {0}")]
    Generate(#[from] GenerateError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk image directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Lecture {lecture} would overwrite {path}, which another lecture also writes")]
    OutputCollision { path: PathBuf, lecture: String },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Classification of one lecture directory, before anything is rendered.
#[derive(Debug, Clone)]
pub struct LecturePlan {
    pub unit: LectureUnit,
    pub ranking: Vec<ScoredCandidate>,
    /// `None` when the directory has no candidate documents.
    pub selection: Option<DocumentSelection>,
}

/// Rank and classify every scanned lecture directory.
pub fn plan(units: Vec<LectureUnit>) -> Vec<LecturePlan> {
    units
        .into_iter()
        .map(|unit| {
            let ranking = classify::rank(&unit.candidates, unit.number.as_deref());
            let selection = classify::select_ranked(&ranking);
            LecturePlan {
                unit,
                ranking,
                selection,
            }
        })
        .collect()
}

/// Load config, scan, and classify without writing anything.
pub fn check(source_root: &Path) -> Result<(SiteConfig, Vec<LecturePlan>), BuildError> {
    let config = config::load_config(source_root)?;
    let plans = plan(scan::scan(source_root, &config)?);
    check_output_names(&plans, Path::new(LECTURES_DIR))?;
    Ok((config, plans))
}

/// Fail if two pages of the build would land on the same file.
///
/// Keys are free-form after the prefix, so `Lecture3_exercise/` produces the
/// same primary page name as `Lecture3/`'s exercise page. Names are compared
/// case-insensitively, as the output may live on a case-insensitive filesystem.
fn check_output_names(plans: &[LecturePlan], lectures_out: &Path) -> Result<(), BuildError> {
    let mut claimed = HashSet::new();
    for plan in plans {
        let Some(selection) = &plan.selection else {
            continue;
        };
        for file in page_files(&plan.unit.key, selection) {
            if !claimed.insert(file.to_lowercase()) {
                return Err(BuildError::OutputCollision {
                    path: lectures_out.join(file),
                    lecture: plan.unit.key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Every page file name a lecture writes.
fn page_files(key: &str, selection: &DocumentSelection) -> Vec<String> {
    let mut files = vec![page_file_name(key, "")];
    if selection.exercise.is_some() {
        files.push(page_file_name(key, EXERCISE_SUFFIX));
    }
    if selection.solution.is_some() {
        files.push(page_file_name(key, SOLUTION_SUFFIX));
    }
    files
}

/// Pages rendered for one lecture.
#[derive(Debug, Clone)]
pub struct LectureBuild {
    pub key: String,
    pub primary: RenderedPage,
    pub exercise: Option<RenderedPage>,
    pub solution: Option<RenderedPage>,
    /// Companion matches that lost the tie-break.
    pub ignored: Vec<(CompanionRole, DocumentCandidate)>,
}

impl LectureBuild {
    /// Manifest entry: companion link paths only.
    pub fn resources(&self) -> LectureResources {
        LectureResources {
            exercise: self.exercise.as_ref().map(|p| p.link_path.clone()),
            solution: self.solution.as_ref().map(|p| p.link_path.clone()),
        }
    }

    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            title: self.primary.title.clone(),
            file_name: page_file_name(&self.key, ""),
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub lectures: Vec<LectureBuild>,
    /// Keys of lecture directories without candidate documents.
    pub skipped: Vec<String>,
    /// Number of image files copied; `None` when there is no image directory.
    pub images_copied: Option<usize>,
    pub manifest: ResourceManifest,
    pub manifest_path: PathBuf,
    /// Path of the written index page, if one was requested.
    pub index_path: Option<PathBuf>,
}

/// Build the site with the converter named in the source root's config.
pub fn build(
    source_root: &Path,
    output_root: &Path,
    write_index: bool,
) -> Result<BuildReport, BuildError> {
    let config = config::load_config(source_root)?;
    let converter = PandocConverter::new(&config.converter, output_root);
    build_with_converter(&converter, source_root, output_root, &config, write_index)
}

/// Build the site using a specific converter (allows testing with a mock).
pub fn build_with_converter(
    converter: &impl Converter,
    source_root: &Path,
    output_root: &Path,
    config: &SiteConfig,
    write_index: bool,
) -> Result<BuildReport, BuildError> {
    let plans = plan(scan::scan(source_root, config)?);
    let lectures_out = output_root.join(LECTURES_DIR);
    check_output_names(&plans, &lectures_out)?;

    let assets_out = output_root.join(ASSETS_DIR);
    fs::create_dir_all(&lectures_out).map_err(io_error(&lectures_out))?;
    fs::create_dir_all(&assets_out).map_err(io_error(&assets_out))?;

    let css_path = assets_out.join(STYLESHEET_FILENAME);
    fs::write(&css_path, generate::CSS).map_err(io_error(&css_path))?;

    let images_src = source_root.join(&config.image_dir);
    let images_copied = if images_src.is_dir() {
        Some(copy_dir_merge(&images_src, &lectures_out.join(IMAGES_DIR))?)
    } else {
        debug!("no image directory at {}", images_src.display());
        None
    };

    let mut manifest = ResourceManifest::default();
    let mut index_entries = Vec::new();
    let mut lectures = Vec::new();
    let mut skipped = Vec::new();

    for plan in &plans {
        let unit = &plan.unit;
        for scored in &plan.ranking {
            debug!(
                lecture = %unit.key,
                score = scored.score,
                rules = ?scored.matched,
                "candidate {}",
                scored.candidate.file_name
            );
        }
        let Some(selection) = &plan.selection else {
            debug!(lecture = %unit.key, "no candidate documents, skipping");
            skipped.push(unit.key.clone());
            continue;
        };
        for (role, candidate) in &selection.ignored {
            warn!(
                lecture = %unit.key,
                "ignoring extra {} match {}",
                role_label(*role),
                candidate.file_name
            );
        }

        let lecture = build_lecture(converter, unit, selection, &lectures_out, config)?;
        manifest.insert(&lecture.key, lecture.resources());
        index_entries.push(lecture.index_entry());
        lectures.push(lecture);
    }

    let manifest_path = lectures_out.join(MANIFEST_FILENAME);
    fs::write(&manifest_path, manifest.to_json()?).map_err(io_error(&manifest_path))?;

    let index_path = if write_index {
        let path = output_root.join(INDEX_FILENAME);
        generate::write_index(&path, &config.title, &index_entries)?;
        Some(path)
    } else {
        None
    };

    Ok(BuildReport {
        lectures,
        skipped,
        images_copied,
        manifest,
        manifest_path,
        index_path,
    })
}

/// Render the primary page and any companion pages of one lecture.
fn build_lecture(
    converter: &impl Converter,
    unit: &LectureUnit,
    selection: &DocumentSelection,
    lectures_out: &Path,
    config: &SiteConfig,
) -> Result<LectureBuild, BuildError> {
    let primary_file = page_file_name(&unit.key, "");
    let primary = generate::render_page(
        converter,
        &PageRequest {
            source: &selection.primary.path,
            job_name: &unit.key,
            output_path: &lectures_out.join(&primary_file),
            link_path: &link_path(&primary_file),
            title: None,
            lecture_link: None,
        },
        &config.page,
    )?;

    let companion = |doc: &DocumentCandidate, suffix: &str, label: &str| {
        let file = page_file_name(&unit.key, suffix);
        generate::render_page(
            converter,
            &PageRequest {
                source: &doc.path,
                job_name: &format!("{}{}", unit.key, suffix),
                output_path: &lectures_out.join(&file),
                link_path: &link_path(&file),
                title: Some(format!("{} - {}", primary.title, label).as_str()),
                lecture_link: Some((primary.title.as_str(), primary_file.as_str())),
            },
            &config.page,
        )
    };

    let exercise = selection
        .exercise
        .as_ref()
        .map(|doc| companion(doc, EXERCISE_SUFFIX, EXERCISE_TITLE))
        .transpose()?;
    let solution = selection
        .solution
        .as_ref()
        .map(|doc| companion(doc, SOLUTION_SUFFIX, SOLUTION_TITLE))
        .transpose()?;

    Ok(LectureBuild {
        key: unit.key.clone(),
        primary,
        exercise,
        solution,
        ignored: selection.ignored.clone(),
    })
}

fn page_file_name(key: &str, suffix: &str) -> String {
    format!("{key}{suffix}.html")
}

fn link_path(file_name: &str) -> String {
    format!("{LECTURES_DIR}/{file_name}")
}

pub fn role_label(role: CompanionRole) -> &'static str {
    match role {
        CompanionRole::Exercise => "exercise",
        CompanionRole::Solution => "solution",
    }
}

/// Copy `src` into `dst`, creating missing directories and overwriting
/// existing files. Returns the number of files copied.
fn copy_dir_merge(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else if entry.path().is_file() {
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
            copied += 1;
        }
    }
    Ok(copied)
}
