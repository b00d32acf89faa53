//! HTML page generation.
//!
//! Wraps converter output in the fixed page shell and renders the optional
//! index page.
//!
//! ## Generated Pages
//!
//! - **Lecture pages** (`lectures/<key>.html`): primary lecture notes
//! - **Companion pages** (`lectures/<key>_exercise.html`,
//!   `lectures/<key>_exercise_solutions.html`): in-class exercise and solutions
//! - **Index page** (`index.html`): list of every primary lecture page
//!
//! ## Page Shell
//!
//! Every lecture page links `../assets/style.css`, loads the math rendering
//! script with `defer`, carries a navigation bar pointing back to
//! `../index.html` (companion pages also link their lecture), and places the
//! converted document inside `<main>`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Titles are escaped; converter output is inserted verbatim.

use crate::config::PageConfig;
use crate::convert::{ConversionJob, ConvertError, Converter};
use crate::title::extract_title;
use crate::types::{IndexEntry, RenderedPage};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl GenerateError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Stylesheet written to `assets/style.css`.
pub const CSS: &str = include_str!("../static/style.css");

/// `{\bf text}`, the legacy inline bold form.
static LEGACY_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\\bf\s+([^}]+)\}").unwrap());

/// Rewrite legacy `{\bf text}` to `\textbf{text}`.
pub fn preprocess(source: &str) -> Cow<'_, str> {
    LEGACY_BOLD_RE.replace_all(source, r"\textbf{${1}}")
}

/// Everything needed to render one page besides the converter.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub source: &'a Path,
    /// Working-file name handed to the converter.
    pub job_name: &'a str,
    pub output_path: &'a Path,
    /// Link path relative to the output root, e.g. `lectures/Lecture3.html`.
    pub link_path: &'a str,
    /// Explicit title; `None` extracts it from the document text.
    pub title: Option<&'a str>,
    /// Link back to the primary lecture page, for companion pages.
    pub lecture_link: Option<(&'a str, &'a str)>,
}

/// Render one source document to a complete HTML page on disk.
pub fn render_page(
    converter: &impl Converter,
    request: &PageRequest<'_>,
    page: &PageConfig,
) -> Result<RenderedPage, GenerateError> {
    let bytes = fs::read(request.source).map_err(GenerateError::io(request.source))?;
    let text = String::from_utf8_lossy(&bytes);

    let title = match request.title {
        Some(t) => t.to_string(),
        None => {
            let fallback = request
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            extract_title(&text, &fallback)
        }
    };

    let extension = request
        .source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let body = converter.convert(&ConversionJob {
        name: request.job_name,
        source: &preprocess(&text),
        extension: &extension,
    })?;

    let html = page_shell(&title, &body, request.lecture_link, page);
    fs::write(request.output_path, html.into_string())
        .map_err(GenerateError::io(request.output_path))?;

    Ok(RenderedPage {
        source: request.source.to_path_buf(),
        title,
        output_path: request.output_path.to_path_buf(),
        link_path: request.link_path.to_string(),
    })
}

/// Write the index page listing every primary lecture page.
pub fn write_index(
    path: &Path,
    site_title: &str,
    entries: &[IndexEntry],
) -> Result<(), GenerateError> {
    fs::write(path, index_page(site_title, entries).into_string()).map_err(GenerateError::io(path))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders a lecture page around a converted body fragment.
///
/// `lecture_link` is `(title, href)` of the primary page, shown in the nav of
/// companion pages.
pub fn page_shell(
    title: &str,
    body: &str,
    lecture_link: Option<(&str, &str)>,
    page: &PageConfig,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="../assets/style.css";
                script defer src=(page.math_script) {}
            }
            body {
                nav {
                    a href="../index.html" { (page.home_label) }
                    @if let Some((lecture_title, href)) = lecture_link {
                        a href=(href) { (lecture_title) }
                    }
                }
                main {
                    (PreEscaped(body))
                }
            }
        }
    }
}

/// Renders the top-level index page.
pub fn index_page(site_title: &str, entries: &[IndexEntry]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (site_title) }
                link rel="stylesheet" href="assets/style.css";
            }
            body {
                main {
                    h1 { (site_title) }
                    ul.lecture-list {
                        @for entry in entries {
                            li {
                                a href={ "lectures/" (entry.file_name) } { (entry.title) }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
