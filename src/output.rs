//! CLI output formatting.
//!
//! Output is information-first: each lecture leads with its positional index
//! and title, with source files and output paths as indented context lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Lectures
//! 001 Lecture 1: Introduction → lectures/Lecture1.html
//!     Source: l1_template.tex
//! 002 Lecture 3: Linear Models → lectures/Lecture3.html
//!     Source: main.tex
//!     Exercise: in-class-exercise.tex → lectures/Lecture3_exercise.html
//!     Solution: in-class-exercise-solution.tex → lectures/Lecture3_exercise_solutions.html
//!
//! Skipped
//!     Lecture4 (no documents)
//!
//! Images: 12 files → lectures/img/
//! Manifest: 3 entries → ./lectures/resources.json
//! Index → ./index.html
//! Generated 2 lectures, 2 companion pages
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Lecture3
//!     +60 main.tex [main]
//!     -100 in-class-exercise.tex [companion]
//!     Primary: main.tex
//!     Exercise: in-class-exercise.tex
//! ```
//!
//! Each report has a pure `format_*` function returning lines and a `print_*`
//! wrapper that writes them to stdout.

use crate::assemble::{BuildReport, IMAGES_DIR, LECTURES_DIR, LecturePlan, role_label};
use crate::types::RenderedPage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(page: &RenderedPage) -> String {
    page.source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| page.source.display().to_string())
}

/// `Exercise: in-class-exercise.tex → lectures/Lecture3_exercise.html`
fn companion_line(label: &str, page: &RenderedPage) -> String {
    format!("    {}: {} \u{2192} {}", label, file_name(page), page.link_path)
}

fn plural(n: usize, word: &str) -> String {
    match (n, word.strip_suffix('y')) {
        (1, _) => format!("{n} {word}"),
        (_, Some(stem)) => format!("{n} {stem}ies"),
        _ => format!("{n} {word}s"),
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the build report.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Lectures".to_string()];
    let mut companions = 0;

    for (i, lecture) in report.lectures.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            lecture.primary.title,
            lecture.primary.link_path
        ));
        lines.push(format!("    Source: {}", file_name(&lecture.primary)));
        if let Some(page) = &lecture.exercise {
            lines.push(companion_line("Exercise", page));
            companions += 1;
        }
        if let Some(page) = &lecture.solution {
            lines.push(companion_line("Solution", page));
            companions += 1;
        }
        for (role, candidate) in &lecture.ignored {
            lines.push(format!(
                "    Ignored {}: {}",
                role_label(*role),
                candidate.file_name
            ));
        }
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for key in &report.skipped {
            lines.push(format!("    {} (no documents)", key));
        }
    }

    lines.push(String::new());
    if let Some(n) = report.images_copied {
        lines.push(format!(
            "Images: {} \u{2192} {}/{}/",
            plural(n, "file"),
            LECTURES_DIR,
            IMAGES_DIR
        ));
    }
    lines.push(format!(
        "Manifest: {} \u{2192} {}",
        plural(report.manifest.len(), "entry"),
        report.manifest_path.display()
    ));
    if let Some(path) = &report.index_path {
        lines.push(format!("Index \u{2192} {}", path.display()));
    }
    lines.push(format!(
        "Generated {}, {}",
        plural(report.lectures.len(), "lecture"),
        plural(companions, "companion page")
    ));
    lines
}

/// Print the build report to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the classification report: every candidate's score, then the roles.
pub fn format_check_output(plans: &[LecturePlan]) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, plan) in plans.iter().enumerate() {
        let number = plan
            .unit
            .number
            .as_deref()
            .map(|n| format!(" (lecture {n})"))
            .unwrap_or_default();
        lines.push(format!("{} {}{}", format_index(i + 1), plan.unit.key, number));

        let Some(selection) = &plan.selection else {
            lines.push("    (no documents)".to_string());
            continue;
        };
        for scored in &plan.ranking {
            let rules = if scored.matched.is_empty() {
                String::new()
            } else {
                format!(" [{}]", scored.matched.join(", "))
            };
            lines.push(format!(
                "    {:+} {}{}",
                scored.score, scored.candidate.file_name, rules
            ));
        }
        lines.push(format!("    Primary: {}", selection.primary.file_name));
        if let Some(doc) = &selection.exercise {
            lines.push(format!("    Exercise: {}", doc.file_name));
        }
        if let Some(doc) = &selection.solution {
            lines.push(format!("    Solution: {}", doc.file_name));
        }
        for (role, candidate) in &selection.ignored {
            lines.push(format!(
                "    Ignored {}: {}",
                role_label(*role),
                candidate.file_name
            ));
        }
    }

    if plans.is_empty() {
        lines.push("No lecture directories found".to_string());
    }
    lines
}

/// Print the classification report to stdout.
pub fn print_check_output(plans: &[LecturePlan]) {
    for line in format_check_output(plans) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
