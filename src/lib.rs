//! # Lecture Site
//!
//! Builds a static lecture-notes website from a tree of per-lecture source
//! documents. Every `Lecture*` directory becomes one HTML page; an in-class
//! exercise and its solutions, when present, become companion pages listed in
//! a JSON manifest.
//!
//! # Pipeline
//!
//! ```text
//! source/raw/                         output root
//! ├── config.toml          (opt)      ├── assets/style.css
//! ├── img/                  ──copy──▶ ├── lectures/img/
//! ├── Lecture1/l1_template.tex  ──▶   ├── lectures/Lecture1.html
//! └── Lecture3/                       ├── lectures/Lecture3.html
//!     ├── main.tex              ──▶   ├── lectures/Lecture3_exercise.html
//!     ├── in-class-exercise.tex ──▶   ├── lectures/resources.json
//!     └── notes.tex  (ignored)        └── index.html       (opt)
//! ```
//!
//! 1. **Scan** the source root for lecture directories and candidate documents.
//! 2. **Classify** each directory's candidates: score them with a fixed rule
//!    table, pick the primary document, and match companions by name.
//! 3. **Render** each selected document through an external converter
//!    (pandoc by default) and wrap the fragment in the page shell.
//! 4. **Assemble** the stylesheet, images, manifest and optional index.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds lecture directories and their candidate documents |
//! | [`naming`] | Parses `Lecture<N>` directory names |
//! | [`classify`] | Scoring rule table, primary selection, companion matching |
//! | [`title`] | Extracts a page title from document text |
//! | [`convert`] | The [`convert::Converter`] trait and the pandoc-backed implementation |
//! | [`generate`] | Page shell and index page rendering with Maud |
//! | [`assemble`] | Runs a full build and writes the output tree |
//! | [`config`] | `config.toml` loading, validation, and the stock config |
//! | [`types`] | Rendered pages and the resource manifest |
//! | [`output`] | CLI output formatting for build and check |
//!
//! # Design Decisions
//!
//! ## Explicit Rule Table
//!
//! Primary selection is a sum of independent rules, each with a name and a
//! score delta, kept in one ordered table ([`classify::SCORE_RULES`]). The
//! `check` command prints the matched rule names for every candidate, so a
//! surprising choice can be traced to the rule that caused it.
//!
//! ## Scan Before Write
//!
//! The whole source tree is scanned and classified before the first output
//! file is written. A missing source root or bad config leaves the output
//! root untouched.
//!
//! ## Converter Behind a Trait
//!
//! Rendering depends only on [`convert::Converter`]. Builds use
//! [`convert::PandocConverter`]; tests use a recording mock, so the whole
//! pipeline is testable without pandoc installed.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod convert;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod title;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
