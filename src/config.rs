//! Site configuration module.
//!
//! Handles loading, validating, and merging the optional `config.toml` that
//! lives in the source root. User values are layered on top of the stock
//! defaults, so a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! source/raw/
//! ├── config.toml              # Site config (optional)
//! ├── img/                     # Shared images → lectures/img/
//! ├── Lecture1/
//! │   └── l1_template.tex
//! └── Lecture2/
//!     ├── main.tex
//!     └── in-class-exercise.tex
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Lecture Notes"           # Index page title
//! lecture_prefix = "Lecture"        # Case-sensitive lecture directory prefix
//! document_extensions = ["tex"]     # Candidate source file extensions
//! image_dir = "img"                 # Image directory inside the source root
//!
//! [converter]
//! program = "pandoc"
//! args = ["--mathjax", "--standalone", "--number-sections",
//!         "--shift-heading-level-by=1", "--number-offset=1"]
//!
//! [page]
//! math_script = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"
//! home_label = "Home"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults matching the conventional lecture-notes layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title of the generated index page.
    pub title: String,
    /// Directory-name prefix that marks a lecture directory. Case-sensitive.
    pub lecture_prefix: String,
    /// File extensions (without dot) of candidate source documents.
    pub document_extensions: Vec<String>,
    /// Image directory inside the source root, copied to `lectures/img`.
    pub image_dir: String,
    /// External markup-to-HTML converter invocation.
    pub converter: ConverterConfig,
    /// Page shell settings.
    pub page: PageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Lecture Notes".to_string(),
            lecture_prefix: "Lecture".to_string(),
            document_extensions: vec!["tex".to_string()],
            image_dir: "img".to_string(),
            converter: ConverterConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lecture_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "lecture_prefix must not be empty".into(),
            ));
        }
        if self.document_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "document_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .document_extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(ConfigError::Validation(format!(
                "document_extensions entries must be bare extensions, got {ext:?}"
            )));
        }
        if self.image_dir.is_empty() {
            return Err(ConfigError::Validation("image_dir must not be empty".into()));
        }
        if self.converter.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "converter.program must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether `ext` is one of the configured document extensions.
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.document_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// External converter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Program name or path, resolved through `PATH`.
    pub program: String,
    /// Flags passed after the input file and before `-o <output>`.
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            args: [
                "--mathjax",
                "--standalone",
                "--number-sections",
                "--shift-heading-level-by=1",
                "--number-offset=1",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Page shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Client-side math rendering script, loaded with `defer`.
    pub math_script: String,
    /// Label of the navigation link back to the index page.
    pub home_label: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            math_script: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"
                .to_string(),
            home_label: "Home".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config for a source root, falling back to stock defaults.
pub fn load_config(source_root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(source_root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lecture-site configuration
# ==========================
# Place this file in the source root. All settings are optional; the values
# below are the defaults. Unknown keys cause an error.

# Title shown on the generated index page.
title = "Lecture Notes"

# Directory-name prefix marking a lecture directory (case-sensitive).
# Lecture3/, Lecture10-optimization/ ... match; lecture3/ does not.
lecture_prefix = "Lecture"

# Extensions of candidate source documents inside each lecture directory.
document_extensions = ["tex"]

# Shared image directory in the source root, copied to lectures/img/.
image_dir = "img"

# ---------------------------------------------------------------------------
# External converter
# ---------------------------------------------------------------------------
[converter]
# Invoked as: <program> <input> <args...> -o <output>
program = "pandoc"
args = [
    "--mathjax",
    "--standalone",
    "--number-sections",
    "--shift-heading-level-by=1",
    "--number-offset=1",
]

# ---------------------------------------------------------------------------
# Page shell
# ---------------------------------------------------------------------------
[page]
# Client-side math rendering script.
math_script = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"

# Label of the navigation link back to the index page.
home_label = "Home"
"##
}
