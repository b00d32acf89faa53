//! Shared types produced by the build.
//!
//! [`ResourceManifest`] is serialized to `lectures/resources.json`; the other
//! types only live for the duration of one build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One generated HTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub source: PathBuf,
    pub title: String,
    pub output_path: PathBuf,
    /// Path relative to the output root, as used in links and the manifest.
    pub link_path: String,
}

/// Companion pages of one lecture. Absent keys mean no such companion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// Lecture key → companion link paths.
///
/// Keys sort lexicographically, which is also the lecture scan order, so the
/// serialized form is stable across builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceManifest(pub BTreeMap<String, LectureResources>);

impl ResourceManifest {
    pub fn insert(&mut self, key: &str, resources: LectureResources) {
        self.0.insert(key.to_string(), resources);
    }

    pub fn get(&self, key: &str) -> Option<&LectureResources> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Index page line for a primary lecture page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub title: String,
    /// Output filename inside `lectures/`.
    pub file_name: String,
}
