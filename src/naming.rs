//! Lecture directory naming convention.
//!
//! A lecture directory is any directory directly under the source root whose
//! name starts with the configured prefix (`Lecture` by default, matched
//! case-sensitively). The directory name doubles as the lecture key used for
//! output filenames and manifest entries.
//!
//! ## Lecture Numbers
//!
//! The lecture number is the first run of ASCII digits following the prefix,
//! kept verbatim so it can be matched against filename stems:
//! - `Lecture3` → `"3"`
//! - `Lecture07` → `"07"`
//! - `Lecture12-optimization` → `"12"`
//! - `Lecture-intro` → none

/// Result of parsing a lecture directory name like `Lecture12-optimization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureName {
    /// Full directory name, used as the lecture key.
    pub key: String,
    /// Lecture number digits, if the name carries any after the prefix.
    pub number: Option<String>,
}

/// Parse a directory name against the lecture prefix.
///
/// Returns `None` when the name does not start with `prefix`.
pub fn parse_lecture_name(name: &str, prefix: &str) -> Option<LectureName> {
    let rest = name.strip_prefix(prefix)?;
    Some(LectureName {
        key: name.to_string(),
        number: lecture_number(rest),
    })
}

fn lecture_number(rest: &str) -> Option<String> {
    let start = rest.find(|c: char| c.is_ascii_digit())?;
    let digits: String = rest[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits)
}
