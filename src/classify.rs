//! Document classification for one lecture directory.
//!
//! Lecture directories hold an unpredictable mix of files: the actual notes,
//! templates, drafts, add-ons, in-class exercises and their solutions. This
//! module decides which file is the lecture's primary document and which files
//! (if any) are its exercise and solution companions.
//!
//! ## Primary Selection
//!
//! Each candidate's lowercase stem is scored by the ordered rule table
//! [`SCORE_RULES`]; the score is the sum of the deltas of every rule that
//! matches. Candidates are ranked by score descending, then by file name
//! ascending, and the first one is the primary:
//!
//! | Rule | Delta |
//! |------|-------|
//! | contains `in-class`, `exercise` or `solution` | −100 |
//! | contains `add-on` or `addon` | −60 |
//! | equals `main` | +60 |
//! | contains `lecture{N}` | +40 |
//! | contains `l{N}` as a whole word | +35 |
//! | contains `l{N}_` | +35 |
//! | contains `notes` | +20 |
//! | contains `template` | +10 |
//!
//! The lecture-number rules only apply when the directory name carries a
//! number, and they accumulate: `l7_notes` scores +35 (`l7_`) +20 (`notes`),
//! while `l7-notes` scores +35 (whole word `l7`) +20.
//!
//! ## Companions
//!
//! Companion matching normalizes stems by mapping runs of `-`, `_` and
//! whitespace to a single space, so `in-class-exercise` and
//! `In Class Exercise` both read as `in class exercise`:
//!
//! - **solution**: contains `in class exercise solution`, or contains both
//!   `solution` and `exercise`
//! - **exercise**: contains `in class exercise` and is not a solution
//!
//! The primary document never takes a companion role. When several files
//! match a role, the lexicographically first file name wins and the others
//! are reported in [`DocumentSelection::ignored`].

use crate::scan::DocumentCandidate;
use std::cmp::Reverse;

/// Inputs visible to a score rule.
pub struct RuleInput<'a> {
    /// Lowercase filename stem.
    pub stem: &'a str,
    /// Lecture number from the directory name, if any.
    pub number: Option<&'a str>,
}

/// One entry in the scoring table.
pub struct ScoreRule {
    pub name: &'static str,
    pub delta: i32,
    pub applies: fn(&RuleInput<'_>) -> bool,
}

/// Primary-document scoring rules, in evaluation order.
pub const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "companion",
        delta: -100,
        applies: is_companion_like,
    },
    ScoreRule {
        name: "add-on",
        delta: -60,
        applies: is_add_on,
    },
    ScoreRule {
        name: "main",
        delta: 60,
        applies: is_main,
    },
    ScoreRule {
        name: "lecture{N}",
        delta: 40,
        applies: has_lecture_number,
    },
    ScoreRule {
        name: "l{N} word",
        delta: 35,
        applies: has_short_number_word,
    },
    ScoreRule {
        name: "l{N}_",
        delta: 35,
        applies: has_short_number_prefix,
    },
    ScoreRule {
        name: "notes",
        delta: 20,
        applies: is_notes,
    },
    ScoreRule {
        name: "template",
        delta: 10,
        applies: is_template,
    },
];

fn is_companion_like(input: &RuleInput<'_>) -> bool {
    ["in-class", "exercise", "solution"]
        .iter()
        .any(|p| input.stem.contains(p))
}

fn is_add_on(input: &RuleInput<'_>) -> bool {
    input.stem.contains("add-on") || input.stem.contains("addon")
}

fn is_main(input: &RuleInput<'_>) -> bool {
    input.stem == "main"
}

fn has_lecture_number(input: &RuleInput<'_>) -> bool {
    input
        .number
        .is_some_and(|n| input.stem.contains(&format!("lecture{n}")))
}

/// `l{N}` with no word character (alphanumeric or `_`) on either side.
fn has_short_number_word(input: &RuleInput<'_>) -> bool {
    input.number.is_some_and(|n| {
        let needle = format!("l{n}");
        input.stem.match_indices(&needle).any(|(at, found)| {
            let before = input.stem[..at].chars().next_back();
            let after = input.stem[at + found.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_short_number_prefix(input: &RuleInput<'_>) -> bool {
    input
        .number
        .is_some_and(|n| input.stem.contains(&format!("l{n}_")))
}

fn is_notes(input: &RuleInput<'_>) -> bool {
    input.stem.contains("notes")
}

fn is_template(input: &RuleInput<'_>) -> bool {
    input.stem.contains("template")
}

/// A candidate with its computed score and the names of the rules it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: DocumentCandidate,
    pub score: i32,
    pub matched: Vec<&'static str>,
}

/// Score a lowercase stem against [`SCORE_RULES`].
pub fn score(stem: &str, number: Option<&str>) -> i32 {
    score_with_rules(stem, number).0
}

fn score_with_rules(stem: &str, number: Option<&str>) -> (i32, Vec<&'static str>) {
    let input = RuleInput { stem, number };
    SCORE_RULES
        .iter()
        .filter(|rule| (rule.applies)(&input))
        .fold((0, Vec::new()), |(total, mut names), rule| {
            names.push(rule.name);
            (total + rule.delta, names)
        })
}

/// Rank candidates by score descending, then file name ascending.
pub fn rank(candidates: &[DocumentCandidate], number: Option<&str>) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|c| {
            let (score, matched) = score_with_rules(&c.stem, number);
            ScoredCandidate {
                candidate: c.clone(),
                score,
                matched,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        (Reverse(a.score), &a.candidate.file_name).cmp(&(Reverse(b.score), &b.candidate.file_name))
    });
    ranked
}

/// Companion role of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionRole {
    Exercise,
    Solution,
}

/// Classify a stem as a companion document, if it is one.
pub fn companion_role(stem: &str) -> Option<CompanionRole> {
    let normalized = normalize(stem);
    let has = |phrase: &str| normalized.contains(&normalize(phrase));

    if has("in-class exercise solution") || (has("solution") && has("exercise")) {
        Some(CompanionRole::Solution)
    } else if has("in-class exercise") {
        Some(CompanionRole::Exercise)
    } else {
        None
    }
}

/// Lowercase and collapse each run of `-`, `_` and whitespace into one space.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Outcome of classifying one lecture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSelection {
    pub primary: DocumentCandidate,
    pub exercise: Option<DocumentCandidate>,
    pub solution: Option<DocumentCandidate>,
    /// Companion matches that lost the tie-break, with the role they matched.
    pub ignored: Vec<(CompanionRole, DocumentCandidate)>,
}

/// Select the primary document and companions from a candidate set.
///
/// Returns `None` for an empty candidate set; the lecture has nothing to publish.
pub fn select(candidates: &[DocumentCandidate], number: Option<&str>) -> Option<DocumentSelection> {
    let ranked = rank(candidates, number);
    select_ranked(&ranked)
}

/// Same as [`select`], reusing an existing ranking.
pub fn select_ranked(ranked: &[ScoredCandidate]) -> Option<DocumentSelection> {
    let primary = ranked.first()?.candidate.clone();

    let mut by_name: Vec<&DocumentCandidate> = ranked
        .iter()
        .map(|s| &s.candidate)
        .filter(|c| c.path != primary.path)
        .collect();
    by_name.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut exercise = None;
    let mut solution = None;
    let mut ignored = Vec::new();
    for candidate in by_name {
        let Some(role) = companion_role(&candidate.stem) else {
            continue;
        };
        let slot = match role {
            CompanionRole::Exercise => &mut exercise,
            CompanionRole::Solution => &mut solution,
        };
        if slot.is_none() {
            *slot = Some(candidate.clone());
        } else {
            ignored.push((role, candidate.clone()));
        }
    }

    Some(DocumentSelection {
        primary,
        exercise,
        solution,
        ignored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn candidate(file_name: &str) -> DocumentCandidate {
        DocumentCandidate::from_path(&Path::new("Lecture").join(file_name)).unwrap()
    }

    fn candidates(names: &[&str]) -> Vec<DocumentCandidate> {
        names.iter().map(|n| candidate(n)).collect()
    }

    fn primary_name(names: &[&str], number: Option<&str>) -> String {
        select(&candidates(names), number).unwrap().primary.file_name
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    #[test]
    fn unmatched_stem_scores_zero() {
        assert_eq!(score("draft", Some("3")), 0);
        assert_eq!(score("draft", None), 0);
    }

    #[test]
    fn main_scores_sixty_only_on_exact_match() {
        assert_eq!(score("main", None), 60);
        assert_eq!(score("main_old", None), 0);
        assert_eq!(score("domain", None), 0);
    }

    #[test]
    fn companion_penalty() {
        assert_eq!(score("in-class-exercise", None), -100);
        assert_eq!(score("solution", None), -100);
        // One penalty, however many companion words appear
        assert_eq!(score("in-class-exercise-solution", None), -100);
    }

    #[test]
    fn add_on_penalty() {
        assert_eq!(score("add-on", None), -60);
        assert_eq!(score("addon_material", None), -60);
    }

    #[test]
    fn notes_and_template_bonuses() {
        assert_eq!(score("notes", None), 20);
        assert_eq!(score("template", None), 10);
        assert_eq!(score("notes_template", None), 30);
    }

    #[test]
    fn lecture_number_rules_need_a_number() {
        assert_eq!(score("lecture3", None), 0);
        assert_eq!(score("l3_notes", None), 20);
    }

    #[test]
    fn lecture_prefix_rule() {
        assert_eq!(score("lecture3", Some("3")), 40);
        assert_eq!(score("lecture3", Some("4")), 0);
    }

    #[test]
    fn short_number_rules_accumulate() {
        // l7_ substring, no word boundary before `_`
        assert_eq!(score("l7_notes", Some("7")), 35 + 20);
        // whole word, no underscore
        assert_eq!(score("l7-notes", Some("7")), 35 + 20);
        assert_eq!(score("l7", Some("7")), 35);
    }

    #[test]
    fn short_number_rules_respect_boundaries() {
        assert_eq!(score("l70_notes", Some("7")), 20);
        assert_eq!(score("l70", Some("7")), 0);
        assert_eq!(score("all7", Some("7")), 0);
    }

    #[test]
    fn short_number_word_needs_boundary_on_both_sides() {
        assert_eq!(score("notes-l7", Some("7")), 35 + 20);
        assert_eq!(score("draft l7 v2", Some("7")), 35);
        assert_eq!(score("l7b", Some("7")), 0);
        assert_eq!(score("xl7", Some("7")), 0);
        assert_eq!(score("él7", Some("7")), 0);
        // second occurrence still counts
        assert_eq!(score("xl7-l7", Some("7")), 35);
    }

    #[test]
    fn l7_outranks_l70() {
        let ranked = rank(&candidates(&["l70_notes.tex", "l7_notes.tex"]), Some("7"));
        assert_eq!(ranked[0].candidate.file_name, "l7_notes.tex");
        assert_eq!(ranked[0].score, 55);
        assert_eq!(ranked[1].score, 20);
    }

    #[test]
    fn matched_rule_names_reported() {
        let ranked = rank(&candidates(&["lecture3_notes.tex"]), Some("3"));
        assert_eq!(ranked[0].matched, vec!["lecture{N}", "notes"]);
    }

    #[test]
    fn rule_table_order_is_stable() {
        let names: Vec<&str> = SCORE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "companion",
                "add-on",
                "main",
                "lecture{N}",
                "l{N} word",
                "l{N}_",
                "notes",
                "template"
            ]
        );
    }

    // =========================================================================
    // Primary selection
    // =========================================================================

    #[test]
    fn empty_candidates_select_nothing() {
        assert!(select(&[], Some("1")).is_none());
    }

    #[test]
    fn main_is_primary() {
        assert_eq!(
            primary_name(&["draft.tex", "main.tex", "old_notes_v0.tex"], None),
            "main.tex"
        );
    }

    #[test]
    fn lecture_number_beats_main() {
        assert_eq!(
            primary_name(&["main.tex", "lecture5_l5_notes.tex"], Some("5")),
            "lecture5_l5_notes.tex"
        );
    }

    #[test]
    fn single_template_is_primary() {
        assert_eq!(primary_name(&["l1_template.tex"], Some("1")), "l1_template.tex");
    }

    #[test]
    fn companions_never_primary_when_alternative_exists() {
        assert_eq!(
            primary_name(
                &["in-class-exercise-solution.tex", "scratch.tex"],
                Some("2")
            ),
            "scratch.tex"
        );
        assert_eq!(
            primary_name(&["add-on.tex", "exercise_notes.tex"], None),
            "add-on.tex"
        );
    }

    #[test]
    fn tie_breaks_on_file_name() {
        let names = ["b.tex", "a.tex", "c.tex"];
        for _ in 0..3 {
            assert_eq!(primary_name(&names, None), "a.tex");
        }
        let ranked = rank(&candidates(&names), None);
        let order: Vec<&str> = ranked.iter().map(|s| s.candidate.file_name.as_str()).collect();
        assert_eq!(order, vec!["a.tex", "b.tex", "c.tex"]);
    }

    #[test]
    fn tie_break_uses_full_file_name() {
        assert_eq!(primary_name(&["notes.tex", "notes.ltx"], None), "notes.ltx");
    }

    // =========================================================================
    // Companions
    // =========================================================================

    #[test]
    fn companion_roles() {
        assert_eq!(companion_role("in-class-exercise"), Some(CompanionRole::Exercise));
        assert_eq!(companion_role("in class exercise 3"), Some(CompanionRole::Exercise));
        assert_eq!(
            companion_role("in-class-exercise-solution"),
            Some(CompanionRole::Solution)
        );
        assert_eq!(companion_role("exercise_solutions"), Some(CompanionRole::Solution));
        assert_eq!(companion_role("exercise"), None);
        assert_eq!(companion_role("solution"), None);
        assert_eq!(companion_role("main"), None);
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("In-Class__Exercise  Solution"), "in class exercise solution");
        assert_eq!(normalize("-leading-"), "leading");
    }

    #[test]
    fn full_lecture_directory() {
        let selection = select(
            &candidates(&[
                "in-class-exercise-solution.tex",
                "in-class-exercise.tex",
                "main.tex",
            ]),
            Some("3"),
        )
        .unwrap();
        assert_eq!(selection.primary.file_name, "main.tex");
        assert_eq!(selection.exercise.unwrap().file_name, "in-class-exercise.tex");
        assert_eq!(
            selection.solution.unwrap().file_name,
            "in-class-exercise-solution.tex"
        );
        assert!(selection.ignored.is_empty());
    }

    #[test]
    fn no_companions() {
        let selection = select(&candidates(&["l1_template.tex"]), Some("1")).unwrap();
        assert!(selection.exercise.is_none());
        assert!(selection.solution.is_none());
    }

    #[test]
    fn multiple_companion_matches_pick_first_name() {
        let selection = select(
            &candidates(&[
                "main.tex",
                "in-class-exercise-b.tex",
                "in-class-exercise-a.tex",
            ]),
            None,
        )
        .unwrap();
        assert_eq!(selection.exercise.unwrap().file_name, "in-class-exercise-a.tex");
        assert_eq!(selection.ignored.len(), 1);
        assert_eq!(selection.ignored[0].0, CompanionRole::Exercise);
        assert_eq!(selection.ignored[0].1.file_name, "in-class-exercise-b.tex");
    }

    #[test]
    fn primary_never_takes_companion_role() {
        let selection = select(&candidates(&["in-class-exercise.tex"]), None).unwrap();
        assert_eq!(selection.primary.file_name, "in-class-exercise.tex");
        assert!(selection.exercise.is_none());
    }

    #[test]
    fn companions_distinct_from_each_other() {
        let selection = select(
            &candidates(&[
                "notes.tex",
                "in-class exercise.tex",
                "in-class exercise solution.tex",
            ]),
            None,
        )
        .unwrap();
        let exercise = selection.exercise.unwrap();
        let solution = selection.solution.unwrap();
        assert_ne!(exercise.path, solution.path);
        assert_ne!(exercise.path, selection.primary.path);
        assert_ne!(solution.path, selection.primary.path);
    }
}
