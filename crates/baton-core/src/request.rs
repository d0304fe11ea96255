use crate::config::KeywordConfig;
use crate::types::RequestCategory;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Keyword vocabulary driving classification and planning.
///
/// Built-in terms cover the common ways people phrase requests; projects can
/// extend each list through the `keywords` section of config.yaml. Terms are
/// lowercase; multi-word terms match as whole phrases.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    new_project: Vec<String>,
    bug_fix: Vec<String>,
    refactor: Vec<String>,
    enhancement: Vec<String>,
    integration: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            new_project: to_terms(&[
                "create",
                "new system",
                "new project",
                "build",
                "scaffold",
                "from scratch",
                "greenfield",
            ]),
            bug_fix: to_terms(&[
                "fix", "bug", "fails", "failing", "error", "broken", "crash", "regression",
                "defect",
            ]),
            refactor: to_terms(&[
                "refactor",
                "optimize",
                "restructure",
                "simplify",
                "clean up",
                "cleanup",
                "reorganize",
            ]),
            enhancement: to_terms(&[
                "add",
                "enhance",
                "extend",
                "feature",
                "support",
                "implement",
                "integrate",
                "expand",
                "improve",
            ]),
            integration: to_terms(&[
                "database",
                "schema",
                "integration",
                "migration",
                "sql",
                "persistence",
            ]),
        }
    }
}

fn to_terms(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Vocabulary {
    /// Built-in vocabulary plus any project-level extensions.
    pub fn with_extensions(extra: &KeywordConfig) -> Self {
        let mut vocab = Vocabulary::default();
        extend_terms(&mut vocab.new_project, &extra.new_project);
        extend_terms(&mut vocab.bug_fix, &extra.bug_fix);
        extend_terms(&mut vocab.refactor, &extra.refactor);
        extend_terms(&mut vocab.enhancement, &extra.enhancement);
        extend_terms(&mut vocab.integration, &extra.integration);
        vocab
    }

    pub fn terms_for(&self, category: RequestCategory) -> &[String] {
        match category {
            RequestCategory::NewProject => &self.new_project,
            RequestCategory::BugFix => &self.bug_fix,
            RequestCategory::Refactor => &self.refactor,
            RequestCategory::Enhancement => &self.enhancement,
        }
    }

    /// Terms that signal data-layer work and force a DATABASE stage.
    pub fn integration_terms(&self) -> &[String] {
        &self.integration
    }

    fn all_terms(&self) -> impl Iterator<Item = &String> {
        self.new_project
            .iter()
            .chain(&self.bug_fix)
            .chain(&self.refactor)
            .chain(&self.enhancement)
            .chain(&self.integration)
    }
}

fn extend_terms(terms: &mut Vec<String>, extra: &[String]) {
    for term in extra {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap())
}

/// A free-text request with the vocabulary terms detected in it.
///
/// Detection is case-insensitive and punctuation-blind: single-word terms
/// match whole tokens, multi-word terms match as token sequences. "cleanup"
/// and "clean up" are therefore distinct terms.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub raw_text: String,
    pub detected_keywords: BTreeSet<String>,
}

impl Request {
    pub fn from_text(text: &str, vocabulary: &Vocabulary) -> Self {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = word_re().find_iter(&lowered).map(|m| m.as_str()).collect();
        let token_set: BTreeSet<&str> = tokens.iter().copied().collect();
        let padded = format!(" {} ", tokens.join(" "));

        let detected_keywords = vocabulary
            .all_terms()
            .filter(|term| {
                if term.contains(' ') {
                    padded.contains(&format!(" {term} "))
                } else {
                    token_set.contains(term.as_str())
                }
            })
            .cloned()
            .collect();

        Self {
            raw_text: text.to_string(),
            detected_keywords,
        }
    }

    pub fn matches_any(&self, terms: &[String]) -> bool {
        terms.iter().any(|t| self.detected_keywords.contains(t))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
