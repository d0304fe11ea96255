use crate::request::{Request, Vocabulary};
use crate::snapshot::ProjectSnapshot;
use crate::types::RequestCategory;

/// Deterministic request classification.
///
/// Rules fire in priority order against the detected keywords; the first
/// match wins. A project with no prior docs is always NEW_PROJECT no matter
/// what the text says, and a request that matches nothing defaults to
/// ENHANCEMENT.
pub struct Classifier {
    vocabulary: Vocabulary,
}

impl Classifier {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classify(&self, request: &Request, snapshot: &ProjectSnapshot) -> RequestCategory {
        // 1. Nothing on disk yet: there is nothing to fix or extend.
        if !snapshot.has_prior_docs {
            return RequestCategory::NewProject;
        }

        let v = &self.vocabulary;
        let enhancement = request.matches_any(v.terms_for(RequestCategory::Enhancement));

        // 2. Defect language outranks everything else.
        if request.matches_any(v.terms_for(RequestCategory::BugFix)) {
            return RequestCategory::BugFix;
        }

        // 3. Restructuring counts as refactor only without functional-change
        //    language alongside it.
        if request.matches_any(v.terms_for(RequestCategory::Refactor)) && !enhancement {
            return RequestCategory::Refactor;
        }

        // 4. Feature language.
        if enhancement {
            return RequestCategory::Enhancement;
        }

        // 5. Explicit greenfield phrasing on an existing project.
        if request.matches_any(v.terms_for(RequestCategory::NewProject)) {
            return RequestCategory::NewProject;
        }

        // 6. Fallback.
        RequestCategory::Enhancement
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
