use std::collections::HashSet;

use crate::annotations::{Highlight, HighlightCandidate, HighlightId};

/// Outcome of validating a batch of candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub kept: usize,
    /// Every rejected candidate, `already_accepted` included
    pub dropped: usize,
    pub already_accepted: usize,
}

/// The known highlights, the active one, and the ids already accepted.
///
/// Validation failures never abort an update: bad entries are dropped, counted
/// and logged so the rest of the batch still renders.
#[derive(Debug, Default)]
pub struct HighlightStore {
    highlights: Vec<Highlight>,
    active: Option<HighlightId>,
    accepted: HashSet<String>,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every highlight with the valid subset of `candidates`
    pub fn set_highlights(
        &mut self,
        candidates: impl IntoIterator<Item = HighlightCandidate>,
        doc_len: usize,
    ) -> ValidationReport {
        self.highlights.clear();
        let report = self.insert_validated(candidates, doc_len);

        if let Some(active) = &self.active
            && self.get(active).is_none()
        {
            self.active = None;
        }
        report
    }

    /// Add candidates, replacing existing highlights that share an id
    pub fn extend(
        &mut self,
        candidates: impl IntoIterator<Item = HighlightCandidate>,
        doc_len: usize,
    ) -> ValidationReport {
        self.insert_validated(candidates, doc_len)
    }

    fn insert_validated(
        &mut self,
        candidates: impl IntoIterator<Item = HighlightCandidate>,
        doc_len: usize,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        for candidate in candidates {
            let highlight = match candidate.validate(doc_len) {
                Ok(highlight) => highlight,
                Err(reason) => {
                    log::debug!("Dropping highlight: {reason}");
                    report.dropped += 1;
                    continue;
                }
            };

            if self.is_accepted(&highlight.id) {
                log::debug!("Dropping highlight '{}': already accepted", highlight.id);
                report.dropped += 1;
                report.already_accepted += 1;
                continue;
            }

            match self.position(&highlight.id) {
                Some(index) => self.highlights[index] = highlight,
                None => self.highlights.push(highlight),
            }
            report.kept += 1;
        }

        if report.dropped > 0 {
            log::warn!(
                "Dropped {} invalid highlight(s), kept {}",
                report.dropped,
                report.kept
            );
        }
        report
    }

    pub fn get(&self, id: &HighlightId) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.id.matches(id))
    }

    pub fn all(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn remove(&mut self, id: &HighlightId) -> Option<Highlight> {
        let index = self.position(id)?;
        let removed = self.highlights.remove(index);
        if self.active.as_ref().is_some_and(|a| a.matches(id)) {
            self.active = None;
        }
        Some(removed)
    }

    /// Drop every highlight and the active id; accepted ids are kept
    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.active = None;
    }

    /// Forget everything, including accepted ids (document reset)
    pub fn clear(&mut self) {
        self.highlights.clear();
        self.active = None;
        self.accepted.clear();
    }

    pub fn active(&self) -> Option<&HighlightId> {
        self.active.as_ref()
    }

    pub fn set_active(&mut self, id: Option<HighlightId>) {
        self.active = id;
    }

    pub fn is_accepted(&self, id: &HighlightId) -> bool {
        self.accepted.contains(&id.to_string())
    }

    /// Record an accepted id; returns false if it was already recorded
    pub fn mark_accepted(&mut self, id: &HighlightId) -> bool {
        self.accepted.insert(id.to_string())
    }

    pub(crate) fn highlights_mut(&mut self) -> &mut Vec<Highlight> {
        &mut self.highlights
    }

    fn position(&self, id: &HighlightId) -> Option<usize> {
        self.highlights.iter().position(|h| h.id.matches(id))
    }
}
