use crate::annotations::{HighlightCandidate, HighlightId};

/// Update entry point for the highlight store, used by whoever drives the
/// annotations from outside (the remote action protocol, the CLI harness)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightCommand {
    /// Replace every highlight with the valid subset of the candidates
    Replace(Vec<HighlightCandidate>),
    /// Add candidates, overwriting highlights with the same id
    Extend(Vec<HighlightCandidate>),
    Remove(HighlightId),
    Clear,
    /// Set or clear the exclusively rendered highlight
    SetActive(Option<HighlightId>),
    /// Apply a suggestion's replacement text to the document
    Accept(HighlightId),
}

/// What a command did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    pub kept: usize,
    pub dropped: usize,
    /// Dropped because the id was accepted earlier
    pub already_accepted: usize,
    pub accepted: Option<HighlightId>,
}
