use crate::annotations::HighlightId;
use crate::editing::DocumentError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("Highlight '{0}' not found.")]
    UnknownHighlight(HighlightId),

    #[error("Suggestion '{0}' was already accepted.")]
    AlreadyAccepted(HighlightId),

    #[error("Highlight '{0}' has no replacement to accept.")]
    NotAcceptable(HighlightId),

    #[error("Suggestion '{id}' is stale: expected '{expected}' but the text is '{found}'.")]
    StaleSuggestion {
        id: HighlightId,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}
