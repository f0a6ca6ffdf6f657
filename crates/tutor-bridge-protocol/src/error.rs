use tutor_bridge_engine::AnnotationError;

/// Why an action could not be performed. Every variant ends up in a
/// `success = false` response; none of them escape the dispatcher.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown action type: {0}.")]
    UnknownAction(i32),

    #[error("Element '{0}' not found.")]
    ElementNotFound(String),

    #[error("{0} requires a targetElementId.")]
    MissingTarget(&'static str),

    #[error("Missing required parameter '{0}'.")]
    MissingParameter(&'static str),

    #[error("Invalid value '{value}' for parameter '{name}': {reason}.")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("No {capability} registered for '{target}'.")]
    MissingCapability {
        capability: &'static str,
        target: String,
    },

    #[error("No page navigator registered.")]
    NoNavigator,

    #[error("Range {start}..{end} is not a valid range in the document.")]
    InvalidRange { start: i64, end: i64 },

    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}
