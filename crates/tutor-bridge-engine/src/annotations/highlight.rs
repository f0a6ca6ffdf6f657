use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Well-known highlight kinds. The taxonomy is open; these are the ones the
/// engine gives meaning to.
pub mod kinds {
    pub const GRAMMAR: &str = "grammar";
    pub const COHERENCE: &str = "coherence";
    pub const SUGGESTION: &str = "suggestion";
    pub const TEXT_SUGGESTION: &str = "text_suggestion";
    pub const REWRITE: &str = "rewrite";
    pub const STRIKETHROUGH: &str = "strikethrough";
    pub const TOOLTIP: &str = "tooltip";
}

/// Caller-assigned (or generated) highlight identifier: text or integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighlightId {
    Number(i64),
    Text(String),
}

impl HighlightId {
    pub fn generate() -> Self {
        Self::Text(uuid::Uuid::new_v4().to_string())
    }

    /// Ids that arrive as plain text (`"7"`) refer to numeric ids (`7`) too
    pub fn matches(&self, other: &HighlightId) -> bool {
        match (self, other) {
            (HighlightId::Number(a), HighlightId::Number(b)) => a == b,
            (HighlightId::Text(a), HighlightId::Text(b)) => a == b,
            (a, b) => a.to_string() == b.to_string(),
        }
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightId::Number(n) => write!(f, "{n}"),
            HighlightId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for HighlightId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => HighlightId::Number(n),
            Err(_) => HighlightId::Text(s.to_string()),
        })
    }
}

impl From<&str> for HighlightId {
    fn from(value: &str) -> Self {
        HighlightId::Text(value.to_string())
    }
}

impl From<String> for HighlightId {
    fn from(value: String) -> Self {
        HighlightId::Text(value)
    }
}

impl From<i64> for HighlightId {
    fn from(value: i64) -> Self {
        HighlightId::Number(value)
    }
}

/// A validated annotation over `[start, end)` of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: HighlightId,
    pub start: usize,
    pub end: usize,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_version: Option<String>,
}

impl Highlight {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether a double-click may replace the text under this highlight
    pub fn supports_accept(&self) -> bool {
        matches!(self.kind.as_str(), kinds::SUGGESTION | kinds::TEXT_SUGGESTION)
            && self.correct_version.is_some()
    }

    /// Whether single clicks go to the suggestion callback with the full highlight
    pub fn has_dedicated_click(&self) -> bool {
        self.kind == kinds::TEXT_SUGGESTION
    }
}

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidHighlight {
    #[error("negative offset {start}..{end}")]
    Negative { start: i64, end: i64 },
    #[error("start {start} is after end {end}")]
    Inverted { start: i64, end: i64 },
    #[error("empty range at {at}")]
    Empty { at: i64 },
    #[error("range {start}..{end} exceeds document length {len}")]
    OutOfBounds { start: i64, end: i64, len: usize },
}

/// Unvalidated highlight as supplied by the application or the remote agent
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightCandidate {
    #[serde(default)]
    pub id: Option<HighlightId>,
    pub start: i64,
    pub end: i64,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "wrong_version")]
    pub wrong_version: Option<String>,
    #[serde(default, alias = "correct_version")]
    pub correct_version: Option<String>,
}

impl HighlightCandidate {
    pub fn new(id: impl Into<HighlightId>, start: i64, end: i64, kind: &str) -> Self {
        Self {
            id: Some(id.into()),
            start,
            end,
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_replacement(mut self, wrong: Option<&str>, correct: &str) -> Self {
        self.wrong_version = wrong.map(str::to_string);
        self.correct_version = Some(correct.to_string());
        self
    }

    /// Check bounds against a document of `doc_len` units
    pub fn validate(self, doc_len: usize) -> Result<Highlight, InvalidHighlight> {
        let (start, end) = (self.start, self.end);
        if start < 0 || end < 0 {
            return Err(InvalidHighlight::Negative { start, end });
        }
        if start > end {
            return Err(InvalidHighlight::Inverted { start, end });
        }
        if start == end {
            return Err(InvalidHighlight::Empty { at: start });
        }
        if end as u64 > doc_len as u64 {
            return Err(InvalidHighlight::OutOfBounds {
                start,
                end,
                len: doc_len,
            });
        }

        Ok(Highlight {
            id: self.id.unwrap_or_else(HighlightId::generate),
            start: start as usize,
            end: end as usize,
            kind: self.kind,
            message: self.message,
            wrong_version: self.wrong_version,
            correct_version: self.correct_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(5, 3, InvalidHighlight::Inverted { start: 5, end: 3 })]
    #[case(4, 4, InvalidHighlight::Empty { at: 4 })]
    #[case(-1, 3, InvalidHighlight::Negative { start: -1, end: 3 })]
    #[case(2, 21, InvalidHighlight::OutOfBounds { start: 2, end: 21, len: 20 })]
    fn test_invalid_candidates_are_rejected(
        #[case] start: i64,
        #[case] end: i64,
        #[case] expected: InvalidHighlight,
    ) {
        let candidate = HighlightCandidate::new(1, start, end, kinds::GRAMMAR);
        assert_eq!(candidate.validate(20).unwrap_err(), expected);
    }

    #[test]
    fn test_valid_candidate_keeps_fields() {
        let highlight = HighlightCandidate::new("s1", 0, 20, kinds::SUGGESTION)
            .with_message("Use the past tense")
            .with_replacement(Some("go"), "went")
            .validate(20)
            .unwrap();

        assert_eq!(highlight.range(), 0..20);
        assert_eq!(highlight.id, HighlightId::from("s1"));
        assert!(highlight.supports_accept());
        assert!(!highlight.has_dedicated_click());
    }

    #[test]
    fn test_missing_id_is_generated() {
        let candidate = HighlightCandidate {
            start: 1,
            end: 2,
            ..Default::default()
        };
        let highlight = candidate.validate(5).unwrap();
        assert!(matches!(highlight.id, HighlightId::Text(ref s) if s.len() == 36));
    }

    #[test]
    fn test_candidate_deserializes_both_casings() {
        let json = r#"{"id": 3, "start": 0, "end": 4, "type": "suggestion",
                       "wrong_version": "teh", "correctVersion": "the"}"#;
        let candidate: HighlightCandidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.id, Some(HighlightId::Number(3)));
        assert_eq!(candidate.kind, "suggestion");
        assert_eq!(candidate.wrong_version.as_deref(), Some("teh"));
        assert_eq!(candidate.correct_version.as_deref(), Some("the"));
    }

    #[test]
    fn test_text_and_numeric_ids_match() {
        let numeric = HighlightId::Number(7);
        let parsed: HighlightId = "7".parse().unwrap();
        assert!(numeric.matches(&parsed));
        assert!(numeric.matches(&HighlightId::from("7")));
        assert!(!numeric.matches(&HighlightId::from("8")));
    }
}
