use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{Document, DocumentError};

/// Edits that can be applied to the document (offsets in UTF-16 code units)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { at: usize, text: String },
    Delete { range: Range<usize> },
    Replace { range: Range<usize>, text: String },
}

impl Edit {
    /// The range of the existing text this edit touches
    pub fn range(&self) -> Range<usize> {
        match self {
            Edit::Insert { at, .. } => *at..*at,
            Edit::Delete { range } | Edit::Replace { range, .. } => range.clone(),
        }
    }
}

/// Compile an edit into a delta over the current buffer
pub(crate) fn compile_edit(doc: &Document, edit: &Edit) -> Result<Delta<RopeInfo>, DocumentError> {
    let range = edit.range();
    doc.check_range(&range)?;
    let bytes = doc.byte_range(&range);

    let mut builder = Builder::new(doc.buffer.len());
    match edit {
        Edit::Insert { text, .. } | Edit::Replace { text, .. } => {
            builder.replace(bytes, Rope::from(text.as_str()));
        }
        Edit::Delete { .. } => {
            builder.delete(bytes);
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Edit::Insert { at: 0, text: "Oh, ".to_string() }, "Oh, the cat sat")]
    #[case(Edit::Insert { at: 15, text: "!".to_string() }, "the cat sat")]
    #[case(Edit::Delete { range: 3..7 }, "the sat")]
    #[case(Edit::Replace { range: 4..7, text: "dog".to_string() }, "the dog sat")]
    fn test_edits_apply(#[case] edit: Edit, #[case] expected: &str) {
        let mut doc = Document::from_text("the cat sat");
        let result = doc.apply(&edit);

        if edit.range().end > 11 {
            assert!(result.is_err());
            assert_eq!(doc.text(), "the cat sat");
        } else {
            assert!(result.is_ok());
            assert_eq!(doc.text(), expected);
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut doc = Document::from_text("the cat sat");
        #[allow(clippy::reversed_empty_ranges)]
        let edit = Edit::Delete { range: 7..3 };

        assert_eq!(
            doc.apply(&edit).unwrap_err(),
            DocumentError::InvertedRange { start: 7, end: 3 }
        );
    }

    #[test]
    fn test_replace_after_surrogate_pair() {
        let mut doc = Document::from_text("😀 cat");
        doc.apply(&Edit::Replace {
            range: 3..6,
            text: "dog".to_string(),
        })
        .unwrap();
        assert_eq!(doc.text(), "😀 dog");
    }
}
