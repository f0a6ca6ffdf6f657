use std::ops::Range;

use xi_rope::delta::{DeltaElement, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Patch;
use crate::editing::document::{byte_to_utf16, utf16_to_byte};

/// Which side of an insertion made exactly at an offset the offset sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay in front of text inserted at this offset
    Before,
    /// Move past text inserted at this offset
    After,
}

/// One applied edit, expressed as the delta plus the text on either side of it.
///
/// The before and after ropes share structure.
#[derive(Clone)]
pub struct Change {
    delta: Delta<RopeInfo>,
    before: Rope,
    after: Rope,
    version: u64,
}

impl Change {
    pub(crate) fn new(delta: Delta<RopeInfo>, before: Rope, after: Rope, version: u64) -> Self {
        Self {
            delta,
            before,
            after,
            version,
        }
    }

    /// Document version produced by this change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Map an offset in the old text to the matching offset in the new text.
    ///
    /// Offsets inside deleted text collapse to the deletion point.
    pub fn map_offset(&self, offset: usize, assoc: Assoc) -> usize {
        let mut transformer = Transformer::new(&self.delta);
        self.map_with(&mut transformer, offset, assoc)
    }

    /// Map a batch of ranges through the change, start and end with their own bias
    pub(crate) fn map_ranges<'r>(
        &self,
        ranges: impl IntoIterator<Item = &'r Range<usize>>,
        start_assoc: Assoc,
        end_assoc: Assoc,
    ) -> Vec<Range<usize>> {
        let mut transformer = Transformer::new(&self.delta);
        ranges
            .into_iter()
            .map(|range| {
                let start = self.map_with(&mut transformer, range.start, start_assoc);
                let end = self.map_with(&mut transformer, range.end, end_assoc);
                start..end
            })
            .collect()
    }

    /// Length of the new text in UTF-16 code units
    pub fn new_len(&self) -> usize {
        byte_to_utf16(&self.after, self.after.len())
    }

    /// Summarise the change for listeners
    pub fn to_patch(&self) -> Patch {
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in self.delta.els.iter() {
            match op {
                DeltaElement::Copy(from, to) => {
                    cursor += to - from;
                }
                DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(byte_to_utf16(&self.after, start)..byte_to_utf16(&self.after, end));
                    cursor = end;
                }
            }
        }

        // A pure deletion still changed something: report the collapse point
        if changed.is_empty() && self.before.len() != self.after.len() {
            let point = self.first_divergence();
            changed.push(point..point);
        }

        Patch {
            changed,
            version: self.version,
        }
    }

    fn map_with(
        &self,
        transformer: &mut Transformer<'_, RopeInfo>,
        offset: usize,
        assoc: Assoc,
    ) -> usize {
        let old_byte = utf16_to_byte(&self.before, offset);
        let new_byte = transformer.transform(old_byte, assoc == Assoc::After);
        byte_to_utf16(&self.after, new_byte)
    }

    /// First new-text offset where the delta stops copying old text verbatim
    fn first_divergence(&self) -> usize {
        let mut old_pos = 0;
        let mut new_pos = 0;
        for op in self.delta.els.iter() {
            match op {
                DeltaElement::Copy(from, to) => {
                    if *from != old_pos {
                        break;
                    }
                    new_pos += to - from;
                    old_pos = *to;
                }
                DeltaElement::Insert(_) => break,
            }
        }
        byte_to_utf16(&self.after, new_pos)
    }
}

impl std::fmt::Debug for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Change")
            .field("version", &self.version)
            .field("old_len", &self.before.len())
            .field("new_len", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Document, Edit};
    use pretty_assertions::assert_eq;

    fn change_for(text: &str, edit: Edit) -> Change {
        let mut doc = Document::from_text(text);
        doc.apply(&edit).unwrap()
    }

    #[test]
    fn test_insert_before_offset_shifts_it() {
        let change = change_for(
            "0123456789abc",
            Edit::Insert {
                at: 2,
                text: "xyz".to_string(),
            },
        );
        assert_eq!(change.map_offset(5, Assoc::Before), 8);
        assert_eq!(change.map_offset(1, Assoc::After), 1);
    }

    #[test]
    fn test_insert_at_offset_respects_assoc() {
        let change = change_for(
            "hello world",
            Edit::Insert {
                at: 5,
                text: ",".to_string(),
            },
        );
        assert_eq!(change.map_offset(5, Assoc::Before), 5);
        assert_eq!(change.map_offset(5, Assoc::After), 6);
    }

    #[test]
    fn test_offset_inside_deletion_collapses() {
        let change = change_for("hello cruel world", Edit::Delete { range: 5..11 });
        assert_eq!(change.map_offset(8, Assoc::After), 5);
        assert_eq!(change.map_offset(13, Assoc::After), 7);
    }

    #[test]
    fn test_mapping_across_surrogate_pairs() {
        let change = change_for(
            "ab cd",
            Edit::Insert {
                at: 0,
                text: "😀".to_string(),
            },
        );
        assert_eq!(change.map_offset(3, Assoc::Before), 5);
    }

    #[test]
    fn test_patch_reports_inserted_range() {
        let change = change_for(
            "hello world",
            Edit::Replace {
                range: 6..11,
                text: "there".to_string(),
            },
        );
        let patch = change.to_patch();
        assert_eq!(patch.changed, vec![6..11]);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_patch_reports_deletion_point() {
        let change = change_for("hello cruel world", Edit::Delete { range: 5..11 });
        assert_eq!(change.to_patch().changed, vec![5..5]);
    }
}
