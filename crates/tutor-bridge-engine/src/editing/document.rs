use std::ops::Range;

use xi_rope::Rope;
use xi_rope::rope::{BaseMetric, Utf16CodeUnitsMetric};

use crate::editing::{Change, Edit};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("Range start {start} is after its end {end}")]
    InvertedRange { start: usize, end: usize },
}

/// Editable text surface that highlights are anchored to.
///
/// Document keeps the whole text in one `xi_rope::Rope` and hands out
/// offsets in UTF-16 code units. Every mutation goes through [`Document::apply`],
/// which is the transactional primitive: it validates the edit, compiles it to a
/// delta, swaps the buffer and returns the [`Change`] so that anchored ranges can
/// be mapped through exactly the same edit.
///
/// ```rust
/// # use tutor_bridge_engine::editing::{Document, Edit};
/// let mut doc = Document::from_text("Their going home.");
/// doc.apply(&Edit::Replace { range: 0..5, text: "They're".to_string() }).unwrap();
///
/// assert_eq!(doc.text(), "They're going home.");
/// assert_eq!(doc.version(), 1);
/// ```
#[derive(Clone)]
pub struct Document {
    /// xi-rope buffer containing the document as UTF-8
    pub(crate) buffer: Rope,
    /// Version counter incremented on each edit (enables change detection)
    pub(crate) version: u64,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
        }
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.buffer.measure::<Utf16CodeUnitsMetric>()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Text between two offsets
    pub fn slice(&self, range: Range<usize>) -> Result<String, DocumentError> {
        self.check_range(&range)?;
        let bytes = self.byte_range(&range);
        Ok(self.buffer.slice_to_cow(bytes).into_owned())
    }

    /// Apply an edit to the document.
    ///
    /// Nothing changes when the edit is rejected. On success the version is
    /// incremented and the returned [`Change`] describes the edit in terms of
    /// both the old and the new text.
    pub fn apply(&mut self, edit: &Edit) -> Result<Change, DocumentError> {
        let delta = crate::editing::edit::compile_edit(self, edit)?;

        let before = self.buffer.clone();
        self.buffer = delta.apply(&self.buffer);
        self.version += 1;

        Ok(Change::new(delta, before, self.buffer.clone(), self.version))
    }

    /// Replace the whole content (document reset)
    pub fn reset(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.version += 1;
    }

    pub(crate) fn check_range(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        if range.start > range.end {
            return Err(DocumentError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        let len = self.len();
        if range.end > len {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    pub(crate) fn byte_range(&self, range: &Range<usize>) -> Range<usize> {
        utf16_to_byte(&self.buffer, range.start)..utf16_to_byte(&self.buffer, range.end)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.len())
            .field("version", &self.version)
            .finish()
    }
}

/// Convert a UTF-16 offset into a byte offset of `rope`, clamping at the end
pub(crate) fn utf16_to_byte(rope: &Rope, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    if offset >= rope.measure::<Utf16CodeUnitsMetric>() {
        return rope.len();
    }
    rope.convert_metrics::<Utf16CodeUnitsMetric, BaseMetric>(offset)
}

/// Convert a byte offset of `rope` into a UTF-16 offset, clamping at the end
pub(crate) fn byte_to_utf16(rope: &Rope, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    if offset >= rope.len() {
        return rope.measure::<Utf16CodeUnitsMetric>();
    }
    rope.convert_metrics::<BaseMetric, Utf16CodeUnitsMetric>(offset)
}
