/// Result of applying an edit, handed to change listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges of new text in the updated document (UTF-16 offsets)
    pub changed: Vec<std::ops::Range<usize>>,
    pub version: u64,
}
