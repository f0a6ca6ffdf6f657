use crate::annotations::{Highlight, HighlightId};
use crate::editing::{Assoc, Change};

/// Highlights removed because an edit collapsed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    pub dropped: Vec<HighlightId>,
}

/// Transform highlight ranges through a change so they keep denoting the same text.
///
/// The start uses `Assoc::After` so text inserted exactly at the start lands
/// outside the highlight; the end uses `Assoc::Before` so text typed right after
/// the highlight does not extend it. Ranges that collapse to zero width are removed.
pub fn remap_highlights(highlights: &mut Vec<Highlight>, change: &Change) -> RemapReport {
    let new_len = change.new_len();
    let ranges: Vec<_> = highlights.iter().map(Highlight::range).collect();
    let mapped = change.map_ranges(&ranges, Assoc::After, Assoc::Before);

    for (highlight, range) in highlights.iter_mut().zip(mapped) {
        // Clamp so an inverted mapping collapses instead of underflowing
        let start = range.start.min(new_len);
        let end = range.end.min(new_len).max(start);
        highlight.start = start;
        highlight.end = end;
    }

    let mut report = RemapReport::default();
    highlights.retain(|highlight| {
        let keep = highlight.start < highlight.end;
        if !keep {
            report.dropped.push(highlight.id.clone());
        }
        keep
    });

    if !report.dropped.is_empty() {
        log::debug!(
            "Edit collapsed {} highlight(s): {:?}",
            report.dropped.len(),
            report.dropped
        );
    }
    report
}
