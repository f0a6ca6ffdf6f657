use std::ops::Range;

use serde::Serialize;

use crate::annotations::{Highlight, HighlightId, kinds};

/// Ordered list of kinds; earlier kinds win visual precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPriority {
    order: Vec<String>,
}

impl KindPriority {
    pub fn new<S: Into<String>>(order: impl IntoIterator<Item = S>) -> Self {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    /// Rank of `kind`; unranked kinds sort after every listed one
    pub fn rank(&self, kind: &str) -> usize {
        self.order
            .iter()
            .position(|k| k == kind)
            .unwrap_or(self.order.len())
    }
}

impl Default for KindPriority {
    fn default() -> Self {
        Self::new([
            kinds::GRAMMAR,
            kinds::COHERENCE,
            kinds::SUGGESTION,
            kinds::REWRITE,
        ])
    }
}

/// A highlight as it should be drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedHighlight {
    #[serde(flatten)]
    pub highlight: Highlight,
    /// Some of the span is already covered by a higher-precedence highlight
    pub overlapping: bool,
}

/// Compute the renderable set.
///
/// Highlights are ordered by kind priority, then shorter span, then start
/// offset. A highlight is flagged `overlapping` when part of its span is
/// covered by one that precedes it in that order. The flag is styling
/// metadata only; nothing is removed. With an active id, only that highlight
/// is returned (or nothing, if the id is unknown).
pub fn resolve(
    highlights: &[Highlight],
    active: Option<&HighlightId>,
    priority: &KindPriority,
) -> Vec<RenderedHighlight> {
    let mut ordered: Vec<&Highlight> = highlights.iter().collect();
    ordered.sort_by_key(|h| (priority.rank(&h.kind), h.len(), h.start));

    let mut covered: Vec<Range<usize>> = Vec::with_capacity(ordered.len());
    let rendered = ordered.into_iter().map(|highlight| {
        let overlapping = covered
            .iter()
            .any(|range| range.start < highlight.end && highlight.start < range.end);
        covered.push(highlight.range());
        RenderedHighlight {
            highlight: highlight.clone(),
            overlapping,
        }
    });

    match active {
        Some(active) => rendered
            .filter(|r| r.highlight.id.matches(active))
            .take(1)
            .collect(),
        None => rendered.collect(),
    }
}
