use std::time::{Duration, Instant};

use crate::annotations::{AnnotationError, HighlightId};

pub const DEFAULT_DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Remembers the last click so a second one on the same id can be
/// recognised as a double-click
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(HighlightId, Instant)>,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a click at `at`; true when it completes a double-click.
    ///
    /// Clicks exactly `window` apart are two single clicks.
    pub fn register(&mut self, id: &HighlightId, at: Instant) -> bool {
        let double = matches!(
            &self.last,
            Some((last_id, last_at))
                if last_id.matches(id) && at.saturating_duration_since(*last_at) < self.window
        );
        self.last = Some((id.clone(), at));
        double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_WINDOW)
    }
}

/// Which path a click took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Double-click applied the suggestion's replacement
    Accepted(HighlightId),
    /// Double-click tried to accept but the replacement could not be applied
    AcceptFailed {
        id: HighlightId,
        reason: AnnotationError,
    },
    /// The kind-specific callback received the full highlight
    SuggestionCallback(HighlightId),
    /// The generic callback received the id
    ClickCallback(HighlightId),
    /// No callback registered
    Unhandled(HighlightId),
    /// The id is not in the store (e.g. removed since it was rendered)
    UnknownHighlight(HighlightId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true)]
    #[case(120, true)]
    #[case(499, true)]
    #[case(500, false)]
    #[case(900, false)]
    fn test_double_click_window(#[case] gap_ms: u64, #[case] expected: bool) {
        // Given
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        let id = HighlightId::from("s1");

        // When
        let first = tracker.register(&id, start);
        let second = tracker.register(&id, start + Duration::from_millis(gap_ms));

        // Then
        assert!(!first);
        assert_eq!(second, expected);
    }

    #[test]
    fn test_clicks_on_different_ids_are_single() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();

        tracker.register(&"a".into(), start);
        assert!(!tracker.register(&"b".into(), start + Duration::from_millis(10)));
    }

    #[test]
    fn test_reset_forgets_last_click() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        let id = HighlightId::Number(4);

        tracker.register(&id, start);
        tracker.reset();
        assert!(!tracker.register(&id, start + Duration::from_millis(10)));
    }

    #[test]
    fn test_out_of_order_timestamps_count_as_immediate() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now() + Duration::from_secs(1);
        let id = HighlightId::Number(4);

        tracker.register(&id, start);
        assert!(tracker.register(&id, start - Duration::from_millis(100)));
    }
}
