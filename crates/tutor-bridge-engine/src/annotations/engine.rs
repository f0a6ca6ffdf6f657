use std::time::{Duration, Instant};

use crate::annotations::{
    AnnotationError, ClickOutcome, ClickTracker, CommandReport, Highlight, HighlightCandidate,
    HighlightCommand, HighlightId, HighlightStore, KindPriority, RenderedHighlight,
    ValidationReport, interaction::DEFAULT_DOUBLE_CLICK_WINDOW, overlap, remap_highlights,
};
use crate::editing::{Document, DocumentError, Edit, Patch};

/// Tunables read from configuration
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub double_click_window: Duration,
    pub kind_priority: KindPriority,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            double_click_window: DEFAULT_DOUBLE_CLICK_WINDOW,
            kind_priority: KindPriority::default(),
        }
    }
}

type ClickFn = Box<dyn FnMut(&HighlightId)>;
type HighlightFn = Box<dyn FnMut(&Highlight)>;
type ChangeListener = Box<dyn FnMut(&Patch)>;

/// Click and accept handlers owned by one engine instance.
///
/// Handlers run while the engine is mutably borrowed; they must not call
/// back into the same engine.
#[derive(Default)]
pub struct AnnotationCallbacks {
    on_click: Option<ClickFn>,
    on_suggestion_click: Option<HighlightFn>,
    on_accept: Option<HighlightFn>,
}

impl AnnotationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic click handler, receives the id only
    pub fn on_click(mut self, f: impl FnMut(&HighlightId) + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Handler for kinds with a dedicated click path (`text_suggestion`)
    pub fn on_suggestion_click(mut self, f: impl FnMut(&Highlight) + 'static) -> Self {
        self.on_suggestion_click = Some(Box::new(f));
        self
    }

    /// Called once per accepted suggestion, after the document was updated
    pub fn on_accept(mut self, f: impl FnMut(&Highlight) + 'static) -> Self {
        self.on_accept = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for AnnotationCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationCallbacks")
            .field("on_click", &self.on_click.is_some())
            .field("on_suggestion_click", &self.on_suggestion_click.is_some())
            .field("on_accept", &self.on_accept.is_some())
            .finish()
    }
}

/// Highlights over a live document.
///
/// The engine owns the document, so every edit (including accepting a
/// suggestion) passes through [`AnnotationEngine::edit`] and the stored
/// ranges are remapped through the same change before anyone sees them.
pub struct AnnotationEngine {
    document: Document,
    store: HighlightStore,
    clicks: ClickTracker,
    priority: KindPriority,
    callbacks: AnnotationCallbacks,
    listeners: Vec<ChangeListener>,
}

impl AnnotationEngine {
    pub fn new(document: Document, options: EngineOptions, callbacks: AnnotationCallbacks) -> Self {
        Self {
            document,
            store: HighlightStore::new(),
            clicks: ClickTracker::new(options.double_click_window),
            priority: options.kind_priority,
            callbacks,
            listeners: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    /// Register a listener invoked after every edit, once highlights are remapped
    pub fn subscribe(&mut self, listener: impl FnMut(&Patch) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_highlights(
        &mut self,
        candidates: impl IntoIterator<Item = HighlightCandidate>,
    ) -> ValidationReport {
        self.store.set_highlights(candidates, self.document.len())
    }

    /// Set the exclusively rendered highlight. An id that is not in the store
    /// is kept, and renders nothing until a highlight with that id arrives.
    pub fn set_active(&mut self, id: Option<HighlightId>) {
        if let Some(id) = &id
            && self.store.get(id).is_none()
        {
            log::warn!("Active highlight '{id}' is not in the store");
        }
        self.store.set_active(id);
    }

    /// The list the editor view should draw
    pub fn renderable(&self) -> Vec<RenderedHighlight> {
        overlap::resolve(self.store.all(), self.store.active(), &self.priority)
    }

    /// Apply an edit and carry every highlight through it
    pub fn edit(&mut self, edit: Edit) -> Result<Patch, DocumentError> {
        let change = self.document.apply(&edit)?;
        let report = remap_highlights(self.store.highlights_mut(), &change);

        let active_dropped = self
            .store
            .active()
            .is_some_and(|active| report.dropped.iter().any(|id| id.matches(active)));
        if active_dropped {
            self.store.set_active(None);
        }

        let patch = change.to_patch();
        self.notify(&patch);
        Ok(patch)
    }

    /// Replace the whole document; highlights, accepted ids and click state go with it
    pub fn reset_document(&mut self, text: &str) -> Patch {
        self.document.reset(text);
        self.store.clear();
        self.clicks.reset();
        log::info!("Document reset (version {})", self.document.version());

        let patch = Patch {
            changed: vec![0..self.document.len()],
            version: self.document.version(),
        };
        self.notify(&patch);
        patch
    }

    /// Pointer click on a rendered highlight at `at`.
    ///
    /// A double-click on an acceptable suggestion applies it. Otherwise the
    /// kind-specific callback runs if the kind has one and it is registered,
    /// then the generic one. Every click on a known highlight makes it active.
    pub fn click(&mut self, id: &HighlightId, at: Instant) -> ClickOutcome {
        let Some(highlight) = self.store.get(id).cloned() else {
            log::debug!("Click on unknown highlight '{id}'");
            return ClickOutcome::UnknownHighlight(id.clone());
        };
        let id = highlight.id.clone();

        let double = self.clicks.register(&id, at);
        self.store.set_active(Some(id.clone()));

        if double && highlight.supports_accept() && !self.store.is_accepted(&id) {
            return match self.accept(&id) {
                Ok(_) => ClickOutcome::Accepted(id),
                Err(reason) => {
                    log::warn!("Accepting '{id}' failed: {reason}");
                    ClickOutcome::AcceptFailed { id, reason }
                }
            };
        }

        if highlight.has_dedicated_click()
            && let Some(callback) = self.callbacks.on_suggestion_click.as_mut()
        {
            callback(&highlight);
            return ClickOutcome::SuggestionCallback(id);
        }

        match self.callbacks.on_click.as_mut() {
            Some(callback) => {
                callback(&id);
                ClickOutcome::ClickCallback(id)
            }
            None => ClickOutcome::Unhandled(id),
        }
    }

    /// Replace the highlighted text with its `correctVersion`.
    ///
    /// At most one acceptance per id: the accepted set is checked first and
    /// nothing changes when it already holds the id.
    pub fn accept(&mut self, id: &HighlightId) -> Result<Highlight, AnnotationError> {
        if self.store.is_accepted(id) {
            return Err(AnnotationError::AlreadyAccepted(id.clone()));
        }
        let highlight = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| AnnotationError::UnknownHighlight(id.clone()))?;
        let replacement = match &highlight.correct_version {
            Some(correct) if highlight.supports_accept() => correct.clone(),
            _ => return Err(AnnotationError::NotAcceptable(highlight.id)),
        };

        if let Some(expected) = &highlight.wrong_version {
            let found = self.document.slice(highlight.range())?;
            if &found != expected {
                return Err(AnnotationError::StaleSuggestion {
                    id: highlight.id,
                    expected: expected.clone(),
                    found,
                });
            }
        }

        self.edit(Edit::Replace {
            range: highlight.range(),
            text: replacement,
        })?;
        self.store.remove(&highlight.id);
        self.store.mark_accepted(&highlight.id);
        self.clicks.reset();
        log::info!("Accepted suggestion '{}'", highlight.id);

        if let Some(callback) = self.callbacks.on_accept.as_mut() {
            callback(&highlight);
        }
        Ok(highlight)
    }

    pub fn apply_command(
        &mut self,
        command: HighlightCommand,
    ) -> Result<CommandReport, AnnotationError> {
        let doc_len = self.document.len();
        let report = match command {
            HighlightCommand::Replace(candidates) => {
                self.store.set_highlights(candidates, doc_len).into()
            }
            HighlightCommand::Extend(candidates) => self.store.extend(candidates, doc_len).into(),
            HighlightCommand::Remove(id) => {
                self.store
                    .remove(&id)
                    .ok_or(AnnotationError::UnknownHighlight(id))?;
                CommandReport::default()
            }
            HighlightCommand::Clear => {
                self.store.clear_highlights();
                self.clicks.reset();
                CommandReport::default()
            }
            HighlightCommand::SetActive(id) => {
                self.set_active(id);
                CommandReport::default()
            }
            HighlightCommand::Accept(id) => {
                let accepted = self.accept(&id)?;
                CommandReport {
                    accepted: Some(accepted.id),
                    ..Default::default()
                }
            }
        };
        Ok(report)
    }

    fn notify(&mut self, patch: &Patch) {
        for listener in self.listeners.iter_mut() {
            listener(patch);
        }
    }
}

impl From<ValidationReport> for CommandReport {
    fn from(report: ValidationReport) -> Self {
        Self {
            kept: report.kept,
            dropped: report.dropped,
            already_accepted: report.already_accepted,
            accepted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::annotations::kinds;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "She go to school every day.";

    fn engine() -> AnnotationEngine {
        AnnotationEngine::new(
            Document::from_text(TEXT),
            EngineOptions::default(),
            AnnotationCallbacks::new(),
        )
    }

    fn suggestion() -> HighlightCandidate {
        HighlightCandidate::new("s1", 4, 6, kinds::SUGGESTION).with_replacement(Some("go"), "goes")
    }

    fn ms(start: Instant, offset: u64) -> Instant {
        start + Duration::from_millis(offset)
    }

    #[test]
    fn test_double_click_accepts_suggestion() {
        // Given
        let accepted = Rc::new(RefCell::new(Vec::new()));
        let sink = accepted.clone();
        let mut engine = AnnotationEngine::new(
            Document::from_text(TEXT),
            EngineOptions::default(),
            AnnotationCallbacks::new().on_accept(move |h| sink.borrow_mut().push(h.id.clone())),
        );
        engine.set_highlights(vec![suggestion()]);
        let id = HighlightId::from("s1");
        let t0 = Instant::now();

        // When
        let first = engine.click(&id, t0);
        let second = engine.click(&id, ms(t0, 200));

        // Then
        assert_eq!(first, ClickOutcome::Unhandled(id.clone()));
        assert_eq!(second, ClickOutcome::Accepted(id.clone()));
        assert_eq!(engine.document().text(), "She goes to school every day.");
        assert!(engine.store().is_empty());
        assert!(engine.store().is_accepted(&id));
        assert_eq!(engine.store().active(), None);
        assert_eq!(*accepted.borrow(), vec![id]);
    }

    #[test]
    fn test_accept_applies_exactly_once() {
        let mut engine = engine();
        engine.set_highlights(vec![suggestion()]);
        let id = HighlightId::from("s1");

        engine.accept(&id).unwrap();
        let again = engine.accept(&id);

        assert_eq!(again, Err(AnnotationError::AlreadyAccepted(id)));
        assert_eq!(engine.document().text(), "She goes to school every day.");
        assert_eq!(engine.document().version(), 1);
    }

    #[test]
    fn test_triple_click_accepts_once() {
        let mut engine = engine();
        engine.set_highlights(vec![suggestion()]);
        let id = HighlightId::from("s1");
        let t0 = Instant::now();

        engine.click(&id, t0);
        engine.click(&id, ms(t0, 100));
        let third = engine.click(&id, ms(t0, 200));

        assert_eq!(third, ClickOutcome::UnknownHighlight(id));
        assert_eq!(engine.document().version(), 1);
    }

    #[test]
    fn test_stale_suggestion_is_not_applied() {
        let mut engine = engine();
        engine.set_highlights(vec![suggestion()]);
        engine
            .edit(Edit::Replace {
                range: 5..6,
                text: "p".to_string(),
            })
            .unwrap();
        let id = HighlightId::from("s1");

        let result = engine.accept(&id);

        assert_eq!(
            result,
            Err(AnnotationError::StaleSuggestion {
                id: id.clone(),
                expected: "go".to_string(),
                found: "gp".to_string(),
            })
        );
        assert!(!engine.store().is_accepted(&id));
        assert!(engine.store().get(&id).is_some());
    }

    #[test]
    fn test_single_clicks_route_to_callbacks() {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let suggestions = Rc::new(RefCell::new(Vec::new()));
        let (click_sink, suggestion_sink) = (clicks.clone(), suggestions.clone());
        let mut engine = AnnotationEngine::new(
            Document::from_text(TEXT),
            EngineOptions::default(),
            AnnotationCallbacks::new()
                .on_click(move |id| click_sink.borrow_mut().push(id.to_string()))
                .on_suggestion_click(move |h| suggestion_sink.borrow_mut().push(h.clone())),
        );
        engine.set_highlights(vec![
            HighlightCandidate::new("g", 0, 3, kinds::GRAMMAR),
            HighlightCandidate::new("t", 7, 9, kinds::TEXT_SUGGESTION).with_message("Article"),
        ]);
        let t0 = Instant::now();

        let grammar = engine.click(&"g".into(), t0);
        let text_suggestion = engine.click(&"t".into(), ms(t0, 1000));

        assert_eq!(grammar, ClickOutcome::ClickCallback("g".into()));
        assert_eq!(text_suggestion, ClickOutcome::SuggestionCallback("t".into()));
        assert_eq!(*clicks.borrow(), vec!["g".to_string()]);
        assert_eq!(suggestions.borrow()[0].message.as_deref(), Some("Article"));
        assert_eq!(engine.store().active(), Some(&HighlightId::from("t")));
    }

    #[test]
    fn test_slow_double_click_does_not_accept() {
        let mut engine = engine();
        engine.set_highlights(vec![suggestion()]);
        let id = HighlightId::from("s1");
        let t0 = Instant::now();

        engine.click(&id, t0);
        let second = engine.click(&id, ms(t0, 500));

        assert_eq!(second, ClickOutcome::Unhandled(id));
        assert_eq!(engine.document().text(), TEXT);
    }

    #[test]
    fn test_edit_remaps_and_notifies() {
        let patches = Rc::new(RefCell::new(Vec::new()));
        let sink = patches.clone();
        let mut engine = engine();
        engine.subscribe(move |patch| sink.borrow_mut().push(patch.clone()));
        engine.set_highlights(vec![HighlightCandidate::new(1, 7, 9, kinds::GRAMMAR)]);

        engine
            .edit(Edit::Insert {
                at: 0,
                text: "Yes, ".to_string(),
            })
            .unwrap();

        assert_eq!(engine.store().all()[0].range(), 12..14);
        assert_eq!(patches.borrow().len(), 1);
        assert_eq!(patches.borrow()[0].changed, vec![0..5]);
    }

    #[test]
    fn test_edit_dropping_active_highlight_clears_it() {
        let mut engine = engine();
        engine.set_highlights(vec![HighlightCandidate::new(1, 7, 9, kinds::GRAMMAR)]);
        engine.set_active(Some(HighlightId::Number(1)));

        engine.edit(Edit::Delete { range: 6..10 }).unwrap();

        assert!(engine.store().is_empty());
        assert_eq!(engine.store().active(), None);
    }

    #[test]
    fn test_out_of_bounds_edit_leaves_state_untouched() {
        let mut engine = engine();
        engine.set_highlights(vec![HighlightCandidate::new(1, 7, 9, kinds::GRAMMAR)]);

        let result = engine.edit(Edit::Delete { range: 20..40 });

        assert!(matches!(result, Err(DocumentError::OutOfBounds { .. })));
        assert_eq!(engine.document().version(), 0);
        assert_eq!(engine.store().all()[0].range(), 7..9);
    }

    #[test]
    fn test_commands_update_store() {
        let mut engine = engine();

        let report = engine
            .apply_command(HighlightCommand::Replace(vec![
                suggestion(),
                HighlightCandidate::new(2, 9, 3, kinds::GRAMMAR),
            ]))
            .unwrap();
        assert_eq!(
            report,
            CommandReport {
                kept: 1,
                dropped: 1,
                already_accepted: 0,
                accepted: None
            }
        );

        let report = engine
            .apply_command(HighlightCommand::Accept("s1".into()))
            .unwrap();
        assert_eq!(report.accepted, Some("s1".into()));

        let report = engine
            .apply_command(HighlightCommand::Extend(vec![suggestion()]))
            .unwrap();
        assert_eq!(report.already_accepted, 1);
        assert!(engine.store().is_empty());

        let missing = engine.apply_command(HighlightCommand::Remove(HighlightId::Number(5)));
        assert_eq!(
            missing,
            Err(AnnotationError::UnknownHighlight(HighlightId::Number(5)))
        );
    }

    #[test]
    fn test_accept_requires_replacement() {
        let mut engine = engine();
        engine.set_highlights(vec![HighlightCandidate::new("g", 0, 3, kinds::GRAMMAR)]);

        let result = engine.accept(&"g".into());

        assert_eq!(result, Err(AnnotationError::NotAcceptable("g".into())));
    }

    #[test]
    fn test_reset_document_forgets_everything() {
        let mut engine = engine();
        engine.set_highlights(vec![suggestion()]);
        engine.accept(&"s1".into()).unwrap();
        engine.set_highlights(vec![HighlightCandidate::new(1, 0, 3, kinds::GRAMMAR)]);
        engine.set_active(Some(HighlightId::Number(1)));

        let patch = engine.reset_document("A new essay.");

        assert_eq!(patch.changed, vec![0..12]);
        assert!(engine.store().is_empty());
        assert_eq!(engine.store().active(), None);
        assert!(!engine.store().is_accepted(&"s1".into()));
    }
}
