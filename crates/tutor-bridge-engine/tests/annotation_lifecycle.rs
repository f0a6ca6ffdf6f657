use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tutor_bridge_engine::{
    AnnotationCallbacks, AnnotationEngine, ClickOutcome, Document, Edit, EngineOptions,
    HighlightCandidate, HighlightCommand, HighlightId, KindPriority, kinds,
};

const ESSAY: &str = "Yesterday I go to the park and seen a dog.";

fn engine() -> AnnotationEngine {
    AnnotationEngine::new(
        Document::from_text(ESSAY),
        EngineOptions::default(),
        AnnotationCallbacks::new(),
    )
}

#[test]
fn inverted_highlight_is_dropped() {
    let mut engine = engine();

    let report = engine.set_highlights(vec![HighlightCandidate::new(1, 5, 3, kinds::GRAMMAR)]);

    assert_eq!(report.dropped, 1);
    assert!(engine.renderable().is_empty());
}

#[test]
fn nested_highlights_render_with_overlap_flag() {
    let mut engine = engine();
    engine.set_highlights(vec![
        HighlightCandidate::new("a", 0, 10, kinds::GRAMMAR),
        HighlightCandidate::new("b", 5, 8, kinds::SUGGESTION),
    ]);

    insta::assert_yaml_snapshot!(engine.renderable(), @r"
    - id: a
      start: 0
      end: 10
      kind: grammar
      overlapping: false
    - id: b
      start: 5
      end: 8
      kind: suggestion
      overlapping: true
    ");
}

#[test]
fn insertion_before_highlight_shifts_it() {
    let mut engine = engine();
    engine.set_highlights(vec![HighlightCandidate::new("h", 5, 10, kinds::REWRITE)]);

    engine
        .edit(Edit::Insert {
            at: 2,
            text: "abc".to_string(),
        })
        .unwrap();

    let rendered = engine.renderable();
    assert_eq!(rendered[0].highlight.range(), 8..13);
}

#[test]
fn renderable_highlights_stay_in_bounds_after_edits() {
    let mut engine = engine();
    engine.set_highlights(vec![
        HighlightCandidate::new(1, 0, 9, kinds::GRAMMAR),
        HighlightCandidate::new(2, 12, 14, kinds::GRAMMAR),
        HighlightCandidate::new(3, 30, 34, kinds::SUGGESTION),
        HighlightCandidate::new(4, 38, 42, kinds::COHERENCE),
    ]);

    let edits = [
        Edit::Delete { range: 10..20 },
        Edit::Insert {
            at: 0,
            text: "Ünïcödé ".to_string(),
        },
        Edit::Replace {
            range: 20..35,
            text: "😀".to_string(),
        },
    ];
    for edit in edits {
        engine.edit(edit).unwrap();
        let len = engine.document().len();
        for rendered in engine.renderable() {
            let h = rendered.highlight;
            assert!(h.start < h.end, "{h:?} is empty");
            assert!(h.end <= len, "{h:?} exceeds {len}");
        }
    }
}

#[test]
fn agent_driven_suggestion_is_accepted_by_double_click() {
    // Given an agent pushed a correction and narrated it
    let mut engine = AnnotationEngine::new(
        Document::from_text(ESSAY),
        EngineOptions {
            double_click_window: Duration::from_millis(300),
            kind_priority: KindPriority::default(),
        },
        AnnotationCallbacks::new(),
    );
    engine
        .apply_command(HighlightCommand::Replace(vec![
            HighlightCandidate::new("past", 12, 14, kinds::SUGGESTION)
                .with_replacement(Some("go"), "went"),
            HighlightCandidate::new("seen", 31, 35, kinds::SUGGESTION)
                .with_replacement(Some("seen"), "saw"),
        ]))
        .unwrap();
    engine
        .apply_command(HighlightCommand::SetActive(Some("past".into())))
        .unwrap();
    assert_eq!(engine.renderable().len(), 1);

    // When the reader double-clicks it
    let id = HighlightId::from("past");
    let t0 = Instant::now();
    engine.click(&id, t0);
    let outcome = engine.click(&id, t0 + Duration::from_millis(250));

    // Then the text changes once and the other suggestion still points at "seen"
    assert_eq!(outcome, ClickOutcome::Accepted(id.clone()));
    assert_eq!(
        engine.document().text(),
        "Yesterday I went to the park and seen a dog."
    );
    let remaining = engine.store().get(&"seen".into()).unwrap().clone();
    assert_eq!(engine.document().slice(remaining.range()).unwrap(), "seen");

    // And accepting the same id again is refused
    assert!(engine.apply_command(HighlightCommand::Accept(id)).is_err());
    assert_eq!(engine.document().version(), 1);
}
