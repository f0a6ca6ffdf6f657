//! Application-supplied capabilities, keyed by UI element id.
//!
//! The host registers one updater per element and concern when it mounts a
//! region; the dispatcher only ever reads the registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;
use tutor_bridge_engine::{AnnotationEngine, AnnotationError, CommandReport, HighlightCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextUpdate {
    Set(String),
    Append(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Show,
    Hide,
    Toggle,
}

impl VisibilityChange {
    pub fn from_flag(visible: bool) -> Self {
        if visible { Self::Show } else { Self::Hide }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    Set,
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorPayload {
    Html(String),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorContent {
    pub mode: ContentMode,
    pub payload: EditorPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub text: String,
    pub speaker: Option<String>,
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReadonlyRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start { duration: Duration },
    Stop,
    Pause,
    Reset { duration: Option<Duration> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Fraction { current: f64, total: f64 },
    Percentage(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub score: f64,
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ButtonOption {
    pub label: String,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonUpdate {
    Properties {
        label: Option<String>,
        disabled: Option<bool>,
        style: Option<String>,
    },
    Enable,
    Disable,
    Options(Vec<ButtonOption>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub message: Option<String>,
}

pub type Updater<T> = Box<dyn Fn(T)>;
pub type HighlightUpdater = Box<dyn Fn(HighlightCommand) -> Result<CommandReport, AnnotationError>>;

/// Element id → typed updater, one map per concern
#[derive(Default)]
pub struct CapabilityRegistry {
    text: HashMap<String, Updater<TextUpdate>>,
    visibility: HashMap<String, Updater<VisibilityChange>>,
    editor: HashMap<String, Updater<EditorContent>>,
    transcript: HashMap<String, Updater<TranscriptLine>>,
    input_clear: HashMap<String, Updater<()>>,
    readonly_ranges: HashMap<String, Updater<Vec<ReadonlyRange>>>,
    timers: HashMap<String, Updater<TimerCommand>>,
    progress: HashMap<String, Updater<Progress>>,
    score: HashMap<String, Updater<Score>>,
    buttons: HashMap<String, Updater<ButtonUpdate>>,
    loading: HashMap<String, Updater<LoadingState>>,
    highlights: HashMap<String, HighlightUpdater>,
    navigator: Option<Updater<String>>,
}

macro_rules! capability {
    ($field:ident, $register:ident, $ty:ty) => {
        pub fn $register(&mut self, id: impl Into<String>, updater: impl Fn($ty) + 'static) -> &mut Self {
            self.$field.insert(id.into(), Box::new(updater));
            self
        }

        pub fn $field(&self, id: &str) -> Option<&Updater<$ty>> {
            self.$field.get(id)
        }
    };
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    capability!(text, register_text, TextUpdate);
    capability!(visibility, register_visibility, VisibilityChange);
    capability!(editor, register_editor, EditorContent);
    capability!(transcript, register_transcript, TranscriptLine);
    capability!(input_clear, register_input_clear, ());
    capability!(readonly_ranges, register_readonly_ranges, Vec<ReadonlyRange>);
    capability!(timers, register_timer, TimerCommand);
    capability!(progress, register_progress, Progress);
    capability!(score, register_score, Score);
    capability!(buttons, register_button, ButtonUpdate);
    capability!(loading, register_loading, LoadingState);

    pub fn register_highlights(
        &mut self,
        id: impl Into<String>,
        updater: impl Fn(HighlightCommand) -> Result<CommandReport, AnnotationError> + 'static,
    ) -> &mut Self {
        self.highlights.insert(id.into(), Box::new(updater));
        self
    }

    /// Route the highlight commands for `id` into a shared annotation engine
    pub fn register_engine(
        &mut self,
        id: impl Into<String>,
        engine: Rc<RefCell<AnnotationEngine>>,
    ) -> &mut Self {
        self.register_highlights(id, move |command| engine.borrow_mut().apply_command(command))
    }

    pub fn highlights(&self, id: &str) -> Option<&HighlightUpdater> {
        self.highlights.get(id)
    }

    /// The page navigator is global, not keyed by element
    pub fn register_navigator(&mut self, navigator: impl Fn(String) + 'static) -> &mut Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn navigator(&self) -> Option<&Updater<String>> {
        self.navigator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_is_per_concern() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut registry = CapabilityRegistry::new();
        registry.register_text("t1", move |update| sink.borrow_mut().push(update));

        assert!(registry.visibility("t1").is_none());
        let updater = registry.text("t1").unwrap();
        updater(TextUpdate::Set("hello".to_string()));

        assert_eq!(*seen.borrow(), vec![TextUpdate::Set("hello".to_string())]);
    }
}
