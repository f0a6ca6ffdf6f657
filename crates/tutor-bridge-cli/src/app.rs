use anyhow::{Context, Result};
use ratatui::text::Line;
use ratatui::widgets::ListState;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tutor_bridge_config::{AnnotationConfig, Config};
use tutor_bridge_engine::{
    AnnotationCallbacks, AnnotationEngine, ClickOutcome, Document, EngineOptions, Highlight,
    HighlightId, KindPriority,
};
use tutor_bridge_protocol::{
    CapabilityRegistry, EnvelopeCodec, LoadingState, LoopbackChannel, NoSurface,
    RemoteActionProtocol, RpcInvocation, TextUpdate,
};

use crate::render;
use crate::script::{ActionScript, ScriptStep};

/// Element id the agent targets for the essay editor
pub const ESSAY_ELEMENT: &str = "essay";
/// Element id for the one-line status banner
pub const STATUS_ELEMENT: &str = "status";

const FEED_LIMIT: usize = 200;

pub fn engine_options(config: &AnnotationConfig) -> EngineOptions {
    EngineOptions {
        double_click_window: config.double_click_window(),
        kind_priority: KindPriority::new(config.kind_priority.iter().cloned()),
    }
}

type Feed = Rc<RefCell<Vec<String>>>;

fn push(feed: &Feed, entry: String) {
    let mut feed = feed.borrow_mut();
    feed.push(entry);
    if feed.len() > FEED_LIMIT {
        let excess = feed.len() - FEED_LIMIT;
        feed.drain(..excess);
    }
}

pub struct App {
    essay_path: PathBuf,
    engine: Rc<RefCell<AnnotationEngine>>,
    channel: LoopbackChannel,
    method_name: String,
    codec: EnvelopeCodec,
    script: ActionScript,
    feed: Feed,
    status: Rc<RefCell<String>>,
    pub list_state: ListState,
    sent: usize,
}

impl App {
    pub fn new(
        essay_path: PathBuf,
        document: Document,
        config: &Config,
        script: ActionScript,
    ) -> Result<Self> {
        let feed: Feed = Rc::new(RefCell::new(Vec::new()));

        let callbacks = {
            let clicked = feed.clone();
            let suggested = feed.clone();
            let accepted = feed.clone();
            AnnotationCallbacks::new()
                .on_click(move |id| push(&clicked, format!("Clicked '{id}'")))
                .on_suggestion_click(move |highlight| {
                    push(
                        &suggested,
                        format!(
                            "Suggestion '{}': {}",
                            highlight.id,
                            highlight.message.as_deref().unwrap_or("(no message)")
                        ),
                    )
                })
                .on_accept(move |highlight| {
                    push(&accepted, format!("Accepted '{}'", highlight.id))
                })
        };
        let engine = Rc::new(RefCell::new(AnnotationEngine::new(
            document,
            engine_options(&config.annotation),
            callbacks,
        )));

        let status = Rc::new(RefCell::new(String::new()));
        let mut registry = CapabilityRegistry::new();
        registry.register_engine(ESSAY_ELEMENT, engine.clone());
        {
            let status = status.clone();
            registry.register_text(STATUS_ELEMENT, move |update| match update {
                TextUpdate::Set(text) => *status.borrow_mut() = text,
                TextUpdate::Append(text) => status.borrow_mut().push_str(&text),
            });
        }
        {
            let feed = feed.clone();
            registry.register_loading(STATUS_ELEMENT, move |state: LoadingState| {
                let entry = match (state.is_loading, state.message) {
                    (true, Some(message)) => format!("Loading: {message}"),
                    (true, None) => "Loading".to_string(),
                    (false, _) => "Loaded".to_string(),
                };
                push(&feed, entry)
            });
        }
        {
            let feed = feed.clone();
            registry.register_navigator(move |page| push(&feed, format!("Navigate to {page}")));
        }

        let method_name = config.protocol.method_name.clone();
        let protocol = Rc::new(RefCell::new(
            RemoteActionProtocol::new(registry, NoSurface).with_method_name(method_name.clone()),
        ));
        let mut channel = LoopbackChannel::new();
        RemoteActionProtocol::register(protocol, &mut channel)?;

        Ok(Self {
            essay_path,
            engine,
            channel,
            method_name,
            codec: EnvelopeCodec::default(),
            script,
            feed,
            status,
            list_state: ListState::default(),
            sent: 0,
        })
    }

    /// Play the next scripted step: an envelope goes over the channel as the
    /// agent would send it, user steps go straight to the engine
    pub fn play_next_step(&mut self) -> Result<()> {
        let Some(step) = self.script.next_step().cloned() else {
            push(&self.feed, "No more scripted actions".to_string());
            return Ok(());
        };

        match step {
            ScriptStep::Envelope(payload) => self.deliver(payload)?,
            ScriptStep::Edit(edit) => {
                let patch = self.engine.borrow_mut().edit(edit)?;
                push(
                    &self.feed,
                    format!("Edited {:?} (v{})", patch.changed, patch.version),
                );
            }
            ScriptStep::Click(id) => self.click(&id),
        }
        self.clamp_selection();
        Ok(())
    }

    fn deliver(&mut self, payload: String) -> Result<()> {
        self.sent += 1;
        let invocation = RpcInvocation::new(format!("script-{}", self.sent), payload);
        let encoded = self.channel.perform(&self.method_name, &invocation)?;
        let response = self.codec.decode_response(&encoded)?;

        let outcome = if response.success { "ok" } else { "failed" };
        push(
            &self.feed,
            format!("[{}] {outcome}: {}", response.request_id, response.message),
        );
        Ok(())
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        self.engine.borrow().store().all().to_vec()
    }

    pub fn next_highlight(&mut self) {
        let count = self.engine.borrow().store().len();
        if count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_highlight(&mut self) {
        let count = self.engine.borrow().store().len();
        if count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Click the selected highlight; twice in quick succession accepts a suggestion
    pub fn click_selected(&mut self) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        let Some(id) = self
            .engine
            .borrow()
            .store()
            .all()
            .get(index)
            .map(|h| h.id.clone())
        else {
            return;
        };

        self.click(&id);
        self.clamp_selection();
    }

    fn click(&mut self, id: &HighlightId) {
        let outcome = self.engine.borrow_mut().click(id, Instant::now());
        log::debug!("Click outcome: {outcome:?}");
        match outcome {
            ClickOutcome::AcceptFailed { id, reason } => {
                push(&self.feed, format!("Could not accept '{id}': {reason}"))
            }
            ClickOutcome::UnknownHighlight(id) => {
                push(&self.feed, format!("No highlight '{id}' to click"))
            }
            _ => {}
        }
    }

    pub fn clear_focus(&mut self) {
        self.engine.borrow_mut().set_active(None);
    }

    pub fn save(&mut self) -> Result<()> {
        let bytes = self.engine.borrow().document().to_bytes();
        std::fs::write(&self.essay_path, bytes)
            .with_context(|| format!("Failed to save '{}'", self.essay_path.display()))?;
        log::info!("Saved {}", self.essay_path.display());
        push(&self.feed, format!("Saved {}", self.essay_path.display()));
        Ok(())
    }

    pub fn essay_lines(&self) -> Vec<Line<'static>> {
        let engine = self.engine.borrow();
        render::document_lines(&engine.document().text(), &engine.renderable())
    }

    pub fn essay_title(&self) -> String {
        let engine = self.engine.borrow();
        let status = self.status.borrow();
        let mut title = format!("Essay v{}", engine.document().version());
        if let Some(active) = engine.store().active() {
            title.push_str(&format!(" | focus: {active}"));
        }
        if !status.is_empty() {
            title.push_str(&format!(" | {status}"));
        }
        title
    }

    pub fn feed_tail(&self, count: usize) -> Vec<String> {
        let feed = self.feed.borrow();
        feed[feed.len().saturating_sub(count)..].to_vec()
    }

    pub fn remaining_actions(&self) -> usize {
        self.script.remaining()
    }

    /// Keep the list selection inside the (possibly shrunk) highlight list
    fn clamp_selection(&mut self) {
        let count = self.engine.borrow().store().len();
        match (self.list_state.selected(), count) {
            (_, 0) => self.list_state.select(None),
            (None, _) => self.list_state.select(Some(0)),
            (Some(i), count) if i >= count => self.list_state.select(Some(count - 1)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tempfile::TempDir;

    const SCRIPT: &str = r#"
# agent flags a spelling mistake, then posts a status line
{"requestId": "r1", "actionType": "SUGGEST_TEXT_EDIT", "targetElementId": "essay", "parameters": {"id": "7", "start": "19", "end": "25", "wrong_version": "libary", "correct_version": "library", "message": "Spelling"}}
{"requestId": "r2", "actionType": "UPDATE_TEXT_CONTENT", "targetElementId": "status", "parameters": {"text": "Checking spelling"}}
{"requestId": "r3", "actionType": "UPDATE_TEXT_CONTENT", "targetElementId": "nowhere", "parameters": {"text": "lost"}}
# the writer fixes the first word, then clicks the suggestion twice
:delete 0 5
:insert 0 They're
:click 7
:click 7
"#;

    fn app(temp_dir: &TempDir) -> App {
        let essay_path = temp_dir.path().join("essay.txt");
        App::new(
            essay_path,
            Document::from_text("Their going to the libary tomorow."),
            &Config::default(),
            ActionScript::parse(SCRIPT).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_engine_options_from_config() {
        let config = AnnotationConfig {
            double_click_window_ms: 250,
            kind_priority: vec!["rewrite".to_string(), "grammar".to_string()],
        };

        let options = engine_options(&config);

        assert_eq!(options.double_click_window, Duration::from_millis(250));
        assert!(options.kind_priority.rank("rewrite") < options.kind_priority.rank("grammar"));
    }

    #[test]
    fn test_scripted_actions_reach_engine_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        app.play_next_step().unwrap();
        app.play_next_step().unwrap();
        app.play_next_step().unwrap();

        assert_eq!(app.highlights().len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.essay_title(), "Essay v0 | Checking spelling");
        assert_eq!(
            app.feed_tail(1),
            vec!["[r3] failed: Error: Element 'nowhere' not found.".to_string()]
        );
    }

    #[test]
    fn test_scripted_user_steps_edit_and_accept() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        while app.remaining_actions() > 0 {
            app.play_next_step().unwrap();
        }

        // The suggestion was remapped past the edit before it was accepted
        assert_eq!(
            app.engine.borrow().document().text(),
            "They're going to the library tomorow."
        );
        assert!(app.highlights().is_empty());
        assert_eq!(app.feed_tail(1), vec!["Accepted '7'".to_string()]);

        app.play_next_step().unwrap();
        assert_eq!(app.feed_tail(1), vec!["No more scripted actions".to_string()]);
    }

    #[test]
    fn test_double_click_accepts_and_save_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        app.play_next_step().unwrap();

        // Given a selected suggestion, when it is clicked twice quickly
        app.click_selected();
        app.click_selected();

        // Then the replacement is applied and the highlight is gone
        assert!(app.highlights().is_empty());
        assert_eq!(app.list_state.selected(), None);
        assert_eq!(app.feed_tail(1), vec!["Accepted '7'".to_string()]);

        app.save().unwrap();
        let saved = std::fs::read_to_string(temp_dir.path().join("essay.txt")).unwrap();
        assert_eq!(saved, "Their going to the library tomorow.");
    }

    #[test]
    fn test_selection_wraps() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);
        app.play_next_step().unwrap();

        app.previous_highlight();
        assert_eq!(app.list_state.selected(), Some(0));
        app.next_highlight();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
