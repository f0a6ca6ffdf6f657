//! Maps each [`ActionType`] to its handler.
//!
//! Every handler tries the registered capability for the target first and,
//! for the kinds that have one, falls back to manipulating the live element
//! directly. The dispatcher keeps no state between requests.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tutor_bridge_engine::{
    AnnotationError, CommandReport, HighlightCandidate, HighlightCommand, HighlightId, kinds,
};

use crate::error::ActionError;
use crate::params::Parameters;
use crate::registry::{
    ButtonOption, ButtonUpdate, CapabilityRegistry, ContentMode, EditorContent, EditorPayload,
    LoadingState, Progress, ReadonlyRange, Score, TextUpdate, TimerCommand, TranscriptLine,
    VisibilityChange,
};
use crate::schema::{ActionRequest, ActionResponse, ActionType};
use crate::surface::{ElementSurface, LiveElement};

/// How a request was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A registered updater handled it
    Capability,
    /// No updater; the live element was changed directly
    DirectElementFallback,
    /// Nothing handled it (unknown kind, missing element, bad parameters)
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub response: ActionResponse,
    pub resolution: Resolution,
}

struct Handled {
    resolution: Resolution,
    summary: String,
}

impl Handled {
    fn capability(summary: String) -> Self {
        Self {
            resolution: Resolution::Capability,
            summary,
        }
    }

    fn fallback(summary: String) -> Self {
        Self {
            resolution: Resolution::DirectElementFallback,
            summary,
        }
    }

    fn message(&self) -> String {
        match self.resolution {
            Resolution::DirectElementFallback => format!("{} (via element fallback).", self.summary),
            _ => format!("{}.", self.summary),
        }
    }
}

struct ActionContext<'a> {
    action: ActionType,
    target: &'a str,
    params: Parameters<'a>,
    registry: &'a CapabilityRegistry,
    surface: &'a mut dyn ElementSurface,
}

impl<'a> ActionContext<'a> {
    fn target(&self) -> Result<&'a str, ActionError> {
        if self.target.trim().is_empty() {
            return Err(ActionError::MissingTarget(self.action.as_str_name()));
        }
        Ok(self.target)
    }

    fn element(&mut self) -> Result<&mut dyn LiveElement, ActionError> {
        let target = self.target;
        self.surface
            .element_mut(target)
            .ok_or_else(|| ActionError::ElementNotFound(target.to_string()))
    }

    fn missing(&self, capability: &'static str) -> ActionError {
        ActionError::MissingCapability {
            capability,
            target: self.target.to_string(),
        }
    }
}

type Handler = fn(&mut ActionContext<'_>) -> Result<Handled, ActionError>;

fn handler_for(action: ActionType) -> Handler {
    match action {
        ActionType::Unspecified => unspecified,
        ActionType::UpdateTextContent => update_text_content,
        ActionType::AppendTextContent => append_text_content,
        ActionType::DisplayText => display_text,
        ActionType::UpdateTranscript => update_transcript,
        ActionType::ClearInput => clear_input,
        ActionType::ShowElement => show_element,
        ActionType::HideElement => hide_element,
        ActionType::ToggleElementVisibility => toggle_visibility,
        ActionType::SetVisibility => set_visibility,
        ActionType::SetEditorContent => set_editor_content,
        ActionType::AppendEditorContent => append_editor_content,
        ActionType::SetReadonlyRanges => set_readonly_ranges,
        ActionType::StartTimer => start_timer,
        ActionType::StopTimer => stop_timer,
        ActionType::PauseTimer => pause_timer,
        ActionType::ResetTimer => reset_timer,
        ActionType::UpdateProgress => update_progress,
        ActionType::UpdateScore => update_score,
        ActionType::NavigateToPage => navigate_to_page,
        ActionType::SetButtonProperties => set_button_properties,
        ActionType::EnableButton => enable_button,
        ActionType::DisableButton => disable_button,
        ActionType::ShowButtonOptions => show_button_options,
        ActionType::SetLoadingState => set_loading_state,
        ActionType::HighlightTextRanges => highlight_text_ranges,
        ActionType::StrikethroughTextRanges => strikethrough_text_ranges,
        ActionType::SuggestTextEdit => suggest_text_edit,
        ActionType::ShowTooltip => show_tooltip,
        ActionType::ClearHighlights => clear_highlights,
        ActionType::SetActiveHighlight => set_active_highlight,
        ActionType::AcceptSuggestion => accept_suggestion,
    }
}

/// Perform one decoded request. Always produces a response; failures become
/// `success = false` with an `Error: ...` message.
pub fn dispatch(
    request: &ActionRequest,
    registry: &CapabilityRegistry,
    surface: &mut dyn ElementSurface,
) -> DispatchOutcome {
    let result = match ActionType::try_from(request.action_type) {
        Ok(action) => {
            log::debug!(
                "Dispatching {} '{}' to '{}'",
                action.as_str_name(),
                request.request_id,
                request.target_element_id
            );
            let mut ctx = ActionContext {
                action,
                target: &request.target_element_id,
                params: Parameters::new(&request.parameters),
                registry,
                surface,
            };
            handler_for(action)(&mut ctx)
        }
        Err(_) => Err(ActionError::UnknownAction(request.action_type)),
    };

    match result {
        Ok(handled) => DispatchOutcome {
            response: ActionResponse::ok(&request.request_id, handled.message()),
            resolution: handled.resolution,
        },
        Err(error) => {
            log::debug!("Request '{}' failed: {error}", request.request_id);
            DispatchOutcome {
                response: ActionResponse::failure(&request.request_id, &error),
                resolution: Resolution::Unsupported,
            }
        }
    }
}

fn unspecified(_: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    Err(ActionError::UnknownAction(ActionType::Unspecified as i32))
}

// Text

fn update_text_content(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let text = ctx.params.require("text")?;
    let summary = format!("Text content of '{target}' updated");

    if let Some(update) = ctx.registry.text(target) {
        update(TextUpdate::Set(text.to_string()));
        return Ok(Handled::capability(summary));
    }
    ctx.element()?.set_text_content(text);
    Ok(Handled::fallback(summary))
}

fn append_text_content(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let chunk = ctx
        .params
        .first_of(&["text_chunk", "text"])
        .ok_or(ActionError::MissingParameter("text_chunk"))?;
    let summary = format!("Text appended to '{target}'");

    if let Some(update) = ctx.registry.text(target) {
        update(TextUpdate::Append(chunk.to_string()));
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    let text = element.text_content() + chunk;
    element.set_text_content(&text);
    Ok(Handled::fallback(summary))
}

fn display_text(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let text = ctx.params.require("text")?;
    let visible = ctx.params.flag("visible")?.unwrap_or(true);
    let summary = format!("Text displayed in '{target}'");

    if let Some(update) = ctx.registry.text(target) {
        update(TextUpdate::Set(text.to_string()));
        if let Some(show) = ctx.registry.visibility(target) {
            show(VisibilityChange::from_flag(visible));
        }
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    element.set_text_content(text);
    element.set_displayed(visible);
    Ok(Handled::fallback(summary))
}

fn update_transcript(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let line = TranscriptLine {
        text: ctx.params.require("text")?.to_string(),
        speaker: ctx.params.get("speaker").map(str::to_string),
        is_final: ctx.params.flag("is_final")?.unwrap_or(false),
    };
    let summary = format!("Transcript '{target}' updated");

    if let Some(update) = ctx.registry.transcript(target) {
        update(line);
        return Ok(Handled::capability(summary));
    }
    let rendered = match &line.speaker {
        Some(speaker) => format!("{speaker}: {}", line.text),
        None => line.text,
    };
    let element = ctx.element()?;
    let existing = element.text_content();
    let text = if existing.is_empty() {
        rendered
    } else {
        format!("{existing}\n{rendered}")
    };
    element.set_text_content(&text);
    Ok(Handled::fallback(summary))
}

fn clear_input(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let summary = format!("Input '{target}' cleared");

    if let Some(clear) = ctx.registry.input_clear(target) {
        clear(());
        return Ok(Handled::capability(summary));
    }
    ctx.element()?.set_attribute("value", "");
    Ok(Handled::fallback(summary))
}

// Visibility

fn change_visibility(
    ctx: &mut ActionContext<'_>,
    change: VisibilityChange,
    summary: String,
) -> Result<Handled, ActionError> {
    if let Some(update) = ctx.registry.visibility(ctx.target()?) {
        update(change);
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    let displayed = match change {
        VisibilityChange::Show => true,
        VisibilityChange::Hide => false,
        VisibilityChange::Toggle => !element.is_displayed(),
    };
    element.set_displayed(displayed);
    Ok(Handled::fallback(summary))
}

fn show_element(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let summary = format!("Element '{}' shown", ctx.target()?);
    change_visibility(ctx, VisibilityChange::Show, summary)
}

fn hide_element(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let summary = format!("Element '{}' hidden", ctx.target()?);
    change_visibility(ctx, VisibilityChange::Hide, summary)
}

fn toggle_visibility(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let (change, summary) = match ctx.params.flag("force_state")? {
        Some(visible) => (
            VisibilityChange::from_flag(visible),
            format!("Visibility of '{target}' forced to {visible}"),
        ),
        None => (
            VisibilityChange::Toggle,
            format!("Visibility of '{target}' toggled"),
        ),
    };
    change_visibility(ctx, change, summary)
}

fn set_visibility(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let visible = ctx.params.require_flag("visible")?;
    let summary = format!("Visibility of '{target}' set to {visible}");
    change_visibility(ctx, VisibilityChange::from_flag(visible), summary)
}

// Editor

fn editor_payload(params: &Parameters<'_>) -> Result<EditorPayload, ActionError> {
    if let Some(html) = params.get("html_content") {
        return Ok(EditorPayload::Html(html.to_string()));
    }
    if params.get("json_content").is_some() {
        return Ok(EditorPayload::Json(params.json("json_content")?));
    }
    Err(ActionError::MissingParameter("html_content or json_content"))
}

fn editor_content(
    ctx: &mut ActionContext<'_>,
    mode: ContentMode,
    summary: String,
) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let payload = editor_payload(&ctx.params)?;
    let update = ctx
        .registry
        .editor(target)
        .ok_or_else(|| ctx.missing("editor content updater"))?;
    update(EditorContent { mode, payload });
    Ok(Handled::capability(summary))
}

fn set_editor_content(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let summary = format!("Editor content of '{}' set", ctx.target()?);
    editor_content(ctx, ContentMode::Set, summary)
}

fn append_editor_content(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let summary = format!("Editor content appended to '{}'", ctx.target()?);
    editor_content(ctx, ContentMode::Append, summary)
}

fn set_readonly_ranges(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let ranges: Vec<ReadonlyRange> = ctx.params.json("ranges")?;
    if let Some(bad) = ranges.iter().find(|r| r.start > r.end) {
        return Err(ActionError::InvalidParameter {
            name: "ranges",
            value: format!("{}..{}", bad.start, bad.end),
            reason: "start is after end".to_string(),
        });
    }
    let update = ctx
        .registry
        .readonly_ranges(target)
        .ok_or_else(|| ctx.missing("read-only range updater"))?;
    let count = ranges.len();
    update(ranges);
    Ok(Handled::capability(format!(
        "{count} read-only range(s) set on '{target}'"
    )))
}

// Timers

fn duration_param(
    params: &Parameters<'_>,
    name: &'static str,
) -> Result<Option<Duration>, ActionError> {
    let Some(seconds) = params.number::<f64>(name)? else {
        return Ok(None);
    };
    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|e| ActionError::InvalidParameter {
            name,
            value: seconds.to_string(),
            reason: e.to_string(),
        })
}

fn timer(
    ctx: &mut ActionContext<'_>,
    command: TimerCommand,
    verb: &str,
) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let control = ctx
        .registry
        .timers(target)
        .ok_or_else(|| ctx.missing("timer controller"))?;
    control(command);
    Ok(Handled::capability(format!("Timer '{target}' {verb}")))
}

fn start_timer(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let duration = duration_param(&ctx.params, "duration_seconds")?
        .ok_or(ActionError::MissingParameter("duration_seconds"))?;
    let verb = format!("started for {}s", duration.as_secs_f64());
    timer(ctx, TimerCommand::Start { duration }, &verb)
}

fn stop_timer(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    timer(ctx, TimerCommand::Stop, "stopped")
}

fn pause_timer(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    timer(ctx, TimerCommand::Pause, "paused")
}

fn reset_timer(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let duration = duration_param(&ctx.params, "duration_seconds")?;
    timer(ctx, TimerCommand::Reset { duration }, "reset")
}

// Progress, score, navigation

fn update_progress(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let progress = match ctx.params.number::<f64>("percentage")? {
        Some(percentage) => Progress::Percentage(percentage),
        None => Progress::Fraction {
            current: ctx.params.require_number("current")?,
            total: ctx.params.require_number("total")?,
        },
    };
    let update = ctx
        .registry
        .progress(target)
        .ok_or_else(|| ctx.missing("progress updater"))?;
    update(progress);
    Ok(Handled::capability(format!("Progress of '{target}' updated")))
}

fn update_score(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let score = Score {
        score: ctx.params.require_number("score")?,
        max_score: ctx.params.number("max_score")?,
    };
    let update = ctx
        .registry
        .score(target)
        .ok_or_else(|| ctx.missing("score updater"))?;
    update(score);
    Ok(Handled::capability(format!("Score of '{target}' updated")))
}

fn navigate_to_page(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let page = ctx.params.require("page_name")?.trim();
    if page.is_empty() {
        return Err(ActionError::MissingParameter("page_name"));
    }
    let navigate = ctx.registry.navigator().ok_or(ActionError::NoNavigator)?;
    navigate(page.to_string());
    Ok(Handled::capability(format!("Navigated to '{page}'")))
}

// Buttons

fn set_button_properties(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let label = ctx.params.get("label");
    let disabled = ctx.params.flag("disabled")?;
    let style = ctx.params.get("style");
    if label.is_none() && disabled.is_none() && style.is_none() {
        return Err(ActionError::MissingParameter("label, disabled or style"));
    }
    let summary = format!("Button '{target}' updated");

    if let Some(update) = ctx.registry.buttons(target) {
        update(ButtonUpdate::Properties {
            label: label.map(str::to_string),
            disabled,
            style: style.map(str::to_string),
        });
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    if let Some(label) = label {
        element.set_text_content(label);
    }
    match disabled {
        Some(true) => element.set_attribute("disabled", ""),
        Some(false) => element.remove_attribute("disabled"),
        None => {}
    }
    if style.is_some() {
        log::debug!("Button '{target}' has no updater; style ignored");
    }
    Ok(Handled::fallback(summary))
}

fn toggle_button(ctx: &mut ActionContext<'_>, enabled: bool) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let summary = format!(
        "Button '{target}' {}",
        if enabled { "enabled" } else { "disabled" }
    );

    if let Some(update) = ctx.registry.buttons(target) {
        update(if enabled {
            ButtonUpdate::Enable
        } else {
            ButtonUpdate::Disable
        });
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    if enabled {
        element.remove_attribute("disabled");
    } else {
        element.set_attribute("disabled", "");
    }
    Ok(Handled::fallback(summary))
}

fn enable_button(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    toggle_button(ctx, true)
}

fn disable_button(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    toggle_button(ctx, false)
}

fn show_button_options(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let options: Vec<ButtonOption> = ctx.params.json("buttons")?;
    let update = ctx
        .registry
        .buttons(target)
        .ok_or_else(|| ctx.missing("button updater"))?;
    let count = options.len();
    update(ButtonUpdate::Options(options));
    Ok(Handled::capability(format!(
        "{count} option(s) shown on '{target}'"
    )))
}

fn set_loading_state(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let state = LoadingState {
        is_loading: ctx.params.require_flag("is_loading")?,
        message: ctx.params.get("message").map(str::to_string),
    };
    let summary = format!("Loading state of '{target}' set to {}", state.is_loading);

    if let Some(update) = ctx.registry.loading(target) {
        update(state);
        return Ok(Handled::capability(summary));
    }
    let element = ctx.element()?;
    element.set_displayed(state.is_loading);
    if let Some(message) = &state.message {
        element.set_text_content(message);
    }
    Ok(Handled::fallback(summary))
}

// Annotations

fn send_highlights(
    ctx: &mut ActionContext<'_>,
    command: HighlightCommand,
) -> Result<CommandReport, ActionError> {
    let target = ctx.target()?;
    let update = ctx
        .registry
        .highlights(target)
        .ok_or_else(|| ctx.missing("highlight updater"))?;
    Ok(update(command)?)
}

/// Parse a JSON array entry by entry; entries of the wrong shape are skipped
/// and counted so the rest of the batch still applies
fn array_entries<T: DeserializeOwned>(
    ctx: &ActionContext<'_>,
    name: &'static str,
) -> Result<(Vec<T>, usize), ActionError> {
    let entries: Vec<Value> = ctx.params.json(name)?;
    let mut parsed = Vec::with_capacity(entries.len());
    let mut malformed = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => parsed.push(item),
            Err(e) => {
                log::warn!("Skipping malformed '{name}' entry {index}: {e}");
                malformed += 1;
            }
        }
    }
    Ok((parsed, malformed))
}

fn highlight_text_ranges(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let (candidates, malformed) = array_entries::<HighlightCandidate>(ctx, "highlights")?;
    let mut report = send_highlights(ctx, HighlightCommand::Replace(candidates))?;
    report.dropped += malformed;
    Ok(Handled::capability(format!(
        "Highlights on '{target}' updated ({} kept, {} dropped)",
        report.kept, report.dropped
    )))
}

#[derive(Debug, Deserialize)]
struct StrikeRange {
    #[serde(default)]
    id: Option<HighlightId>,
    start: i64,
    end: i64,
    #[serde(default)]
    message: Option<String>,
}

fn strikethrough_text_ranges(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let (ranges, malformed) = array_entries::<StrikeRange>(ctx, "ranges")?;
    let candidates = ranges
        .into_iter()
        .map(|range| HighlightCandidate {
            id: range.id,
            start: range.start,
            end: range.end,
            kind: kinds::STRIKETHROUGH.to_string(),
            message: range.message,
            ..Default::default()
        })
        .collect();
    let mut report = send_highlights(ctx, HighlightCommand::Extend(candidates))?;
    report.dropped += malformed;
    Ok(Handled::capability(format!(
        "Strikethrough on '{target}' updated ({} kept, {} dropped)",
        report.kept, report.dropped
    )))
}

/// Add one highlight built from discrete parameters. A rejected highlight fails
/// the action: an accepted id is reported as such, anything else as a bad range.
fn single_highlight(
    ctx: &mut ActionContext<'_>,
    kind: &str,
    message: Option<&str>,
    replacement: Option<(Option<&str>, &str)>,
) -> Result<(), ActionError> {
    let start: i64 = ctx.params.require_number("start")?;
    let end: i64 = ctx.params.require_number("end")?;
    let id: Option<HighlightId> = ctx.params.get("id").and_then(|id| id.parse().ok());
    let mut candidate = HighlightCandidate {
        id: id.clone(),
        start,
        end,
        kind: kind.to_string(),
        message: message.map(str::to_string),
        ..Default::default()
    };
    if let Some((wrong, correct)) = replacement {
        candidate = candidate.with_replacement(wrong, correct);
    }

    let report = send_highlights(ctx, HighlightCommand::Extend(vec![candidate]))?;
    if report.kept == 0 {
        return Err(match id {
            Some(id) if report.already_accepted > 0 => AnnotationError::AlreadyAccepted(id).into(),
            _ => ActionError::InvalidRange { start, end },
        });
    }
    Ok(())
}

fn suggest_text_edit(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let params = ctx.params;
    let correct = params.require("correct_version")?;
    let replacement = Some((params.get("wrong_version"), correct));
    single_highlight(ctx, kinds::SUGGESTION, params.get("message"), replacement)?;
    Ok(Handled::capability(format!("Suggestion added to '{target}'")))
}

fn show_tooltip(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let message = ctx.params.require("message")?;
    single_highlight(ctx, kinds::TOOLTIP, Some(message), None)?;
    Ok(Handled::capability(format!("Tooltip added to '{target}'")))
}

fn clear_highlights(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    send_highlights(ctx, HighlightCommand::Clear)?;
    Ok(Handled::capability(format!("Highlights on '{target}' cleared")))
}

fn set_active_highlight(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let id = ctx
        .params
        .get("highlight_id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .and_then(|id| id.parse::<HighlightId>().ok());
    let summary = match &id {
        Some(id) => format!("Active highlight on '{target}' set to '{id}'"),
        None => format!("Active highlight on '{target}' cleared"),
    };
    send_highlights(ctx, HighlightCommand::SetActive(id))?;
    Ok(Handled::capability(summary))
}

fn accept_suggestion(ctx: &mut ActionContext<'_>) -> Result<Handled, ActionError> {
    let target = ctx.target()?;
    let Ok(id) = ctx.params.require("highlight_id")?.parse::<HighlightId>();
    send_highlights(ctx, HighlightCommand::Accept(id.clone()))?;
    Ok(Handled::capability(format!(
        "Suggestion '{id}' accepted in '{target}'"
    )))
}
