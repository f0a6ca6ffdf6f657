use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tutor_bridge_engine::{Highlight, RenderedHighlight, kinds};

pub fn kind_style(kind: &str) -> Style {
    match kind {
        kinds::GRAMMAR => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
        kinds::COHERENCE => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED),
        kinds::SUGGESTION | kinds::TEXT_SUGGESTION => Style::default().fg(Color::Green),
        kinds::REWRITE => Style::default().fg(Color::Blue),
        kinds::STRIKETHROUGH => Style::default().add_modifier(Modifier::CROSSED_OUT),
        _ => Style::default().fg(Color::Magenta),
    }
}

fn highlight_style(rendered: &RenderedHighlight) -> Style {
    let style = kind_style(&rendered.highlight.kind);
    if rendered.overlapping {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// Split `text` into styled lines.
///
/// Offsets are UTF-16 code units. Each position takes the style of the first
/// entry in `rendered` that covers it, so precedence follows render order.
pub fn document_lines(text: &str, rendered: &[RenderedHighlight]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut offset = 0;

    for ch in text.chars() {
        if ch == '\n' {
            flush(&mut spans, &mut run, run_style);
            lines.push(Line::from(std::mem::take(&mut spans)));
            offset += 1;
            continue;
        }

        let style = rendered
            .iter()
            .find(|r| r.highlight.start <= offset && offset < r.highlight.end)
            .map(highlight_style)
            .unwrap_or_default();
        if style != run_style {
            flush(&mut spans, &mut run, run_style);
            run_style = style;
        }
        run.push(ch);
        offset += ch.len_utf16();
    }

    flush(&mut spans, &mut run, run_style);
    lines.push(Line::from(spans));
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}

/// One-line description for the highlight list
pub fn highlight_label(highlight: &Highlight) -> String {
    let mut label = format!(
        "[{}] {} {}..{}",
        highlight.kind, highlight.id, highlight.start, highlight.end
    );
    if let Some(message) = &highlight.message {
        label.push_str(": ");
        label.push_str(message);
    }
    if let Some(correct) = &highlight.correct_version {
        label.push_str(&format!(" → {correct}"));
    }
    label
}
