use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};
use tutor_bridge_config::Config;
use tutor_bridge_engine::Document;

mod app;
mod render;
mod script;

use app::App;
use script::ActionScript;

fn init_logging(config: &Config) -> Result<()> {
    let level = config.log_level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!(
            "Warning: unknown log level '{}', using info",
            config.log_level
        );
        log::LevelFilter::Info
    });

    // Logs go to a file while the UI owns the terminal
    let log_path = config.log_path();
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <essay-file> [action-script]", args[0]);
        process::exit(1);
    }

    let config_path = Config::config_path();
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    init_logging(&config)?;
    log::info!("tutor-bridge starting up, config path: {}", config_path.display());

    let raw_essay_path = PathBuf::from(&args[1]);
    let essay_path = Config::expand_path(&raw_essay_path).unwrap_or(raw_essay_path);
    let bytes = match std::fs::read(&essay_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot read essay '{}': {e}", essay_path.display());
            process::exit(1);
        }
    };
    let document = Document::from_bytes(&bytes)?;

    let script = match args.get(2) {
        Some(path) => ActionScript::load(&PathBuf::from(path))?,
        None => ActionScript::default(),
    };

    let mut app = App::new(essay_path, document, &config, script)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_highlight(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_highlight(),
                KeyCode::Enter | KeyCode::Char(' ') => app.click_selected(),
                KeyCode::Esc => app.clear_focus(),
                KeyCode::Char('n') => {
                    if let Err(e) = app.play_next_step() {
                        log::error!("Scripted step failed: {e:#}");
                    }
                }
                KeyCode::Char('s') => {
                    if let Err(e) = app.save() {
                        log::error!("{e:#}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[0]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(columns[1]);

    // Essay panel
    let essay = Paragraph::new(app.essay_lines())
        .block(Block::default().borders(Borders::ALL).title(app.essay_title()))
        .wrap(Wrap { trim: false });
    f.render_widget(essay, columns[0]);

    // Highlight list panel
    let items: Vec<ListItem> = app
        .highlights()
        .iter()
        .map(|h| {
            ListItem::new(Line::from(Span::styled(
                render::highlight_label(h),
                render::kind_style(&h.kind),
            )))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Highlights"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, side[0], &mut app.list_state);

    // Activity feed panel
    let visible = side[1].height.saturating_sub(2) as usize;
    let feed: Vec<Line> = app.feed_tail(visible).into_iter().map(Line::from).collect();
    let activity = Paragraph::new(feed)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Agent ({} queued)", app.remaining_actions())),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(activity, side[1]);

    let help = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Select | "),
        Span::raw("Enter: Click (twice accepts) | "),
        Span::raw("Esc: Unfocus | n: Next scripted step | s: Save"),
    ]);
    f.render_widget(Paragraph::new(help), rows[1]);
}
