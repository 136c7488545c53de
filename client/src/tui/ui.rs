//! Frame rendering.
//!
//! ```text
//! ┌ StudyGuard ───────────────────────────────┐
//! │ 24:59   Working   Session 1               │
//! │ Feed: http://127.0.0.1:5000/video_feed?.. │
//! └───────────────────────────────────────────┘
//!  Working Session
//! ┌ Motivation ───────────────────────────────┐
//! │ Quote / break suggestion banners          │
//! └───────────────────────────────────────────┘
//! ┌ Tasks ────────────────────────────────────┐
//! │ > [x] Essay (Writing) Completed in ses... │
//! └───────────────────────────────────────────┘
//! ┌ New task [Reading] ───────────────────────┐
//! └───────────────────────────────────────────┘
//!  s start  x stop  a add  t type  space toggle  r refresh  q quit
//! ```

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::session::Phase;
use crate::state::{AppState, Status};
use crate::tui::app::{InputMode, ViewState};

const HELP: &str = " s start  x stop  a add  t type  space toggle  r refresh  q quit";

/// Formats seconds as `MM:SS`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Renders the whole screen.
pub fn render(frame: &mut Frame, state: &AppState, view: &ViewState) {
    let [header, status, banners, tasks, input, help] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, state);
    render_status(frame, status, state.status());
    render_banners(frame, banners, state);
    render_tasks(frame, tasks, state, view);
    render_input(frame, input, view);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help,
    );
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let session = state.session();
    let phase_style = match session.phase {
        Phase::Idle => Style::default().fg(Color::Gray),
        Phase::Working => Style::default().fg(Color::Green),
        Phase::OnBreak => Style::default().fg(Color::Cyan),
    };

    let clock_line = Line::from(vec![
        Span::styled(
            format_clock(session.remaining_seconds),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(session.phase.to_string(), phase_style),
        Span::raw(format!("   Session {}", session.session_index)),
    ]);
    let feed_line = match state.feed_url() {
        Some(url) => Line::from(format!("Feed: {url}")),
        None => Line::from(Span::styled(
            "Camera off",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let block = Block::default().borders(Borders::ALL).title(" StudyGuard ");
    frame.render_widget(Paragraph::new(vec![clock_line, feed_line]).block(block), area);
}

fn render_status(frame: &mut Frame, area: Rect, status: &Status) {
    let style = match status {
        Status::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Status::Notice(_) => Style::default().fg(Color::Yellow),
        Status::OnBreak => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    };
    frame.render_widget(
        Paragraph::new(format!(" {}", status.label())).style(style),
        area,
    );
}

fn render_banners(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    if let Some(quote) = state.quote() {
        lines.push(Line::from(Span::styled(
            quote.to_string(),
            Style::default().fg(Color::Magenta),
        )));
    }
    if let Some(suggestion) = state.break_suggestion() {
        lines.push(Line::from(Span::styled(
            suggestion.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Motivation ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_tasks(frame: &mut Frame, area: Rect, state: &AppState, view: &ViewState) {
    let items: Vec<ListItem> = state
        .tasks()
        .tasks()
        .iter()
        .map(|(name, record)| {
            let checkbox = if record.completed { "[x]" } else { "[ ]" };
            let mut spans = vec![
                Span::raw(format!("{checkbox} {name} ")),
                Span::styled(
                    format!("({})", record.task_type.label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if let Some(label) = record.completion_label() {
                spans.push(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(Color::Green),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(view.selected));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Tasks "))
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_input(frame: &mut Frame, area: Rect, view: &ViewState) {
    let border_style = match view.mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default(),
    };
    let title = format!(" New task [{}] ", view.task_type.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    frame.render_widget(Paragraph::new(view.input.as_str()).block(block), area);

    if view.mode == InputMode::Editing {
        let cursor_x = area.x + 1 + u16::try_from(view.input.chars().count()).unwrap_or(u16::MAX);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}
