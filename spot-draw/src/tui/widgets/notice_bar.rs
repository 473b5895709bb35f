// Notice line and help bar at the bottom of the screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::{InputMode, ViewState};

/// Render the latest notice, if any.
pub fn render_notice(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(notice) = &state.notice else {
        return;
    };
    let line = Line::from(Span::styled(
        format!(" {}", notice.text),
        Style::default()
            .fg(level_color(notice.level))
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the key hints for the active input mode.
pub fn render_help(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();
    for (key, action) in help_entries(state.mode, state.snapshot.summary.assigned) {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(":{action}"),
            Style::default().fg(Color::Gray),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

/// (key, action) pairs for the help bar.
pub fn help_entries(mode: InputMode, assigned: bool) -> Vec<(&'static str, &'static str)> {
    match mode {
        InputMode::Normal => {
            let mut entries = vec![
                ("n", "Add"),
                ("d", "Remove"),
                ("t", "Total"),
                ("a", if assigned { "Reassign" } else { "Assign" }),
            ];
            if assigned {
                entries.push(("x", "Reset"));
            }
            entries.extend([("e", "Export"), ("[/]", "Scroll"), ("q", "Quit")]);
            entries
        }
        InputMode::AddParticipant => vec![
            ("Tab", "Next field"),
            ("Enter", "Add"),
            ("Esc", "Cancel"),
        ],
        InputMode::TotalSpots => vec![("Enter", "Apply"), ("Esc", "Cancel")],
        InputMode::ConfirmQuit => vec![("y", "Quit"), ("n", "Stay")],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
