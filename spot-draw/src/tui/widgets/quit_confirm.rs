// Quit confirmation overlay.
//
// Nothing is persisted between runs, so the dialog spells out what will be
// lost: the participant list and any drawn assignment that was not exported.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::draw::session::Summary;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Leave spot draw? ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", loss_summary(&state.snapshot.summary)),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            key("y", Color::Green),
            Span::raw(" quit   "),
            key("n", Color::Red),
            Span::raw(" keep drawing"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

/// One-line description of the state that quitting discards.
pub fn loss_summary(summary: &Summary) -> String {
    match (summary.participants, summary.assigned) {
        (0, _) => "No participants entered yet.".to_string(),
        (n, true) => format!("{n} participant(s) and the draw will be lost."),
        (n, false) => format!("{n} participant(s) will be lost."),
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
