// Conflicts widget: fixed spots claimed by more than one participant.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::draw::claims::Conflict;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let conflicts = &state.snapshot.conflicts;

    if conflicts.is_empty() {
        let paragraph = Paragraph::new("  No conflicts.")
            .style(Style::default().fg(Color::Green))
            .block(Block::default().borders(Borders::ALL).title("Conflicts"));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = conflicts
        .iter()
        .map(|c| {
            ListItem::new(Line::from(Span::styled(
                format_conflict(c),
                Style::default().fg(Color::Red),
            )))
        })
        .collect();

    let title = Span::styled(
        format!("Conflicts ({}) - assignment blocked", conflicts.len()),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(title),
    );
    frame.render_widget(list, area);
}

/// "Spot 4: Ada vs Bo"
pub fn format_conflict(conflict: &Conflict) -> String {
    format!(
        " Spot {}: {} vs {}",
        conflict.spot, conflict.first, conflict.later
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
