// Participants widget: table of entered participants with their requests.
//
// Columns: #, Name, Fixed, Random (requested, or granted/requested once assigned).
// The selected row is highlighted and targeted by the remove key.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::draw::participant::format_spots;
use crate::protocol::ParticipantRow;
use crate::tui::ViewState;

/// Render the participants table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let participants = &state.snapshot.participants;
    let title = format!("Participants ({})", participants.len());

    if participants.is_empty() {
        let paragraph = Paragraph::new("  No participants. Press n to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Fixed"),
        Cell::from("Random"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = participants
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.id.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(fixed_cell(p)),
                Cell::from(random_cell(p)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(12),
        Constraint::Percentage(35),
        Constraint::Percentage(30),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Fixed spots, or a dash when none were entered.
pub fn fixed_cell(row: &ParticipantRow) -> String {
    if row.fixed.is_empty() {
        "-".to_string()
    } else {
        row.fixed.clone()
    }
}

/// Random request, followed by the drawn spots once an assignment exists.
pub fn random_cell(row: &ParticipantRow) -> String {
    match &row.granted {
        None => row.random_count.to_string(),
        Some(spots) if spots.is_empty() => format!("0/{}", row.random_count),
        Some(spots) => format!(
            "{}/{}: {}",
            spots.len(),
            row.random_count,
            format_spots(spots)
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
