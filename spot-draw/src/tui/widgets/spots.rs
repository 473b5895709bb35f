// Spots widget: scrollable per-spot preview of the current mapping.
//
// Fixed claims are white, random draws cyan, free spots dim.
// Scrolled with PageUp/PageDown and [ / ].

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::draw::session::{SpotKind, SpotRow};
use crate::tui::input::SPOTS_SCROLL_KEY;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let spots = &state.snapshot.spots;

    let visible_rows = visible_rows(area);
    let total = spots.len();
    let scroll_offset = state
        .scroll_offset
        .get(SPOTS_SCROLL_KEY)
        .copied()
        .unwrap_or(0)
        .min(max_offset(total, visible_rows));

    let items: Vec<ListItem> = spots
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(format_spot)
        .collect();

    let title = if state.snapshot.summary.assigned {
        "Spots (assigned)"
    } else {
        "Spots (fixed only)"
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Content rows inside the bordered block.
pub fn visible_rows(area: Rect) -> usize {
    (area.height as usize).saturating_sub(2)
}

/// Largest scroll offset that still fills the panel.
pub fn max_offset(total: usize, visible_rows: usize) -> usize {
    total.saturating_sub(visible_rows)
}

fn format_spot<'a>(row: &SpotRow) -> ListItem<'a> {
    let style = match row.kind {
        SpotKind::Fixed => Style::default().fg(Color::White),
        SpotKind::Random => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        SpotKind::Empty => Style::default().fg(Color::DarkGray),
    };
    ListItem::new(Line::from(Span::styled(format_spot_text(row), style)))
}

/// Plain text of one spot line, e.g. "  12  Ada (random)".
pub fn format_spot_text(row: &SpotRow) -> String {
    match (&row.name, row.kind) {
        (Some(name), SpotKind::Random) => format!("{:>4}  {} (random)", row.spot, name),
        (Some(name), _) => format!("{:>4}  {}", row.spot, name),
        (None, _) => format!("{:>4}  -", row.spot),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
