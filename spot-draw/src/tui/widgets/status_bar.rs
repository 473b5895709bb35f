// Status bar widget: assignment state, spot totals, claim counts.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::draw::session::Summary;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [state badge] [spots] | [fixed/free] | [random granted/requested] | [conflicts]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let summary = &state.snapshot.summary;
    let mut spans = Vec::new();

    let (badge, badge_color) = state_badge(summary);
    spans.push(Span::styled(
        format!(" {} ", badge),
        Style::default()
            .fg(Color::Black)
            .bg(badge_color)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" "));

    for (i, text) in counter_texts(summary).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        }
        spans.push(Span::styled(text, Style::default().fg(Color::White)));
    }

    if summary.conflicts > 0 {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("{} conflict(s)", summary.conflicts),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Label and color for the assignment state.
pub fn state_badge(summary: &Summary) -> (&'static str, Color) {
    if summary.assigned {
        ("ASSIGNED", Color::Green)
    } else {
        ("NOT ASSIGNED", Color::Yellow)
    }
}

/// Plain counter texts shown after the badge.
pub fn counter_texts(summary: &Summary) -> Vec<String> {
    let mut texts = vec![
        format!("Spots {}", summary.total_spots),
        format!("Participants {}", summary.participants),
        format!(
            "Fixed {} / Free {}",
            summary.fixed_claimed, summary.available
        ),
    ];
    if summary.assigned {
        texts.push(format!(
            "Random {}/{}",
            summary.random_granted, summary.random_requested
        ));
    } else {
        texts.push(format!("Random requested {}", summary.random_requested));
    }
    texts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
