// Input overlays: the add-participant form and the total-spots prompt.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::quit_confirm::centered_rect;
use crate::tui::{FormField, ViewState};

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 8;
const PROMPT_WIDTH: u16 = 36;
const PROMPT_HEIGHT: u16 = 4;

/// Render the add-participant form centered on `area`.
pub fn render_participant_form(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let form = &state.form;
    let mut lines: Vec<Line> = [FormField::Name, FormField::FixedSpots, FormField::RandomCount]
        .into_iter()
        .map(|field| field_line(field, form.value(field), field == form.field))
        .collect();
    lines.push(Line::from(Span::styled(
        "  e.g. fixed \"1, 4-6 10\"",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Add participant ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

/// Render the total-spots prompt centered on `area`.
pub fn render_total_prompt(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Total spots ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let line = Line::from(vec![
        Span::raw(" > "),
        Span::styled(
            format!("{}_", state.total_input),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

fn field_line(field: FormField, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {:<13}", format!("{}:", field.label())), label_style),
        Span::styled(format!("{value}{cursor}"), Style::default().fg(Color::White)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
