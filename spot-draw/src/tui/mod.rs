// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` from the app
// orchestrator plus purely local state (selection, scroll, form buffers).
// Snapshots arrive over an mpsc channel and the screen re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use crate::draw::participant::{ParticipantDraft, ParticipantId};
use crate::protocol::{AppSnapshot, Notice, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

/// Which keyboard context is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// The add-participant form overlay is open.
    AddParticipant,
    /// The total-spots prompt is open.
    TotalSpots,
    /// Waiting for the user to confirm quitting.
    ConfirmQuit,
}

/// Fields of the add-participant form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    FixedSpots,
    RandomCount,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::FixedSpots,
            FormField::FixedSpots => FormField::RandomCount,
            FormField::RandomCount => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::RandomCount,
            FormField::FixedSpots => FormField::Name,
            FormField::RandomCount => FormField::FixedSpots,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::FixedSpots => "Fixed spots",
            FormField::RandomCount => "Random count",
        }
    }
}

/// Buffers for the add-participant form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub draft: ParticipantDraft,
    pub field: FormField,
}

impl FormState {
    /// The text buffer of the focused field.
    pub fn active_buffer(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.draft.name,
            FormField::FixedSpots => &mut self.draft.fixed_spots,
            FormField::RandomCount => &mut self.draft.random_count,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.draft.name,
            FormField::FixedSpots => &self.draft.fixed_spots,
            FormField::RandomCount => &self.draft.random_count,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the last snapshot plus selection, scroll and input state.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest render snapshot from the orchestrator.
    pub snapshot: AppSnapshot,
    /// Most recent notice, shown until replaced or dismissed.
    pub notice: Option<Notice>,
    /// Index of the highlighted row in the participants table.
    pub selected: usize,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Content rows of the spot panel at the last render.
    pub spots_visible_rows: usize,
    pub mode: InputMode,
    pub form: FormState,
    /// Buffer for the total-spots prompt.
    pub total_input: String,
}

impl ViewState {
    /// Apply a snapshot, keeping the selection inside the participant list.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.snapshot = snapshot;
        let count = self.snapshot.participants.len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.clamp_spots_scroll();
    }

    /// Record the spot panel height and keep its scroll offset in range.
    pub fn set_spots_visible_rows(&mut self, rows: usize) {
        self.spots_visible_rows = rows;
        self.clamp_spots_scroll();
    }

    /// Largest scroll offset for the spot panel at its current height.
    pub fn max_spots_offset(&self) -> usize {
        widgets::spots::max_offset(self.snapshot.spots.len(), self.spots_visible_rows)
    }

    fn clamp_spots_scroll(&mut self) {
        let max = self.max_spots_offset();
        if let Some(offset) = self.scroll_offset.get_mut(input::SPOTS_SCROLL_KEY) {
            *offset = (*offset).min(max);
        }
    }

    /// Id of the highlighted participant, if any.
    pub fn selected_participant(&self) -> Option<ParticipantId> {
        self.snapshot.participants.get(self.selected).map(|p| p.id)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(notice) => state.notice = Some(notice),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame, overlays last.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::participants::render(frame, layout.participants, state);
    widgets::conflicts::render(frame, layout.conflicts, state);
    widgets::spots::render(frame, layout.spots, state);
    widgets::notice_bar::render_notice(frame, layout.notice, state);
    widgets::notice_bar::render_help(frame, layout.help_bar, state);

    match state.mode {
        InputMode::AddParticipant => widgets::form::render_participant_form(frame, frame.area(), state),
        InputMode::TotalSpots => widgets::form::render_total_prompt(frame, frame.area(), state),
        InputMode::ConfirmQuit => widgets::quit_confirm::render(frame, frame.area(), state),
        InputMode::Normal => {}
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over snapshots, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator is gone
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            debug!("Dispatching {:?}", cmd);
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                let completed = terminal.draw(|frame| render_frame(frame, &view_state))?;
                let spots_area = build_layout(completed.area).spots;
                view_state.set_spots_visible_rows(widgets::spots::visible_rows(spots_area));
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
