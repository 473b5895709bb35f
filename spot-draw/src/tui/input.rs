// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (selection, scrolling,
// form editing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{FormState, InputMode, ViewState};
use crate::draw::session::SessionError;
use crate::protocol::{Notice, UserCommand};

/// Scroll key for the spot preview.
pub const SPOTS_SCROLL_KEY: &str = "spots";

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // On Windows crossterm emits both Press and Release events.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match view_state.mode {
        InputMode::ConfirmQuit => handle_confirm_quit(key_event, view_state),
        InputMode::AddParticipant => handle_form(key_event, view_state),
        InputMode::TotalSpots => handle_total_prompt(key_event, view_state),
        InputMode::Normal => handle_normal(key_event, view_state),
    }
}

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('n') => {
            view_state.form = FormState::default();
            view_state.mode = InputMode::AddParticipant;
            None
        }
        KeyCode::Char('t') => {
            view_state.total_input = view_state.snapshot.summary.total_spots.to_string();
            view_state.mode = InputMode::TotalSpots;
            None
        }
        KeyCode::Char('a') => Some(UserCommand::AssignRandoms),
        KeyCode::Char('x') => Some(UserCommand::ResetRandoms),
        KeyCode::Char('e') => Some(UserCommand::Export),
        KeyCode::Char('d') | KeyCode::Delete => view_state
            .selected_participant()
            .map(UserCommand::RemoveParticipant),

        // Participant selection
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.snapshot.participants.len().saturating_sub(1);
            view_state.selected = (view_state.selected + 1).min(last);
            None
        }

        // Spot preview scrolling
        KeyCode::PageUp => {
            scroll_spots_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_spots_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Char('[') => {
            scroll_spots_up(view_state, 1);
            None
        }
        KeyCode::Char(']') => {
            scroll_spots_down(view_state, 1);
            None
        }

        KeyCode::Esc => {
            view_state.notice = None;
            None
        }
        KeyCode::Char('q') => {
            view_state.mode = InputMode::ConfirmQuit;
            None
        }
        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        _ => None,
    }
}

/// Add-participant form: Tab/arrow keys move between fields, Enter submits,
/// Esc cancels.
fn handle_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.form;
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        KeyCode::Tab | KeyCode::Down => {
            form.field = form.field.next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.field = form.field.prev();
            None
        }
        KeyCode::Backspace => {
            form.active_buffer().pop();
            None
        }
        KeyCode::Enter => {
            // Keep the form open so the user can fix the name.
            if form.draft.name.trim().is_empty() {
                view_state.notice = Some(Notice::error(SessionError::EmptyName.to_string()));
                return None;
            }
            let draft = std::mem::take(&mut view_state.form).draft;
            view_state.mode = InputMode::Normal;
            Some(UserCommand::AddParticipant(draft))
        }
        KeyCode::Char(c) => {
            form.active_buffer().push(c);
            None
        }
        _ => None,
    }
}

/// Total-spots prompt: digits only, Enter submits, Esc cancels.
fn handle_total_prompt(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        KeyCode::Backspace => {
            view_state.total_input.pop();
            None
        }
        KeyCode::Enter => {
            view_state.mode = InputMode::Normal;
            Some(UserCommand::SetTotalSpots(std::mem::take(
                &mut view_state.total_input,
            )))
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            view_state.total_input.push(c);
            None
        }
        _ => None,
    }
}

fn scroll_spots_up(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry(SPOTS_SCROLL_KEY.to_string())
        .or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn scroll_spots_down(view_state: &mut ViewState, lines: usize) {
    let max = view_state.max_spots_offset();
    let offset = view_state
        .scroll_offset
        .entry(SPOTS_SCROLL_KEY.to_string())
        .or_insert(0);
    *offset = offset.saturating_add(lines).min(max);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::participant::{ParticipantDraft, ParticipantId};
    use crate::draw::session::{SpotKind, SpotRow};
    use crate::protocol::{AppSnapshot, NoticeLevel, ParticipantRow};
    use crate::tui::FormField;
    use crossterm::event::{KeyEventState, KeyModifiers};

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(key(KeyCode::Char(c)), state).is_none());
        }
    }

    fn state_with_participants(n: u64) -> ViewState {
        let mut state = ViewState::default();
        let participants = (1..=n)
            .map(|i| ParticipantRow {
                id: ParticipantId(i),
                name: format!("P{i}"),
                fixed: String::new(),
                random_count: 0,
                granted: None,
            })
            .collect();
        let spots = (1..=50)
            .map(|spot| SpotRow {
                spot,
                name: None,
                kind: SpotKind::Empty,
            })
            .collect();
        state.apply_snapshot(AppSnapshot {
            participants,
            spots,
            ..AppSnapshot::default()
        });
        state
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('a'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.mode = InputMode::AddParticipant;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn action_keys_dispatch_commands() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('a')), &mut state),
            Some(UserCommand::AssignRandoms)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut state),
            Some(UserCommand::ResetRandoms)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::Export)
        );
    }

    #[test]
    fn delete_removes_selected_participant() {
        let mut state = state_with_participants(3);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::RemoveParticipant(ParticipantId(2)))
        );
    }

    #[test]
    fn delete_with_no_participants_is_noop() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Delete), &mut state).is_none());
    }

    #[test]
    fn selection_is_bounded() {
        let mut state = state_with_participants(2);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected, 0);
        for _ in 0..5 {
            handle_key(key(KeyCode::Char('j')), &mut state);
        }
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn form_submits_draft() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('n')), &mut state);
        assert_eq!(state.mode, InputMode::AddParticipant);

        type_text(&mut state, "Ada");
        handle_key(key(KeyCode::Tab), &mut state);
        type_text(&mut state, "1,3-5");
        handle_key(key(KeyCode::Tab), &mut state);
        type_text(&mut state, "22");
        handle_key(key(KeyCode::Backspace), &mut state);

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::AddParticipant(ParticipantDraft::new(
                "Ada", "1,3-5", "2"
            )))
        );
        assert_eq!(state.mode, InputMode::Normal);
        assert_eq!(state.form, FormState::default());
    }

    #[test]
    fn form_keys_do_not_trigger_actions() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('n')), &mut state);
        // 'a', 'q', 'e' are plain text inside the form
        type_text(&mut state, "aqe");
        assert_eq!(state.form.draft.name, "aqe");
        assert_eq!(state.mode, InputMode::AddParticipant);
    }

    #[test]
    fn form_blank_name_stays_open() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('n')), &mut state);
        type_text(&mut state, "   ");
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert_eq!(state.mode, InputMode::AddParticipant);
        assert_eq!(
            state.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Error)
        );
    }

    #[test]
    fn form_escape_cancels() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('n')), &mut state);
        type_text(&mut state, "Bo");
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn form_back_tab_moves_backwards() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('n')), &mut state);
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.form.field, FormField::RandomCount);
    }

    #[test]
    fn total_prompt_accepts_digits_only() {
        let mut state = ViewState::default();
        state.snapshot.summary.total_spots = 100;
        handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.mode, InputMode::TotalSpots);
        assert_eq!(state.total_input, "100");

        handle_key(key(KeyCode::Backspace), &mut state);
        handle_key(key(KeyCode::Backspace), &mut state);
        type_text(&mut state, "x5");
        assert_eq!(state.total_input, "15");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::SetTotalSpots("15".into())));
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.total_input.is_empty());
    }

    #[test]
    fn quit_requires_confirmation() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.mode, InputMode::ConfirmQuit);
        assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('n')), &mut state).is_none());
        assert_eq!(state.mode, InputMode::Normal);

        handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn spot_scrolling_is_clamped() {
        let mut state = state_with_participants(0);
        state.set_spots_visible_rows(10);
        handle_key(key(KeyCode::Char('[')), &mut state);
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 0);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 20);
        handle_key(key(KeyCode::PageDown), &mut state);
        handle_key(key(KeyCode::PageDown), &mut state);
        // 50 spots, 10 visible: the last page starts at 40.
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 40);
        handle_key(key(KeyCode::Char(']')), &mut state);
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 40);
    }

    #[test]
    fn page_up_from_bottom_moves_immediately() {
        let mut state = state_with_participants(0);
        state.set_spots_visible_rows(10);
        for _ in 0..5 {
            handle_key(key(KeyCode::PageDown), &mut state);
        }
        handle_key(key(KeyCode::Char('[')), &mut state);
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 39);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset[SPOTS_SCROLL_KEY], 19);
    }

    #[test]
    fn escape_dismisses_notice() {
        let mut state = ViewState::default();
        state.notice = Some(Notice::info("done"));
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.notice.is_none());
    }
}
