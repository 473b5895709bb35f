// Messages exchanged between the TUI and the app orchestrator.
//
// The TUI sends `UserCommand`s; the orchestrator answers with `UiUpdate`s
// carrying a full snapshot of what to render plus an optional notice.

use crate::draw::claims::Conflict;
use crate::draw::participant::{ParticipantDraft, ParticipantId};
use crate::draw::session::{SpotRow, Summary};

/// Commands from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Change the spot count; the text is validated by the session.
    SetTotalSpots(String),
    AddParticipant(ParticipantDraft),
    RemoveParticipant(ParticipantId),
    AssignRandoms,
    ResetRandoms,
    Export,
    Quit,
}

/// Updates from the orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    Notice(Notice),
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A one-line message shown above the help bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// One participant as shown in the participants table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub id: ParticipantId,
    pub name: String,
    /// Fixed spots in compact range notation.
    pub fixed: String,
    pub random_count: u32,
    /// Random spots drawn for this participant, when an assignment exists.
    pub granted: Option<Vec<u32>>,
}

/// Everything the TUI needs to draw one frame.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub summary: Summary,
    pub participants: Vec<ParticipantRow>,
    pub conflicts: Vec<Conflict>,
    pub spots: Vec<SpotRow>,
}
