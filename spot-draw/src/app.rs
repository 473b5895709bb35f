// Application state and orchestration logic.
//
// Owns the drawing session and the random generator. Commands arrive from
// the TUI over an mpsc channel; after each one a fresh snapshot (and usually
// a notice) is pushed back for rendering.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::draw::participant::{format_spots, ParticipantDraft, ParticipantId};
use crate::draw::session::{AssignmentState, Session, SessionError};
use crate::export;
use crate::protocol::{AppSnapshot, Notice, ParticipantRow, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub rng: StdRng,
    /// Directory CSV exports are written to.
    pub export_dir: PathBuf,
}

impl AppState {
    /// Create the app state from configuration. The RNG is seeded from
    /// `draw.seed` when set, otherwise from the OS.
    pub fn new(config: Config) -> Result<Self, SessionError> {
        let session = Session::new(config.draw.total_spots)?;
        let rng = match config.draw.seed {
            Some(seed) => {
                info!("Using fixed RNG seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let export_dir = config.export_dir();
        Ok(AppState {
            config,
            session,
            rng,
            export_dir,
        })
    }

    /// Apply one user command to the session and describe the outcome.
    ///
    /// `Quit` is handled by the event loop and yields no notice here.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Option<Notice> {
        match cmd {
            UserCommand::SetTotalSpots(text) => Some(self.set_total_spots(&text)),
            UserCommand::AddParticipant(draft) => Some(self.add_participant(&draft)),
            UserCommand::RemoveParticipant(id) => Some(self.remove_participant(id)),
            UserCommand::AssignRandoms => Some(self.assign_randoms()),
            UserCommand::ResetRandoms => Some(self.reset_randoms()),
            UserCommand::Export => Some(self.export()),
            UserCommand::Quit => None,
        }
    }

    fn set_total_spots(&mut self, text: &str) -> Notice {
        match self.session.set_total_spots_text(text) {
            Ok(()) => Notice::info(format!("Total spots set to {}", self.session.total_spots())),
            Err(e) => Notice::error(e.to_string()),
        }
    }

    fn add_participant(&mut self, draft: &ParticipantDraft) -> Notice {
        match self.session.add_participant(draft) {
            Ok(added) => {
                let name = self
                    .session
                    .participant(added.id)
                    .map(|p| p.name.as_str())
                    .unwrap_or_default();
                let mut skipped = Vec::new();
                if !added.ignored_tokens.is_empty() {
                    skipped.push(format!("ignored {}", added.ignored_tokens.join(" ")));
                }
                if added.out_of_range > 0 {
                    skipped.push(format!("{} out of range", added.out_of_range));
                }
                if skipped.is_empty() {
                    Notice::info(format!("Added {name}"))
                } else {
                    Notice::warning(format!("Added {name} ({})", skipped.join("; ")))
                }
            }
            Err(e) => Notice::error(e.to_string()),
        }
    }

    fn remove_participant(&mut self, id: ParticipantId) -> Notice {
        match self.session.remove_participant(id) {
            Ok(removed) => Notice::info(format!("Removed {}", removed.name)),
            Err(e) => Notice::error(e.to_string()),
        }
    }

    fn assign_randoms(&mut self) -> Notice {
        match self.session.assign_randoms(&mut self.rng) {
            Ok(a) if a.shortfall() > 0 => Notice::warning(format!(
                "Assigned {} of {} random spot(s); not enough free spots",
                a.granted, a.requested
            )),
            Ok(a) => Notice::info(format!("Assigned {} random spot(s)", a.granted)),
            Err(e) => Notice::warning(e.to_string()),
        }
    }

    fn reset_randoms(&mut self) -> Notice {
        if self.session.reset_randoms() {
            Notice::info("Random assignment cleared")
        } else {
            Notice::info("Nothing to reset")
        }
    }

    fn export(&self) -> Notice {
        let result = self.session.export_csv().and_then(|csv| {
            export::write_csv(&self.export_dir, self.session.total_spots(), &csv)
        });
        match result {
            Ok(path) => Notice::info(format!("Exported to {}", path.display())),
            Err(e) => {
                warn!("Export failed: {}", e);
                Notice::error(format!("Export failed: {e}"))
            }
        }
    }

    /// Build a full render snapshot of the session.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let claims = self.session.claims();
        let assignment = match self.session.assignment_state() {
            AssignmentState::Assigned(a) => Some(a),
            AssignmentState::NotAssigned => None,
        };
        let participants = self
            .session
            .participants()
            .iter()
            .map(|p| ParticipantRow {
                id: p.id,
                name: p.name.clone(),
                fixed: format_spots(&p.fixed_spots),
                random_count: p.random_count,
                granted: assignment.map(|a| a.random_for(p.id).to_vec()),
            })
            .collect();

        AppSnapshot {
            summary: self.session.summary(),
            participants,
            conflicts: claims.conflicts,
            spots: self.session.spot_rows(),
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until `Quit` arrives or the command channel closes.
///
/// Pushes an initial snapshot, then a notice and a snapshot after every
/// command.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(&state, &ui_tx).await;

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit command received, shutting down");
            return Ok(());
        }
        if let Some(notice) = state.handle_command(cmd) {
            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
        }
        send_snapshot(&state, &ui_tx).await;
    }

    info!("Command channel closed, shutting down");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
