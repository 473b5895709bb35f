// Session state: participant list, spot count, and the assignment lifecycle.

use std::borrow::Cow;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::assign::{build_assignment, AssignError, Assignment};
use super::claims::{compute_claims, ClaimMap, Claims};
use super::participant::{parse_spot_expression, Participant, ParticipantDraft, ParticipantId};
use crate::export::{self, ExportError};

/// Spot count used when nothing else is configured.
pub const DEFAULT_TOTAL_SPOTS: u32 = 100;

/// Largest accepted spot count. Every snapshot and export materializes one
/// row per spot.
pub const MAX_TOTAL_SPOTS: u32 = 100_000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("participant name must not be empty")]
    EmptyName,

    #[error("random count must be a non-negative integer, got `{0}`")]
    InvalidRandomCount(String),

    #[error("total spots must be an integer from 1 to {max}, got `{0}`", max = MAX_TOTAL_SPOTS)]
    InvalidTotalSpots(String),

    #[error("no participant with id {0}")]
    UnknownParticipant(ParticipantId),

    #[error("assignment blocked: {0} fixed spot conflict(s)")]
    Conflicts(usize),
}

impl From<AssignError> for SessionError {
    fn from(err: AssignError) -> Self {
        match err {
            AssignError::Conflicts(conflicts) => SessionError::Conflicts(conflicts.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Session types
// ---------------------------------------------------------------------------

/// Whether random spots have been drawn since the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentState<'a> {
    NotAssigned,
    Assigned(&'a Assignment),
}

/// How a spot in the preview came to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotKind {
    Empty,
    Fixed,
    Random,
}

/// One row of the spot preview / export table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotRow {
    pub spot: u32,
    pub name: Option<String>,
    pub kind: SpotKind,
}

/// Headline numbers for the status bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_spots: u32,
    pub participants: usize,
    pub fixed_claimed: usize,
    pub available: usize,
    pub random_requested: u64,
    pub random_granted: u64,
    pub conflicts: usize,
    pub assigned: bool,
}

/// Outcome of a successful `add_participant`, including anything the
/// fixed-spot parser dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedParticipant {
    pub id: ParticipantId,
    pub ignored_tokens: Vec<String>,
    pub out_of_range: u64,
}

/// The complete state of one drawing session.
#[derive(Debug, Clone)]
pub struct Session {
    total_spots: u32,
    participants: Vec<Participant>,
    next_id: u64,
    /// Drawn assignment, `None` until assigned or after a reset.
    assignment: Option<Assignment>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            total_spots: DEFAULT_TOTAL_SPOTS,
            participants: Vec::new(),
            next_id: 1,
            assignment: None,
        }
    }
}

impl Session {
    /// Create an empty session with the given number of spots.
    pub fn new(total_spots: u32) -> Result<Self, SessionError> {
        check_total_spots(total_spots)?;
        Ok(Session {
            total_spots,
            ..Session::default()
        })
    }

    pub fn total_spots(&self) -> u32 {
        self.total_spots
    }

    /// Participants in insertion order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn assignment_state(&self) -> AssignmentState<'_> {
        match &self.assignment {
            Some(a) => AssignmentState::Assigned(a),
            None => AssignmentState::NotAssigned,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Change the number of spots.
    ///
    /// Existing fixed spots are kept as entered; any that now fall outside
    /// the range are ignored by conflict detection. A drawn assignment is
    /// discarded only if the count actually changes.
    pub fn set_total_spots(&mut self, total_spots: u32) -> Result<(), SessionError> {
        check_total_spots(total_spots)?;
        if total_spots != self.total_spots {
            info!("Total spots changed: {} -> {}", self.total_spots, total_spots);
            self.total_spots = total_spots;
            self.invalidate("total spots changed");
        }
        Ok(())
    }

    /// Parse and apply a total-spots value typed by the user.
    pub fn set_total_spots_text(&mut self, text: &str) -> Result<(), SessionError> {
        let trimmed = text.trim();
        let total = trimmed
            .parse::<u32>()
            .map_err(|_| SessionError::InvalidTotalSpots(trimmed.to_string()))?;
        self.set_total_spots(total)
    }

    /// Validate a form draft and register the participant.
    ///
    /// On error nothing changes. Malformed or out-of-range fixed-spot tokens
    /// are not errors; they are dropped and reported in the result.
    pub fn add_participant(
        &mut self,
        draft: &ParticipantDraft,
    ) -> Result<AddedParticipant, SessionError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let count_text = draft.random_count.trim();
        let random_count = if count_text.is_empty() {
            0
        } else {
            count_text
                .parse::<u32>()
                .map_err(|_| SessionError::InvalidRandomCount(count_text.to_string()))?
        };

        let parsed = parse_spot_expression(&draft.fixed_spots, self.total_spots);
        if parsed.has_skipped() {
            warn!(
                "Participant '{}': ignored tokens {:?}, {} out-of-range value(s)",
                name, parsed.ignored_tokens, parsed.out_of_range
            );
        }

        let id = ParticipantId(self.next_id);
        self.next_id += 1;
        info!(
            "Added participant {} '{}' (fixed={:?}, random={})",
            id, name, parsed.spots, random_count
        );
        self.participants.push(Participant {
            id,
            name: name.to_string(),
            fixed_spots: parsed.spots,
            random_count,
        });
        self.invalidate("participant added");

        Ok(AddedParticipant {
            id,
            ignored_tokens: parsed.ignored_tokens,
            out_of_range: parsed.out_of_range,
        })
    }

    /// Remove a participant by id, returning the removed record.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, SessionError> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(SessionError::UnknownParticipant(id))?;
        let removed = self.participants.remove(idx);
        info!("Removed participant {} '{}'", removed.id, removed.name);
        self.invalidate("participant removed");
        Ok(removed)
    }

    /// Fixed-only claims and conflicts for the current participants.
    pub fn claims(&self) -> Claims {
        compute_claims(&self.participants, self.total_spots)
    }

    /// Draw random spots. Rejected without any state change while fixed
    /// claims conflict; otherwise replaces any previous assignment.
    pub fn assign_randoms<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&Assignment, SessionError> {
        let assignment = build_assignment(&self.participants, self.total_spots, rng)
            .inspect_err(|e| warn!("Random assignment rejected: {}", e))?;
        info!(
            "Random assignment drawn: {}/{} requested spot(s) granted",
            assignment.granted, assignment.requested
        );
        let stored: &Assignment = self.assignment.insert(assignment);
        Ok(stored)
    }

    /// Drop the drawn assignment. Returns whether there was one to drop.
    pub fn reset_randoms(&mut self) -> bool {
        let was_assigned = self.assignment.take().is_some();
        if was_assigned {
            info!("Random assignment reset");
        }
        was_assigned
    }

    /// The mapping preview and export should show: the drawn assignment if
    /// there is one, otherwise the fixed-only claims.
    pub fn authoritative_mapping(&self) -> Cow<'_, ClaimMap> {
        match self.assignment_state() {
            AssignmentState::Assigned(a) => Cow::Borrowed(&a.mapping),
            AssignmentState::NotAssigned => Cow::Owned(self.claims().mapping),
        }
    }

    /// One row per spot, ascending, tagged with how it was filled.
    pub fn spot_rows(&self) -> Vec<SpotRow> {
        let fixed = self.claims().mapping;
        let mapping = self.authoritative_mapping();
        (1..=self.total_spots)
            .map(|spot| {
                let name = mapping.get(&spot).cloned();
                let kind = match (&name, fixed.contains_key(&spot)) {
                    (None, _) => SpotKind::Empty,
                    (Some(_), true) => SpotKind::Fixed,
                    (Some(_), false) => SpotKind::Random,
                };
                SpotRow { spot, name, kind }
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let claims = self.claims();
        let fixed_claimed = claims.mapping.len();
        let random_requested = self
            .participants
            .iter()
            .map(|p| u64::from(p.random_count))
            .sum();
        let random_granted = self.assignment.as_ref().map_or(0, |a| a.granted);
        Summary {
            total_spots: self.total_spots,
            participants: self.participants.len(),
            fixed_claimed,
            available: self.total_spots as usize - fixed_claimed,
            random_requested,
            random_granted,
            conflicts: claims.conflicts.len(),
            assigned: self.is_assigned(),
        }
    }

    /// CSV text for the current authoritative mapping.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        export::render_csv(&self.spot_rows())
    }

    fn invalidate(&mut self, reason: &str) {
        if self.reset_randoms() {
            debug!("Assignment invalidated: {}", reason);
        }
    }
}

fn check_total_spots(total_spots: u32) -> Result<(), SessionError> {
    if total_spots == 0 || total_spots > MAX_TOTAL_SPOTS {
        return Err(SessionError::InvalidTotalSpots(total_spots.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
